use serde::Serialize;
use tracing::debug;

// https://core.telegram.org/bots/api#sendmessage
const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Outbound notification channel contract. The dispatcher is the only
/// consumer: one call per (reminder, attempt).
#[async_trait::async_trait]
pub trait INotificationChannel: Send + Sync {
    async fn send(&self, channel_id: i64, text: &str) -> anyhow::Result<()>;
}

pub struct TelegramChannel {
    client: reqwest::Client,
    bot_token: String,
}

impl TelegramChannel {
    pub fn new(bot_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            bot_token,
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'static str,
}

#[async_trait::async_trait]
impl INotificationChannel for TelegramChannel {
    async fn send(&self, channel_id: i64, text: &str) -> anyhow::Result<()> {
        let url = format!("{}/bot{}/sendMessage", TELEGRAM_API_BASE, self.bot_token);
        let body = SendMessageRequest {
            chat_id: channel_id,
            text,
            parse_mode: "Markdown",
        };
        let res = self.client.post(&url).json(&body).send().await?;
        if !res.status().is_success() {
            anyhow::bail!(
                "Telegram sendMessage to channel {} responded with status {}",
                channel_id,
                res.status()
            );
        }
        Ok(())
    }
}

/// Channel that drops every notification. Used by the in-memory context;
/// tests that care about deliveries install their own double.
pub struct NoopChannel {}

#[async_trait::async_trait]
impl INotificationChannel for NoopChannel {
    async fn send(&self, channel_id: i64, text: &str) -> anyhow::Result<()> {
        debug!("NoopChannel dropping message for channel {}: {}", channel_id, text);
        Ok(())
    }
}
