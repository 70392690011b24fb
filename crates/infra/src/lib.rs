mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
use repos::Repos;
pub use repos::{
    IMatchEventRepo, IReminderRepo, ISubscriberRepo, DeleteResult, UPCOMING_EVENTS_LIMIT,
};
pub use services::{INotificationChannel, NoopChannel, TelegramChannel};
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;

#[derive(Clone)]
pub struct MatchbellContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    /// Outbound notification channel used exclusively by the dispatcher
    pub channel: Arc<dyn INotificationChannel>,
}

struct ContextParams {
    pub postgres_connection_string: String,
    pub telegram_bot_token: String,
}

impl MatchbellContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        Self {
            repos,
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            channel: Arc::new(TelegramChannel::new(params.telegram_bot_token)),
        }
    }

    /// Context backed by in-memory repositories and a no-op channel.
    /// Tests swap `sys` and `channel` for controlled doubles.
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            channel: Arc::new(NoopChannel {}),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> MatchbellContext {
    MatchbellContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
        telegram_bot_token: get_telegram_bot_token(),
    })
    .await
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

fn get_telegram_bot_token() -> String {
    const TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";

    std::env::var(TELEGRAM_BOT_TOKEN)
        .unwrap_or_else(|_| panic!("{} env var to be present.", TELEGRAM_BOT_TOKEN))
}
