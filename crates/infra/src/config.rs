use matchbell_utils::create_random_secret;
use std::time::Duration;
use tracing::{info, log::warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret the bot front-end must present in the `x-matchbell-api-key`
    /// header on every guarded route
    pub api_secret: String,
    /// Port for the application to run on
    pub port: usize,
    /// Upper bound on a single outbound send attempt. A send still pending
    /// after this is treated as a transport failure so one unresponsive
    /// channel cannot stall the whole tick.
    pub send_timeout_millis: u64,
}

impl Config {
    pub fn new() -> Self {
        let api_secret = match std::env::var("API_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                info!("Did not find API_SECRET environment variable. Going to create one.");
                let secret = create_random_secret(16);
                info!("API secret was generated and set to: {}", secret);
                secret
            }
        };
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or(default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };
        let default_send_timeout = 5000;
        let send_timeout_millis = std::env::var("SEND_TIMEOUT_MILLIS")
            .ok()
            .and_then(|t| t.parse::<u64>().ok())
            .unwrap_or(default_send_timeout);

        Self {
            api_secret,
            port,
            send_timeout_millis,
        }
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_millis)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
