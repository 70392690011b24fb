mod match_event;
mod reminder;
mod shared;
mod subscriber;

use match_event::{InMemoryMatchEventRepo, PostgresMatchEventRepo};
pub use match_event::{IMatchEventRepo, UPCOMING_EVENTS_LIMIT};
use matchbell_domain::{MatchEvent, Subscriber};
use reminder::{InMemoryReminderRepo, PostgresReminderRepo};
pub use reminder::IReminderRepo;
pub use shared::repo::DeleteResult;
use sqlx::postgres::PgPoolOptions;
use std::sync::{Arc, Mutex};
use subscriber::{InMemorySubscriberRepo, PostgresSubscriberRepo};
pub use subscriber::ISubscriberRepo;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub subscribers: Arc<dyn ISubscriberRepo>,
    pub match_events: Arc<dyn IMatchEventRepo>,
    pub reminders: Arc<dyn IReminderRepo>,
}

impl Repos {
    pub async fn create_postgres(
        connection_string: &str,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        // Self-provision the schema so a fresh database works on first boot
        info!("DB RUNNING MIGRATIONS ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB RUNNING MIGRATIONS ... [done]");

        Ok(Self {
            subscribers: Arc::new(PostgresSubscriberRepo::new(pool.clone())),
            match_events: Arc::new(PostgresMatchEventRepo::new(pool.clone())),
            reminders: Arc::new(PostgresReminderRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        // The reminder repo joins against subscribers and events the way the
        // SQL backend does, so the collections are shared between the repos.
        let subscribers = Arc::new(Mutex::new(Vec::<Subscriber>::new()));
        let match_events = Arc::new(Mutex::new(Vec::<MatchEvent>::new()));

        Self {
            subscribers: Arc::new(InMemorySubscriberRepo::new(subscribers.clone())),
            match_events: Arc::new(InMemoryMatchEventRepo::new(match_events.clone())),
            reminders: Arc::new(InMemoryReminderRepo::new(subscribers, match_events)),
        }
    }
}
