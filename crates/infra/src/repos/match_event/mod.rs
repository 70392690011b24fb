mod inmemory;
mod postgres;

pub use inmemory::InMemoryMatchEventRepo;
use matchbell_domain::{MatchEvent, Sport, ID};
pub use postgres::PostgresMatchEventRepo;

/// Matches offered for selection per sport, mirroring what a chat page can
/// reasonably present
pub const UPCOMING_EVENTS_LIMIT: i64 = 20;

/// Read model over the event catalog. The catalog itself is owned by an
/// external importer; this service inserts events only from tests and
/// otherwise treats them as immutable.
#[async_trait::async_trait]
pub trait IMatchEventRepo: Send + Sync {
    async fn insert(&self, event: &MatchEvent) -> anyhow::Result<()>;
    async fn find(&self, event_id: &ID) -> Option<MatchEvent>;
    /// Upcoming events for one sport, starting after `after`, ordered by
    /// start time ascending and capped at `limit`
    async fn find_upcoming_by_sport(
        &self,
        sport: Sport,
        after: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<MatchEvent>>;
}
