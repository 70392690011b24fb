mod inmemory;
mod postgres;

pub use inmemory::InMemorySubscriberRepo;
use matchbell_domain::{Subscriber, ID};
pub use postgres::PostgresSubscriberRepo;

#[async_trait::async_trait]
pub trait ISubscriberRepo: Send + Sync {
    /// Inserts the subscriber unless its channel is already registered.
    /// Subscribers are created lazily on first contact and never deleted.
    async fn insert(&self, subscriber: &Subscriber) -> anyhow::Result<()>;
    async fn find(&self, subscriber_id: &ID) -> Option<Subscriber>;
    async fn find_by_channel(&self, channel_id: i64) -> Option<Subscriber>;
}
