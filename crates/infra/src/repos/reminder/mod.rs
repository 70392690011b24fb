mod inmemory;
mod postgres;

use crate::repos::shared::repo::DeleteResult;
pub use inmemory::InMemoryReminderRepo;
use matchbell_domain::{DueCandidate, Reminder, ReminderWithEvent, ID};
pub use postgres::PostgresReminderRepo;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    /// The undelivered reminder with the same (subscriber, event, lead time)
    /// triple, if one exists. Lead times are compared at millisecond
    /// resolution so two representations of the same minute dedup.
    async fn find_duplicate(
        &self,
        subscriber_id: &ID,
        event_id: &ID,
        lead_hours: f64,
    ) -> Option<Reminder>;
    /// Pending reminders of one subscriber joined with their events,
    /// event start ascending
    async fn find_by_subscriber(
        &self,
        subscriber_id: &ID,
        now: i64,
    ) -> anyhow::Result<Vec<ReminderWithEvent>>;
    /// Non-delivered reminders whose event has not yet started, or whose
    /// fire window is still open even though the event started. The caller
    /// classifies them against the tolerance window.
    async fn find_due_candidates(&self, now: i64) -> anyhow::Result<Vec<DueCandidate>>;
    /// Conditional update: flips `delivered` only when it is still false.
    /// Returns false when someone else already delivered the reminder.
    async fn mark_delivered(&self, reminder_id: &ID) -> anyhow::Result<bool>;
    async fn delete(&self, reminder_id: &ID, subscriber_id: &ID) -> Option<Reminder>;
    async fn delete_by_subscriber(&self, subscriber_id: &ID) -> anyhow::Result<DeleteResult>;
}
