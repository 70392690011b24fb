use crate::reminder::dispatcher::dispatch_due_reminders;
use crate::reminder::get_due_reminders::GetDueRemindersUseCase;
use crate::shared::usecase::execute;
use matchbell_infra::MatchbellContext;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, sleep, Instant};
use tracing::info;

/// Polling cadence. Half the minute so that together with the one minute
/// grace offset and the 30s tolerance window no fire instant can slip
/// between two consecutive observations.
pub const TICK_INTERVAL: Duration = Duration::from_secs(30);

/// Seconds until the next half-minute boundary, so ticks land on :00 and
/// :30 regardless of when the process came up.
pub fn get_start_delay(now_ts: i64) -> u64 {
    (30 - (now_ts / 1000) % 30) as u64
}

pub fn start_reminder_dispatch_job(ctx: MatchbellContext, mut shutdown: watch::Receiver<()>) {
    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now);
        sleep(Duration::from_secs(secs_to_next_run)).await;

        let mut tick_interval = interval(TICK_INTERVAL);
        loop {
            tokio::select! {
                _ = tick_interval.tick() => {
                    run_tick(&ctx).await;
                }
                // Shutdown only lands between ticks, never inside one, so an
                // in-flight delivery pass always finishes
                _ = shutdown.changed() => {
                    info!("Reminder dispatch job shutting down");
                    break;
                }
            }
        }
    });
}

/// One evaluation and delivery pass. Every failure mode is contained here:
/// the loop above keeps ticking no matter what a single pass ran into.
async fn run_tick(ctx: &MatchbellContext) {
    let started_at = Instant::now();

    // An unavailable store aborts this tick only, the reminders are picked
    // up again on the next one while their window is open
    let due = match execute(GetDueRemindersUseCase {}, ctx).await {
        Ok(due) => due,
        Err(_) => return,
    };

    if due.is_empty() {
        return;
    }

    let report = dispatch_due_reminders(due, ctx).await;
    info!(
        "Reminder tick done in {:?}: {} sent, {} failed, {} skipped",
        started_at.elapsed(),
        report.sent,
        report.failed,
        report.skipped
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchbell_domain::{DueCandidate, Reminder, ReminderWithEvent, ID};
    use matchbell_infra::{DeleteResult, IReminderRepo};
    use std::sync::Arc;

    struct UnavailableReminderRepo;

    #[async_trait::async_trait]
    impl IReminderRepo for UnavailableReminderRepo {
        async fn insert(&self, _reminder: &Reminder) -> anyhow::Result<()> {
            anyhow::bail!("store unavailable")
        }
        async fn find_duplicate(
            &self,
            _subscriber_id: &ID,
            _event_id: &ID,
            _lead_hours: f64,
        ) -> Option<Reminder> {
            None
        }
        async fn find_by_subscriber(
            &self,
            _subscriber_id: &ID,
            _now: i64,
        ) -> anyhow::Result<Vec<ReminderWithEvent>> {
            anyhow::bail!("store unavailable")
        }
        async fn find_due_candidates(&self, _now: i64) -> anyhow::Result<Vec<DueCandidate>> {
            anyhow::bail!("store unavailable")
        }
        async fn mark_delivered(&self, _reminder_id: &ID) -> anyhow::Result<bool> {
            anyhow::bail!("store unavailable")
        }
        async fn delete(&self, _reminder_id: &ID, _subscriber_id: &ID) -> Option<Reminder> {
            None
        }
        async fn delete_by_subscriber(&self, _subscriber_id: &ID) -> anyhow::Result<DeleteResult> {
            anyhow::bail!("store unavailable")
        }
    }

    #[test]
    fn start_delay_aligns_to_half_minute_boundaries() {
        assert_eq!(get_start_delay(0), 30);
        assert_eq!(get_start_delay(1000), 29);
        assert_eq!(get_start_delay(29 * 1000), 1);
        assert_eq!(get_start_delay(30 * 1000), 30);
        assert_eq!(get_start_delay(59 * 1000), 1);
        assert_eq!(get_start_delay(60 * 1000), 30);
        assert_eq!(get_start_delay(1613862000000 + 45 * 1000), 15);
    }

    #[tokio::test]
    async fn tick_survives_an_unavailable_store() {
        let mut ctx = MatchbellContext::create_inmemory();
        ctx.repos.reminders = Arc::new(UnavailableReminderRepo {});

        // Must return, not panic, leaving the loop free to try again
        run_tick(&ctx).await;
    }

    #[tokio::test]
    async fn tick_with_nothing_due_is_a_noop() {
        let ctx = MatchbellContext::create_inmemory();
        run_tick(&ctx).await;
    }
}
