use crate::shared::usecase::UseCase;
use matchbell_domain::{DueCandidate, DueState};
use matchbell_infra::MatchbellContext;
use tracing::warn;

/// Evaluates which pending reminders must fire on this tick.
///
/// Pure with respect to external state: it reads the candidate set and
/// classifies every reminder against its tolerance window, but mutates
/// nothing. Delivery idempotency is the dispatcher's job, enforced through
/// the delivered flag, never through this evaluator.
#[derive(Debug)]
pub struct GetDueRemindersUseCase {}

#[derive(Debug)]
pub enum UseCaseErrors {
    /// The candidate query failed; the whole tick is aborted and retried
    /// from scratch on the next one
    StoreUnavailable,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetDueRemindersUseCase {
    type Response = Vec<DueCandidate>;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &MatchbellContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();
        let candidates = ctx
            .repos
            .reminders
            .find_due_candidates(now)
            .await
            .map_err(|_| UseCaseErrors::StoreUnavailable)?;

        Ok(evaluate_due_set(now, candidates))
    }
}

/// Splits the candidates into the three window regions and returns exactly
/// the due ones, earliest event first.
pub fn evaluate_due_set(now: i64, candidates: Vec<DueCandidate>) -> Vec<DueCandidate> {
    let mut due = Vec::new();
    let mut missed = 0;

    for candidate in candidates {
        match candidate.due_state(now) {
            DueState::Due => due.push(candidate),
            DueState::NotYetDue => {}
            // Stale-drop: past the window without firing, e.g. because the
            // process was down. Not retried, only surfaced here.
            DueState::Missed => missed += 1,
        }
    }

    if missed > 0 {
        warn!(
            "{} reminder(s) passed their tolerance window without being delivered",
            missed
        );
    }

    due.sort_by_key(|c| c.event.start_time);
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use matchbell_domain::{
        MatchEvent, Reminder, Sport, Subscriber, GRACE_OFFSET_MILLIS, TOLERANCE_WINDOW_MILLIS,
    };
    use matchbell_infra::ISys;
    use std::sync::Arc;

    const NOW: i64 = 1613862000000;

    struct StaticTimeSys;
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            NOW
        }
    }

    async fn insert_reminder(
        ctx: &MatchbellContext,
        subscriber: &Subscriber,
        event_start: i64,
        lead_hours: f64,
    ) -> Reminder {
        let event = MatchEvent {
            id: Default::default(),
            sport: Sport::Football,
            home: "Arsenal".into(),
            away: "Chelsea".into(),
            start_time: event_start,
            tournament: "Premier League".into(),
        };
        ctx.repos.match_events.insert(&event).await.unwrap();
        let reminder = Reminder::new(subscriber.id.clone(), event.id, lead_hours, 0);
        ctx.repos.reminders.insert(&reminder).await.unwrap();
        reminder
    }

    async fn setup() -> (MatchbellContext, Subscriber) {
        let mut ctx = MatchbellContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys {});
        let subscriber = Subscriber::new(42, None);
        ctx.repos.subscribers.insert(&subscriber).await.unwrap();
        (ctx, subscriber)
    }

    #[tokio::test]
    async fn returns_only_the_due_region_sorted_by_event_start() {
        let (ctx, subscriber) = setup().await;

        // lead 1h: fire instant = start - 59min, so an event starting in
        // 59 minutes is due right now
        let due_late = insert_reminder(&ctx, &subscriber, NOW + 59 * 60 * 1000, 1.0).await;
        // second due reminder with an earlier event start
        let due_early = insert_reminder(
            &ctx,
            &subscriber,
            NOW + 29 * 60 * 1000,
            0.5,
        )
        .await;
        // not yet due: fires in ~31s, just outside the window
        insert_reminder(
            &ctx,
            &subscriber,
            NOW + 59 * 60 * 1000 + TOLERANCE_WINDOW_MILLIS + 1000,
            1.0,
        )
        .await;
        // missed: fire instant passed 61s ago
        insert_reminder(&ctx, &subscriber, NOW + 59 * 60 * 1000 - 61 * 1000, 1.0).await;

        let due = execute(GetDueRemindersUseCase {}, &ctx).await.unwrap();

        assert_eq!(due.len(), 2);
        assert_eq!(due[0].reminder_id, due_early.id);
        assert_eq!(due[1].reminder_id, due_late.id);
    }

    #[tokio::test]
    async fn delivered_reminders_are_never_candidates() {
        let (ctx, subscriber) = setup().await;

        let reminder = insert_reminder(&ctx, &subscriber, NOW + 59 * 60 * 1000, 1.0).await;
        assert!(ctx.repos.reminders.mark_delivered(&reminder.id).await.unwrap());

        let due = execute(GetDueRemindersUseCase {}, &ctx).await.unwrap();
        assert!(due.is_empty());
    }

    #[tokio::test]
    async fn started_event_with_open_window_still_gets_its_last_sweep() {
        let (ctx, subscriber) = setup().await;

        // Lead of one minute: fire instant = start - 1min + 1min grace =
        // start itself. At `now` the event started GRACE_OFFSET ago... use
        // a start slightly in the past with the window still open.
        let start = NOW - GRACE_OFFSET_MILLIS + TOLERANCE_WINDOW_MILLIS;
        let reminder = insert_reminder(&ctx, &subscriber, start, 1.0 / 60.0).await;
        // fire = start - 1min + 1min = start = NOW - 30s: edge of the window

        let due = execute(GetDueRemindersUseCase {}, &ctx).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].reminder_id, reminder.id);
    }

    #[test]
    fn evaluate_due_set_is_empty_for_no_candidates() {
        assert!(evaluate_due_set(NOW, Vec::new()).is_empty());
    }
}
