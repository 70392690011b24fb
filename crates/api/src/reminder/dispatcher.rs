use chrono::{TimeZone, Utc};
use matchbell_domain::{lead_millis, DueCandidate, Sport};
use matchbell_infra::MatchbellContext;
use tokio::time::timeout;
use tracing::{debug, error, warn};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Notifications confirmed sent and flagged delivered
    pub sent: usize,
    /// Transport failures, retried on the next tick while the window is open
    pub failed: usize,
    /// Reminders someone else delivered between evaluation and dispatch
    pub skipped: usize,
}

/// Sends one notification per due reminder and flags it delivered on a
/// confirmed send. The candidates arrive ordered by event start from the
/// evaluator; that order is kept so the logs read predictably.
///
/// Failures are isolated per reminder: a dead channel or a lost flag update
/// never aborts the rest of the pass.
pub async fn dispatch_due_reminders(
    due: Vec<DueCandidate>,
    ctx: &MatchbellContext,
) -> DispatchReport {
    let mut report = DispatchReport::default();

    for candidate in due {
        let text = format_notification(&candidate);
        let send = timeout(
            ctx.config.send_timeout(),
            ctx.channel.send(candidate.channel_id, &text),
        )
        .await;

        match send {
            Ok(Ok(())) => match ctx.repos.reminders.mark_delivered(&candidate.reminder_id).await {
                Ok(true) => report.sent += 1,
                Ok(false) => {
                    debug!(
                        "Reminder {} was already delivered, skipping",
                        candidate.reminder_id
                    );
                    report.skipped += 1;
                }
                Err(e) => {
                    // The notification went out but the flag did not stick;
                    // the next tick may send a duplicate
                    error!(
                        "Failed to flag reminder {} as delivered: {:?}",
                        candidate.reminder_id, e
                    );
                    report.failed += 1;
                }
            },
            Ok(Err(e)) => {
                warn!(
                    "Delivery of reminder {} to channel {} failed: {:?}",
                    candidate.reminder_id, candidate.channel_id, e
                );
                report.failed += 1;
            }
            Err(_) => {
                warn!(
                    "Delivery of reminder {} to channel {} timed out after {}ms",
                    candidate.reminder_id,
                    candidate.channel_id,
                    ctx.config.send_timeout_millis
                );
                report.failed += 1;
            }
        }
    }

    report
}

fn sport_emoji(sport: Sport) -> &'static str {
    match sport {
        Sport::Football => "⚽",
        Sport::Basketball => "🏀",
    }
}

fn format_notification(candidate: &DueCandidate) -> String {
    let kickoff = Utc
        .timestamp_millis(candidate.event.start_time)
        .format("%d.%m.%Y %H:%M UTC");
    let lead_minutes = lead_millis(candidate.lead_hours) / (1000 * 60);

    format!(
        "{} *{}* 🆚 *{}*\n🏆 {}\n📅 {}\n⏰ Starts in {} minutes",
        sport_emoji(candidate.event.sport),
        candidate.event.home,
        candidate.event.away,
        candidate.event.tournament,
        kickoff,
        lead_minutes
    )
}
