use crate::match_event::MatchEvent;
use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

pub const MILLIS_PER_HOUR: i64 = 1000 * 60 * 60;

/// Fixed forward nudge applied to every fire instant so that a tick arriving
/// slightly before the nominal instant does not fire marginally early
/// relative to what the subscriber asked for.
pub const GRACE_OFFSET_MILLIS: i64 = 1000 * 60;

/// Symmetric interval around the fire instant during which a reminder counts
/// as due. The polling cadence must stay at or below twice this value,
/// otherwise a reminder can slip between two ticks without ever being due.
pub const TOLERANCE_WINDOW_MILLIS: i64 = 1000 * 30;

/// Smallest usable lead time: one minute, expressed in fractional hours
pub const MIN_LEAD_HOURS: f64 = 1.0 / 60.0;

/// A `Reminder` asks for one notification to a `Subscriber` a given lead
/// time before a `MatchEvent` starts. `delivered` flips false -> true
/// exactly once and never reverts; the persisted flag is the single source
/// of truth for "already sent".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ID,
    pub subscriber_id: ID,
    pub event_id: ID,
    /// Lead time before the event start, in fractional hours.
    /// Supports sub-hour precision down to one minute (1/60).
    pub lead_hours: f64,
    pub delivered: bool,
    /// Creation instant as UTC millis
    pub created_at: i64,
}

impl Reminder {
    pub fn new(subscriber_id: ID, event_id: ID, lead_hours: f64, created_at: i64) -> Self {
        Self {
            id: Default::default(),
            subscriber_id,
            event_id,
            lead_hours,
            delivered: false,
            created_at,
        }
    }
}

impl Entity for Reminder {
    fn id(&self) -> ID {
        self.id.clone()
    }
}

/// A `Reminder` joined with its `MatchEvent`, as returned when listing a
/// subscriber's pending reminders.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderWithEvent {
    pub reminder: Reminder,
    pub event: MatchEvent,
}

/// Where a reminder sits relative to its tolerance window at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueState {
    NotYetDue,
    Due,
    /// Past the tolerance window without having fired. Accepted stale-drop:
    /// never retried, only surfaced through logs.
    Missed,
}

/// The lead time converted to millis. Rounded, not truncated, so that the
/// fractional-hour representation keeps minute-level precision within one
/// second of drift.
pub fn lead_millis(lead_hours: f64) -> i64 {
    (lead_hours * MILLIS_PER_HOUR as f64).round() as i64
}

/// The absolute instant a reminder should be delivered:
/// event start minus lead time, plus the grace offset.
pub fn fire_instant(event_start: i64, lead_hours: f64) -> i64 {
    event_start - lead_millis(lead_hours) + GRACE_OFFSET_MILLIS
}

/// A non-delivered reminder joined with everything the dispatcher needs to
/// act on it: the target channel and the event it reminds about.
#[derive(Debug, Clone, PartialEq)]
pub struct DueCandidate {
    pub reminder_id: ID,
    /// Chat channel of the owning subscriber
    pub channel_id: i64,
    pub lead_hours: f64,
    pub event: MatchEvent,
}

impl DueCandidate {
    pub fn fire_at(&self) -> i64 {
        fire_instant(self.event.start_time, self.lead_hours)
    }

    pub fn due_state(&self, now: i64) -> DueState {
        let diff = now - self.fire_at();
        if diff < -TOLERANCE_WINDOW_MILLIS {
            DueState::NotYetDue
        } else if diff > TOLERANCE_WINDOW_MILLIS {
            DueState::Missed
        } else {
            DueState::Due
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_event::Sport;

    fn candidate(event_start: i64, lead_hours: f64) -> DueCandidate {
        DueCandidate {
            reminder_id: Default::default(),
            channel_id: 42,
            lead_hours,
            event: MatchEvent {
                id: Default::default(),
                sport: Sport::Football,
                home: "Arsenal".into(),
                away: "Chelsea".into(),
                start_time: event_start,
                tournament: "Premier League".into(),
            },
        }
    }

    #[test]
    fn fire_instant_is_start_minus_lead_plus_grace() {
        let start = 1000 * 60 * 60 * 24; // T
        let c = candidate(start, 1.0);
        // lead 1h => fire at T - 59min
        assert_eq!(c.fire_at(), start - 59 * 60 * 1000);
    }

    #[test]
    fn tick_at_fire_instant_is_due_and_61_seconds_later_is_missed() {
        let start = 1000 * 60 * 60 * 24;
        let c = candidate(start, 1.0);
        let fire = c.fire_at();

        assert_eq!(c.due_state(fire), DueState::Due);
        assert_eq!(c.due_state(fire - TOLERANCE_WINDOW_MILLIS), DueState::Due);
        assert_eq!(c.due_state(fire + TOLERANCE_WINDOW_MILLIS), DueState::Due);
        assert_eq!(
            c.due_state(fire - TOLERANCE_WINDOW_MILLIS - 1),
            DueState::NotYetDue
        );
        // 61 seconds after the fire instant the window has closed
        assert_eq!(c.due_state(fire + 61 * 1000), DueState::Missed);
    }

    #[test]
    fn two_minute_lead_keeps_minute_precision() {
        let start = 1613862000000;
        let c = candidate(start, 2.0 / 60.0);
        // lead 2min => fire at T - 2min + 1min grace = T - 1min
        assert_eq!(c.fire_at(), start - 60 * 1000);
    }

    #[test]
    fn fractional_hour_round_trip_drift_stays_under_one_second() {
        for minutes in 1..=600i64 {
            let lead_hours = minutes as f64 / 60.0;
            let drift = (lead_millis(lead_hours) - minutes * 60 * 1000).abs();
            assert!(drift < 1000, "lead of {} minutes drifted {}ms", minutes, drift);
        }
    }

    #[test]
    fn window_coverage_with_thirty_second_cadence() {
        // Sampling on a fixed 30s grid, every fire instant must land inside
        // the tolerance window of at least one tick.
        let tick_interval = 30 * 1000;
        assert!(tick_interval <= 2 * TOLERANCE_WINDOW_MILLIS);

        for offset in (0..tick_interval).step_by(250) {
            let fire = 1000 * 60 * 60 + offset;
            let covered = (0..10)
                .map(|i| 1000 * 60 * 60 + i * tick_interval)
                .any(|tick| (tick - fire).abs() <= TOLERANCE_WINDOW_MILLIS);
            assert!(covered, "fire instant at offset {} never observed", offset);
        }
    }
}
