mod match_event;
mod reminder;
mod shared;
mod subscriber;

pub use match_event::{MatchEvent, Sport};
pub use reminder::{
    fire_instant, lead_millis, DueCandidate, DueState, Reminder, ReminderWithEvent,
    GRACE_OFFSET_MILLIS, MILLIS_PER_HOUR, MIN_LEAD_HOURS, TOLERANCE_WINDOW_MILLIS,
};
pub use shared::entity::{Entity, ID};
pub use subscriber::Subscriber;
