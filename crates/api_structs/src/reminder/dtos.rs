use crate::match_event::dtos::MatchEventDTO;
use matchbell_domain::{ReminderWithEvent, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub lead_hours: f64,
    pub delivered: bool,
    pub created_at: i64,
    pub event: MatchEventDTO,
}

impl ReminderDTO {
    pub fn new(reminder: ReminderWithEvent) -> Self {
        Self {
            id: reminder.reminder.id,
            lead_hours: reminder.reminder.lead_hours,
            delivered: reminder.reminder.delivered,
            created_at: reminder.reminder.created_at,
            event: MatchEventDTO::new(reminder.event),
        }
    }
}
