use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// A `Subscriber` is the owner of `Reminder`s and the receiver of the
/// notifications they produce. One `Subscriber` per chat channel, created
/// lazily the first time a channel asks for a reminder and never deleted
/// by this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: ID,
    /// External chat channel identifier (a Telegram chat id)
    pub channel_id: i64,
    pub username: Option<String>,
}

impl Subscriber {
    pub fn new(channel_id: i64, username: Option<String>) -> Self {
        Self {
            id: Default::default(),
            channel_id,
            username,
        }
    }
}

impl Entity for Subscriber {
    fn id(&self) -> ID {
        self.id.clone()
    }
}
