use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Football,
    Basketball,
}

impl Sport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Football => "football",
            Self::Basketball => "basketball",
        }
    }
}

impl Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum InvalidSportError {
    #[error("Sport: {0} is not supported")]
    Unsupported(String),
}

impl FromStr for Sport {
    type Err = InvalidSportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "football" => Ok(Self::Football),
            "basketball" => Ok(Self::Basketball),
            _ => Err(InvalidSportError::Unsupported(s.to_string())),
        }
    }
}

/// A scheduled match imported into the event catalog. Immutable once
/// imported for a given run: the reminder engine only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub id: ID,
    pub sport: Sport,
    pub home: String,
    pub away: String,
    /// Start instant as UTC millis
    pub start_time: i64,
    pub tournament: String,
}

impl Entity for MatchEvent {
    fn id(&self) -> ID {
        self.id.clone()
    }
}
