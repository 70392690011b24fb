use crate::dtos::MatchEventDTO;
use matchbell_domain::{MatchEvent, Sport};
use serde::{Deserialize, Serialize};

pub mod get_upcoming_events {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub sport: Sport,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub events: Vec<MatchEventDTO>,
    }

    impl APIResponse {
        pub fn new(events: Vec<MatchEvent>) -> Self {
            Self {
                events: events.into_iter().map(MatchEventDTO::new).collect(),
            }
        }
    }
}
