use matchbell_domain::{MatchEvent, Sport, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MatchEventDTO {
    pub id: ID,
    pub sport: Sport,
    pub home: String,
    pub away: String,
    pub start_time: i64,
    pub tournament: String,
}

impl MatchEventDTO {
    pub fn new(event: MatchEvent) -> Self {
        Self {
            id: event.id,
            sport: event.sport,
            home: event.home,
            away: event.away,
            start_time: event.start_time,
            tournament: event.tournament,
        }
    }
}
