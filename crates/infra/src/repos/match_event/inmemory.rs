use super::IMatchEventRepo;
use crate::repos::shared::inmemory_repo::*;
use matchbell_domain::{MatchEvent, Sport, ID};
use std::sync::{Arc, Mutex};

pub struct InMemoryMatchEventRepo {
    match_events: Arc<Mutex<Vec<MatchEvent>>>,
}

impl InMemoryMatchEventRepo {
    pub fn new(match_events: Arc<Mutex<Vec<MatchEvent>>>) -> Self {
        Self { match_events }
    }
}

#[async_trait::async_trait]
impl IMatchEventRepo for InMemoryMatchEventRepo {
    async fn insert(&self, event: &MatchEvent) -> anyhow::Result<()> {
        insert(event, &self.match_events);
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<MatchEvent> {
        find(event_id, &self.match_events)
    }

    async fn find_upcoming_by_sport(
        &self,
        sport: Sport,
        after: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<MatchEvent>> {
        let mut events = find_by(&self.match_events, |e| {
            e.sport == sport && e.start_time > after
        });
        events.sort_by_key(|e| e.start_time);
        events.truncate(limit as usize);
        Ok(events)
    }
}
