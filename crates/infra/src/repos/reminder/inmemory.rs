use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::repo::DeleteResult;
use matchbell_domain::{
    fire_instant, lead_millis, DueCandidate, MatchEvent, Reminder, ReminderWithEvent, Subscriber,
    ID, TOLERANCE_WINDOW_MILLIS,
};
use std::sync::{Arc, Mutex};

pub struct InMemoryReminderRepo {
    reminders: Mutex<Vec<Reminder>>,
    // Shared with the subscriber and match event repos so that the joined
    // queries behave like their SQL counterparts.
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
    match_events: Arc<Mutex<Vec<MatchEvent>>>,
}

impl InMemoryReminderRepo {
    pub fn new(
        subscribers: Arc<Mutex<Vec<Subscriber>>>,
        match_events: Arc<Mutex<Vec<MatchEvent>>>,
    ) -> Self {
        Self {
            reminders: Mutex::new(Vec::new()),
            subscribers,
            match_events,
        }
    }

    fn find_event(&self, event_id: &ID) -> Option<MatchEvent> {
        find(event_id, &self.match_events)
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders);
        Ok(())
    }

    async fn find_duplicate(
        &self,
        subscriber_id: &ID,
        event_id: &ID,
        lead_hours: f64,
    ) -> Option<Reminder> {
        find_by(&self.reminders, |r| {
            !r.delivered
                && r.subscriber_id == *subscriber_id
                && r.event_id == *event_id
                && lead_millis(r.lead_hours) == lead_millis(lead_hours)
        })
        .into_iter()
        .next()
    }

    async fn find_by_subscriber(
        &self,
        subscriber_id: &ID,
        now: i64,
    ) -> anyhow::Result<Vec<ReminderWithEvent>> {
        let reminders = find_by(&self.reminders, |r| {
            !r.delivered && r.subscriber_id == *subscriber_id
        });

        let mut with_events: Vec<ReminderWithEvent> = reminders
            .into_iter()
            .filter_map(|reminder| {
                let event = self.find_event(&reminder.event_id)?;
                if event.start_time > now {
                    Some(ReminderWithEvent { reminder, event })
                } else {
                    None
                }
            })
            .collect();
        with_events.sort_by_key(|r| r.event.start_time);
        Ok(with_events)
    }

    async fn find_due_candidates(&self, now: i64) -> anyhow::Result<Vec<DueCandidate>> {
        let pending = find_by(&self.reminders, |r| !r.delivered);

        let mut candidates: Vec<DueCandidate> = pending
            .into_iter()
            .filter_map(|reminder| {
                let event = self.find_event(&reminder.event_id)?;
                let window_open = fire_instant(event.start_time, reminder.lead_hours)
                    >= now - TOLERANCE_WINDOW_MILLIS;
                if event.start_time <= now && !window_open {
                    return None;
                }
                let channel_id = find(&reminder.subscriber_id, &self.subscribers)?.channel_id;
                Some(DueCandidate {
                    reminder_id: reminder.id,
                    channel_id,
                    lead_hours: reminder.lead_hours,
                    event,
                })
            })
            .collect();
        candidates.sort_by_key(|c| c.event.start_time);
        Ok(candidates)
    }

    async fn mark_delivered(&self, reminder_id: &ID) -> anyhow::Result<bool> {
        // Compare-and-set under one lock: the first caller flips the flag,
        // every later caller observes an already-delivered reminder.
        let mut reminders = self.reminders.lock().unwrap();
        match reminders.iter_mut().find(|r| r.id == *reminder_id) {
            Some(reminder) if !reminder.delivered => {
                reminder.delivered = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, reminder_id: &ID, subscriber_id: &ID) -> Option<Reminder> {
        find_and_delete_by(&self.reminders, |r| {
            r.id == *reminder_id && r.subscriber_id == *subscriber_id
        })
        .into_iter()
        .next()
    }

    async fn delete_by_subscriber(&self, subscriber_id: &ID) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.reminders, |r| {
            r.subscriber_id == *subscriber_id
        }))
    }
}
