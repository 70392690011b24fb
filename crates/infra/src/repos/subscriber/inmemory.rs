use super::ISubscriberRepo;
use crate::repos::shared::inmemory_repo::*;
use matchbell_domain::{Subscriber, ID};
use std::sync::{Arc, Mutex};

pub struct InMemorySubscriberRepo {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl InMemorySubscriberRepo {
    pub fn new(subscribers: Arc<Mutex<Vec<Subscriber>>>) -> Self {
        Self { subscribers }
    }
}

#[async_trait::async_trait]
impl ISubscriberRepo for InMemorySubscriberRepo {
    async fn insert(&self, subscriber: &Subscriber) -> anyhow::Result<()> {
        if self.find_by_channel(subscriber.channel_id).await.is_none() {
            insert(subscriber, &self.subscribers);
        }
        Ok(())
    }

    async fn find(&self, subscriber_id: &ID) -> Option<Subscriber> {
        find(subscriber_id, &self.subscribers)
    }

    async fn find_by_channel(&self, channel_id: i64) -> Option<Subscriber> {
        find_by(&self.subscribers, |s| s.channel_id == channel_id)
            .into_iter()
            .next()
    }
}
