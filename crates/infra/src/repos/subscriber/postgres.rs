use super::ISubscriberRepo;
use matchbell_domain::{Subscriber, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresSubscriberRepo {
    pool: PgPool,
}

impl PostgresSubscriberRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SubscriberRaw {
    subscriber_uid: Uuid,
    channel_id: i64,
    username: Option<String>,
}

impl From<SubscriberRaw> for Subscriber {
    fn from(raw: SubscriberRaw) -> Self {
        Self {
            id: ID::from(raw.subscriber_uid),
            channel_id: raw.channel_id,
            username: raw.username,
        }
    }
}

#[async_trait::async_trait]
impl ISubscriberRepo for PostgresSubscriberRepo {
    async fn insert(&self, subscriber: &Subscriber) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO subscribers
            (subscriber_uid, channel_id, username)
            VALUES($1, $2, $3)
            ON CONFLICT (channel_id) DO NOTHING
            "#,
        )
        .bind(subscriber.id.inner_ref())
        .bind(subscriber.channel_id)
        .bind(&subscriber.username)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, subscriber_id: &ID) -> Option<Subscriber> {
        sqlx::query_as::<_, SubscriberRaw>(
            r#"
            SELECT * FROM subscribers AS s
            WHERE s.subscriber_uid = $1
            "#,
        )
        .bind(subscriber_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|s| s.into())
    }

    async fn find_by_channel(&self, channel_id: i64) -> Option<Subscriber> {
        sqlx::query_as::<_, SubscriberRaw>(
            r#"
            SELECT * FROM subscribers AS s
            WHERE s.channel_id = $1
            "#,
        )
        .bind(channel_id)
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|s| s.into())
    }
}
