use super::IReminderRepo;
use crate::repos::shared::repo::DeleteResult;
use matchbell_domain::{
    lead_millis, DueCandidate, MatchEvent, Reminder, ReminderWithEvent, ID,
    GRACE_OFFSET_MILLIS, MILLIS_PER_HOUR, TOLERANCE_WINDOW_MILLIS,
};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    subscriber_uid: Uuid,
    event_uid: Uuid,
    lead_hours: f64,
    delivered: bool,
    created_at: i64,
}

impl From<ReminderRaw> for Reminder {
    fn from(raw: ReminderRaw) -> Self {
        Self {
            id: ID::from(raw.reminder_uid),
            subscriber_id: ID::from(raw.subscriber_uid),
            event_id: ID::from(raw.event_uid),
            lead_hours: raw.lead_hours,
            delivered: raw.delivered,
            created_at: raw.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ReminderWithEventRaw {
    reminder_uid: Uuid,
    subscriber_uid: Uuid,
    event_uid: Uuid,
    lead_hours: f64,
    delivered: bool,
    created_at: i64,
    sport: String,
    home: String,
    away: String,
    start_time: i64,
    tournament: String,
}

impl TryFrom<ReminderWithEventRaw> for ReminderWithEvent {
    type Error = anyhow::Error;

    fn try_from(raw: ReminderWithEventRaw) -> Result<Self, Self::Error> {
        Ok(Self {
            reminder: Reminder {
                id: ID::from(raw.reminder_uid),
                subscriber_id: ID::from(raw.subscriber_uid),
                event_id: ID::from(raw.event_uid),
                lead_hours: raw.lead_hours,
                delivered: raw.delivered,
                created_at: raw.created_at,
            },
            event: MatchEvent {
                id: ID::from(raw.event_uid),
                sport: raw.sport.parse()?,
                home: raw.home,
                away: raw.away,
                start_time: raw.start_time,
                tournament: raw.tournament,
            },
        })
    }
}

#[derive(Debug, FromRow)]
struct DueCandidateRaw {
    reminder_uid: Uuid,
    channel_id: i64,
    lead_hours: f64,
    event_uid: Uuid,
    sport: String,
    home: String,
    away: String,
    start_time: i64,
    tournament: String,
}

impl TryFrom<DueCandidateRaw> for DueCandidate {
    type Error = anyhow::Error;

    fn try_from(raw: DueCandidateRaw) -> Result<Self, Self::Error> {
        Ok(Self {
            reminder_id: ID::from(raw.reminder_uid),
            channel_id: raw.channel_id,
            lead_hours: raw.lead_hours,
            event: MatchEvent {
                id: ID::from(raw.event_uid),
                sport: raw.sport.parse()?,
                home: raw.home,
                away: raw.away,
                start_time: raw.start_time,
                tournament: raw.tournament,
            },
        })
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminders
            (reminder_uid, subscriber_uid, event_uid, lead_hours, delivered, created_at)
            VALUES($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(reminder.subscriber_id.inner_ref())
        .bind(reminder.event_id.inner_ref())
        .bind(reminder.lead_hours)
        .bind(reminder.delivered)
        .bind(reminder.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_duplicate(
        &self,
        subscriber_id: &ID,
        event_id: &ID,
        lead_hours: f64,
    ) -> Option<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.subscriber_uid = $1 AND r.event_uid = $2
                AND ROUND(r.lead_hours * $3)::BIGINT = $4
                AND r.delivered = FALSE
            "#,
        )
        .bind(subscriber_id.inner_ref())
        .bind(event_id.inner_ref())
        .bind(MILLIS_PER_HOUR as f64)
        .bind(lead_millis(lead_hours))
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|r| r.into())
    }

    async fn find_by_subscriber(
        &self,
        subscriber_id: &ID,
        now: i64,
    ) -> anyhow::Result<Vec<ReminderWithEvent>> {
        let reminders = sqlx::query_as::<_, ReminderWithEventRaw>(
            r#"
            SELECT r.reminder_uid, r.subscriber_uid, r.event_uid, r.lead_hours,
                   r.delivered, r.created_at,
                   m.sport, m.home, m.away, m.start_time, m.tournament
            FROM reminders AS r
            INNER JOIN match_events AS m ON m.event_uid = r.event_uid
            WHERE r.subscriber_uid = $1 AND r.delivered = FALSE AND m.start_time > $2
            ORDER BY m.start_time ASC
            "#,
        )
        .bind(subscriber_id.inner_ref())
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        reminders
            .into_iter()
            .map(ReminderWithEvent::try_from)
            .collect()
    }

    async fn find_due_candidates(&self, now: i64) -> anyhow::Result<Vec<DueCandidate>> {
        // Non-delivered reminders whose event has not started, plus the last
        // sweep for reminders whose fire window is still open even though
        // the event already kicked off.
        let candidates = sqlx::query_as::<_, DueCandidateRaw>(
            r#"
            SELECT r.reminder_uid, r.lead_hours, s.channel_id,
                   m.event_uid, m.sport, m.home, m.away, m.start_time, m.tournament
            FROM reminders AS r
            INNER JOIN subscribers AS s ON s.subscriber_uid = r.subscriber_uid
            INNER JOIN match_events AS m ON m.event_uid = r.event_uid
            WHERE r.delivered = FALSE
                AND (m.start_time > $1
                     OR m.start_time - ROUND(r.lead_hours * $2)::BIGINT + $3 >= $1 - $4)
            ORDER BY m.start_time ASC
            "#,
        )
        .bind(now)
        .bind(MILLIS_PER_HOUR as f64)
        .bind(GRACE_OFFSET_MILLIS)
        .bind(TOLERANCE_WINDOW_MILLIS)
        .fetch_all(&self.pool)
        .await?;

        candidates.into_iter().map(DueCandidate::try_from).collect()
    }

    async fn mark_delivered(&self, reminder_id: &ID) -> anyhow::Result<bool> {
        // Single conditional UPDATE so that two racing dispatch attempts
        // resolve to exactly one winner at the storage layer.
        let res = sqlx::query(
            r#"
            UPDATE reminders AS r
            SET delivered = TRUE
            WHERE r.reminder_uid = $1 AND r.delivered = FALSE
            "#,
        )
        .bind(reminder_id.inner_ref())
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    async fn delete(&self, reminder_id: &ID, subscriber_id: &ID) -> Option<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            DELETE FROM reminders AS r
            WHERE r.reminder_uid = $1 AND r.subscriber_uid = $2
            RETURNING *
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(subscriber_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|r| r.into())
    }

    async fn delete_by_subscriber(&self, subscriber_id: &ID) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query(
            r#"
            DELETE FROM reminders AS r
            WHERE r.subscriber_uid = $1
            "#,
        )
        .bind(subscriber_id.inner_ref())
        .execute(&self.pool)
        .await?;

        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }
}
