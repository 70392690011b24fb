use super::IMatchEventRepo;
use matchbell_domain::{MatchEvent, Sport, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;

pub struct PostgresMatchEventRepo {
    pool: PgPool,
}

impl PostgresMatchEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct MatchEventRaw {
    pub event_uid: Uuid,
    pub sport: String,
    pub home: String,
    pub away: String,
    pub start_time: i64,
    pub tournament: String,
}

impl TryFrom<MatchEventRaw> for MatchEvent {
    type Error = anyhow::Error;

    fn try_from(raw: MatchEventRaw) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ID::from(raw.event_uid),
            sport: raw.sport.parse()?,
            home: raw.home,
            away: raw.away,
            start_time: raw.start_time,
            tournament: raw.tournament,
        })
    }
}

#[async_trait::async_trait]
impl IMatchEventRepo for PostgresMatchEventRepo {
    async fn insert(&self, event: &MatchEvent) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO match_events
            (event_uid, sport, home, away, start_time, tournament)
            VALUES($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(event.id.inner_ref())
        .bind(event.sport.as_str())
        .bind(&event.home)
        .bind(&event.away)
        .bind(event.start_time)
        .bind(&event.tournament)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<MatchEvent> {
        sqlx::query_as::<_, MatchEventRaw>(
            r#"
            SELECT * FROM match_events AS m
            WHERE m.event_uid = $1
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .and_then(|m| MatchEvent::try_from(m).ok())
    }

    async fn find_upcoming_by_sport(
        &self,
        sport: Sport,
        after: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<MatchEvent>> {
        let events = sqlx::query_as::<_, MatchEventRaw>(
            r#"
            SELECT * FROM match_events AS m
            WHERE m.sport = $1 AND m.start_time > $2
            ORDER BY m.start_time ASC
            LIMIT $3
            "#,
        )
        .bind(sport.as_str())
        .bind(after)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        events.into_iter().map(MatchEvent::try_from).collect()
    }
}
