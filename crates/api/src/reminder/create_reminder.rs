use crate::error::MatchbellError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use matchbell_api_structs::create_reminder::*;
use matchbell_domain::{ReminderWithEvent, Reminder, Subscriber, ID, MIN_LEAD_HOURS};
use matchbell_infra::MatchbellContext;

fn handle_error(e: UseCaseErrors) -> MatchbellError {
    match e {
        UseCaseErrors::EventNotFound(event_id) => MatchbellError::NotFound(format!(
            "The match event with id: {}, was not found.",
            event_id
        )),
        UseCaseErrors::EventAlreadyStarted => MatchbellError::BadClientData(
            "The match event has already started".into(),
        ),
        UseCaseErrors::InvalidLeadTime(lead_hours) => MatchbellError::BadClientData(format!(
            "Lead time of {} hours is not usable, the smallest unit is one minute (1/60)",
            lead_hours
        )),
        UseCaseErrors::StorageError => MatchbellError::InternalError,
    }
}

pub async fn create_reminder_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<MatchbellContext>,
) -> Result<HttpResponse, MatchbellError> {
    protect_route(&http_req, &ctx)?;

    let body = body.into_inner();
    let usecase = CreateReminderUseCase {
        channel_id: path_params.channel_id,
        username: body.username,
        event_id: body.event_id,
        lead_hours: body.lead_hours,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub channel_id: i64,
    pub username: Option<String>,
    pub event_id: ID,
    pub lead_hours: f64,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    EventNotFound(ID),
    EventAlreadyStarted,
    InvalidLeadTime(f64),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = ReminderWithEvent;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &MatchbellContext) -> Result<Self::Response, Self::Errors> {
        if !self.lead_hours.is_finite() || self.lead_hours < MIN_LEAD_HOURS {
            return Err(UseCaseErrors::InvalidLeadTime(self.lead_hours));
        }

        let event = match ctx.repos.match_events.find(&self.event_id).await {
            Some(event) => event,
            None => return Err(UseCaseErrors::EventNotFound(self.event_id.clone())),
        };

        let now = ctx.sys.get_timestamp_millis();
        if event.start_time <= now {
            return Err(UseCaseErrors::EventAlreadyStarted);
        }

        // Subscribers are created lazily on first contact
        let subscriber = match ctx.repos.subscribers.find_by_channel(self.channel_id).await {
            Some(subscriber) => subscriber,
            None => {
                let subscriber = Subscriber::new(self.channel_id, self.username.clone());
                ctx.repos
                    .subscribers
                    .insert(&subscriber)
                    .await
                    .map_err(|_| UseCaseErrors::StorageError)?;
                // Re-read in case a concurrent request won the insert race
                ctx.repos
                    .subscribers
                    .find_by_channel(self.channel_id)
                    .await
                    .unwrap_or(subscriber)
            }
        };

        // Dedup: an undelivered reminder for the same triple is returned
        // instead of inserting a second one
        if let Some(existing) = ctx
            .repos
            .reminders
            .find_duplicate(&subscriber.id, &event.id, self.lead_hours)
            .await
        {
            return Ok(ReminderWithEvent {
                reminder: existing,
                event,
            });
        }

        let reminder = Reminder::new(subscriber.id, event.id.clone(), self.lead_hours, now);
        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        Ok(ReminderWithEvent { reminder, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchbell_domain::{MatchEvent, Sport};
    use matchbell_infra::ISys;
    use std::sync::Arc;

    struct StaticTimeSys;
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            1613862000000
        }
    }

    fn event_starting_in(millis_from_now: i64) -> MatchEvent {
        MatchEvent {
            id: Default::default(),
            sport: Sport::Football,
            home: "Arsenal".into(),
            away: "Chelsea".into(),
            start_time: 1613862000000 + millis_from_now,
            tournament: "Premier League".into(),
        }
    }

    async fn setup() -> (MatchbellContext, MatchEvent) {
        let mut ctx = MatchbellContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys {});
        let event = event_starting_in(1000 * 60 * 60 * 2);
        ctx.repos.match_events.insert(&event).await.unwrap();
        (ctx, event)
    }

    #[tokio::test]
    async fn creates_reminder_and_subscriber_lazily() {
        let (ctx, event) = setup().await;

        let usecase = CreateReminderUseCase {
            channel_id: 42,
            username: Some("rodion".into()),
            event_id: event.id.clone(),
            lead_hours: 1.0,
        };
        let res = execute(usecase, &ctx).await.unwrap();

        assert_eq!(res.event.id, event.id);
        assert!(!res.reminder.delivered);

        let subscriber = ctx.repos.subscribers.find_by_channel(42).await.unwrap();
        assert_eq!(res.reminder.subscriber_id, subscriber.id);
    }

    #[tokio::test]
    async fn recreating_an_undelivered_reminder_returns_the_existing_id() {
        let (ctx, event) = setup().await;

        let first = execute(
            CreateReminderUseCase {
                channel_id: 42,
                username: None,
                event_id: event.id.clone(),
                lead_hours: 2.0 / 60.0,
            },
            &ctx,
        )
        .await
        .unwrap();

        let second = execute(
            CreateReminderUseCase {
                channel_id: 42,
                username: None,
                event_id: event.id.clone(),
                lead_hours: 2.0 / 60.0,
            },
            &ctx,
        )
        .await
        .unwrap();

        assert_eq!(first.reminder.id, second.reminder.id);
    }

    #[tokio::test]
    async fn delivered_reminder_does_not_block_recreation() {
        let (ctx, event) = setup().await;

        let first = execute(
            CreateReminderUseCase {
                channel_id: 42,
                username: None,
                event_id: event.id.clone(),
                lead_hours: 1.0,
            },
            &ctx,
        )
        .await
        .unwrap();
        assert!(ctx
            .repos
            .reminders
            .mark_delivered(&first.reminder.id)
            .await
            .unwrap());

        let second = execute(
            CreateReminderUseCase {
                channel_id: 42,
                username: None,
                event_id: event.id.clone(),
                lead_hours: 1.0,
            },
            &ctx,
        )
        .await
        .unwrap();

        assert_ne!(first.reminder.id, second.reminder.id);
    }

    #[tokio::test]
    async fn rejects_sub_minute_and_non_finite_lead_times() {
        let (ctx, event) = setup().await;

        for lead_hours in [0.0, 1.0 / 3600.0, -1.0, f64::NAN].iter() {
            let res = execute(
                CreateReminderUseCase {
                    channel_id: 42,
                    username: None,
                    event_id: event.id.clone(),
                    lead_hours: *lead_hours,
                },
                &ctx,
            )
            .await;
            assert!(matches!(res, Err(UseCaseErrors::InvalidLeadTime(_))));
        }
    }

    #[tokio::test]
    async fn rejects_unknown_and_already_started_events() {
        let (ctx, _) = setup().await;

        let res = execute(
            CreateReminderUseCase {
                channel_id: 42,
                username: None,
                event_id: ID::new(),
                lead_hours: 1.0,
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseErrors::EventNotFound(_))));

        let started = event_starting_in(-1000);
        ctx.repos.match_events.insert(&started).await.unwrap();
        let res = execute(
            CreateReminderUseCase {
                channel_id: 42,
                username: None,
                event_id: started.id,
                lead_hours: 1.0,
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseErrors::EventAlreadyStarted)));
    }
}
