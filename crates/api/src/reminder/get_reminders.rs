use crate::error::MatchbellError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use matchbell_api_structs::get_reminders::*;
use matchbell_domain::ReminderWithEvent;
use matchbell_infra::MatchbellContext;

fn handle_error(e: UseCaseErrors) -> MatchbellError {
    match e {
        UseCaseErrors::StorageError => MatchbellError::InternalError,
    }
}

pub async fn get_reminders_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<MatchbellContext>,
) -> Result<HttpResponse, MatchbellError> {
    protect_route(&http_req, &ctx)?;

    let usecase = GetRemindersUseCase {
        channel_id: path_params.channel_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct GetRemindersUseCase {
    pub channel_id: i64,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRemindersUseCase {
    type Response = Vec<ReminderWithEvent>;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &MatchbellContext) -> Result<Self::Response, Self::Errors> {
        // An unknown channel simply has nothing pending yet
        let subscriber = match ctx.repos.subscribers.find_by_channel(self.channel_id).await {
            Some(subscriber) => subscriber,
            None => return Ok(Vec::new()),
        };

        let now = ctx.sys.get_timestamp_millis();
        ctx.repos
            .reminders
            .find_by_subscriber(&subscriber.id, now)
            .await
            .map_err(|_| UseCaseErrors::StorageError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchbell_domain::{MatchEvent, Reminder, Sport, Subscriber};
    use matchbell_infra::ISys;
    use std::sync::Arc;

    struct StaticTimeSys;
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            1613862000000
        }
    }

    #[tokio::test]
    async fn lists_pending_reminders_for_future_events_only() {
        let mut ctx = MatchbellContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys {});
        let now = ctx.sys.get_timestamp_millis();

        let subscriber = Subscriber::new(42, None);
        ctx.repos.subscribers.insert(&subscriber).await.unwrap();

        let future_event = MatchEvent {
            id: Default::default(),
            sport: Sport::Basketball,
            home: "Lakers".into(),
            away: "Celtics".into(),
            start_time: now + 1000 * 60 * 60,
            tournament: "NBA".into(),
        };
        let past_event = MatchEvent {
            id: Default::default(),
            sport: Sport::Basketball,
            home: "Bulls".into(),
            away: "Heat".into(),
            start_time: now - 1000 * 60 * 60,
            tournament: "NBA".into(),
        };
        ctx.repos.match_events.insert(&future_event).await.unwrap();
        ctx.repos.match_events.insert(&past_event).await.unwrap();

        let pending = Reminder::new(subscriber.id.clone(), future_event.id.clone(), 1.0, now);
        let stale = Reminder::new(subscriber.id.clone(), past_event.id, 1.0, now);
        let delivered = Reminder::new(subscriber.id.clone(), future_event.id, 0.5, now);
        ctx.repos.reminders.insert(&pending).await.unwrap();
        ctx.repos.reminders.insert(&stale).await.unwrap();
        ctx.repos.reminders.insert(&delivered).await.unwrap();
        assert!(ctx
            .repos
            .reminders
            .mark_delivered(&delivered.id)
            .await
            .unwrap());

        let usecase = GetRemindersUseCase { channel_id: 42 };
        let res = execute(usecase, &ctx).await.unwrap();

        assert_eq!(res.len(), 1);
        assert_eq!(res[0].reminder.id, pending.id);
    }

    #[tokio::test]
    async fn unknown_channel_gets_an_empty_list() {
        let ctx = MatchbellContext::create_inmemory();

        let usecase = GetRemindersUseCase { channel_id: 1337 };
        let res = execute(usecase, &ctx).await.unwrap();
        assert!(res.is_empty());
    }
}
