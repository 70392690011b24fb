use crate::error::MatchbellError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use matchbell_api_structs::delete_reminder::*;
use matchbell_domain::{ReminderWithEvent, ID};
use matchbell_infra::MatchbellContext;

fn handle_error(e: UseCaseErrors) -> MatchbellError {
    match e {
        UseCaseErrors::NotFound(reminder_id) => MatchbellError::NotFound(format!(
            "The reminder with id: {}, was not found.",
            reminder_id
        )),
    }
}

pub async fn delete_reminder_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<MatchbellContext>,
) -> Result<HttpResponse, MatchbellError> {
    protect_route(&http_req, &ctx)?;

    let usecase = DeleteReminderUseCase {
        channel_id: path_params.channel_id,
        reminder_id: path_params.reminder_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct DeleteReminderUseCase {
    pub channel_id: i64,
    pub reminder_id: ID,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteReminderUseCase {
    type Response = ReminderWithEvent;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &MatchbellContext) -> Result<Self::Response, Self::Errors> {
        let subscriber = match ctx.repos.subscribers.find_by_channel(self.channel_id).await {
            Some(subscriber) => subscriber,
            None => return Err(UseCaseErrors::NotFound(self.reminder_id.clone())),
        };

        // Scoped to the owning subscriber so one channel cannot delete
        // another channel's reminder by guessing ids
        let reminder = match ctx
            .repos
            .reminders
            .delete(&self.reminder_id, &subscriber.id)
            .await
        {
            Some(reminder) => reminder,
            None => return Err(UseCaseErrors::NotFound(self.reminder_id.clone())),
        };

        let event = match ctx.repos.match_events.find(&reminder.event_id).await {
            Some(event) => event,
            None => return Err(UseCaseErrors::NotFound(self.reminder_id.clone())),
        };

        Ok(ReminderWithEvent { reminder, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchbell_domain::{MatchEvent, Reminder, Sport, Subscriber};

    async fn setup() -> (MatchbellContext, Subscriber, Reminder) {
        let ctx = MatchbellContext::create_inmemory();

        let subscriber = Subscriber::new(42, None);
        ctx.repos.subscribers.insert(&subscriber).await.unwrap();

        let event = MatchEvent {
            id: Default::default(),
            sport: Sport::Football,
            home: "Arsenal".into(),
            away: "Chelsea".into(),
            start_time: 1000 * 60 * 60,
            tournament: "Premier League".into(),
        };
        ctx.repos.match_events.insert(&event).await.unwrap();

        let reminder = Reminder::new(subscriber.id.clone(), event.id, 1.0, 0);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        (ctx, subscriber, reminder)
    }

    #[tokio::test]
    async fn deletes_own_reminder_and_it_never_reappears() {
        let (ctx, subscriber, reminder) = setup().await;

        let res = execute(
            DeleteReminderUseCase {
                channel_id: 42,
                reminder_id: reminder.id.clone(),
            },
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(res.reminder.id, reminder.id);

        assert!(ctx
            .repos
            .reminders
            .find_by_subscriber(&subscriber.id, 0)
            .await
            .unwrap()
            .is_empty());
        assert!(ctx
            .repos
            .reminders
            .find_due_candidates(0)
            .await
            .unwrap()
            .is_empty());

        // A second delete is a NotFound
        let res = execute(
            DeleteReminderUseCase {
                channel_id: 42,
                reminder_id: reminder.id,
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseErrors::NotFound(_))));
    }

    #[tokio::test]
    async fn cannot_delete_another_subscribers_reminder() {
        let (ctx, _, reminder) = setup().await;

        let stranger = Subscriber::new(1337, None);
        ctx.repos.subscribers.insert(&stranger).await.unwrap();

        let res = execute(
            DeleteReminderUseCase {
                channel_id: 1337,
                reminder_id: reminder.id,
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseErrors::NotFound(_))));
    }
}
