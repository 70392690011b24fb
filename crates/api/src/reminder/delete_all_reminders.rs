use crate::error::MatchbellError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use matchbell_api_structs::delete_all_reminders::*;
use matchbell_infra::MatchbellContext;

fn handle_error(e: UseCaseErrors) -> MatchbellError {
    match e {
        UseCaseErrors::StorageError => MatchbellError::InternalError,
    }
}

pub async fn delete_all_reminders_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<MatchbellContext>,
) -> Result<HttpResponse, MatchbellError> {
    protect_route(&http_req, &ctx)?;

    let usecase = DeleteAllRemindersUseCase {
        channel_id: path_params.channel_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|deleted_count| HttpResponse::Ok().json(APIResponse { deleted_count }))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct DeleteAllRemindersUseCase {
    pub channel_id: i64,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteAllRemindersUseCase {
    type Response = i64;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &MatchbellContext) -> Result<Self::Response, Self::Errors> {
        let subscriber = match ctx.repos.subscribers.find_by_channel(self.channel_id).await {
            Some(subscriber) => subscriber,
            None => return Ok(0),
        };

        ctx.repos
            .reminders
            .delete_by_subscriber(&subscriber.id)
            .await
            .map(|res| res.deleted_count)
            .map_err(|_| UseCaseErrors::StorageError)
    }
}
