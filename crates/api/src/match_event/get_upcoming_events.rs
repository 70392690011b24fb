use crate::error::MatchbellError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use matchbell_api_structs::get_upcoming_events::*;
use matchbell_domain::{MatchEvent, Sport};
use matchbell_infra::{MatchbellContext, UPCOMING_EVENTS_LIMIT};

fn handle_error(e: UseCaseErrors) -> MatchbellError {
    match e {
        UseCaseErrors::StorageError => MatchbellError::InternalError,
    }
}

pub async fn get_upcoming_events_controller(
    http_req: HttpRequest,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<MatchbellContext>,
) -> Result<HttpResponse, MatchbellError> {
    protect_route(&http_req, &ctx)?;

    let usecase = GetUpcomingEventsUseCase {
        sport: query_params.sport,
    };

    execute(usecase, &ctx)
        .await
        .map(|events| HttpResponse::Ok().json(APIResponse::new(events)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct GetUpcomingEventsUseCase {
    pub sport: Sport,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetUpcomingEventsUseCase {
    type Response = Vec<MatchEvent>;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &MatchbellContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();
        ctx.repos
            .match_events
            .find_upcoming_by_sport(self.sport, now, UPCOMING_EVENTS_LIMIT)
            .await
            .map_err(|_| UseCaseErrors::StorageError)
    }
}
