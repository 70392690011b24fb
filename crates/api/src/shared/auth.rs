use crate::error::MatchbellError;
use actix_web::HttpRequest;
use matchbell_infra::MatchbellContext;

pub const API_KEY_HEADER: &str = "x-matchbell-api-key";

/// The bot front-end is the only intended client of the guarded routes and
/// must present the shared API secret on every request.
pub fn protect_route(http_req: &HttpRequest, ctx: &MatchbellContext) -> Result<(), MatchbellError> {
    let api_key = http_req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|key| key.to_str().ok());

    match api_key {
        Some(key) if key == ctx.config.api_secret => Ok(()),
        _ => Err(MatchbellError::Unauthorized(format!(
            "Missing or invalid `{}` header",
            API_KEY_HEADER
        ))),
    }
}
