mod get_upcoming_events;

use actix_web::web;
use get_upcoming_events::get_upcoming_events_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/events", web::get().to(get_upcoming_events_controller));
}
