mod create_reminder;
mod delete_all_reminders;
mod delete_reminder;
pub mod dispatcher;
pub mod get_due_reminders;
mod get_reminders;

use actix_web::web;
use create_reminder::create_reminder_controller;
use delete_all_reminders::delete_all_reminders_controller;
use delete_reminder::delete_reminder_controller;
use get_reminders::get_reminders_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/subscribers/{channel_id}/reminders",
        web::post().to(create_reminder_controller),
    );
    cfg.route(
        "/subscribers/{channel_id}/reminders",
        web::get().to(get_reminders_controller),
    );
    cfg.route(
        "/subscribers/{channel_id}/reminders",
        web::delete().to(delete_all_reminders_controller),
    );
    cfg.route(
        "/subscribers/{channel_id}/reminders/{reminder_id}",
        web::delete().to(delete_reminder_controller),
    );
}
