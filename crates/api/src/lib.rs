mod error;
mod job_schedulers;
mod match_event;
mod reminder;
mod shared;
mod status;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use job_schedulers::start_reminder_dispatch_job;
use matchbell_infra::MatchbellContext;
use std::net::TcpListener;
use tokio::sync::watch;
use tracing_actix_web::TracingLogger;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    match_event::configure_routes(cfg);
    reminder::configure_routes(cfg);
    status::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
    /// Dropping the sender wakes the dispatch job so it stops between ticks
    shutdown_tx: watch::Sender<()>,
}

impl Application {
    pub async fn new(context: MatchbellContext) -> Result<Self, std::io::Error> {
        let (server, port) = Application::configure_server(context.clone()).await?;

        let (shutdown_tx, shutdown_rx) = watch::channel(());
        start_reminder_dispatch_job(context, shutdown_rx);

        Ok(Self {
            server,
            port,
            shutdown_tx,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    async fn configure_server(context: MatchbellContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .data(ctx)
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        let res = self.server.await;
        // The HTTP server is gone, stop polling for due reminders too
        let _ = self.shutdown_tx.send(());
        res
    }
}
