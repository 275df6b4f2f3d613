use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::io::{Error, ErrorKind};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use crate::config::Settings;
use crate::notification_client::NotificationClient;
use crate::reminder::{ReminderMessages, ReminderProcessor};
use crate::routes::{
    handle_alert_reminder, handle_alert_status, handle_setup_alert, health_check, CronSecret,
};
use crate::store::{PreferenceStore, RedisStore};

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, Error> {
        let redis_client = redis::Client::open(config.get_redis_address())
            .map_err(|err| Error::new(ErrorKind::InvalidInput, err))?;
        let store = PreferenceStore::new(Arc::new(RedisStore::new(redis_client)));

        Self::build_with_store(config, store).await
    }

    /// Same as `build` but on top of an already constructed preference store.
    pub async fn build_with_store(config: Settings, store: PreferenceStore) -> Result<Self, Error> {
        let notification_client = NotificationClient::new(
            config.get_app_base_url(),
            Some(config.get_notification_timeout()),
        )
        .map_err(|err| Error::new(ErrorKind::Other, err))?;
        let time_zone = config
            .reminder
            .get_time_zone()
            .map_err(|err| Error::new(ErrorKind::InvalidInput, err))?;
        let processor = ReminderProcessor::new(
            store.clone(),
            notification_client,
            ReminderMessages::from(&config.reminder),
            time_zone,
        );

        let listener = TcpListener::bind(config.get_address())?;
        let port = listener.local_addr()?.port();
        let server = run(listener, store, processor, config.get_cron_secret())?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    store: PreferenceStore,
    processor: ReminderProcessor,
    cron_secret: secrecy::Secret<String>,
) -> Result<Server, Error> {
    let store = web::Data::new(store);
    let processor = web::Data::new(processor);
    let cron_secret = web::Data::new(CronSecret(cron_secret));

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            // The scheduler calls with GET, manual triggers use POST
            .service(
                web::resource("/api/cron/alert-reminder")
                    .route(web::get().to(handle_alert_reminder))
                    .route(web::post().to(handle_alert_reminder)),
            )
            .route("/api/alert/setup", web::post().to(handle_setup_alert))
            .route("/api/alert/status", web::get().to(handle_alert_status))
            .app_data(store.clone())
            .app_data(processor.clone())
            .app_data(cron_secret.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
