pub mod config;
pub mod domain;
pub mod notification_client;
pub mod reminder;
pub mod routes;
pub mod startup;
pub mod store;
pub mod telemetry;
