mod alert_reminder;
mod alerts;
mod health_check;

pub use alert_reminder::{handle_alert_reminder, AlertReminderError, CronSecret};
pub use alerts::{handle_alert_status, handle_setup_alert, AlertRouteError};
pub use health_check::health_check;
