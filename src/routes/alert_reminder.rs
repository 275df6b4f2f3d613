use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use secrecy::{ExposeSecret, Secret};

use crate::reminder::ReminderProcessor;
use crate::store::StoreError;

/// Secret the scheduler sends as a bearer token when triggering reminders.
pub struct CronSecret(pub Secret<String>);

#[tracing::instrument(
    name = "Basename alert reminder handler",
    skip(request, processor, cron_secret)
)]
pub async fn handle_alert_reminder(
    request: HttpRequest,
    processor: web::Data<ReminderProcessor>,
    cron_secret: web::Data<CronSecret>,
) -> Result<HttpResponse, AlertReminderError> {
    authorize(&request, &cron_secret)?;

    let report = processor
        .run()
        .await
        .map_err(AlertReminderError::ProcessingFailed)?;

    Ok(HttpResponse::Ok().json(report))
}

fn authorize(request: &HttpRequest, cron_secret: &CronSecret) -> Result<(), AlertReminderError> {
    let expected = format!("Bearer {}", cron_secret.0.expose_secret());
    let is_authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| constant_time_eq(value.as_bytes(), expected.as_bytes()))
        .unwrap_or(false);

    if !is_authorized {
        tracing::error!("Unauthorized cron job request");
        return Err(AlertReminderError::Unauthorized);
    }

    Ok(())
}

/// Compares every byte regardless of where the first mismatch is.
/// Only the length can leak.
fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    left.iter()
        .zip(right)
        .fold(0u8, |diff, (l, r)| diff | (l ^ r))
        == 0
}

#[derive(thiserror::Error)]
pub enum AlertReminderError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Failed to process alert notifications: {0}")]
    ProcessingFailed(#[source] StoreError),
}

impl std::fmt::Debug for AlertReminderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Caused by:\n\t({})", self)
    }
}

impl ResponseError for AlertReminderError {
    fn status_code(&self) -> StatusCode {
        match self {
            AlertReminderError::Unauthorized => StatusCode::UNAUTHORIZED,
            AlertReminderError::ProcessingFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AlertReminderError::Unauthorized => serde_json::json!({ "error": self.to_string() }),
            AlertReminderError::ProcessingFailed(_) => {
                serde_json::json!({ "success": false, "error": self.to_string() })
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
