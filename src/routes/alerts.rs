use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use serde::Deserialize;

use crate::domain::alert_preference::alert_key;
use crate::domain::base_name::BaseName;
use crate::domain::new_alert_preference::{NewAlertPreference, SetupAlertBody};
use crate::domain::subscriber_id::SubscriberId;
use crate::reminder::ReminderProcessor;
use crate::store::{PreferenceStore, StoreError};

const FID_HEADER: &str = "X-Farcaster-FID";

#[derive(Deserialize, Debug)]
pub struct StatusParameters {
    #[serde(rename = "baseName")]
    pub base_name: Option<String>,
}

#[tracing::instrument(
    name = "Setting up a basename alert",
    skip(request, body, store, processor),
    fields(
        base_name = ?body.base_name,
        enabled = %body.enabled
    )
)]
pub async fn handle_setup_alert(
    request: HttpRequest,
    body: web::Json<SetupAlertBody>,
    store: web::Data<PreferenceStore>,
    processor: web::Data<ReminderProcessor>,
) -> Result<HttpResponse, AlertRouteError> {
    let subscriber_id = subscriber_id_from_headers(&request)?;
    let new_preference: NewAlertPreference =
        body.try_into().map_err(AlertRouteError::Validation)?;
    let key = alert_key(subscriber_id, &new_preference.base_name);

    if let Some(credential) = &new_preference.credential {
        store
            .set_notification_details(subscriber_id, credential)
            .await?;
    }

    let previous = match store.get_preference(&key).await {
        Ok(previous) => previous,
        Err(StoreError::Decode(err)) => {
            tracing::warn!("Replacing unreadable preference at {}: {:?}", key, err);
            None
        }
        Err(err) => return Err(err.into()),
    };
    let preference = new_preference.into_preference(previous.as_ref());

    store.set_preference(&key, &preference).await?;

    if preference.credential().is_some() {
        if let Err(err) = processor
            .send_setup_confirmation(subscriber_id, &preference)
            .await
        {
            tracing::error!("Failed to send alert setup confirmation: {:?}", err);
        }
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "preference": preference,
    })))
}

#[tracing::instrument(name = "Reading a basename alert status", skip(request, store))]
pub async fn handle_alert_status(
    request: HttpRequest,
    parameters: web::Query<StatusParameters>,
    store: web::Data<PreferenceStore>,
) -> Result<HttpResponse, AlertRouteError> {
    let subscriber_id = subscriber_id_from_headers(&request)?;
    let base_name = parameters
        .into_inner()
        .base_name
        .ok_or_else(|| String::from("baseName is required"))
        .and_then(BaseName::parse)
        .map_err(AlertRouteError::Validation)?;

    let response = match store
        .get_preference(&alert_key(subscriber_id, &base_name))
        .await?
    {
        Some(preference) => HttpResponse::Ok().json(preference),
        None => HttpResponse::Ok().json(serde_json::json!({ "enabled": false })),
    };

    Ok(response)
}

fn subscriber_id_from_headers(request: &HttpRequest) -> Result<SubscriberId, AlertRouteError> {
    request
        .headers()
        .get(FID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| SubscriberId::parse(value).ok())
        .ok_or_else(|| AlertRouteError::Validation(String::from("FID is required")))
}

#[derive(thiserror::Error)]
pub enum AlertRouteError {
    #[error("{0}")]
    Validation(String),
    #[error("Failed to access alert preferences: {0}")]
    Store(#[from] StoreError),
}

impl std::fmt::Debug for AlertRouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Caused by:\n\t({})", self)
    }
}

impl ResponseError for AlertRouteError {
    fn status_code(&self) -> StatusCode {
        match self {
            AlertRouteError::Validation(_) => StatusCode::BAD_REQUEST,
            AlertRouteError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": self.to_string() }))
    }
}
