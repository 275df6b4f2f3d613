use actix_web::web;
use serde::Deserialize;
use validator::validate_url;

use crate::domain::alert_preference::AlertPreference;
use crate::domain::base_name::BaseName;
use crate::domain::delivery_credential::DeliveryCredential;
use crate::reminder::expiry_policy::is_valid_expiry_date;

#[derive(Debug)]
pub struct NewAlertPreference {
    pub base_name: BaseName,
    pub enabled: bool,
    pub expiry_date: Option<String>,
    pub credential: Option<DeliveryCredential>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupAlertBody {
    pub enabled: bool,
    pub base_name: Option<String>,
    pub expiry_date: Option<String>,
    pub token: Option<String>,
    pub url: Option<String>,
}

impl TryFrom<web::Json<SetupAlertBody>> for NewAlertPreference {
    type Error = String;

    fn try_from(body: web::Json<SetupAlertBody>) -> Result<Self, Self::Error> {
        let body = body.into_inner();
        let base_name = body
            .base_name
            .ok_or_else(|| String::from("Basename is required"))
            .and_then(BaseName::parse)?;

        let expiry_date = match body.expiry_date {
            Some(date) if !is_valid_expiry_date(&date) => {
                return Err(format!("{} is not a valid expiry date", date))
            }
            Some(date) => Some(date),
            None if body.enabled => {
                return Err(String::from(
                    "Expiry date is required when enabling alerts",
                ))
            }
            None => None,
        };

        // Credentials only matter while alerts are on
        let credential = if body.enabled {
            DeliveryCredential::from_parts(body.token.as_deref(), body.url.as_deref())
        } else {
            None
        };

        if let Some(credential) = &credential {
            if !validate_url(credential.url.as_str()) {
                return Err(format!("{} is not a valid url", credential.url));
            }
        }

        Ok(NewAlertPreference {
            base_name,
            enabled: body.enabled,
            expiry_date,
            credential,
        })
    }
}

impl NewAlertPreference {
    /// Builds the record to persist, keeping the send stamp of the record it replaces.
    pub fn into_preference(self, previous: Option<&AlertPreference>) -> AlertPreference {
        let (token, url) = match self.credential {
            Some(credential) => (Some(credential.token), Some(credential.url)),
            None => (None, None),
        };

        AlertPreference {
            enabled: self.enabled,
            token,
            url,
            base_name: String::from(self.base_name.as_ref()),
            expiry_date: self.expiry_date,
            last_notification_sent: previous.and_then(|p| p.last_notification_sent),
        }
    }
}
