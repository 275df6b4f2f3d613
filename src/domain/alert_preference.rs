use chrono::{DateTime, Utc};

use crate::domain::base_name::BaseName;
use crate::domain::delivery_credential::DeliveryCredential;
use crate::domain::subscriber_id::SubscriberId;

pub const ALERT_KEY_PREFIX: &str = "alert:";

/// Alert settings of one subscriber for one basename, as persisted in the store.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPreference {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub base_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_notification_sent: Option<DateTime<Utc>>,
}

impl AlertPreference {
    pub fn credential(&self) -> Option<DeliveryCredential> {
        DeliveryCredential::from_parts(self.token.as_deref(), self.url.as_deref())
    }

    /// Records a successful delivery. The stamp never moves backwards.
    pub fn stamp_notification_sent(&mut self, sent_at: DateTime<Utc>) {
        self.last_notification_sent = match self.last_notification_sent {
            Some(previous) if previous > sent_at => Some(previous),
            _ => Some(sent_at),
        };
    }
}

pub fn alert_key(subscriber_id: SubscriberId, base_name: &BaseName) -> String {
    format!("{}{}:{}", ALERT_KEY_PREFIX, subscriber_id, base_name.as_ref())
}

/// Extracts the subscriber id from a key shaped like `alert:{id}:{name}`.
pub fn subscriber_id_from_alert_key(key: &str) -> Result<SubscriberId, String> {
    key.strip_prefix(ALERT_KEY_PREFIX)
        .and_then(|rest| rest.split(':').next())
        .ok_or_else(|| format!("{} is not an alert key", key))
        .and_then(SubscriberId::parse)
}
