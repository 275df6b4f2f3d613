use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::alert_preference::{AlertPreference, ALERT_KEY_PREFIX};
use crate::domain::delivery_credential::DeliveryCredential;
use crate::domain::subscriber_id::SubscriberId;

pub mod memory;
pub mod redis_store;

pub use memory::InMemoryStore;
pub use redis_store::RedisStore;

const NOTIFICATION_KEY_PREFIX: &str = "notification:";

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Failed to reach the preference store: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("Invalid preference data: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("Failed to encode preference data: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("Preference store lock was poisoned")]
    Poisoned,
}

/// Raw string key-value storage the alert data lives in.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Typed access to alert preferences and account-level delivery credentials,
/// both stored as JSON documents.
#[derive(Clone)]
pub struct PreferenceStore {
    backend: Arc<dyn KeyValueStore>,
}

impl PreferenceStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> PreferenceStore {
        PreferenceStore { backend }
    }

    // Full scan on every call, grows with the number of alerts
    pub async fn list_alert_keys(&self) -> Result<Vec<String>, StoreError> {
        self.backend.keys(ALERT_KEY_PREFIX).await
    }

    pub async fn get_preference(&self, key: &str) -> Result<Option<AlertPreference>, StoreError> {
        self.get_json(key).await
    }

    pub async fn set_preference(
        &self,
        key: &str,
        preference: &AlertPreference,
    ) -> Result<(), StoreError> {
        self.set_json(key, preference).await
    }

    pub async fn get_notification_details(
        &self,
        subscriber_id: SubscriberId,
    ) -> Result<Option<DeliveryCredential>, StoreError> {
        self.get_json(&notification_details_key(subscriber_id)).await
    }

    pub async fn set_notification_details(
        &self,
        subscriber_id: SubscriberId,
        credential: &DeliveryCredential,
    ) -> Result<(), StoreError> {
        self.set_json(&notification_details_key(subscriber_id), credential)
            .await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, StoreError> {
        match self.backend.get(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(StoreError::Decode),
            None => Ok(None),
        }
    }

    async fn set_json<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(StoreError::Encode)?;

        self.backend.set(key, raw).await
    }
}

pub fn notification_details_key(subscriber_id: SubscriberId) -> String {
    format!("{}{}", NOTIFICATION_KEY_PREFIX, subscriber_id)
}
