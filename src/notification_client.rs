use reqwest::Client;
use std::time;
use uuid::Uuid;

use crate::domain::delivery_credential::DeliveryCredential;

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);

/// Pushes frame notifications to the webhook url a client registered.
pub struct NotificationClient {
    http_client: Client,
    // Where the notification leads when opened, the app itself
    target_url: String,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct SendNotificationBody<'a> {
    notification_id: Uuid,
    title: &'a str,
    body: &'a str,
    target_url: &'a str,
    tokens: Vec<&'a str>,
}

impl NotificationClient {
    pub fn new(
        target_url: String,
        timeout: Option<time::Duration>,
    ) -> Result<NotificationClient, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .build()?;

        Ok(NotificationClient {
            http_client,
            target_url,
        })
    }

    /// Makes a single delivery attempt. Returns whether the endpoint accepted it;
    /// failures are logged and never retried here.
    #[tracing::instrument(
        name = "Send a notification",
        skip(self, credential, notification),
        fields(
            notification_url = %credential.url,
            title = %notification.title
        )
    )]
    pub async fn send(&self, credential: &DeliveryCredential, notification: &Notification) -> bool {
        match self.try_send(credential, notification).await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(
                    "Failed to send notification to {}: {:?}",
                    credential.url,
                    err
                );
                false
            }
        }
    }

    async fn try_send(
        &self,
        credential: &DeliveryCredential,
        notification: &Notification,
    ) -> Result<(), reqwest::Error> {
        let body = SendNotificationBody {
            notification_id: Uuid::new_v4(),
            title: notification.title.as_str(),
            body: notification.body.as_str(),
            target_url: self.target_url.as_str(),
            tokens: vec![credential.token.as_str()],
        };

        self.http_client
            .post(&credential.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?; // return an error when server response status code is 4xx or 5xx

        Ok(())
    }
}
