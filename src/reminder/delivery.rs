use crate::domain::delivery_credential::DeliveryCredential;
use crate::domain::subscriber_id::SubscriberId;
use crate::notification_client::{Notification, NotificationClient};
use crate::store::{PreferenceStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryChannel {
    /// Credential saved on the alert preference itself
    Subscription,
    /// Credential registered for the subscriber's account
    Account,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Delivered(DeliveryChannel),
    Undelivered(String),
}

/// Tries the alert's own credential first, then the account-level registration.
/// The account credential is skipped when it is the one that just failed.
#[tracing::instrument(
    name = "Deliver a notification with fallback",
    skip(store, notification_client, primary, notification),
    fields(subscriber_id = %subscriber_id)
)]
pub async fn deliver_with_fallback(
    store: &PreferenceStore,
    notification_client: &NotificationClient,
    subscriber_id: SubscriberId,
    primary: Option<&DeliveryCredential>,
    notification: &Notification,
) -> Result<Delivery, StoreError> {
    let mut attempted = false;

    match primary {
        Some(credential) => {
            attempted = true;

            if notification_client.send(credential, notification).await {
                tracing::info!("Notification sent using preference credential");
                return Ok(Delivery::Delivered(DeliveryChannel::Subscription));
            }

            tracing::warn!("Failed to send notification with preference credential");
        }
        None => tracing::info!("No credential in preference"),
    }

    match store.get_notification_details(subscriber_id).await? {
        Some(credential) if Some(&credential) == primary => {
            tracing::info!("Account credential is the one that already failed");
        }
        Some(credential) => {
            attempted = true;

            if notification_client.send(&credential, notification).await {
                tracing::info!("Notification sent using account credential");
                return Ok(Delivery::Delivered(DeliveryChannel::Account));
            }

            tracing::warn!("Failed to send notification with account credential");
        }
        None => tracing::warn!("No notification details found"),
    }

    let reason = if attempted {
        "Delivery failed"
    } else {
        "No delivery credentials"
    };

    Ok(Delivery::Undelivered(String::from(reason)))
}
