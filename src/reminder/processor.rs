use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::config::ReminderSettings;
use crate::domain::alert_preference::{subscriber_id_from_alert_key, AlertPreference};
use crate::domain::subscriber_id::SubscriberId;
use crate::notification_client::{Notification, NotificationClient};
use crate::reminder::dedup::already_sent_today;
use crate::reminder::delivery::{deliver_with_fallback, Delivery};
use crate::reminder::expiry_policy::{should_notify, ExpiryDecision};
use crate::reminder::report::ProcessingReport;
use crate::store::{PreferenceStore, StoreError};

/// Wording of the notifications the service sends.
#[derive(Debug, Clone)]
pub struct ReminderMessages {
    pub title: String,
    pub name_suffix: String,
    pub confirmation_title: String,
}

impl ReminderMessages {
    fn reminder(&self, base_name: &str, reason: &str) -> Notification {
        Notification {
            title: self.title.clone(),
            body: format!("{}{} {}", base_name, self.name_suffix, reason),
        }
    }

    fn confirmation(&self, base_name: &str) -> Notification {
        Notification {
            title: self.confirmation_title.clone(),
            body: format!("{} Alert has been set", base_name),
        }
    }
}

impl From<&ReminderSettings> for ReminderMessages {
    fn from(settings: &ReminderSettings) -> Self {
        ReminderMessages {
            title: settings.title.clone(),
            name_suffix: settings.name_suffix.clone(),
            confirmation_title: settings.confirmation_title.clone(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    #[error("{0}")]
    InvalidKey(String),
    #[error("Invalid preference data")]
    MissingPreference,
    #[error(transparent)]
    Store(#[from] StoreError),
}

enum RecordOutcome {
    Notified(SubscriberId),
    Skipped(SubscriberId, String),
    Undelivered(SubscriberId, String),
}

pub struct ReminderProcessor {
    store: PreferenceStore,
    notification_client: NotificationClient,
    messages: ReminderMessages,
    time_zone: FixedOffset,
}

impl ReminderProcessor {
    pub fn new(
        store: PreferenceStore,
        notification_client: NotificationClient,
        messages: ReminderMessages,
        time_zone: FixedOffset,
    ) -> ReminderProcessor {
        ReminderProcessor {
            store,
            notification_client,
            messages,
            time_zone,
        }
    }

    pub async fn run(&self) -> Result<ProcessingReport, StoreError> {
        self.run_at(Utc::now()).await
    }

    /// Walks every stored alert once. A broken alert ends up in the report's
    /// errors; only failing to list the alerts fails the whole run.
    #[tracing::instrument(name = "Process basename alert reminders", skip(self))]
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<ProcessingReport, StoreError> {
        let keys = self.store.list_alert_keys().await?;
        let today = now.with_timezone(&self.time_zone).date_naive();
        let mut report = ProcessingReport::default();

        tracing::info!("Found {} alert keys to process", keys.len());

        for key in keys {
            match self.process_alert(&key, now, today).await {
                Ok(RecordOutcome::Notified(subscriber_id)) => report.record_notified(subscriber_id),
                Ok(RecordOutcome::Skipped(subscriber_id, reason)) => {
                    report.record_skipped(subscriber_id, reason)
                }
                Ok(RecordOutcome::Undelivered(subscriber_id, reason)) => {
                    report.record_undelivered(subscriber_id, reason)
                }
                Err(err) => {
                    tracing::error!("Error processing alert for key {}: {:?}", key, err);
                    report.record_error(key, err.to_string());
                }
            }
        }

        tracing::info!(
            notified = report.notified.len(),
            skipped = report.skipped.len(),
            undelivered = report.undelivered.len(),
            errors = report.errors.len(),
            "Processing completed"
        );

        Ok(report)
    }

    #[tracing::instrument(name = "Process an alert", skip(self, now, today))]
    async fn process_alert(
        &self,
        key: &str,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<RecordOutcome, RecordError> {
        let subscriber_id = subscriber_id_from_alert_key(key).map_err(RecordError::InvalidKey)?;
        let mut preference = self
            .store
            .get_preference(key)
            .await?
            .ok_or(RecordError::MissingPreference)?;

        if !preference.enabled {
            return Ok(RecordOutcome::Skipped(
                subscriber_id,
                String::from("Alerts disabled"),
            ));
        }

        let decision = match preference.expiry_date.as_deref() {
            Some(expiry_date) => should_notify(expiry_date, today, &self.time_zone),
            None => ExpiryDecision::skip(String::from("Missing expiry date")),
        };

        if !decision.send {
            return Ok(RecordOutcome::Skipped(subscriber_id, decision.reason));
        }

        if already_sent_today(preference.last_notification_sent, today, &self.time_zone) {
            return Ok(RecordOutcome::Skipped(
                subscriber_id,
                String::from("Already notified today"),
            ));
        }

        let notification = self
            .messages
            .reminder(&preference.base_name, &decision.reason);

        match self
            .deliver(subscriber_id, &preference, &notification)
            .await?
        {
            Delivery::Delivered(channel) => {
                preference.stamp_notification_sent(now);
                self.store.set_preference(key, &preference).await?;

                tracing::info!("Updated lastNotificationSent after delivery via {:?}", channel);

                Ok(RecordOutcome::Notified(subscriber_id))
            }
            Delivery::Undelivered(reason) => Ok(RecordOutcome::Undelivered(subscriber_id, reason)),
        }
    }

    /// Tells the subscriber their alert is in place. Delivery problems are only logged.
    #[tracing::instrument(
        name = "Send alert setup confirmation",
        skip(self, preference),
        fields(base_name = %preference.base_name)
    )]
    pub async fn send_setup_confirmation(
        &self,
        subscriber_id: SubscriberId,
        preference: &AlertPreference,
    ) -> Result<Delivery, StoreError> {
        let notification = self.messages.confirmation(&preference.base_name);
        let delivery = self
            .deliver(subscriber_id, preference, &notification)
            .await?;

        if let Delivery::Undelivered(reason) = &delivery {
            tracing::warn!("Alert setup confirmation was not delivered: {}", reason);
        }

        Ok(delivery)
    }

    async fn deliver(
        &self,
        subscriber_id: SubscriberId,
        preference: &AlertPreference,
        notification: &Notification,
    ) -> Result<Delivery, StoreError> {
        deliver_with_fallback(
            &self.store,
            &self.notification_client,
            subscriber_id,
            preference.credential().as_ref(),
            notification,
        )
        .await
    }
}
