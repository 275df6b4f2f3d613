use serde::ser::{Serialize, Serializer};

use crate::domain::subscriber_id::SubscriberId;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SkippedNotification {
    #[serde(rename = "fid")]
    pub subscriber_id: SubscriberId,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FailedAlert {
    pub key: String,
    pub error: String,
}

/// Outcome of one reminder run, one entry per processed alert.
#[derive(Debug, Default, Clone)]
pub struct ProcessingReport {
    pub notified: Vec<SubscriberId>,
    pub skipped: Vec<SkippedNotification>,
    /// Eligible alerts whose delivery attempts all failed or had no credential
    pub undelivered: Vec<SkippedNotification>,
    pub errors: Vec<FailedAlert>,
}

impl ProcessingReport {
    pub fn record_notified(&mut self, subscriber_id: SubscriberId) {
        self.notified.push(subscriber_id);
    }

    pub fn record_skipped(&mut self, subscriber_id: SubscriberId, reason: String) {
        self.skipped.push(SkippedNotification {
            subscriber_id,
            reason,
        });
    }

    pub fn record_undelivered(&mut self, subscriber_id: SubscriberId, reason: String) {
        self.undelivered.push(SkippedNotification {
            subscriber_id,
            reason,
        });
    }

    pub fn record_error(&mut self, key: String, error: String) {
        self.errors.push(FailedAlert { key, error });
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessingReportBody<'a> {
    success: bool,
    notifications_sent_count: usize,
    notifications_sent: &'a [SubscriberId],
    skipped_count: usize,
    skipped: &'a [SkippedNotification],
    undelivered_count: usize,
    undelivered: &'a [SkippedNotification],
    errors_count: usize,
    errors: &'a [FailedAlert],
}

impl Serialize for ProcessingReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ProcessingReportBody {
            success: true,
            notifications_sent_count: self.notified.len(),
            notifications_sent: &self.notified,
            skipped_count: self.skipped.len(),
            skipped: &self.skipped,
            undelivered_count: self.undelivered.len(),
            undelivered: &self.undelivered,
            errors_count: self.errors.len(),
            errors: &self.errors,
        }
        .serialize(serializer)
    }
}
