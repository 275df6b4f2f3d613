use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// Whether the last successful send falls on `today` in `time_zone`.
pub fn already_sent_today(
    last_notification_sent: Option<DateTime<Utc>>,
    today: NaiveDate,
    time_zone: &FixedOffset,
) -> bool {
    match last_notification_sent {
        Some(sent_at) => sent_at.with_timezone(time_zone).date_naive() == today,
        None => false,
    }
}
