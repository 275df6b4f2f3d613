use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryDecision {
    pub send: bool,
    pub reason: String,
}

impl ExpiryDecision {
    fn notify(reason: &str) -> ExpiryDecision {
        ExpiryDecision {
            send: true,
            reason: String::from(reason),
        }
    }

    pub fn skip(reason: String) -> ExpiryDecision {
        ExpiryDecision {
            send: false,
            reason,
        }
    }
}

/// Reads a plain `YYYY-MM-DD` date, an RFC 3339 timestamp, or an RFC 2822 one
/// (`Sat, 15 Mar 2025 12:34:56 GMT`, what the front-end stores). Timestamps are
/// converted into `time_zone` before their time of day is dropped.
pub fn parse_expiry_date(value: &str, time_zone: &FixedOffset) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_rfc2822(value))
        .ok()
        .map(|expiry| expiry.with_timezone(time_zone).date_naive())
}

pub fn is_valid_expiry_date(value: &str) -> bool {
    parse_expiry_date(value, &Utc.fix()).is_some()
}

/// Reminders go out the day before a name expires and on the day itself.
/// Never fails: an unreadable date is a reason not to send.
pub fn should_notify(expiry_date: &str, today: NaiveDate, time_zone: &FixedOffset) -> ExpiryDecision {
    let expiry = match parse_expiry_date(expiry_date, time_zone) {
        Some(expiry) => expiry,
        None => return ExpiryDecision::skip(format!("Invalid expiry date: {}", expiry_date)),
    };
    let days_until_expiry = expiry.signed_duration_since(today).num_days();

    tracing::debug!(
        "Expiry date: {}, days until expiry: {}",
        expiry_date,
        days_until_expiry
    );

    match days_until_expiry {
        1 => ExpiryDecision::notify("expires tomorrow. renew it soon to avoid losing it."),
        0 => ExpiryDecision::notify("expires today! renew immediately to avoid losing it."),
        days => ExpiryDecision::skip(format!(
            "Not sending notification: {} days until expiry.",
            days
        )),
    }
}
