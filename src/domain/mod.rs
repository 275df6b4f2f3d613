pub mod alert_preference;
pub mod base_name;
pub mod delivery_credential;
pub mod new_alert_preference;
pub mod subscriber_id;
