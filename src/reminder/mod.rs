pub mod dedup;
pub mod delivery;
pub mod expiry_policy;
pub mod processor;
pub mod report;

pub use processor::{ReminderMessages, ReminderProcessor};
pub use report::ProcessingReport;
