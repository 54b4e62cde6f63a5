//! Reminder scheduling
//!
//! - `scheduler`: pure per-tick decision of which reminders are due
//! - `sink`: where due reminders are handed off
//! - `driver`: the periodic tokio loop tying the two to an `ExpiryService`

mod driver;
mod scheduler;
mod sink;

pub use driver::{ReminderDriver, run_once};
pub use scheduler::{NotificationEvent, ReminderLedger, ReminderScheduler, TriggerPolicy};
pub use sink::{ChannelSink, LogSink, NotificationSink};
