//! Delivery sinks for reminder events
//!
//! The core never knows whether a notification was actually shown; a sink
//! just receives the events of each tick.

use super::scheduler::NotificationEvent;
use tokio::sync::mpsc;
use tracing::{debug, info};

pub trait NotificationSink: Send + Sync {
    fn deliver(&self, event: &NotificationEvent);
}

impl<F> NotificationSink for F
where
    F: Fn(&NotificationEvent) + Send + Sync,
{
    fn deliver(&self, event: &NotificationEvent) {
        self(event)
    }
}

/// Writes each event to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn deliver(&self, event: &NotificationEvent) {
        info!(
            item = %event.item_id,
            name = %event.item_name,
            day_offset = event.day_offset(),
            "reminder due"
        );
    }
}

/// Forwards events to an async consumer
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<NotificationEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<NotificationEvent>) -> Self {
        Self { tx }
    }

    /// Sink plus the receiving half
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<NotificationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl NotificationSink for ChannelSink {
    fn deliver(&self, event: &NotificationEvent) {
        if self.tx.send(event.clone()).is_err() {
            debug!(item = %event.item_id, "reminder receiver closed, event dropped");
        }
    }
}
