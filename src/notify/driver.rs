//! Periodic reminder driver.
//!
//! Spawns a tokio task that, on every interval, purges expired soft deletes,
//! runs a scheduler tick and hands the events to a sink. The driver can be
//! stopped and started again (e.g. on app background/foreground); reminder
//! state lives in the service, so a restart does not re-fire old reminders.

use super::sink::NotificationSink;
use crate::ExpiryService;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

struct Running {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

pub struct ReminderDriver {
    service: Arc<ExpiryService>,
    sink: Arc<dyn NotificationSink>,
    period: Duration,
    running: Option<Running>,
}

impl ReminderDriver {
    pub fn new(
        service: Arc<ExpiryService>,
        sink: Arc<dyn NotificationSink>,
        period: Duration,
    ) -> Self {
        Self {
            service,
            sink,
            // interval() panics on a zero period
            period: period.max(Duration::from_millis(1)),
            running: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|r| !r.handle.is_finished())
    }

    /// Start the background loop. Returns `false` if it is already running.
    ///
    /// Must be called from within a tokio runtime. The first tick fires
    /// immediately.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(run_loop(
            Arc::clone(&self.service),
            Arc::clone(&self.sink),
            self.period,
            stop_rx,
        ));
        self.running = Some(Running { stop_tx, handle });
        let period_ms = u64::try_from(self.period.as_millis()).unwrap_or(u64::MAX);
        info!(period_ms, "reminder driver started");
        true
    }

    /// Stop the background loop and wait for it to exit
    pub async fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        let _ = running.stop_tx.send(true);
        if let Err(e) = running.handle.await {
            warn!("reminder driver task ended abnormally: {e}");
        }
        info!("reminder driver stopped");
    }
}

impl Drop for ReminderDriver {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.handle.abort();
        }
    }
}

async fn run_loop(
    service: Arc<ExpiryService>,
    sink: Arc<dyn NotificationSink>,
    period: Duration,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let service = Arc::clone(&service);
                let sink = Arc::clone(&sink);
                let pass = tokio::task::spawn_blocking(move || run_once(&service, sink.as_ref()));
                if let Err(e) = pass.await {
                    warn!("reminder pass failed: {e}");
                }
            }
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    debug!("reminder driver received stop");
                    break;
                }
            }
        }
    }
}

/// One driver pass: purge, tick, deliver. Never fails; returns the number of
/// events delivered.
pub fn run_once(service: &ExpiryService, sink: &dyn NotificationSink) -> usize {
    if let Err(e) = service.purge_expired() {
        warn!("purge of expired deletions failed, will retry next tick: {e}");
    }

    match service.tick() {
        Ok(events) => {
            for event in &events {
                sink.deliver(event);
            }
            events.len()
        }
        Err(e) => {
            warn!("reminder tick skipped: {e}");
            0
        }
    }
}
