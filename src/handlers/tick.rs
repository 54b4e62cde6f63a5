//! Reminder tick handler

use crate::ExpiryService;
use crate::error::Result;
use crate::notify::NotificationEvent;
use tracing::debug;

impl ExpiryService {
    /// Run one reminder evaluation against the current clock.
    ///
    /// The pantry is snapshotted atomically at the start, so a mutation in
    /// flight is either fully visible or not at all. Returns
    /// `ClockUnavailable` (and emits nothing) if the clock fails.
    pub fn tick(&self) -> Result<Vec<NotificationEvent>> {
        let snapshot = self.list_all();

        let mut scheduler = self.lock_scheduler();
        let before = scheduler.ledger().clone();
        let events = scheduler.tick(&snapshot, self.clock.as_ref())?;
        if *scheduler.ledger() != before {
            self.persist_ledger(&scheduler);
        }
        debug!(events = events.len(), "reminder tick");
        Ok(events)
    }
}
