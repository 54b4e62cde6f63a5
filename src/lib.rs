//! Food Expiry Tracker Library
//!
//! Tracks perishable items by expiration date, groups them into human-relevant
//! buckets ("yesterday", "today", "in 3 days", ...) and decides when to remind
//! the user about them.
//!
//! # Architecture
//!
//! - **Service Layer**: `ExpiryService` - serialized mutations, snapshot reads, persistence
//! - **Domain Layer**: `pantry`, `bucketing`, `grouping`, `undo`, `notify` - pure core logic
//! - **Persistence Layer**: `storage` - TOML files for items and reminder state
//!
//! # Example
//!
//! ```no_run
//! use food_expiry::{Config, ExpiryService, SystemClock};
//! use std::sync::Arc;
//!
//! fn main() -> food_expiry::Result<()> {
//!     let config = Config::default();
//!     let service = ExpiryService::open(&config, Arc::new(SystemClock))?;
//!     let today = service.today()?;
//!     service.insert("Milk", today)?;
//!     for group in service.grouped()? {
//!         println!("{:?}: {} item(s)", group.bucket(), group.items.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod bucketing;
pub mod clock;
pub mod config;
pub mod error;
pub mod formatting;
pub mod grouping;
mod handlers;
pub mod logging;
pub mod notify;
pub mod pantry;
mod storage;
pub mod undo;
pub mod validation;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

// Re-export commonly used types
pub use bucketing::{Bucket, Category, categorize};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{ExpiryError, Result};
pub use grouping::{ItemGroup, group_items};
pub use notify::{NotificationEvent, NotificationSink, ReminderDriver, TriggerPolicy};
pub use pantry::{Item, ItemId, ItemStore, ItemUpdate, Pantry};
pub use storage::Storage;
pub use undo::{PendingUndo, UndoWindow};

use notify::ReminderScheduler;

/// Single owner of one user's pantry
///
/// All mutations are serialized behind one writer mutex and applied to a
/// draft copy that only replaces the live pantry after it has been persisted,
/// so a failed operation leaves no trace. The pantry lock itself is held for
/// the snapshot and the swap only, never across file I/O, so reads and
/// reminder ticks do not wait for a mutation in flight.
pub struct ExpiryService {
    pub(crate) pantry: RwLock<Pantry>,
    writer: Mutex<()>,
    pub(crate) scheduler: Mutex<ReminderScheduler>,
    pub(crate) storage: Option<Storage>,
    pub(crate) undo: UndoWindow,
    pub(crate) clock: Arc<dyn Clock>,
}

impl ExpiryService {
    /// Open the pantry file named by `config`, creating it on first save
    ///
    /// # Arguments
    /// * `config` - Undo window, trigger policy and data file location
    /// * `clock` - Time source
    pub fn open(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        Self::with_storage(Storage::new(config.data_path()), config, clock)
    }

    /// Build a service persisting through `storage`
    pub fn with_storage(storage: Storage, config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let pantry = storage.load()?;
        let ledger = storage.load_ledger()?;
        debug!(
            path = %storage.path().display(),
            items = pantry.len(),
            reminders = ledger.len(),
            "loaded pantry"
        );
        let scheduler = ReminderScheduler::new(config.trigger_policy()?).with_ledger(ledger);
        Ok(Self {
            pantry: RwLock::new(pantry),
            writer: Mutex::new(()),
            scheduler: Mutex::new(scheduler),
            storage: Some(storage),
            undo: config.undo_window(),
            clock,
        })
    }

    /// Build a service that keeps everything in memory
    pub fn in_memory(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        Ok(Self {
            pantry: RwLock::new(Pantry::new()),
            writer: Mutex::new(()),
            scheduler: Mutex::new(ReminderScheduler::new(config.trigger_policy()?)),
            storage: None,
            undo: config.undo_window(),
            clock,
        })
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn undo_window(&self) -> UndoWindow {
        self.undo
    }

    /// The local calendar date used for bucketing
    pub fn today(&self) -> Result<chrono::NaiveDate> {
        self.clock.today()
    }

    pub(crate) fn read_pantry(&self) -> RwLockReadGuard<'_, Pantry> {
        self.pantry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_pantry(&self) -> RwLockWriteGuard<'_, Pantry> {
        self.pantry.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn lock_scheduler(&self) -> MutexGuard<'_, ReminderScheduler> {
        self.scheduler.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` to a draft of the pantry and swap it in once persisted
    ///
    /// Holds the writer mutex for the whole operation, which serializes all
    /// mutations. The pantry lock is taken only to copy and to swap, and the
    /// scheduler lock is never taken while the writer mutex is held.
    pub(crate) fn commit<T>(
        &self,
        action: &str,
        f: impl FnOnce(&mut Pantry) -> Result<T>,
    ) -> Result<T> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut draft = self.read_pantry().clone();
        let out = f(&mut draft)?;
        if let Some(storage) = &self.storage {
            storage.save(&draft)?;
        }
        *self.write_pantry() = draft;
        debug!(action, "committed");
        Ok(out)
    }

    /// Persist the reminder ledger; failures are logged, not returned
    ///
    /// A lost ledger write at worst repeats a reminder after a restart.
    pub(crate) fn persist_ledger(&self, scheduler: &ReminderScheduler) {
        if let Some(storage) = &self.storage
            && let Err(e) = storage.save_ledger(scheduler.ledger())
        {
            warn!("cannot persist reminder state: {e}");
        }
    }

    /// Drop reminder state of removed items
    pub(crate) fn forget_reminders(&self, ids: &[ItemId]) {
        if ids.is_empty() {
            return;
        }
        let mut scheduler = self.lock_scheduler();
        if scheduler.forget(ids.iter().copied()) {
            self.persist_ledger(&scheduler);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    fn service() -> ExpiryService {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let clock = Arc::new(ManualClock::at(date, 9));
        ExpiryService::in_memory(&Config::default(), clock).unwrap()
    }

    #[test]
    fn tick_does_not_wait_for_slow_commit() {
        let service = service();
        let today = service.today().unwrap();
        service.insert("Milk", today).unwrap();

        let (started_tx, started_rx) = mpsc::channel();
        std::thread::scope(|s| {
            s.spawn(|| {
                service
                    .commit("slow", |pantry| {
                        let id = pantry.insert("Eggs", today, chrono::Utc::now())?;
                        started_tx.send(()).unwrap();
                        std::thread::sleep(Duration::from_millis(500));
                        Ok(id)
                    })
                    .unwrap();
            });

            started_rx.recv().unwrap();
            let begin = Instant::now();
            let events = service.tick().unwrap();
            let groups = service.grouped().unwrap();
            assert!(begin.elapsed() < Duration::from_millis(250));

            // The in-flight insert is not visible yet
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].item_name, "Milk");
            assert_eq!(groups[0].items.len(), 1);
        });

        assert_eq!(service.list_all().len(), 2);
    }

    #[test]
    fn failed_commit_leaves_pantry_untouched() {
        let service = service();
        let today = service.today().unwrap();
        let id = service.insert("Milk", today).unwrap();

        let result: Result<()> = service.commit("broken", |pantry| {
            pantry.update(id, ItemUpdate::rename("Oat milk"))?;
            Err(ExpiryError::Storage("disk full".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(service.get(id).unwrap().name(), "Milk");
    }
}
