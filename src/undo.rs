//! Undo window manager
//!
//! Bridges soft delete and hard delete with a bounded recovery period:
//!
//! ```text
//! live --soft_delete--> soft-deleted --undo (within window)--> live
//!                            |
//!                            +--purge_expired (window elapsed)--> gone
//! ```
//!
//! This is the only component that turns a soft-deleted item into a purged one.

use crate::error::{ExpiryError, Result};
use crate::pantry::{ItemId, ItemState, ItemStore};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// A soft-deleted item that can still be restored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingUndo {
    pub id: ItemId,
    /// Last instant at which `undo` still succeeds
    pub deadline: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoWindow {
    window: Duration,
}

impl UndoWindow {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Last instant at which an item deleted at `mark` can be restored
    pub fn deadline(&self, mark: DateTime<Utc>) -> DateTime<Utc> {
        mark.checked_add_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// True once `now - mark` exceeds the window
    pub fn is_elapsed(&self, mark: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(mark) > self.window
    }

    /// Mark a live item as deleted at `now`
    pub fn soft_delete<S: ItemStore + ?Sized>(
        &self,
        store: &mut S,
        id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<()> {
        store.mark_deleted(id, now)?;
        debug!(item = %id, "soft-deleted");
        Ok(())
    }

    /// Restore a soft-deleted item if its window is still open
    ///
    /// An item whose window elapsed is treated as already gone: the call
    /// fails with `WindowExpired` and the item stays soft-deleted until purged.
    pub fn undo<S: ItemStore + ?Sized>(
        &self,
        store: &mut S,
        id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mark = match store.get(id) {
            Some(item) => item.deletion_mark().ok_or(ExpiryError::NotFound(id))?,
            None => return Err(ExpiryError::NotFound(id)),
        };
        if self.is_elapsed(mark, now) {
            return Err(ExpiryError::WindowExpired(id));
        }
        store.clear_deleted(id)?;
        debug!(item = %id, "undo");
        Ok(())
    }

    /// Hard-delete every soft-deleted item whose window has elapsed
    ///
    /// Returns the purged ids. Idempotent: a second call with the same `now`
    /// purges nothing.
    pub fn purge_expired<S: ItemStore + ?Sized>(
        &self,
        store: &mut S,
        now: DateTime<Utc>,
    ) -> Result<Vec<ItemId>> {
        let expired: Vec<ItemId> = store
            .list_all()
            .iter()
            .filter(|item| {
                item.deletion_mark()
                    .is_some_and(|mark| self.is_elapsed(mark, now))
            })
            .map(|item| item.id())
            .collect();

        for id in &expired {
            store.hard_delete(*id)?;
        }
        if !expired.is_empty() {
            debug!(count = expired.len(), "purged soft-deleted items");
        }
        Ok(expired)
    }

    /// Soft-deleted items still inside their window, earliest deadline first
    pub fn pending<S: ItemStore + ?Sized>(&self, store: &S, now: DateTime<Utc>) -> Vec<PendingUndo> {
        let mut pending: Vec<PendingUndo> = store
            .list_all()
            .iter()
            .filter(|item| item.state() == ItemState::SoftDeleted)
            .filter_map(|item| {
                let mark = item.deletion_mark()?;
                (!self.is_elapsed(mark, now)).then(|| PendingUndo {
                    id: item.id(),
                    deadline: self.deadline(mark),
                })
            })
            .collect();
        pending.sort_by_key(|p| (p.deadline, p.id));
        pending
    }
}

impl Default for UndoWindow {
    fn default() -> Self {
        Self::new(Duration::seconds(5))
    }
}
