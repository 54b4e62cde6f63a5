//! Delete handlers: soft delete, undo, hard delete and purge

use crate::ExpiryService;
use crate::error::Result;
use crate::pantry::{Item, ItemId, ItemStore};
use crate::undo::PendingUndo;
use tracing::info;

impl ExpiryService {
    /// Soft-delete a live item, starting its undo window.
    ///
    /// Returns the undo deadline. Fails with `NotFound` if the id is unknown
    /// or already soft-deleted.
    pub fn soft_delete(&self, id: ItemId) -> Result<PendingUndo> {
        let now = self.clock.now()?;
        let undo = self.undo;
        self.commit("soft_delete", |pantry| undo.soft_delete(pantry, id, now))?;
        info!(item = %id, "item removed, undo available");
        Ok(PendingUndo {
            id,
            deadline: undo.deadline(now),
        })
    }

    /// Restore a soft-deleted item.
    ///
    /// Fails with `NotFound` for unknown ids and `WindowExpired` once the
    /// undo window has elapsed.
    pub fn undo(&self, id: ItemId) -> Result<()> {
        let now = self.clock.now()?;
        let undo = self.undo;
        self.commit("undo", |pantry| undo.undo(pantry, id, now))?;
        info!(item = %id, "item restored");
        Ok(())
    }

    /// Remove an item permanently, bypassing the undo window.
    pub fn hard_delete(&self, id: ItemId) -> Result<Item> {
        let item = self.commit("hard_delete", |pantry| pantry.hard_delete(id))?;
        self.forget_reminders(&[id]);
        info!(item = %id, "item deleted");
        Ok(item)
    }

    /// Purge every soft-deleted item whose undo window elapsed.
    ///
    /// Idempotent and cheap when nothing is due. If persisting fails the
    /// items stay soft-deleted and the error is returned.
    pub fn purge_expired(&self) -> Result<Vec<ItemId>> {
        let now = self.clock.now()?;
        let undo = self.undo;

        // Skip the draft copy and the file write when nothing is due
        let due = self.read_pantry().soft_deleted().iter().any(|item| {
            item.deletion_mark()
                .is_some_and(|mark| undo.is_elapsed(mark, now))
        });
        if !due {
            return Ok(Vec::new());
        }

        let purged = self.commit("purge", |pantry| undo.purge_expired(pantry, now))?;
        self.forget_reminders(&purged);
        if !purged.is_empty() {
            info!(count = purged.len(), "purged removed items");
        }
        Ok(purged)
    }

    /// Soft-deleted items that can still be restored, earliest deadline first.
    pub fn pending_undo(&self) -> Result<Vec<PendingUndo>> {
        let now = self.clock.now()?;
        Ok(self.undo.pending(&*self.read_pantry(), now))
    }
}
