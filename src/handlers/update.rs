//! Update handler

use crate::ExpiryService;
use crate::error::{ExpiryError, Result};
use crate::pantry::{Item, ItemId, ItemStore, ItemUpdate};
use tracing::info;

impl ExpiryService {
    /// Edit the name and/or expiration date of a live item.
    ///
    /// Id and insertion time never change. Fails with `NotFound` for unknown
    /// or soft-deleted ids and `InvalidName` for a blank name; on failure the
    /// item is left as it was.
    pub fn update(&self, id: ItemId, update: ItemUpdate) -> Result<Item> {
        let item = self.commit("update", |pantry| {
            pantry.update(id, update)?;
            pantry.get(id).cloned().ok_or(ExpiryError::NotFound(id))
        })?;
        info!(item = %id, "item updated");
        Ok(item)
    }
}
