//! Item store interface
//!
//! The CRUD surface the rest of the core is written against. [`Pantry`] is
//! the in-memory implementation; persistence sits behind it in
//! [`crate::storage`].
//!
//! [`Pantry`]: crate::pantry::Pantry

use crate::error::Result;
use crate::pantry::item::{Item, ItemId, ItemUpdate};
use chrono::{DateTime, NaiveDate, Utc};

pub trait ItemStore {
    /// Add a live item and return its newly assigned id.
    ///
    /// Fails with `InvalidName` for a blank name.
    fn insert(
        &mut self,
        name: &str,
        expiration_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<ItemId>;

    /// Edit the name and/or expiration date of a live item.
    ///
    /// Fails with `NotFound` for unknown or soft-deleted ids. On error the
    /// item is left unchanged.
    fn update(&mut self, id: ItemId, update: ItemUpdate) -> Result<()>;

    /// Set the deletion mark of a live item.
    fn mark_deleted(&mut self, id: ItemId, at: DateTime<Utc>) -> Result<()>;

    /// Clear the deletion mark of a soft-deleted item.
    fn clear_deleted(&mut self, id: ItemId) -> Result<()>;

    /// Remove an item permanently, live or soft-deleted.
    fn hard_delete(&mut self, id: ItemId) -> Result<Item>;

    fn get(&self, id: ItemId) -> Option<&Item>;

    /// Every stored item, soft-deleted ones included.
    fn list_all(&self) -> Vec<Item>;
}
