//! Read handlers: raw listing and grouped projection

use crate::ExpiryService;
use crate::error::Result;
use crate::grouping::{self, ItemGroup};
use crate::pantry::{Item, ItemId, ItemStore};
use chrono::NaiveDate;

impl ExpiryService {
    /// Every stored item, soft-deleted ones included, in insertion order.
    pub fn list_all(&self) -> Vec<Item> {
        self.read_pantry().list_all()
    }

    pub fn get(&self, id: ItemId) -> Option<Item> {
        self.read_pantry().get(id).cloned()
    }

    /// Live items grouped by bucket relative to the clock's today.
    pub fn grouped(&self) -> Result<Vec<ItemGroup>> {
        let today = self.clock.today()?;
        Ok(self.grouped_at(today))
    }

    /// Live items grouped by bucket relative to `today`.
    ///
    /// Derived fresh from the current pantry on every call.
    pub fn grouped_at(&self, today: NaiveDate) -> Vec<ItemGroup> {
        let pantry = self.read_pantry();
        grouping::group_items(&pantry.items, today)
    }
}
