//! Insert handler

use crate::ExpiryService;
use crate::error::Result;
use crate::pantry::{ItemId, ItemStore};
use chrono::NaiveDate;
use tracing::info;

impl ExpiryService {
    /// Add a new item and return its assigned id.
    ///
    /// The insertion instant comes from the service clock. Fails with
    /// `InvalidName` for a blank name.
    pub fn insert(&self, name: &str, expiration_date: NaiveDate) -> Result<ItemId> {
        let now = self.clock.now()?;
        let id = self.commit("insert", |pantry| {
            pantry.insert(name, expiration_date, now)
        })?;
        info!(item = %id, %expiration_date, "item added");
        Ok(id)
    }
}
