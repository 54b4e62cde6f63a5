use crate::error::{ExpiryError, Result};
use crate::pantry::item::{Item, ItemId, ItemState, ItemUpdate};
use crate::pantry::store::ItemStore;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;

/// Current on-disk format version of the pantry file
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone)]
pub struct Pantry {
    /// Format version for the TOML file
    pub format_version: u32,

    /// All items, live and soft-deleted, in insertion order
    ///
    /// Insertion order keeps the TOML file diff-friendly; display order is
    /// always derived by the grouping service, never taken from here.
    pub(crate) items: Vec<Item>,

    /// Id index for O(1) lookup of existence and deletion state
    ///
    /// Kept in sync with `items` by every mutating operation and rebuilt on
    /// deserialization. Not serialized.
    pub(crate) item_map: HashMap<ItemId, ItemState>,

    /// Last id handed out; ids are never reused
    pub item_counter: u64,
}

impl Default for Pantry {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            items: Vec::new(),
            item_map: HashMap::new(),
            item_counter: 0,
        }
    }
}

// Serialize/Deserialize implementations are in serde_impl.rs

impl Pantry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a new unique item id
    pub fn generate_item_id(&mut self) -> ItemId {
        self.item_counter += 1;
        ItemId::new(self.item_counter)
    }

    /// Number of stored items, including soft-deleted ones
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items visible to grouping and reminders
    pub fn live_items(&self) -> Vec<&Item> {
        self.items.iter().filter(|i| i.is_live()).collect()
    }

    /// Items waiting in the undo window
    pub fn soft_deleted(&self) -> Vec<&Item> {
        self.items.iter().filter(|i| !i.is_live()).collect()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.item_map.contains_key(&id)
    }

    fn find_item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id() == id)
    }

    /// Look up an item that must currently be in `state`
    fn find_in_state_mut(&mut self, id: ItemId, state: ItemState) -> Result<&mut Item> {
        if self.item_map.get(&id) != Some(&state) {
            return Err(ExpiryError::NotFound(id));
        }
        self.find_item_mut(id).ok_or(ExpiryError::NotFound(id))
    }

    fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(ExpiryError::InvalidName);
        }
        Ok(())
    }
}

impl ItemStore for Pantry {
    fn insert(
        &mut self,
        name: &str,
        expiration_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<ItemId> {
        Self::validate_name(name)?;
        let id = self.generate_item_id();
        self.item_map.insert(id, ItemState::Live);
        self.items.push(Item::new(id, name, expiration_date, now));
        Ok(id)
    }

    fn update(&mut self, id: ItemId, update: ItemUpdate) -> Result<()> {
        // Validate before touching the item so a failed update changes nothing
        if let Some(ref name) = update.name {
            Self::validate_name(name)?;
        }
        let item = self.find_in_state_mut(id, ItemState::Live)?;
        item.apply(update);
        Ok(())
    }

    fn mark_deleted(&mut self, id: ItemId, at: DateTime<Utc>) -> Result<()> {
        let item = self.find_in_state_mut(id, ItemState::Live)?;
        item.set_deletion_mark(Some(at));
        self.item_map.insert(id, ItemState::SoftDeleted);
        Ok(())
    }

    fn clear_deleted(&mut self, id: ItemId) -> Result<()> {
        let item = self.find_in_state_mut(id, ItemState::SoftDeleted)?;
        item.set_deletion_mark(None);
        self.item_map.insert(id, ItemState::Live);
        Ok(())
    }

    fn hard_delete(&mut self, id: ItemId) -> Result<Item> {
        let pos = self
            .items
            .iter()
            .position(|i| i.id() == id)
            .ok_or(ExpiryError::NotFound(id))?;
        self.item_map.remove(&id);
        Ok(self.items.remove(pos))
    }

    fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id() == id)
    }

    fn list_all(&self) -> Vec<Item> {
        self.items.clone()
    }
}
