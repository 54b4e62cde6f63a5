use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ExpiryError;

/// Opaque, store-assigned item identifier
///
/// Displayed as `#N`. Ids come from a monotonically increasing counter and
/// are never reused, even after the item is purged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = ExpiryError;

    /// Accepts both `#12` and `12`, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        digits
            .parse::<u64>()
            .map(ItemId)
            .map_err(|_| ExpiryError::InvalidId(s.to_string()))
    }
}

/// Whether an item is visible or waiting in the undo window
///
/// Mirrors `Item::deletion_mark` in the pantry's id index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemState {
    /// Visible to grouping and reminders
    Live,
    /// Soft-deleted; recoverable until purged
    SoftDeleted,
}

/// A perishable item tracked by expiration date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    name: String,
    expiration_date: NaiveDate,
    inserted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deletion_mark: Option<DateTime<Utc>>,
}

impl Item {
    /// Build a live item. The name is stored trimmed.
    pub fn new(
        id: ItemId,
        name: &str,
        expiration_date: NaiveDate,
        inserted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            expiration_date,
            inserted_at,
            deletion_mark: None,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expiration_date(&self) -> NaiveDate {
        self.expiration_date
    }

    pub fn inserted_at(&self) -> DateTime<Utc> {
        self.inserted_at
    }

    /// Instant of the soft delete, if the item is waiting in the undo window
    pub fn deletion_mark(&self) -> Option<DateTime<Utc>> {
        self.deletion_mark
    }

    pub fn is_live(&self) -> bool {
        self.deletion_mark.is_none()
    }

    pub fn state(&self) -> ItemState {
        if self.is_live() {
            ItemState::Live
        } else {
            ItemState::SoftDeleted
        }
    }

    pub(crate) fn apply(&mut self, update: ItemUpdate) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(date) = update.expiration_date {
            self.expiration_date = date;
        }
    }

    pub(crate) fn set_deletion_mark(&mut self, mark: Option<DateTime<Utc>>) {
        self.deletion_mark = mark;
    }
}

/// Partial edit of an item; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub expiration_date: Option<NaiveDate>,
}

impl ItemUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            expiration_date: None,
        }
    }

    pub fn reschedule(expiration_date: NaiveDate) -> Self {
        Self {
            name: None,
            expiration_date: Some(expiration_date),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.expiration_date.is_none()
    }
}
