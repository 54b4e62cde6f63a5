//! Bucketing engine
//!
//! Maps an expiration date and the reference date onto a semantic bucket.
//! Works on plain calendar dates only, so the result never depends on
//! timezone or locale; turning a bucket into words is the caller's job.

use crate::pantry::{Item, ItemId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Human-relevant category of an item relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "days", rename_all = "snake_case")]
pub enum Bucket {
    /// Expired more than one day ago; carries the number of days
    Expired(u32),
    Yesterday,
    Today,
    Tomorrow,
    /// Expires in more than one day; carries the number of days
    Upcoming(u32),
}

/// Result of [`categorize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub bucket: Bucket,
    /// Signed days from today to the expiration date; negative when expired
    pub day_offset: i64,
}

impl Category {
    pub fn is_expired(&self) -> bool {
        self.day_offset < 0
    }
}

/// Signed number of calendar days from `from` to `to`
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Classify an expiration date relative to `today`
pub fn categorize(expiration_date: NaiveDate, today: NaiveDate) -> Category {
    let day_offset = days_between(today, expiration_date);
    let days = u32::try_from(day_offset.unsigned_abs()).unwrap_or(u32::MAX);
    let bucket = match day_offset {
        -1 => Bucket::Yesterday,
        0 => Bucket::Today,
        1 => Bucket::Tomorrow,
        o if o < -1 => Bucket::Expired(days),
        _ => Bucket::Upcoming(days),
    };
    Category { bucket, day_offset }
}

/// Display ordering: most overdue first, then name (case-insensitive), then id
pub fn compare_items(a: &Item, b: &Item, today: NaiveDate) -> Ordering {
    sort_key(a, today).cmp(&sort_key(b, today))
}

/// Ordering key used by grouping and the reminder scheduler
pub fn sort_key(item: &Item, today: NaiveDate) -> (i64, String, ItemId) {
    (
        days_between(today, item.expiration_date()),
        item.name().to_lowercase(),
        item.id(),
    )
}
