//! Grouping service
//!
//! Projects the item list into ordered display groups. Recomputed on every
//! call; nothing is cached between mutations.

use crate::bucketing::{self, Bucket, Category};
use crate::pantry::Item;
use chrono::NaiveDate;
use serde::Serialize;

/// One display group: every live item sharing a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemGroup {
    pub category: Category,
    pub items: Vec<Item>,
}

impl ItemGroup {
    pub fn bucket(&self) -> Bucket {
        self.category.bucket
    }
}

/// Group live items by bucket
///
/// Soft-deleted items are dropped. Groups come out most overdue first; items
/// inside a group follow [`bucketing::compare_items`].
pub fn group_items<'a, I>(items: I, today: NaiveDate) -> Vec<ItemGroup>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut live: Vec<&Item> = items.into_iter().filter(|i| i.is_live()).collect();
    live.sort_by(|a, b| bucketing::compare_items(a, b, today));

    let mut groups: Vec<ItemGroup> = Vec::new();
    for item in live {
        let category = bucketing::categorize(item.expiration_date(), today);
        // Sorted input means a bucket's items are contiguous
        match groups.last_mut() {
            Some(group) if group.category == category => group.items.push(item.clone()),
            _ => groups.push(ItemGroup {
                category,
                items: vec![item.clone()],
            }),
        }
    }
    groups
}
