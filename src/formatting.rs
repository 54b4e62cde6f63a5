//! Formatting helpers for the command-line front end
//!
//! The core only hands out buckets and offsets; this is the one place that
//! turns them into (English) text.

use crate::bucketing::Bucket;
use crate::grouping::ItemGroup;
use crate::notify::NotificationEvent;
use crate::pantry::Item;
use crate::undo::PendingUndo;

/// Human-readable label of a bucket
///
/// # Examples
/// ```
/// # use food_expiry::bucketing::Bucket;
/// # use food_expiry::formatting::describe_bucket;
/// assert_eq!(describe_bucket(Bucket::Expired(3)), "expired 3 days ago");
/// assert_eq!(describe_bucket(Bucket::Upcoming(4)), "in 4 days");
/// ```
pub fn describe_bucket(bucket: Bucket) -> String {
    match bucket {
        Bucket::Expired(days) => format!("expired {} days ago", days),
        Bucket::Yesterday => "yesterday".to_string(),
        Bucket::Today => "today".to_string(),
        Bucket::Tomorrow => "tomorrow".to_string(),
        Bucket::Upcoming(days) => format!("in {} days", days),
    }
}

/// Format grouped items into a display string
///
/// # Arguments
/// * `groups` - Output of the grouping service
///
/// # Returns
/// One heading per group followed by its items
pub fn format_groups(groups: &[ItemGroup]) -> String {
    if groups.is_empty() {
        return "No items found".to_string();
    }

    let mut result = String::new();
    for group in groups {
        result.push_str(&format!("{}:\n", capitalize(&describe_bucket(group.bucket()))));
        for item in &group.items {
            result.push_str(&format!(
                "  - [{}] {} ({})\n",
                item.id(),
                item.name(),
                item.expiration_date()
            ));
        }
    }
    result
}

/// Format every stored item, soft-deleted ones flagged
pub fn format_items(items: &[Item]) -> String {
    if items.is_empty() {
        return "No items found".to_string();
    }

    let mut result = format!("Found {} item(s):\n\n", items.len());
    for item in items {
        result.push_str(&format!(
            "- [{}] {} (expires: {})\n",
            item.id(),
            item.name(),
            item.expiration_date()
        ));
        result.push_str(&format!("  Inserted: {}\n", item.inserted_at()));
        if let Some(mark) = item.deletion_mark() {
            result.push_str(&format!("  Deleted: {} (undo pending)\n", mark));
        }
    }
    result
}

/// One line per reminder event
pub fn format_event(event: &NotificationEvent) -> String {
    let when = match event.category.bucket {
        expired @ Bucket::Expired(_) => describe_bucket(expired),
        Bucket::Yesterday => "expired yesterday".to_string(),
        other => format!("expires {}", describe_bucket(other)),
    };
    format!("Reminder: {} [{}] {}", event.item_name, event.item_id, when)
}

/// Undo hint printed after a soft delete
pub fn format_pending_undo(pending: &PendingUndo) -> String {
    format!(
        "Item {} removed. Undo with `undo {}` before {}",
        pending.id, pending.id, pending.deadline
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
