//! Serialization and deserialization implementations for Pantry
//!
//! The id index is not stored; it is rebuilt from the item list on load.

use super::item::Item;
use super::pantry_data::{FORMAT_VERSION, Pantry};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

#[derive(Deserialize)]
struct PantryHelper {
    #[serde(default = "default_format_version")]
    format_version: u32,
    #[serde(default)]
    item_counter: u64,
    #[serde(default, rename = "item")]
    items: Vec<Item>,
}

fn default_format_version() -> u32 {
    FORMAT_VERSION
}

impl<'de> Deserialize<'de> for Pantry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let helper = PantryHelper::deserialize(deserializer)?;

        if helper.format_version > FORMAT_VERSION {
            return Err(D::Error::custom(format!(
                "unsupported pantry format version {} (newest known is {})",
                helper.format_version, FORMAT_VERSION
            )));
        }

        let mut item_map = HashMap::new();
        for item in &helper.items {
            if item_map.insert(item.id(), item.state()).is_some() {
                return Err(D::Error::custom(format!("duplicate item id {}", item.id())));
            }
        }

        // A hand-edited file may carry a stale counter; never hand out a used id
        let max_id = helper.items.iter().map(|i| i.id().get()).max().unwrap_or(0);

        Ok(Pantry {
            format_version: FORMAT_VERSION,
            items: helper.items,
            item_map,
            item_counter: helper.item_counter.max(max_id),
        })
    }
}

impl Serialize for Pantry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Pantry", 3)?;
        state.serialize_field("format_version", &self.format_version)?;
        state.serialize_field("item_counter", &self.item_counter)?;
        if !self.items.is_empty() {
            state.serialize_field("item", &self.items)?;
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pantry::{ItemId, ItemState, ItemStore};
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_item_map_rebuilt_on_deserialize() {
        let mut pantry = Pantry::new();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let milk = pantry.insert("Milk", date, now).unwrap();
        let eggs = pantry.insert("Eggs", date, now).unwrap();
        pantry.mark_deleted(eggs, now).unwrap();

        let text = toml::to_string_pretty(&pantry).unwrap();
        let restored: Pantry = toml::from_str(&text).unwrap();

        assert_eq!(restored.item_counter, 2);
        assert_eq!(restored.item_map.get(&milk), Some(&ItemState::Live));
        assert_eq!(restored.item_map.get(&eggs), Some(&ItemState::SoftDeleted));
        assert_eq!(restored.get(eggs).unwrap().deletion_mark(), Some(now));
        assert_eq!(restored.list_all(), pantry.list_all());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let text = r#"
format_version = 1
item_counter = 1

[[item]]
id = 1
name = "Milk"
expiration_date = "2024-06-03"
inserted_at = "2024-06-01T08:00:00Z"

[[item]]
id = 1
name = "Eggs"
expiration_date = "2024-06-04"
inserted_at = "2024-06-01T08:00:00Z"
"#;
        let result: Result<Pantry, _> = toml::from_str(text);
        assert!(result.is_err());
    }

    #[test]
    fn test_stale_counter_is_raised() {
        let text = r#"
item_counter = 0

[[item]]
id = 9
name = "Butter"
expiration_date = "2024-06-03"
inserted_at = "2024-06-01T08:00:00Z"
"#;
        let mut pantry: Pantry = toml::from_str(text).unwrap();
        assert_eq!(pantry.generate_item_id(), ItemId::new(10));
    }

    #[test]
    fn test_empty_document_loads() {
        let pantry: Pantry = toml::from_str("").unwrap();
        assert!(pantry.is_empty());
        assert_eq!(pantry.format_version, FORMAT_VERSION);
    }
}
