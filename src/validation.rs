//! Input parsing helpers
//!
//! Parsing of user-supplied dates, times and ids for the CLI and config.

use crate::error::{ExpiryError, Result};
use crate::pantry::ItemId;
use chrono::{NaiveDate, NaiveTime};

/// Parse a date parameter
///
/// # Arguments
/// * `date_str` - Date string in YYYY-MM-DD format
///
/// # Returns
/// Result containing parsed NaiveDate or `InvalidDate`
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|_| ExpiryError::InvalidDate(date_str.to_string()))
}

/// Parse a local time of day in `HH:MM` format
pub fn parse_time_of_day(time_str: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(time_str.trim(), "%H:%M")
        .map_err(|_| ExpiryError::Config(format!("invalid time of day '{}'", time_str)))
}

/// Parse an item id given as `#N` or `N`
pub fn parse_item_id(id_str: &str) -> Result<ItemId> {
    id_str.parse()
}
