//! Common test utilities for integration tests

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use food_expiry::{Config, ExpiryService, ManualClock, Storage};
use std::sync::Arc;
use tempfile::TempDir;

/// Reference date used throughout the integration tests
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

/// `today()` shifted by `days`
pub fn day(days: i64) -> NaiveDate {
    today() + Duration::days(days)
}

/// Clock at 09:00 on `today()`
pub fn test_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::at(today(), 9))
}

/// In-memory service with the default config and a manual clock
pub fn memory_service() -> (ExpiryService, Arc<ManualClock>) {
    memory_service_with(&Config::default())
}

pub fn memory_service_with(config: &Config) -> (ExpiryService, Arc<ManualClock>) {
    let clock = test_clock();
    let service = ExpiryService::in_memory(config, clock.clone()).unwrap();
    (service, clock)
}

/// File-backed service in a fresh temporary directory
pub fn file_service(config: &Config) -> (ExpiryService, Arc<ManualClock>, TempDir) {
    let dir = TempDir::new().unwrap();
    let clock = test_clock();
    let service = open_in(&dir, config, clock.clone());
    (service, clock, dir)
}

/// Open (or reopen) the pantry stored in `dir`
pub fn open_in(dir: &TempDir, config: &Config, clock: Arc<ManualClock>) -> ExpiryService {
    let storage = Storage::new(dir.path().join("pantry.toml"));
    ExpiryService::with_storage(storage, config, clock).unwrap()
}

/// Names of the items in each group, in display order
pub fn group_names(service: &ExpiryService) -> Vec<Vec<String>> {
    service
        .grouped()
        .unwrap()
        .iter()
        .map(|g| g.items.iter().map(|i| i.name().to_string()).collect())
        .collect()
}
