use crate::error::{ExpiryError, Result};
use crate::notify::ReminderLedger;
use crate::pantry::Pantry;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// TOML file persistence for the pantry and the reminder ledger
///
/// The ledger lives in a sidecar next to the pantry file
/// (`pantry.toml` -> `pantry.reminders.toml`) so the scheduler can persist
/// its state without touching item data.
pub struct Storage {
    file_path: PathBuf,
    ledger_path: PathBuf,
}

impl Storage {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let ledger_path = Self::ledger_path_for(&file_path);
        Self {
            file_path,
            ledger_path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    fn ledger_path_for(file_path: &Path) -> PathBuf {
        let stem = file_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "pantry".to_string());
        file_path.with_file_name(format!("{stem}.reminders.toml"))
    }

    pub fn load(&self) -> Result<Pantry> {
        Self::read_or_default(&self.file_path)
    }

    pub fn save(&self, pantry: &Pantry) -> Result<()> {
        Self::write(&self.file_path, pantry)
    }

    pub fn load_ledger(&self) -> Result<ReminderLedger> {
        Self::read_or_default(&self.ledger_path)
    }

    pub fn save_ledger(&self, ledger: &ReminderLedger) -> Result<()> {
        Self::write(&self.ledger_path, ledger)
    }

    fn read_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
        if !path.exists() {
            return Ok(T::default());
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| ExpiryError::Storage(format!("{}: {e}", path.display())))
    }

    /// Write through a temporary file so a failed save never truncates the
    /// previous contents
    fn write<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        let content = toml::to_string_pretty(value)
            .map_err(|e| ExpiryError::Storage(format!("{}: {e}", path.display())))?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("toml.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, path)?;
        debug!(path = %path.display(), "saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pantry::{ItemId, ItemStore};
    use chrono::{NaiveDate, Utc};
    use tempfile::TempDir;

    #[test]
    fn missing_files_load_empty() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("pantry.toml"));

        assert!(storage.load().unwrap().is_empty());
        assert!(storage.load_ledger().unwrap().is_empty());
    }

    #[test]
    fn save_creates_parent_dirs_and_reloads() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("nested").join("pantry.toml"));

        let mut pantry = Pantry::new();
        let id = pantry
            .insert("Milk", NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), Utc::now())
            .unwrap();
        storage.save(&pantry).unwrap();

        let mut ledger = ReminderLedger::new();
        ledger.record(id, 0);
        storage.save_ledger(&ledger).unwrap();

        let reloaded = storage.load().unwrap();
        assert_eq!(reloaded.get(id).unwrap().name(), "Milk");
        assert_eq!(storage.load_ledger().unwrap().last_notified(id), Some(0));
        assert_eq!(
            storage.ledger_path().file_name().unwrap(),
            "pantry.reminders.toml"
        );
        assert!(reloaded.get(ItemId::new(2)).is_none());
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pantry.toml");
        fs::write(&path, "this is not valid toml {{{").unwrap();

        let result = Storage::new(&path).load();
        assert!(matches!(result, Err(ExpiryError::Storage(_))));
    }
}
