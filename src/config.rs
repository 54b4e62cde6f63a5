//! Configuration loaded from a TOML file.
//!
//! ```toml
//! undo_window_secs = 5
//! tick_interval_secs = 60
//! overdue_days = 3
//! lead_days = [1, 3]
//! notify_after = "08:30"
//! data_file = "/home/me/.local/share/food-expiry/pantry.toml"
//! ```
//!
//! Every key is optional.

use crate::error::{ExpiryError, Result};
use crate::notify::TriggerPolicy;
use crate::undo::UndoWindow;
use crate::validation;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Longest accepted undo window: one day
pub const MAX_UNDO_WINDOW_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How long a soft-deleted item can be restored.
    pub undo_window_secs: u64,
    /// Period of the reminder driver.
    pub tick_interval_secs: u64,
    /// Expired items keep producing a reminder for this many days past expiration.
    pub overdue_days: u32,
    /// Days before expiration that also produce a reminder.
    pub lead_days: Vec<i64>,
    /// Local `HH:MM` before which no reminders are emitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_after: Option<String>,
    /// Pantry file; defaults to [`Config::default_data_path`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            undo_window_secs: 5,
            tick_interval_secs: 60,
            overdue_days: 0,
            lead_days: vec![1],
            notify_after: None,
            data_file: None,
        }
    }
}

impl Config {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file cannot be read, is not valid TOML, or
    /// holds inconsistent values.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ExpiryError::Config(format!("{}: {e}", path.display())))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ExpiryError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.undo_window_secs > MAX_UNDO_WINDOW_SECS {
            return Err(ExpiryError::Config(format!(
                "undo_window_secs must be at most {MAX_UNDO_WINDOW_SECS}, got {}",
                self.undo_window_secs
            )));
        }
        if self.tick_interval_secs == 0 {
            return Err(ExpiryError::Config(
                "tick_interval_secs must be at least 1".to_string(),
            ));
        }
        if let Some(bad) = self.lead_days.iter().find(|d| **d < 1) {
            return Err(ExpiryError::Config(format!(
                "lead_days must be positive, got {bad} (use overdue_days for today and past dates)"
            )));
        }
        if let Some(ref time) = self.notify_after {
            validation::parse_time_of_day(time)
                .map_err(|_| ExpiryError::Config(format!("notify_after '{time}' is not HH:MM")))?;
        }
        Ok(())
    }

    pub fn undo_window(&self) -> UndoWindow {
        let secs = i64::try_from(self.undo_window_secs).unwrap_or(i64::MAX);
        UndoWindow::new(chrono::Duration::try_seconds(secs).unwrap_or(chrono::Duration::MAX))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs.max(1))
    }

    pub fn trigger_policy(&self) -> Result<TriggerPolicy> {
        self.validate()?;
        let notify_after = self
            .notify_after
            .as_deref()
            .map(validation::parse_time_of_day)
            .transpose()?;
        Ok(TriggerPolicy {
            overdue_days: self.overdue_days,
            lead_days: self.lead_days.iter().copied().collect(),
            notify_after,
        })
    }

    /// The configured pantry file, or the platform default.
    pub fn data_path(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(Self::default_data_path)
    }

    /// Returns the default pantry path: `~/.local/share/food-expiry/pantry.toml`.
    pub fn default_data_path() -> PathBuf {
        if let Some(data) = std::env::var_os("XDG_DATA_HOME") {
            PathBuf::from(data).join("food-expiry").join("pantry.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("food-expiry")
                .join("pantry.toml")
        } else {
            PathBuf::from("food-expiry-pantry.toml")
        }
    }

    /// Returns the default config path: `~/.config/food-expiry/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("food-expiry").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("food-expiry")
                .join("config.toml")
        } else {
            PathBuf::from("food-expiry-config.toml")
        }
    }
}
