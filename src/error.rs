//! Error types for the pantry core.

use crate::pantry::ItemId;

/// Errors surfaced by store mutations, the undo window and the reminder scheduler.
#[derive(Debug, thiserror::Error)]
pub enum ExpiryError {
    /// The referenced item does not exist (or is not in the state the operation needs).
    #[error("item {0} not found")]
    NotFound(ItemId),

    /// Undo was attempted after the grace period elapsed.
    #[error("undo window for item {0} has expired")]
    WindowExpired(ItemId),

    /// The clock could not provide the current time.
    #[error("clock unavailable: {0}")]
    ClockUnavailable(String),

    /// Item names must contain at least one non-whitespace character.
    #[error("item name must not be empty")]
    InvalidName,

    /// Date input that is not `YYYY-MM-DD`.
    #[error("invalid date '{0}'. Use YYYY-MM-DD (e.g., '2025-03-15')")]
    InvalidDate(String),

    /// Item id input that is not `#N` or `N`.
    #[error("invalid item id '{0}'")]
    InvalidId(String),

    /// Reading or writing persisted state failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration could not be read or is inconsistent.
    #[error("config error: {0}")]
    Config(String),
}

impl From<std::io::Error> for ExpiryError {
    fn from(e: std::io::Error) -> Self {
        ExpiryError::Storage(e.to_string())
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ExpiryError>;
