//! Operation handlers for ExpiryService
//!
//! Each group of operations is an `impl ExpiryService` block in its own file.

pub mod delete;
pub mod insert;
pub mod list;
pub mod tick;
pub mod update;
