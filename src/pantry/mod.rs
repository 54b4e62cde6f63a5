//! Pantry domain model and item store
//!
//! - `item`: the tracked item, its id and partial updates
//! - `store`: the `ItemStore` CRUD interface
//! - `pantry_data`: the in-memory store with its id index
//! - `serde_impl`: TOML (de)serialization of the pantry

mod item;
mod pantry_data;
mod serde_impl;
mod store;

pub use item::{Item, ItemId, ItemState, ItemUpdate};
pub use pantry_data::{FORMAT_VERSION, Pantry};
pub use store::ItemStore;
