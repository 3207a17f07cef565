//! # Storage Module
//!
//! Persistence for the store's snapshot.
//!
//! The domain layer only sees the [`StateStorage`] trait. Two adapters are
//! provided:
//!
//! - **JsonFileStorage**: one JSON document under the `kidsbank-data` key in
//!   the configured data directory
//! - **MemoryStorage**: keeps the serialized snapshot in memory, for tests
//!
//! Saving is fire-and-forget from the store's point of view: a failed save is
//! logged and the in-memory state remains authoritative until the next
//! successful one.

pub mod json_file;
pub mod memory;
pub mod traits;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;
pub use traits::{StateStorage, STORAGE_KEY};
