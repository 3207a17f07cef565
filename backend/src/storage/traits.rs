//! # Storage Traits
//!
//! The persistence port the store depends on. Implementations decide where the
//! snapshot lives (a JSON file, memory, a browser's local storage) without the
//! domain layer knowing.

use anyhow::Result;
use shared::{PersistedState, StoreSnapshot};
use std::sync::Arc;

/// Well-known key the snapshot is stored under
pub const STORAGE_KEY: &str = "kidsbank-data";

/// Trait defining the interface for snapshot storage
pub trait StateStorage: Send + Sync {
    /// Read the previously saved snapshot.
    ///
    /// Returns `Ok(None)` when nothing has been saved yet and an error when the
    /// stored data cannot be read or parsed. The store treats both as "start
    /// empty".
    fn load(&self) -> Result<Option<StoreSnapshot>>;

    /// Replace the saved snapshot with `state`
    fn save(&self, state: &PersistedState) -> Result<()>;
}

impl<T: StateStorage + ?Sized> StateStorage for Arc<T> {
    fn load(&self) -> Result<Option<StoreSnapshot>> {
        (**self).load()
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        (**self).save(state)
    }
}
