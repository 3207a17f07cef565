use anyhow::{Context, Result};
use shared::{PersistedState, StoreSnapshot};
use std::sync::{Mutex, PoisonError};

use super::traits::StateStorage;

/// In-memory storage holding the serialized snapshot, the way a browser's
/// local storage holds a string under a key. Used by tests and ephemeral
/// sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    value: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw stored string, if anything has been saved
    pub fn raw(&self) -> Option<String> {
        self.value.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Overwrite the stored string directly
    pub fn set_raw(&self, raw: impl Into<String>) {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(raw.into());
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self) -> Result<Option<StoreSnapshot>> {
        match self.raw() {
            Some(raw) => {
                let snapshot = serde_json::from_str(&raw).context("Stored snapshot is not valid")?;
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        let raw = serde_json::to_string(state)?;
        self.set_raw(raw);
        Ok(())
    }
}
