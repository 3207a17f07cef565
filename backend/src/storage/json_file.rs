use anyhow::{Context, Result};
use shared::{PersistedState, StoreSnapshot};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::traits::{StateStorage, STORAGE_KEY};

/// Device-local storage: one JSON document named after the storage key,
/// inside a data directory
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    base_directory: PathBuf,
}

impl JsonFileStorage {
    /// Create storage rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).with_context(|| {
                format!("Failed to create data directory {}", base_path.display())
            })?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self { base_directory: base_path })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of the snapshot file
    pub fn snapshot_path(&self) -> PathBuf {
        self.base_directory.join(format!("{}.json", STORAGE_KEY))
    }
}

impl StateStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<StoreSnapshot>> {
        let path = self.snapshot_path();

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No snapshot at {}", path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        let snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed snapshot in {}", path.display()))?;
        Ok(Some(snapshot))
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        let path = self.snapshot_path();
        let raw = serde_json::to_string_pretty(state)?;

        // Atomic replace
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, raw)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!(
            "Saved snapshot with {} children and {} tasks",
            state.children.len(),
            state.tasks.len()
        );
        Ok(())
    }
}
