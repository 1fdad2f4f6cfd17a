//! File-backed key-value store.
//!
//! The desktop analogue of browser local storage: one JSON object (string to
//! string) per file, read once at open and rewritten whole on every mutation.
//! Writes go through a temp file and an atomic rename so a crash mid-write
//! never leaves a torn store on disk.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use bowtique_core::error::Result;
use bowtique_core::storage::KeyValueStore;

use crate::paths::BowtiquePaths;

/// Durable, synchronous, string-keyed store persisted as a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Opens the store at `path`, seeding from the file when it exists.
    ///
    /// An absent file starts empty; a corrupt file is logged and also starts
    /// empty, matching the recovery policy of the engines above it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "store file is corrupt, starting empty");
                    HashMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read store file, starting empty");
                HashMap::new()
            }
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Opens the store at its default per-user location.
    pub fn open_default() -> Result<Self> {
        Ok(Self::open(BowtiquePaths::store_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrites the whole file: serialize, write to a sibling temp file,
    /// rename into place.
    fn flush(&self, entries: &HashMap<String, String>) -> Result<()> {
        let payload = serde_json::to_string_pretty(entries)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, payload)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key);
        self.flush(&entries)
    }
}
