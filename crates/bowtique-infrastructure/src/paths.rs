//! Centralized path management for durable client state.

use std::path::PathBuf;

use bowtique_core::error::{CoreError, Result};

const APP_DIR: &str = "bowtique";

/// Resolves locations under the per-user data directory.
pub struct BowtiquePaths;

impl BowtiquePaths {
    /// Returns the application data directory, creating it if needed
    /// (e.g. `~/.local/share/bowtique` on Linux).
    pub fn data_dir() -> Result<PathBuf> {
        let base = dirs::data_dir()
            .ok_or_else(|| CoreError::storage("could not determine the user data directory"))?;
        let dir = base.join(APP_DIR);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Returns the path for a named file inside the data directory.
    pub fn data_file(name: &str) -> Result<PathBuf> {
        Ok(Self::data_dir()?.join(name))
    }

    /// Default location of the key-value store file.
    pub fn store_file() -> Result<PathBuf> {
        Self::data_file("store.json")
    }
}
