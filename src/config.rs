use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{error::CatalogError, inventory::DEFAULT_FILE, persistence::SaveMode};

/// Settings read from an optional TOML file.
///
/// ```toml
/// data_file = "books.txt"
/// atomic_save = false
/// log_level = "warn"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Catalog file to load and save
    pub data_file: PathBuf,
    /// Replace the file through a temp file and rename instead of in place
    pub atomic_save: bool,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { data_file: PathBuf::from(DEFAULT_FILE), atomic_save: false, log_level: "warn".to_string() }
    }
}

impl CatalogConfig {
    /// Read and parse a TOML configuration file
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ConfigRead` if the file cannot be read and
    /// `CatalogError::ConfigParse` if it is not a valid configuration.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)
            .map_err(|source| CatalogError::ConfigRead { path: path.to_path_buf(), source })?;
        toml::from_str(&contents)
            .map_err(|source| CatalogError::ConfigParse { path: path.to_path_buf(), source })
    }

    /// Save strategy implied by `atomic_save`
    #[must_use]
    pub fn save_mode(&self) -> SaveMode {
        if self.atomic_save { SaveMode::Atomic } else { SaveMode::Overwrite }
    }
}
