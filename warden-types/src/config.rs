//! Pretty-printed JSON configuration files.

use crate::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// A configuration document persisted as a single JSON file.
///
/// Implementors only supply `Default`; loading and saving are shared.
pub trait JsonConfig: Serialize + DeserializeOwned + Default {
    /// Loads the configuration at `path`, writing the defaults there first
    /// if the file does not exist yet.
    fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Writes the configuration to `path`, replacing any previous content.
    fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
