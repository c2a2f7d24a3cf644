use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tilescape_common::SettingsSource;

use crate::store::PersistError;

/// Client settings persisted as a flat JSON object of strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsFile {
    values: BTreeMap<String, String>,
}

impl SettingsFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings; a missing file yields empty settings.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        serde_json::to_writer_pretty(std::fs::File::create(path)?, self)?;
        Ok(())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl SettingsSource for SettingsFile {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}
