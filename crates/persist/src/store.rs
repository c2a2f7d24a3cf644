//! File-backed world documents.
//!
//! Layout under the store root:
//! ```text
//! worlds/
//!   <name>/world.json   - custom world document
//! settings.json         - client settings (see `SettingsFile`)
//! ```

use std::path::{Path, PathBuf};
use tilescape_ingest::{IngestError, IngestedWorld, WorldDocument};

use crate::path::{PathRejected, validate_world_path, world_path_for};

/// Errors from file-backed persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    PathRejected(#[from] PathRejected),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// Reads and writes world documents beneath a root directory.
pub struct WorldStore {
    root: PathBuf,
}

impl WorldStore {
    /// Open a store rooted at `path`. Nothing is created until a save.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            root: path.as_ref().to_path_buf(),
        }
    }

    /// Get the path to the store root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the raw text of a world document. The identifier is checked
    /// against the allow-list before any filesystem access.
    pub fn read_document(&self, id: &str) -> Result<String, PersistError> {
        validate_world_path(id)?;
        let path = self.root.join(id);
        tracing::debug!(path = %path.display(), "reading world document");
        Ok(std::fs::read_to_string(path)?)
    }

    /// Read and ingest a world document.
    pub fn load_world(&self, id: &str) -> Result<IngestedWorld, PersistError> {
        let text = self.read_document(id)?;
        let world = tilescape_ingest::ingest_str(&text)?;
        tracing::info!(id, tiles = world.grid.len(), "world loaded");
        Ok(world)
    }

    /// Write a document under `worlds/<name>/world.json` and return its id.
    pub fn save_document(&self, name: &str, doc: &WorldDocument) -> Result<String, PersistError> {
        let id = world_path_for(name)?;
        let path = self.root.join(&id);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        serde_json::to_writer_pretty(std::fs::File::create(&path)?, doc)?;
        tracing::info!(id = %id, "world document saved");
        Ok(id)
    }

    /// Names of the worlds saved under this root, sorted.
    pub fn list_worlds(&self) -> Result<Vec<String>, PersistError> {
        let dir = self.root.join("worlds");
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if crate::path::is_world_name(&name) && entry.path().join("world.json").is_file() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}
