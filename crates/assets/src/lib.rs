//! Texture availability tracking for tile rendering.
//!
//! Textures are identified by content-addressed ids derived from their key.
//! Loading happens elsewhere and out of band; a loader only flips the
//! [`TextureState`] of a tile type. The renderer polls that state every frame
//! and uses flat colors until a texture is `Loaded`.
//!
//! # Layout
//! The store can be persisted to disk as JSON for inspection.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;
use tilescape_common::TileType;

/// Content-addressed texture id computed from the texture key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureId(pub u64);

impl TextureId {
    /// Stable id for a texture key such as `"tiles/grass.png"`.
    pub fn from_key(key: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let result = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&result[..8]);
        Self(u64::from_le_bytes(bytes))
    }
}

/// A loaded texture the renderer can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureHandle {
    pub id: TextureId,
    /// Number of visual variants packed in the texture. Always at least 1.
    pub variants: u32,
}

impl TextureHandle {
    /// Pick a variant from a tile's `texture_variant` in `[0, 1)`.
    pub fn variant_index(&self, texture_variant: f64) -> u32 {
        let n = self.variants.max(1);
        let v = texture_variant.clamp(0.0, 1.0);
        ((v * n as f64) as u32).min(n - 1)
    }
}

/// Load status of one tile type's texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextureState {
    #[default]
    Unloaded,
    Loaded(TextureHandle),
    Failed,
}

/// Errors from texture store operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-tile-type texture states.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextureStore {
    states: BTreeMap<TileType, TextureState>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for a tile type. Types never requested are `Unloaded`.
    pub fn state(&self, tile: TileType) -> TextureState {
        self.states.get(&tile).copied().unwrap_or_default()
    }

    /// The handle to draw with, if the texture is loaded.
    pub fn texture_for(&self, tile: TileType) -> Option<TextureHandle> {
        match self.state(tile) {
            TextureState::Loaded(handle) => Some(handle),
            TextureState::Unloaded | TextureState::Failed => None,
        }
    }

    /// Record a completed load.
    pub fn mark_loaded(&mut self, tile: TileType, key: &str, variants: u32) -> TextureHandle {
        let handle = TextureHandle {
            id: TextureId::from_key(key),
            variants: variants.max(1),
        };
        tracing::debug!(%tile, key, ?handle.id, "texture loaded");
        self.states.insert(tile, TextureState::Loaded(handle));
        handle
    }

    /// Record a failed load. The tile type keeps drawing as flat color.
    pub fn mark_failed(&mut self, tile: TileType) {
        tracing::warn!(%tile, "texture failed to load, using flat color");
        self.states.insert(tile, TextureState::Failed);
    }

    /// Number of tile types with a loaded texture.
    pub fn loaded_count(&self) -> usize {
        self.states
            .values()
            .filter(|s| matches!(s, TextureState::Loaded(_)))
            .count()
    }

    /// Save the store to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a store from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path)?;
        let store: Self = serde_json::from_reader(file)?;
        Ok(store)
    }
}

pub fn crate_info() -> &'static str {
    "tilescape-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrequested_types_are_unloaded() {
        let store = TextureStore::new();
        assert_eq!(store.state(TileType::Grass), TextureState::Unloaded);
        assert!(store.texture_for(TileType::Grass).is_none());
    }

    #[test]
    fn loaded_texture_is_available() {
        let mut store = TextureStore::new();
        let handle = store.mark_loaded(TileType::Water, "tiles/water.png", 4);
        assert_eq!(store.texture_for(TileType::Water), Some(handle));
        assert_eq!(store.loaded_count(), 1);
    }

    #[test]
    fn failed_texture_falls_back() {
        let mut store = TextureStore::new();
        store.mark_loaded(TileType::Wall, "tiles/wall.png", 1);
        store.mark_failed(TileType::Wall);
        assert_eq!(store.state(TileType::Wall), TextureState::Failed);
        assert!(store.texture_for(TileType::Wall).is_none());
    }

    #[test]
    fn ids_are_content_addressed() {
        assert_eq!(TextureId::from_key("a.png"), TextureId::from_key("a.png"));
        assert_ne!(TextureId::from_key("a.png"), TextureId::from_key("b.png"));
    }

    #[test]
    fn variant_index_spans_all_variants() {
        let handle = TextureHandle {
            id: TextureId(1),
            variants: 4,
        };
        assert_eq!(handle.variant_index(0.0), 0);
        assert_eq!(handle.variant_index(0.49), 1);
        assert_eq!(handle.variant_index(0.999), 3);
        assert_eq!(handle.variant_index(1.0), 3);
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut store = TextureStore::new();
        store.mark_loaded(TileType::Grass, "tiles/grass.png", 2);
        store.mark_failed(TileType::Cave);
        store.save(tmp.path()).unwrap();

        let loaded = TextureStore::load(tmp.path()).unwrap();
        assert_eq!(loaded.state(TileType::Cave), TextureState::Failed);
        assert_eq!(loaded.loaded_count(), 1);
    }
}
