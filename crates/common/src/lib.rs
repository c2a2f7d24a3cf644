//! Shared types for the tilescape engine: tile kinds, colors, the settings
//! accessor, and the engine constants every other crate agrees on.

pub mod settings;
pub mod types;

pub use settings::{NoSettings, SettingsSource};
pub use types::{ColorParseError, Rgb, Rgba, TileType};

/// Tile edge length in pixels when a world does not declare one.
pub const DEFAULT_TILE_SIZE: u32 = 32;

/// Distance in pixels NPC placements keep from the world edge.
pub const NPC_MARGIN: f64 = 50.0;

pub fn crate_info() -> &'static str {
    "tilescape-common v0.1.0"
}
