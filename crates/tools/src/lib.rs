//! Developer tooling for tile worlds.

mod inspector;

pub use inspector::{TileHistogram, TileInfo, WorldInspector, WorldSummary};

pub fn crate_info() -> &'static str {
    "tilescape-tools v0.1.0"
}
