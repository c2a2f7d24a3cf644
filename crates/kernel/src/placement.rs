use serde::{Deserialize, Serialize};

/// A named location where players or other actors appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub name: String,
    /// Free-form tag, e.g. `"player"`.
    pub kind: String,
    /// Pixel-space position.
    pub x: f64,
    pub y: f64,
    /// Set when the source position lay outside the world and was pulled in.
    pub clamped: bool,
}

impl SpawnPoint {
    /// The tile containing this spawn point.
    pub fn tile(&self, tile_size: u32) -> (i64, i64) {
        let ts = tile_size.max(1) as f64;
        ((self.x / ts).floor() as i64, (self.y / ts).floor() as i64)
    }
}

/// A fully resolved NPC. Archetype defaults are copied in by value, so a
/// placement never refers back to the table it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcPlacement {
    pub id: String,
    pub display_name: String,
    /// Pixel-space position.
    pub x: f64,
    pub y: f64,
    pub behavior_tag: String,
    pub wander_radius: f64,
    pub interaction_radius: f64,
    pub dialogue: Vec<String>,
    /// Edge length in pixels.
    pub size: f64,
    pub sprite_reference: Option<String>,
    pub clamped: bool,
}
