//! Wire shape of a custom world document.
//!
//! Two legacy layouts coexist: tiles arrive either as a flat `tiles` list or
//! as a dense `mapData` code grid, and NPCs either as flat `npcs` records or
//! as `npcInstances` referencing `npcArchetypes`. The raw document keeps both
//! optional; [`WorldDocument::tile_source`] and [`WorldDocument::npc_source`]
//! collapse each pair into a single tagged value.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::IngestError;

/// Largest accepted world edge, in tiles.
pub const MAX_WORLD_TILES: u32 = 4096;
/// Largest accepted tile edge, in pixels.
pub const MAX_TILE_SIZE: u32 = 512;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldDocument {
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiles: Option<Vec<TileEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_data: Option<Vec<Vec<i64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npcs: Option<Vec<NpcEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npc_instances: Option<Vec<NpcInstance>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npc_archetypes: Option<Vec<NpcArchetype>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawn_points: Option<SpawnPointList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// One entry of the flat tile list, in tile coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileEntry {
    pub x: i64,
    pub y: i64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tile_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A fully specified NPC from the flat legacy layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcEntry {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Either a tag string or a `{ type, wanderRadius, ... }` object.
    #[serde(default)]
    pub behavior: Option<Value>,
    #[serde(default)]
    pub wander_radius: Option<f64>,
    #[serde(default)]
    pub interaction_radius: Option<f64>,
    #[serde(default)]
    pub dialogue: Option<Value>,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default, alias = "spriteData")]
    pub sprite: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A lightweight NPC that takes its defaults from an archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcInstance {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub archetype_id: Option<String>,
    pub position: Position,
    #[serde(default)]
    pub custom_properties: Option<Map<String, Value>>,
}

/// Shared NPC template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcArchetype {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub behavior: Option<Value>,
    #[serde(default)]
    pub default_size: Option<f64>,
    #[serde(default)]
    pub sprite_data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnPointList {
    #[serde(default)]
    pub spawn_points: Vec<SpawnEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Where a document's tiles come from.
#[derive(Debug, Clone, Copy)]
pub enum TileSource<'a> {
    List(&'a [TileEntry]),
    Map(&'a [Vec<i64>]),
    Empty,
}

/// Where a document's NPCs come from.
#[derive(Debug, Clone, Copy)]
pub enum NpcSource<'a> {
    Flat(&'a [NpcEntry]),
    Archetyped {
        instances: &'a [NpcInstance],
        archetypes: &'a [NpcArchetype],
    },
    None,
}

impl WorldDocument {
    /// Parse and schema-check a document.
    pub fn from_json(json: &str) -> Result<Self, IngestError> {
        let doc: Self = serde_json::from_str(json)?;
        doc.check()?;
        Ok(doc)
    }

    /// Semantic checks that serde's type checks do not cover.
    pub fn check(&self) -> Result<(), IngestError> {
        for (axis, value) in [("width", self.width), ("height", self.height)] {
            if value == 0 || value > MAX_WORLD_TILES {
                return Err(IngestError::invalid(format!(
                    "{axis} must be between 1 and {MAX_WORLD_TILES} tiles, got {value}"
                )));
            }
        }
        if let Some(ts) = self.tile_size {
            if ts == 0 || ts > MAX_TILE_SIZE {
                return Err(IngestError::invalid(format!(
                    "tileSize must be between 1 and {MAX_TILE_SIZE}, got {ts}"
                )));
            }
        }
        if self.tiles.is_some() && self.map_data.is_some() {
            return Err(IngestError::invalid("both tiles and mapData are present"));
        }
        if self.npcs.is_some() && self.npc_instances.is_some() {
            return Err(IngestError::invalid("both npcs and npcInstances are present"));
        }
        let finite = |x: f64, y: f64| x.is_finite() && y.is_finite();
        let npc_ok = self.npcs.iter().flatten().all(|n| finite(n.x, n.y));
        let instance_ok = self
            .npc_instances
            .iter()
            .flatten()
            .all(|n| finite(n.position.x, n.position.y));
        let spawn_ok = self
            .spawn_points
            .iter()
            .flat_map(|s| &s.spawn_points)
            .all(|s| finite(s.x, s.y));
        if !(npc_ok && instance_ok && spawn_ok) {
            return Err(IngestError::invalid("coordinates must be finite numbers"));
        }
        Ok(())
    }

    pub fn tile_source(&self) -> TileSource<'_> {
        match (&self.tiles, &self.map_data) {
            (Some(list), _) => TileSource::List(list),
            (None, Some(map)) => TileSource::Map(map),
            (None, None) => TileSource::Empty,
        }
    }

    pub fn npc_source(&self) -> NpcSource<'_> {
        match (&self.npcs, &self.npc_instances) {
            (Some(flat), _) => NpcSource::Flat(flat),
            (None, Some(instances)) => NpcSource::Archetyped {
                instances,
                archetypes: self.npc_archetypes.as_deref().unwrap_or(&[]),
            },
            (None, None) => NpcSource::None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.name.as_deref())
    }
}
