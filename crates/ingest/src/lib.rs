//! Custom world ingestion: turns an externally supplied world document into a
//! tile grid plus spawn and NPC placement lists.
//!
//! # Invariants
//! - A document that fails schema checks produces no grid at all.
//! - Once ingested, nothing downstream can tell which legacy shape a
//!   document used.
//! - Out-of-range positions are clamped and reported, never fatal.

pub mod coords;
pub mod document;
pub mod npc;
pub mod tiles;

use serde_json::Value;
use tilescape_common::DEFAULT_TILE_SIZE;
use tilescape_kernel::{NpcPlacement, SpawnPoint, TileGrid, TileGridError};

pub use coords::{Bounds, CoordSpace, classify_coords, to_pixel};
pub use document::{NpcSource, TileSource, WorldDocument};

/// Errors that abort ingestion.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("world document is invalid: {0}")]
    WorldDocumentInvalid(String),
}

impl IngestError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::WorldDocumentInvalid(reason.into())
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(e: serde_json::Error) -> Self {
        Self::WorldDocumentInvalid(e.to_string())
    }
}

impl From<TileGridError> for IngestError {
    fn from(e: TileGridError) -> Self {
        Self::WorldDocumentInvalid(e.to_string())
    }
}

/// Something ingestion corrected or worked around. Never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A spawn or NPC position was outside the allowed area and was moved.
    OutOfBoundsClamped {
        entity: String,
        from: (f64, f64),
        to: (f64, f64),
    },
    /// An NPC instance referenced an archetype that does not exist.
    MissingArchetype { npc: String, archetype: String },
    /// Tiles that fell outside the declared world size.
    CellsOutOfBounds { count: usize },
    /// A tile list entry named a type we do not know; it became grass.
    UnknownTileType { name: String },
    /// A tile color was not `#rrggbb`; the table color was kept.
    InvalidColor { value: String },
}

pub type Diagnostics = Vec<Diagnostic>;

/// Everything produced by one successful ingestion.
#[derive(Debug, Clone)]
pub struct IngestedWorld {
    pub name: Option<String>,
    pub grid: TileGrid,
    pub spawn_points: Vec<SpawnPoint>,
    pub npcs: Vec<NpcPlacement>,
    pub diagnostics: Diagnostics,
}

/// Parse, check, and ingest a JSON world document.
pub fn ingest_str(json: &str) -> Result<IngestedWorld, IngestError> {
    let doc: WorldDocument = serde_json::from_str(json)?;
    ingest(&doc)
}

/// Ingest an already-parsed JSON value.
pub fn ingest_value(value: Value) -> Result<IngestedWorld, IngestError> {
    let doc: WorldDocument = serde_json::from_value(value)?;
    ingest(&doc)
}

/// Ingest a typed document. The schema checks run first.
pub fn ingest(doc: &WorldDocument) -> Result<IngestedWorld, IngestError> {
    let _span = tracing::info_span!("ingest_world", width = doc.width, height = doc.height).entered();
    doc.check()?;

    let tile_size = doc.tile_size.unwrap_or(DEFAULT_TILE_SIZE);
    let mut diagnostics = Diagnostics::new();

    let grid = tiles::build_grid(
        doc.tile_source(),
        doc.width,
        doc.height,
        tile_size,
        &mut diagnostics,
    )?;

    let frame = npc::PlacementFrame {
        tile_size,
        bounds: Bounds::with_margin(grid.width(), grid.height()),
    };
    let npcs = npc::resolve_npcs(doc.npc_source(), frame, &mut diagnostics);
    let spawn_points = resolve_spawns(doc, &grid, &mut diagnostics);

    tracing::info!(
        tiles = grid.len(),
        npcs = npcs.len(),
        spawns = spawn_points.len(),
        diagnostics = diagnostics.len(),
        "world document ingested"
    );

    Ok(IngestedWorld {
        name: doc.name().map(str::to_string),
        grid,
        spawn_points,
        npcs,
        diagnostics,
    })
}

fn resolve_spawns(doc: &WorldDocument, grid: &TileGrid, diagnostics: &mut Diagnostics) -> Vec<SpawnPoint> {
    let bounds = Bounds::world(grid.width(), grid.height());
    let Some(list) = &doc.spawn_points else {
        return Vec::new();
    };
    list.spawn_points
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let name = entry.name.clone().unwrap_or_else(|| format!("spawn-{i}"));
            let (px, py) = to_pixel(entry.x, entry.y, grid.tile_size());
            let ((x, y), clamped) = bounds.clamp(px, py);
            if clamped {
                tracing::warn!(spawn = %name, from = ?(px, py), to = ?(x, y), "spawn point clamped");
                diagnostics.push(Diagnostic::OutOfBoundsClamped {
                    entity: format!("spawn {name}"),
                    from: (px, py),
                    to: (x, y),
                });
            }
            SpawnPoint {
                name,
                kind: entry.kind.clone().unwrap_or_else(|| "player".to_string()),
                x,
                y,
                clamped,
            }
        })
        .collect()
}

/// Describe a grid as a `tiles`-list document so it can be saved and later
/// loaded back through [`ingest`].
pub fn export_document(grid: &TileGrid, name: Option<&str>) -> WorldDocument {
    let ts = grid.tile_size();
    let tiles = grid
        .tiles()
        .iter()
        .map(|t| document::TileEntry {
            x: (t.x / ts) as i64,
            y: (t.y / ts) as i64,
            tile_type: Some(t.tile_type.name().to_string()),
            color: Some(t.color.to_string()),
        })
        .collect();
    WorldDocument {
        width: grid.cols(),
        height: grid.rows(),
        tile_size: Some(ts),
        tiles: Some(tiles),
        map_data: None,
        npcs: None,
        npc_instances: None,
        npc_archetypes: None,
        spawn_points: None,
        metadata: name.map(|n| document::Metadata {
            name: Some(n.to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tilescape_common::TileType;

    #[test]
    fn dimensions_use_document_tile_size() {
        let world = ingest_value(json!({"width": 20, "height": 10, "tileSize": 16})).unwrap();
        assert_eq!(world.grid.width(), 320);
        assert_eq!(world.grid.height(), 160);
        assert!(world.grid.is_empty());
    }

    #[test]
    fn dimensions_default_tile_size() {
        let world = ingest_value(json!({"width": 20, "height": 10})).unwrap();
        assert_eq!(world.grid.tile_size(), DEFAULT_TILE_SIZE);
        assert_eq!(world.grid.width(), 20 * DEFAULT_TILE_SIZE);
    }

    #[test]
    fn invalid_document_produces_no_grid() {
        let err = ingest_str(r#"{"width": 10, "height": "tall"}"#).unwrap_err();
        assert!(matches!(err, IngestError::WorldDocumentInvalid(_)));
        assert!(ingest_str("not json at all").is_err());
        assert!(ingest_str(r#"{"width": 0, "height": 4}"#).is_err());
        let mixed = r#"{"width": 2, "height": 2, "tiles": [], "mapData": [[1, 1], [1, 1]]}"#;
        assert!(matches!(
            ingest_str(mixed),
            Err(IngestError::WorldDocumentInvalid(reason)) if reason.contains("mapData")
        ));
    }

    #[test]
    fn spawn_clamped_into_world_with_diagnostic() {
        let world = ingest_value(json!({
            "width": 100, "height": 100, "tileSize": 16,
            "spawnPoints": {"spawnPoints": [{"x": -5, "y": 9999, "type": "player", "name": "start"}]},
        }))
        .unwrap();
        let spawn = &world.spawn_points[0];
        assert!(spawn.clamped);
        assert_eq!(spawn.tile(16), (0, 99));
        assert!(world.diagnostics.iter().any(|d| matches!(
            d,
            Diagnostic::OutOfBoundsClamped { entity, .. } if entity == "spawn start"
        )));
    }

    #[test]
    fn spawn_in_tile_space_is_scaled() {
        let world = ingest_value(json!({
            "width": 100, "height": 100, "tileSize": 16,
            "spawnPoints": {"spawnPoints": [{"x": 5, "y": 5}]},
        }))
        .unwrap();
        let spawn = &world.spawn_points[0];
        assert_eq!((spawn.x, spawn.y), (80.0, 80.0));
        assert_eq!(spawn.kind, "player");
        assert_eq!(spawn.name, "spawn-0");
        assert!(!spawn.clamped);
        assert!(world.diagnostics.is_empty());
    }

    #[test]
    fn map_document_end_to_end() {
        let world = ingest_value(json!({
            "width": 3, "height": 2, "tileSize": 16,
            "mapData": [[1, 2, 0], [4, 5, 3]],
            "npcInstances": [{"id": "n1", "archetypeId": "missing", "position": {"x": 1, "y": 1}}],
            "metadata": {"name": "Tiny"},
        }))
        .unwrap();
        assert_eq!(world.name.as_deref(), Some("Tiny"));
        assert_eq!(world.grid.len(), 5);
        assert_eq!(world.npcs[0].display_name, "Unknown NPC");
        // 48x32 world is narrower than two margins: NPC collapses to the centre.
        assert_eq!((world.npcs[0].x, world.npcs[0].y), (24.0, 16.0));
    }

    #[test]
    fn export_then_ingest_keeps_types() {
        let tiles = vec![
            tilescape_kernel::TileRecord::new(0, 0, TileType::Wall),
            tilescape_kernel::TileRecord::new(32, 0, TileType::Cave),
        ];
        let grid = TileGrid::new(64, 32, 32, tiles).unwrap();
        let doc = export_document(&grid, Some("Exported"));
        let json = serde_json::to_string(&doc).unwrap();
        assert!(!json.contains("mapData"));

        let world = ingest_str(&json).unwrap();
        assert_eq!(world.name.as_deref(), Some("Exported"));
        assert_eq!(world.grid.tile_at(0, 0), Some(TileType::Wall));
        assert_eq!(world.grid.tile_at(1, 0), Some(TileType::Cave));
        assert!(world.diagnostics.is_empty());
    }
}
