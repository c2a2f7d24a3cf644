use std::collections::BTreeMap;
use tilescape_common::{Rgb, TileType};
use tilescape_kernel::{NpcPlacement, SpawnPoint, TileGrid};

/// World inspector for developer tooling.
///
/// Read-only queries against a tile grid and its placements for debugging
/// and CLI output.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the grid.
    pub fn summary(grid: &TileGrid) -> WorldSummary {
        WorldSummary {
            cols: grid.cols(),
            rows: grid.rows(),
            tile_size: grid.tile_size(),
            records: grid.len(),
            dense: grid.is_dense(),
            state_hash: grid.state_hash(),
        }
    }

    /// Count cells per tile type. Absent cells count as the default type.
    pub fn histogram(grid: &TileGrid) -> TileHistogram {
        let mut counts: BTreeMap<TileType, usize> = BTreeMap::new();
        for record in grid.tiles() {
            *counts.entry(record.tile_type).or_default() += 1;
        }
        let total = grid.cols() as usize * grid.rows() as usize;
        let absent = total - grid.len();
        if absent > 0 {
            *counts.entry(TileGrid::DEFAULT_TYPE).or_default() += absent;
        }
        TileHistogram {
            counts,
            total,
            absent,
        }
    }

    /// Details of one cell, or `None` outside the grid.
    pub fn inspect_tile(grid: &TileGrid, col: u32, row: u32) -> Option<TileInfo> {
        let tile_type = grid.tile_at(col, row)?;
        let record = grid.record_at(col, row);
        Some(TileInfo {
            col,
            row,
            tile_type,
            color: record.map_or(tile_type.fallback_color(), |r| r.color),
            texture_variant: record.map_or(0.0, |r| r.texture_variant),
            materialized: record.is_some(),
            walkable: tile_type.is_walkable(),
        })
    }

    /// One line per spawn point and NPC.
    pub fn placements(spawns: &[SpawnPoint], npcs: &[NpcPlacement], tile_size: u32) -> Vec<String> {
        let spawn_lines = spawns.iter().map(|s| {
            let (col, row) = s.tile(tile_size);
            format!(
                "spawn {} [{}] at ({:.0}, {:.0}) tile ({col}, {row}){}",
                s.name,
                s.kind,
                s.x,
                s.y,
                if s.clamped { " clamped" } else { "" }
            )
        });
        let npc_lines = npcs.iter().map(|n| {
            format!(
                "npc {} \"{}\" {} at ({:.0}, {:.0}){}",
                n.id,
                n.display_name,
                n.behavior_tag,
                n.x,
                n.y,
                if n.clamped { " clamped" } else { "" }
            )
        });
        spawn_lines.chain(npc_lines).collect()
    }
}

/// Summary of a grid for the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSummary {
    pub cols: u32,
    pub rows: u32,
    pub tile_size: u32,
    pub records: usize,
    pub dense: bool,
    pub state_hash: u64,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: {}x{} tiles @ {}px records={}{} hash={:016x}",
            self.cols,
            self.rows,
            self.tile_size,
            self.records,
            if self.dense { " (dense)" } else { "" },
            self.state_hash
        )
    }
}

/// Cell counts per tile type.
#[derive(Debug, Clone, PartialEq)]
pub struct TileHistogram {
    pub counts: BTreeMap<TileType, usize>,
    /// Cells in the grid, materialized or not.
    pub total: usize,
    /// Cells with no record, counted under the default type.
    pub absent: usize,
}

impl TileHistogram {
    pub fn count(&self, tile: TileType) -> usize {
        self.counts.get(&tile).copied().unwrap_or(0)
    }

    /// Share of cells of a type, in percent.
    pub fn percent(&self, tile: TileType) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(tile) as f64 * 100.0 / self.total as f64
    }
}

impl std::fmt::Display for TileHistogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (tile, count) in &self.counts {
            writeln!(f, "{:>6} {:>8} {:>6.2}%", tile.name(), count, self.percent(*tile))?;
        }
        if self.absent > 0 {
            writeln!(f, "({} absent cells counted as {})", self.absent, TileGrid::DEFAULT_TYPE)?;
        }
        Ok(())
    }
}

/// Detailed info about a single cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TileInfo {
    pub col: u32,
    pub row: u32,
    pub tile_type: TileType,
    pub color: Rgb,
    pub texture_variant: f64,
    /// Whether the grid holds a record for this cell.
    pub materialized: bool,
    pub walkable: bool,
}

impl std::fmt::Display for TileInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Tile ({}, {}) {} color={} variant={:.3}{}",
            self.col,
            self.row,
            self.tile_type,
            self.color,
            self.texture_variant,
            if self.walkable { "" } else { " blocked" }
        )
    }
}
