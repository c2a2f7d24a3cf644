use std::collections::BTreeMap;
use tilescape_common::{Rgb, TileType};
use tilescape_kernel::{TileGrid, TileRecord};

use crate::document::{TileEntry, TileSource};
use crate::{Diagnostic, Diagnostics, IngestError};

/// Materialize a document's tiles into a (possibly sparse) grid.
///
/// Entries outside `cols x rows` are dropped and counted in a single
/// diagnostic. When the tile list names a cell twice, the later entry wins.
pub fn build_grid(
    source: TileSource<'_>,
    cols: u32,
    rows: u32,
    tile_size: u32,
    diagnostics: &mut Diagnostics,
) -> Result<TileGrid, IngestError> {
    // Keyed (row, col) so iteration comes out row-major.
    let mut cells: BTreeMap<(u32, u32), TileRecord> = BTreeMap::new();
    let mut dropped = 0usize;
    let in_bounds = |col: i64, row: i64| {
        (col >= 0 && row >= 0 && col < cols as i64 && row < rows as i64)
            .then_some((col as u32, row as u32))
    };

    match source {
        TileSource::List(entries) => {
            for entry in entries {
                let Some((col, row)) = in_bounds(entry.x, entry.y) else {
                    dropped += 1;
                    continue;
                };
                let record = list_record(entry, col * tile_size, row * tile_size, diagnostics);
                cells.insert((row, col), record);
            }
        }
        TileSource::Map(map) => {
            for (row, codes) in map.iter().enumerate() {
                for (col, &code) in codes.iter().enumerate() {
                    let Some(tile_type) = TileType::from_map_code(code) else {
                        continue;
                    };
                    let Some((col, row)) = in_bounds(col as i64, row as i64) else {
                        dropped += 1;
                        continue;
                    };
                    cells.insert(
                        (row, col),
                        TileRecord::new(col * tile_size, row * tile_size, tile_type),
                    );
                }
            }
        }
        TileSource::Empty => {}
    }

    if dropped > 0 {
        tracing::warn!(dropped, cols, rows, "tiles outside the declared world were dropped");
        diagnostics.push(Diagnostic::CellsOutOfBounds { count: dropped });
    }

    let grid = TileGrid::new(
        cols * tile_size,
        rows * tile_size,
        tile_size,
        cells.into_values().collect(),
    )?;
    Ok(grid)
}

fn list_record(entry: &TileEntry, x: u32, y: u32, diagnostics: &mut Diagnostics) -> TileRecord {
    let tile_type = match entry.tile_type.as_deref() {
        None => TileType::Grass,
        Some(name) => TileType::from_name(name).unwrap_or_else(|| {
            diagnostics.push(Diagnostic::UnknownTileType {
                name: name.to_string(),
            });
            TileType::Grass
        }),
    };
    let mut record = TileRecord::new(x, y, tile_type);
    if let Some(color) = entry.color.as_deref() {
        match Rgb::parse_hex(color) {
            Ok(rgb) => record.color = rgb,
            Err(_) => diagnostics.push(Diagnostic::InvalidColor {
                value: color.to_string(),
            }),
        }
    }
    record
}
