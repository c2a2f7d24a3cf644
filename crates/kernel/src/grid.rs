use serde::{Deserialize, Serialize};
use tilescape_common::{Rgb, TileType};

/// One materialized tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    /// Pixel-space x of the tile's top-left corner.
    pub x: u32,
    /// Pixel-space y of the tile's top-left corner.
    pub y: u32,
    pub tile_type: TileType,
    /// Color drawn when the tile's texture is unavailable.
    pub color: Rgb,
    /// Rendering variety in `[0, 1)`. Never used for type selection.
    pub texture_variant: f64,
}

impl TileRecord {
    /// A record using the type's table color and no texture variety.
    pub fn new(x: u32, y: u32, tile_type: TileType) -> Self {
        Self {
            x,
            y,
            tile_type,
            color: tile_type.fallback_color(),
            texture_variant: 0.0,
        }
    }
}

/// Errors from building a tile grid out of records.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TileGridError {
    #[error("tile size must be positive")]
    ZeroTileSize,
    #[error("grid {width}x{height} is not a whole number of {tile_size}px tiles")]
    Dimensions {
        width: u32,
        height: u32,
        tile_size: u32,
    },
    #[error("tile at ({x}, {y}) is not aligned to the {tile_size}px grid")]
    Misaligned { x: u32, y: u32, tile_size: u32 },
    #[error("tile at ({x}, {y}) lies outside the {width}x{height} grid")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("more than one tile at ({x}, {y})")]
    Duplicate { x: u32, y: u32 },
}

/// The authoritative collection of tiles for one world.
///
/// Generated grids are dense (one record per cell). Ingested grids may be
/// sparse; cells without a record read as grass. Records are kept in the
/// order they were supplied, with a cell index on the side for O(1) lookups.
#[derive(Debug, Clone)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tile_size: u32,
    tiles: Vec<TileRecord>,
    grid_lines_visible: bool,
    /// Row-major cell -> position in `tiles`.
    cell_index: Vec<Option<u32>>,
}

impl TileGrid {
    /// Type reported for in-bounds cells that have no record.
    pub const DEFAULT_TYPE: TileType = TileType::Grass;

    /// Build a grid, checking every record against the grid geometry.
    pub fn new(
        width: u32,
        height: u32,
        tile_size: u32,
        tiles: Vec<TileRecord>,
    ) -> Result<Self, TileGridError> {
        if tile_size == 0 {
            return Err(TileGridError::ZeroTileSize);
        }
        if width % tile_size != 0 || height % tile_size != 0 {
            return Err(TileGridError::Dimensions {
                width,
                height,
                tile_size,
            });
        }
        let cols = width / tile_size;
        let rows = height / tile_size;
        let mut cell_index = vec![None; cols as usize * rows as usize];

        for (i, tile) in tiles.iter().enumerate() {
            if tile.x % tile_size != 0 || tile.y % tile_size != 0 {
                return Err(TileGridError::Misaligned {
                    x: tile.x,
                    y: tile.y,
                    tile_size,
                });
            }
            if tile.x >= width || tile.y >= height {
                return Err(TileGridError::OutOfBounds {
                    x: tile.x,
                    y: tile.y,
                    width,
                    height,
                });
            }
            let cell = (tile.y / tile_size) as usize * cols as usize + (tile.x / tile_size) as usize;
            if cell_index[cell].is_some() {
                return Err(TileGridError::Duplicate {
                    x: tile.x,
                    y: tile.y,
                });
            }
            cell_index[cell] = Some(i as u32);
        }

        tracing::trace!(cols, rows, records = tiles.len(), "tile grid built");
        Ok(Self {
            width,
            height,
            tile_size,
            tiles,
            grid_lines_visible: false,
            cell_index,
        })
    }

    /// An empty (fully sparse) grid of the given size in tiles.
    pub fn empty(cols: u32, rows: u32, tile_size: u32) -> Result<Self, TileGridError> {
        Self::new(cols * tile_size, rows * tile_size, tile_size, Vec::new())
    }

    /// Toggle grid-line rendering.
    pub fn with_grid_lines(mut self, visible: bool) -> Self {
        self.grid_lines_visible = visible;
        self
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Number of tile columns.
    pub fn cols(&self) -> u32 {
        self.width / self.tile_size
    }

    /// Number of tile rows.
    pub fn rows(&self) -> u32 {
        self.height / self.tile_size
    }

    pub fn grid_lines_visible(&self) -> bool {
        self.grid_lines_visible
    }

    /// Read-only access to the materialized records.
    pub fn tiles(&self) -> &[TileRecord] {
        &self.tiles
    }

    /// Number of materialized records.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether every cell has a record.
    pub fn is_dense(&self) -> bool {
        self.tiles.len() == self.cell_index.len()
    }

    /// Whether a (possibly negative) cell coordinate lies inside the grid.
    pub fn contains_cell(&self, col: i64, row: i64) -> bool {
        col >= 0 && row >= 0 && col < self.cols() as i64 && row < self.rows() as i64
    }

    /// The record at a cell, if one was materialized.
    pub fn record_at(&self, col: u32, row: u32) -> Option<&TileRecord> {
        if col >= self.cols() || row >= self.rows() {
            return None;
        }
        let cell = row as usize * self.cols() as usize + col as usize;
        self.cell_index[cell].map(|i| &self.tiles[i as usize])
    }

    /// Tile type at a cell. Absent cells read as [`Self::DEFAULT_TYPE`];
    /// `None` only when the cell is outside the grid.
    pub fn tile_at(&self, col: u32, row: u32) -> Option<TileType> {
        if col >= self.cols() || row >= self.rows() {
            return None;
        }
        Some(
            self.record_at(col, row)
                .map_or(Self::DEFAULT_TYPE, |r| r.tile_type),
        )
    }

    /// Tile type under a pixel-space point.
    pub fn tile_at_pixel(&self, x: f64, y: f64) -> Option<TileType> {
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
            return None;
        }
        let ts = self.tile_size as f64;
        self.tile_at((x / ts) as u32, (y / ts) as u32)
    }

    /// Tile occupancy query: whether an actor may stand at a pixel-space point.
    /// Points outside the world are never walkable.
    pub fn is_walkable(&self, x: f64, y: f64) -> bool {
        self.tile_at_pixel(x, y).is_some_and(TileType::is_walkable)
    }

    /// Deterministic FNV-1a hash of the grid, in record order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.width.to_le_bytes());
        mix(&mut h, &self.height.to_le_bytes());
        mix(&mut h, &self.tile_size.to_le_bytes());
        for tile in &self.tiles {
            mix(&mut h, &tile.x.to_le_bytes());
            mix(&mut h, &tile.y.to_le_bytes());
            mix(&mut h, tile.tile_type.name().as_bytes());
            mix(&mut h, &[tile.color.r, tile.color.g, tile.color.b]);
            mix(&mut h, &tile.texture_variant.to_bits().to_le_bytes());
        }
        h
    }
}
