//! Viewport culling: which cells a frame has to look at.

use glam::{UVec2, Vec2};

use crate::camera::Camera2D;
use crate::settings::{RenderMode, RenderSettings};

/// Tiles of padding around the camera viewport in dynamic mode.
pub const DYNAMIC_PADDING_TILES: i64 = 2;

/// Extra fraction of the half-extent kept for the fog transition band.
pub const FOG_BAND_FACTOR: f64 = 1.2;

/// A cell coordinate that may lie outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub col: i64,
    pub row: i64,
}

impl CellCoord {
    pub fn new(col: i64, row: i64) -> Self {
        Self { col, row }
    }

    /// Cell containing a world-pixel point.
    pub fn from_world(pos: Vec2, tile_size: u32) -> Self {
        let ts = tile_size as f32;
        Self {
            col: (pos.x / ts).floor() as i64,
            row: (pos.y / ts).floor() as i64,
        }
    }

    /// Euclidean distance in tiles.
    pub fn distance(self, other: CellCoord) -> f64 {
        let dc = self.col as f64 - other.col as f64;
        let dr = self.row as f64 - other.row as f64;
        (dc * dc + dr * dr).sqrt()
    }
}

/// Inclusive cell rectangle to consider for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRegion {
    pub mode: RenderMode,
    pub min: CellCoord,
    pub max: CellCoord,
    /// The player's tile; fog distances are measured from here.
    pub centre: CellCoord,
}

impl VisibleRegion {
    /// Pick the region for a frame.
    pub fn compute(
        settings: &RenderSettings,
        camera: &Camera2D,
        canvas: UVec2,
        player: Vec2,
        tile_size: u32,
    ) -> Self {
        let centre = CellCoord::from_world(player, tile_size);
        match settings.mode() {
            RenderMode::Fixed => {
                let reach = (settings.half_extent() * FOG_BAND_FACTOR).ceil() as i64;
                Self {
                    mode: RenderMode::Fixed,
                    min: CellCoord::new(
                        centre.col.saturating_sub(reach),
                        centre.row.saturating_sub(reach),
                    ),
                    max: CellCoord::new(
                        centre.col.saturating_add(reach),
                        centre.row.saturating_add(reach),
                    ),
                    centre,
                }
            }
            RenderMode::Dynamic => {
                let top_left = CellCoord::from_world(camera.position, tile_size);
                let bottom_right = CellCoord::from_world(
                    camera.position + camera.viewport_size(canvas),
                    tile_size,
                );
                Self {
                    mode: RenderMode::Dynamic,
                    min: CellCoord::new(
                        top_left.col.saturating_sub(DYNAMIC_PADDING_TILES),
                        top_left.row.saturating_sub(DYNAMIC_PADDING_TILES),
                    ),
                    max: CellCoord::new(
                        bottom_right.col.saturating_add(DYNAMIC_PADDING_TILES),
                        bottom_right.row.saturating_add(DYNAMIC_PADDING_TILES),
                    ),
                    centre,
                }
            }
        }
    }

    pub fn cell_count(&self) -> usize {
        let span = |lo: i64, hi: i64| (hi as i128 - lo as i128 + 1).max(0) as u128;
        let cells = span(self.min.col, self.max.col) * span(self.min.row, self.max.row);
        usize::try_from(cells).unwrap_or(usize::MAX)
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (self.min.row..=self.max.row)
            .flat_map(move |row| (self.min.col..=self.max.col).map(move |col| CellCoord::new(col, row)))
    }
}
