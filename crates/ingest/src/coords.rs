//! Coordinate-space normalization and bounds clamping for placed entities.
//!
//! Legacy documents mix tile and pixel coordinates without saying which is
//! which. [`classify_coords`] is a best-effort guess, not a guaranteed-correct
//! classifier: small pixel coordinates that are not tile multiples are read
//! as tile coordinates.

use tilescape_common::NPC_MARGIN;

/// Which space a supplied coordinate pair is believed to be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordSpace {
    Tile,
    Pixel,
}

/// Guess whether `(x, y)` are tile or pixel coordinates.
///
/// Tile space when both components are below 100 and they are not both
/// exact multiples of `tile_size` with `x >= tile_size`. Everything else is
/// taken as pixels.
pub fn classify_coords(x: f64, y: f64, tile_size: u32) -> CoordSpace {
    let ts = tile_size as f64;
    let both_small = x < 100.0 && y < 100.0;
    let pixel_aligned = x % ts == 0.0 && y % ts == 0.0 && x >= ts;
    if both_small && !pixel_aligned {
        CoordSpace::Tile
    } else {
        CoordSpace::Pixel
    }
}

/// Normalize a coordinate pair to pixel space.
pub fn to_pixel(x: f64, y: f64, tile_size: u32) -> (f64, f64) {
    match classify_coords(x, y, tile_size) {
        CoordSpace::Tile => (x * tile_size as f64, y * tile_size as f64),
        CoordSpace::Pixel => (x, y),
    }
}

/// Inclusive pixel-space rectangle positions are clamped into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// `[0, width-1] x [0, height-1]`, used for spawn points.
    pub fn world(width: u32, height: u32) -> Self {
        Self {
            min_x: 0.0,
            max_x: width.saturating_sub(1) as f64,
            min_y: 0.0,
            max_y: height.saturating_sub(1) as f64,
        }
    }

    /// The world inset by [`NPC_MARGIN`] on every side. An axis narrower than
    /// two margins collapses to its centre line.
    pub fn with_margin(width: u32, height: u32) -> Self {
        let axis = |len: u32| {
            let len = len as f64;
            if len < 2.0 * NPC_MARGIN {
                (len / 2.0, len / 2.0)
            } else {
                (NPC_MARGIN, len - NPC_MARGIN)
            }
        };
        let (min_x, max_x) = axis(width);
        let (min_y, max_y) = axis(height);
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Clamp a point, reporting whether it moved.
    pub fn clamp(&self, x: f64, y: f64) -> ((f64, f64), bool) {
        let cx = x.clamp(self.min_x, self.max_x);
        let cy = y.clamp(self.min_y, self.max_y);
        ((cx, cy), cx != x || cy != y)
    }
}
