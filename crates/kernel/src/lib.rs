//! World Kernel: the authoritative tile grid and the placement records that
//! accompany it.
//!
//! # Invariants
//! - Every tile record sits on a tile boundary inside the grid bounds.
//! - No two records share a cell.
//! - A grid is never mutated tile-by-tile; it is replaced wholesale.

pub mod grid;
pub mod placement;

pub use grid::{TileGrid, TileGridError, TileRecord};
pub use placement::{NpcPlacement, SpawnPoint};
