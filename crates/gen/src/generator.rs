use tilescape_common::{DEFAULT_TILE_SIZE, TileType};
use tilescape_kernel::{TileGrid, TileGridError, TileRecord};

use crate::config::{RawWorldConfig, TilePercentages, WorldConfig};
use crate::rng::SeededRandom;

/// Cumulative draw thresholds in priority order: cave, then wall, then
/// water. Grass absorbs whatever probability mass remains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub cave: f64,
    pub wall: f64,
    pub water: f64,
}

impl Thresholds {
    pub fn from_percentages(p: &TilePercentages) -> Self {
        let cave = p.cave / 100.0;
        let wall = cave + p.wall / 100.0;
        let water = wall + p.water / 100.0;
        Self { cave, wall, water }
    }

    /// Map one draw in `[0, 1)` to a tile type.
    pub fn classify(&self, r: f64) -> TileType {
        if r < self.cave {
            TileType::Cave
        } else if r < self.wall {
            TileType::Wall
        } else if r < self.water {
            TileType::Water
        } else {
            TileType::Grass
        }
    }
}

/// Fills a dense [`TileGrid`] from a validated config.
///
/// Cells are visited row-major. Each cell consumes exactly two draws: the
/// first picks the tile type, the second becomes the texture variant.
#[derive(Debug, Clone)]
pub struct ProceduralGenerator {
    config: WorldConfig,
    tile_size: u32,
}

impl ProceduralGenerator {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            tile_size: DEFAULT_TILE_SIZE,
        }
    }

    /// Override the tile edge length in pixels.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Pixel dimensions (width, height) of the generated world.
    pub fn pixel_dimensions(&self) -> (u32, u32) {
        let (cols, rows) = self.config.world_size.tile_dimensions();
        (cols * self.tile_size, rows * self.tile_size)
    }

    pub fn generate(&self) -> Result<TileGrid, TileGridError> {
        let _span = tracing::info_span!(
            "generate_world",
            seed = %self.config.seed,
            size = self.config.world_size.name()
        )
        .entered();

        let (cols, rows) = self.config.world_size.tile_dimensions();
        let thresholds = Thresholds::from_percentages(&self.config.tile_percentages);
        let mut rng = SeededRandom::from_seed(&self.config.seed);
        tracing::debug!(?thresholds, initial_state = rng.state(), "thresholds computed");

        let mut tiles = Vec::with_capacity(cols as usize * rows as usize);
        for row in 0..rows {
            for col in 0..cols {
                let tile_type = thresholds.classify(rng.next_f64());
                let texture_variant = rng.next_f64();
                tiles.push(TileRecord {
                    x: col * self.tile_size,
                    y: row * self.tile_size,
                    tile_type,
                    color: tile_type.fallback_color(),
                    texture_variant,
                });
            }
        }

        let grid = TileGrid::new(cols * self.tile_size, rows * self.tile_size, self.tile_size, tiles)?;
        tracing::info!(
            tiles = grid.len(),
            width = grid.width(),
            height = grid.height(),
            "world generated"
        );
        Ok(grid)
    }
}

/// Validate `raw` and generate from it, or from the built-in default config
/// when validation fails. Returns the config that was actually used.
pub fn generate_or_default(raw: &RawWorldConfig) -> Result<(WorldConfig, TileGrid), TileGridError> {
    let config = WorldConfig::from_raw_or_default(raw);
    let grid = ProceduralGenerator::new(config.clone()).generate()?;
    Ok((config, grid))
}
