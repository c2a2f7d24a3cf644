use tilescape_gen::{ConfigError, ProceduralGenerator, RawWorldConfig, WorldConfig, generate_or_default};
use tilescape_ingest::{Diagnostics, IngestError, IngestedWorld, WorldDocument};
use tilescape_kernel::{NpcPlacement, SpawnPoint, TileGrid, TileGridError};
use tilescape_persist::{PersistError, WorldStore};

/// Errors from creating or replacing a world.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Grid(#[from] TileGridError),
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error("world failed to load: {0}")]
    Load(#[from] PersistError),
    #[error("world was not procedurally generated and cannot be regenerated")]
    NotGenerated,
}

/// Where the current world came from.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldSource {
    Generated(WorldConfig),
    Ingested {
        name: Option<String>,
        /// Store identifier, when loaded from disk.
        path: Option<String>,
    },
}

/// The running world: a grid and the placements that go with it.
#[derive(Debug, Clone)]
pub struct WorldSession {
    grid: TileGrid,
    spawn_points: Vec<SpawnPoint>,
    npcs: Vec<NpcPlacement>,
    diagnostics: Diagnostics,
    source: WorldSource,
}

impl WorldSession {
    /// Generate a world. An invalid config falls back to the default one.
    pub fn generate(raw: &RawWorldConfig) -> Result<Self, WorldError> {
        let (config, grid) = generate_or_default(raw)?;
        Ok(Self::from_generated(config, grid))
    }

    /// Generate from an already validated config.
    pub fn generate_with(config: WorldConfig) -> Result<Self, WorldError> {
        let grid = ProceduralGenerator::new(config.clone()).generate()?;
        Ok(Self::from_generated(config, grid))
    }

    /// Build a world from a custom document.
    pub fn ingest(doc: &WorldDocument) -> Result<Self, WorldError> {
        let world = tilescape_ingest::ingest(doc)?;
        Ok(Self::from_ingested(world, None))
    }

    /// Load and ingest `worlds/<name>/world.json` from a store.
    pub fn load_from_path(store: &WorldStore, id: &str) -> Result<Self, WorldError> {
        let world = store.load_world(id)?;
        Ok(Self::from_ingested(world, Some(id.to_string())))
    }

    fn from_generated(config: WorldConfig, grid: TileGrid) -> Self {
        tracing::info!(
            seed = %config.seed,
            size = config.world_size.name(),
            "world session created from generator"
        );
        Self {
            grid,
            spawn_points: Vec::new(),
            npcs: Vec::new(),
            diagnostics: Diagnostics::new(),
            source: WorldSource::Generated(config),
        }
    }

    fn from_ingested(world: IngestedWorld, path: Option<String>) -> Self {
        tracing::info!(name = ?world.name, path = ?path, "world session created from document");
        Self {
            grid: world.grid,
            spawn_points: world.spawn_points,
            npcs: world.npcs,
            diagnostics: world.diagnostics,
            source: WorldSource::Ingested {
                name: world.name,
                path,
            },
        }
    }

    /// Replace this world with another. The old grid is dropped here.
    pub fn replace(&mut self, next: WorldSession) {
        tracing::debug!(old_tiles = self.grid.len(), new_tiles = next.grid.len(), "replacing world");
        *self = next;
    }

    /// Rebuild a generated world from its config. Same seed, same grid.
    pub fn regenerate(&mut self) -> Result<(), WorldError> {
        let config = self.generated_config()?.clone();
        self.replace(Self::generate_with(config)?);
        Ok(())
    }

    /// Rebuild a generated world with a new seed.
    pub fn regenerate_with_seed(&mut self, seed: &str) -> Result<(), WorldError> {
        let config = self.generated_config()?.reseeded(seed)?;
        self.replace(Self::generate_with(config)?);
        Ok(())
    }

    fn generated_config(&self) -> Result<&WorldConfig, WorldError> {
        match &self.source {
            WorldSource::Generated(config) => Ok(config),
            WorldSource::Ingested { .. } => Err(WorldError::NotGenerated),
        }
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn spawn_points(&self) -> &[SpawnPoint] {
        &self.spawn_points
    }

    pub fn npcs(&self) -> &[NpcPlacement] {
        &self.npcs
    }

    /// Corrections made while ingesting. Always empty for generated worlds.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn source(&self) -> &WorldSource {
        &self.source
    }

    /// Display name: the document name, or the seed for generated worlds.
    pub fn name(&self) -> Option<&str> {
        match &self.source {
            WorldSource::Generated(config) => Some(&config.seed),
            WorldSource::Ingested { name, .. } => name.as_deref(),
        }
    }

    /// First spawn point of a kind (case-insensitive). Without one, the
    /// centre of the world.
    pub fn spawn_for(&self, kind: &str) -> SpawnPoint {
        self.spawn_points
            .iter()
            .find(|s| s.kind.eq_ignore_ascii_case(kind))
            .cloned()
            .unwrap_or_else(|| SpawnPoint {
                name: "centre".to_string(),
                kind: kind.to_string(),
                x: self.grid.width() as f64 / 2.0,
                y: self.grid.height() as f64 / 2.0,
                clamped: false,
            })
    }
}
