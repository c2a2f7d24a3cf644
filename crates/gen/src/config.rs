use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tilescape_common::TileType;

/// Seed used by the built-in default config and when a config omits one.
pub const DEFAULT_SEED: &str = "DEFAULT";

const MAX_SEED_LEN: usize = 50;
const SUM_TOLERANCE: f64 = 0.01;

/// Errors from validating a generation config. Every variant means the
/// config is unusable and the built-in default should be used instead.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("world size is missing")]
    MissingWorldSize,
    #[error("unknown world size {0:?}; expected small, medium, or large")]
    UnknownWorldSize(String),
    #[error("seed {0:?} must be 1-50 characters of A-Z, a-z, 0-9, '_' or '-'")]
    InvalidSeed(String),
    #[error("tile percentages are missing")]
    MissingPercentages,
    #[error("no percentage given for {0}")]
    MissingPercentage(TileType),
    #[error("unexpected tile percentage key {0:?}")]
    UnexpectedPercentage(String),
    #[error("percentage for {key} is not a finite number: {value}")]
    NonNumericPercentage { key: String, value: Value },
    #[error("percentage for {key} is {value}, outside [0, 100]")]
    PercentageOutOfRange { key: String, value: f64 },
    #[error("tile percentages sum to {0}, expected 100")]
    PercentageSum(f64),
}

/// World size class. Each class maps to a fixed tile count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorldSize {
    Small,
    Medium,
    Large,
}

impl WorldSize {
    /// Exact lowercase name match.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "small" => Some(Self::Small),
            "medium" => Some(Self::Medium),
            "large" => Some(Self::Large),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Grid size in tiles (columns, rows).
    pub fn tile_dimensions(self) -> (u32, u32) {
        match self {
            Self::Small => (50, 50),
            Self::Medium => (100, 100),
            Self::Large => (200, 200),
        }
    }
}

/// Share of the map, in percent, assigned to each canonical tile type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TilePercentages {
    pub grass: f64,
    pub water: f64,
    pub wall: f64,
    pub cave: f64,
}

impl Default for TilePercentages {
    fn default() -> Self {
        Self {
            grass: 85.0,
            water: 10.0,
            wall: 3.0,
            cave: 2.0,
        }
    }
}

impl TilePercentages {
    pub fn get(&self, tile: TileType) -> f64 {
        match tile {
            TileType::Grass => self.grass,
            TileType::Water => self.water,
            TileType::Wall => self.wall,
            TileType::Cave => self.cave,
            TileType::Trail | TileType::Mana => 0.0,
        }
    }

    pub fn sum(&self) -> f64 {
        self.grass + self.water + self.wall + self.cave
    }
}

/// Generation config as supplied by a caller, before any checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWorldConfig {
    #[serde(default)]
    pub world_size: Option<String>,
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default)]
    pub tile_percentages: Option<BTreeMap<String, Value>>,
}

impl RawWorldConfig {
    /// Parse a config from JSON. Only syntax and field types are checked here.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A validated, immutable generation config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldConfig {
    pub world_size: WorldSize,
    pub seed: String,
    pub tile_percentages: TilePercentages,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_size: WorldSize::Medium,
            seed: DEFAULT_SEED.to_string(),
            tile_percentages: TilePercentages::default(),
        }
    }
}

impl WorldConfig {
    /// Validate `raw`, substituting the built-in default when it fails.
    pub fn from_raw_or_default(raw: &RawWorldConfig) -> Self {
        match validate(raw) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "world config rejected, using default config");
                Self::default()
            }
        }
    }

    /// Same config with a different seed. The new seed is validated.
    pub fn reseeded(&self, seed: &str) -> Result<Self, ConfigError> {
        check_seed(seed)?;
        Ok(Self {
            seed: seed.to_string(),
            ..self.clone()
        })
    }

    /// Convert back into the untrusted form, e.g. for writing to disk.
    pub fn to_raw(&self) -> RawWorldConfig {
        let percentages = TileType::CANONICAL
            .into_iter()
            .map(|t| (t.name().to_string(), Value::from(self.tile_percentages.get(t))))
            .collect();
        RawWorldConfig {
            world_size: Some(self.world_size.name().to_string()),
            seed: Some(self.seed.clone()),
            tile_percentages: Some(percentages),
        }
    }
}

/// Check a raw config and produce a [`WorldConfig`]. `raw` is not modified.
pub fn validate(raw: &RawWorldConfig) -> Result<WorldConfig, ConfigError> {
    let size_name = raw
        .world_size
        .as_deref()
        .ok_or(ConfigError::MissingWorldSize)?;
    let world_size = WorldSize::parse(size_name)
        .ok_or_else(|| ConfigError::UnknownWorldSize(size_name.to_string()))?;

    let seed = match raw.seed.as_deref() {
        Some(seed) => {
            check_seed(seed)?;
            seed.to_string()
        }
        None => DEFAULT_SEED.to_string(),
    };

    let map = raw
        .tile_percentages
        .as_ref()
        .ok_or(ConfigError::MissingPercentages)?;
    if let Some(extra) = map.keys().find(|k| {
        !TileType::CANONICAL
            .iter()
            .any(|t| t.name() == k.as_str())
    }) {
        return Err(ConfigError::UnexpectedPercentage(extra.clone()));
    }

    let mut values = [0.0; 4];
    for (slot, tile) in values.iter_mut().zip(TileType::CANONICAL) {
        let value = map
            .get(tile.name())
            .ok_or(ConfigError::MissingPercentage(tile))?;
        let number = value
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ConfigError::NonNumericPercentage {
                key: tile.name().to_string(),
                value: value.clone(),
            })?;
        if !(0.0..=100.0).contains(&number) {
            return Err(ConfigError::PercentageOutOfRange {
                key: tile.name().to_string(),
                value: number,
            });
        }
        *slot = number;
    }

    let [grass, water, wall, cave] = values;
    let tile_percentages = TilePercentages {
        grass,
        water,
        wall,
        cave,
    };
    let sum = tile_percentages.sum();
    if (sum - 100.0).abs() > SUM_TOLERANCE {
        return Err(ConfigError::PercentageSum(sum));
    }

    Ok(WorldConfig {
        world_size,
        seed,
        tile_percentages,
    })
}

fn check_seed(seed: &str) -> Result<(), ConfigError> {
    let valid_len = (1..=MAX_SEED_LEN).contains(&seed.len());
    let valid_chars = seed
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid_len && valid_chars {
        Ok(())
    } else {
        Err(ConfigError::InvalidSeed(seed.to_string()))
    }
}
