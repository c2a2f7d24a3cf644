use tilescape_common::SettingsSource;

pub const RENDER_DISTANCE_KEY: &str = "renderDistance";
pub const FOG_INTENSITY_KEY: &str = "fogIntensity";

pub const DEFAULT_RENDER_DISTANCE: u32 = 32;
pub const DEFAULT_FOG_INTENSITY: u32 = 75;

/// Render distances at or above this switch to the camera-driven region.
pub const DYNAMIC_RENDER_DISTANCE: u32 = 128;

/// How the visible region is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Square around the player, sized by the render distance.
    #[default]
    Fixed,
    /// Whatever the camera viewport covers.
    Dynamic,
}

/// Per-frame render settings, parsed from a [`SettingsSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Render distance in tiles. Never zero.
    pub render_distance: u32,
    /// Fog intensity in percent, `0..=100`.
    pub fog_intensity: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            render_distance: DEFAULT_RENDER_DISTANCE,
            fog_intensity: DEFAULT_FOG_INTENSITY,
        }
    }
}

impl RenderSettings {
    /// Read settings. Missing or unparsable values use the defaults; fog
    /// intensity is clamped to `0..=100`.
    pub fn from_source(source: &dyn SettingsSource) -> Self {
        let render_distance = match parse_number(source, RENDER_DISTANCE_KEY) {
            Some(v) if v >= 1.0 => v as u32,
            _ => DEFAULT_RENDER_DISTANCE,
        };
        let fog_intensity = parse_number(source, FOG_INTENSITY_KEY)
            .map_or(DEFAULT_FOG_INTENSITY, |v| v.clamp(0.0, 100.0) as u32);
        Self {
            render_distance,
            fog_intensity,
        }
    }

    pub fn mode(&self) -> RenderMode {
        if self.render_distance >= DYNAMIC_RENDER_DISTANCE {
            RenderMode::Dynamic
        } else {
            RenderMode::Fixed
        }
    }

    /// Fog half-extent in tiles.
    pub fn half_extent(&self) -> f64 {
        self.render_distance as f64 / 2.0
    }
}

fn parse_number(source: &dyn SettingsSource, key: &str) -> Option<f64> {
    let raw = source.get(key)?;
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            tracing::debug!(key, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}
