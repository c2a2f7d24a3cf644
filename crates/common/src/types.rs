use serde::{Deserialize, Serialize};
use std::fmt;

/// Terrain kind of a single tile.
///
/// The generator only emits the four canonical kinds. `Trail` and `Mana`
/// exist only in custom worlds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileType {
    Grass,
    Water,
    Wall,
    Cave,
    Trail,
    Mana,
}

impl TileType {
    /// Every tile kind, in declaration order.
    pub const ALL: [TileType; 6] = [
        TileType::Grass,
        TileType::Water,
        TileType::Wall,
        TileType::Cave,
        TileType::Trail,
        TileType::Mana,
    ];

    /// The kinds a generation config must assign percentages to.
    pub const CANONICAL: [TileType; 4] = [
        TileType::Grass,
        TileType::Water,
        TileType::Wall,
        TileType::Cave,
    ];

    /// Lowercase name used in configs and world documents.
    pub fn name(self) -> &'static str {
        match self {
            TileType::Grass => "grass",
            TileType::Water => "water",
            TileType::Wall => "wall",
            TileType::Cave => "cave",
            TileType::Trail => "trail",
            TileType::Mana => "mana",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Decode a legacy `mapData` cell value.
    ///
    /// `0` is an empty cell and yields `None`. Values outside the table fall
    /// back to grass.
    pub fn from_map_code(code: i64) -> Option<Self> {
        match code {
            0 => None,
            1 => Some(TileType::Grass),
            2 => Some(TileType::Water),
            3 => Some(TileType::Trail),
            4 => Some(TileType::Cave),
            5 => Some(TileType::Mana),
            _ => Some(TileType::Grass),
        }
    }

    /// Flat color drawn when no texture is available.
    pub fn fallback_color(self) -> Rgb {
        match self {
            TileType::Grass => Rgb::new(0x4a, 0x7c, 0x3f),
            TileType::Water => Rgb::new(0x3a, 0x6e, 0xc4),
            TileType::Wall => Rgb::new(0x6b, 0x6b, 0x6b),
            TileType::Cave => Rgb::new(0x3b, 0x2f, 0x2a),
            TileType::Trail => Rgb::new(0xb5, 0x98, 0x66),
            TileType::Mana => Rgb::new(0x8c, 0x52, 0xff),
        }
    }

    /// Whether an actor may stand on this tile.
    pub fn is_walkable(self) -> bool {
        !matches!(self, TileType::Wall | TileType::Water)
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error from parsing a `#rrggbb` color string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {0:?}: expected #rrggbb")]
pub struct ColorParseError(pub String);

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn parse_hex(s: &str) -> Result<Self, ColorParseError> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ColorParseError(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ColorParseError(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Attach an alpha channel.
    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a: a.clamp(0.0, 1.0),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// RGB color with a floating alpha in `[0, 1]`, used for overlays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_codes_follow_legacy_table() {
        assert_eq!(TileType::from_map_code(0), None);
        assert_eq!(TileType::from_map_code(1), Some(TileType::Grass));
        assert_eq!(TileType::from_map_code(2), Some(TileType::Water));
        assert_eq!(TileType::from_map_code(3), Some(TileType::Trail));
        assert_eq!(TileType::from_map_code(4), Some(TileType::Cave));
        assert_eq!(TileType::from_map_code(5), Some(TileType::Mana));
    }

    #[test]
    fn unknown_map_codes_fall_back_to_grass() {
        assert_eq!(TileType::from_map_code(6), Some(TileType::Grass));
        assert_eq!(TileType::from_map_code(-3), Some(TileType::Grass));
    }

    #[test]
    fn names_round_trip_case_insensitively() {
        for t in TileType::ALL {
            assert_eq!(TileType::from_name(t.name()), Some(t));
        }
        assert_eq!(TileType::from_name("WATER"), Some(TileType::Water));
        assert_eq!(TileType::from_name("lava"), None);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&TileType::Cave).unwrap();
        assert_eq!(json, "\"cave\"");
    }

    #[test]
    fn walls_and_water_block_movement() {
        assert!(!TileType::Wall.is_walkable());
        assert!(!TileType::Water.is_walkable());
        assert!(TileType::Trail.is_walkable());
    }

    #[test]
    fn parse_hex_color() {
        assert_eq!(Rgb::parse_hex("#ff8000").unwrap(), Rgb::new(255, 128, 0));
        assert_eq!(Rgb::parse_hex("00ff00").unwrap(), Rgb::new(0, 255, 0));
        assert!(Rgb::parse_hex("#fff").is_err());
        assert!(Rgb::parse_hex("#gg0000").is_err());
    }

    #[test]
    fn display_is_lowercase_hex() {
        assert_eq!(Rgb::new(10, 171, 255).to_string(), "#0aabff");
    }

    #[test]
    fn alpha_is_clamped() {
        assert_eq!(Rgb::new(0, 0, 0).with_alpha(1.5).a, 1.0);
        assert_eq!(Rgb::new(0, 0, 0).with_alpha(-0.5).a, 0.0);
    }
}
