//! # Poster Configuration
//!
//! Layout constants for a poster build. Every section carries
//! `#[serde(default)]`, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! margin = 25
//! font_family = "Noto Sans CJK SC"
//!
//! [secondary]
//! color = "#9d9d9d"
//! gap = 20
//! ```
//!
//! ## Defaults
//!
//! | Setting | Value |
//! |---------|-------|
//! | Margin | 25 px |
//! | Primary caption | 28 px, `#474747`, 30 px gap |
//! | Secondary caption | 28 px, `#9d9d9d`, 20 px gap |
//! | QR labels | 22 px, `#474747` |

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use image::Rgb;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PosterError;
use crate::text::wrap::BreakThreshold;

/// An opaque RGB color, written as `"#RRGGBB"` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const WHITE: Self = Self([255, 255, 255]);
    pub const BLACK: Self = Self([0, 0, 0]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn to_rgb(self) -> Rgb<u8> {
        Rgb(self.0)
    }
}

impl FromStr for Color {
    type Err = PosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(PosterError::Config(format!("Invalid color '{}'", s)));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| PosterError::Config(format!("Invalid color '{}'", s)))
        };
        Ok(Self([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl TryFrom<String> for Color {
    type Error = PosterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

/// Style of one caption block.
///
/// Primary and secondary captions have different defaults, so a partial
/// table is filled from the defaults of the caption it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptionStyle {
    /// Font size in pixels.
    pub size: f32,
    pub color: Color,
    /// Vertical gap inserted before the block.
    pub gap: u32,
}

impl CaptionStyle {
    pub fn primary() -> Self {
        Self {
            size: 28.0,
            color: Color::rgb(71, 71, 71),
            gap: 30,
        }
    }

    pub fn secondary() -> Self {
        Self {
            size: 28.0,
            color: Color::rgb(157, 157, 157),
            gap: 20,
        }
    }

    fn deserialize_primary<'de, D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(CaptionOverrides::deserialize(d)?.apply(Self::primary()))
    }

    fn deserialize_secondary<'de, D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(CaptionOverrides::deserialize(d)?.apply(Self::secondary()))
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CaptionOverrides {
    size: Option<f32>,
    color: Option<Color>,
    gap: Option<u32>,
}

impl CaptionOverrides {
    fn apply(self, base: CaptionStyle) -> CaptionStyle {
        CaptionStyle {
            size: self.size.unwrap_or(base.size),
            color: self.color.unwrap_or(base.color),
            gap: self.gap.unwrap_or(base.gap),
        }
    }
}

/// The two labels drawn next to the QR code, anchored to the bottom edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    pub size: f32,
    pub color: Color,
    /// Upper and lower label text.
    pub lines: [String; 2],
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            size: 22.0,
            color: Color::rgb(71, 71, 71),
            lines: ["SuchJack".to_string(), "一个幽默的程序员".to_string()],
        }
    }
}

/// Plain canvas used when a job names no background image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub width: u32,
    pub height: u32,
    pub color: Color,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 1200,
            color: Color::WHITE,
        }
    }
}

/// QR generation settings, used when a job gives a link instead of an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrConfig {
    /// Edge length of the generated QR raster.
    pub size: u32,
    /// Link encoded when a job names neither a QR image nor a link.
    pub link: Option<String>,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            size: 200,
            link: None,
        }
    }
}

/// Complete layout description for a poster build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosterSpec {
    /// Inset applied on every side of the content area.
    pub margin: u32,
    /// Family every caption face is loaded from.
    pub font_family: String,
    pub break_threshold: BreakThreshold,
    #[serde(deserialize_with = "CaptionStyle::deserialize_primary")]
    pub primary: CaptionStyle,
    #[serde(deserialize_with = "CaptionStyle::deserialize_secondary")]
    pub secondary: CaptionStyle,
    pub labels: LabelStyle,
    pub background: BackgroundConfig,
    pub qr: QrConfig,
}

impl Default for PosterSpec {
    fn default() -> Self {
        Self {
            margin: 25,
            font_family: "Microsoft YaHei".to_string(),
            break_threshold: BreakThreshold::default(),
            primary: CaptionStyle::primary(),
            secondary: CaptionStyle::secondary(),
            labels: LabelStyle::default(),
            background: BackgroundConfig::default(),
            qr: QrConfig::default(),
        }
    }
}

impl PosterSpec {
    /// Parse a spec from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, PosterError> {
        toml::from_str(text).map_err(|e| PosterError::Config(e.to_string()))
    }

    /// Load a spec from a TOML file.
    pub fn load(path: &Path) -> Result<Self, PosterError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
            .map_err(|e| PosterError::Config(format!("{}: {}", path.display(), e)))
    }
}
