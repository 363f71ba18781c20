//! Highlight marker styling.

use std::fmt;
use std::str::FromStr;

use clipfocus_common::error::ClipfocusError;
use serde::{Deserialize, Serialize};

/// Lowest opacity a caller may configure.
pub const MIN_OPACITY: f32 = 0.1;
/// Highest opacity a caller may configure.
pub const MAX_OPACITY: f32 = 1.0;
/// Smallest marker radius in pixels.
pub const MIN_RADIUS: u32 = 5;
/// Largest marker radius in pixels.
pub const MAX_RADIUS: u32 = 100;

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const RED: RgbColor = RgbColor::new(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for RgbColor {
    type Err = ClipfocusError;

    /// Parse `#RRGGBB` or `RRGGBB`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let hex = raw.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ClipfocusError::invalid_config(format!(
                "highlight color must be #RRGGBB, got {raw:?}"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| ClipfocusError::invalid_config(format!("bad color {raw:?}: {e}")))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for RgbColor {
    type Error = ClipfocusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RgbColor> for String {
    fn from(value: RgbColor) -> Self {
        value.to_string()
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Shape of the highlight marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerShape {
    /// Filled circle.
    #[default]
    Disc,
    /// Circle outline `thickness` pixels wide, measured inward from the radius.
    Ring { thickness: u32 },
}

/// How the point of interest is marked on each output frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightStyle {
    /// Marker color.
    pub color: RgbColor,

    /// Blend weight of the marker over the frame.
    pub opacity: f32,

    /// Marker radius in pixels.
    pub radius: u32,

    /// Marker shape.
    #[serde(default)]
    pub shape: MarkerShape,
}

impl HighlightStyle {
    pub fn new(color: RgbColor, opacity: f32, radius: u32) -> Self {
        Self {
            color,
            opacity,
            radius,
            shape: MarkerShape::Disc,
        }
    }

    pub fn with_shape(mut self, shape: MarkerShape) -> Self {
        self.shape = shape;
        self
    }

    /// Check the caller-facing ranges.
    pub fn validate(&self) -> Result<(), ClipfocusError> {
        if !(MIN_OPACITY..=MAX_OPACITY).contains(&self.opacity) {
            return Err(ClipfocusError::invalid_config(format!(
                "highlight opacity {} outside [{MIN_OPACITY}, {MAX_OPACITY}]",
                self.opacity
            )));
        }
        if !(MIN_RADIUS..=MAX_RADIUS).contains(&self.radius) {
            return Err(ClipfocusError::invalid_config(format!(
                "highlight radius {} outside [{MIN_RADIUS}, {MAX_RADIUS}]",
                self.radius
            )));
        }
        if let MarkerShape::Ring { thickness } = self.shape {
            if thickness == 0 || thickness > self.radius {
                return Err(ClipfocusError::invalid_config(format!(
                    "ring thickness {thickness} must be in [1, {}]",
                    self.radius
                )));
            }
        }
        Ok(())
    }
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self::new(RgbColor::RED, 0.5, 20)
    }
}
