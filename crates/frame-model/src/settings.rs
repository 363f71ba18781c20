//! Per-run configuration.
//!
//! [`ReframeSettings`] is what a caller hands over: plain values, possibly
//! loaded from a config file or command line. [`ReframeConfig`] is the
//! validated, typed form built once when a run initializes; the per-frame
//! path only ever reads the typed form.

use std::time::Duration;

use clipfocus_common::config::ReframeDefaults;
use clipfocus_common::error::{ClipfocusError, ClipfocusResult};
use serde::{Deserialize, Serialize};

use crate::aspect::AspectRatio;
use crate::style::{HighlightStyle, MarkerShape};

/// Bright-region detector tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Luma value a pixel must exceed to count as bright.
    pub brightness_threshold: u8,

    /// Smallest region (in pixels) accepted as a point of interest.
    pub min_area: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            brightness_threshold: 240,
            min_area: 1,
        }
    }
}

/// Caller-supplied settings for one reframing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReframeSettings {
    /// Aspect ratio label, e.g. "9:16".
    pub aspect_ratio: String,

    /// Marker color as `#RRGGBB`.
    pub highlight_color: String,

    /// Marker opacity in [0.1, 1.0].
    pub highlight_opacity: f32,

    /// Marker radius in pixels, [5, 100].
    pub highlight_radius: u32,

    /// Outline thickness; `None` draws a filled disc.
    #[serde(default)]
    pub ring_thickness: Option<u32>,

    /// Detector tuning.
    #[serde(default)]
    pub detector: DetectorConfig,

    /// Upper bound for a single source read or sink write, in seconds.
    pub io_timeout_secs: u64,
}

impl Default for ReframeSettings {
    fn default() -> Self {
        Self::from(&ReframeDefaults::default())
    }
}

impl From<&ReframeDefaults> for ReframeSettings {
    fn from(defaults: &ReframeDefaults) -> Self {
        Self {
            aspect_ratio: defaults.aspect_ratio.clone(),
            highlight_color: defaults.highlight_color.clone(),
            highlight_opacity: defaults.highlight_opacity,
            highlight_radius: defaults.highlight_radius,
            ring_thickness: defaults.ring_thickness,
            detector: DetectorConfig {
                brightness_threshold: defaults.brightness_threshold,
                min_area: defaults.min_region_area,
            },
            io_timeout_secs: defaults.io_timeout_secs,
        }
    }
}

/// Validated configuration, immutable for the duration of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReframeConfig {
    pub aspect_ratio: AspectRatio,
    pub style: HighlightStyle,
    pub detector: DetectorConfig,
    pub io_timeout: Duration,
}

impl ReframeConfig {
    /// Validate raw settings and build the typed configuration.
    pub fn from_settings(settings: &ReframeSettings) -> ClipfocusResult<Self> {
        let aspect_ratio: AspectRatio = settings.aspect_ratio.parse()?;

        let shape = match settings.ring_thickness {
            Some(thickness) => MarkerShape::Ring { thickness },
            None => MarkerShape::Disc,
        };
        let style = HighlightStyle::new(
            settings.highlight_color.parse()?,
            settings.highlight_opacity,
            settings.highlight_radius,
        )
        .with_shape(shape);
        style.validate()?;

        if settings.detector.min_area == 0 {
            return Err(ClipfocusError::invalid_config(
                "minimum region area must be at least 1 pixel",
            ));
        }
        if settings.io_timeout_secs == 0 {
            return Err(ClipfocusError::invalid_config(
                "I/O timeout must be at least 1 second",
            ));
        }

        Ok(Self {
            aspect_ratio,
            style,
            detector: settings.detector,
            io_timeout: Duration::from_secs(settings.io_timeout_secs),
        })
    }
}
