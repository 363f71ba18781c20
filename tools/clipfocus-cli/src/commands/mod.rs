pub mod check;
pub mod preview;
pub mod probe;
pub mod reframe;

use std::path::{Path, PathBuf};

use clap::Args;
use clipfocus_common::config::AppConfig;
use clipfocus_frame_model::settings::ReframeSettings;

/// Per-run overrides for the configured reframing defaults.
#[derive(Debug, Clone, Default, Args)]
pub struct ReframeArgs {
    /// Aspect ratio: 1:1, 4:3, 16:9, 9:16 or 3:4
    #[arg(long)]
    pub ratio: Option<String>,

    /// Highlight color as RRGGBB
    #[arg(long)]
    pub color: Option<String>,

    /// Highlight opacity [0.1, 1.0]
    #[arg(long)]
    pub opacity: Option<f32>,

    /// Highlight radius in pixels [5, 100]
    #[arg(long)]
    pub radius: Option<u32>,

    /// Draw an outlined ring of this thickness instead of a filled disc
    #[arg(long)]
    pub ring: Option<u32>,

    /// Luma a pixel must exceed to count as bright
    #[arg(long)]
    pub threshold: Option<u8>,

    /// Smallest bright region (pixels) accepted as the cursor
    #[arg(long)]
    pub min_area: Option<u32>,

    /// Timeout for a single decode or encode step, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl ReframeArgs {
    /// Config-file defaults with command-line values layered on top.
    pub fn resolve(&self, config: &AppConfig) -> ReframeSettings {
        let mut settings = ReframeSettings::from(&config.reframe);
        if let Some(ratio) = &self.ratio {
            settings.aspect_ratio = ratio.clone();
        }
        if let Some(color) = &self.color {
            settings.highlight_color = color.clone();
        }
        if let Some(opacity) = self.opacity {
            settings.highlight_opacity = opacity;
        }
        if let Some(radius) = self.radius {
            settings.highlight_radius = radius;
        }
        if self.ring.is_some() {
            settings.ring_thickness = self.ring;
        }
        if let Some(threshold) = self.threshold {
            settings.detector.brightness_threshold = threshold;
        }
        if let Some(min_area) = self.min_area {
            settings.detector.min_area = min_area;
        }
        if let Some(timeout) = self.timeout_secs {
            settings.io_timeout_secs = timeout;
        }
        settings
    }
}

/// `<dir>/<stem><suffix>.<ext>` next to `input`.
pub fn sibling_path(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());
    input.with_file_name(format!("{stem}{suffix}.{extension}"))
}
