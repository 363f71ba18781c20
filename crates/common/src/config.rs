//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default reframing parameters.
    #[serde(default)]
    pub reframe: ReframeDefaults,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default reframing parameters, overridable per run from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReframeDefaults {
    /// Aspect ratio label ("1:1", "4:3", "16:9", "9:16", "3:4").
    pub aspect_ratio: String,

    /// Marker color as a hex string (`#RRGGBB`).
    pub highlight_color: String,

    /// Marker opacity in [0.1, 1.0].
    pub highlight_opacity: f32,

    /// Marker radius in pixels, [5, 100].
    pub highlight_radius: u32,

    /// Draw an outlined ring of this thickness instead of a filled disc.
    pub ring_thickness: Option<u32>,

    /// Luma value a pixel must exceed to count as bright.
    pub brightness_threshold: u8,

    /// Smallest bright region (in pixels) accepted as a point of interest.
    pub min_region_area: u32,

    /// Upper bound for a single source read or sink write.
    pub io_timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "clipfocus=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for ReframeDefaults {
    fn default() -> Self {
        Self {
            aspect_ratio: "9:16".to_string(),
            highlight_color: "#FF0000".to_string(),
            highlight_opacity: 0.5,
            highlight_radius: 20,
            ring_thickness: None,
            brightness_threshold: 240,
            min_region_area: 1,
            io_timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("clipfocus").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.json"));
        assert_eq!(config.reframe.aspect_ratio, "9:16");
        assert_eq!(config.reframe.brightness_threshold, 240);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"reframe":{"aspect_ratio":"1:1"}}"#).unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.reframe.aspect_ratio, "1:1");
        assert_eq!(config.reframe.highlight_radius, 20);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_serialized_config_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = AppConfig::default();
        config.reframe.highlight_opacity = 0.8;
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let reloaded = AppConfig::load_from(&path);
        assert!((reloaded.reframe.highlight_opacity - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_garbage_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        let config = AppConfig::load_from(&path);
        assert_eq!(config.reframe.io_timeout_secs, 30);
    }
}
