//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Slide and frame rendering settings.
    pub rendering: RenderingDefaults,

    /// Video editor profile used for timeline export.
    pub timeline: TimelineProfile,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Rendering parameters shared by both export modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingDefaults {
    /// Canvas width used when a slide document declares no size.
    pub fallback_canvas_width: f64,

    /// Canvas height used when a slide document declares no size.
    pub fallback_canvas_height: f64,

    /// Pixel height of rasterized timeline frames.
    pub frame_height: u32,

    /// SVG rasterizer executable.
    pub rasterizer: String,

    /// PDF joiner executable.
    pub pdf_joiner: String,

    /// Rasterize independent artifacts in parallel.
    pub parallel: bool,
}

/// Profile written into the exported timeline document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineProfile {
    /// Frames per second (numerator; denominator is always 1).
    pub fps: u32,

    /// Output width in pixels.
    pub width: u32,

    /// Output height in pixels.
    pub height: u32,

    /// Human-readable profile description.
    pub description: String,

    /// Editor profile identifier.
    pub profile_name: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "slidecast_engine=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for RenderingDefaults {
    fn default() -> Self {
        Self {
            fallback_canvas_width: 1920.0,
            fallback_canvas_height: 1080.0,
            frame_height: 1080,
            rasterizer: "rsvg-convert".to_string(),
            pdf_joiner: "pdfjoin".to_string(),
            parallel: true,
        }
    }
}

impl Default for TimelineProfile {
    fn default() -> Self {
        Self {
            fps: 25,
            width: 1920,
            height: 1080,
            description: "HD 1080p 25 fps".to_string(),
            profile_name: "atsc_1080p_25".to_string(),
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
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
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
    base.join("slidecast").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_hd_profile() {
        let config = AppConfig::default();
        assert_eq!(config.timeline.fps, 25);
        assert_eq!(config.timeline.width, 1920);
        assert_eq!(config.rendering.frame_height, 1080);
        assert_eq!(config.rendering.rasterizer, "rsvg-convert");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{"rendering":{"frame_height":720}}"#).unwrap();
        assert_eq!(parsed.rendering.frame_height, 720);
        assert_eq!(parsed.rendering.pdf_joiner, "pdfjoin");
        assert_eq!(parsed.logging.level, "info");
    }
}
