//! Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::FramecamResult;

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Crop frame and guide behaviour.
    pub overlay: OverlayConfig,

    /// Camera acquisition settings.
    pub camera: CameraConfig,

    /// Live preview settings.
    pub preview: PreviewConfig,

    /// Capture export settings.
    pub capture: CaptureConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Crop frame and annotation defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Ratio applied at startup, as a decimal or `W/H` expression.
    pub default_ratio: String,

    /// Interaction mode active at startup (`dot`, `vertical`, `horizontal`, `slant`, `select`).
    pub default_mode: String,

    /// Fraction of the limiting viewport dimension the frame may occupy.
    pub frame_margin: f64,

    /// Maximum pointer distance (px) that still hits a guide line.
    pub hit_threshold: f64,

    /// Slanted line length as a fraction of the frame width.
    pub slant_length_factor: f64,

    /// Slanted line angle in degrees (screen coordinates, y down).
    pub slant_angle_deg: f64,

    /// Entries offered in the frame ratio menu.
    pub ratio_presets: Vec<String>,
}

/// Camera acquisition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Try an environment-facing camera before any other.
    pub prefer_rear: bool,

    /// ffmpeg executable used to read video devices.
    pub ffmpeg_binary: String,

    /// Requested frame width.
    pub width: u32,

    /// Requested frame height.
    pub height: u32,

    /// Requested frame rate.
    pub fps: u32,

    /// How long to wait for the first frame before declaring a device unusable.
    pub first_frame_timeout_ms: u64,
}

/// Live preview settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Continuous redraw rate.
    pub tick_hz: u32,
}

/// Capture export settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Bake the selected-line glow into captures instead of the plain line style.
    pub highlight_selection: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "framecam=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            default_ratio: "1".to_string(),
            default_mode: "dot".to_string(),
            frame_margin: 0.92,
            hit_threshold: 18.0,
            slant_length_factor: 0.75,
            slant_angle_deg: -45.0,
            ratio_presets: ["1", "4/3", "3/4", "16/9", "9/16", "3/2"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            prefer_rear: true,
            ffmpeg_binary: "ffmpeg".to_string(),
            width: 1280,
            height: 720,
            fps: 30,
            first_frame_timeout_ms: 4000,
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { tick_hz: 60 }
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
    /// Read the config at [`config_file_path`]. A missing or broken file
    /// yields the defaults.
    pub fn load() -> Self {
        let path = config_file_path();
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(&path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring config file");
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> FramecamResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    /// Parse a config document. Missing sections and fields take their defaults.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Write to [`config_file_path`], creating its directory.
    pub fn save(&self) -> FramecamResult<()> {
        self.save_to(&config_file_path())
    }

    pub fn save_to(&self, path: &Path) -> FramecamResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// `$XDG_CONFIG_HOME/framecam/config.json`, or under `~/.config` when unset.
pub fn config_file_path() -> PathBuf {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir)
            .join(".config"),
    };
    base.join("framecam").join("config.json")
}
