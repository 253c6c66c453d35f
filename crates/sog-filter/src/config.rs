//! YAML-configurable settings for filter runs.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sog_core::{ErrorInfo, SogError};

/// Settings shared by the pipeline and the history ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Location of the append-only history log.
    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,
    /// Whether completed runs are appended to the history log.
    #[serde(default = "default_record_history")]
    pub record_history: bool,
    /// Image export settings; export is disabled when absent.
    #[serde(default)]
    pub export: Option<ExportConfig>,
}

fn default_history_path() -> PathBuf {
    PathBuf::from("history.txt")
}

fn default_record_history() -> bool {
    true
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            history_path: default_history_path(),
            record_history: default_record_history(),
            export: None,
        }
    }
}

impl FilterConfig {
    /// Loads a configuration file.
    pub fn load(path: &Path) -> Result<Self, SogError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            SogError::Config(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        Self::from_yaml_str(&contents).map_err(|err| err.with_context("path", path.display()))
    }

    /// Parses a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SogError> {
        serde_yaml::from_str(yaml)
            .map_err(|err| SogError::Config(ErrorInfo::new("config-parse", err.to_string())))
    }
}

/// Where and how passing graphs are rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Output directory, created on first export.
    pub directory: PathBuf,
    /// Image format.
    #[serde(default)]
    pub format: ImageFormat,
    /// Canvas geometry.
    #[serde(default)]
    pub canvas: CanvasConfig,
}

/// Image formats the built-in exporter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Scalable vector graphics.
    #[default]
    Svg,
}

impl ImageFormat {
    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = SogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "svg" => Ok(ImageFormat::Svg),
            other => Err(SogError::Config(
                ErrorInfo::new("unsupported-image-format", "image format is not supported")
                    .with_context("format", other)
                    .with_hint("the built-in renderer writes svg"),
            )),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Geometry of rendered images.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Radius of node markers in pixels.
    pub node_radius: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            node_radius: 14.0,
        }
    }
}
