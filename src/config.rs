//! Configuration structures for the urine_colorscan server and pipeline.
//!
//! All tunable parameters are grouped into one [`AppConfig`] that is passed
//! explicitly to the analysis pipeline and the web server. Nothing here is
//! process-wide state, so tests can inject their own values.
//!
//! # Configuration Loading
//!
//! ```no_run
//! use urine_colorscan::AppConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = AppConfig::from_json_file(Path::new("config.json"))?;
//!
//! // Or use defaults
//! let config = AppConfig::default();
//! # Ok::<(), urine_colorscan::AnalysisError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`ServerConfig`]: bind address, request size limit, display language
//! - [`StorageConfig`]: upload directory
//! - [`AnalysisConfig`]: sampling windows and nitrite calibration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::color::NitriteMode;
use crate::constants::{nitrite, sampling, upload};
use crate::{AnalysisError, Result};

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub analysis: AnalysisConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind_addr: String,

    /// Maximum accepted request body in bytes
    pub max_upload_bytes: usize,

    /// Language of labels and advice in rendered pages
    #[serde(default)]
    pub language: Language,
}

/// Upload persistence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory that receives uploaded images
    pub upload_dir: PathBuf,
}

/// Parameters for both color analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub color: ColorConfig,
    pub nitrite: NitriteConfig,
}

/// Urine color classification parameters.
///
/// The region is cropped first and then resized to `resize_to`; the order is
/// fixed because it changes the mean for non-uniform regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorConfig {
    /// Edge length of the centered crop window
    pub window_size: u32,

    /// Square size the crop is resized to before averaging, if any
    pub resize_to: Option<u32>,
}

/// Nitrite estimate parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NitriteConfig {
    /// Edge length of the centered crop window
    pub window_size: u32,

    /// Mode used when a request does not specify one
    pub default_mode: NitriteMode,

    /// Calibration for the yellow reference background
    pub yellow: Calibration,

    /// Calibration for the white reference background
    pub white: Calibration,
}

/// Linear calibration on the green-channel mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub baseline: f64,
    pub scale: f64,
}

/// Language used for labels and advice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Thai,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:18800".to_string(),
            max_upload_bytes: upload::MAX_UPLOAD_BYTES,
            language: Language::English,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            color: ColorConfig {
                window_size: sampling::COLOR_WINDOW,
                resize_to: Some(sampling::NORMALIZED_SIZE),
            },
            nitrite: NitriteConfig {
                window_size: sampling::NITRITE_WINDOW,
                default_mode: NitriteMode::Yellow,
                yellow: Calibration::from(nitrite::YELLOW_CALIBRATION),
                white: Calibration::from(nitrite::WHITE_CALIBRATION),
            },
        }
    }
}

impl From<(f64, f64)> for Calibration {
    fn from((baseline, scale): (f64, f64)) -> Self {
        Self { baseline, scale }
    }
}

impl NitriteConfig {
    /// Calibration pair selected by `mode`
    pub fn calibration(&self, mode: NitriteMode) -> Calibration {
        match mode {
            NitriteMode::Yellow => self.yellow,
            NitriteMode::White => self.white,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AnalysisError::ConfigError {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| AnalysisError::ConfigError {
            message: format!("cannot parse {}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| AnalysisError::ConfigError {
            message: e.to_string(),
        })?;
        std::fs::write(path, json)
            .map_err(|e| AnalysisError::storage(format!("cannot write {}", path.display()), e))
    }

    /// Reject values that would make every analysis fail
    pub fn validate(&self) -> Result<()> {
        let analysis = &self.analysis;
        if analysis.color.window_size == 0 {
            return Err(AnalysisError::invalid_parameter("analysis.color.window_size", "0"));
        }
        if analysis.color.resize_to == Some(0) {
            return Err(AnalysisError::invalid_parameter("analysis.color.resize_to", "0"));
        }
        if analysis.nitrite.window_size == 0 {
            return Err(AnalysisError::invalid_parameter("analysis.nitrite.window_size", "0"));
        }
        for (name, calibration) in [("yellow", analysis.nitrite.yellow), ("white", analysis.nitrite.white)] {
            if !(calibration.scale.is_finite() && calibration.scale > 0.0) {
                return Err(AnalysisError::invalid_parameter(
                    format!("analysis.nitrite.{}.scale", name),
                    calibration.scale.to_string(),
                ));
            }
        }
        if self.server.max_upload_bytes == 0 {
            return Err(AnalysisError::invalid_parameter("server.max_upload_bytes", "0"));
        }
        Ok(())
    }
}
