//! Nitrite concentration estimate from the green channel
//!
//! `estimate = max(|green_mean - baseline| / scale - 0.1, 0)` in mg/mL,
//! where `(baseline, scale)` is the calibration pair for the reference
//! background the sample was photographed against.
//!
//! This is a linear approximation with no confidence interval, not a
//! laboratory measurement.

use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::color::conversion::ColorConverter;
use crate::config::Calibration;
use crate::constants::nitrite::{OFFSET, WHITE_CALIBRATION, YELLOW_CALIBRATION};
use crate::{AnalysisError, Result};

/// Reference background selecting the calibration pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NitriteMode {
    Yellow,
    White,
}

impl NitriteMode {
    /// Built-in calibration pair for this mode
    pub fn default_calibration(&self) -> Calibration {
        match self {
            NitriteMode::Yellow => Calibration::from(YELLOW_CALIBRATION),
            NitriteMode::White => Calibration::from(WHITE_CALIBRATION),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NitriteMode::Yellow => "yellow",
            NitriteMode::White => "white",
        }
    }
}

impl fmt::Display for NitriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NitriteMode {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yellow" => Ok(NitriteMode::Yellow),
            "white" => Ok(NitriteMode::White),
            _ => Err(AnalysisError::invalid_parameter("mode", s)),
        }
    }
}

/// Nitrite estimate with the inputs that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NitriteEstimate {
    pub mode: NitriteMode,
    pub green_mean: f64,
    /// Estimated concentration in mg/mL, never negative
    pub mg_per_ml: f64,
}

/// Apply the calibration formula to a green-channel mean
pub fn nitrite_from_green(green_mean: f64, calibration: Calibration) -> f64 {
    let raw = (green_mean - calibration.baseline).abs() / calibration.scale;
    (raw - OFFSET).max(0.0)
}

/// Estimate nitrite from a cropped region using the built-in calibration
///
/// # Errors
///
/// Returns `AnalysisError::ImageTooSmall` if `region` has no pixels.
pub fn estimate_nitrite(region: &RgbImage, mode: NitriteMode) -> Result<NitriteEstimate> {
    estimate_nitrite_with(region, mode, mode.default_calibration())
}

/// Estimate nitrite from a cropped region with an explicit calibration pair
pub fn estimate_nitrite_with(
    region: &RgbImage,
    mode: NitriteMode,
    calibration: Calibration,
) -> Result<NitriteEstimate> {
    let mean = ColorConverter::new()
        .mean_color(region)
        .ok_or(AnalysisError::ImageTooSmall {
            width: region.width(),
            height: region.height(),
            window: region.width().max(region.height()),
        })?;

    Ok(NitriteEstimate {
        mode,
        green_mean: mean.green,
        mg_per_ml: nitrite_from_green(mean.green, calibration),
    })
}
