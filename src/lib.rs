//! # Urine ColorScan
//!
//! A Rust crate for reading hydration cues from photographs of urine samples.
//!
//! The analysis is a single pass over the decoded image:
//! - Select a centered window that isolates the sample liquid
//! - Resize it to a fixed size and average its color
//! - Map the mean color through a fixed RGB rule table to a label
//! - Estimate nitrite concentration from the green mean of a smaller window
//!
//! A small axum server ([`server`]) wraps the pipeline with upload,
//! camera capture and retrieval endpoints.
//!
//! ## Example
//!
//! ```rust,no_run
//! use urine_colorscan::{analyze_image, AnalysisConfig, NitriteMode};
//! use std::path::Path;
//!
//! let config = AnalysisConfig::default();
//! let result = analyze_image(Path::new("sample.jpg"), &config, NitriteMode::Yellow)?;
//! println!("{:?}: {} mg/mL", result.color.label, result.nitrite.mg_per_ml);
//! # Ok::<(), urine_colorscan::AnalysisError>(())
//! ```

use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod error;
pub mod constants;
pub mod config;
pub mod image_loader;
pub mod region;
pub mod color;
pub mod storage;
pub mod server;

pub use error::{AnalysisError, Result};
pub use config::{AnalysisConfig, AppConfig, Language};
pub use color::{MeanColor, NitriteEstimate, NitriteMode, UrineColor, UrineColorReading};
pub use region::Roi;

use color::nitrite::estimate_nitrite_with;
use color::UrineColorClassifier;
use region::RegionSelector;

/// Combined result of both analyses on one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrineAnalysis {
    /// Decoded image width
    pub width: u32,
    /// Decoded image height
    pub height: u32,
    /// Window the color classification averaged over
    pub color_region: Roi,
    pub color: UrineColorReading,
    /// Window the nitrite estimate averaged over
    pub nitrite_region: Roi,
    pub nitrite: NitriteEstimate,
}

/// Analyze an encoded image held in memory
///
/// # Errors
///
/// Returns `AnalysisError` if:
/// - The bytes are not a decodable image (`DecodeError`)
/// - A sampling window would have zero area (`ImageTooSmall`)
pub fn analyze_bytes(bytes: &[u8], config: &AnalysisConfig, mode: NitriteMode) -> Result<UrineAnalysis> {
    let image = image_loader::decode_image(bytes)?;
    analyze_decoded(&image, config, mode)
}

/// Analyze an image file on disk
pub fn analyze_image(path: &Path, config: &AnalysisConfig, mode: NitriteMode) -> Result<UrineAnalysis> {
    let image = image_loader::load_image(path)?;
    analyze_decoded(&image, config, mode)
}

/// Analyze an already decoded RGB image
///
/// The color classification and the nitrite estimate use separate centered
/// windows (150 and 80 pixels by default), so they do not necessarily
/// average the same pixels.
pub fn analyze_decoded(image: &RgbImage, config: &AnalysisConfig, mode: NitriteMode) -> Result<UrineAnalysis> {
    // Step 1: Urine color over the larger window
    let color_selector = RegionSelector::new(config.color.window_size);
    let color_region = color_selector.select(image)?;
    let color = UrineColorClassifier::new(&config.color)
        .classify(&region::crop(image, &color_region))?;

    // Step 2: Nitrite over the smaller window
    let nitrite_selector = RegionSelector::new(config.nitrite.window_size);
    let nitrite_region = nitrite_selector.select(image)?;
    let nitrite = estimate_nitrite_with(
        &region::crop(image, &nitrite_region),
        mode,
        config.nitrite.calibration(mode),
    )?;

    tracing::debug!(
        width = image.width(),
        height = image.height(),
        label = color.label.key(),
        red = color.mean.red,
        green = color.mean.green,
        blue = color.mean.blue,
        nitrite = nitrite.mg_per_ml,
        "analyzed image"
    );

    Ok(UrineAnalysis {
        width: image.width(),
        height: image.height(),
        color_region,
        color,
        nitrite_region,
        nitrite,
    })
}
