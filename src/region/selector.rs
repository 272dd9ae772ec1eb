//! Centered region-of-interest selection
//!
//! Picks a fixed-size square window centered on the image midpoint, meant to
//! land on the sample liquid and keep container edges out of the average.
//!
//! When the image is smaller than the window in a dimension, the window is
//! shrunk to the image extent in that dimension. The returned region is
//! therefore always inside the image; only a zero-area result is an error.

use image::{imageops, RgbImage};
use serde::{Deserialize, Serialize};

use crate::{AnalysisError, Result};

/// Rectangular sub-window of an image, in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Roi {
    /// Number of pixels covered
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Check that the region lies entirely inside a `width` x `height` image
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x as u64 + self.width as u64 <= width as u64
            && self.y as u64 + self.height as u64 <= height as u64
    }
}

/// Selects a centered square window of fixed edge length
#[derive(Debug, Clone, Copy)]
pub struct RegionSelector {
    window_size: u32,
}

impl RegionSelector {
    /// Create a selector for windows of `window_size` pixels per edge
    pub fn new(window_size: u32) -> Self {
        Self { window_size }
    }

    pub fn window_size(&self) -> u32 {
        self.window_size
    }

    /// Compute the centered window for an image of the given dimensions
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ImageTooSmall` if the clamped window has zero
    /// area (zero-sized image or zero-sized window).
    pub fn select_for_dimensions(&self, width: u32, height: u32) -> Result<Roi> {
        let s = self.window_size;

        let x = (width / 2).saturating_sub(s / 2);
        let y = (height / 2).saturating_sub(s / 2);

        // Shrink to the image extent; x <= width and y <= height hold above
        let roi = Roi {
            x,
            y,
            width: s.min(width - x),
            height: s.min(height - y),
        };

        if roi.area() == 0 {
            return Err(AnalysisError::ImageTooSmall {
                width,
                height,
                window: s,
            });
        }

        Ok(roi)
    }

    /// Compute the centered window for `image`
    pub fn select(&self, image: &RgbImage) -> Result<Roi> {
        self.select_for_dimensions(image.width(), image.height())
    }

    /// Select the centered window and copy its pixels out
    pub fn extract(&self, image: &RgbImage) -> Result<RgbImage> {
        let roi = self.select(image)?;
        Ok(crop(image, &roi))
    }
}

/// Centered window of edge `window_size` within `image`
pub fn select_region(image: &RgbImage, window_size: u32) -> Result<Roi> {
    RegionSelector::new(window_size).select(image)
}

/// Copy the pixels of `roi` into a new image
///
/// `roi` must come from [`select_region`] (or otherwise fit within `image`).
pub fn crop(image: &RgbImage, roi: &Roi) -> RgbImage {
    debug_assert!(roi.fits_within(image.width(), image.height()));
    imageops::crop_imm(image, roi.x, roi.y, roi.width, roi.height).to_image()
}
