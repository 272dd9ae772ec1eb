//! Mean color computation and color representations
//!
//! Provides:
//! - Per-channel arithmetic mean over an RGB region
//! - Resize normalization ahead of averaging
//! - HSV and hex representations of a mean color for display

use image::{imageops, imageops::FilterType, RgbImage};
use palette::{FromColor, Hsv, Srgb};
use serde::{Deserialize, Serialize};

/// Real-valued per-channel averages on the 0-255 scale, in RGB order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanColor {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

/// Hue in degrees [0, 360), saturation and value in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HsvReading {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

impl MeanColor {
    pub fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }
}

/// Color converter for region statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorConverter;

impl ColorConverter {
    pub fn new() -> Self {
        Self
    }

    /// Per-channel mean over every pixel of `image`
    ///
    /// Returns `None` for an image without pixels.
    pub fn mean_color(&self, image: &RgbImage) -> Option<MeanColor> {
        let count = image.width() as u64 * image.height() as u64;
        if count == 0 {
            return None;
        }

        let mut sums = [0u64; 3];
        for pixel in image.pixels() {
            sums[0] += pixel[0] as u64;
            sums[1] += pixel[1] as u64;
            sums[2] += pixel[2] as u64;
        }

        let n = count as f64;
        Some(MeanColor::new(
            sums[0] as f64 / n,
            sums[1] as f64 / n,
            sums[2] as f64 / n,
        ))
    }

    /// Resize to a `size` x `size` square with bilinear filtering
    pub fn normalize(&self, image: &RgbImage, size: u32) -> RgbImage {
        imageops::resize(image, size, size, FilterType::Triangle)
    }

    /// Convert a mean color to HSV
    pub fn to_hsv(&self, color: MeanColor) -> HsvReading {
        let srgb = Srgb::new(
            (color.red / 255.0) as f32,
            (color.green / 255.0) as f32,
            (color.blue / 255.0) as f32,
        );
        let hsv: Hsv = Hsv::from_color(srgb);
        HsvReading {
            hue: hsv.hue.into_positive_degrees(),
            saturation: hsv.saturation,
            value: hsv.value,
        }
    }

    /// Convert a mean color to a hexadecimal string (e.g., "#DCB450")
    pub fn to_hex(&self, color: MeanColor) -> String {
        let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        format!(
            "#{:02X}{:02X}{:02X}",
            channel(color.red),
            channel(color.green),
            channel(color.blue)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_mean_of_uniform_image() {
        let converter = ColorConverter::new();
        let img = RgbImage::from_pixel(37, 23, Rgb([220, 180, 80]));
        let mean = converter.mean_color(&img).unwrap();
        assert_close(mean.red, 220.0);
        assert_close(mean.green, 180.0);
        assert_close(mean.blue, 80.0);
    }

    #[test]
    fn test_mean_of_two_halves() {
        let converter = ColorConverter::new();
        let img = RgbImage::from_fn(4, 2, |x, _| {
            if x < 2 {
                Rgb([0, 100, 255])
            } else {
                Rgb([255, 101, 0])
            }
        });
        let mean = converter.mean_color(&img).unwrap();
        assert_close(mean.red, 127.5);
        assert_close(mean.green, 100.5);
        assert_close(mean.blue, 127.5);
    }

    #[test]
    fn test_mean_of_empty_image() {
        assert!(ColorConverter::new().mean_color(&RgbImage::new(0, 5)).is_none());
    }

    #[test]
    fn test_normalize_preserves_uniform_color() {
        let converter = ColorConverter::new();
        let img = RgbImage::from_pixel(150, 150, Rgb([12, 200, 99]));
        let resized = converter.normalize(&img, 200);
        assert_eq!(resized.dimensions(), (200, 200));

        let mean = converter.mean_color(&resized).unwrap();
        assert!((mean.red - 12.0).abs() <= 0.5);
        assert!((mean.green - 200.0).abs() <= 0.5);
        assert!((mean.blue - 99.0).abs() <= 0.5);
    }

    #[test]
    fn test_hsv_of_primaries() {
        let converter = ColorConverter::new();

        let red = converter.to_hsv(MeanColor::new(255.0, 0.0, 0.0));
        assert!(red.hue.abs() < 0.01 || (red.hue - 360.0).abs() < 0.01);
        assert!((red.saturation - 1.0).abs() < 1e-4);
        assert!((red.value - 1.0).abs() < 1e-4);

        let blue = converter.to_hsv(MeanColor::new(0.0, 0.0, 255.0));
        assert!((blue.hue - 240.0).abs() < 0.01);
    }

    #[test]
    fn test_hsv_of_pale_yellow() {
        let hsv = ColorConverter::new().to_hsv(MeanColor::new(220.0, 180.0, 80.0));
        // 60 * (180 - 80) / (220 - 80)
        assert!((hsv.hue - 42.857).abs() < 0.01);
        assert!((hsv.saturation - 140.0 / 220.0).abs() < 1e-4);
        assert!((hsv.value - 220.0 / 255.0).abs() < 1e-4);
    }

    #[test]
    fn test_hex() {
        let converter = ColorConverter::new();
        assert_eq!(converter.to_hex(MeanColor::new(220.0, 180.0, 80.0)), "#DCB450");
        assert_eq!(converter.to_hex(MeanColor::new(254.6, 0.4, 15.0)), "#FF000F");
    }
}
