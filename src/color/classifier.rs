//! Urine color classification from mean RGB
//!
//! The region is cropped, resized to the normalization size, averaged, and
//! the mean is matched against an ordered RGB rule table. The first rule
//! that matches wins; the last rule matches everything, so every mean color
//! yields exactly one label.
//!
//! | # | red            | green              | blue    | label              |
//! |---|----------------|--------------------|---------|--------------------|
//! | 1 | > 200          | > 200              | > 200   | clear              |
//! | 2 | > 200          | 150 ..= 200        | < 100   | normal pale yellow |
//! | 3 | > 180          | 100 .. 150         | < 80    | dark yellow        |
//! | 4 | > 180          | 50 .. 100          | < 60    | orange             |
//! | 5 | 60 ..= 180     | <= 120 and < red   | <= 80   | brown              |
//! | 6 | anything else  |                    |         | unclassifiable     |

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::color::conversion::{ColorConverter, HsvReading, MeanColor};
use crate::config::{ColorConfig, Language};
use crate::constants::thresholds::*;
use crate::{AnalysisError, Result};

/// Urine color categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrineColor {
    Clear,
    NormalPaleYellow,
    DarkYellow,
    Orange,
    Brown,
    Unclassifiable,
}

impl UrineColor {
    pub const ALL: [UrineColor; 6] = [
        UrineColor::Clear,
        UrineColor::NormalPaleYellow,
        UrineColor::DarkYellow,
        UrineColor::Orange,
        UrineColor::Brown,
        UrineColor::Unclassifiable,
    ];

    /// Classify a mean color with the RGB rule table
    pub fn from_mean(mean: MeanColor) -> Self {
        let MeanColor { red: r, green: g, blue: b } = mean;

        if r > CLEAR_MIN && g > CLEAR_MIN && b > CLEAR_MIN {
            UrineColor::Clear
        } else if r > PALE_RED_MIN
            && (PALE_GREEN_RANGE.0..=PALE_GREEN_RANGE.1).contains(&g)
            && b < PALE_BLUE_MAX
        {
            UrineColor::NormalPaleYellow
        } else if r > DEEP_RED_MIN
            && (DARK_GREEN_RANGE.0..DARK_GREEN_RANGE.1).contains(&g)
            && b < DARK_BLUE_MAX
        {
            UrineColor::DarkYellow
        } else if r > DEEP_RED_MIN
            && (ORANGE_GREEN_RANGE.0..ORANGE_GREEN_RANGE.1).contains(&g)
            && b < ORANGE_BLUE_MAX
        {
            UrineColor::Orange
        } else if (BROWN_RED_RANGE.0..=BROWN_RED_RANGE.1).contains(&r)
            && g < r
            && g <= BROWN_GREEN_MAX
            && b <= BROWN_BLUE_MAX
        {
            UrineColor::Brown
        } else {
            UrineColor::Unclassifiable
        }
    }

    /// Short machine-friendly name
    pub fn key(&self) -> &'static str {
        match self {
            UrineColor::Clear => "clear",
            UrineColor::NormalPaleYellow => "normal_pale_yellow",
            UrineColor::DarkYellow => "dark_yellow",
            UrineColor::Orange => "orange",
            UrineColor::Brown => "brown",
            UrineColor::Unclassifiable => "unclassifiable",
        }
    }

    /// Display label in the requested language
    pub fn label(&self, language: Language) -> &'static str {
        match (language, self) {
            (Language::English, UrineColor::Clear) => "Clear",
            (Language::English, UrineColor::NormalPaleYellow) => "Normal pale yellow",
            (Language::English, UrineColor::DarkYellow) => "Dark yellow",
            (Language::English, UrineColor::Orange) => "Orange",
            (Language::English, UrineColor::Brown) => "Brown",
            (Language::English, UrineColor::Unclassifiable) => "Unclassifiable",
            (Language::Thai, UrineColor::Clear) => "ใส",
            (Language::Thai, UrineColor::NormalPaleYellow) => "เหลืองอ่อน",
            (Language::Thai, UrineColor::DarkYellow) => "เหลืองเข้ม",
            (Language::Thai, UrineColor::Orange) => "ส้ม",
            (Language::Thai, UrineColor::Brown) => "น้ำตาล",
            (Language::Thai, UrineColor::Unclassifiable) => "ไม่สามารถประเมินได้",
        }
    }

    /// Hydration advice shown next to the label
    pub fn advice(&self, language: Language) -> &'static str {
        match (language, self) {
            (Language::English, UrineColor::Clear) => "Possibly drinking a lot of water",
            (Language::English, UrineColor::NormalPaleYellow) => "Normal",
            (Language::English, UrineColor::DarkYellow) => "Possibly dehydrated",
            (Language::English, UrineColor::Orange) => "Severely dehydrated",
            (Language::English, UrineColor::Brown) => "Consider seeing a doctor",
            (Language::English, UrineColor::Unclassifiable) => {
                "The color could not be assessed; try another photo"
            }
            (Language::Thai, UrineColor::Clear) => "อาจดื่มน้ำมาก",
            (Language::Thai, UrineColor::NormalPaleYellow) => "ปกติ",
            (Language::Thai, UrineColor::DarkYellow) => "อาจขาดน้ำ",
            (Language::Thai, UrineColor::Orange) => "ขาดน้ำมาก",
            (Language::Thai, UrineColor::Brown) => "ควรพบแพทย์",
            (Language::Thai, UrineColor::Unclassifiable) => "ลองถ่ายภาพใหม่อีกครั้ง",
        }
    }
}

/// Result of urine color classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrineColorReading {
    pub label: UrineColor,
    /// Mean color the label was derived from
    pub mean: MeanColor,
    pub hex: String,
    /// Display only; not used by the rule table
    pub hsv: HsvReading,
}

/// Classifies the centered region of an image by its mean color
#[derive(Debug, Clone)]
pub struct UrineColorClassifier {
    converter: ColorConverter,
    resize_to: Option<u32>,
}

impl UrineColorClassifier {
    pub fn new(config: &ColorConfig) -> Self {
        Self {
            converter: ColorConverter::new(),
            resize_to: config.resize_to,
        }
    }

    /// Classify an already-cropped region
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ImageTooSmall` if `region` has no pixels.
    pub fn classify(&self, region: &RgbImage) -> Result<UrineColorReading> {
        let too_small = || AnalysisError::ImageTooSmall {
            width: region.width(),
            height: region.height(),
            window: region.width().max(region.height()),
        };
        if region.width() == 0 || region.height() == 0 {
            return Err(too_small());
        }

        // Step 1: Resize normalization
        let normalized;
        let sample = match self.resize_to {
            Some(size) => {
                normalized = self.converter.normalize(region, size);
                &normalized
            }
            None => region,
        };

        // Step 2: Mean color
        let mean = self.converter.mean_color(sample).ok_or_else(too_small)?;

        // Step 3: Rule table
        Ok(UrineColorReading {
            label: UrineColor::from_mean(mean),
            mean,
            hex: self.converter.to_hex(mean),
            hsv: self.converter.to_hsv(mean),
        })
    }
}

/// Classify a cropped region with the given color settings
pub fn classify_urine_color(region: &RgbImage, config: &ColorConfig) -> Result<UrineColorReading> {
    UrineColorClassifier::new(config).classify(region)
}
