//! Calibration constants and reference values for urine sample analysis
//!
//! Defaults for the sampling windows, the RGB rule table, and the
//! nitrite calibration pairs. Runtime values come from [`crate::config`];
//! these constants only seed its defaults.

/// Sampling windows and normalization size
pub mod sampling {
    /// Edge length of the centered window used for urine color classification
    pub const COLOR_WINDOW: u32 = 150;

    /// Edge length of the centered window used for the nitrite estimate
    pub const NITRITE_WINDOW: u32 = 80;

    /// Square size the color window is resized to before averaging
    pub const NORMALIZED_SIZE: u32 = 200;
}

/// RGB mean thresholds for urine color classification (0-255 scale)
pub mod thresholds {
    /// Every channel strictly above this reads as clear
    pub const CLEAR_MIN: f64 = 200.0;

    /// Red strictly above this for normal pale yellow
    pub const PALE_RED_MIN: f64 = 200.0;
    /// Inclusive green range for normal pale yellow
    pub const PALE_GREEN_RANGE: (f64, f64) = (150.0, 200.0);
    /// Blue strictly below this for normal pale yellow
    pub const PALE_BLUE_MAX: f64 = 100.0;

    /// Red strictly above this for dark yellow and orange
    pub const DEEP_RED_MIN: f64 = 180.0;
    /// Half-open green range `[lo, hi)` for dark yellow
    pub const DARK_GREEN_RANGE: (f64, f64) = (100.0, 150.0);
    /// Blue strictly below this for dark yellow
    pub const DARK_BLUE_MAX: f64 = 80.0;
    /// Half-open green range `[lo, hi)` for orange
    pub const ORANGE_GREEN_RANGE: (f64, f64) = (50.0, 100.0);
    /// Blue strictly below this for orange
    pub const ORANGE_BLUE_MAX: f64 = 60.0;

    /// Inclusive red range for brown
    pub const BROWN_RED_RANGE: (f64, f64) = (60.0, 180.0);
    /// Green at most this for brown
    pub const BROWN_GREEN_MAX: f64 = 120.0;
    /// Blue at most this for brown
    pub const BROWN_BLUE_MAX: f64 = 80.0;
}

/// Nitrite calibration pairs `(baseline, scale)` on the green channel
pub mod nitrite {
    /// Sample photographed against a yellow reference background
    pub const YELLOW_CALIBRATION: (f64, f64) = (208.23, 77.37);

    /// Sample photographed against a white reference background
    pub const WHITE_CALIBRATION: (f64, f64) = (248.63, 35.433);

    /// Subtracted from the raw estimate before clamping at zero
    pub const OFFSET: f64 = 0.1;
}

/// Upload handling limits
pub mod upload {
    /// Default maximum request body size accepted by the upload endpoint
    pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

    /// Timestamp prefix format for stored file names
    pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

    /// Stored name (after the timestamp) for camera captures; the extension
    /// is added from the decoded format
    pub const CAPTURE_NAME: &str = "capture";

    /// Stem used when a client file name has no characters that survive
    /// sanitization (e.g. a Thai-only name)
    pub const FALLBACK_NAME: &str = "upload";
}
