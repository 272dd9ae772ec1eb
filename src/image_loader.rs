//! Image decoding from uploaded bytes or files on disk
//!
//! Every decoded image is converted to 8-bit RGB so that downstream code
//! only ever sees one channel order. Formats are recognized from the byte
//! signature; the file extension is only used to pick a content type when
//! serving stored files back.
//!
//! ## Supported Formats
//!
//! JPEG, PNG, GIF (first frame), WebP, TIFF, BMP

use crate::error::{AnalysisError, Result};
use image::{ImageFormat, ImageReader, RgbImage};
use std::io::Cursor;
use std::path::Path;

/// Decode raw image bytes into an RGB pixel grid
///
/// # Errors
///
/// Returns `AnalysisError::DecodeError` if:
/// - The byte stream is empty
/// - The format is not recognized or not supported
/// - The data is corrupt
/// - The decoded image has no pixels
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage> {
    if bytes.is_empty() {
        return Err(AnalysisError::DecodeError {
            message: "empty byte stream".to_string(),
            source: None,
        });
    }

    let format = image::guess_format(bytes)
        .map_err(|e| AnalysisError::decode("unrecognized image format", e))?;
    if !is_supported_format(format) {
        return Err(AnalysisError::DecodeError {
            message: format!("unsupported image format {:?}", format),
            source: None,
        });
    }

    let img = ImageReader::with_format(Cursor::new(bytes), format)
        .decode()
        .map_err(|e| AnalysisError::decode(format!("corrupt {:?} data", format), e))?;

    let rgb = img.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(AnalysisError::DecodeError {
            message: format!("image has no pixels ({}x{})", rgb.width(), rgb.height()),
            source: None,
        });
    }

    Ok(rgb)
}

/// Load and decode an image file from disk
///
/// # Example
///
/// ```rust,no_run
/// use urine_colorscan::image_loader::load_image;
/// use std::path::Path;
///
/// let img = load_image(Path::new("sample.jpg"))?;
/// println!("Loaded image: {}x{}", img.width(), img.height());
/// # Ok::<(), urine_colorscan::AnalysisError>(())
/// ```
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| AnalysisError::storage(format!("Failed to read {}", path.display()), e))?;
    decode_image(&bytes)
}

fn is_supported_format(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Jpeg
            | ImageFormat::Png
            | ImageFormat::Gif
            | ImageFormat::WebP
            | ImageFormat::Tiff
            | ImageFormat::Bmp
    )
}

/// MIME type for a stored file, judged by its extension
pub fn content_type_for(path: &Path) -> &'static str {
    match ImageFormat::from_path(path) {
        Ok(format) if is_supported_format(format) => format.to_mime_type(),
        _ => "application/octet-stream",
    }
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["jpg", "jpeg", "png", "gif", "webp", "tiff", "tif", "bmp"]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}
