//! Error types for the urine_colorscan library

use thiserror::Error;

/// Result type alias for urine_colorscan operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Error kinds for upload handling and color analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The request carried neither a file field nor a camera capture
    #[error("No image was provided")]
    NoFileProvided,

    /// The uploaded file name was empty after sanitization
    #[error("Uploaded file name is empty")]
    EmptyFilename,

    /// Image bytes could not be decoded
    #[error("Failed to decode image: {message}")]
    DecodeError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The region of interest would have zero area
    #[error("Image {width}x{height} too small for a {window}px sampling window")]
    ImageTooSmall { width: u32, height: u32, window: u32 },

    /// Reading or writing the upload directory failed
    #[error("Storage error: {message}")]
    StorageError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A stored file was requested that does not exist
    #[error("File not found: {name}")]
    NotFound { name: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// The HTTP server could not bind or stopped unexpectedly
    #[error("Server error: {message}")]
    ServerError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AnalysisError {
    /// Create a decode error with context
    pub fn decode<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::DecodeError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a storage error with context
    pub fn storage<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::StorageError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn invalid_parameter(parameter: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
        }
    }

    /// Check if the user can fix this condition by resubmitting
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::NoFileProvided
                | AnalysisError::EmptyFilename
                | AnalysisError::DecodeError { .. }
                | AnalysisError::ImageTooSmall { .. }
                | AnalysisError::InvalidParameter { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::NoFileProvided => {
                "No image was submitted. Please choose a file or take a photo.".to_string()
            }
            AnalysisError::EmptyFilename => {
                "The selected file has no usable name. Please rename it and try again.".to_string()
            }
            AnalysisError::DecodeError { .. } => {
                "Could not read the image. Please upload a JPEG, PNG, GIF, BMP, TIFF or WebP file."
                    .to_string()
            }
            AnalysisError::ImageTooSmall { width, height, .. } => {
                format!(
                    "The image ({}x{}) is too small to analyze. Please use a larger photo.",
                    width, height
                )
            }
            AnalysisError::NotFound { name } => format!("No stored image named '{}'.", name),
            AnalysisError::InvalidParameter { parameter, value } => {
                format!("Invalid value '{}' for {}.", value, parameter)
            }
            AnalysisError::StorageError { .. }
            | AnalysisError::ConfigError { .. }
            | AnalysisError::ServerError { .. } => {
                "The server could not process the image. Please try again later.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad header");
        let err = AnalysisError::decode("upload.png", io);
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "Failed to decode image: upload.png");
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(AnalysisError::NoFileProvided.is_recoverable());
        assert!(AnalysisError::ImageTooSmall { width: 0, height: 0, window: 150 }.is_recoverable());
        assert!(!AnalysisError::NotFound { name: "x.png".into() }.is_recoverable());
        let storage = AnalysisError::storage(
            "write failed",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!storage.is_recoverable());
    }

    #[test]
    fn test_user_message_mentions_dimensions() {
        let err = AnalysisError::ImageTooSmall { width: 4, height: 0, window: 80 };
        assert!(err.user_message().contains("4x0"));
    }
}
