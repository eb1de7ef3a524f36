//! Unified error types for the image browser.

use std::fmt;

/// Application-specific errors.
#[derive(Debug)]
pub enum AppError {
    /// Error reading or writing the settings file
    Io(std::io::Error),
    /// Settings document could not be parsed
    SettingsParse(String),
    /// Error scanning directory for image files
    DirectoryScan(String),
    /// Error loading or decoding an image file
    ImageLoad(String),
    /// Requested service has no settings adapter
    UnsupportedService(String),
    /// Window layout was requested without any attached display
    NoScreens,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(err) => write!(f, "Settings I/O error: {}", err),
            AppError::SettingsParse(msg) => write!(f, "Settings parse error: {}", msg),
            AppError::DirectoryScan(msg) => write!(f, "Directory scan error: {}", msg),
            AppError::ImageLoad(msg) => write!(f, "Image load error: {}", msg),
            AppError::UnsupportedService(name) => write!(f, "Unsupported service: {}", name),
            AppError::NoScreens => write!(f, "No screens available"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::ImageLoad(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SettingsParse(err.to_string())
    }
}

/// Type alias for Results in this application.
pub type Result<T> = std::result::Result<T, AppError>;
