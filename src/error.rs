//! # Error Types
//!
//! This module defines error types used throughout the placard library.

use thiserror::Error;

/// Main error type for poster generation
#[derive(Debug, Error)]
pub enum PosterError {
    /// The required font family is not installed or loaded
    #[error("Font family '{0}' is not available")]
    FontUnavailable(String),

    /// Null, zero-sized or unplaceable raster input
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Font data could not be parsed
    #[error("Font error: {0}")]
    Font(String),

    /// Image acquisition error (download, decode, missing file)
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Output encoding error
    #[error("Encode error: {0}")]
    Encode(String),

    /// Configuration or manifest error
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
