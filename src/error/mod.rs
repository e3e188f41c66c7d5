//! Error handling module for Vidpress

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for Vidpress operations outside the transcoding core
#[derive(Error, Debug)]
pub enum VidpressError {
    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// FFmpeg initialization error
    #[error("Failed to initialize FFmpeg: {message}")]
    FFmpegInitError { message: String },

    /// Report serialization error
    #[error("Failed to serialize report: {message}")]
    Serialization { message: String },

    /// Logging subscriber setup error
    #[error("Failed to initialize logging: {message}")]
    Logging { message: String },

    /// Transcoding core error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl VidpressError {
    pub fn config(message: impl Into<String>) -> Self {
        VidpressError::Config {
            message: message.into(),
        }
    }
}

/// Result type alias for Vidpress operations
pub type VidpressResult<T> = std::result::Result<T, VidpressError>;
