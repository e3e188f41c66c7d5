// Domain errors - Error taxonomy exposed by the transcoding core

use thiserror::Error;

/// Domain-specific error types
///
/// Callers may render every variant as a single message, but each kind is
/// kept distinct so that they can be told apart programmatically.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Path does not exist
    #[error("File not found: {path}")]
    NotFound { path: String },

    /// Decoder could not open the file (corrupt input, unsupported codec)
    #[error("Cannot read video {path}: {message}")]
    Unreadable { path: String, message: String },

    /// Encoder/container could not be initialised for the output path
    #[error("Cannot open video writer for {path}: {message}")]
    WriterUnavailable { path: String, message: String },

    /// Request parameter outside its accepted range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Failure inside the read/transform/write loop
    #[error("Transcode of {output} failed after {frames_written} frames: {message}")]
    TranscodeFailure {
        output: String,
        frames_written: u64,
        message: String,
    },
}

impl DomainError {
    /// Short machine-friendly name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::NotFound { .. } => "not_found",
            DomainError::Unreadable { .. } => "unreadable",
            DomainError::WriterUnavailable { .. } => "writer_unavailable",
            DomainError::InvalidParameter(_) => "invalid_parameter",
            DomainError::TranscodeFailure { .. } => "transcode_failure",
        }
    }
}
