//! Vidpress Video Compressor Library
//!
//! Batch video transcoding with three size-reduction policies: temporal
//! frame skipping, area-averaged downscaling, or both. A single-threaded
//! read, transform, write loop re-encodes the kept frames at the frame rate
//! that preserves the source duration.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod output;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{CompressionMethod, CompressionRequest, PipelineResult, VideoMetadata, VideoProperties};
pub use domain::rules::TransformPolicy;
pub use engine::pipeline::TranscodePipeline;
pub use error::{VidpressError, VidpressResult};

/// Initialize the media libraries. Safe to call more than once.
pub fn init() -> VidpressResult<()> {
    ffmpeg_next::init().map_err(|e| VidpressError::FFmpegInitError {
        message: e.to_string(),
    })?;

    Ok(())
}
