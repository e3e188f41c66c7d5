// Probe LibAV adapter - Reads video properties of encoded files using libav

use std::path::Path;

use ffmpeg_next::format;
use ffmpeg_next::media;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Frames per second of `stream`, 0 when the container does not say
pub fn stream_frame_rate(stream: &format::stream::Stream) -> f64 {
    for rate in [stream.avg_frame_rate(), stream.rate()] {
        if rate.numerator() > 0 && rate.denominator() > 0 {
            return f64::from(rate);
        }
    }
    0.0
}

/// Total frame count of `stream`.
///
/// Uses the container's count when present, otherwise derives it from the
/// stream (or container) duration and `frame_rate`.
pub fn estimate_frame_count(
    input: &format::context::Input,
    stream: &format::stream::Stream,
    frame_rate: f64,
) -> u64 {
    if stream.frames() > 0 {
        return stream.frames() as u64;
    }
    if frame_rate <= 0.0 {
        return 0;
    }

    let time_base = stream.time_base();
    let seconds = if stream.duration() > 0 && time_base.denominator() > 0 {
        stream.duration() as f64 * f64::from(time_base)
    } else if input.duration() > 0 {
        input.duration() as f64 / ffmpeg_next::ffi::AV_TIME_BASE as f64
    } else {
        0.0
    };

    (seconds * frame_rate).round() as u64
}

/// LibAV-based metadata reader
#[derive(Debug, Default, Clone)]
pub struct ProbeLibavAdapter;

impl ProbeLibavAdapter {
    pub fn new() -> Self {
        Self
    }

    fn unreadable(file_path: &str, message: impl std::fmt::Display) -> DomainError {
        DomainError::Unreadable {
            path: file_path.to_string(),
            message: message.to_string(),
        }
    }

    fn read_properties(file_path: &str) -> Result<VideoProperties, DomainError> {
        let input = format::input(&file_path).map_err(|e| Self::unreadable(file_path, e))?;
        let stream = input
            .streams()
            .best(media::Type::Video)
            .ok_or_else(|| Self::unreadable(file_path, "No video stream found"))?;

        let decoder = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
            .map_err(|e| Self::unreadable(file_path, e))?
            .decoder()
            .video()
            .map_err(|e| Self::unreadable(file_path, e))?;

        let frame_rate = stream_frame_rate(&stream);
        let frame_count = estimate_frame_count(&input, &stream, frame_rate);

        Ok(VideoProperties::new(
            frame_rate,
            frame_count,
            decoder.width(),
            decoder.height(),
        ))
    }
}

impl MetadataPort for ProbeLibavAdapter {
    fn read_metadata(&self, file_path: &str) -> Result<VideoMetadata, DomainError> {
        if !Path::new(file_path).exists() {
            return Err(DomainError::NotFound {
                path: file_path.to_string(),
            });
        }

        let file_size = std::fs::metadata(file_path)
            .map_err(|e| Self::unreadable(file_path, format!("Failed to get file metadata: {}", e)))?
            .len();

        let properties = Self::read_properties(file_path)?;
        debug!(
            "Probed {}: {} @ {:.2} fps, {} frames, {} bytes",
            file_path,
            properties.dimensions(),
            properties.frame_rate,
            properties.frame_count,
            file_size
        );

        Ok(VideoMetadata::new(file_path, properties, file_size))
    }
}
