// Domain models - Core types and data structures

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Frame dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Scale both axes by `percent`, flooring each result.
    ///
    /// A result may contain a zero axis; callers decide whether that is
    /// acceptable.
    pub fn scaled(&self, percent: u32) -> Self {
        let scale = |value: u32| (u64::from(value) * u64::from(percent) / 100) as u32;
        Self {
            width: scale(self.width),
            height: scale(self.height),
        }
    }

    /// True when either axis is zero
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Immutable snapshot of a video's properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoProperties {
    /// Frames per second
    pub frame_rate: f64,
    /// Declared number of frames
    pub frame_count: u64,
    pub width: u32,
    pub height: u32,
    /// `frame_count / frame_rate`, or 0 when the frame rate is not positive
    pub duration_seconds: f64,
}

impl VideoProperties {
    /// Create a snapshot, deriving the duration.
    ///
    /// Never fails: a zero or non-finite frame rate yields a zero duration.
    pub fn new(frame_rate: f64, frame_count: u64, width: u32, height: u32) -> Self {
        let frame_rate = if frame_rate.is_finite() { frame_rate } else { 0.0 };
        let duration_seconds = if frame_rate > 0.0 {
            frame_count as f64 / frame_rate
        } else {
            0.0
        };

        Self {
            frame_rate,
            frame_count,
            width,
            height,
            duration_seconds,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Duration of one frame in seconds, 0 when the frame rate is unknown
    pub fn frame_duration(&self) -> f64 {
        if self.frame_rate > 0.0 {
            1.0 / self.frame_rate
        } else {
            0.0
        }
    }
}

/// Properties of an encoded file plus its size on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub path: String,
    #[serde(flatten)]
    pub properties: VideoProperties,
    pub file_size_bytes: u64,
}

impl VideoMetadata {
    pub fn new(path: impl Into<String>, properties: VideoProperties, file_size_bytes: u64) -> Self {
        Self {
            path: path.into(),
            properties,
            file_size_bytes,
        }
    }

    /// File size in mebibytes
    pub fn file_size_mb(&self) -> f64 {
        self.file_size_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Size-reduction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMethod {
    /// Temporal subsampling
    FrameSkip,
    /// Spatial subsampling
    Resolution,
    /// Temporal then spatial subsampling
    Combined,
}

impl CompressionMethod {
    /// Parse method name
    pub fn parse(method: &str) -> Result<Self, DomainError> {
        match method.trim().to_lowercase().as_str() {
            "frameskip" | "frame-skip" | "frame_skip" => Ok(CompressionMethod::FrameSkip),
            "resolution" => Ok(CompressionMethod::Resolution),
            "combined" => Ok(CompressionMethod::Combined),
            other => Err(DomainError::InvalidParameter(format!(
                "Unknown compression method: {}. Valid methods: frameskip, resolution, combined",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionMethod::FrameSkip => "frameskip",
            CompressionMethod::Resolution => "resolution",
            CompressionMethod::Combined => "combined",
        }
    }

    /// Whether `skip_rate` is load-bearing for this method
    pub fn uses_skip_rate(&self) -> bool {
        matches!(self, CompressionMethod::FrameSkip | CompressionMethod::Combined)
    }

    /// Whether `scale_percent` is load-bearing for this method
    pub fn uses_scale_percent(&self) -> bool {
        matches!(self, CompressionMethod::Resolution | CompressionMethod::Combined)
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input contract for a compression run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionRequest {
    pub method: CompressionMethod,
    /// Keep one frame out of every `skip_rate`
    pub skip_rate: u32,
    /// Output size as a percentage of the source size
    pub scale_percent: u32,
}

impl CompressionRequest {
    pub fn new(method: CompressionMethod, skip_rate: u32, scale_percent: u32) -> Self {
        Self {
            method,
            skip_rate,
            scale_percent,
        }
    }

    pub fn frame_skip(skip_rate: u32) -> Self {
        Self::new(CompressionMethod::FrameSkip, skip_rate, 100)
    }

    pub fn resolution(scale_percent: u32) -> Self {
        Self::new(CompressionMethod::Resolution, 1, scale_percent)
    }

    pub fn combined(skip_rate: u32, scale_percent: u32) -> Self {
        Self::new(CompressionMethod::Combined, skip_rate, scale_percent)
    }
}

impl Default for CompressionRequest {
    fn default() -> Self {
        Self::combined(2, 50)
    }
}

/// Frame rate and size an encoding sink is opened with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub frame_rate: f64,
    pub dimensions: Dimensions,
}

/// Output contract of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub output_path: String,
    /// Frames pulled from the source, dropped ones included
    pub frames_decoded: u64,
    pub frames_written: u64,
    pub success: bool,
}
