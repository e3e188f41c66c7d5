//! Report rendering and output verification module

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::model::VideoMetadata;
use crate::error::{VidpressError, VidpressResult};

pub mod verifier;

pub use verifier::FidelityVerifier;

/// How reports are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl ReportFormat {
    pub fn parse(value: &str) -> VidpressResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            other => Err(VidpressError::config(format!(
                "Unknown report format '{}' (expected text, json or yaml)",
                other
            ))),
        }
    }
}

/// Render any serializable report as JSON or YAML
pub fn serialize_report<T: Serialize>(report: &T, format: ReportFormat) -> VidpressResult<String> {
    let rendered = match format {
        ReportFormat::Json => serde_json::to_string_pretty(report).map_err(|e| e.to_string()),
        ReportFormat::Yaml => serde_yaml::to_string(report).map_err(|e| e.to_string()),
        ReportFormat::Text => {
            return Err(VidpressError::Serialization {
                message: "Text reports are rendered by their own Display impl".to_string(),
            })
        }
    };
    rendered.map_err(|message| VidpressError::Serialization { message })
}

/// Human-readable view of a file's properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataSummary {
    pub path: String,
    /// Size in mebibytes, two decimals
    pub file_size_mb: String,
    /// `W x H`
    pub resolution: String,
    /// Frames per second, two decimals
    pub frame_rate: String,
    pub frame_count: u64,
    /// Seconds, two decimals
    pub duration_seconds: String,
}

impl MetadataSummary {
    pub fn from_metadata(metadata: &VideoMetadata) -> Self {
        let properties = &metadata.properties;
        Self {
            path: metadata.path.clone(),
            file_size_mb: format!("{:.2}", metadata.file_size_mb()),
            resolution: format!("{} x {}", properties.width, properties.height),
            frame_rate: format!("{:.2}", properties.frame_rate),
            frame_count: properties.frame_count,
            duration_seconds: format!("{:.2}", properties.duration_seconds),
        }
    }
}

impl fmt::Display for MetadataSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File:       {}", self.path)?;
        writeln!(f, "Size:       {} MB", self.file_size_mb)?;
        writeln!(f, "Resolution: {}", self.resolution)?;
        writeln!(f, "Frame rate: {} fps", self.frame_rate)?;
        writeln!(f, "Frames:     {}", self.frame_count)?;
        write!(f, "Duration:   {} s", self.duration_seconds)
    }
}

/// Output verification result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Every check passed
    pub success: bool,
    /// Individual verification checks
    pub checks: Vec<VerificationCheck>,
}

/// Individual verification check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationCheck {
    /// Type of check
    pub check_type: String,
    pub expected: String,
    pub actual: String,
    /// Check passed
    pub success: bool,
}

impl VerificationResult {
    pub fn failed_checks(&self) -> impl Iterator<Item = &VerificationCheck> {
        self.checks.iter().filter(|check| !check.success)
    }
}
