// Inspect interactor - Orchestrates media file inspection use case

use std::sync::Arc;

use tracing::info;

use crate::domain::model::*;
use crate::error::VidpressResult;
use crate::output::{serialize_report, MetadataSummary, ReportFormat};
use crate::ports::*;

/// Interactor for media file inspection use case
pub struct InspectInteractor {
    metadata_port: Arc<dyn MetadataPort>,
}

impl InspectInteractor {
    /// Create new inspect interactor with injected ports
    pub fn new(metadata_port: Arc<dyn MetadataPort>) -> Self {
        Self { metadata_port }
    }

    /// Read the properties of `input_file`
    pub fn inspect(&self, input_file: &str) -> VidpressResult<VideoMetadata> {
        info!("Inspecting {}", input_file);
        Ok(self.metadata_port.read_metadata(input_file)?)
    }

    /// Read and render the properties of `input_file`
    pub fn execute(&self, input_file: &str, format: ReportFormat) -> VidpressResult<String> {
        let metadata = self.inspect(input_file)?;
        match format {
            ReportFormat::Text => Ok(MetadataSummary::from_metadata(&metadata).to_string()),
            ReportFormat::Json | ReportFormat::Yaml => serialize_report(&metadata, format),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{MemoryBackend, MemoryFrameSource};
    use crate::domain::errors::DomainError;
    use crate::error::VidpressError;

    fn interactor() -> InspectInteractor {
        let backend = MemoryBackend::new();
        backend.register_source(MemoryFrameSource::new(
            "talk.mp4",
            VideoProperties::new(25.0, 250, 1280, 720),
        ));
        InspectInteractor::new(Arc::new(backend))
    }

    #[test]
    fn test_text_summary() {
        let text = interactor().execute("talk.mp4", ReportFormat::Text).unwrap();
        assert!(text.contains("1280 x 720"));
        assert!(text.contains("25.00 fps"));
        assert!(text.contains("10.00 s"));
    }

    #[test]
    fn test_json_uses_flat_properties() {
        let json = interactor().execute("talk.mp4", ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["path"], "talk.mp4");
        assert_eq!(value["width"], 1280);
        assert_eq!(value["frame_count"], 250);
    }

    #[test]
    fn test_yaml_output() {
        let yaml = interactor().execute("talk.mp4", ReportFormat::Yaml).unwrap();
        assert!(yaml.contains("height: 720"));
    }

    #[test]
    fn test_unknown_file_is_not_found() {
        let err = interactor().inspect("other.mp4").unwrap_err();
        assert!(matches!(
            err,
            VidpressError::Domain(DomainError::NotFound { .. })
        ));
    }
}
