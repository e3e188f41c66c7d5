// Adapters - External system implementations

pub mod libav_sink;
pub mod libav_source;
pub mod memory;
pub mod probe_libav;
pub mod toml_config;

// Re-export adapters
pub use libav_sink::LibavFrameSink;
pub use libav_source::LibavFrameSource;
pub use memory::MemoryBackend;
pub use probe_libav::ProbeLibavAdapter;
pub use toml_config::VidpressConfig;

use crate::domain::errors::DomainError;
use crate::domain::model::{OutputSpec, VideoMetadata};
use crate::ports::{DecodePort, EncodePort, FrameSink, FrameSource, MetadataPort};

/// libav implementation of every media port
#[derive(Debug, Clone)]
pub struct LibavBackend {
    fourcc: String,
    probe: ProbeLibavAdapter,
}

impl LibavBackend {
    /// Backend encoding with the codec named by `fourcc`
    pub fn new(fourcc: impl Into<String>) -> Self {
        Self {
            fourcc: fourcc.into(),
            probe: ProbeLibavAdapter::new(),
        }
    }

    pub fn fourcc(&self) -> &str {
        &self.fourcc
    }
}

impl Default for LibavBackend {
    fn default() -> Self {
        Self::new(libav_sink::DEFAULT_FOURCC)
    }
}

impl DecodePort for LibavBackend {
    fn open_source(&self, path: &str) -> Result<Box<dyn FrameSource>, DomainError> {
        Ok(Box::new(LibavFrameSource::open(path)?))
    }
}

impl EncodePort for LibavBackend {
    fn open_sink(&self, path: &str, spec: &OutputSpec) -> Result<Box<dyn FrameSink>, DomainError> {
        Ok(Box::new(LibavFrameSink::open(path, spec, &self.fourcc)?))
    }
}

impl MetadataPort for LibavBackend {
    fn read_metadata(&self, path: &str) -> Result<VideoMetadata, DomainError> {
        self.probe.read_metadata(path)
    }
}
