// Memory adapter - Synthetic frame sources and recording sinks

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::errors::DomainError;
use crate::domain::model::*;
use crate::engine::frame::Frame;
use crate::ports::*;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Luma value of synthetic frame `index`
pub fn synthetic_luma(index: u64) -> u8 {
    (index % 256) as u8
}

/// Source producing flat frames whose luma encodes their decode index
#[derive(Debug, Clone)]
pub struct MemoryFrameSource {
    path: String,
    properties: VideoProperties,
    available: u64,
    fail_at: Option<u64>,
    resize_at: Option<(u64, Dimensions)>,
    seeks: Arc<AtomicU64>,
    position: u64,
    closed: bool,
}

impl MemoryFrameSource {
    pub fn new(path: impl Into<String>, properties: VideoProperties) -> Self {
        Self {
            path: path.into(),
            available: properties.frame_count,
            properties,
            fail_at: None,
            resize_at: None,
            seeks: Arc::new(AtomicU64::new(0)),
            position: 0,
            closed: false,
        }
    }

    /// Stop after `frames` even if the declared count is larger
    pub fn with_available_frames(mut self, frames: u64) -> Self {
        self.available = frames;
        self
    }

    /// Fail the read of frame `index`
    pub fn failing_at(mut self, index: u64) -> Self {
        self.fail_at = Some(index);
        self
    }

    /// Produce `dimensions`-sized frames from frame `index` on, without
    /// changing the declared properties
    pub fn resized_from(mut self, index: u64, dimensions: Dimensions) -> Self {
        self.resize_at = Some((index, dimensions));
        self
    }

    /// Shared count of `seek` calls, readable after the source is boxed
    pub fn seek_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.seeks)
    }

    fn frame_size(&self, index: u64) -> Dimensions {
        match self.resize_at {
            Some((from, dimensions)) if index >= from => dimensions,
            _ => self.properties.dimensions(),
        }
    }
}

impl FrameSource for MemoryFrameSource {
    fn path(&self) -> &str {
        &self.path
    }

    fn properties(&self) -> VideoProperties {
        self.properties
    }

    fn read_next(&mut self) -> Result<Option<Frame>, DomainError> {
        if self.closed || self.position >= self.available {
            return Ok(None);
        }
        if self.fail_at == Some(self.position) {
            return Err(DomainError::Unreadable {
                path: self.path.clone(),
                message: format!("Corrupt packet at frame {}", self.position),
            });
        }

        let size = self.frame_size(self.position);
        let frame = Frame::solid(size.width, size.height, synthetic_luma(self.position));
        self.position += 1;
        Ok(Some(frame))
    }

    fn seek(&mut self, frame_index: u64) -> Result<(), DomainError> {
        self.seeks.fetch_add(1, Ordering::Relaxed);
        let last = self.properties.frame_count.saturating_sub(1);
        self.position = frame_index.min(last);
        Ok(())
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// What a `MemoryFrameSink` saw
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SinkRecord {
    pub spec: Option<OutputSpec>,
    /// Size of every written frame, in order
    pub frame_sizes: Vec<Dimensions>,
    /// Top-left luma of every written frame, in order
    pub first_luma: Vec<u8>,
    pub closed: bool,
    pub close_calls: u32,
}

/// Sink that keeps a record of written frames instead of encoding them
#[derive(Debug)]
pub struct MemoryFrameSink {
    path: String,
    spec: OutputSpec,
    record: Arc<Mutex<SinkRecord>>,
    fail_at_write: Option<u64>,
    frames_written: u64,
    closed: bool,
}

impl MemoryFrameSink {
    pub fn new(path: impl Into<String>, spec: OutputSpec) -> Self {
        let record = SinkRecord {
            spec: Some(spec),
            ..SinkRecord::default()
        };
        Self {
            path: path.into(),
            spec,
            record: Arc::new(Mutex::new(record)),
            fail_at_write: None,
            frames_written: 0,
            closed: false,
        }
    }

    /// Fail the `n`-th write (zero based)
    pub fn failing_at_write(mut self, n: u64) -> Self {
        self.fail_at_write = Some(n);
        self
    }

    /// Snapshot of everything recorded so far
    pub fn record(&self) -> SinkRecord {
        lock(&self.record).clone()
    }

    fn shared_record(&self) -> Arc<Mutex<SinkRecord>> {
        Arc::clone(&self.record)
    }
}

impl FrameSink for MemoryFrameSink {
    fn path(&self) -> &str {
        &self.path
    }

    fn spec(&self) -> OutputSpec {
        self.spec
    }

    fn write(&mut self, frame: Frame) -> Result<(), DomainError> {
        debug_assert_eq!(frame.dimensions(), self.spec.dimensions);

        if self.closed {
            return Err(DomainError::TranscodeFailure {
                output: self.path.clone(),
                frames_written: self.frames_written,
                message: "Writer already closed".to_string(),
            });
        }
        if self.fail_at_write == Some(self.frames_written) {
            return Err(DomainError::TranscodeFailure {
                output: self.path.clone(),
                frames_written: self.frames_written,
                message: "Disk full".to_string(),
            });
        }

        let mut record = lock(&self.record);
        record.frame_sizes.push(frame.dimensions());
        record.first_luma.push(frame.as_video().data(0).first().copied().unwrap_or(0));
        drop(record);

        self.frames_written += 1;
        Ok(())
    }

    fn frames_written(&self) -> u64 {
        self.frames_written
    }

    fn close(&mut self) -> Result<(), DomainError> {
        let mut record = lock(&self.record);
        record.close_calls += 1;
        record.closed = true;
        self.closed = true;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// In-memory implementation of every media port.
///
/// Sources are registered by path. Sinks opened through the backend are
/// remembered so their output can be read back as metadata.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    sources: Arc<Mutex<HashMap<String, MemoryFrameSource>>>,
    outputs: Arc<Mutex<HashMap<String, Arc<Mutex<SinkRecord>>>>>,
    failing_writes: Arc<Mutex<Option<u64>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_source(&self, source: MemoryFrameSource) {
        lock(&self.sources).insert(source.path().to_string(), source);
    }

    /// Make every sink opened from now on fail its `n`-th write
    pub fn fail_writes_at(&self, n: u64) {
        *lock(&self.failing_writes) = Some(n);
    }

    /// Record of the sink opened for `path`
    pub fn output_record(&self, path: &str) -> Option<SinkRecord> {
        lock(&self.outputs).get(path).map(|record| lock(record).clone())
    }
}

impl DecodePort for MemoryBackend {
    fn open_source(&self, path: &str) -> Result<Box<dyn FrameSource>, DomainError> {
        let source = lock(&self.sources)
            .get(path)
            .cloned()
            .ok_or_else(|| DomainError::NotFound {
                path: path.to_string(),
            })?;
        Ok(Box::new(source))
    }
}

impl EncodePort for MemoryBackend {
    fn open_sink(&self, path: &str, spec: &OutputSpec) -> Result<Box<dyn FrameSink>, DomainError> {
        let mut sink = MemoryFrameSink::new(path, *spec);
        if let Some(n) = *lock(&self.failing_writes) {
            sink = sink.failing_at_write(n);
        }
        lock(&self.outputs).insert(path.to_string(), sink.shared_record());
        Ok(Box::new(sink))
    }
}

impl MetadataPort for MemoryBackend {
    fn read_metadata(&self, path: &str) -> Result<VideoMetadata, DomainError> {
        if let Some(source) = lock(&self.sources).get(path) {
            let properties = source.properties();
            let size = u64::from(properties.width) * u64::from(properties.height) * properties.frame_count;
            return Ok(VideoMetadata::new(path, properties, size));
        }

        let record = self.output_record(path).ok_or_else(|| DomainError::NotFound {
            path: path.to_string(),
        })?;
        let spec = record.spec.ok_or_else(|| DomainError::Unreadable {
            path: path.to_string(),
            message: "Output was never opened".to_string(),
        })?;
        let frames = record.frame_sizes.len() as u64;
        let properties = VideoProperties::new(
            spec.frame_rate,
            frames,
            spec.dimensions.width,
            spec.dimensions.height,
        );
        let size = u64::from(spec.dimensions.width) * u64::from(spec.dimensions.height) * frames;
        Ok(VideoMetadata::new(path, properties, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn properties(frames: u64) -> VideoProperties {
        VideoProperties::new(30.0, frames, 8, 8)
    }

    #[test]
    fn test_source_reads_then_ends() {
        let mut source = MemoryFrameSource::new("a.mp4", properties(3));
        for index in 0..3 {
            let frame = source.read_next().unwrap().unwrap();
            assert_eq!(frame.as_video().data(0)[0], synthetic_luma(index));
        }
        assert!(source.read_next().unwrap().is_none());
    }

    #[test]
    fn test_source_seek_clamps() {
        let mut source = MemoryFrameSource::new("a.mp4", properties(5));
        source.seek(99).unwrap();
        assert_eq!(source.position(), 4);
        source.seek(0).unwrap();
        assert_eq!(source.position(), 0);
    }

    #[test]
    fn test_closed_source_yields_nothing() {
        let mut source = MemoryFrameSource::new("a.mp4", properties(5));
        source.close();
        source.close();
        assert!(source.is_closed());
        assert!(source.read_next().unwrap().is_none());
    }

    #[test]
    fn test_backend_unknown_source_is_not_found() {
        let backend = MemoryBackend::new();
        let err = backend.open_source("missing.mp4").err().unwrap();
        assert_eq!(err.kind(), "not_found");
    }
}
