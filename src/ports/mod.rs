// Ports - Interface definitions (contracts)

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::frame::Frame;

/// Sequential/random-access reader over one decoded video stream.
///
/// Each instance owns its own cursor. Two sources opened on the same path
/// never share read position.
pub trait FrameSource {
    /// Path the source was opened from
    fn path(&self) -> &str;

    /// Properties captured when the source was opened
    fn properties(&self) -> VideoProperties;

    /// Next frame in decode order, `None` at end of stream
    fn read_next(&mut self) -> Result<Option<Frame>, DomainError>;

    /// Move the cursor to `frame_index`, clamped to `[0, frame_count - 1]`
    fn seek(&mut self, frame_index: u64) -> Result<(), DomainError>;

    /// Index of the frame `read_next` will return
    fn position(&self) -> u64;

    /// Release the decoder. Calling it again is a no-op.
    fn close(&mut self);

    fn is_closed(&self) -> bool;
}

/// Writer producing one encoded container file
pub trait FrameSink {
    /// Path of the file being written
    fn path(&self) -> &str;

    /// Frame rate and size declared at open time
    fn spec(&self) -> OutputSpec;

    /// Append one frame. Its size must equal `spec().dimensions`.
    fn write(&mut self, frame: Frame) -> Result<(), DomainError>;

    fn frames_written(&self) -> u64;

    /// Flush and release the stream. Calling it again is a no-op.
    fn close(&mut self) -> Result<(), DomainError>;

    fn is_closed(&self) -> bool;
}

/// Port for opening frame sources
pub trait DecodePort: Send + Sync {
    /// Open `path` for reading; `NotFound` or `Unreadable` on failure
    fn open_source(&self, path: &str) -> Result<Box<dyn FrameSource>, DomainError>;
}

/// Port for opening encoding sinks
pub trait EncodePort: Send + Sync {
    /// Open `path` for writing; `WriterUnavailable` on failure
    fn open_sink(&self, path: &str, spec: &OutputSpec) -> Result<Box<dyn FrameSink>, DomainError>;
}

/// Port for reading the properties of an encoded file
pub trait MetadataPort: Send + Sync {
    fn read_metadata(&self, path: &str) -> Result<VideoMetadata, DomainError>;
}
