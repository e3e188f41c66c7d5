//! Frame source backed by libavformat/libavcodec

use std::path::Path;

use ffmpeg_next::codec;
use ffmpeg_next::format;
use ffmpeg_next::media;
use ffmpeg_next::util::frame::video::Video;
use ffmpeg_next::Packet;
use tracing::{debug, trace};

use crate::adapters::probe_libav::{estimate_frame_count, stream_frame_rate};
use crate::domain::errors::DomainError;
use crate::domain::model::VideoProperties;
use crate::engine::frame::Frame;
use crate::ports::FrameSource;

/// Open demuxer plus decoder for the best video stream
struct DecodeState {
    input: format::context::Input,
    decoder: codec::decoder::Video,
    stream_index: usize,
    eof_sent: bool,
}

impl DecodeState {
    fn open(path: &str) -> Result<Self, DomainError> {
        let input = format::input(&path).map_err(|e| unreadable(path, e))?;

        let (stream_index, parameters) = {
            let stream = input
                .streams()
                .best(media::Type::Video)
                .ok_or_else(|| DomainError::Unreadable {
                    path: path.to_string(),
                    message: "No video stream found".to_string(),
                })?;
            (stream.index(), stream.parameters())
        };

        let decoder = codec::context::Context::from_parameters(parameters)
            .map_err(|e| unreadable(path, e))?
            .decoder()
            .video()
            .map_err(|e| unreadable(path, e))?;

        Ok(Self {
            input,
            decoder,
            stream_index,
            eof_sent: false,
        })
    }

    /// Next decoded frame, `None` once the decoder is fully drained
    fn decode_next(&mut self) -> Result<Option<Video>, ffmpeg_next::Error> {
        loop {
            let mut decoded = Video::empty();
            match self.decoder.receive_frame(&mut decoded) {
                Ok(()) => return Ok(Some(decoded)),
                Err(ffmpeg_next::Error::Eof) => return Ok(None),
                Err(ffmpeg_next::Error::Other { errno }) if errno == ffmpeg_next::error::EAGAIN => {}
                Err(e) => return Err(e),
            }

            if self.eof_sent {
                return Ok(None);
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.input) {
                Ok(()) => {
                    if packet.stream() == self.stream_index {
                        self.decoder.send_packet(&packet)?;
                    }
                }
                Err(ffmpeg_next::Error::Eof) => {
                    self.decoder.send_eof()?;
                    self.eof_sent = true;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn unreadable(path: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::Unreadable {
        path: path.to_string(),
        message: e.to_string(),
    }
}

/// Sequential reader over the best video stream of a file.
///
/// Seeking is frame exact: a backward seek reopens the file and decodes
/// forward to the requested index, a forward seek decodes and discards.
pub struct LibavFrameSource {
    path: String,
    state: Option<DecodeState>,
    properties: VideoProperties,
    position: u64,
}

impl LibavFrameSource {
    /// Open `path`, failing with `NotFound` or `Unreadable`
    pub fn open(path: &str) -> Result<Self, DomainError> {
        if !Path::new(path).exists() {
            return Err(DomainError::NotFound {
                path: path.to_string(),
            });
        }

        let state = DecodeState::open(path)?;
        let properties = {
            let stream = state
                .input
                .stream(state.stream_index)
                .ok_or_else(|| unreadable(path, "Video stream not accessible"))?;
            let frame_rate = stream_frame_rate(&stream);
            let frame_count = estimate_frame_count(&state.input, &stream, frame_rate);
            VideoProperties::new(
                frame_rate,
                frame_count,
                state.decoder.width(),
                state.decoder.height(),
            )
        };

        debug!(
            "Opened {}: {}x{} @ {:.3} fps, {} frames",
            path, properties.width, properties.height, properties.frame_rate, properties.frame_count
        );

        Ok(Self {
            path: path.to_string(),
            state: Some(state),
            properties,
            position: 0,
        })
    }

    fn decode_error(&self, e: impl std::fmt::Display) -> DomainError {
        DomainError::Unreadable {
            path: self.path.clone(),
            message: format!("Decode failed at frame {}: {}", self.position, e),
        }
    }

    fn rewind(&mut self) -> Result<(), DomainError> {
        trace!("Rewinding {}", self.path);
        self.state = Some(DecodeState::open(&self.path)?);
        self.position = 0;
        Ok(())
    }

    fn skip_frames(&mut self, count: u64) -> Result<(), DomainError> {
        for _ in 0..count {
            if self.read_next()?.is_none() {
                break;
            }
        }
        Ok(())
    }
}

impl FrameSource for LibavFrameSource {
    fn path(&self) -> &str {
        &self.path
    }

    fn properties(&self) -> VideoProperties {
        self.properties
    }

    fn read_next(&mut self) -> Result<Option<Frame>, DomainError> {
        let decoded = match self.state.as_mut() {
            Some(state) => state.decode_next(),
            None => return Ok(None),
        };

        match decoded {
            Ok(Some(video)) => {
                self.position += 1;
                Ok(Some(Frame::from(video)))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(self.decode_error(e)),
        }
    }

    fn seek(&mut self, frame_index: u64) -> Result<(), DomainError> {
        if self.state.is_none() {
            return Ok(());
        }

        let last = self.properties.frame_count.saturating_sub(1);
        let target = frame_index.min(last);

        if target < self.position {
            self.rewind()?;
        }
        self.skip_frames(target - self.position)
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn close(&mut self) {
        if self.state.take().is_some() {
            debug!("Released decoder for {}", self.path);
        }
    }

    fn is_closed(&self) -> bool {
        self.state.is_none()
    }
}
