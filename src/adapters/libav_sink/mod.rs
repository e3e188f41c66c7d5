//! Encoding sink writing MPEG-4 files through libavcodec/libavformat

use ffmpeg_next::codec::{self, Id};
use ffmpeg_next::format::{self, Pixel};
use ffmpeg_next::software::scaling::{Context as ScalingContext, Flags as ScalingFlags};
use ffmpeg_next::util::frame::video::Video;
use ffmpeg_next::{Packet, Rational};
use tracing::{debug, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::OutputSpec;
use crate::engine::frame::Frame;
use crate::ports::FrameSink;

/// Container the sink always writes
pub const CONTAINER_FORMAT: &str = "mp4";

/// Default codec identifier (MPEG-4 Part 2)
pub const DEFAULT_FOURCC: &str = "mp4v";

// MPEG-4 Part 2 rejects time bases with either term above 16 bits. The time
// base is the inverted frame rate, so both terms of the rate are bounded.
const MAX_RATE_TERM: i32 = 65535;

/// Map a four-character codec identifier to a libav encoder id
pub fn codec_for_fourcc(fourcc: &str) -> Option<Id> {
    match fourcc.to_ascii_lowercase().as_str() {
        "mp4v" => Some(Id::MPEG4),
        "avc1" => Some(Id::H264),
        _ => None,
    }
}

/// Frame rate as a rational the encoder accepts.
///
/// Container rates such as 120000/1001 or 1800000/60059 are approximated by
/// the closest fraction whose numerator and denominator both fit 16 bits.
pub fn frame_rate_rational(frame_rate: f64) -> Rational {
    // SAFETY: av_d2q is a pure arithmetic function with no pointer arguments.
    let bounded = unsafe { ffmpeg_next::ffi::av_d2q(frame_rate, MAX_RATE_TERM) };
    Rational::from(bounded)
}

struct EncodeState {
    output: format::context::Output,
    encoder: codec::encoder::video::Encoder,
    converter: Option<(Pixel, ScalingContext)>,
    encoder_time_base: Rational,
    stream_time_base: Rational,
    stream_index: usize,
}

impl EncodeState {
    fn send(&mut self, frame: Option<&Video>) -> Result<(), ffmpeg_next::Error> {
        match frame {
            Some(frame) => self.encoder.send_frame(frame)?,
            None => self.encoder.send_eof()?,
        }
        self.drain()
    }

    fn drain(&mut self) -> Result<(), ffmpeg_next::Error> {
        let mut packet = Packet::empty();
        loop {
            match self.encoder.receive_packet(&mut packet) {
                Ok(()) => {
                    packet.set_stream(self.stream_index);
                    packet.rescale_ts(self.encoder_time_base, self.stream_time_base);
                    packet.write_interleaved(&mut self.output)?;
                }
                Err(ffmpeg_next::Error::Eof) => return Ok(()),
                Err(ffmpeg_next::Error::Other { errno }) if errno == ffmpeg_next::error::EAGAIN => {
                    return Ok(())
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Convert to the encoder's pixel format when the decoder produced
    /// something else
    fn convert_for_encoder(&mut self, video: Video) -> Result<Video, ffmpeg_next::Error> {
        if video.format() == Pixel::YUV420P {
            return Ok(video);
        }

        let stale = !matches!(&self.converter, Some((format, _)) if *format == video.format());
        if stale {
            let context = ScalingContext::get(
                video.format(),
                video.width(),
                video.height(),
                Pixel::YUV420P,
                video.width(),
                video.height(),
                ScalingFlags::AREA,
            )?;
            self.converter = Some((video.format(), context));
        }

        let mut converted = Video::empty();
        match self.converter.as_mut() {
            Some((_, context)) => context.run(&video, &mut converted)?,
            None => return Err(ffmpeg_next::Error::Bug),
        }
        Ok(converted)
    }
}

/// Constant frame rate writer for one output file.
///
/// Frame `n` is stamped `n / frame_rate` seconds regardless of the source
/// timestamps.
pub struct LibavFrameSink {
    path: String,
    spec: OutputSpec,
    state: Option<EncodeState>,
    frames_written: u64,
}

impl LibavFrameSink {
    /// Open `path` for writing, failing with `WriterUnavailable`
    pub fn open(path: &str, spec: &OutputSpec, fourcc: &str) -> Result<Self, DomainError> {
        let writer_unavailable = |message: String| DomainError::WriterUnavailable {
            path: path.to_string(),
            message,
        };

        let codec_id = codec_for_fourcc(fourcc)
            .ok_or_else(|| writer_unavailable(format!("Unsupported codec identifier: {}", fourcc)))?;

        if spec.dimensions.is_degenerate() || spec.frame_rate.is_nan() || spec.frame_rate <= 0.0 {
            return Err(writer_unavailable(format!(
                "Cannot encode {} @ {} fps",
                spec.dimensions, spec.frame_rate
            )));
        }

        let mut output = format::output_as(&path, CONTAINER_FORMAT)
            .map_err(|e| writer_unavailable(format!("Failed to create output: {}", e)))?;

        let codec = codec::encoder::find(codec_id)
            .ok_or_else(|| writer_unavailable(format!("No encoder available for {}", fourcc)))?;

        let global_header = output.format().flags().contains(format::Flags::GLOBAL_HEADER);

        let mut encoder = codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()
            .map_err(|e| writer_unavailable(format!("Failed to create video encoder: {}", e)))?;

        let rate = frame_rate_rational(spec.frame_rate);
        let time_base = rate.invert();
        encoder.set_width(spec.dimensions.width);
        encoder.set_height(spec.dimensions.height);
        encoder.set_format(Pixel::YUV420P);
        encoder.set_frame_rate(Some(rate));
        encoder.set_time_base(time_base);
        if global_header {
            encoder.set_flags(codec::Flags::GLOBAL_HEADER);
        }

        let encoder = encoder
            .open_as(codec)
            .map_err(|e| writer_unavailable(format!("Failed to open video encoder: {}", e)))?;

        let stream_index = {
            let mut stream = output
                .add_stream(codec)
                .map_err(|e| writer_unavailable(format!("Failed to add video stream: {}", e)))?;
            stream.set_parameters(&encoder);
            stream.set_time_base(time_base);
            stream.index()
        };

        output
            .write_header()
            .map_err(|e| writer_unavailable(format!("Failed to write header: {}", e)))?;

        // The muxer may replace the stream time base while writing the header.
        let stream_time_base = output
            .stream(stream_index)
            .map(|stream| stream.time_base())
            .unwrap_or(time_base);

        debug!(
            "Opened writer {} ({}, {} @ {}/{} fps)",
            path,
            fourcc,
            spec.dimensions,
            rate.numerator(),
            rate.denominator()
        );

        Ok(Self {
            path: path.to_string(),
            spec: *spec,
            state: Some(EncodeState {
                output,
                encoder,
                converter: None,
                encoder_time_base: time_base,
                stream_time_base,
                stream_index,
            }),
            frames_written: 0,
        })
    }

    fn failure(&self, message: String) -> DomainError {
        DomainError::TranscodeFailure {
            output: self.path.clone(),
            frames_written: self.frames_written,
            message,
        }
    }
}

impl FrameSink for LibavFrameSink {
    fn path(&self) -> &str {
        &self.path
    }

    fn spec(&self) -> OutputSpec {
        self.spec
    }

    fn write(&mut self, frame: Frame) -> Result<(), DomainError> {
        debug_assert_eq!(
            frame.dimensions(),
            self.spec.dimensions,
            "frame size must match the declared output size"
        );

        let pts = self.frames_written as i64;
        let result = match self.state.as_mut() {
            Some(state) => state.convert_for_encoder(frame.into_video()).and_then(|mut video| {
                video.set_pts(Some(pts));
                state.send(Some(&video))
            }),
            None => return Err(self.failure("Writer already closed".to_string())),
        };

        match result {
            Ok(()) => {
                self.frames_written += 1;
                Ok(())
            }
            Err(e) => Err(self.failure(format!("Failed to encode frame {}: {}", pts, e))),
        }
    }

    fn frames_written(&self) -> u64 {
        self.frames_written
    }

    fn close(&mut self) -> Result<(), DomainError> {
        let Some(mut state) = self.state.take() else {
            return Ok(());
        };

        state
            .send(None)
            .map_err(|e| self.failure(format!("Failed to flush encoder: {}", e)))?;
        state
            .output
            .write_trailer()
            .map_err(|e| self.failure(format!("Failed to write trailer: {}", e)))?;

        debug!("Closed writer {} after {} frames", self.path, self.frames_written);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.state.is_none()
    }
}

impl Drop for LibavFrameSink {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Writer {} not finalized cleanly: {}", self.path, e);
        }
    }
}
