//! Area-averaging frame resampler
//!
//! Shrinking uses swscale's area filter, which averages every source pixel
//! covered by a destination pixel. Nearest and bilinear sampling skip source
//! pixels when the scale factor is below one half and alias on fine detail.

use ffmpeg_next::format::Pixel;
use ffmpeg_next::software::scaling::{Context as ScalingContext, Flags as ScalingFlags};
use ffmpeg_next::util::frame::video::Video;
use tracing::debug;

use crate::domain::model::Dimensions;
use crate::engine::frame::Frame;

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScalerKey {
    format: Pixel,
    source: Dimensions,
    target: Dimensions,
}

/// Resizes frames, keeping their pixel format.
///
/// The swscale context is built on first use and rebuilt only when the
/// input format or either size changes.
#[derive(Default)]
pub struct AreaResampler {
    cached: Option<(ScalerKey, ScalingContext)>,
}

impl AreaResampler {
    pub fn new() -> Self {
        Self { cached: None }
    }

    /// Resize `frame` to `target`. Frames already at the target size are
    /// returned untouched.
    pub fn resize(&mut self, frame: Frame, target: Dimensions) -> Result<Frame, ffmpeg_next::Error> {
        if frame.dimensions() == target {
            return Ok(frame);
        }

        let key = ScalerKey {
            format: frame.format(),
            source: frame.dimensions(),
            target,
        };
        let scaler = self.scaler_for(key)?;

        let mut resized = Video::empty();
        scaler.run(frame.as_video(), &mut resized)?;
        Ok(Frame::from(resized))
    }

    fn scaler_for(&mut self, key: ScalerKey) -> Result<&mut ScalingContext, ffmpeg_next::Error> {
        let stale = !matches!(&self.cached, Some((cached, _)) if *cached == key);
        if stale {
            debug!(
                "Creating area scaler {:?} {} -> {}",
                key.format, key.source, key.target
            );
            let context = ScalingContext::get(
                key.format,
                key.source.width,
                key.source.height,
                key.format,
                key.target.width,
                key.target.height,
                ScalingFlags::AREA,
            )?;
            self.cached = Some((key, context));
        }

        match self.cached.as_mut() {
            Some((_, context)) => Ok(context),
            None => Err(ffmpeg_next::Error::Bug),
        }
    }
}
