//! Applies a transform policy to decoded frames

use tracing::{debug, trace};

use crate::domain::model::Dimensions;
use crate::domain::rules::TransformPolicy;
use crate::engine::frame::Frame;
use crate::engine::resample::AreaResampler;

/// Policy plus the resampler it needs for spatial variants
pub struct FrameTransformer {
    policy: TransformPolicy,
    resampler: AreaResampler,
}

impl FrameTransformer {
    pub fn new(policy: TransformPolicy) -> Self {
        Self {
            policy,
            resampler: AreaResampler::new(),
        }
    }

    pub fn policy(&self) -> &TransformPolicy {
        &self.policy
    }

    /// Map `(frame_index, frame)` to the frame to write, or `None` when the
    /// policy drops it.
    ///
    /// Kept frames always come out at `output_size`, the size the sink was
    /// opened with. A decoder that changes size mid-stream is resampled back
    /// to it, whatever the policy.
    pub fn apply(
        &mut self,
        frame_index: u64,
        frame: Frame,
        output_size: Dimensions,
    ) -> Result<Option<Frame>, ffmpeg_next::Error> {
        if !self.policy.keeps(frame_index) {
            trace!("Dropping frame {}", frame_index);
            return Ok(None);
        }

        if frame.dimensions() != output_size && self.policy.scale_percent().is_none() {
            debug!(
                "Frame {} decoded at {}, resampling to {}",
                frame_index,
                frame.dimensions(),
                output_size
            );
        }
        let resized = self.resampler.resize(frame, output_size)?;
        Ok(Some(resized))
    }
}
