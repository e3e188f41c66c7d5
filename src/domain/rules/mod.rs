// Domain rules - Transform policy selection and parameter validation

use crate::domain::errors::*;
use crate::domain::model::*;

/// Smallest accepted skip rate
pub const MIN_SKIP_RATE: u32 = 1;
/// Scale percent must be strictly greater than this
pub const MIN_SCALE_PERCENT_EXCLUSIVE: u32 = 1;
/// Largest accepted scale percent
pub const MAX_SCALE_PERCENT: u32 = 100;

/// Per-frame transformation policy.
///
/// Decisions depend only on the zero-based decode index and the policy
/// parameters, so the same input always produces the same output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformPolicy {
    /// Keep every `skip_rate`-th frame, never resize
    TemporalSkip { skip_rate: u32 },
    /// Keep every frame, resize to `scale_percent`
    SpatialScale { scale_percent: u32 },
    /// Temporal skip followed by spatial scale
    Combined { skip_rate: u32, scale_percent: u32 },
}

impl TransformPolicy {
    /// Build a policy from a request, validating only the parameters the
    /// method consumes.
    pub fn from_request(request: &CompressionRequest) -> Result<Self, DomainError> {
        let policy = match request.method {
            CompressionMethod::FrameSkip => TransformPolicy::TemporalSkip {
                skip_rate: request.skip_rate,
            },
            CompressionMethod::Resolution => TransformPolicy::SpatialScale {
                scale_percent: request.scale_percent,
            },
            CompressionMethod::Combined => TransformPolicy::Combined {
                skip_rate: request.skip_rate,
                scale_percent: request.scale_percent,
            },
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Check the parameter ranges of this policy
    pub fn validate(&self) -> Result<(), DomainError> {
        match *self {
            TransformPolicy::TemporalSkip { skip_rate } => validate_skip_rate(skip_rate),
            TransformPolicy::SpatialScale { scale_percent } => validate_scale_percent(scale_percent),
            TransformPolicy::Combined {
                skip_rate,
                scale_percent,
            } => {
                validate_skip_rate(skip_rate)?;
                validate_scale_percent(scale_percent)
            }
        }
    }

    pub fn method(&self) -> CompressionMethod {
        match self {
            TransformPolicy::TemporalSkip { .. } => CompressionMethod::FrameSkip,
            TransformPolicy::SpatialScale { .. } => CompressionMethod::Resolution,
            TransformPolicy::Combined { .. } => CompressionMethod::Combined,
        }
    }

    /// Effective stride between kept frames (1 when nothing is dropped)
    pub fn skip_rate(&self) -> u32 {
        match *self {
            TransformPolicy::TemporalSkip { skip_rate }
            | TransformPolicy::Combined { skip_rate, .. } => skip_rate,
            TransformPolicy::SpatialScale { .. } => 1,
        }
    }

    /// Scale applied to kept frames, `None` when frames are never resized
    pub fn scale_percent(&self) -> Option<u32> {
        match *self {
            TransformPolicy::TemporalSkip { .. } => None,
            TransformPolicy::SpatialScale { scale_percent }
            | TransformPolicy::Combined { scale_percent, .. } => Some(scale_percent),
        }
    }

    /// Whether the frame at `frame_index` (decode order) is kept
    pub fn keeps(&self, frame_index: u64) -> bool {
        let stride = u64::from(self.skip_rate().max(MIN_SKIP_RATE));
        frame_index % stride == 0
    }

    /// Size of every written frame for a given source size
    pub fn target_dimensions(&self, source: Dimensions) -> Dimensions {
        match self.scale_percent() {
            Some(percent) => source.scaled(percent),
            None => source,
        }
    }

    /// Frame rate the output is declared with
    pub fn output_frame_rate(&self, source_frame_rate: f64) -> f64 {
        source_frame_rate / f64::from(self.skip_rate().max(MIN_SKIP_RATE))
    }

    /// Resolve the sink parameters for a source, rejecting sizes that
    /// would collapse an axis to zero.
    pub fn plan_output(&self, source: &VideoProperties) -> Result<OutputSpec, DomainError> {
        let dimensions = self.target_dimensions(source.dimensions());
        if dimensions.is_degenerate() {
            return Err(DomainError::InvalidParameter(format!(
                "Scale percent {} reduces {} to {}",
                self.scale_percent().unwrap_or(MAX_SCALE_PERCENT),
                source.dimensions(),
                dimensions
            )));
        }

        Ok(OutputSpec {
            frame_rate: self.output_frame_rate(source.frame_rate),
            dimensions,
        })
    }
}

/// Skip rate must be at least one
pub fn validate_skip_rate(skip_rate: u32) -> Result<(), DomainError> {
    if skip_rate < MIN_SKIP_RATE {
        return Err(DomainError::InvalidParameter(format!(
            "Skip rate must be at least {}, got {}",
            MIN_SKIP_RATE, skip_rate
        )));
    }
    Ok(())
}

/// Scale percent must lie in (1, 100]
pub fn validate_scale_percent(scale_percent: u32) -> Result<(), DomainError> {
    if scale_percent <= MIN_SCALE_PERCENT_EXCLUSIVE || scale_percent > MAX_SCALE_PERCENT {
        return Err(DomainError::InvalidParameter(format!(
            "Scale percent must be greater than {} and at most {}, got {}",
            MIN_SCALE_PERCENT_EXCLUSIVE, MAX_SCALE_PERCENT, scale_percent
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
