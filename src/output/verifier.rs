//! Output verification implementation

use tracing::{info, warn};

use crate::domain::model::{OutputSpec, PipelineResult, VideoProperties};
use crate::output::{VerificationCheck, VerificationResult};

/// Frame rate difference still counted as a match
pub const FRAME_RATE_TOLERANCE: f64 = 0.01;

/// Compares what the policy promised with what was actually written
#[derive(Debug, Default, Clone, Copy)]
pub struct FidelityVerifier;

impl FidelityVerifier {
    pub fn new() -> Self {
        Self
    }

    /// Check `actual` (read back from the output file) against the planned
    /// `expected` spec and the pipeline's written-frame count.
    ///
    /// Mismatches are logged and reported, never raised.
    pub fn verify(
        &self,
        expected: &OutputSpec,
        result: &PipelineResult,
        actual: &VideoProperties,
    ) -> VerificationResult {
        let checks = vec![
            Self::check(
                "dimensions",
                expected.dimensions.to_string(),
                actual.dimensions().to_string(),
                expected.dimensions == actual.dimensions(),
            ),
            Self::check(
                "frame_rate",
                format!("{:.2}", expected.frame_rate),
                format!("{:.2}", actual.frame_rate),
                (expected.frame_rate - actual.frame_rate).abs() <= FRAME_RATE_TOLERANCE,
            ),
            Self::check(
                "frame_count",
                result.frames_written.to_string(),
                actual.frame_count.to_string(),
                result.frames_written == actual.frame_count,
            ),
        ];

        let verification = VerificationResult {
            success: checks.iter().all(|check| check.success),
            checks,
        };

        if verification.success {
            info!("Verification passed for {}", result.output_path);
        } else {
            for check in verification.failed_checks() {
                warn!(
                    "Verification check {} failed for {}: expected {}, got {}",
                    check.check_type, result.output_path, check.expected, check.actual
                );
            }
        }

        verification
    }

    fn check(check_type: &str, expected: String, actual: String, success: bool) -> VerificationCheck {
        VerificationCheck {
            check_type: check_type.to_string(),
            expected,
            actual,
            success,
        }
    }
}
