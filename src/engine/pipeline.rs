//! Read -> transform -> write orchestration

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::PipelineResult;
use crate::domain::rules::TransformPolicy;
use crate::engine::transform::FrameTransformer;
use crate::ports::{FrameSink, FrameSource};

const PROGRESS_INTERVAL: u64 = 100;

/// Drives one transcode from an open source into an open sink
pub struct TranscodePipeline {
    transformer: FrameTransformer,
}

#[derive(Debug, Default)]
struct Counters {
    decoded: u64,
    written: u64,
}

impl TranscodePipeline {
    pub fn new(policy: TransformPolicy) -> Self {
        Self {
            transformer: FrameTransformer::new(policy),
        }
    }

    pub fn policy(&self) -> &TransformPolicy {
        self.transformer.policy()
    }

    /// Run the loop until the source stops producing frames.
    ///
    /// The sink is closed on every exit path. The source stays open and the
    /// caller releases it. A failure leaves the partial output on disk.
    pub fn run(
        &mut self,
        source: &mut dyn FrameSource,
        sink: &mut dyn FrameSink,
    ) -> Result<PipelineResult, DomainError> {
        if let Err(e) = self.transformer.policy().validate() {
            if let Err(close_err) = sink.close() {
                warn!("Failed to release writer after rejected policy: {}", close_err);
            }
            return Err(e);
        }

        let start_time = Instant::now();
        info!(
            "Transcoding {} -> {} ({:?})",
            source.path(),
            sink.path(),
            self.transformer.policy()
        );

        let mut counters = Counters::default();
        let loop_result = self.drive(source, sink, &mut counters);
        let close_result = sink.close();

        let output = sink.path().to_string();
        match (loop_result, close_result) {
            (Ok(()), Ok(())) => {
                info!(
                    "Transcode complete: {} of {} frames written in {:.2}s",
                    counters.written,
                    counters.decoded,
                    start_time.elapsed().as_secs_f64()
                );
                Ok(PipelineResult {
                    output_path: output,
                    frames_decoded: counters.decoded,
                    frames_written: counters.written,
                    success: true,
                })
            }
            (Ok(()), Err(close_err)) => {
                warn!("Writer failed to finalize {}: {}", output, close_err);
                Err(DomainError::TranscodeFailure {
                    output,
                    frames_written: counters.written,
                    message: failure_message(close_err),
                })
            }
            (Err(loop_err), close_result) => {
                if let Err(close_err) = close_result {
                    warn!("Failed to release writer after error: {}", close_err);
                }
                warn!(
                    "Transcode aborted at frame {} after {} written: {}",
                    counters.decoded, counters.written, loop_err
                );
                Err(DomainError::TranscodeFailure {
                    output,
                    frames_written: counters.written,
                    message: failure_message(loop_err),
                })
            }
        }
    }

    fn drive(
        &mut self,
        source: &mut dyn FrameSource,
        sink: &mut dyn FrameSink,
        counters: &mut Counters,
    ) -> Result<(), DomainError> {
        source.seek(0)?;
        let output_size = sink.spec().dimensions;

        // End of stream is the only normal exit; the declared frame count is
        // not trusted as a loop bound.
        while let Some(frame) = source.read_next()? {
            let index = counters.decoded;
            counters.decoded += 1;

            let transformed = self.transformer.apply(index, frame, output_size).map_err(|e| {
                DomainError::TranscodeFailure {
                    output: sink.path().to_string(),
                    frames_written: counters.written,
                    message: format!("Failed to resize frame {}: {}", index, e),
                }
            })?;

            if let Some(frame) = transformed {
                sink.write(frame)?;
                counters.written += 1;
            }

            if counters.decoded % PROGRESS_INTERVAL == 0 {
                debug!(
                    "Processed {} frames, {} written",
                    counters.decoded, counters.written
                );
            }
        }

        Ok(())
    }
}

/// Message of a loop error without re-wrapping an inner transcode failure
fn failure_message(err: DomainError) -> String {
    match err {
        DomainError::TranscodeFailure { message, .. } => message,
        other => other.to_string(),
    }
}
