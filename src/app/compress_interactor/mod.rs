// Compress interactor - Orchestrates the compress-a-file use case

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::TransformPolicy;
use crate::engine::pipeline::TranscodePipeline;
use crate::error::VidpressResult;
use crate::output::{FidelityVerifier, MetadataSummary, VerificationResult};
use crate::ports::*;
use crate::utils::path::{default_output_path, ensure_dir};

/// Where the compressed file goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// `{dir}/{input stem}_{method}.mp4`
    Directory(PathBuf),
    /// Exact output path
    File(PathBuf),
}

impl OutputTarget {
    fn resolve(&self, input: &str, method: CompressionMethod) -> PathBuf {
        match self {
            OutputTarget::Directory(dir) => default_output_path(input, dir, method),
            OutputTarget::File(path) => path.clone(),
        }
    }
}

/// Everything known about a finished compression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionReport {
    pub request: CompressionRequest,
    pub result: PipelineResult,
    pub source: VideoMetadata,
    pub output: VideoMetadata,
    pub verification: VerificationResult,
    pub elapsed_seconds: f64,
}

impl CompressionReport {
    /// Output size as a fraction of the source size
    pub fn size_ratio(&self) -> f64 {
        if self.source.file_size_bytes == 0 {
            return 0.0;
        }
        self.output.file_size_bytes as f64 / self.source.file_size_bytes as f64
    }
}

impl fmt::Display for CompressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Compressed with {} ({} of {} frames written in {:.2}s)",
            self.request.method, self.result.frames_written, self.result.frames_decoded, self.elapsed_seconds
        )?;
        writeln!(f)?;
        writeln!(f, "Source")?;
        writeln!(f, "{}", MetadataSummary::from_metadata(&self.source))?;
        writeln!(f)?;
        writeln!(f, "Output")?;
        writeln!(f, "{}", MetadataSummary::from_metadata(&self.output))?;
        writeln!(f)?;
        write!(f, "Size ratio: {:.1}%", self.size_ratio() * 100.0)?;
        if !self.verification.success {
            for check in self.verification.failed_checks() {
                write!(
                    f,
                    "\nWarning: {} expected {}, got {}",
                    check.check_type, check.expected, check.actual
                )?;
            }
        }
        Ok(())
    }
}

/// Interactor for the compress use case
pub struct CompressInteractor {
    decode_port: Arc<dyn DecodePort>,
    encode_port: Arc<dyn EncodePort>,
    metadata_port: Arc<dyn MetadataPort>,
    verifier: FidelityVerifier,
}

impl CompressInteractor {
    /// Create new compress interactor with injected ports
    pub fn new(
        decode_port: Arc<dyn DecodePort>,
        encode_port: Arc<dyn EncodePort>,
        metadata_port: Arc<dyn MetadataPort>,
    ) -> Self {
        Self {
            decode_port,
            encode_port,
            metadata_port,
            verifier: FidelityVerifier::new(),
        }
    }

    /// Compress `input` according to `request`.
    ///
    /// Parameters are validated before anything is opened. The source is
    /// released whether or not the transcode succeeds; a failed transcode
    /// leaves its partial output in place.
    pub fn execute(
        &self,
        input: &str,
        request: &CompressionRequest,
        target: &OutputTarget,
    ) -> VidpressResult<CompressionReport> {
        let start_time = Instant::now();
        let policy = TransformPolicy::from_request(request)?;

        if !Path::new(input).exists() {
            return Err(DomainError::NotFound {
                path: input.to_string(),
            }
            .into());
        }

        let output_path = target.resolve(input, policy.method());
        if let Some(parent) = output_path.parent() {
            ensure_dir(parent)?;
        }
        let output = output_path.to_string_lossy().to_string();

        info!("Compressing {} -> {} with {}", input, output, policy.method());

        let source_metadata = self.metadata_port.read_metadata(input)?;

        let mut source = self.decode_port.open_source(input)?;
        let outcome = self.transcode(source.as_mut(), policy, &output);
        source.close();
        let (spec, result) = outcome?;

        let output_metadata = self.metadata_port.read_metadata(&output)?;
        let verification = self.verifier.verify(&spec, &result, &output_metadata.properties);
        if !verification.success {
            warn!("Output {} does not match the requested transform", output);
        }

        let elapsed_seconds = start_time.elapsed().as_secs_f64();
        info!(
            "Compression finished in {:.2}s: {} -> {} bytes",
            elapsed_seconds, source_metadata.file_size_bytes, output_metadata.file_size_bytes
        );

        Ok(CompressionReport {
            request: *request,
            result,
            source: source_metadata,
            output: output_metadata,
            verification,
            elapsed_seconds,
        })
    }

    fn transcode(
        &self,
        source: &mut dyn FrameSource,
        policy: TransformPolicy,
        output: &str,
    ) -> Result<(OutputSpec, PipelineResult), DomainError> {
        let spec = policy.plan_output(&source.properties())?;
        let mut sink = self.encode_port.open_sink(output, &spec)?;
        let result = TranscodePipeline::new(policy).run(source, sink.as_mut())?;
        Ok((spec, result))
    }
}
