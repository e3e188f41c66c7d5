//! Output path helpers

use std::path::{Path, PathBuf};

use crate::domain::model::CompressionMethod;
use crate::error::VidpressResult;

/// Extension of every file the sink writes
pub const OUTPUT_EXTENSION: &str = "mp4";

/// File stem of `input`, `video` when it has none
pub fn input_stem(input: &str) -> String {
    Path::new(input)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "video".to_string())
}

/// `{stem}_{method}.mp4`
pub fn output_file_name(input: &str, method: CompressionMethod) -> String {
    format!("{}_{}.{}", input_stem(input), method, OUTPUT_EXTENSION)
}

/// Default output location for compressing `input` into `output_dir`
pub fn default_output_path(input: &str, output_dir: &Path, method: CompressionMethod) -> PathBuf {
    output_dir.join(output_file_name(input, method))
}

/// Create `dir` and any missing parents
pub fn ensure_dir(dir: &Path) -> VidpressResult<()> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        std::fs::create_dir_all(dir)?;
        tracing::debug!("Created directory {}", dir.display());
    }
    Ok(())
}
