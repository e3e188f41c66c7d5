//! Command-line argument definitions

use clap::Args;

/// Arguments for the compress command
#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: String,

    /// Compression method (frameskip, resolution, combined)
    #[arg(short, long)]
    pub method: Option<String>,

    /// Keep every N-th frame (frameskip, combined)
    #[arg(long)]
    pub skip_rate: Option<u32>,

    /// Output size as a percentage of the input, 2-100 (resolution, combined)
    #[arg(long)]
    pub scale_percent: Option<u32>,

    /// Output file path (default: <output-dir>/<input stem>_<method>.mp4)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Directory for generated output names
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Four-character codec identifier (mp4v, avc1)
    #[arg(long)]
    pub codec: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: String,

    /// Report format (text, json, yaml)
    #[arg(long, default_value = "text")]
    pub format: String,
}
