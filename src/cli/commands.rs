//! Command implementations

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::{LibavBackend, VidpressConfig};
use crate::app::{CompressInteractor, InspectInteractor, OutputTarget};
use crate::cli::args::{CompressArgs, InspectArgs};
use crate::output::{serialize_report, ReportFormat};

/// Execute the compress command
pub fn compress(args: CompressArgs, config: &VidpressConfig) -> Result<()> {
    let request = config.default_request();
    let target = match args.output {
        Some(path) => OutputTarget::File(PathBuf::from(path)),
        None => OutputTarget::Directory(PathBuf::from(&config.output_dir)),
    };

    info!("Input: {}", args.input);
    info!(
        "Method: {} (skip rate {}, scale {}%)",
        request.method, request.skip_rate, request.scale_percent
    );

    let backend = Arc::new(LibavBackend::new(config.codec.clone()));
    let interactor = CompressInteractor::new(backend.clone(), backend.clone(), backend);
    let report = interactor
        .execute(&args.input, &request, &target)
        .with_context(|| format!("Failed to compress {}", args.input))?;

    if args.json {
        println!("{}", serialize_report(&report, ReportFormat::Json)?);
    } else {
        println!("{}", report);
    }
    Ok(())
}

/// Execute the inspect command
pub fn inspect(args: InspectArgs) -> Result<()> {
    let format = ReportFormat::parse(&args.format)?;
    let interactor = InspectInteractor::new(Arc::new(LibavBackend::default()));
    let rendered = interactor
        .execute(&args.input, format)
        .with_context(|| format!("Failed to inspect {}", args.input))?;

    println!("{}", rendered);
    Ok(())
}
