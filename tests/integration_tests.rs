//! End-to-end tests against real libav encode/decode

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use vidpress::adapters::{LibavBackend, LibavFrameSink, LibavFrameSource, ProbeLibavAdapter};
use vidpress::app::{CompressInteractor, OutputTarget};
use vidpress::domain::model::{CompressionRequest, Dimensions, OutputSpec};
use vidpress::engine::Frame;
use vidpress::ports::{FrameSink, FrameSource, MetadataPort};
use vidpress::{DomainError, VidpressError};

mod test_utils {
    use super::*;

    /// Encode `frames` flat frames at 30 fps into `path`
    pub fn create_test_video(path: &Path, frames: u64, width: u32, height: u32) {
        vidpress::init().unwrap();
        let spec = OutputSpec {
            frame_rate: 30.0,
            dimensions: Dimensions::new(width, height),
        };
        let mut sink = LibavFrameSink::open(&path.to_string_lossy(), &spec, "mp4v").unwrap();
        for index in 0..frames {
            let luma = (16 + index * 20 % 200) as u8;
            sink.write(Frame::solid(width, height, luma)).unwrap();
        }
        sink.close().unwrap();
    }

    pub fn source_video(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("source.mp4");
        create_test_video(&path, 10, 100, 100);
        path
    }

    pub fn interactor() -> CompressInteractor {
        let backend = Arc::new(LibavBackend::default());
        CompressInteractor::new(backend.clone(), backend.clone(), backend)
    }

    pub fn domain_error(err: VidpressError) -> DomainError {
        match err {
            VidpressError::Domain(e) => e,
            other => panic!("expected a domain error, got {other:?}"),
        }
    }
}

use test_utils::*;

#[test]
fn test_metadata_of_synthetic_source() {
    let dir = TempDir::new().unwrap();
    let path = source_video(&dir);

    let metadata = ProbeLibavAdapter::new()
        .read_metadata(&path.to_string_lossy())
        .unwrap();

    assert_eq!(metadata.properties.dimensions(), Dimensions::new(100, 100));
    assert!((metadata.properties.frame_rate - 30.0).abs() < 0.01);
    assert_eq!(metadata.properties.frame_count, 10);
    assert!(metadata.file_size_bytes > 0);
}

#[test]
fn test_frameskip_round_trip() {
    let dir = TempDir::new().unwrap();
    let input = source_video(&dir);

    let report = interactor()
        .execute(
            &input.to_string_lossy(),
            &CompressionRequest::frame_skip(2),
            &OutputTarget::Directory(dir.path().join("out")),
        )
        .unwrap();

    assert_eq!(report.result.frames_written, 5);
    assert!(report.result.output_path.ends_with("source_frameskip.mp4"));
    assert_eq!(report.output.properties.frame_count, 5);
    assert_eq!(report.output.properties.dimensions(), Dimensions::new(100, 100));
    assert!((report.output.properties.frame_rate - 15.0).abs() < 0.01);
    assert!(report.verification.success, "{:?}", report.verification);
}

#[test]
fn test_combined_round_trip_preserves_duration() {
    let dir = TempDir::new().unwrap();
    let input = source_video(&dir);

    let report = interactor()
        .execute(
            &input.to_string_lossy(),
            &CompressionRequest::combined(2, 50),
            &OutputTarget::File(dir.path().join("small.mp4")),
        )
        .unwrap();

    let output = &report.output.properties;
    assert_eq!(output.dimensions(), Dimensions::new(50, 50));
    assert_eq!(output.frame_count, 5);
    let source_duration = report.source.properties.duration_seconds;
    assert!((output.duration_seconds - source_duration).abs() < 0.05);
}

#[test]
fn test_source_reads_and_seeks() {
    let dir = TempDir::new().unwrap();
    let path = source_video(&dir);
    let mut source = LibavFrameSource::open(&path.to_string_lossy()).unwrap();

    let mut frames = 0;
    while let Some(frame) = source.read_next().unwrap() {
        assert_eq!(frame.dimensions(), Dimensions::new(100, 100));
        frames += 1;
    }
    assert_eq!(frames, 10);

    source.seek(7).unwrap();
    assert_eq!(source.position(), 7);
    source.seek(2).unwrap();
    assert_eq!(source.position(), 2);
    source.seek(500).unwrap();
    assert_eq!(source.position(), 9);

    source.close();
    source.close();
    assert!(source.is_closed());
    assert!(source.read_next().unwrap().is_none());
}

#[test]
fn test_independent_sources_do_not_share_cursor() {
    let dir = TempDir::new().unwrap();
    let path = source_video(&dir);
    let mut first = LibavFrameSource::open(&path.to_string_lossy()).unwrap();
    let mut second = LibavFrameSource::open(&path.to_string_lossy()).unwrap();

    for _ in 0..4 {
        first.read_next().unwrap();
    }
    assert_eq!(first.position(), 4);
    assert_eq!(second.position(), 0);
    assert!(second.read_next().unwrap().is_some());
    assert_eq!(second.position(), 1);
}

#[test]
fn test_missing_file_is_not_found() {
    vidpress::init().unwrap();
    let err = LibavFrameSource::open("/no/such/video.mp4").err().unwrap();
    assert_eq!(err.kind(), "not_found");

    let err = ProbeLibavAdapter::new().read_metadata("/no/such/video.mp4").unwrap_err();
    assert_eq!(err.kind(), "not_found");
}

#[test]
fn test_garbage_file_is_unreadable() {
    vidpress::init().unwrap();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.mp4");
    std::fs::write(&path, b"this is not a video").unwrap();

    let err = ProbeLibavAdapter::new()
        .read_metadata(&path.to_string_lossy())
        .unwrap_err();
    assert_eq!(err.kind(), "unreadable");

    let err = interactor()
        .execute(
            &path.to_string_lossy(),
            &CompressionRequest::default(),
            &OutputTarget::Directory(dir.path().join("out")),
        )
        .unwrap_err();
    assert_eq!(domain_error(err).kind(), "unreadable");
}

#[test]
fn test_writer_unavailable() {
    vidpress::init().unwrap();
    let dir = TempDir::new().unwrap();
    let spec = OutputSpec {
        frame_rate: 30.0,
        dimensions: Dimensions::new(64, 64),
    };

    let unknown_codec = dir.path().join("a.mp4");
    let err = LibavFrameSink::open(&unknown_codec.to_string_lossy(), &spec, "zzzz")
        .err()
        .unwrap();
    assert_eq!(err.kind(), "writer_unavailable");

    let bad_dir = dir.path().join("missing").join("b.mp4");
    let err = LibavFrameSink::open(&bad_dir.to_string_lossy(), &spec, "mp4v")
        .err()
        .unwrap();
    assert_eq!(err.kind(), "writer_unavailable");
}

#[test]
fn test_sink_accepts_container_style_frame_rates() {
    vidpress::init().unwrap();
    let dir = TempDir::new().unwrap();

    for (name, fps) in [
        ("vfr.mp4", 1800000.0 / 60059.0),
        ("hfr.mp4", 120000.0 / 1001.0),
        ("vfr_third.mp4", 1250000.0 / 41709.0 / 3.0),
    ] {
        let path = dir.path().join(name);
        let spec = OutputSpec {
            frame_rate: fps,
            dimensions: Dimensions::new(48, 32),
        };
        let mut sink = LibavFrameSink::open(&path.to_string_lossy(), &spec, "mp4v")
            .unwrap_or_else(|e| panic!("{fps} fps rejected: {e}"));
        for luma in [20, 80, 140] {
            sink.write(Frame::solid(48, 32, luma)).unwrap();
        }
        sink.close().unwrap();

        let metadata = ProbeLibavAdapter::new()
            .read_metadata(&path.to_string_lossy())
            .unwrap();
        assert_eq!(metadata.properties.frame_count, 3);
    }
}

#[test]
fn test_sink_close_is_idempotent() {
    vidpress::init().unwrap();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("c.mp4");
    let spec = OutputSpec {
        frame_rate: 25.0,
        dimensions: Dimensions::new(32, 32),
    };

    let mut sink = LibavFrameSink::open(&path.to_string_lossy(), &spec, "mp4v").unwrap();
    sink.write(Frame::solid(32, 32, 90)).unwrap();
    sink.close().unwrap();
    sink.close().unwrap();
    assert!(sink.is_closed());
    assert_eq!(sink.frames_written(), 1);
    assert!(path.exists());
}
