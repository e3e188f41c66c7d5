// Unit tests for transform policy rules

use super::*;

fn is_invalid(result: Result<TransformPolicy, DomainError>) -> bool {
    matches!(result, Err(DomainError::InvalidParameter(_)))
}

#[test]
fn test_policy_from_request_selects_variant() {
    assert_eq!(
        TransformPolicy::from_request(&CompressionRequest::frame_skip(3)).unwrap(),
        TransformPolicy::TemporalSkip { skip_rate: 3 }
    );
    assert_eq!(
        TransformPolicy::from_request(&CompressionRequest::resolution(40)).unwrap(),
        TransformPolicy::SpatialScale { scale_percent: 40 }
    );
    assert_eq!(
        TransformPolicy::from_request(&CompressionRequest::combined(2, 75)).unwrap(),
        TransformPolicy::Combined {
            skip_rate: 2,
            scale_percent: 75
        }
    );
}

#[test]
fn test_zero_skip_rate_rejected_where_consumed() {
    assert!(is_invalid(TransformPolicy::from_request(&CompressionRequest::new(
        CompressionMethod::FrameSkip,
        0,
        50
    ))));
    assert!(is_invalid(TransformPolicy::from_request(&CompressionRequest::new(
        CompressionMethod::Combined,
        0,
        50
    ))));
}

#[test]
fn test_out_of_range_scale_rejected_where_consumed() {
    for scale in [0, 1, 101] {
        assert!(is_invalid(TransformPolicy::from_request(&CompressionRequest::new(
            CompressionMethod::Resolution,
            2,
            scale
        ))));
        assert!(is_invalid(TransformPolicy::from_request(&CompressionRequest::new(
            CompressionMethod::Combined,
            2,
            scale
        ))));
    }
}

#[test]
fn test_unused_parameters_are_ignored() {
    // frameskip never looks at scale_percent
    for scale in [0, 1, 101, 5000] {
        assert!(TransformPolicy::from_request(&CompressionRequest::new(
            CompressionMethod::FrameSkip,
            2,
            scale
        ))
        .is_ok());
    }
    // resolution never looks at skip_rate
    assert!(TransformPolicy::from_request(&CompressionRequest::new(
        CompressionMethod::Resolution,
        0,
        50
    ))
    .is_ok());
}

#[test]
fn test_scale_bounds_are_inclusive_at_top() {
    assert!(validate_scale_percent(2).is_ok());
    assert!(validate_scale_percent(100).is_ok());
    assert!(validate_scale_percent(1).is_err());
}

#[test]
fn test_keeps_uses_decode_index() {
    let policy = TransformPolicy::TemporalSkip { skip_rate: 3 };
    let kept: Vec<u64> = (0..10).filter(|i| policy.keeps(*i)).collect();
    assert_eq!(kept, vec![0, 3, 6, 9]);

    let spatial = TransformPolicy::SpatialScale { scale_percent: 50 };
    assert!((0..10).all(|i| spatial.keeps(i)));
}

#[test]
fn test_kept_count_is_ceiling() {
    for skip_rate in 1..=10u32 {
        let policy = TransformPolicy::TemporalSkip { skip_rate };
        for decoded in 0..=40u64 {
            let counted = (0..decoded).filter(|i| policy.keeps(*i)).count() as u64;
            assert_eq!(counted, decoded.div_ceil(u64::from(skip_rate)));
        }
    }
}

#[test]
fn test_output_frame_rate() {
    assert_eq!(TransformPolicy::TemporalSkip { skip_rate: 2 }.output_frame_rate(30.0), 15.0);
    assert_eq!(TransformPolicy::SpatialScale { scale_percent: 50 }.output_frame_rate(30.0), 30.0);
    assert_eq!(
        TransformPolicy::Combined {
            skip_rate: 4,
            scale_percent: 50
        }
        .output_frame_rate(24.0),
        6.0
    );
}

#[test]
fn test_target_dimensions_preserve_aspect_within_a_pixel() {
    let source = Dimensions::new(1920, 1080);
    for scale_percent in 2..=100u32 {
        let policy = TransformPolicy::SpatialScale { scale_percent };
        let target = policy.target_dimensions(source);
        assert_eq!(target.width, 1920 * scale_percent / 100);
        assert_eq!(target.height, 1080 * scale_percent / 100);

        let ideal_height = target.width as f64 * source.height as f64 / source.width as f64;
        assert!((ideal_height - target.height as f64).abs() <= 1.0);
    }
}

#[test]
fn test_plan_output_rejects_degenerate_size() {
    let props = VideoProperties::new(30.0, 10, 640, 40);
    let policy = TransformPolicy::SpatialScale { scale_percent: 2 };
    assert!(matches!(
        policy.plan_output(&props),
        Err(DomainError::InvalidParameter(_))
    ));
}

#[test]
fn test_plan_output_combined() {
    let props = VideoProperties::new(30.0, 10, 100, 100);
    let plan = TransformPolicy::Combined {
        skip_rate: 2,
        scale_percent: 50,
    }
    .plan_output(&props)
    .unwrap();
    assert_eq!(plan.frame_rate, 15.0);
    assert_eq!(plan.dimensions, Dimensions::new(50, 50));
}
