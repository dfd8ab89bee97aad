use super::*;

#[test]
fn defaults_match_documented_values() {
    let cfg = SnapConfig::default();
    assert_eq!(cfg.offset, Vec2::new(64.0, -32.0));
    assert_eq!(cfg.duration(), Duration::from_millis(5000));
    assert_eq!(cfg.random_dislocation_offset, Vec2::new(64.0, 32.0));
    assert_eq!(cfg.number_of_buckets, 16);
    assert!(!cfg.snap_on_tap);
    assert_eq!(cfg.grace_delay(), Duration::from_millis(100));
    assert_eq!(cfg.ease, Ease::Out);
    cfg.validate().unwrap();
}

#[test]
fn partial_json_fills_in_defaults() {
    let cfg = SnapConfig::from_json(
        r#"{ "number_of_buckets": 4, "duration_ms": 1000, "offset": { "x": 10.0, "y": 0.0 } }"#,
    )
    .unwrap();
    assert_eq!(cfg.number_of_buckets, 4);
    assert_eq!(cfg.duration_ms, 1000);
    assert_eq!(cfg.offset, Vec2::new(10.0, 0.0));
    assert_eq!(cfg.random_dislocation_offset, Vec2::new(64.0, 32.0));
    assert_eq!(cfg.grace_delay_ms, 100);
}

#[test]
fn invalid_values_fail_fast() {
    for json in [
        r#"{ "number_of_buckets": 0 }"#,
        r#"{ "duration_ms": 0 }"#,
        r#"{ "worker_threads": 0 }"#,
        r#"{ "ease": "Bouncy" }"#,
        r#"not json"#,
    ] {
        let err = SnapConfig::from_json(json).unwrap_err();
        assert!(matches!(err, SnapError::Config(_)), "{json}: {err}");
    }
}

#[test]
fn non_finite_vectors_are_rejected() {
    let cfg = SnapConfig {
        offset: Vec2::new(f64::NAN, 0.0),
        ..SnapConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn serializes_back_to_equal_config() {
    let cfg = SnapConfig {
        seed: Some(9),
        snap_on_tap: true,
        ..SnapConfig::default()
    };
    let json = serde_json::to_string(&cfg).unwrap();
    assert_eq!(SnapConfig::from_json(&json).unwrap(), cfg);
}

#[test]
fn motion_mirrors_vectors_and_ease() {
    let cfg = SnapConfig {
        ease: Ease::Linear,
        ..SnapConfig::default()
    };
    let m = cfg.motion();
    assert_eq!(m.offset, cfg.offset);
    assert_eq!(m.random_dislocation, cfg.random_dislocation_offset);
    assert_eq!(m.ease, Ease::Linear);
}
