use super::*;

#[test]
fn opacity_boundaries() {
    assert_eq!(opacity(0.0), 1.0);
    assert_eq!(opacity(1.0), 0.0);
    assert!((opacity(0.5) - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
}

#[test]
fn opacity_is_non_increasing() {
    let mut prev = opacity(0.0);
    for i in 1..=200 {
        let v = opacity(f64::from(i) / 200.0);
        assert!(v <= prev);
        prev = v;
    }
}

#[test]
fn opacity_fades_slowly_then_quickly() {
    let first = opacity(0.0) - opacity(0.1);
    let last = opacity(0.9) - opacity(1.0);
    assert!(first < last);
}

#[test]
fn opacity_clamps_out_of_range_progress() {
    assert_eq!(opacity(-1.0), 1.0);
    assert_eq!(opacity(2.0), 0.0);
}

#[test]
fn random_offset_scales_both_axes_by_one_factor() {
    let off = random_offset(Vec2::new(64.0, 32.0), -0.5);
    assert_eq!(off, Vec2::new(-32.0, -16.0));
    assert_eq!(random_offset(Vec2::new(64.0, 32.0), 0.0), Vec2::ZERO);
}

#[test]
fn displacement_lerps_from_zero_to_target() {
    let target = Vec2::new(100.0, -40.0);
    assert_eq!(displacement(target, 0.0), Vec2::ZERO);
    assert_eq!(displacement(target, 1.0), target);
    assert_eq!(displacement(target, 0.25), Vec2::new(25.0, -10.0));
    assert_eq!(displacement(target, 3.0), target);
}
