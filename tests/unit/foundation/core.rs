use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(10, 0).is_err());
    let fps = Fps::new(10, 1).unwrap();
    assert_eq!((fps.num, fps.den), (10, 1));
}

#[test]
fn pose_validation_rejects_non_finite() {
    assert!(Pose::new(1.0, 2.0, 0.5).validate().is_ok());
    assert!(Pose::new(f64::NAN, 0.0, 0.0).validate().is_err());
    assert!(Pose::new(0.0, f64::INFINITY, 0.0).validate().is_err());
    assert!(Pose::new(0.0, 0.0, f64::NEG_INFINITY).validate().is_err());
}

#[test]
fn rgb_scaling_clamps_highlights() {
    let c = Rgb8::new(200, 100, 0);
    assert_eq!(c.scaled(0.5), Rgb8::new(100, 50, 0));
    assert_eq!(c.scaled(1.3), Rgb8::new(255, 130, 0));
    assert_eq!(c.scaled(-1.0), Rgb8::new(0, 0, 0));
    assert_eq!(c.scaled(f64::NAN), Rgb8::new(0, 0, 0));
}

#[test]
fn rgb_lerp_endpoints() {
    let a = Rgb8::new(0, 0, 0);
    let b = Rgb8::new(200, 100, 50);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 0.5), Rgb8::new(100, 50, 25));
}
