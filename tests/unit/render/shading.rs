use super::*;
use crate::camera::model::compute_camera;
use crate::foundation::core::{Point, Pose};
use approx::assert_abs_diff_eq;

fn light_at(theta: f64) -> (CameraState, Light) {
    let cam = compute_camera(&Pose::new(0.0, 0.0, theta), 1.2, 0.0);
    let light = Light::from_camera(&cam, [0.3, -0.5, 0.8]);
    (cam, light)
}

#[test]
fn light_is_unit_and_follows_camera() {
    let (cam, light) = light_at(0.7);
    assert_abs_diff_eq!(light.dir().norm(), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(light.horizontal().norm(), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(light.horizontal().z, 0.0, epsilon = 1e-12);
    // Light comes from the right and from behind.
    assert!(light.dir().dot(&cam.right) > 0.0);
    assert!(light.dir().dot(&cam.forward) < 0.0);
    assert!(light.dir().z > 0.0);
}

#[test]
fn zero_light_falls_back_to_straight_up() {
    let cam = compute_camera(&Pose::new(0.0, 0.0, 0.0), 1.2, 0.0);
    let light = Light::from_camera(&cam, [0.0, 0.0, 0.0]);
    assert_eq!(light.dir(), Vec3::z());
    assert_eq!(light.horizontal(), cam.forward);
}

#[test]
fn face_brightness_never_drops_below_ambient() {
    let (_, light) = light_at(0.0);
    for i in 0..36 {
        let a = f64::from(i) * std::f64::consts::TAU / 36.0;
        let n = Vec3::new(a.cos(), a.sin(), 0.0);
        let b = light.face_brightness(&n);
        assert!((FACE_AMBIENT..=1.0).contains(&b), "a={a} b={b}");
        // Two-sided: flipping the normal gives the same value.
        assert_abs_diff_eq!(b, light.face_brightness(&-n), epsilon = 1e-12);
    }
    assert_abs_diff_eq!(light.face_brightness(&light.dir()), 1.0, epsilon = 1e-12);
}

#[test]
fn segment_brightness_is_clamped_and_peaks_towards_light() {
    let (_, light) = light_at(1.0);
    let h = light.horizontal();
    assert_abs_diff_eq!(light.segment_brightness(&h), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(
        light.segment_brightness(&-h),
        SEGMENT_MIN_BRIGHTNESS,
        epsilon = 1e-12
    );
}

#[test]
fn palette_depends_on_kind_and_motion() {
    let wall = |d| Obstacle::Polygonal {
        vertices: vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
        height: 2.0,
        is_dynamic: d,
    };
    let pillar = |d| Obstacle::Circular {
        center: Point::new(0.0, 0.0),
        radius: 0.5,
        height: 1.0,
        is_dynamic: d,
    };
    let colors = [
        base_color(&wall(false)),
        base_color(&wall(true)),
        base_color(&pillar(false)),
        base_color(&pillar(true)),
    ];
    for i in 0..colors.len() {
        for j in (i + 1)..colors.len() {
            assert_ne!(colors[i], colors[j]);
        }
    }
    let e = edge_color(colors[0]);
    assert!(e.r < colors[0].r && e.g < colors[0].g && e.b < colors[0].b);
}
