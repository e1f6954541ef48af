use super::*;
use crate::camera::model::compute_camera;
use crate::foundation::core::Pose;
use approx::assert_abs_diff_eq;
use std::f64::consts::{FRAC_PI_2, PI};

fn level_camera(theta: f64) -> CameraState {
    compute_camera(&Pose::new(0.0, 0.0, theta), 1.2, 0.0)
}

#[test]
fn focal_and_horizon_follow_vertical_fov() {
    let cam = compute_camera(&Pose::new(0.0, 0.0, 0.0), 1.2, -0.1);
    let p = Projector::new(&cam, FRAC_PI_2, 640, 480, 0.1);
    assert_abs_diff_eq!(p.focal(), 240.0, epsilon = 1e-9);
    // Looking down moves the horizon up.
    let expected = 240.0 - 0.1 * 480.0 / FRAC_PI_2;
    assert_abs_diff_eq!(p.horizon_y(), expected, epsilon = 1e-9);
    assert!(p.horizon_row() < 240);

    let level = Projector::new(&level_camera(0.0), FRAC_PI_2, 640, 480, 0.1);
    assert_eq!(level.horizon_row(), 240);
}

#[test]
fn horizon_row_is_clamped_into_frame() {
    let cam = compute_camera(&Pose::new(0.0, 0.0, 0.0), 1.2, -10.0);
    let p = Projector::new(&cam, FRAC_PI_2, 64, 48, 0.1);
    assert_eq!(p.horizon_row(), 0);
    let cam = compute_camera(&Pose::new(0.0, 0.0, 0.0), 1.2, 10.0);
    let p = Projector::new(&cam, FRAC_PI_2, 64, 48, 0.1);
    assert_eq!(p.horizon_row(), 48);
}

#[test]
fn point_straight_ahead_is_horizontally_centered() {
    let cam = level_camera(0.0);
    let s = project(&Vec3::new(1.0, 0.0, 0.0), &cam, FRAC_PI_2, 640, 480).unwrap();
    assert_abs_diff_eq!(s.x, 320.0, epsilon = 1e-9);
    // Ground point one meter ahead lies below the horizon.
    assert!(s.y > 240.0);
}

#[test]
fn point_on_robot_left_projects_to_left_half() {
    let cam = level_camera(0.0);
    let s = project(&Vec3::new(2.0, 1.0, 0.0), &cam, FRAC_PI_2, 640, 480).unwrap();
    assert!(s.x < 320.0, "left point landed at x = {}", s.x);
    let s = project(&Vec3::new(2.0, -1.0, 0.0), &cam, FRAC_PI_2, 640, 480).unwrap();
    assert!(s.x > 320.0, "right point landed at x = {}", s.x);

    // Same scenario rotated: heading +y, left is -x.
    let cam = level_camera(FRAC_PI_2);
    let s = project(&Vec3::new(-1.0, 2.0, 0.0), &cam, FRAC_PI_2, 640, 480).unwrap();
    assert!(s.x < 320.0);
}

#[test]
fn points_at_or_behind_camera_are_not_visible() {
    for i in 0..16 {
        let theta = -PI + f64::from(i) * PI / 8.0;
        let cam = level_camera(theta);
        for eps in [1e-9, 1e-6, 1e-3, 0.1] {
            let p = Projector::new(&cam, FRAC_PI_2, 320, 240, eps);
            let ahead = cam.forward * (eps * 0.5);
            let at_plane = cam.position + ahead;
            assert!(p.project(&at_plane).is_none(), "theta={theta} eps={eps}");
            assert!(p.project(&cam.position).is_none());
            let behind = cam.position - cam.forward * 3.0 + cam.right * 0.5;
            assert!(p.project(&behind).is_none());
            let visible = cam.position + cam.forward * (eps * 10.0 + 1.0);
            assert!(p.project(&visible).is_some());
        }
    }
}

#[test]
fn ground_specialization_matches_generic_form() {
    let cam = compute_camera(&Pose::new(1.0, 2.0, 0.4), 1.2, -0.05);
    let p = Projector::new(&cam, FRAC_PI_2, 640, 480, 0.1);
    for (x, y) in [(4.0, 3.0), (3.0, 5.0), (6.0, 2.5)] {
        let g = p.project_ground(x, y).unwrap();
        let w = p.project(&Vec3::new(x, y, 0.0)).unwrap();
        assert_abs_diff_eq!(g.x, w.x, epsilon = 1e-9);
        assert_abs_diff_eq!(g.y, w.y, epsilon = 1e-9);
    }
}

#[test]
fn clip_polygon_keeps_visible_part() {
    let quad = [
        Vec3::new(-1.0, 0.0, -1.0),
        Vec3::new(1.0, 0.0, -1.0),
        Vec3::new(1.0, 0.0, 3.0),
        Vec3::new(-1.0, 0.0, 3.0),
    ];
    let clipped = clip_polygon_near(&quad, 0.5);
    assert_eq!(clipped.len(), 4);
    assert!(clipped.iter().all(|p| p.z >= 0.5 - 1e-12));

    let behind = [
        Vec3::new(-1.0, 0.0, -1.0),
        Vec3::new(1.0, 0.0, -1.0),
        Vec3::new(0.0, 0.0, -2.0),
    ];
    assert!(clip_polygon_near(&behind, 0.1).is_empty());
}

#[test]
fn projected_polygon_and_segment_survive_clipping() {
    let cam = level_camera(0.0);
    let p = Projector::new(&cam, FRAC_PI_2, 640, 480, 0.1);
    let quad = [
        Vec3::new(-1.0, -1.2, -1.0),
        Vec3::new(1.0, -1.2, -1.0),
        Vec3::new(1.0, -1.2, 3.0),
        Vec3::new(-1.0, -1.2, 3.0),
    ];
    assert_eq!(p.project_polygon(&quad).len(), 4);

    let seg = p.project_segment(&Vec3::new(0.0, -1.2, -2.0), &Vec3::new(0.0, -1.2, 4.0));
    let (a, b) = seg.unwrap();
    assert_abs_diff_eq!(a.x, 320.0, epsilon = 1e-6);
    assert_abs_diff_eq!(b.x, 320.0, epsilon = 1e-6);
    assert!(
        p.project_segment(&Vec3::new(0.0, 0.0, -2.0), &Vec3::new(0.0, 0.0, -1.0))
            .is_none()
    );
}
