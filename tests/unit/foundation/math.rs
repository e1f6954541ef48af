use super::*;
use approx::assert_abs_diff_eq;

#[test]
fn wrap_angle_lands_in_half_open_range() {
    assert_abs_diff_eq!(wrap_angle(0.0), 0.0);
    assert_abs_diff_eq!(wrap_angle(PI), PI);
    assert_abs_diff_eq!(wrap_angle(-PI), PI, epsilon = 1e-12);
    assert_abs_diff_eq!(wrap_angle(2.5 * PI), 0.5 * PI, epsilon = 1e-12);
    assert_abs_diff_eq!(wrap_angle(-2.5 * PI), -0.5 * PI, epsilon = 1e-12);
}

#[test]
fn normalize_rejects_zero_vectors() {
    assert!(try_normalize(Vec3::zeros()).is_none());
    let v = try_normalize(Vec3::new(3.0, 0.0, 4.0)).unwrap();
    assert_abs_diff_eq!(v.norm(), 1.0, epsilon = 1e-12);
    assert!(horizontal_unit(Vec3::new(0.0, 0.0, 1.0)).is_none());
    let h = horizontal_unit(Vec3::new(0.3, -0.4, 0.8)).unwrap();
    assert_abs_diff_eq!(h, Vec3::new(0.6, -0.8, 0.0), epsilon = 1e-12);
}

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(255, 128), 128);
}
