use std::f64::consts::PI;

use crate::foundation::core::Vec3;

/// Wrap an angle into `(-pi, pi]`.
pub fn wrap_angle(theta: f64) -> f64 {
    let mut a = theta % (2.0 * PI);
    if a <= -PI {
        a += 2.0 * PI;
    } else if a > PI {
        a -= 2.0 * PI;
    }
    a
}

/// Unit vector along `v`, or `None` when `v` has (near) zero length.
pub fn try_normalize(v: Vec3) -> Option<Vec3> {
    let n = v.norm();
    if !n.is_finite() || n < 1e-12 {
        return None;
    }
    Some(v / n)
}

/// Drop the vertical component and renormalize.
pub fn horizontal_unit(v: Vec3) -> Option<Vec3> {
    try_normalize(Vec3::new(v.x, v.y, 0.0))
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
