use crate::foundation::core::{Pose, Vec3};

/// Camera placement and orthonormal view basis derived from one [`Pose`].
///
/// `(right, up, -forward)` is a right-handed frame: the camera looks along `forward`,
/// `right` points to the right of the image and `up` is world-up. The basis is never
/// pitched; [`CameraState::pitch`] only moves the horizon row (see
/// [`Projector`](crate::Projector)).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    /// Camera center in world space.
    pub position: Vec3,
    /// Unit viewing direction in the ground plane.
    pub forward: Vec3,
    /// Unit vector towards the right edge of the image.
    pub right: Vec3,
    /// Unit world-up vector.
    pub up: Vec3,
    /// Constant downward tilt (radians, negative looks down).
    pub pitch: f64,
}

/// Derive the camera for a robot pose.
///
/// `right` is always `up x (-forward)`, i.e. `(sin theta, -cos theta, 0)`. Guessing the sign
/// or swapping axes here mirrors or skews every rendered frame.
pub fn compute_camera(pose: &Pose, camera_height: f64, pitch_angle: f64) -> CameraState {
    let (s, c) = pose.theta.sin_cos();
    let forward = Vec3::new(c, s, 0.0);
    let up = Vec3::z();
    let right = up.cross(&(-forward));
    CameraState {
        position: Vec3::new(pose.x, pose.y, camera_height),
        forward,
        right,
        up,
        pitch: pitch_angle,
    }
}

impl CameraState {
    /// Transform a world point into camera space `(x: right, y: up, z: depth)`.
    pub fn to_camera(&self, p_world: &Vec3) -> Vec3 {
        let d = p_world - self.position;
        Vec3::new(d.dot(&self.right), d.dot(&self.up), d.dot(&self.forward))
    }

    /// Camera-space depth (distance along `forward`) of a world point.
    pub fn depth_of(&self, p_world: &Vec3) -> f64 {
        (p_world - self.position).dot(&self.forward)
    }

    /// Express a camera-relative `[right, forward, up]` direction in world space.
    pub fn camera_dir_to_world(&self, dir: [f64; 3]) -> Vec3 {
        self.right * dir[0] + self.forward * dir[1] + self.up * dir[2]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/camera/model.rs"]
mod tests;
