use smallvec::SmallVec;

use crate::camera::model::CameraState;
use crate::foundation::core::{Point, Vec3};
use crate::scene::config::RenderConfig;

/// Smallest depth accepted by the free [`project`] function.
pub const DEPTH_EPSILON: f64 = 1e-6;

/// Pinhole projection for one frame.
///
/// Built once per frame from a single [`CameraState`]; every primitive of that frame goes
/// through the same projector.
#[derive(Clone, Debug)]
pub struct Projector {
    camera: CameraState,
    focal: f64,
    center_x: f64,
    horizon_y: f64,
    width: f64,
    height: f64,
    near: f64,
}

impl Projector {
    /// Build a projector from a vertical field of view (radians) and image size.
    ///
    /// Points with camera depth `<= near` are not visible.
    pub fn new(camera: &CameraState, fov_rad: f64, width: u32, height: u32, near: f64) -> Self {
        let h = f64::from(height);
        let focal = h / (2.0 * (fov_rad / 2.0).tan());
        let horizon_y = h / 2.0 + camera.pitch * (h / fov_rad);
        Self {
            camera: *camera,
            focal,
            center_x: f64::from(width) / 2.0,
            horizon_y,
            width: f64::from(width),
            height: h,
            near,
        }
    }

    /// Projector using the frame geometry and near plane from `cfg`.
    pub fn from_config(camera: &CameraState, cfg: &RenderConfig) -> Self {
        Self::new(
            camera,
            cfg.fov_rad(),
            cfg.width,
            cfg.height,
            cfg.near_plane_m,
        )
    }

    /// Camera this projector was built from.
    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    /// Focal length in pixels.
    pub fn focal(&self) -> f64 {
        self.focal
    }

    /// Near-plane depth.
    pub fn near(&self) -> f64 {
        self.near
    }

    /// Image width in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Sub-pixel horizon position (may lie outside the image for extreme pitch).
    pub fn horizon_y(&self) -> f64 {
        self.horizon_y
    }

    /// First ground row: sky covers `[0, horizon_row)`, ground `[horizon_row, height)`.
    pub fn horizon_row(&self) -> u32 {
        self.horizon_y.round().clamp(0.0, self.height) as u32
    }

    /// Project a world point; `None` when it is at or behind the near plane.
    pub fn project(&self, p_world: &Vec3) -> Option<Point> {
        self.project_camera(&self.camera.to_camera(p_world))
    }

    /// Project a point already expressed in camera space.
    pub fn project_camera(&self, p_cam: &Vec3) -> Option<Point> {
        let depth = p_cam.z;
        if !(depth > self.near) {
            return None;
        }
        Some(Point::new(
            self.center_x + (p_cam.x / depth) * self.focal,
            self.horizon_y - (p_cam.y / depth) * self.focal,
        ))
    }

    /// Project a ground-plane point `(x, y, 0)`.
    pub fn project_ground(&self, x: f64, y: f64) -> Option<Point> {
        let p_cam = self.camera.to_camera(&Vec3::new(x, y, 0.0));
        let depth = p_cam.z;
        if !(depth > self.near) {
            return None;
        }
        Some(Point::new(
            self.center_x + (p_cam.x / depth) * self.focal,
            self.horizon_y + self.focal * self.camera.position.z / depth,
        ))
    }

    /// Whether a screen point lies inside the image rectangle.
    pub fn in_frame(&self, p: Point) -> bool {
        p.x >= 0.0 && p.x < self.width && p.y >= 0.0 && p.y < self.height
    }

    /// Clip a camera-space polygon to the visible half-space and project it.
    ///
    /// Returns an empty list when the polygon lies entirely at or behind the near plane.
    pub fn project_polygon(&self, poly_cam: &[Vec3]) -> SmallVec<[Point; 8]> {
        clip_polygon_near(poly_cam, self.near)
            .iter()
            .filter_map(|p| self.project_camera(&nudge_past(*p, self.near)))
            .collect()
    }

    /// Clip a camera-space segment to the visible half-space and project both ends.
    pub fn project_segment(&self, a_cam: &Vec3, b_cam: &Vec3) -> Option<(Point, Point)> {
        let (a, b) = clip_segment_near(a_cam, b_cam, self.near)?;
        Some((
            self.project_camera(&nudge_past(a, self.near))?,
            self.project_camera(&nudge_past(b, self.near))?,
        ))
    }
}

/// Project a world point for a camera, vertical fov (radians) and image size.
///
/// Returns `None` for points at or behind the camera plane.
pub fn project(
    point_world: &Vec3,
    camera_state: &CameraState,
    fov: f64,
    image_w: u32,
    image_h: u32,
) -> Option<Point> {
    Projector::new(camera_state, fov, image_w, image_h, DEPTH_EPSILON).project(point_world)
}

/// Sutherland-Hodgman clip of a camera-space polygon against `z >= near`.
pub fn clip_polygon_near(poly: &[Vec3], near: f64) -> SmallVec<[Vec3; 8]> {
    let mut out = SmallVec::new();
    let n = poly.len();
    if n == 0 {
        return out;
    }
    for i in 0..n {
        let cur = poly[i];
        let prev = poly[(i + n - 1) % n];
        let cur_in = cur.z >= near;
        let prev_in = prev.z >= near;
        if cur_in {
            if !prev_in {
                out.push(intersect_near(&prev, &cur, near));
            }
            out.push(cur);
        } else if prev_in {
            out.push(intersect_near(&prev, &cur, near));
        }
    }
    out
}

/// Clip a camera-space segment against `z >= near`.
pub fn clip_segment_near(a: &Vec3, b: &Vec3, near: f64) -> Option<(Vec3, Vec3)> {
    match (a.z >= near, b.z >= near) {
        (true, true) => Some((*a, *b)),
        (false, false) => None,
        (true, false) => Some((*a, intersect_near(a, b, near))),
        (false, true) => Some((intersect_near(a, b, near), *b)),
    }
}

fn intersect_near(a: &Vec3, b: &Vec3, near: f64) -> Vec3 {
    let t = (near - a.z) / (b.z - a.z);
    a + (b - a) * t
}

// Points clipped exactly onto the near plane would be rejected by the strict depth test.
fn nudge_past(p: Vec3, near: f64) -> Vec3 {
    if p.z <= near {
        Vec3::new(p.x, p.y, near + near * 1e-9 + f64::EPSILON)
    } else {
        p
    }
}

#[cfg(test)]
#[path = "../../tests/unit/camera/projection.rs"]
mod tests;
