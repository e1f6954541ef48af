//! Fixed palette and the single light model shared by every obstacle face.

use crate::camera::model::CameraState;
use crate::foundation::core::{Rgb8, Vec3};
use crate::foundation::math::{horizontal_unit, try_normalize};
use crate::scene::obstacle::Obstacle;

/// Sky color at the top row.
pub const SKY_TOP: Rgb8 = Rgb8::new(110, 180, 225);
/// Sky color right above the horizon.
pub const SKY_HORIZON: Rgb8 = Rgb8::new(170, 215, 240);
/// Ground color at the horizon.
pub const GROUND: Rgb8 = Rgb8::new(100, 120, 90);
/// Fraction the ground darkens by at the bottom row.
pub const GROUND_DARKENING: f64 = 0.45;
/// Minor grid lines.
pub const GRID_MINOR: Rgb8 = Rgb8::new(88, 106, 80);
/// Major grid lines.
pub const GRID_MAJOR: Rgb8 = Rgb8::new(125, 145, 112);
/// Dashed centerline along the viewing direction.
pub const CENTERLINE: Rgb8 = Rgb8::new(230, 220, 120);
/// Ground shadow under obstacles.
pub const SHADOW: Rgb8 = Rgb8::new(40, 50, 40);

const STATIC_OBSTACLE: Rgb8 = Rgb8::new(220, 100, 80);
const DYNAMIC_OBSTACLE: Rgb8 = Rgb8::new(255, 165, 0);
const STATIC_WALL: Rgb8 = Rgb8::new(210, 210, 210);
const DYNAMIC_WALL: Rgb8 = Rgb8::new(255, 150, 100);

/// Ambient floor of the polygon face model.
pub const FACE_AMBIENT: f64 = 0.4;
/// Lowest brightness a cylinder segment can get.
pub const SEGMENT_MIN_BRIGHTNESS: f64 = 0.3;
/// Highlight boost over the lit face color.
pub const HIGHLIGHT_BOOST: f64 = 1.3;
/// Edge lines are the face color scaled by this.
pub const EDGE_FACTOR: f64 = 0.6;

/// Unshaded color for an obstacle. Polygons use the wall palette.
pub fn base_color(obstacle: &Obstacle) -> Rgb8 {
    match (obstacle, obstacle.is_dynamic()) {
        (Obstacle::Polygonal { .. }, true) => DYNAMIC_WALL,
        (Obstacle::Polygonal { .. }, false) => STATIC_WALL,
        (Obstacle::Circular { .. }, true) => DYNAMIC_OBSTACLE,
        (Obstacle::Circular { .. }, false) => STATIC_OBSTACLE,
    }
}

/// Darker variant used for silhouette edges.
pub fn edge_color(face: Rgb8) -> Rgb8 {
    face.scaled(EDGE_FACTOR)
}

/// World-space light direction for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    dir: Vec3,
    horizontal: Vec3,
}

impl Light {
    /// Convert a camera-relative `[right, forward, up]` light direction to world space.
    ///
    /// A zero vector falls back to straight up.
    pub fn from_camera(camera: &CameraState, light_dir: [f64; 3]) -> Self {
        let dir = try_normalize(camera.camera_dir_to_world(light_dir)).unwrap_or_else(Vec3::z);
        let horizontal = horizontal_unit(dir).unwrap_or(camera.forward);
        Self { dir, horizontal }
    }

    /// Unit direction towards the light.
    pub fn dir(&self) -> Vec3 {
        self.dir
    }

    /// Unit direction towards the light with the vertical part removed.
    pub fn horizontal(&self) -> Vec3 {
        self.horizontal
    }

    /// Brightness of a flat face with unit normal `n`: `0.4 + 0.6 * |n . L|`.
    pub fn face_brightness(&self, n: &Vec3) -> f64 {
        FACE_AMBIENT + (1.0 - FACE_AMBIENT) * n.dot(&self.dir).abs().min(1.0)
    }

    /// Brightness of a cylinder segment with outward horizontal normal `n`.
    pub fn segment_brightness(&self, n: &Vec3) -> f64 {
        n.dot(&self.horizontal).clamp(SEGMENT_MIN_BRIGHTNESS, 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/shading.rs"]
mod tests;
