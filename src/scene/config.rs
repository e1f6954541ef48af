use std::path::Path;

use crate::foundation::core::{Fps, Vec3};
use crate::foundation::error::{EgoviewError, EgoviewResult};

/// Upper bound on ground grid lines along each axis.
pub const MAX_GRID_LINES_PER_AXIS: u32 = 500;

/// Frame configuration shared by every step of an episode.
///
/// All fields have defaults so partial JSON documents are accepted.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Vertical field of view in degrees.
    pub fov_deg: f64,
    /// Camera height above the ground plane (meters).
    pub camera_height_m: f64,
    /// Extrusion height for wall-sized polygonal obstacles.
    pub wall_height_m: f64,
    /// Extrusion height for ordinary obstacles.
    pub obstacle_height_m: f64,
    /// Output frame rate (frames per second).
    pub fps: u32,
    /// Constant downward camera tilt (radians, negative looks down).
    ///
    /// Only shifts the horizon row; the camera basis stays level.
    pub pitch_rad: f64,
    /// Camera-space depth at or below which geometry is not visible.
    pub near_plane_m: f64,
    /// Obstacles farther than this are skipped.
    pub view_distance_m: f64,
    /// Ground grid spacing (meters).
    pub grid_spacing_m: f64,
    /// Every Nth grid line is drawn as a major line.
    pub grid_major_every: u32,
    /// Half-extent of the ground grid around the camera (meters).
    pub grid_extent_m: f64,
    /// Direction towards the light as camera-relative `[right, forward, up]`.
    pub light_dir: [f64; 3],
    /// Number of angular segments used for cylinder silhouettes.
    pub cylinder_segments: u32,
    /// Apply one 3x3 smoothing pass to finished frames.
    pub smooth: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fov_deg: 90.0,
            camera_height_m: 1.2,
            wall_height_m: 2.5,
            obstacle_height_m: 1.5,
            fps: 10,
            pitch_rad: -0.05,
            near_plane_m: 0.1,
            view_distance_m: 50.0,
            grid_spacing_m: 1.0,
            grid_major_every: 5,
            grid_extent_m: 30.0,
            light_dir: [0.3, -0.5, 0.8],
            cylinder_segments: 36,
            smooth: false,
        }
    }
}

impl RenderConfig {
    /// Parse a JSON config document.
    pub fn from_json_str(s: &str) -> EgoviewResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| EgoviewError::serde(format!("invalid render config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> EgoviewResult<Self> {
        use anyhow::Context as _;
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read render config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Check every field for a usable value.
    pub fn validate(&self) -> EgoviewResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EgoviewError::validation(
                "frame width/height must be non-zero",
            ));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(EgoviewError::validation(format!(
                "frame size {}x{} exceeds {}",
                self.width,
                self.height,
                u16::MAX
            )));
        }
        if !(self.fov_deg.is_finite() && self.fov_deg > 0.0 && self.fov_deg < 180.0) {
            return Err(EgoviewError::validation(
                "fov_deg must be in the open range (0, 180)",
            ));
        }
        positive("camera_height_m", self.camera_height_m)?;
        positive("wall_height_m", self.wall_height_m)?;
        positive("obstacle_height_m", self.obstacle_height_m)?;
        positive("near_plane_m", self.near_plane_m)?;
        positive("view_distance_m", self.view_distance_m)?;
        positive("grid_spacing_m", self.grid_spacing_m)?;
        positive("grid_extent_m", self.grid_extent_m)?;
        let lines_per_axis = 2.0 * self.grid_extent_m / self.grid_spacing_m;
        if lines_per_axis > f64::from(MAX_GRID_LINES_PER_AXIS) {
            return Err(EgoviewError::validation(format!(
                "grid_extent_m and grid_spacing_m give {lines_per_axis:.0} lines per axis (max {MAX_GRID_LINES_PER_AXIS})"
            )));
        }
        if !self.pitch_rad.is_finite() {
            return Err(EgoviewError::validation("pitch_rad must be finite"));
        }
        if self.fps == 0 {
            return Err(EgoviewError::validation("fps must be > 0"));
        }
        if self.grid_major_every == 0 {
            return Err(EgoviewError::validation("grid_major_every must be >= 1"));
        }
        if self.cylinder_segments < 3 {
            return Err(EgoviewError::validation(
                "cylinder_segments must be >= 3",
            ));
        }
        let l = self.light_dir;
        if l.iter().any(|c| !c.is_finite()) || Vec3::new(l[0], l[1], l[2]).norm() < 1e-9 {
            return Err(EgoviewError::validation(
                "light_dir must be a finite, non-zero vector",
            ));
        }
        Ok(())
    }

    /// Vertical field of view in radians.
    pub fn fov_rad(&self) -> f64 {
        self.fov_deg.to_radians()
    }

    /// Output frame rate as a rational.
    pub fn fps(&self) -> EgoviewResult<Fps> {
        Fps::new(self.fps, 1)
    }
}

fn positive(name: &str, v: f64) -> EgoviewResult<()> {
    if !(v.is_finite() && v > 0.0) {
        return Err(EgoviewError::validation(format!(
            "{name} must be finite and > 0 (got {v})"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
