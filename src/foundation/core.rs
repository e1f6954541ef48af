use crate::foundation::error::{EgoviewError, EgoviewResult};

pub use kurbo::Point;

/// World-space 3D vector (meters). `z` points up.
pub type Vec3 = nalgebra::Vector3<f64>;

/// Absolute 0-based trajectory step index.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> EgoviewResult<Self> {
        if den == 0 {
            return Err(EgoviewError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(EgoviewError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }
}

/// Robot pose at one trajectory step: position in meters, heading in radians.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pose {
    /// World x (meters).
    pub x: f64,
    /// World y (meters).
    pub y: f64,
    /// Heading (radians, counter-clockwise from +x).
    pub theta: f64,
}

impl Pose {
    /// Create a pose.
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    /// Reject poses with non-finite components.
    pub fn validate(&self) -> EgoviewResult<()> {
        if !(self.x.is_finite() && self.y.is_finite() && self.theta.is_finite()) {
            return Err(EgoviewError::validation(format!(
                "pose ({}, {}, {}) must be finite",
                self.x, self.y, self.theta
            )));
        }
        Ok(())
    }
}

/// Opaque RGB8 color in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Build a color from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Multiply every channel by `factor`, clamping to `[0, 255]`.
    ///
    /// Factors above `1.0` brighten (used for highlights).
    pub fn scaled(self, factor: f64) -> Self {
        let f = if factor.is_finite() {
            factor.max(0.0)
        } else {
            0.0
        };
        let ch = |c: u8| -> u8 { (f64::from(c) * f).round().clamp(0.0, 255.0) as u8 };
        Self {
            r: ch(self.r),
            g: ch(self.g),
            b: ch(self.b),
        }
    }

    /// Linear blend towards `other` by `t` in `[0, 1]`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| -> u8 {
            (f64::from(a) + (f64::from(b) - f64::from(a)) * t)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Self {
            r: ch(self.r, other.r),
            g: ch(self.g, other.g),
            b: ch(self.b, other.b),
        }
    }

    /// Channels as `[r, g, b]`.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
