use crate::foundation::core::Point;
use crate::foundation::error::{EgoviewError, EgoviewResult};

/// One obstacle snapshot for a single step, already placed in world coordinates.
///
/// The renderer only reads obstacles; `is_dynamic` selects the palette.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Obstacle {
    /// Vertical extrusion of a ground-plane polygon from `z = 0` to `z = height`.
    Polygonal {
        /// Ground-plane outline in order. Two vertices describe a thin wall.
        vertices: Vec<Point>,
        /// Extrusion height (meters).
        height: f64,
        /// Moving obstacle (palette selection only).
        is_dynamic: bool,
    },
    /// Upright cylinder standing on the ground plane.
    Circular {
        /// Ground-plane center.
        center: Point,
        /// Radius (meters).
        radius: f64,
        /// Cylinder height (meters).
        height: f64,
        /// Moving obstacle (palette selection only).
        is_dynamic: bool,
    },
}

impl Obstacle {
    /// Whether the obstacle uses the dynamic palette.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::Polygonal { is_dynamic, .. } | Self::Circular { is_dynamic, .. } => *is_dynamic,
        }
    }

    /// Extrusion height in meters.
    pub fn height(&self) -> f64 {
        match self {
            Self::Polygonal { height, .. } | Self::Circular { height, .. } => *height,
        }
    }

    /// Ground-plane centroid (vertex average for polygons).
    pub fn centroid(&self) -> Point {
        match self {
            Self::Polygonal { vertices, .. } => polygon_centroid(vertices),
            Self::Circular { center, .. } => *center,
        }
    }

    /// Largest distance from the centroid to the outline.
    pub fn bounding_radius(&self) -> f64 {
        match self {
            Self::Polygonal { vertices, .. } => {
                let c = self.centroid();
                vertices
                    .iter()
                    .map(|p| p.distance(c))
                    .fold(0.0, f64::max)
            }
            Self::Circular { radius, .. } => *radius,
        }
    }

    /// Reject non-finite coordinates and degenerate shapes.
    pub fn validate(&self) -> EgoviewResult<()> {
        let h = self.height();
        if !(h.is_finite() && h > 0.0) {
            return Err(EgoviewError::validation(format!(
                "obstacle height must be finite and > 0 (got {h})"
            )));
        }
        match self {
            Self::Polygonal { vertices, .. } => {
                if vertices.len() < 2 {
                    return Err(EgoviewError::validation(
                        "polygonal obstacle needs at least 2 vertices",
                    ));
                }
                if vertices.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
                    return Err(EgoviewError::validation(
                        "polygonal obstacle vertices must be finite",
                    ));
                }
            }
            Self::Circular { center, radius, .. } => {
                if !(center.x.is_finite() && center.y.is_finite()) {
                    return Err(EgoviewError::validation(
                        "circular obstacle center must be finite",
                    ));
                }
                if !(radius.is_finite() && *radius > 0.0) {
                    return Err(EgoviewError::validation(format!(
                        "circular obstacle radius must be finite and > 0 (got {radius})"
                    )));
                }
            }
        }
        Ok(())
    }
}

pub(crate) fn polygon_centroid(vertices: &[Point]) -> Point {
    if vertices.is_empty() {
        return Point::ZERO;
    }
    let n = vertices.len() as f64;
    let (sx, sy) = vertices
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/obstacle.rs"]
mod tests;
