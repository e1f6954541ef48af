use std::f64::consts::TAU;

use smallvec::SmallVec;

use crate::camera::model::CameraState;
use crate::camera::projection::Projector;
use crate::foundation::core::{Point, Rgb8, Vec3};
use crate::foundation::math::{horizontal_unit, try_normalize};
use crate::render::painter::{PaintList, ellipse_points};
use crate::render::shading::{HIGHLIGHT_BOOST, Light, SHADOW, base_color, edge_color};
use crate::scene::config::RenderConfig;
use crate::scene::obstacle::Obstacle;

/// Cylinders smaller than this on screen (radius, pixels) are skipped.
pub const MIN_SCREEN_RADIUS_PX: f64 = 2.0;

const SHADOW_SCALE: f64 = 1.1;
const SHADOW_OFFSET_M: f64 = 0.15;
const SHADOW_MAX_OFFSET_PX: f64 = 12.0;
const THIN_WALL_SHADOW_M: f64 = 0.1;
const EDGE_PX: f64 = 1.0;
const HIGHLIGHT_SEGMENTS: usize = 16;

/// One projected, shaded face of an obstacle for a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenPrimitive {
    /// Screen-space outline in order.
    pub points: Vec<Point>,
    /// Fill color with shading applied.
    pub fill: Rgb8,
    /// Optional outline color.
    pub edge: Option<Rgb8>,
    /// Camera-space depth of the face center.
    pub depth: f64,
}

impl ScreenPrimitive {
    /// Queue this primitive's fill and outline.
    pub fn paint_into(&self, list: &mut PaintList) {
        list.polygon(&self.points, self.fill);
        if let Some(edge) = self.edge {
            list.outline(&self.points, EDGE_PX, edge);
        }
    }
}

/// Sort key used for back-to-front ordering: camera depth of the obstacle centroid.
pub fn obstacle_depth(obstacle: &Obstacle, camera: &CameraState) -> f64 {
    let c = obstacle.centroid();
    camera.depth_of(&Vec3::new(c.x, c.y, 0.0))
}

/// Obstacles ordered farthest first. Ties keep input order.
pub fn back_to_front<'a>(obstacles: &'a [Obstacle], camera: &CameraState) -> Vec<&'a Obstacle> {
    let mut keyed: Vec<(f64, &Obstacle)> = obstacles
        .iter()
        .map(|o| (obstacle_depth(o, camera), o))
        .collect();
    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    keyed.into_iter().map(|(_, o)| o).collect()
}

/// Project and shade one obstacle.
///
/// Primitives come back in painting order: ground shadow, side faces far to near, then the
/// top cap and highlight. Culled obstacles yield an empty list.
pub fn rasterize(
    obstacle: &Obstacle,
    projector: &Projector,
    light: &Light,
    cfg: &RenderConfig,
) -> Vec<ScreenPrimitive> {
    let cam = projector.camera();
    let c = obstacle.centroid();
    let reach = obstacle.bounding_radius();
    let horizontal = Point::new(cam.position.x, cam.position.y).distance(c);
    if horizontal - reach > cfg.view_distance_m {
        tracing::debug!(distance = horizontal, "obstacle culled: beyond view distance");
        return Vec::new();
    }
    if obstacle_depth(obstacle, cam) + reach <= projector.near() {
        tracing::debug!("obstacle culled: behind camera");
        return Vec::new();
    }

    let out = match obstacle {
        Obstacle::Polygonal {
            vertices, height, ..
        } => polygon_prims(obstacle, vertices, *height, projector, light),
        Obstacle::Circular {
            center,
            radius,
            height,
            ..
        } => cylinder_prims(obstacle, *center, *radius, *height, projector, light, cfg),
    };
    if out.is_empty() {
        tracing::debug!("obstacle culled: outside frame");
    }
    out
}

fn polygon_prims(
    obstacle: &Obstacle,
    vertices: &[Point],
    height: f64,
    projector: &Projector,
    light: &Light,
) -> Vec<ScreenPrimitive> {
    let cam = projector.camera();
    let eye = Point::new(cam.position.x, cam.position.y);
    let base = base_color(obstacle);
    let mut out = Vec::new();

    let n = vertices.len();
    let ccw = signed_area(vertices) >= 0.0;
    let thin = n == 2;

    if let Some(p) = shadow_prim(&footprint(vertices), projector, obstacle) {
        out.push(p);
    }

    let edge_count = if thin { 1 } else { n };
    let mut faces: SmallVec<[ScreenPrimitive; 8]> = SmallVec::new();
    for i in 0..edge_count {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let d = b - a;
        let len = d.hypot();
        if len < 1e-9 {
            continue;
        }
        let mid = a.midpoint(b);
        let mut normal = if ccw {
            Vec3::new(d.y / len, -d.x / len, 0.0)
        } else {
            Vec3::new(-d.y / len, d.x / len, 0.0)
        };
        let to_eye = Vec3::new(eye.x - mid.x, eye.y - mid.y, 0.0);
        if normal.dot(&to_eye) <= 0.0 {
            if !thin {
                continue;
            }
            normal = -normal;
        }

        let quad = [
            Vec3::new(a.x, a.y, 0.0),
            Vec3::new(b.x, b.y, 0.0),
            Vec3::new(b.x, b.y, height),
            Vec3::new(a.x, a.y, height),
        ]
        .map(|p| cam.to_camera(&p));
        let fill = base.scaled(light.face_brightness(&normal));
        let depth = cam.depth_of(&Vec3::new(mid.x, mid.y, height / 2.0));
        if let Some(p) = visible_prim(&quad, projector, fill, Some(edge_color(fill)), depth) {
            faces.push(p);
        }
    }
    faces.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    let drew_faces = !faces.is_empty();
    out.extend(faces);

    if !thin && cam.position.z > height {
        let cap: SmallVec<[Vec3; 8]> = vertices
            .iter()
            .map(|p| cam.to_camera(&Vec3::new(p.x, p.y, height)))
            .collect();
        let fill = base.scaled(light.face_brightness(&Vec3::z()));
        let depth = obstacle_depth(obstacle, cam);
        if let Some(p) = visible_prim(&cap, projector, fill, Some(edge_color(fill)), depth) {
            out.push(p);
        }
    }

    // A lone shadow without any body is not drawn.
    if !drew_faces && out.len() <= 1 {
        out.clear();
    }
    out
}

fn cylinder_prims(
    obstacle: &Obstacle,
    center: Point,
    radius: f64,
    height: f64,
    projector: &Projector,
    light: &Light,
    cfg: &RenderConfig,
) -> Vec<ScreenPrimitive> {
    let cam = projector.camera();
    let eye = Point::new(cam.position.x, cam.position.y);
    if eye.distance(center) <= radius {
        tracing::debug!("obstacle culled: camera inside cylinder");
        return Vec::new();
    }
    let center_depth = cam.depth_of(&Vec3::new(center.x, center.y, 0.0));
    if center_depth > projector.near()
        && projector.focal() * radius / center_depth < MIN_SCREEN_RADIUS_PX
    {
        tracing::debug!("obstacle culled: below minimum screen size");
        return Vec::new();
    }

    let base = base_color(obstacle);
    let segments = cfg.cylinder_segments.max(3) as usize;
    let ring = |r: f64, z: f64| -> Vec<Vec3> {
        (0..segments)
            .map(|i| {
                let a = TAU * (i as f64) / (segments as f64);
                Vec3::new(center.x + r * a.cos(), center.y + r * a.sin(), z)
            })
            .collect()
    };

    let mut out = Vec::new();
    let shadow_ring: Vec<Point> = ring(radius * SHADOW_SCALE, 0.0)
        .iter()
        .map(|p| Point::new(p.x, p.y))
        .collect();
    if let Some(p) = shadow_prim(&shadow_ring, projector, obstacle) {
        out.push(p);
    }

    let bottom = ring(radius, 0.0);
    let mut faces = Vec::with_capacity(segments / 2 + 1);
    for i in 0..segments {
        let a0 = bottom[i];
        let a1 = bottom[(i + 1) % segments];
        let mid_angle = TAU * (i as f64 + 0.5) / (segments as f64);
        let normal = Vec3::new(mid_angle.cos(), mid_angle.sin(), 0.0);
        let mid = (a0 + a1) / 2.0;
        let to_eye = Vec3::new(eye.x - mid.x, eye.y - mid.y, 0.0);
        if normal.dot(&to_eye) <= 0.0 {
            continue;
        }
        let quad = [
            a0,
            a1,
            Vec3::new(a1.x, a1.y, height),
            Vec3::new(a0.x, a0.y, height),
        ]
        .map(|p| cam.to_camera(&p));
        let fill = base.scaled(light.segment_brightness(&normal));
        let depth = cam.depth_of(&Vec3::new(mid.x, mid.y, height / 2.0));
        if let Some(p) = visible_prim(&quad, projector, fill, None, depth) {
            faces.push(p);
        }
    }
    if faces.is_empty() {
        return Vec::new();
    }
    faces.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    out.extend(faces);

    if cam.position.z > height {
        let cap: Vec<Vec3> = ring(radius, height)
            .iter()
            .map(|p| cam.to_camera(p))
            .collect();
        let fill = base.scaled(light.face_brightness(&Vec3::z()));
        if let Some(p) = visible_prim(&cap, projector, fill, Some(edge_color(fill)), center_depth)
        {
            out.push(p);
        }
    }

    if let Some(p) = highlight_prim(center, radius, height, base, projector, light) {
        out.push(p);
    }
    out
}

// Bright patch on the side of the cylinder away from the light, in screen terms.
fn highlight_prim(
    center: Point,
    radius: f64,
    height: f64,
    base: Rgb8,
    projector: &Projector,
    light: &Light,
) -> Option<ScreenPrimitive> {
    let cam = projector.camera();
    let light_side = light.horizontal().dot(&cam.right);
    let side = if light_side >= 0.0 { -1.0 } else { 1.0 };
    let to_eye = Vec3::new(cam.position.x - center.x, cam.position.y - center.y, 0.0);
    let facing = horizontal_unit(to_eye)?;
    let normal = try_normalize(facing + cam.right * side)?;

    let anchor = Vec3::new(
        center.x + normal.x * radius * 0.5,
        center.y + normal.y * radius * 0.5,
        height * 0.6,
    );
    let depth = cam.depth_of(&anchor);
    let at = projector.project(&anchor)?;
    let rx = projector.focal() * radius / 3.0 / depth;
    let ry = projector.focal() * height / 6.0 / depth;
    let fill = base.scaled(HIGHLIGHT_BOOST);
    let points = ellipse_points(at, rx / 2.0, ry / 2.0, HIGHLIGHT_SEGMENTS);
    if !overlaps_frame(&points, projector) {
        return None;
    }
    Some(ScreenPrimitive {
        points,
        fill,
        edge: None,
        depth,
    })
}

fn shadow_prim(
    footprint: &[Point],
    projector: &Projector,
    obstacle: &Obstacle,
) -> Option<ScreenPrimitive> {
    let cam = projector.camera();
    let ground: SmallVec<[Vec3; 8]> = footprint
        .iter()
        .map(|p| cam.to_camera(&Vec3::new(p.x, p.y, 0.0)))
        .collect();
    let depth = obstacle_depth(obstacle, cam).max(projector.near());
    let shift = (projector.focal() * SHADOW_OFFSET_M / depth).clamp(1.0, SHADOW_MAX_OFFSET_PX);
    let points: Vec<Point> = projector
        .project_polygon(&ground)
        .iter()
        .map(|p| Point::new(p.x + shift, p.y + shift * 0.5))
        .collect();
    if points.len() < 3 || !overlaps_frame(&points, projector) {
        return None;
    }
    Some(ScreenPrimitive {
        points,
        fill: SHADOW,
        edge: None,
        depth,
    })
}

fn visible_prim(
    poly_cam: &[Vec3],
    projector: &Projector,
    fill: Rgb8,
    edge: Option<Rgb8>,
    depth: f64,
) -> Option<ScreenPrimitive> {
    let points: Vec<Point> = projector.project_polygon(poly_cam).into_iter().collect();
    if points.len() < 3 || !overlaps_frame(&points, projector) {
        return None;
    }
    Some(ScreenPrimitive {
        points,
        fill,
        edge,
        depth,
    })
}

/// Whether the bounding box of `points` intersects the image.
fn overlaps_frame(points: &[Point], projector: &Projector) -> bool {
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    max.x >= 0.0 && max.y >= 0.0 && min.x < projector.width() && min.y < projector.height()
}

fn footprint(vertices: &[Point]) -> SmallVec<[Point; 8]> {
    if vertices.len() != 2 {
        return vertices.iter().copied().collect();
    }
    let (a, b) = (vertices[0], vertices[1]);
    let d = b - a;
    let len = d.hypot().max(1e-9);
    let n = kurbo::Vec2::new(-d.y / len, d.x / len) * THIN_WALL_SHADOW_M;
    [a + n, b + n, b - n, a - n].into_iter().collect()
}

fn signed_area(vertices: &[Point]) -> f64 {
    let n = vertices.len();
    (0..n)
        .map(|i| {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        / 2.0
}

#[cfg(test)]
#[path = "../../tests/unit/render/rasterize.rs"]
mod tests;
