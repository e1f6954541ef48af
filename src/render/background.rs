use crate::camera::projection::Projector;
use crate::foundation::core::{Rgb8, Vec3};
use crate::foundation::error::EgoviewResult;
use crate::render::frame::FrameRGB;
use crate::render::painter::{PaintList, Painter};
use crate::render::shading::{
    CENTERLINE, GRID_MAJOR, GRID_MINOR, GROUND, GROUND_DARKENING, SKY_HORIZON, SKY_TOP,
};
use crate::scene::config::RenderConfig;

const MINOR_LINE_PX: f64 = 1.0;
const MAJOR_LINE_PX: f64 = 2.0;
const DASH_LEN_M: f64 = 1.0;
const DASH_GAP_M: f64 = 1.0;
const DASH_HALF_WIDTH_M: f64 = 0.05;
const DASH_START_M: f64 = 0.5;

/// Render the base frame for one step: sky and ground gradients, ground grid and the dashed
/// heading guide.
///
/// Sky covers rows `[0, horizon_row)` and ground `[horizon_row, height)`.
pub fn compose(
    projector: &Projector,
    cfg: &RenderConfig,
    painter: &mut Painter,
) -> EgoviewResult<FrameRGB> {
    let mut frame = FrameRGB::filled(cfg.width, cfg.height, GROUND);
    fill_gradients(&mut frame, projector.horizon_row());

    let mut list = PaintList::new();
    grid_lines(projector, cfg, &mut list);
    centerline(projector, cfg, &mut list);
    painter.paint(&mut frame, &list)?;
    Ok(frame)
}

/// Fill sky and ground ramps split at `horizon_row`.
pub fn fill_gradients(frame: &mut FrameRGB, horizon_row: u32) {
    let h = frame.height;
    let horizon = horizon_row.min(h);
    let sky_span = f64::from(horizon.saturating_sub(1).max(1));
    for y in 0..horizon {
        let t = f64::from(y) / sky_span;
        frame.fill_row(y, SKY_TOP.lerp(SKY_HORIZON, t));
    }
    let ground_span = f64::from((h - horizon).saturating_sub(1).max(1));
    for y in horizon..h {
        let t = f64::from(y - horizon) / ground_span;
        frame.fill_row(y, GROUND.scaled(1.0 - GROUND_DARKENING * t));
    }
}

fn grid_lines(projector: &Projector, cfg: &RenderConfig, list: &mut PaintList) {
    let cam = projector.camera();
    let s = cfg.grid_spacing_m;
    let extent = cfg.grid_extent_m;
    let (cx, cy) = (cam.position.x, cam.position.y);
    let lo_x = ((cx - extent) / s).floor() as i64;
    let hi_x = ((cx + extent) / s).ceil() as i64;
    let lo_y = ((cy - extent) / s).floor() as i64;
    let hi_y = ((cy + extent) / s).ceil() as i64;
    let major = i64::from(cfg.grid_major_every);

    // Lines are split per cell so the off-frame test below never drops a visible stretch.
    for i in lo_x..=hi_x {
        let x = i as f64 * s;
        let (color, width) = line_style(i, major);
        for j in lo_y..hi_y {
            let a = Vec3::new(x, j as f64 * s, 0.0);
            let b = Vec3::new(x, (j + 1) as f64 * s, 0.0);
            ground_segment(projector, &a, &b, width, color, list);
        }
    }
    for j in lo_y..=hi_y {
        let y = j as f64 * s;
        let (color, width) = line_style(j, major);
        for i in lo_x..hi_x {
            let a = Vec3::new(i as f64 * s, y, 0.0);
            let b = Vec3::new((i + 1) as f64 * s, y, 0.0);
            ground_segment(projector, &a, &b, width, color, list);
        }
    }
}

fn line_style(index: i64, major_every: i64) -> (Rgb8, f64) {
    if index.rem_euclid(major_every) == 0 {
        (GRID_MAJOR, MAJOR_LINE_PX)
    } else {
        (GRID_MINOR, MINOR_LINE_PX)
    }
}

fn ground_segment(
    projector: &Projector,
    a: &Vec3,
    b: &Vec3,
    width: f64,
    color: Rgb8,
    list: &mut PaintList,
) {
    let cam = projector.camera();
    let Some((pa, pb)) = projector.project_segment(&cam.to_camera(a), &cam.to_camera(b)) else {
        return;
    };
    if !projector.in_frame(pa) && !projector.in_frame(pb) {
        return;
    }
    list.segment(pa, pb, width, color);
}

fn centerline(projector: &Projector, cfg: &RenderConfig, list: &mut PaintList) {
    let cam = projector.camera();
    let ground = Vec3::new(cam.position.x, cam.position.y, 0.0);
    let side = cam.right * DASH_HALF_WIDTH_M;
    let mut d = DASH_START_M.max(cfg.near_plane_m);
    while d < cfg.grid_extent_m {
        let near = ground + cam.forward * d;
        let far = ground + cam.forward * (d + DASH_LEN_M).min(cfg.grid_extent_m);
        let quad = [near - side, near + side, far + side, far - side].map(|p| cam.to_camera(&p));
        let pts = projector.project_polygon(&quad);
        if pts.iter().any(|p| projector.in_frame(*p)) {
            list.polygon(&pts, CENTERLINE);
        }
        d += DASH_LEN_M + DASH_GAP_M;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
