use crate::foundation::core::{Point, Rgb8};
use crate::foundation::error::{EgoviewError, EgoviewResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::frame::FrameRGB;

/// Ordered list of opaque polygon fills, painted first-to-last.
#[derive(Clone, Debug, Default)]
pub struct PaintList {
    items: Vec<PaintItem>,
}

#[derive(Clone, Debug)]
struct PaintItem {
    points: Vec<Point>,
    color: Rgb8,
}

impl PaintList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued fills.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Return `true` when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Queue a closed polygon fill. Fewer than three points are ignored.
    pub fn polygon(&mut self, points: &[Point], color: Rgb8) {
        if points.len() < 3 || points.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return;
        }
        self.items.push(PaintItem {
            points: points.to_vec(),
            color,
        });
    }

    /// Queue a straight line of `width` pixels from `a` to `b`.
    pub fn segment(&mut self, a: Point, b: Point, width: f64, color: Rgb8) {
        self.polygon(&segment_quad(a, b, width), color);
    }

    /// Queue the closed outline of `points` as `width`-pixel segments.
    pub fn outline(&mut self, points: &[Point], width: f64, color: Rgb8) {
        let n = points.len();
        if n < 2 {
            return;
        }
        for i in 0..n {
            self.segment(points[i], points[(i + 1) % n], width, color);
        }
    }
}

/// Quad covering a `width`-pixel line between `a` and `b`.
pub fn segment_quad(a: Point, b: Point, width: f64) -> [Point; 4] {
    let half = width.max(0.0) / 2.0;
    let d = b - a;
    let len = d.hypot();
    let (ux, uy) = if len > 1e-9 {
        (d.x / len, d.y / len)
    } else {
        (1.0, 0.0)
    };
    let (nx, ny) = (-uy * half, ux * half);
    [
        Point::new(a.x + nx, a.y + ny),
        Point::new(b.x + nx, b.y + ny),
        Point::new(b.x - nx, b.y - ny),
        Point::new(a.x - nx, a.y - ny),
    ]
}

/// Polygon approximation of an axis-aligned ellipse.
pub fn ellipse_points(center: Point, rx: f64, ry: f64, segments: usize) -> Vec<Point> {
    let n = segments.max(3);
    (0..n)
        .map(|i| {
            let a = std::f64::consts::TAU * (i as f64) / (n as f64);
            Point::new(center.x + rx * a.cos(), center.y + ry * a.sin())
        })
        .collect()
}

/// Rasterizes [`PaintList`]s onto frames with `vello_cpu`.
///
/// The render context and scratch pixmap are reused between calls; frame pixels are never
/// retained.
#[derive(Default)]
pub struct Painter {
    ctx: Option<vello_cpu::RenderContext>,
    pixmap: Option<vello_cpu::Pixmap>,
}

impl Painter {
    /// Create a painter with no cached buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint `list` in order, source-over, onto `frame`.
    pub fn paint(&mut self, frame: &mut FrameRGB, list: &PaintList) -> EgoviewResult<()> {
        if list.is_empty() {
            return Ok(());
        }
        let width: u16 = frame
            .width
            .try_into()
            .map_err(|_| EgoviewError::evaluation("frame width exceeds u16"))?;
        let height: u16 = frame
            .height
            .try_into()
            .map_err(|_| EgoviewError::evaluation("frame height exceeds u16"))?;

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        for item in &list.items {
            let c = item.color;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255));
            ctx.fill_path(&polygon_to_cpu(&item.points));
        }
        ctx.flush();

        let mut pixmap = match self.pixmap.take() {
            Some(p) if p.width() == width && p.height() == height => p,
            _ => vello_cpu::Pixmap::new(width, height),
        };
        clear_pixmap(&mut pixmap);
        ctx.render_to_pixmap(&mut pixmap);
        let res = composite_premul_over_rgb(&mut frame.data, pixmap.data_as_u8_slice());

        self.ctx = Some(ctx);
        self.pixmap = Some(pixmap);
        res
    }
}

fn polygon_to_cpu(points: &[Point]) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for (i, p) in points.iter().enumerate() {
        let cp = vello_cpu::kurbo::Point::new(p.x, p.y);
        if i == 0 {
            out.move_to(cp);
        } else {
            out.line_to(cp);
        }
    }
    out.close_path();
    out
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

/// Composite premultiplied RGBA8 over an opaque RGB8 buffer.
fn composite_premul_over_rgb(dst_rgb: &mut [u8], src_premul: &[u8]) -> EgoviewResult<()> {
    if dst_rgb.len() / 3 != src_premul.len() / 4
        || !dst_rgb.len().is_multiple_of(3)
        || !src_premul.len().is_multiple_of(4)
    {
        return Err(EgoviewError::evaluation(
            "composite expects rgb8 and rgba8 buffers with equal pixel counts",
        ));
    }

    for (d, s) in dst_rgb.chunks_exact_mut(3).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 0 {
            continue;
        }
        if a == 255 {
            d.copy_from_slice(&s[..3]);
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            let v = u16::from(s[c]) + mul_div255_u16(u16::from(d[c]), inv);
            d[c] = v.min(255) as u8;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/painter.rs"]
mod tests;
