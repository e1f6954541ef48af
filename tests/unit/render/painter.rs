use super::*;

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> [Point; 4] {
    [
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ]
}

#[test]
fn paint_list_ignores_degenerate_polygons() {
    let mut list = PaintList::new();
    list.polygon(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)], Rgb8::new(1, 1, 1));
    list.polygon(
        &[
            Point::new(0.0, 0.0),
            Point::new(f64::NAN, 1.0),
            Point::new(1.0, 0.0),
        ],
        Rgb8::new(1, 1, 1),
    );
    assert!(list.is_empty());
    list.outline(&rect(0.0, 0.0, 4.0, 4.0), 1.0, Rgb8::new(1, 1, 1));
    assert_eq!(list.len(), 4);
}

#[test]
fn segment_quad_has_requested_width() {
    let q = segment_quad(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 2.0);
    assert_eq!(q[0], Point::new(0.0, 1.0));
    assert_eq!(q[2], Point::new(10.0, -1.0));

    let degenerate = segment_quad(Point::new(3.0, 3.0), Point::new(3.0, 3.0), 2.0);
    assert!(degenerate.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
}

#[test]
fn ellipse_points_lie_on_the_ellipse() {
    let pts = ellipse_points(Point::new(5.0, 5.0), 4.0, 2.0, 24);
    assert_eq!(pts.len(), 24);
    for p in pts {
        let v = ((p.x - 5.0) / 4.0).powi(2) + ((p.y - 5.0) / 2.0).powi(2);
        assert!((v - 1.0).abs() < 1e-9);
    }
    assert_eq!(ellipse_points(Point::ORIGIN, 1.0, 1.0, 0).len(), 3);
}

#[test]
fn paints_later_fills_over_earlier_ones() {
    let mut frame = FrameRGB::filled(32, 32, Rgb8::new(0, 0, 255));
    let mut list = PaintList::new();
    list.polygon(&rect(0.0, 0.0, 32.0, 32.0), Rgb8::new(255, 0, 0));
    list.polygon(&rect(16.0, 0.0, 32.0, 32.0), Rgb8::new(0, 255, 0));

    let mut painter = Painter::new();
    painter.paint(&mut frame, &list).unwrap();
    assert_eq!(frame.pixel(4, 16), Some(Rgb8::new(255, 0, 0)));
    assert_eq!(frame.pixel(28, 16), Some(Rgb8::new(0, 255, 0)));
}

#[test]
fn uncovered_pixels_keep_background() {
    let bg = Rgb8::new(12, 34, 56);
    let mut frame = FrameRGB::filled(32, 32, bg);
    let mut list = PaintList::new();
    list.polygon(&rect(0.0, 0.0, 8.0, 8.0), Rgb8::new(255, 255, 255));

    let mut painter = Painter::new();
    painter.paint(&mut frame, &list).unwrap();
    assert_eq!(frame.pixel(20, 20), Some(bg));
    assert_eq!(frame.pixel(3, 3), Some(Rgb8::new(255, 255, 255)));

    // Reused buffers must not leak the previous frame.
    let mut next = FrameRGB::filled(32, 32, bg);
    let mut other = PaintList::new();
    other.polygon(&rect(24.0, 24.0, 32.0, 32.0), Rgb8::new(0, 0, 0));
    painter.paint(&mut next, &other).unwrap();
    assert_eq!(next.pixel(3, 3), Some(bg));
    assert_eq!(next.pixel(28, 28), Some(Rgb8::new(0, 0, 0)));
}

#[test]
fn empty_list_leaves_frame_untouched() {
    let frame0 = FrameRGB::filled(8, 8, Rgb8::new(7, 7, 7));
    let mut frame = frame0.clone();
    Painter::new().paint(&mut frame, &PaintList::new()).unwrap();
    assert_eq!(frame, frame0);
}

#[test]
fn composite_blends_partial_coverage() {
    let mut dst = vec![200, 100, 0];
    // 50% white, premultiplied.
    composite_premul_over_rgb(&mut dst, &[128, 128, 128, 128]).unwrap();
    assert_eq!(dst, vec![128 + 100, 128 + 50, 128]);

    let mut dst = vec![0; 6];
    assert!(composite_premul_over_rgb(&mut dst, &[0; 4]).is_err());
}
