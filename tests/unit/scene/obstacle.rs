use super::*;

fn square(is_dynamic: bool) -> Obstacle {
    Obstacle::Polygonal {
        vertices: vec![
            Point::new(4.0, -1.0),
            Point::new(6.0, -1.0),
            Point::new(6.0, 1.0),
            Point::new(4.0, 1.0),
        ],
        height: 1.5,
        is_dynamic,
    }
}

#[test]
fn centroid_and_bounding_radius() {
    let sq = square(false);
    assert_eq!(sq.centroid(), Point::new(5.0, 0.0));
    assert!((sq.bounding_radius() - 2f64.sqrt()).abs() < 1e-12);

    let c = Obstacle::Circular {
        center: Point::new(5.0, 5.0),
        radius: 0.5,
        height: 1.5,
        is_dynamic: true,
    };
    assert_eq!(c.centroid(), Point::new(5.0, 5.0));
    assert_eq!(c.bounding_radius(), 0.5);
    assert!(c.is_dynamic());
    assert!(!sq.is_dynamic());
}

#[test]
fn validation_rejects_bad_geometry() {
    assert!(square(false).validate().is_ok());

    let one_vertex = Obstacle::Polygonal {
        vertices: vec![Point::new(0.0, 0.0)],
        height: 1.0,
        is_dynamic: false,
    };
    assert!(one_vertex.validate().is_err());

    let nan_vertex = Obstacle::Polygonal {
        vertices: vec![Point::new(0.0, 0.0), Point::new(f64::NAN, 1.0)],
        height: 1.0,
        is_dynamic: false,
    };
    assert!(nan_vertex.validate().is_err());

    let flat = Obstacle::Circular {
        center: Point::new(0.0, 0.0),
        radius: 0.5,
        height: 0.0,
        is_dynamic: false,
    };
    assert!(flat.validate().is_err());

    let zero_radius = Obstacle::Circular {
        center: Point::new(0.0, 0.0),
        radius: 0.0,
        height: 1.0,
        is_dynamic: false,
    };
    assert!(zero_radius.validate().is_err());
}

#[test]
fn serde_uses_kind_tag() {
    let json = r#"{ "kind": "circular", "center": { "x": 1.0, "y": 2.0 }, "radius": 0.5, "height": 1.5, "is_dynamic": false }"#;
    let o: Obstacle = serde_json::from_str(json).unwrap();
    assert!(matches!(o, Obstacle::Circular { radius, .. } if radius == 0.5));
}
