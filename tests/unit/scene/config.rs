use super::*;

#[test]
fn defaults_match_documented_values() {
    let cfg = RenderConfig::default();
    assert_eq!((cfg.width, cfg.height), (640, 480));
    assert_eq!(cfg.fov_deg, 90.0);
    assert_eq!(cfg.camera_height_m, 1.2);
    assert_eq!(cfg.wall_height_m, 2.5);
    assert_eq!(cfg.obstacle_height_m, 1.5);
    assert_eq!(cfg.fps, 10);
    assert_eq!(cfg.grid_spacing_m, 1.0);
    assert_eq!(cfg.grid_major_every, 5);
    assert_eq!(cfg.cylinder_segments, 36);
    assert!(cfg.pitch_rad < 0.0);
    cfg.validate().unwrap();
}

#[test]
fn partial_json_fills_defaults() {
    let cfg = RenderConfig::from_json_str(r#"{ "width": 320, "height": 240 }"#).unwrap();
    assert_eq!((cfg.width, cfg.height), (320, 240));
    assert_eq!(cfg.fov_deg, 90.0);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = RenderConfig::from_json_str(r#"{ "widht": 320 }"#).unwrap_err();
    assert!(matches!(err, EgoviewError::Serde(_)));
}

#[test]
fn invalid_values_fail_validation() {
    let bad = [
        RenderConfig {
            width: 0,
            ..RenderConfig::default()
        },
        RenderConfig {
            height: 70_000,
            ..RenderConfig::default()
        },
        RenderConfig {
            fov_deg: 180.0,
            ..RenderConfig::default()
        },
        RenderConfig {
            camera_height_m: f64::NAN,
            ..RenderConfig::default()
        },
        RenderConfig {
            grid_spacing_m: 0.0,
            ..RenderConfig::default()
        },
        RenderConfig {
            cylinder_segments: 2,
            ..RenderConfig::default()
        },
        RenderConfig {
            light_dir: [0.0, 0.0, 0.0],
            ..RenderConfig::default()
        },
        RenderConfig {
            fps: 0,
            ..RenderConfig::default()
        },
    ];
    for cfg in bad {
        assert!(
            matches!(cfg.validate(), Err(EgoviewError::Validation(_))),
            "expected validation error for {cfg:?}"
        );
    }
}

#[test]
fn grid_density_is_bounded() {
    let dense = RenderConfig {
        grid_spacing_m: 0.02,
        ..RenderConfig::default()
    };
    assert!(matches!(dense.validate(), Err(EgoviewError::Validation(_))));

    let at_limit = RenderConfig {
        grid_extent_m: 31.25,
        grid_spacing_m: 0.125,
        ..RenderConfig::default()
    };
    at_limit.validate().unwrap();

    let over = RenderConfig {
        grid_extent_m: 31.5,
        ..at_limit
    };
    assert!(over.validate().is_err());
}
