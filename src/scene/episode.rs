use std::collections::BTreeMap;
use std::path::Path;

use crate::foundation::core::{Point, Pose};
use crate::foundation::error::{EgoviewError, EgoviewResult};
use crate::foundation::math::wrap_angle;
use crate::scene::config::RenderConfig;
use crate::scene::obstacle::{Obstacle, polygon_centroid};

/// Polygons whose outline reaches farther than this from their centroid are walls.
const WALL_BOUNDING_RADIUS_M: f64 = 10.0;

/// A recorded simulator episode: robot trajectory plus obstacle placements.
#[derive(Clone, Debug)]
pub struct Episode {
    trajectory: Vec<Pose>,
    obstacles: Vec<ObstacleTrack>,
}

#[derive(Clone, Debug)]
struct ObstacleTrack {
    shape: TrackShape,
    center: Point,
    height: Option<f64>,
    is_dynamic: bool,
    track: Vec<TrackPoint>,
}

#[derive(Clone, Debug)]
enum TrackShape {
    Polygon(Vec<Point>),
    Circle(f64),
}

#[derive(Clone, Copy, Debug, serde::Deserialize)]
struct TrackPoint {
    x: f64,
    y: f64,
    #[serde(default)]
    theta: Option<f64>,
}

#[derive(Debug, serde::Deserialize)]
struct EpisodeDoc {
    #[serde(default)]
    robot_trajectory: Vec<Pose>,
    #[serde(default)]
    initial_obstacles: Vec<ObstacleRecord>,
    #[serde(default)]
    obstacle_trajectories: BTreeMap<String, Vec<TrackPoint>>,
}

#[derive(Debug, serde::Deserialize)]
struct ObstacleRecord {
    #[serde(default)]
    id: Option<u64>,
    initial_center: [f64; 2],
    #[serde(default = "default_radius")]
    radius: f64,
    #[serde(default)]
    velocity: Option<Vec<f64>>,
    #[serde(default)]
    vertices: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    is_dynamic: Option<bool>,
    #[serde(default)]
    height: Option<f64>,
}

fn default_radius() -> f64 {
    0.5
}

impl Episode {
    /// Build an episode directly from a trajectory and static obstacles.
    pub fn from_static(trajectory: Vec<Pose>, obstacles: Vec<Obstacle>) -> Self {
        let obstacles = obstacles
            .into_iter()
            .map(|o| {
                let height = Some(o.height());
                let is_dynamic = o.is_dynamic();
                match o {
                    Obstacle::Polygonal { vertices, .. } => {
                        let center = polygon_centroid(&vertices);
                        ObstacleTrack {
                            shape: TrackShape::Polygon(vertices),
                            center,
                            height,
                            is_dynamic,
                            track: Vec::new(),
                        }
                    }
                    Obstacle::Circular { center, radius, .. } => ObstacleTrack {
                        shape: TrackShape::Circle(radius),
                        center,
                        height,
                        is_dynamic,
                        track: Vec::new(),
                    },
                }
            })
            .collect();
        Self {
            trajectory,
            obstacles,
        }
    }

    /// Parse an episode JSON document.
    pub fn from_json_str(s: &str) -> EgoviewResult<Self> {
        let doc: EpisodeDoc = serde_json::from_str(s)
            .map_err(|e| EgoviewError::serde(format!("invalid episode json: {e}")))?;
        Self::from_doc(doc)
    }

    /// Load an episode JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> EgoviewResult<Self> {
        use anyhow::Context as _;
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read episode '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    fn from_doc(mut doc: EpisodeDoc) -> EgoviewResult<Self> {
        let mut obstacles = Vec::with_capacity(doc.initial_obstacles.len());
        for (idx, rec) in doc.initial_obstacles.into_iter().enumerate() {
            let key = rec.id.unwrap_or(idx as u64).to_string();
            let track = doc.obstacle_trajectories.remove(&key).unwrap_or_default();
            let center = Point::new(rec.initial_center[0], rec.initial_center[1]);

            let shape = match rec.vertices.as_deref() {
                Some([xs, ys]) if xs.len() >= 3 => {
                    if xs.len() != ys.len() {
                        return Err(EgoviewError::validation(format!(
                            "obstacle {key}: vertex rows have different lengths ({} vs {})",
                            xs.len(),
                            ys.len()
                        )));
                    }
                    TrackShape::Polygon(
                        xs.iter()
                            .zip(ys)
                            .map(|(&x, &y)| Point::new(x, y))
                            .collect(),
                    )
                }
                _ => TrackShape::Circle(rec.radius),
            };

            let moving_velocity = rec
                .velocity
                .as_ref()
                .is_some_and(|v| v.iter().any(|c| c.abs() > 1e-9));
            let moving_track = track.first().is_some_and(|first| {
                track
                    .iter()
                    .any(|p| (p.x - first.x).abs() > 1e-9 || (p.y - first.y).abs() > 1e-9)
            });
            let is_dynamic = rec.is_dynamic.unwrap_or(moving_velocity || moving_track);

            obstacles.push(ObstacleTrack {
                shape,
                center,
                height: rec.height,
                is_dynamic,
                track,
            });
        }

        let trajectory = doc
            .robot_trajectory
            .into_iter()
            .map(|p| Pose::new(p.x, p.y, wrap_angle(p.theta)))
            .collect();
        Ok(Self {
            trajectory,
            obstacles,
        })
    }

    /// Robot poses in step order.
    pub fn poses(&self) -> &[Pose] {
        &self.trajectory
    }

    /// Number of trajectory steps.
    pub fn len_steps(&self) -> usize {
        self.trajectory.len()
    }

    /// Number of obstacles tracked by the episode.
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// World-placed obstacle snapshot for `step`.
    ///
    /// Static obstacles are repeated unchanged; dynamic ones follow their recorded track,
    /// holding the last known placement once the track runs out.
    pub fn obstacles_at(&self, step: usize, cfg: &RenderConfig) -> Vec<Obstacle> {
        self.obstacles
            .iter()
            .map(|o| o.snapshot(step, cfg))
            .collect()
    }

    /// Obstacle snapshots for every step, aligned with [`Episode::poses`].
    pub fn obstacle_snapshots(&self, cfg: &RenderConfig) -> Vec<Vec<Obstacle>> {
        (0..self.trajectory.len())
            .map(|step| self.obstacles_at(step, cfg))
            .collect()
    }
}

impl ObstacleTrack {
    fn snapshot(&self, step: usize, cfg: &RenderConfig) -> Obstacle {
        let placement = if self.is_dynamic {
            self.track.get(step).or_else(|| self.track.last())
        } else {
            None
        };

        let (offset, rotation) = match placement {
            Some(p) => {
                let theta0 = self.track.first().and_then(|f| f.theta).unwrap_or(0.0);
                let dtheta = p.theta.map(|t| t - theta0).unwrap_or(0.0);
                (
                    kurbo::Vec2::new(p.x - self.center.x, p.y - self.center.y),
                    dtheta,
                )
            }
            None => (kurbo::Vec2::ZERO, 0.0),
        };
        let new_center = self.center + offset;

        match &self.shape {
            TrackShape::Polygon(vertices) => {
                let (s, c) = rotation.sin_cos();
                let vertices: Vec<Point> = vertices
                    .iter()
                    .map(|v| {
                        let d = *v - self.center;
                        let r = kurbo::Vec2::new(d.x * c - d.y * s, d.x * s + d.y * c);
                        new_center + r
                    })
                    .collect();
                let height = self.height.unwrap_or_else(|| {
                    let c = polygon_centroid(&vertices);
                    let reach = vertices.iter().map(|p| p.distance(c)).fold(0.0, f64::max);
                    if reach > WALL_BOUNDING_RADIUS_M {
                        cfg.wall_height_m
                    } else {
                        cfg.obstacle_height_m
                    }
                });
                Obstacle::Polygonal {
                    vertices,
                    height,
                    is_dynamic: self.is_dynamic,
                }
            }
            TrackShape::Circle(radius) => Obstacle::Circular {
                center: new_center,
                radius: *radius,
                height: self.height.unwrap_or(cfg.obstacle_height_m),
                is_dynamic: self.is_dynamic,
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/episode.rs"]
mod tests;
