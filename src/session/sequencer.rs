use std::sync::Arc;

use rayon::prelude::*;

use crate::camera::model::compute_camera;
use crate::camera::projection::Projector;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, Pose};
use crate::foundation::error::{EgoviewError, EgoviewResult};
use crate::render::background;
use crate::render::frame::FrameRGB;
use crate::render::painter::{PaintList, Painter};
use crate::render::rasterize::{back_to_front, rasterize};
use crate::render::shading::Light;
use crate::render::smooth;
use crate::scene::config::RenderConfig;
use crate::scene::obstacle::Obstacle;
use crate::session::fingerprint::{StepFingerprint, fingerprint_step};

const MAX_REORDER_BUFFER_BYTES: u64 = 128 * 1024 * 1024;

/// Options controlling how an episode is spread over threads.
#[derive(Clone, Debug)]
pub struct RenderThreading {
    /// Enable frame-level parallelism (rayon), using a dedicated thread pool.
    pub parallel: bool,
    /// Steps rendered per chunk before frames are handed on in step order.
    pub chunk_size: usize,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Reuse the previous frame when a step's inputs match the previous step's.
    pub static_frame_elision: bool,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            static_frame_elision: false,
        }
    }
}

/// Episode render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Total steps in the episode.
    pub frames_total: u64,
    /// Frames actually rendered.
    pub frames_rendered: u64,
    /// Frames reused from the previous step.
    pub frames_elided: u64,
}

/// Renders individual steps for one [`RenderConfig`].
///
/// Every frame is rebuilt from its pose and obstacle snapshot alone; the only state kept between
/// calls is the painter's scratch buffers.
pub struct FrameSequencer {
    cfg: RenderConfig,
    painter: Painter,
}

impl FrameSequencer {
    /// Create a sequencer for a validated configuration.
    pub fn new(cfg: RenderConfig) -> EgoviewResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            painter: Painter::new(),
        })
    }

    /// Configuration used for every frame.
    pub fn config(&self) -> &RenderConfig {
        &self.cfg
    }

    /// Render one step: background, then obstacles back to front.
    #[tracing::instrument(skip(self, obstacles), fields(obstacles = obstacles.len()))]
    pub fn render_frame(&mut self, pose: &Pose, obstacles: &[Obstacle]) -> EgoviewResult<FrameRGB> {
        validate_step(pose, obstacles)?;
        render_step(&mut self.painter, &self.cfg, pose, obstacles)
    }
}

fn render_step(
    painter: &mut Painter,
    cfg: &RenderConfig,
    pose: &Pose,
    obstacles: &[Obstacle],
) -> EgoviewResult<FrameRGB> {
    let cam = compute_camera(pose, cfg.camera_height_m, cfg.pitch_rad);
    let projector = Projector::from_config(&cam, cfg);
    let light = Light::from_camera(&cam, cfg.light_dir);

    let mut frame = background::compose(&projector, cfg, painter)?;
    let mut list = PaintList::new();
    for obstacle in back_to_front(obstacles, &cam) {
        for prim in rasterize(obstacle, &projector, &light, cfg) {
            prim.paint_into(&mut list);
        }
    }
    painter.paint(&mut frame, &list)?;

    if cfg.smooth {
        frame = smooth::box3x3(&frame)?;
    }
    Ok(frame)
}

fn validate_step(pose: &Pose, obstacles: &[Obstacle]) -> EgoviewResult<()> {
    pose.validate()?;
    for o in obstacles {
        o.validate()?;
    }
    Ok(())
}

fn validate_episode(
    cfg: &RenderConfig,
    trajectory: &[Pose],
    obstacles_per_step: &[Vec<Obstacle>],
) -> EgoviewResult<()> {
    cfg.validate()?;
    if trajectory.len() != obstacles_per_step.len() {
        return Err(EgoviewError::validation(format!(
            "trajectory has {} steps but {} obstacle snapshots were given",
            trajectory.len(),
            obstacles_per_step.len()
        )));
    }
    for (step, (pose, obstacles)) in trajectory.iter().zip(obstacles_per_step).enumerate() {
        validate_step(pose, obstacles).map_err(|e| match e {
            EgoviewError::Validation(msg) => {
                EgoviewError::validation(format!("step {step}: {msg}"))
            }
            other => other,
        })?;
    }
    Ok(())
}

/// Lazily render one frame per trajectory step, in step order.
///
/// All poses and obstacles are validated before the iterator is returned, so a malformed step
/// fails the whole call instead of producing a short sequence.
#[tracing::instrument(skip_all, fields(steps = trajectory.len()))]
pub fn render_episode<'a>(
    cfg: &RenderConfig,
    trajectory: &'a [Pose],
    obstacles_per_step: &'a [Vec<Obstacle>],
) -> EgoviewResult<EpisodeFrames<'a>> {
    validate_episode(cfg, trajectory, obstacles_per_step)?;
    Ok(EpisodeFrames {
        sequencer: FrameSequencer::new(cfg.clone())?,
        trajectory,
        obstacles: obstacles_per_step,
        next: 0,
    })
}

/// Frame iterator returned by [`render_episode`]. Consumed once.
pub struct EpisodeFrames<'a> {
    sequencer: FrameSequencer,
    trajectory: &'a [Pose],
    obstacles: &'a [Vec<Obstacle>],
    next: usize,
}

impl Iterator for EpisodeFrames<'_> {
    type Item = EgoviewResult<FrameRGB>;

    fn next(&mut self) -> Option<Self::Item> {
        let step = self.next;
        let pose = self.trajectory.get(step)?;
        self.next += 1;
        let _span = tracing::debug_span!("episode_step", step).entered();
        Some(render_step(
            &mut self.sequencer.painter,
            &self.sequencer.cfg,
            pose,
            &self.obstacles[step],
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.trajectory.len() - self.next;
        (n, Some(n))
    }
}

impl ExactSizeIterator for EpisodeFrames<'_> {}

/// Render a whole episode into memory, optionally in parallel.
pub fn render_frames_with_stats(
    cfg: &RenderConfig,
    trajectory: &[Pose],
    obstacles_per_step: &[Vec<Obstacle>],
    threading: &RenderThreading,
) -> EgoviewResult<(Vec<FrameRGB>, RenderStats)> {
    validate_episode(cfg, trajectory, obstacles_per_step)?;
    let mut sink = CollectSink::default();
    let stats = drive(cfg, trajectory, obstacles_per_step, threading, &mut sink)?;
    Ok((sink.frames, stats))
}

/// Render an episode and stream the frames to `sink` in step order.
///
/// Calls `begin` once, `push_frame` once per step and `end` once.
#[tracing::instrument(skip_all, fields(steps = trajectory.len(), parallel = threading.parallel))]
pub fn render_to_sink(
    cfg: &RenderConfig,
    trajectory: &[Pose],
    obstacles_per_step: &[Vec<Obstacle>],
    threading: &RenderThreading,
    sink: &mut dyn FrameSink,
) -> EgoviewResult<RenderStats> {
    validate_episode(cfg, trajectory, obstacles_per_step)?;
    sink.begin(SinkConfig {
        width: cfg.width,
        height: cfg.height,
        fps: cfg.fps()?,
    })?;
    let mut adapter = SinkAdapter { sink };
    let stats = drive(cfg, trajectory, obstacles_per_step, threading, &mut adapter)?;
    adapter.sink.end()?;
    tracing::info!(
        total = stats.frames_total,
        rendered = stats.frames_rendered,
        elided = stats.frames_elided,
        "episode rendered"
    );
    Ok(stats)
}

trait StepConsumer {
    fn consume(&mut self, idx: FrameIndex, frame: Arc<FrameRGB>) -> EgoviewResult<()>;
}

#[derive(Default)]
struct CollectSink {
    frames: Vec<FrameRGB>,
}

impl StepConsumer for CollectSink {
    fn consume(&mut self, _idx: FrameIndex, frame: Arc<FrameRGB>) -> EgoviewResult<()> {
        self.frames.push(Arc::unwrap_or_clone(frame));
        Ok(())
    }
}

struct SinkAdapter<'s> {
    sink: &'s mut dyn FrameSink,
}

impl StepConsumer for SinkAdapter<'_> {
    fn consume(&mut self, idx: FrameIndex, frame: Arc<FrameRGB>) -> EgoviewResult<()> {
        self.sink.push_frame(idx, &frame)
    }
}

fn drive(
    cfg: &RenderConfig,
    trajectory: &[Pose],
    obstacles_per_step: &[Vec<Obstacle>],
    threading: &RenderThreading,
    out: &mut dyn StepConsumer,
) -> EgoviewResult<RenderStats> {
    let total = trajectory.len();
    let bytes_per_frame = u64::from(cfg.width)
        .saturating_mul(u64::from(cfg.height))
        .saturating_mul(3)
        .max(1);
    let max_chunk_by_mem = (MAX_REORDER_BUFFER_BYTES / bytes_per_frame).max(1) as usize;
    let chunk_size = threading.chunk_size.max(1).min(max_chunk_by_mem);

    let pool = if threading.parallel {
        Some(build_thread_pool(threading.threads)?)
    } else {
        None
    };
    let mut painter = Painter::new();

    let mut stats = RenderStats::default();
    let mut prev: Option<(StepFingerprint, Arc<FrameRGB>)> = None;
    let mut chunk_start = 0usize;
    while chunk_start < total {
        let chunk_end = (chunk_start + chunk_size).min(total);
        let steps = chunk_start..chunk_end;

        // Each step either renders or reuses the frame of the step before it.
        let fingerprints: Vec<Option<StepFingerprint>> = steps
            .clone()
            .map(|i| {
                threading
                    .static_frame_elision
                    .then(|| fingerprint_step(&trajectory[i], &obstacles_per_step[i]))
            })
            .collect();
        let mut reuse = Vec::with_capacity(steps.len());
        let mut last_fp = prev.as_ref().map(|(fp, _)| *fp);
        for fp in &fingerprints {
            reuse.push(fp.is_some() && *fp == last_fp);
            last_fp = *fp;
        }
        let to_render: Vec<usize> = steps
            .clone()
            .zip(&reuse)
            .filter(|&(_, r)| !*r)
            .map(|(i, _)| i)
            .collect();

        let rendered: Vec<FrameRGB> = match pool.as_ref() {
            Some(pool) => pool.install(|| {
                to_render
                    .par_iter()
                    .map_init(Painter::new, |painter, &i| {
                        render_step(painter, cfg, &trajectory[i], &obstacles_per_step[i])
                    })
                    .collect::<EgoviewResult<Vec<_>>>()
            })?,
            None => to_render
                .iter()
                .map(|&i| render_step(&mut painter, cfg, &trajectory[i], &obstacles_per_step[i]))
                .collect::<EgoviewResult<Vec<_>>>()?,
        };

        let mut rendered = rendered.into_iter();
        for ((i, fp), reused) in steps.zip(fingerprints).zip(reuse) {
            let frame = if reused {
                let (_, frame) = prev
                    .as_ref()
                    .ok_or_else(|| EgoviewError::evaluation("elided step has no previous frame"))?;
                stats.frames_elided += 1;
                frame.clone()
            } else {
                let frame = rendered
                    .next()
                    .ok_or_else(|| EgoviewError::evaluation("missing rendered frame"))?;
                stats.frames_rendered += 1;
                Arc::new(frame)
            };
            out.consume(FrameIndex(i as u64), frame.clone())?;
            prev = fp.map(|fp| (fp, frame));
        }

        stats.frames_total += (chunk_end - chunk_start) as u64;
        chunk_start = chunk_end;
    }
    Ok(stats)
}

fn build_thread_pool(threads: Option<usize>) -> EgoviewResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(EgoviewError::validation(
            "render 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| EgoviewError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/sequencer.rs"]
mod tests;
