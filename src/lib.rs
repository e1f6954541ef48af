//! Egoview renders first-person video frames from a top-down robot trajectory.
//!
//! The pipeline is built by hand, without a 3D engine:
//!
//! - [`compute_camera`] turns a [`Pose`] into a view basis
//! - [`Projector`] maps world points to pixels, clipping at the near plane
//! - the background composer paints sky, ground and grid
//! - the rasterizer shades obstacles and paints them back to front
//! - [`render_episode`] / [`render_to_sink`] sequence one frame per step
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod foundation;

/// Camera basis and projection.
pub mod camera;
/// Encoding sinks.
pub mod encode;
/// Frame buffer, background, obstacle rasterization and painting.
pub mod render;
/// Render configuration, obstacles and episodes.
pub mod scene;
/// Per-step rendering and episode sequencing.
pub mod session;

pub use crate::foundation::core::{Fps, FrameIndex, Point, Pose, Rgb8, Vec3};
pub use crate::foundation::error::{EgoviewError, EgoviewResult};
pub use crate::foundation::math::wrap_angle;

pub use crate::camera::model::{CameraState, compute_camera};
pub use crate::camera::projection::{Projector, project};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::render::frame::FrameRGB;
pub use crate::render::rasterize::{ScreenPrimitive, rasterize};
pub use crate::scene::config::RenderConfig;
pub use crate::scene::episode::Episode;
pub use crate::scene::obstacle::Obstacle;
pub use crate::session::sequencer::{
    EpisodeFrames, FrameSequencer, RenderStats, RenderThreading, render_episode,
    render_frames_with_stats, render_to_sink,
};
