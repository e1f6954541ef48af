//! Encoding sinks.
//!
//! Sinks consume rendered frames in step order and are driven by
//! [`render_to_sink`](crate::render_to_sink).

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Frame sink trait and the in-memory sink.
pub mod sink;
