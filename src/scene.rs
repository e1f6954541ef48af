/// Frame configuration.
pub mod config;
/// Episode JSON loading.
pub mod episode;
/// Obstacle snapshots.
pub mod obstacle;
