use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "egoview", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single step as a PNG.
    Frame(FrameArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct ConfigArgs {
    /// Render config JSON. Missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the output width.
    #[arg(long)]
    width: Option<u32>,

    /// Override the output height.
    #[arg(long)]
    height: Option<u32>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input episode JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Trajectory step (0-based).
    #[arg(long)]
    step: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input episode JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    config: ConfigArgs,

    /// Override the output frame rate.
    #[arg(long)]
    fps: Option<u32>,

    /// Render frames in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker threads when `--parallel` is set.
    #[arg(long)]
    threads: Option<usize>,

    /// Steps per render chunk.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// Reuse the previous frame when a step repeats the previous step's inputs.
    #[arg(long)]
    static_frame_elision: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn load_config(args: &ConfigArgs) -> anyhow::Result<egoview::RenderConfig> {
    let mut cfg = match args.config.as_deref() {
        Some(path) => egoview::RenderConfig::from_path(path)?,
        None => egoview::RenderConfig::default(),
    };
    if let Some(w) = args.width {
        cfg.width = w;
    }
    if let Some(h) = args.height {
        cfg.height = h;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn load_episode(path: &Path) -> anyhow::Result<egoview::Episode> {
    egoview::Episode::from_path(path).with_context(|| format!("load episode '{}'", path.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.config)?;
    let episode = load_episode(&args.in_path)?;
    let Some(pose) = episode.poses().get(args.step) else {
        anyhow::bail!(
            "step {} is out of range (episode has {} steps)",
            args.step,
            episode.len_steps()
        );
    };
    let obstacles = episode.obstacles_at(args.step, &cfg);

    let mut sequencer = egoview::FrameSequencer::new(cfg)?;
    let frame = sequencer.render_frame(pose, &obstacles)?;
    frame.save_png(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.config)?;
    if let Some(fps) = args.fps {
        cfg.fps = fps;
        cfg.validate()?;
    }
    let episode = load_episode(&args.in_path)?;
    if episode.len_steps() == 0 {
        anyhow::bail!("episode '{}' has no steps", args.in_path.display());
    }
    let obstacles = episode.obstacle_snapshots(&cfg);

    let threading = egoview::RenderThreading {
        parallel: args.parallel,
        chunk_size: args.chunk_size,
        threads: args.threads,
        static_frame_elision: args.static_frame_elision,
    };
    let mut sink = egoview::FfmpegSink::new(egoview::FfmpegSinkOpts::new(&args.out));
    let stats =
        egoview::render_to_sink(&cfg, episode.poses(), &obstacles, &threading, &mut sink)?;

    eprintln!(
        "wrote {} ({} frames, {} rendered, {} reused)",
        args.out.display(),
        stats.frames_total,
        stats.frames_rendered,
        stats.frames_elided
    );
    Ok(())
}
