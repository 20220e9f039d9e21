use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use boid_client::runner::{self, RunOptions};
use boid_shared::{SceneSettings, UpdateModeSetting};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Every boid reads the flock as it was at the start of the tick
    Snapshot,
    /// Boids read neighbors that already moved this tick
    InPlace,
}

impl From<Mode> for UpdateModeSetting {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Snapshot => UpdateModeSetting::Snapshot,
            Mode::InPlace => UpdateModeSetting::InPlace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless 3D boid flock runner", long_about = None)]
struct Args {
    /// Scene settings JSON file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of boids in the flock
    #[arg(short, long)]
    boids: Option<usize>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,

    /// Seed for a reproducible flock
    #[arg(short, long)]
    seed: Option<u64>,

    /// How each tick reads the flock
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Write a snapshot every N ticks (0 disables snapshots)
    #[arg(long, default_value_t = 1)]
    sample_every: u64,

    /// Snapshot output file (JSON lines); stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Throttle to this many ticks per second (0 runs unthrottled)
    #[arg(long)]
    fps: Option<u32>,

    /// Verify bounds and speed limits after every tick
    #[arg(long)]
    check: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn scene_settings(&self) -> Result<SceneSettings> {
        let mut settings = boid_client::load_settings(self.config.as_deref())?;
        if let Some(count) = self.boids {
            settings.boid_count = count;
        }
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if let Some(mode) = self.mode {
            settings.boids.update_mode = mode.into();
        }
        if let Some(fps) = self.fps {
            settings.fps = Some(fps);
        }
        Ok(settings)
    }

    fn run_options(&self, settings: &SceneSettings) -> RunOptions {
        RunOptions {
            ticks: self.ticks,
            sample_every: self.sample_every,
            check_invariants: self.check,
            ..RunOptions::for_scene(settings)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("Boid client starting...");

    let settings = args.scene_settings()?;
    let mut flock = settings
        .build_flock()
        .context("Failed to initialize flock")?;

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => {
            log::info!("Writing snapshots to {}", path.display());
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let summary = runner::run(&mut flock, &args.run_options(&settings), &mut out).context("Run error")?;

    log::info!(
        "Finished tick {}: {} boids, speeds {:.3}..{:.3}, {} snapshots",
        summary.status.tick,
        summary.status.boid_count,
        summary.status.min_speed,
        summary.status.max_speed,
        summary.snapshots_written
    );

    Ok(())
}
