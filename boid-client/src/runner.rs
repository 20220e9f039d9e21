use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use boid_core::FlockStd;
use boid_shared::{FlockSnapshot, FlockStatus, SceneSettings};

use crate::invariants;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub ticks: u64,
    /// Write a snapshot every this many ticks (plus the initial state).
    /// Zero disables snapshots.
    pub sample_every: u64,
    /// Verify bounds and speed limits after every tick.
    pub check_invariants: bool,
    /// Minimum wall-clock time per tick, if throttled.
    pub frame_interval: Option<Duration>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            ticks: 1000,
            sample_every: 1,
            check_invariants: false,
            frame_interval: None,
        }
    }
}

impl RunOptions {
    /// Default options throttled to the scene's frame rate, if it has one.
    pub fn for_scene(settings: &SceneSettings) -> Self {
        let options = Self::default();
        match settings.fps {
            Some(fps) => options.with_fps(fps),
            None => options,
        }
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.frame_interval = match fps {
            0 => None,
            fps => Some(Duration::from_secs_f64(1.0 / fps as f64)),
        };
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub status: FlockStatus,
    pub snapshots_written: u64,
}

fn write_snapshot<W: Write>(flock: &FlockStd, out: &mut W) -> Result<()> {
    let snapshot = FlockSnapshot::capture(flock.tick_count(), flock.boids());
    let line = snapshot.to_json().context("Failed to serialize snapshot")?;
    writeln!(out, "{}", line).context("Failed to write snapshot")?;
    Ok(())
}

/// Advances `flock` for `options.ticks` ticks, writing JSON lines snapshots
/// to `out`.
pub fn run<W: Write>(flock: &mut FlockStd, options: &RunOptions, out: &mut W) -> Result<RunSummary> {
    log::info!(
        "Running {} boids for {} ticks",
        flock.len(),
        options.ticks
    );

    let mut snapshots_written = 0;
    if options.sample_every > 0 {
        write_snapshot(flock, out)?;
        snapshots_written += 1;
    }

    let started = Instant::now();
    for _ in 0..options.ticks {
        let frame_start = Instant::now();

        flock
            .tick()
            .with_context(|| format!("Tick {} failed", flock.tick_count() + 1))?;

        if options.check_invariants {
            invariants::check_flock(flock)?;
        }

        if options.sample_every > 0 && flock.tick_count() % options.sample_every == 0 {
            write_snapshot(flock, out)?;
            snapshots_written += 1;
        }

        if let Some(interval) = options.frame_interval {
            if let Some(remaining) = interval.checked_sub(frame_start.elapsed()) {
                thread::sleep(remaining);
            }
        }
    }
    out.flush().context("Failed to flush output")?;

    let elapsed = started.elapsed();
    log::debug!(
        "Ran {} ticks in {:.3}s",
        options.ticks,
        elapsed.as_secs_f64()
    );

    Ok(RunSummary {
        status: FlockStatus::from_boids(flock.tick_count(), flock.boids()),
        snapshots_written,
    })
}
