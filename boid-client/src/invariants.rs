use anyhow::{bail, Result};
use boid_core::FlockStd;

/// Slack allowed on the speed limits for rounding in the rescale.
const SPEED_TOLERANCE: f64 = 1e-9;

/// Fails if any boid left the bounds or its speed range.
pub fn check_flock(flock: &FlockStd) -> Result<()> {
    let config = flock.config();
    let bounds = flock.bounds();

    for (index, boid) in flock.boids().iter().enumerate() {
        if !bounds.contains(&boid.position) {
            bail!(
                "boid {} left the bounds at tick {}: position {}",
                index,
                flock.tick_count(),
                boid.position
            );
        }

        let speed = boid.speed();
        if speed < config.min_speed - SPEED_TOLERANCE || speed > config.max_speed + SPEED_TOLERANCE
        {
            bail!(
                "boid {} speed {} outside [{}, {}] at tick {}",
                index,
                speed,
                config.min_speed,
                config.max_speed,
                flock.tick_count()
            );
        }
    }

    Ok(())
}
