use crate::error::BoidError;

/// How a flock applies one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateMode {
    /// Every boid reads the flock as it was at the start of the tick and
    /// the new states are committed together once all boids succeeded.
    #[default]
    Snapshot,
    /// Boids are advanced one after the other, so boids later in insertion
    /// order see neighbors that already moved this tick.
    InPlace,
}

/// Configuration for the boid simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoidConfig {
    /// How close to the walls boids start turning.
    pub margin: f64,
    /// Velocity change per tick while inside the margin.
    pub turn_factor: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    /// Boids closer than this repel each other.
    pub protected_range: f64,
    pub avoid_factor: f64,
    /// Boids closer than this are matched and followed.
    pub visible_range: f64,
    pub matching_factor: f64,
    pub centering_factor: f64,
    /// Margin used against the front (upper z) wall instead of `margin`.
    pub front_margin: f64,
    pub update_mode: UpdateMode,
}

impl Default for BoidConfig {
    fn default() -> Self {
        Self {
            margin: 100.0,
            turn_factor: 2.0,
            min_speed: 10.0,
            max_speed: 15.0,
            protected_range: 10.0,
            avoid_factor: 0.1,
            visible_range: 50.0,
            matching_factor: 0.2,
            centering_factor: 0.005,
            front_margin: 50.0,
            update_mode: UpdateMode::Snapshot,
        }
    }
}

impl BoidConfig {
    pub fn validate(&self) -> Result<(), BoidError> {
        let values = [
            self.margin,
            self.turn_factor,
            self.min_speed,
            self.max_speed,
            self.protected_range,
            self.avoid_factor,
            self.visible_range,
            self.matching_factor,
            self.centering_factor,
            self.front_margin,
        ];
        if !values.iter().all(|v| v.is_finite()) {
            return Err(BoidError::InvalidConfig("all parameters must be finite"));
        }
        if values.iter().any(|v| *v < 0.0) {
            return Err(BoidError::InvalidConfig("parameters must not be negative"));
        }
        if self.min_speed <= 0.0 {
            return Err(BoidError::InvalidConfig("min_speed must be positive"));
        }
        if self.min_speed > self.max_speed {
            return Err(BoidError::InvalidConfig(
                "min_speed must not exceed max_speed",
            ));
        }
        Ok(())
    }
}
