#![cfg_attr(not(feature = "std"), no_std)]

use boid_core::{Boid, BoidConfig, BoidError, Bounds, UpdateMode};
use serde::{Deserialize, Serialize};

/// Axis ranges of the simulation box as `[low, high]` pairs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoundsSettings {
    pub x: [f64; 2],
    pub y: [f64; 2],
    pub z: [f64; 2],
}

impl Default for BoundsSettings {
    fn default() -> Self {
        // 1000x800 window, z doubles as the 0..255 alpha channel.
        Self {
            x: [0.0, 1000.0],
            y: [0.0, 800.0],
            z: [0.0, 255.0],
        }
    }
}

impl BoundsSettings {
    pub fn to_bounds(&self) -> Result<Bounds, BoidError> {
        Bounds::new(
            (self.x[0], self.x[1]),
            (self.y[0], self.y[1]),
            (self.z[0], self.z[1]),
        )
    }
}

impl From<&Bounds> for BoundsSettings {
    fn from(bounds: &Bounds) -> Self {
        Self {
            x: [bounds.left(), bounds.right()],
            y: [bounds.top(), bounds.bottom()],
            z: [bounds.back(), bounds.front()],
        }
    }
}

/// Serialized form of [`UpdateMode`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateModeSetting {
    #[default]
    Snapshot,
    InPlace,
}

impl From<UpdateModeSetting> for UpdateMode {
    fn from(mode: UpdateModeSetting) -> Self {
        match mode {
            UpdateModeSetting::Snapshot => UpdateMode::Snapshot,
            UpdateModeSetting::InPlace => UpdateMode::InPlace,
        }
    }
}

impl From<UpdateMode> for UpdateModeSetting {
    fn from(mode: UpdateMode) -> Self {
        match mode {
            UpdateMode::Snapshot => UpdateModeSetting::Snapshot,
            UpdateMode::InPlace => UpdateModeSetting::InPlace,
        }
    }
}

/// Boid simulation configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoidSettings {
    pub margin: f64,
    pub turn_factor: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub protected_range: f64,
    pub avoid_factor: f64,
    pub visible_range: f64,
    pub matching_factor: f64,
    pub centering_factor: f64,
    pub front_margin: f64,
    pub update_mode: UpdateModeSetting,
}

impl Default for BoidSettings {
    fn default() -> Self {
        Self::from(&BoidConfig::default())
    }
}

impl From<&BoidConfig> for BoidSettings {
    fn from(config: &BoidConfig) -> Self {
        Self {
            margin: config.margin,
            turn_factor: config.turn_factor,
            min_speed: config.min_speed,
            max_speed: config.max_speed,
            protected_range: config.protected_range,
            avoid_factor: config.avoid_factor,
            visible_range: config.visible_range,
            matching_factor: config.matching_factor,
            centering_factor: config.centering_factor,
            front_margin: config.front_margin,
            update_mode: config.update_mode.into(),
        }
    }
}

impl From<&BoidSettings> for BoidConfig {
    fn from(settings: &BoidSettings) -> Self {
        Self {
            margin: settings.margin,
            turn_factor: settings.turn_factor,
            min_speed: settings.min_speed,
            max_speed: settings.max_speed,
            protected_range: settings.protected_range,
            avoid_factor: settings.avoid_factor,
            visible_range: settings.visible_range,
            matching_factor: settings.matching_factor,
            centering_factor: settings.centering_factor,
            front_margin: settings.front_margin,
            update_mode: settings.update_mode.into(),
        }
    }
}

/// Everything needed to set up one flock scene.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneSettings {
    pub boid_count: usize,
    /// Fixed seed for a reproducible flock; `None` draws from entropy.
    pub seed: Option<u64>,
    /// Ticks per second for front ends that throttle; `None` runs
    /// unthrottled.
    pub fps: Option<u32>,
    pub bounds: BoundsSettings,
    pub boids: BoidSettings,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            boid_count: 10,
            seed: None,
            fps: None,
            bounds: BoundsSettings::default(),
            boids: BoidSettings::default(),
        }
    }
}

impl SceneSettings {
    /// Checks that bounds and steering constants are usable.
    pub fn validate(&self) -> Result<(Bounds, BoidConfig), BoidError> {
        let bounds = self.bounds.to_bounds()?;
        let config = BoidConfig::from(&self.boids);
        config.validate()?;
        Ok((bounds, config))
    }

    #[cfg(feature = "std")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[cfg(feature = "std")]
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Builds the flock described by these settings.
    #[cfg(feature = "std")]
    pub fn build_flock(&self) -> Result<boid_core::FlockStd, BoidError> {
        let (bounds, config) = self.validate()?;
        match self.seed {
            Some(seed) => boid_core::FlockStd::with_seed(bounds, self.boid_count, config, seed),
            None => boid_core::FlockStd::new(bounds, self.boid_count, config),
        }
    }
}

/// Position and velocity of one boid, as handed to renderers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoidState {
    pub position: [f64; 3],
    pub velocity: [f64; 3],
}

impl From<&Boid> for BoidState {
    fn from(boid: &Boid) -> Self {
        Self {
            position: boid.position.to_array(),
            velocity: boid.velocity.to_array(),
        }
    }
}

/// State of the whole flock after a given tick.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlockSnapshot {
    pub tick: u64,
    pub boids: Vec<BoidState>,
}

#[cfg(feature = "std")]
impl FlockSnapshot {
    pub fn capture(tick: u64, boids: &[Boid]) -> Self {
        Self {
            tick,
            boids: boids.iter().map(BoidState::from).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Summary of a running flock
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FlockStatus {
    pub boid_count: usize,
    pub tick: u64,
    pub min_speed: f64,
    pub max_speed: f64,
}

impl FlockStatus {
    pub fn from_boids(tick: u64, boids: &[Boid]) -> Self {
        let (min_speed, max_speed) = boids
            .iter()
            .map(Boid::speed)
            .fold((f64::INFINITY, 0.0_f64), |(lo, hi), s| (lo.min(s), hi.max(s)));

        Self {
            boid_count: boids.len(),
            tick,
            min_speed: if boids.is_empty() { 0.0 } else { min_speed },
            max_speed,
        }
    }
}
