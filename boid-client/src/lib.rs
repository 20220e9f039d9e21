//! Headless driver for flock scenes: loads scene settings, advances the
//! flock tick by tick, checks its invariants and streams JSON snapshots.

pub mod invariants;
pub mod runner;

use std::path::Path;

use anyhow::{Context, Result};
use boid_shared::SceneSettings;

/// Reads scene settings from a JSON file, or returns the defaults when no
/// file is given.
pub fn load_settings(path: Option<&Path>) -> Result<SceneSettings> {
    let Some(path) = path else {
        return Ok(SceneSettings::default());
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let settings = SceneSettings::from_json(&json)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    log::debug!("Loaded settings from {}: {:?}", path.display(), settings);
    Ok(settings)
}
