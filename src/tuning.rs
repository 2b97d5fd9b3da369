//! Data-driven game balance
//!
//! Loaded from JSON. Every field is optional; missing fields keep their
//! defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::level::Color;

/// Errors reading configuration files
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Pins closer than this (degrees) collide
    pub collision_threshold_deg: f32,
    /// Flight time of a fired pin (ms)
    pub shot_duration_ms: f32,
    /// Screen direction shots come from (degrees, 0 = top)
    pub launch_direction_deg: f32,
    /// Background when no pin is queued
    pub neutral_background: String,
    /// Floor for a level's rotation period (ms)
    pub min_rotation_period_ms: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            collision_threshold_deg: COLLISION_THRESHOLD_DEG,
            shot_duration_ms: SHOOT_DURATION_MS,
            launch_direction_deg: LAUNCH_DIRECTION_DEG,
            neutral_background: NEUTRAL_BACKGROUND.to_string(),
            min_rotation_period_ms: MIN_ROTATION_PERIOD_MS,
        }
    }
}

impl Tuning {
    /// Background shown when no pin is queued
    pub fn neutral_background_color(&self) -> Color {
        Color::new(self.neutral_background.clone())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Replace out-of-range values with defaults
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.collision_threshold_deg.is_finite() && self.collision_threshold_deg >= 0.0) {
            log::warn!("Invalid collision threshold, using {}", defaults.collision_threshold_deg);
            self.collision_threshold_deg = defaults.collision_threshold_deg;
        }
        if !(self.shot_duration_ms.is_finite() && self.shot_duration_ms >= 0.0) {
            log::warn!("Invalid shot duration, using {}ms", defaults.shot_duration_ms);
            self.shot_duration_ms = defaults.shot_duration_ms;
        }
        if !self.launch_direction_deg.is_finite() {
            self.launch_direction_deg = defaults.launch_direction_deg;
        }
        self.launch_direction_deg = crate::normalize_angle(self.launch_direction_deg);
        if self.min_rotation_period_ms == 0 {
            self.min_rotation_period_ms = defaults.min_rotation_period_ms;
        }
        self
    }
}
