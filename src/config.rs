//! Simulation configuration.
//!
//! A [`SimConfig`] is what the presentation layer hands the core: the
//! selected technique, spawn rate, speed band and theme. It is re-read every
//! tick, so changes take effect on the next frame. Configurations can be
//! saved to and loaded from JSON.
//!
//! ```json
//! {
//!   "technique": "Blue",
//!   "spawn_rate": 6.0,
//!   "min_speed": 3.0,
//!   "max_speed": 6.0,
//!   "theme": "Dark"
//! }
//! ```

use crate::error::ConfigError;
use crate::forces::ForceTuning;
use crate::technique::{Technique, Theme};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_spawn_rate() -> f32 {
    4.0
}

fn default_min_speed() -> f32 {
    3.0
}

fn default_max_speed() -> f32 {
    6.0
}

/// Complete simulation configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub technique: Technique,
    /// Particles per second. Zero (or anything not positive) disables spawning.
    #[serde(default = "default_spawn_rate")]
    pub spawn_rate: f32,
    #[serde(default = "default_min_speed")]
    pub min_speed: f32,
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,
    /// Cosmetic only.
    #[serde(default)]
    pub theme: Theme,
    /// Seed for a reproducible run. `None` seeds from the clock.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Force-field constants.
    #[serde(default)]
    pub tuning: ForceTuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            technique: Technique::default(),
            spawn_rate: default_spawn_rate(),
            min_speed: default_min_speed(),
            max_speed: default_max_speed(),
            theme: Theme::default(),
            seed: None,
            tuning: ForceTuning::default(),
        }
    }
}

impl SimConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a configuration from a JSON file.
    ///
    /// Out-of-range values are sanitized rather than rejected.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), technique = %config.technique, "loaded config");
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Whether this configuration spawns particles at all.
    pub fn spawning_enabled(&self) -> bool {
        self.spawn_rate.is_finite() && self.spawn_rate > 0.0
    }

    /// Speed band with the same corrections as [`sanitized`](Self::sanitized),
    /// without logging.
    ///
    /// Spawning reads the band through this, so a config edited in place
    /// (e.g. via `config_mut`) can never hand the RNG a bad range.
    pub fn speed_band(&self) -> (f32, f32) {
        let clean = |s: f32| if valid_speed(s) { s } else { 0.0 };
        let (min, max) = (clean(self.min_speed), clean(self.max_speed));
        if min <= max {
            (min, max)
        } else {
            (max, min)
        }
    }

    /// Map out-of-range values to safe ones.
    ///
    /// - negative or non-finite spawn rate becomes 0 (disabled)
    /// - negative or non-finite speeds become 0
    /// - an inverted speed band is swapped
    pub fn sanitized(mut self) -> Self {
        if !self.spawning_enabled() && self.spawn_rate != 0.0 {
            tracing::warn!(
                spawn_rate = self.spawn_rate,
                "spawn rate out of range, spawning disabled"
            );
            self.spawn_rate = 0.0;
        }
        let speeds = [
            ("min_speed", &mut self.min_speed),
            ("max_speed", &mut self.max_speed),
        ];
        for (name, speed) in speeds {
            if !valid_speed(*speed) {
                tracing::warn!(field = name, value = *speed, "speed out of range, using 0");
                *speed = 0.0;
            }
        }
        if self.min_speed > self.max_speed {
            tracing::warn!(
                min_speed = self.min_speed,
                max_speed = self.max_speed,
                "speed band inverted, swapping"
            );
            std::mem::swap(&mut self.min_speed, &mut self.max_speed);
        }
        self
    }
}

fn valid_speed(speed: f32) -> bool {
    speed.is_finite() && speed >= 0.0
}
