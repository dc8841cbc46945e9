//! Configuration for races and the terminal UI.
//!
//! A [`Config`] is read from a JSON file. Every section and field is
//! optional and falls back to its default, so `{}` is a valid file.
//!
//! ```json
//! {
//!   "race": { "length": 30, "tick_interval_ms": 50, "seed": 7 },
//!   "ui": { "symbols": ["♘", "♞"] },
//!   "roster": [
//!     { "symbol": "♘", "name": "Pegasus", "confidence": 0.7 },
//!     { "symbol": "♞", "name": "Nightmare", "confidence": 0.4 }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::horse::Horse;
use crate::race::RaceRules;

/// Longest accepted track. Each frame holds every lane at full width.
pub const MAX_LENGTH: u32 = 999_999;

/// Root of the configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Race settings.
    pub race: RaceConfig,
    /// Terminal UI settings.
    pub ui: UiConfig,
    /// Horses entered before the first race.
    pub roster: Vec<Horse>,
}

/// Race settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Track length in units.
    pub length: u32,
    /// Pause between ticks, in milliseconds.
    pub tick_interval_ms: u64,
    /// Scale of the fall probability, `fall_scale * confidence²`.
    pub fall_scale: f64,
    /// Confidence added to the winner, capped at 1.
    pub winner_bonus: f64,
    /// Fixed seed for reproducible races. Entropy when absent.
    pub seed: Option<u64>,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            length: 20,
            tick_interval_ms: 100,
            fall_scale: 0.1,
            winner_bonus: 0.1,
            seed: None,
        }
    }
}

/// Terminal UI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Redraw rate.
    pub target_fps: u32,
    /// Symbols offered by the horse form.
    pub symbols: Vec<char>,
    /// Starting confidence in the horse form.
    pub default_confidence: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            target_fps: 30,
            symbols: vec!['♘', '♞', '♜', '♚', '♝', '♛'],
            default_confidence: 0.5,
        }
    }
}

impl Config {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.race.length == 0 {
            return Err(ConfigError::invalid("race.length must be positive"));
        }
        if self.race.length > MAX_LENGTH {
            return Err(ConfigError::invalid(format!(
                "race.length must be at most {MAX_LENGTH}, got {}",
                self.race.length
            )));
        }
        check_unit("race.fall_scale", self.race.fall_scale)?;
        check_unit("race.winner_bonus", self.race.winner_bonus)?;
        if self.ui.target_fps == 0 {
            return Err(ConfigError::invalid("ui.target_fps must be positive"));
        }
        if self.ui.symbols.is_empty() {
            return Err(ConfigError::invalid("ui.symbols must not be empty"));
        }
        check_unit("ui.default_confidence", self.ui.default_confidence)?;
        if let Some(horse) = self.roster.iter().find(|h| h.name().trim().is_empty()) {
            return Err(ConfigError::invalid(format!(
                "roster entry with symbol {:?} has no name",
                horse.symbol()
            )));
        }
        Ok(())
    }

    /// Race rules described by the `race` section.
    pub fn rules(&self) -> RaceRules {
        RaceRules {
            fall_scale: self.race.fall_scale,
            winner_bonus: self.race.winner_bonus,
            tick_interval: Duration::from_millis(self.race.tick_interval_ms),
        }
    }
}

fn check_unit(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(format!(
            "{field} must be between 0 and 1, got {value}"
        )))
    }
}
