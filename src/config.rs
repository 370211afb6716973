//! Tunable game parameters.
//!
//! Defaults reproduce the shipped balance. Overrides come from a JSON object
//! stored in localStorage under [`CONFIG_STORAGE_KEY`]; missing fields keep
//! their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_STORAGE_KEY: &str = "kaito_adventure_config";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Discrete logic ticks per real-time second.
    pub ticks_per_sec: u32,
    pub autosave_secs: u32,
    pub weather_change_secs: u32,
    /// Maximum number of entries kept in the message log.
    pub log_capacity: usize,

    pub craft_base_chance: f64,
    pub craft_chance_per_level: f64,
    pub craft_max_chance: f64,
    pub craft_xp: u32,

    pub flee_chance: f64,
    /// Fraction of gold lost when the player is knocked out.
    pub defeat_gold_penalty: f64,

    /// XP needed for the next level is `level * xp_per_level`.
    pub xp_per_level: u32,
    pub skill_uses_per_level: u32,
    pub max_skill_level: u32,
    /// Sell price bonus per player level above 1.
    pub sell_level_bonus: f64,

    pub storage_key: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ticks_per_sec: 10,
            autosave_secs: 30,
            weather_change_secs: 300,
            log_capacity: 30,
            craft_base_chance: 0.8,
            craft_chance_per_level: 0.02,
            craft_max_chance: 0.95,
            craft_xp: 10,
            flee_chance: 0.5,
            defeat_gold_penalty: 0.1,
            xp_per_level: 100,
            skill_uses_per_level: 5,
            max_skill_level: 10,
            sell_level_bonus: 0.05,
            storage_key: "kaito_adventure_save".to_string(),
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticks_per_sec == 0 {
            return Err(ConfigError::Invalid { field: "ticks_per_sec", reason: "must be positive" });
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::Invalid { field: "log_capacity", reason: "must be positive" });
        }
        if self.xp_per_level == 0 {
            return Err(ConfigError::Invalid { field: "xp_per_level", reason: "must be positive" });
        }
        if self.skill_uses_per_level == 0 {
            return Err(ConfigError::Invalid {
                field: "skill_uses_per_level",
                reason: "must be positive",
            });
        }
        let probabilities = [
            ("craft_base_chance", self.craft_base_chance),
            ("craft_max_chance", self.craft_max_chance),
            ("flee_chance", self.flee_chance),
            ("defeat_gold_penalty", self.defeat_gold_penalty),
        ];
        for (field, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid { field, reason: "must be within 0.0..=1.0" });
            }
        }
        if self.storage_key.is_empty() {
            return Err(ConfigError::Invalid { field: "storage_key", reason: "must not be empty" });
        }
        Ok(())
    }

    /// Convert seconds to logic ticks at the configured rate.
    pub fn secs_to_ticks(&self, secs: u32) -> u64 {
        secs as u64 * self.ticks_per_sec as u64
    }
}

/// Read overrides from localStorage, falling back to defaults on any problem.
pub fn load_config() -> GameConfig {
    let json = web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item(CONFIG_STORAGE_KEY).ok().flatten());
    match json {
        Some(json) => GameConfig::from_json(&json).unwrap_or_else(|e| {
            tracing::warn!("ignoring config override: {e}");
            GameConfig::default()
        }),
        None => GameConfig::default(),
    }
}
