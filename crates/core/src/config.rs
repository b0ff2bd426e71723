//! Session configuration

use thiserror::Error;

use crate::types::{DEFAULT_FOUR_CHANCE, SPAWN_DELAY_MS};

/// Longest spawn delay accepted by [`GameConfig::validate`]
pub const MAX_SPAWN_DELAY_MS: u32 = 5_000;

/// When a slide is followed by a spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpawnRule {
    /// After every slide, including ones that moved nothing
    #[default]
    Always,
    /// Only after slides that changed the board
    OnChange,
}

impl SpawnRule {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "always" => Some(SpawnRule::Always),
            "onchange" | "changed" => Some(SpawnRule::OnChange),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnRule::Always => "always",
            SpawnRule::OnChange => "on-change",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("four_chance must be within [0, 1], got {0}")]
    FourChance(f64),
    #[error("spawn delay of {0}ms exceeds the {max}ms limit", max = MAX_SPAWN_DELAY_MS)]
    SpawnDelay(u32),
    #[error("unknown spawn rule: {0}")]
    SpawnRule(String),
}

/// Tunables for a [`GameState`](crate::game_state::GameState)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    /// Seed for tile placement
    pub seed: u64,
    /// Delay between a slide and its spawn; 0 spawns immediately
    pub spawn_delay_ms: u32,
    /// Probability that a spawned tile is a 4
    pub four_chance: f64,
    pub spawn_rule: SpawnRule,
}

impl GameConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.four_chance) {
            return Err(ConfigError::FourChance(self.four_chance));
        }
        if self.spawn_delay_ms > MAX_SPAWN_DELAY_MS {
            return Err(ConfigError::SpawnDelay(self.spawn_delay_ms));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            spawn_delay_ms: SPAWN_DELAY_MS,
            four_chance: DEFAULT_FOUR_CHANCE,
            spawn_rule: SpawnRule::Always,
        }
    }
}

/// Parse a spawn rule name, reporting unknown names as [`ConfigError`]
pub fn parse_spawn_rule(s: &str) -> Result<SpawnRule, ConfigError> {
    SpawnRule::from_str(s).ok_or_else(|| ConfigError::SpawnRule(s.to_string()))
}
