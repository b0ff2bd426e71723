//! Command-line options shared by the terminal and headless binaries.

use clap::Args;

use crate::core::{parse_spawn_rule, ConfigError, GameConfig, SpawnRule};
use crate::types::{DEFAULT_FOUR_CHANCE, SPAWN_DELAY_MS};

/// Session tunables. Every flag falls back to a `TUI2048_*` variable.
#[derive(Args, Debug, Clone)]
pub struct GameArgs {
    /// Seed for tile placement; omit for a time-based seed
    #[arg(long, env = "TUI2048_SEED")]
    pub seed: Option<u64>,

    /// Pause between a slide and its spawned tile, in milliseconds
    #[arg(long, env = "TUI2048_SPAWN_DELAY_MS", default_value_t = SPAWN_DELAY_MS)]
    pub spawn_delay_ms: u32,

    /// Probability that a spawned tile is a 4
    #[arg(long, env = "TUI2048_FOUR_CHANCE", default_value_t = DEFAULT_FOUR_CHANCE)]
    pub four_chance: f64,

    /// When to spawn: `always` (even after a slide that moved nothing) or `on-change`
    #[arg(
        long,
        env = "TUI2048_SPAWN_RULE",
        default_value = "always",
        value_parser = parse_spawn_rule
    )]
    pub spawn_rule: SpawnRule,
}

impl GameArgs {
    /// Build a validated config, drawing a seed from the clock if none was given.
    pub fn to_config(&self) -> Result<GameConfig, ConfigError> {
        let config = GameConfig {
            seed: self.seed.unwrap_or_else(clock_seed),
            spawn_delay_ms: self.spawn_delay_ms,
            four_chance: self.four_chance,
            spawn_rule: self.spawn_rule,
        };
        config.validate()?;
        Ok(config)
    }
}

fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}
