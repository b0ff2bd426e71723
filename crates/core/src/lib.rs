//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the puzzle rules, session state, and tile placement.
//! It has **no dependencies** on terminals, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Every rule is covered by unit tests
//! - **Portable**: Runs behind a terminal, a headless pipe, or a benchmark
//!
//! # Module Structure
//!
//! - [`board`]: 4x4 grid of tile values
//! - [`resolve`]: line compaction and merging for a slide
//! - [`spawn`]: weighted random tile placement
//! - [`rules`]: terminal check
//! - [`game_state`]: session lifecycle, score, spawn delay
//! - [`snapshot`]: copyable view of a session and the [`RenderAdapter`] seam
//! - [`config`]: session tunables and validation
//!
//! # Game Rules
//!
//! - A slide resolves the four lines on one axis; equal neighbours merge once
//! - Every merge adds the merged tile's value to the score
//! - After a slide one tile is spawned: a 2 or a 4 with even odds
//! - The session ends when a spawn finds the board full and no neighbours match
//!
//! # Example
//!
//! ```
//! use tui_2048_core::{GameConfig, GameState};
//! use tui_2048_types::{Direction, Phase};
//!
//! let mut game = GameState::with_config(GameConfig {
//!     seed: 42,
//!     spawn_delay_ms: 0,
//!     ..GameConfig::default()
//! })
//! .unwrap();
//! game.start();
//! assert_eq!(game.board().tile_count(), 2);
//!
//! game.slide(Direction::Left);
//! assert_eq!(game.phase(), Phase::Active);
//! ```
//!
//! # Timing
//!
//! The spawn that follows a slide lands after `spawn_delay_ms` (200ms by
//! default). Call [`GameState::tick`](game_state::GameState::tick) every frame
//! with the elapsed time; slides arriving before the spawn lands are ignored.

pub mod board;
pub mod config;
pub mod game_state;
pub mod resolve;
pub mod rules;
pub mod snapshot;
pub mod spawn;

pub use tui_2048_types as types;

pub use board::Board;
pub use config::{parse_spawn_rule, ConfigError, GameConfig, SpawnRule};
pub use game_state::GameState;
pub use resolve::{can_merge, can_slide, legal_directions, resolve_line, slide, MoveOutcome};
pub use rules::{has_adjacent_pair, is_terminal};
pub use snapshot::{GameSnapshot, RenderAdapter};
pub use spawn::{Spawn, SpawnPolicy};
