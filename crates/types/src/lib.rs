//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, headless protocol).
//!
//! # Board Dimensions
//!
//! The puzzle is played on a square grid:
//!
//! - **Rows**: 4 (indexed 0-3, top to bottom)
//! - **Columns**: 4 (indexed 0-3, left to right)
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `SPAWN_DELAY_MS` | 200 | Pause between a slide and the tile spawn |
//!
//! # Examples
//!
//! ```
//! use tui_2048_types::{Direction, GameAction, TileTier, BOARD_SIZE};
//!
//! // Parse a direction (case-insensitive)
//! assert_eq!(Direction::from_str("Left"), Some(Direction::Left));
//!
//! // Actions wrap directions
//! let action = GameAction::from_str("up").unwrap();
//! assert_eq!(action, GameAction::Slide(Direction::Up));
//!
//! // Style tiers
//! assert_eq!(TileTier::for_value(64), TileTier::V64);
//! assert_eq!(TileTier::for_value(4096), TileTier::Plain);
//!
//! assert_eq!(BOARD_SIZE, 4);
//! ```

/// Number of rows and columns on the board
pub const BOARD_SIZE: usize = 4;

/// Total number of cells on the board
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Delay between a slide settling and the follow-up spawn.
pub const SPAWN_DELAY_MS: u32 = 200;

/// Largest tile a board may hold; pairs of it no longer merge.
pub const MAX_TILE: u32 = 1 << 30;

/// Tiles placed on a fresh board.
pub const INITIAL_TILES: usize = 2;

/// Value of the tiles placed on a fresh board.
pub const INITIAL_TILE_VALUE: u32 = 2;

/// Probability that a spawned tile is a 4 rather than a 2.
pub const DEFAULT_FOUR_CHANCE: f64 = 0.5;

/// A board line: one row or one column.
pub type Line = [u32; BOARD_SIZE];

/// Slide directions
///
/// - **Left/Right** resolve rows
/// - **Up/Down** resolve columns
///
/// Down and Right compact towards the far end of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in a fixed order (up, down, left, right)
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Parse direction from string (case-insensitive)
    ///
    /// Accepts full names or single letters.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_2048_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("up"), Some(Direction::Up));
    /// assert_eq!(Direction::from_str("R"), Some(Direction::Right));
    /// assert_eq!(Direction::from_str("sideways"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Whether this direction resolves columns rather than rows
    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Whether lines are compacted towards their far end
    pub fn is_reversed(&self) -> bool {
        matches!(self, Direction::Down | Direction::Right)
    }
}

/// Session lifecycle phase
///
/// ```text
/// Idle --start--> Active --no moves left--> Over
///                   ^                         |
///                   +--------restart----------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// No session started yet
    #[default]
    Idle,
    /// Accepting slides
    Active,
    /// Terminal state, only restart is accepted
    Over,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Active => "active",
            Phase::Over => "over",
        }
    }
}

/// Actions that can be applied to a session
///
/// Used by both the terminal front-end and the headless adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Slide every line in the given direction
    Slide(Direction),
    /// Start a new session (from any phase)
    Restart,
}

impl GameAction {
    /// Parse action from string (for the headless protocol)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_2048_types::{Direction, GameAction};
    ///
    /// assert_eq!(GameAction::from_str("down"), Some(GameAction::Slide(Direction::Down)));
    /// assert_eq!(GameAction::from_str("restart"), Some(GameAction::Restart));
    /// assert_eq!(GameAction::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("restart") || s.eq_ignore_ascii_case("start") {
            return Some(GameAction::Restart);
        }
        Direction::from_str(s).map(GameAction::Slide)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Slide(dir) => dir.as_str(),
            GameAction::Restart => "restart",
        }
    }
}

/// Visual tier of a tile value
///
/// Eleven tiers cover 2 through 2048. Empty cells and anything above 2048
/// fall back to [`TileTier::Plain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileTier {
    V2,
    V4,
    V8,
    V16,
    V32,
    V64,
    V128,
    V256,
    V512,
    V1024,
    V2048,
    Plain,
}

impl TileTier {
    /// Tiered tiles in ascending order
    pub const TIERED: [TileTier; 11] = [
        TileTier::V2,
        TileTier::V4,
        TileTier::V8,
        TileTier::V16,
        TileTier::V32,
        TileTier::V64,
        TileTier::V128,
        TileTier::V256,
        TileTier::V512,
        TileTier::V1024,
        TileTier::V2048,
    ];

    /// Map a cell value to its tier
    pub fn for_value(value: u32) -> Self {
        match value {
            2 => TileTier::V2,
            4 => TileTier::V4,
            8 => TileTier::V8,
            16 => TileTier::V16,
            32 => TileTier::V32,
            64 => TileTier::V64,
            128 => TileTier::V128,
            256 => TileTier::V256,
            512 => TileTier::V512,
            1024 => TileTier::V1024,
            2048 => TileTier::V2048,
            _ => TileTier::Plain,
        }
    }

    /// Position in [`TileTier::TIERED`], `None` for the plain tier
    pub fn index(&self) -> Option<usize> {
        TileTier::TIERED.iter().position(|t| t == self)
    }

    /// Stable style identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            TileTier::V2 => "tile-2",
            TileTier::V4 => "tile-4",
            TileTier::V8 => "tile-8",
            TileTier::V16 => "tile-16",
            TileTier::V32 => "tile-32",
            TileTier::V64 => "tile-64",
            TileTier::V128 => "tile-128",
            TileTier::V256 => "tile-256",
            TileTier::V512 => "tile-512",
            TileTier::V1024 => "tile-1024",
            TileTier::V2048 => "tile-2048",
            TileTier::Plain => "tile-plain",
        }
    }
}
