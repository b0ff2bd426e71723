//! Spawn policy - places new tiles after a slide
//!
//! Picks uniformly among the empty cells (collected up front, so a nearly
//! full board costs the same as an empty one) and writes a 2 or a 4.

use rand::Rng;

use crate::board::Board;
use crate::types::{BOARD_SIZE, DEFAULT_FOUR_CHANCE};

/// A tile placed by the spawn policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Spawn {
    pub row: usize,
    pub col: usize,
    pub value: u32,
}

/// Weighted random tile placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPolicy {
    four_chance: f64,
}

impl SpawnPolicy {
    /// `four_chance` must lie within `[0, 1]`; callers validate it through
    /// [`GameConfig::validate`](crate::config::GameConfig::validate).
    pub fn new(four_chance: f64) -> Self {
        Self { four_chance }
    }

    /// Spawn a 2 or a 4 into a random empty cell.
    ///
    /// Returns `None` without touching the board when it is full.
    pub fn spawn<R: Rng + ?Sized>(&self, board: &mut Board, rng: &mut R) -> Option<Spawn> {
        let empty = board.empty_cells();
        if empty.is_empty() {
            return None;
        }
        let idx = empty[rng.gen_range(0..empty.len())];
        let value = if rng.gen_bool(self.four_chance) { 4 } else { 2 };
        board.set_index(idx, value);
        Some(Spawn {
            row: idx / BOARD_SIZE,
            col: idx % BOARD_SIZE,
            value,
        })
    }

    /// Place a tile of fixed `value` into a random empty cell
    pub fn place<R: Rng + ?Sized>(
        &self,
        board: &mut Board,
        rng: &mut R,
        value: u32,
    ) -> Option<Spawn> {
        let empty = board.empty_cells();
        if empty.is_empty() {
            return None;
        }
        let idx = empty[rng.gen_range(0..empty.len())];
        board.set_index(idx, value);
        Some(Spawn {
            row: idx / BOARD_SIZE,
            col: idx % BOARD_SIZE,
            value,
        })
    }
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_FOUR_CHANCE)
    }
}
