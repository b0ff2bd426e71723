//! Game state module - manages a complete puzzle session
//!
//! This module ties together the board, move resolver, spawn policy and
//! terminal check. It owns the session lifecycle (`Idle → Active → Over`),
//! the running score, and the short pause between a slide and its spawn.

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::board::Board;
use crate::config::{ConfigError, GameConfig, SpawnRule};
use crate::resolve::{self, MoveOutcome};
use crate::rules;
use crate::snapshot::GameSnapshot;
use crate::spawn::{Spawn, SpawnPolicy};
use crate::types::*;

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    rng: SmallRng,
    spawner: SpawnPolicy,
    phase: Phase,
    score: u32,
    /// Highest score reached by any session of this state (memory only).
    best_score: u32,
    /// Monotonic session id (increments on restart).
    episode_id: u32,
    /// Slides accepted in the current session.
    moves: u32,
    /// Countdown until the pending spawn lands; `None` when settled.
    spawn_timer_ms: Option<u32>,
    last_spawn: Option<Spawn>,
}

impl GameState {
    /// Create an idle session with default tunables and the given seed
    pub fn new(seed: u64) -> Self {
        Self::from_valid(GameConfig::with_seed(seed))
    }

    /// Create an idle session from a custom configuration
    pub fn with_config(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: GameConfig) -> Self {
        Self {
            config,
            board: Board::new(),
            rng: SmallRng::seed_from_u64(config.seed),
            spawner: SpawnPolicy::new(config.four_chance),
            phase: Phase::Idle,
            score: 0,
            best_score: 0,
            episode_id: 0,
            moves: 0,
            spawn_timer_ms: None,
            last_spawn: None,
        }
    }

    /// Leave the idle phase. Returns false if a session already started.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.begin_session();
        true
    }

    /// Throw the current session away and begin a fresh one
    pub fn restart(&mut self) {
        if self.phase != Phase::Idle {
            self.episode_id = self.episode_id.wrapping_add(1);
        }
        self.begin_session();
    }

    fn begin_session(&mut self) {
        self.board.clear();
        self.score = 0;
        self.moves = 0;
        self.spawn_timer_ms = None;
        self.last_spawn = None;
        for _ in 0..INITIAL_TILES {
            self.last_spawn = self
                .spawner
                .place(&mut self.board, &mut self.rng, INITIAL_TILE_VALUE);
        }
        self.phase = Phase::Active;
        info!(
            "session {} started (seed {})",
            self.episode_id, self.config.seed
        );
    }

    /// Resume an active session from an existing position.
    ///
    /// Returns false (leaving the state untouched) if the board holds a
    /// value that is not a power of two or exceeds [`MAX_TILE`].
    pub fn load(&mut self, board: Board, score: u32) -> bool {
        if !board.is_well_formed() {
            return false;
        }
        if self.phase != Phase::Idle {
            self.episode_id = self.episode_id.wrapping_add(1);
        }
        self.board = board;
        self.score = score;
        self.best_score = self.best_score.max(score);
        self.moves = 0;
        self.spawn_timer_ms = None;
        self.last_spawn = None;
        self.phase = Phase::Active;
        debug!("session {} loaded with score {}", self.episode_id, score);
        true
    }

    /// Slide the board.
    ///
    /// Returns `None` when the input is ignored: outside an active session,
    /// or while the previous slide's spawn is still pending.
    pub fn slide(&mut self, dir: Direction) -> Option<MoveOutcome> {
        if self.phase != Phase::Active {
            debug!("ignoring {} while {}", dir.as_str(), self.phase.as_str());
            return None;
        }
        if self.spawn_timer_ms.is_some() {
            debug!("ignoring {} while a spawn is pending", dir.as_str());
            return None;
        }

        let outcome = resolve::slide(&mut self.board, dir);
        self.score = self.score.saturating_add(outcome.points);
        self.best_score = self.best_score.max(self.score);
        self.moves = self.moves.wrapping_add(1);

        let wants_spawn = match self.config.spawn_rule {
            SpawnRule::Always => true,
            SpawnRule::OnChange => outcome.changed,
        };

        if wants_spawn {
            if self.config.spawn_delay_ms == 0 {
                self.finish_spawn();
            } else {
                self.spawn_timer_ms = Some(self.config.spawn_delay_ms);
            }
        } else if rules::is_terminal(&self.board) {
            self.end_session();
        }

        Some(outcome)
    }

    fn finish_spawn(&mut self) {
        match self.spawner.spawn(&mut self.board, &mut self.rng) {
            Some(spawn) => {
                debug!("spawned {} at ({}, {})", spawn.value, spawn.row, spawn.col);
                self.last_spawn = Some(spawn);
                if self.config.spawn_rule == SpawnRule::OnChange
                    && rules::is_terminal(&self.board)
                {
                    self.end_session();
                }
            }
            None => {
                self.last_spawn = None;
                if rules::is_terminal(&self.board) {
                    self.end_session();
                }
            }
        }
    }

    fn end_session(&mut self) {
        self.phase = Phase::Over;
        info!(
            "session {} over: score {}, max tile {}, {} moves",
            self.episode_id,
            self.score,
            self.board.max_tile(),
            self.moves
        );
    }

    /// Advance timers. Returns true if a pending spawn landed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        let Some(remaining) = self.spawn_timer_ms else {
            return false;
        };

        let remaining = remaining.saturating_sub(elapsed_ms);
        if remaining == 0 {
            self.spawn_timer_ms = None;
            self.finish_spawn();
            return true;
        }
        self.spawn_timer_ms = Some(remaining);
        false
    }

    /// Land a pending spawn immediately. Returns true if one was pending.
    pub fn settle(&mut self) -> bool {
        if self.spawn_timer_ms.take().is_none() {
            return false;
        }
        self.finish_spawn();
        true
    }

    /// Apply an action. Returns false if it was ignored.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Slide(dir) => self.slide(dir).is_some(),
            GameAction::Restart => {
                self.restart();
                true
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Over
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn spawn_pending(&self) -> bool {
        self.spawn_timer_ms.is_some()
    }

    pub fn last_spawn(&self) -> Option<Spawn> {
        self.last_spawn
    }

    #[cfg(test)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_grid(&mut out.board);
        out.phase = self.phase;
        out.score = self.score;
        out.best_score = self.best_score;
        out.episode_id = self.episode_id;
        out.seed = self.config.seed;
        out.moves = self.moves;
        out.max_tile = self.board.max_tile();
        out.spawn_pending = self.spawn_timer_ms.is_some();
        out.spawn_timer_ms = self.spawn_timer_ms.unwrap_or(0);
        out.last_spawn = self.last_spawn;
        for (slot, dir) in out.legal_moves.iter_mut().zip(Direction::ALL) {
            *slot = self.phase == Phase::Active && resolve::can_slide(&self.board, dir);
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
