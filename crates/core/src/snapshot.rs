use crate::spawn::Spawn;
use crate::types::{Direction, Line, Phase, BOARD_SIZE};

/// Sink for presenting a session to some visual surface.
///
/// Implementors receive every cell on each presentation; they are expected
/// to style cells through [`TileTier`](crate::types::TileTier) rather than
/// raw values.
pub trait RenderAdapter {
    fn set_cell(&mut self, row: usize, col: usize, value: u32);

    fn set_score(&mut self, _score: u32) {}

    fn set_phase(&mut self, _phase: Phase) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: [Line; BOARD_SIZE],
    pub phase: Phase,
    pub score: u32,
    pub best_score: u32,
    pub episode_id: u32,
    pub seed: u64,
    pub moves: u32,
    pub max_tile: u32,
    pub spawn_pending: bool,
    pub spawn_timer_ms: u32,
    pub last_spawn: Option<Spawn>,
    /// Indexed like [`Direction::ALL`]
    pub legal_moves: [bool; 4],
}

impl GameSnapshot {
    pub fn is_legal(&self, dir: Direction) -> bool {
        Direction::ALL
            .iter()
            .position(|&d| d == dir)
            .map(|i| self.legal_moves[i])
            .unwrap_or(false)
    }

    /// Push every cell, then score and phase, into `out`
    pub fn present<R: RenderAdapter + ?Sized>(&self, out: &mut R) {
        for (row, values) in self.board.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                out.set_cell(row, col, value);
            }
        }
        out.set_score(self.score);
        out.set_phase(self.phase);
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0; BOARD_SIZE]; BOARD_SIZE],
            phase: Phase::Idle,
            score: 0,
            best_score: 0,
            episode_id: 0,
            seed: 0,
            moves: 0,
            max_tile: 0,
            spawn_pending: false,
            spawn_timer_ms: 0,
            last_spawn: None,
            legal_moves: [false; 4],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        cells: Vec<(usize, usize, u32)>,
        score: Option<u32>,
        phase: Option<Phase>,
    }

    impl RenderAdapter for Recorder {
        fn set_cell(&mut self, row: usize, col: usize, value: u32) {
            self.cells.push((row, col, value));
        }

        fn set_score(&mut self, score: u32) {
            self.score = Some(score);
        }

        fn set_phase(&mut self, phase: Phase) {
            self.phase = Some(phase);
        }
    }

    #[test]
    fn present_visits_every_cell_in_row_major_order() {
        let mut snap = GameSnapshot::default();
        snap.board[1][2] = 8;
        snap.score = 12;
        snap.phase = Phase::Active;

        let mut rec = Recorder::default();
        snap.present(&mut rec);

        assert_eq!(rec.cells.len(), 16);
        assert_eq!(rec.cells[0], (0, 0, 0));
        assert_eq!(rec.cells[6], (1, 2, 8));
        assert_eq!(rec.cells[15], (3, 3, 0));
        assert_eq!(rec.score, Some(12));
        assert_eq!(rec.phase, Some(Phase::Active));
    }
}
