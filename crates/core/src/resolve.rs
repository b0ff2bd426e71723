//! Move resolver - compacts and merges board lines
//!
//! Each slide resolves the four lines on one axis independently:
//!
//! 1. Drop empty cells, keeping order. Down/Right work from the far end.
//! 2. Scan adjacent pairs once; equal tiles merge into the leading cell and
//!    the trailing cell empties. A tile takes part in at most one merge.
//! 3. Drop the emptied cells and pad back to full length on the near side.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::types::{Direction, Line, BOARD_SIZE, MAX_TILE};

/// Result of sliding the whole board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct MoveOutcome {
    /// Whether any cell changed value
    pub changed: bool,
    /// Sum of all tiles produced by merges
    pub points: u32,
    /// Number of merges performed
    pub merges: u32,
}

/// Resolve a single line.
///
/// `reversed` compacts towards the end of the line (Down/Right).
/// Returns the new line and the points scored by its merges.
pub fn resolve_line(line: Line, reversed: bool) -> (Line, u32) {
    let (out, points, _) = resolve_line_counted(line, reversed);
    (out, points)
}

/// Whether two neighbouring tiles merge. The product may not exceed [`MAX_TILE`].
pub fn can_merge(a: u32, b: u32) -> bool {
    a != 0 && a == b && a <= MAX_TILE / 2
}

fn resolve_line_counted(line: Line, reversed: bool) -> (Line, u32, u32) {
    let mut work: ArrayVec<u32, BOARD_SIZE> =
        line.iter().copied().filter(|&v| v != 0).collect();
    if reversed {
        work.reverse();
    }

    let mut points = 0u32;
    let mut merges = 0u32;
    for i in 0..work.len().saturating_sub(1) {
        if can_merge(work[i], work[i + 1]) {
            work[i] *= 2;
            work[i + 1] = 0;
            points = points.saturating_add(work[i]);
            merges += 1;
        }
    }

    let mut out = [0u32; BOARD_SIZE];
    for (k, value) in work.into_iter().filter(|&v| v != 0).enumerate() {
        if reversed {
            out[BOARD_SIZE - 1 - k] = value;
        } else {
            out[k] = value;
        }
    }

    (out, points, merges)
}

/// Slide every line of the board in `dir`, mutating it in place
pub fn slide(board: &mut Board, dir: Direction) -> MoveOutcome {
    let mut outcome = MoveOutcome::default();
    for i in 0..BOARD_SIZE {
        let before = board.line(dir, i);
        let (after, points, merges) = resolve_line_counted(before, dir.is_reversed());
        if after != before {
            outcome.changed = true;
            board.set_line(dir, i, after);
        }
        outcome.points = outcome.points.saturating_add(points);
        outcome.merges += merges;
    }
    outcome
}

/// Whether sliding in `dir` would change the board
pub fn can_slide(board: &Board, dir: Direction) -> bool {
    (0..BOARD_SIZE).any(|i| {
        let line = board.line(dir, i);
        resolve_line(line, dir.is_reversed()).0 != line
    })
}

/// Directions that would change the board, in [`Direction::ALL`] order
pub fn legal_directions(board: &Board) -> ArrayVec<Direction, 4> {
    Direction::ALL
        .into_iter()
        .filter(|&dir| can_slide(board, dir))
        .collect()
}
