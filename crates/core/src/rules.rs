//! Terminal check - decides whether any slide can still change the board
//!
//! A board is terminal when it has no empty cell and no two horizontally or
//! vertically adjacent cells can merge. The session only asks this
//! question once a spawn attempt has found the board full, but the fullness
//! test keeps the predicate correct on any board.

use crate::board::Board;
use crate::resolve::can_merge;
use crate::types::{Direction, BOARD_SIZE};

/// Whether any row or column holds two adjacent tiles that can merge
pub fn has_adjacent_pair(board: &Board) -> bool {
    [Direction::Left, Direction::Up].into_iter().any(|axis| {
        (0..BOARD_SIZE).any(|i| {
            let line = board.line(axis, i);
            line.windows(2).any(|w| can_merge(w[0], w[1]))
        })
    })
}

/// No slide in any direction can change the board
pub fn is_terminal(board: &Board) -> bool {
    board.is_full() && !has_adjacent_pair(board)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKERBOARD: [[u32; 4]; 4] = [
        [2, 4, 2, 4],
        [4, 2, 4, 2],
        [2, 4, 2, 4],
        [4, 2, 4, 2],
    ];

    #[test]
    fn test_checkerboard_is_terminal() {
        assert!(is_terminal(&Board::from_rows(CHECKERBOARD)));
    }

    #[test]
    fn test_horizontal_pair_keeps_game_alive() {
        let mut rows = CHECKERBOARD;
        rows[1][3] = 4;
        let board = Board::from_rows(rows);
        assert!(has_adjacent_pair(&board));
        assert!(!is_terminal(&board));
    }

    #[test]
    fn test_vertical_pair_keeps_game_alive() {
        let mut rows = CHECKERBOARD;
        rows[3][0] = 2;
        let board = Board::from_rows(rows);
        assert!(has_adjacent_pair(&board));
        assert!(!is_terminal(&board));
    }

    #[test]
    fn test_board_with_gap_is_not_terminal() {
        let mut rows = CHECKERBOARD;
        rows[2][2] = 0;
        let board = Board::from_rows(rows);
        assert!(!has_adjacent_pair(&board));
        assert!(!is_terminal(&board));
    }

    #[test]
    fn test_pairs_of_largest_tile_do_not_count() {
        use crate::types::MAX_TILE;

        let mut rows = CHECKERBOARD;
        rows[0][0] = MAX_TILE;
        rows[0][1] = MAX_TILE;
        let board = Board::from_rows(rows);
        assert!(!has_adjacent_pair(&board));
        assert!(is_terminal(&board));
    }

    #[test]
    fn test_empty_cells_never_count_as_pairs() {
        let board = Board::from_rows([[0, 0, 0, 2], [0, 0, 0, 4], [0, 0, 0, 0], [0, 0, 0, 0]]);
        assert!(!has_adjacent_pair(&board));
    }
}
