//! Board module - manages the puzzle grid
//!
//! The board is a 4x4 grid of tile values where 0 marks an empty cell and
//! every other cell holds a power of two.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (row, col) where row 0 is the top and col 0 is the left edge.

use arrayvec::ArrayVec;

use crate::types::{Direction, Line, BOARD_SIZE, CELL_COUNT, MAX_TILE};

/// The game board - 4 rows x 4 columns using flat array storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (row * SIZE + col)
    cells: [u32; CELL_COUNT],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [0; CELL_COUNT],
        }
    }

    /// Build a board from rows (top to bottom)
    pub fn from_rows(rows: [Line; BOARD_SIZE]) -> Self {
        let mut board = Self::new();
        for (row, values) in rows.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                board.cells[row * BOARD_SIZE + col] = value;
            }
        }
        board
    }

    /// Copy the board out as rows (top to bottom)
    pub fn to_rows(&self) -> [Line; BOARD_SIZE] {
        let mut rows = [[0; BOARD_SIZE]; BOARD_SIZE];
        self.write_grid(&mut rows);
        rows
    }

    /// Write the board into a caller-owned grid without allocating
    pub fn write_grid(&self, out: &mut [Line; BOARD_SIZE]) {
        for (row, dst) in out.iter_mut().enumerate() {
            let start = row * BOARD_SIZE;
            dst.copy_from_slice(&self.cells[start..start + BOARD_SIZE]);
        }
    }

    #[inline(always)]
    fn index(row: usize, col: usize) -> Option<usize> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return None;
        }
        Some(row * BOARD_SIZE + col)
    }

    /// Get cell value at (row, col), `None` if out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        Self::index(row, col).map(|idx| self.cells[idx])
    }

    /// Set cell value at (row, col)
    /// Returns false if out of bounds
    pub fn set(&mut self, row: usize, col: usize, value: u32) -> bool {
        match Self::index(row, col) {
            Some(idx) => {
                self.cells[idx] = value;
                true
            }
            None => false,
        }
    }

    /// Read line `i` for the given direction's axis.
    ///
    /// Rows are read left to right, columns top to bottom, regardless of
    /// whether the direction compacts towards the far end.
    pub fn line(&self, dir: Direction, i: usize) -> Line {
        let mut out = [0; BOARD_SIZE];
        for (k, slot) in out.iter_mut().enumerate() {
            *slot = self.cells[Self::line_index(dir, i, k)];
        }
        out
    }

    /// Write line `i` back using the same orientation as [`Board::line`]
    pub fn set_line(&mut self, dir: Direction, i: usize, line: Line) {
        for (k, value) in line.into_iter().enumerate() {
            self.cells[Self::line_index(dir, i, k)] = value;
        }
    }

    #[inline(always)]
    fn line_index(dir: Direction, i: usize, k: usize) -> usize {
        if dir.is_vertical() {
            k * BOARD_SIZE + i
        } else {
            i * BOARD_SIZE + k
        }
    }

    /// Flat indices of all empty cells, in row-major order
    pub fn empty_cells(&self) -> ArrayVec<usize, CELL_COUNT> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 0)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    pub fn tile_count(&self) -> usize {
        CELL_COUNT - self.empty_count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&v| v != 0)
    }

    /// Largest tile on the board (0 when empty)
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Every cell is 0 or a power of two no larger than [`MAX_TILE`]
    pub fn is_well_formed(&self) -> bool {
        self.cells
            .iter()
            .all(|&v| v == 0 || (v.is_power_of_two() && v <= MAX_TILE))
    }

    pub fn cells(&self) -> &[u32; CELL_COUNT] {
        &self.cells
    }

    pub(crate) fn set_index(&mut self, idx: usize, value: u32) {
        self.cells[idx] = value;
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.to_rows() {
            for (col, value) in row.iter().enumerate() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                if *value == 0 {
                    write!(f, "{:>5}", ".")?;
                } else {
                    write!(f, "{:>5}", value)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(0, 3), Some(3));
        assert_eq!(Board::index(1, 0), Some(4));
        assert_eq!(Board::index(3, 3), Some(15));
        assert_eq!(Board::index(4, 0), None);
        assert_eq!(Board::index(0, 4), None);
    }

    #[test]
    fn test_set_out_of_bounds_is_rejected() {
        let mut board = Board::new();
        assert!(!board.set(4, 0, 2));
        assert!(board.set(3, 3, 2));
        assert_eq!(board.get(3, 3), Some(2));
        assert_eq!(board.get(9, 9), None);
    }

    #[test]
    fn test_rows_and_columns_read_in_natural_order() {
        let board = Board::from_rows([
            [1, 2, 3, 4],
            [5, 6, 7, 8],
            [9, 10, 11, 12],
            [13, 14, 15, 16],
        ]);

        assert_eq!(board.line(Direction::Left, 1), [5, 6, 7, 8]);
        assert_eq!(board.line(Direction::Right, 1), [5, 6, 7, 8]);
        assert_eq!(board.line(Direction::Up, 2), [3, 7, 11, 15]);
        assert_eq!(board.line(Direction::Down, 2), [3, 7, 11, 15]);
    }

    #[test]
    fn test_set_line_writes_column() {
        let mut board = Board::new();
        board.set_line(Direction::Up, 3, [2, 4, 8, 16]);
        assert_eq!(board.get(0, 3), Some(2));
        assert_eq!(board.get(3, 3), Some(16));
        assert_eq!(board.tile_count(), 4);
    }

    #[test]
    fn test_empty_cells_and_fullness() {
        let mut board = Board::new();
        assert_eq!(board.empty_cells().len(), 16);
        assert!(!board.is_full());

        for idx in 0..16 {
            board.set_index(idx, 2);
        }
        assert!(board.is_full());
        assert!(board.empty_cells().is_empty());

        board.set(2, 1, 0);
        assert_eq!(board.empty_cells().as_slice(), &[9]);
    }

    #[test]
    fn test_well_formed_rejects_non_powers() {
        let mut board = Board::new();
        board.set(0, 0, 2048);
        assert!(board.is_well_formed());
        board.set(0, 1, 6);
        assert!(!board.is_well_formed());
    }

    #[test]
    fn test_well_formed_caps_tile_size() {
        let mut board = Board::new();
        board.set(3, 3, MAX_TILE);
        assert!(board.is_well_formed());
        board.set(3, 3, MAX_TILE << 1);
        assert!(!board.is_well_formed());
    }

    #[test]
    fn test_rows_roundtrip() {
        let rows = [[0, 2, 0, 4], [8, 0, 0, 0], [0, 0, 16, 0], [0, 0, 0, 2048]];
        assert_eq!(Board::from_rows(rows).to_rows(), rows);
        assert_eq!(Board::from_rows(rows).max_tile(), 2048);
    }
}
