use serde::{Deserialize, Serialize};

use super::{MoveError, Player};

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Number of aligned pieces needed to win.
const WIN_LENGTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[serde(rename = "")]
    Empty,
    X,
    O,
}

/// Six rows of seven cells. Row 0 is the top, row 5 is the bottom.
///
/// Columns fill bottom-up: there is never an empty cell beneath a filled one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Number of empty cells left in a column, zero off the board.
    #[cfg(test)]
    fn empty_in_column(&self, col: usize) -> usize {
        if col >= COLS {
            return 0;
        }
        (0..ROWS)
            .filter(|&row| self.cells[row][col] == Cell::Empty)
            .count()
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, player: Player) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn);
        }

        // Lowest empty row, scanning bottom-up
        let row = (0..ROWS)
            .rev()
            .find(|&row| self.cells[row][col] == Cell::Empty)
            .ok_or(MoveError::ColumnFull)?;

        self.cells[row][col] = player.to_cell();
        Ok(row)
    }

    /// Non-mutating drop: returns the resulting board and the landing row,
    /// leaving `self` untouched.
    pub fn with_piece(&self, col: usize, player: Player) -> Result<(Board, usize), MoveError> {
        let mut next = *self;
        let row = next.drop_piece(col, player)?;
        Ok((next, row))
    }

    /// Check if the board is completely full.
    ///
    /// Gravity means the top row fills last, so only row 0 is inspected.
    pub fn is_full(&self) -> bool {
        self.cells[0].iter().all(|&cell| cell != Cell::Empty)
    }

    /// Check if the piece `player` just placed at (row, col) completes a line.
    ///
    /// Local check anchored at the move: four axes, each counted outwards from
    /// the placed cell until the first mismatch.
    pub fn check_win(&self, row: usize, col: usize, player: Player) -> bool {
        let cell = player.to_cell();
        if row >= ROWS || col >= COLS || self.get(row, col) != cell {
            return false;
        }

        self.check_horizontal(row, col, cell)
            || self.check_vertical(row, col, cell)
            || self.check_diagonal_up(row, col, cell)
            || self.check_diagonal_down(row, col, cell)
    }

    /// Count matching cells stepping from (row, col) by (dr, dc), excluding
    /// the start.
    fn run_length(&self, row: usize, col: usize, dr: isize, dc: isize, cell: Cell) -> usize {
        let mut count = 0;
        let mut r = row as isize + dr;
        let mut c = col as isize + dc;
        while (0..ROWS as isize).contains(&r)
            && (0..COLS as isize).contains(&c)
            && self.cells[r as usize][c as usize] == cell
        {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }

    fn check_horizontal(&self, row: usize, col: usize, cell: Cell) -> bool {
        1 + self.run_length(row, col, 0, -1, cell) + self.run_length(row, col, 0, 1, cell)
            >= WIN_LENGTH
    }

    /// Only downward: the new piece is always the topmost in its column.
    fn check_vertical(&self, row: usize, col: usize, cell: Cell) -> bool {
        1 + self.run_length(row, col, 1, 0, cell) >= WIN_LENGTH
    }

    /// Bottom-left to top-right, /
    fn check_diagonal_up(&self, row: usize, col: usize, cell: Cell) -> bool {
        1 + self.run_length(row, col, -1, 1, cell) + self.run_length(row, col, 1, -1, cell)
            >= WIN_LENGTH
    }

    /// Top-left to bottom-right, \
    fn check_diagonal_down(&self, row: usize, col: usize, cell: Cell) -> bool {
        1 + self.run_length(row, col, -1, -1, cell) + self.run_length(row, col, 1, 1, cell)
            >= WIN_LENGTH
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
