use std::fmt;

use super::player::Player;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Wire code for an empty cell in the 0/1/2 grid exchanged with the AI service.
pub const EMPTY_CODE: u8 = 0;

/// The 6x7 grid as the AI service sees it: 0 empty, 1 human, 2 AI.
pub type WireGrid = [[u8; COLS]; ROWS];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Human,
    Ai,
}

impl Cell {
    /// Owner of the disc in this cell, if any.
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Human => Some(Player::Human),
            Cell::Ai => Some(Player::Ai),
        }
    }

    pub fn wire_code(self) -> u8 {
        match self {
            Cell::Empty => EMPTY_CODE,
            Cell::Human => Player::Human.wire_code(),
            Cell::Ai => Player::Ai.wire_code(),
        }
    }

    fn from_wire_code(code: u8) -> Option<Cell> {
        if code == EMPTY_CODE {
            return Some(Cell::Empty);
        }
        Player::from_wire_code(code).map(Player::to_cell)
    }
}

/// Immutable game board. Row 0 is the top, row 5 is the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

/// Why a column cannot take another disc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {0} is out of range (expected 0..=6)")]
    InvalidColumn(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),
}

/// A wire grid contained a code other than 0, 1 or 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid cell code {code} at row {row}, column {col}")]
pub struct InvalidCellCode {
    pub row: usize,
    pub col: usize,
    pub code: u8,
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

    /// A column is playable iff it is in range and its top cell is empty.
    pub fn is_playable(&self, col: usize) -> bool {
        col < COLS && self.cells[0][col] == Cell::Empty
    }

    /// Columns that can still take a disc, left to right.
    pub fn playable_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| self.is_playable(col)).collect()
    }

    /// Row a disc dropped into `col` would land on.
    pub fn landing_row(&self, col: usize) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn(col));
        }
        if self.cells[0][col] != Cell::Empty {
            return Err(MoveError::ColumnFull(col));
        }
        (0..ROWS)
            .rev()
            .find(|&row| self.cells[row][col] == Cell::Empty)
            .ok_or(MoveError::ColumnFull(col))
    }

    /// Return a new board with `player`'s disc in the lowest empty row of
    /// `col`, together with the row it landed on. `self` is left untouched.
    pub fn apply_move(&self, col: usize, player: Player) -> Result<(Board, usize), MoveError> {
        let row = self.landing_row(col)?;
        let mut next = *self;
        next.cells[row][col] = player.to_cell();
        Ok((next, row))
    }

    /// Discs only stack bottom-up, so a full top row means a full board.
    pub fn is_full(&self) -> bool {
        self.cells[0].iter().all(|&cell| cell != Cell::Empty)
    }

    /// Number of discs on the board.
    pub fn disc_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell != Cell::Empty)
            .count()
    }

    pub fn to_wire(&self) -> WireGrid {
        let mut grid = [[EMPTY_CODE; COLS]; ROWS];
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                grid[row][col] = cell.wire_code();
            }
        }
        grid
    }

    /// Build a board from a 0/1/2 grid. Contents are taken as-is; no gravity
    /// check is applied.
    pub fn from_wire(grid: &WireGrid) -> Result<Board, InvalidCellCode> {
        let mut board = Board::new();
        for (row, codes) in grid.iter().enumerate() {
            for (col, &code) in codes.iter().enumerate() {
                board.cells[row][col] =
                    Cell::from_wire_code(code).ok_or(InvalidCellCode { row, col, code })?;
            }
        }
        Ok(board)
    }

    /// Parse rows of `.`, `H` and `A`, top row first.
    #[cfg(test)]
    pub(crate) fn from_rows(rows: [&str; ROWS]) -> Board {
        let mut board = Board::new();
        for (row, line) in rows.iter().enumerate() {
            assert_eq!(line.len(), COLS, "row {row} must have {COLS} cells");
            for (col, ch) in line.chars().enumerate() {
                board.cells[row][col] = match ch {
                    '.' => Cell::Empty,
                    'H' => Cell::Human,
                    'A' => Cell::Ai,
                    other => panic!("unexpected cell character {other:?}"),
                };
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.iter().enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in cells {
                let symbol = match cell {
                    Cell::Empty => '.',
                    Cell::Human => 'H',
                    Cell::Ai => 'A',
                };
                write!(f, "{symbol}")?;
            }
        }
        Ok(())
    }
}
