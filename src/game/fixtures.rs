//! Move sequences shared by the state and session tests.

use super::board::{COLS, ROWS};

/// Alternating Human/AI columns, Human first, that fill the board with the
/// top row reading `HHHHAAA` and no other four-in-a-row: Human 1, AI 0.
pub(crate) const HUMAN_WINS: [usize; ROWS * COLS] = [
    2, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 2, 5, 3, 3, 3, 3, 4, 4, 4, 4, 3, 4, 5,
    5, 5, 5, 3, 5, 6, 6, 6, 6, 6, 6,
];

/// Alternating Human/AI columns that fill the board without any
/// four-in-a-row for either side.
pub(crate) const DRAWN_GAME: [usize; ROWS * COLS] = [
    2, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 6, 4, 4, 4, 4, 4, 4,
    5, 5, 5, 5, 5, 5, 6, 6, 6, 6, 6,
];
