//! Core Connect Four game logic: the immutable board, players, full-board
//! scoring, and the match state with its pure transitions.

mod board;
#[cfg(test)]
pub(crate) mod fixtures;
mod player;
mod scoring;
mod state;

pub use board::{Board, Cell, InvalidCellCode, MoveError, WireGrid, COLS, ROWS};
pub use player::Player;
pub use scoring::{count_connected_fours, ScoreTally, Winner};
pub use state::{LastMove, MatchState, MatchStatus, TurnError};
