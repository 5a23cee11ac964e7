//! Full-board scoring: every 4-cell window owned by one player counts,
//! including overlapping windows inside longer runs.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::{Board, COLS, ROWS};
use super::player::Player;

/// Horizontal, vertical, down-right and down-left. Each line is walked in one
/// sense only, so a window is found from exactly one origin cell.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

const WINDOW: usize = 4;

/// Distinct four-in-a-row windows per player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTally {
    pub human: u32,
    pub ai: u32,
}

impl ScoreTally {
    pub fn get(&self, player: Player) -> u32 {
        match player {
            Player::Human => self.human,
            Player::Ai => self.ai,
        }
    }

    /// Strictly higher tally wins; equal tallies are a tie.
    pub fn winner(&self) -> Winner {
        match self.human.cmp(&self.ai) {
            std::cmp::Ordering::Greater => Winner::Human,
            std::cmp::Ordering::Less => Winner::Ai,
            std::cmp::Ordering::Equal => Winner::Tie,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Human,
    Ai,
    Tie,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Human => write!(f, "Human wins"),
            Winner::Ai => write!(f, "AI wins"),
            Winner::Tie => write!(f, "It's a tie"),
        }
    }
}

/// A window identified by its owner and its four cells in sorted order.
type WindowKey = (Player, [(usize, usize); WINDOW]);

/// Count every four-in-a-row window on `board`, per player.
pub fn count_connected_fours(board: &Board) -> ScoreTally {
    let mut windows: HashSet<WindowKey> = HashSet::new();

    for row in 0..ROWS {
        for col in 0..COLS {
            let Some(player) = board.get(row, col).owner() else {
                continue;
            };
            for (dr, dc) in DIRECTIONS {
                if let Some(mut cells) = window_from(board, row, col, dr, dc, player) {
                    cells.sort_unstable();
                    windows.insert((player, cells));
                }
            }
        }
    }

    windows
        .iter()
        .fold(ScoreTally::default(), |mut tally, (player, _)| {
            match player {
                Player::Human => tally.human += 1,
                Player::Ai => tally.ai += 1,
            }
            tally
        })
}

/// The four cells starting at (row, col) along (dr, dc), if all are in
/// bounds and owned by `player`.
fn window_from(
    board: &Board,
    row: usize,
    col: usize,
    dr: isize,
    dc: isize,
    player: Player,
) -> Option<[(usize, usize); WINDOW]> {
    let mut cells = [(row, col); WINDOW];
    for (step, cell) in cells.iter_mut().enumerate().skip(1) {
        let r = row.checked_add_signed(dr * step as isize)?;
        let c = col.checked_add_signed(dc * step as isize)?;
        if r >= ROWS || c >= COLS || board.get(r, c).owner() != Some(player) {
            return None;
        }
        *cell = (r, c);
    }
    Some(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Full board with no four-in-a-row for either side.
    const DRAWN: [&str; ROWS] = [
        "HHAAHHA", "AAHHAAH", "HHAAHHA", "AAHHAAH", "HHAAHHA", "AAHHAAH",
    ];

    fn mirrored(board: &Board) -> Board {
        let mut grid = board.to_wire();
        for row in grid.iter_mut() {
            row.reverse();
        }
        Board::from_wire(&grid).unwrap()
    }

    #[test]
    fn test_empty_board_scores_nothing() {
        assert_eq!(count_connected_fours(&Board::new()), ScoreTally::default());
    }

    #[test]
    fn test_drawn_board_is_a_tie() {
        let board = Board::from_rows(DRAWN);
        assert!(board.is_full());
        let tally = count_connected_fours(&board);
        assert_eq!(tally, ScoreTally { human: 0, ai: 0 });
        assert_eq!(tally.winner(), Winner::Tie);
    }

    #[test]
    fn test_single_horizontal_four_wins_for_human() {
        let mut rows = DRAWN;
        rows[5] = "HHHHAAA";
        let board = Board::from_rows(rows);
        assert!(board.is_full());

        let tally = count_connected_fours(&board);
        assert_eq!(tally, ScoreTally { human: 1, ai: 0 });
        assert_eq!(tally.winner(), Winner::Human);
    }

    #[test]
    fn test_vertical_five_counts_two_windows() {
        let board = Board::from_rows([
            ".......", "A......", "A......", "A......", "A......", "A......",
        ]);
        let tally = count_connected_fours(&board);
        assert_eq!(tally, ScoreTally { human: 0, ai: 2 });
        assert_eq!(tally.winner(), Winner::Ai);
    }

    #[test]
    fn test_horizontal_five_counts_two_windows() {
        let board = Board::from_rows([
            ".......", ".......", ".......", ".......", ".......", "HHHHHAA",
        ]);
        assert_eq!(count_connected_fours(&board).human, 2);
    }

    #[test]
    fn test_full_row_of_seven_counts_four_windows() {
        let board = Board::from_rows([
            ".......", ".......", ".......", ".......", ".......", "AAAAAAA",
        ]);
        assert_eq!(count_connected_fours(&board), ScoreTally { human: 0, ai: 4 });
    }

    #[test]
    fn test_both_diagonals() {
        let rising = Board::from_rows([
            ".......", ".......", "...H...", "..HA...", ".HAA...", "HAAA...",
        ]);
        assert_eq!(count_connected_fours(&rising).human, 1);

        let falling = Board::from_rows([
            ".......", ".......", "A......", "HA.....", "HHA....", "HHHA...",
        ]);
        assert_eq!(count_connected_fours(&falling).ai, 1);
    }

    #[test]
    fn test_three_in_a_row_does_not_count() {
        let board = Board::from_rows([
            ".......", ".......", ".......", "H......", "H......", "HAAA...",
        ]);
        assert_eq!(count_connected_fours(&board), ScoreTally::default());
    }

    #[test]
    fn test_tally_is_independent_of_orientation() {
        let mut rows = DRAWN;
        rows[0] = "HHHHAAA";
        let board = Board::from_rows(rows);
        let tally = count_connected_fours(&board);
        assert_eq!(count_connected_fours(&mirrored(&board)), tally);
    }

    #[test]
    fn test_winner_derivation() {
        assert_eq!(ScoreTally { human: 3, ai: 2 }.winner(), Winner::Human);
        assert_eq!(ScoreTally { human: 0, ai: 1 }.winner(), Winner::Ai);
        assert_eq!(ScoreTally { human: 2, ai: 2 }.winner(), Winner::Tie);
    }
}
