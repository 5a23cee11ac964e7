use std::fmt;

use super::board::{Board, MoveError};
use super::player::Player;
use super::scoring::{count_connected_fours, ScoreTally, Winner};
use crate::ai::{MoveStats, TreeArtifact};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    NotStarted,
    InProgress,
    Finished,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchStatus::NotStarted => "Not started",
            MatchStatus::InProgress => "In progress",
            MatchStatus::Finished => "Finished",
        };
        f.write_str(label)
    }
}

/// A transition the current state does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("match is not in progress")]
    NotInProgress,

    #[error("it is not the human's turn")]
    NotHumanTurn,

    #[error("waiting for the AI to move")]
    AwaitingAi,

    #[error("no AI turn is outstanding")]
    NoAiTurnPending,

    #[error(transparent)]
    InvalidMove(#[from] MoveError),
}

/// The most recent accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastMove {
    pub column: usize,
    pub row: usize,
    pub player: Player,
}

/// Snapshot of a match. Every transition returns a new value; nothing is
/// mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    status: MatchStatus,
    current_player: Player,
    board: Board,
    scores: ScoreTally,
    winner: Option<Winner>,
    awaiting_ai: bool,
    last_move: Option<LastMove>,
    ai_stats: Option<MoveStats>,
    decision_tree: TreeArtifact,
    generation: u64,
}

impl MatchState {
    /// A match that has not been started yet.
    pub fn new() -> Self {
        MatchState::fresh(MatchStatus::NotStarted, 0)
    }

    fn fresh(status: MatchStatus, generation: u64) -> Self {
        MatchState {
            status,
            current_player: Player::Human,
            board: Board::new(),
            scores: ScoreTally::default(),
            winner: None,
            awaiting_ai: false,
            last_move: None,
            ai_stats: None,
            decision_tree: TreeArtifact::Absent,
            generation,
        }
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Zero until the board fills up.
    pub fn scores(&self) -> ScoreTally {
        self.scores
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn awaiting_ai(&self) -> bool {
        self.awaiting_ai
    }

    pub fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    pub fn ai_stats(&self) -> Option<&MoveStats> {
        self.ai_stats.as_ref()
    }

    pub fn decision_tree(&self) -> &TreeArtifact {
        &self.decision_tree
    }

    /// Incremented by every `start`/`reset`; identifies which match an AI
    /// request was issued for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    /// True when the AI should be asked for a move.
    pub fn ai_turn_due(&self) -> bool {
        self.status == MatchStatus::InProgress
            && self.current_player == Player::Ai
            && !self.awaiting_ai
    }

    /// Begin a new match from any status, discarding everything else.
    pub fn start(&self) -> MatchState {
        MatchState::fresh(MatchStatus::InProgress, self.generation + 1)
    }

    /// Return to a not-started match.
    pub fn reset(&self) -> MatchState {
        MatchState::fresh(MatchStatus::NotStarted, self.generation + 1)
    }

    pub fn submit_human_move(&self, column: usize) -> Result<MatchState, TurnError> {
        if self.status != MatchStatus::InProgress {
            return Err(TurnError::NotInProgress);
        }
        if self.awaiting_ai {
            return Err(TurnError::AwaitingAi);
        }
        if self.current_player != Player::Human {
            return Err(TurnError::NotHumanTurn);
        }
        Ok(self.place(column, Player::Human)?)
    }

    /// Mark an AI request as outstanding. `None` when no AI turn is due,
    /// including while a request is already in flight.
    pub fn begin_ai_turn(&self) -> Option<MatchState> {
        if !self.ai_turn_due() {
            return None;
        }
        Some(MatchState {
            awaiting_ai: true,
            ..self.clone()
        })
    }

    /// Record what the AI service reported alongside its move.
    pub fn with_ai_insight(&self, stats: MoveStats, tree: TreeArtifact) -> MatchState {
        MatchState {
            ai_stats: Some(stats),
            decision_tree: tree,
            ..self.clone()
        }
    }

    /// Apply the AI's column to the outstanding turn.
    pub fn accept_ai_move(&self, column: usize) -> Result<MatchState, TurnError> {
        if self.status != MatchStatus::InProgress {
            return Err(TurnError::NotInProgress);
        }
        if !self.awaiting_ai {
            return Err(TurnError::NoAiTurnPending);
        }
        let next = self.place(column, Player::Ai)?;
        Ok(MatchState {
            awaiting_ai: false,
            ..next
        })
    }

    /// Give control back to the human after a failed AI turn. The board is
    /// left as it was.
    pub fn abort_ai_turn(&self) -> MatchState {
        let current_player = if self.status == MatchStatus::InProgress {
            Player::Human
        } else {
            self.current_player
        };
        MatchState {
            awaiting_ai: false,
            current_player,
            ..self.clone()
        }
    }

    fn place(&self, column: usize, player: Player) -> Result<MatchState, MoveError> {
        let (board, row) = self.board.apply_move(column, player)?;
        let last_move = Some(LastMove {
            column,
            row,
            player,
        });

        if board.is_full() {
            let scores = count_connected_fours(&board);
            return Ok(MatchState {
                status: MatchStatus::Finished,
                board,
                scores,
                winner: Some(scores.winner()),
                last_move,
                ..self.clone()
            });
        }

        Ok(MatchState {
            board,
            current_player: player.other(),
            last_move,
            ..self.clone()
        })
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::fixtures::{DRAWN_GAME, HUMAN_WINS};
    use crate::game::Cell;

    fn play_both_sides(mut state: MatchState, columns: &[usize]) -> MatchState {
        for &col in columns {
            state = match state.current_player() {
                Player::Human => state.submit_human_move(col).unwrap(),
                Player::Ai => state.begin_ai_turn().unwrap().accept_ai_move(col).unwrap(),
            };
        }
        state
    }

    #[test]
    fn test_initial_state() {
        let state = MatchState::new();
        assert_eq!(state.status(), MatchStatus::NotStarted);
        assert_eq!(state.current_player(), Player::Human);
        assert_eq!(state.scores(), ScoreTally::default());
        assert_eq!(state.winner(), None);
        assert!(!state.awaiting_ai());
    }

    #[test]
    fn test_human_move_rejected_before_start() {
        let state = MatchState::new();
        assert_eq!(state.submit_human_move(3), Err(TurnError::NotInProgress));
    }

    #[test]
    fn test_human_move_flips_turn() {
        let state = MatchState::new().start();
        let next = state.submit_human_move(3).unwrap();

        assert_eq!(next.current_player(), Player::Ai);
        assert_eq!(next.board().get(5, 3), Cell::Human);
        assert_eq!(
            next.last_move(),
            Some(LastMove {
                column: 3,
                row: 5,
                player: Player::Human
            })
        );
        assert!(next.ai_turn_due());
    }

    #[test]
    fn test_human_move_rejected_on_ai_turn() {
        let state = MatchState::new().start().submit_human_move(0).unwrap();
        assert_eq!(state.submit_human_move(1), Err(TurnError::NotHumanTurn));
    }

    #[test]
    fn test_invalid_column_leaves_state_alone() {
        let state = MatchState::new().start();
        assert_eq!(
            state.submit_human_move(7),
            Err(TurnError::InvalidMove(MoveError::InvalidColumn(7)))
        );
    }

    #[test]
    fn test_begin_ai_turn_is_idempotent() {
        let state = MatchState::new().start().submit_human_move(0).unwrap();
        let waiting = state.begin_ai_turn().unwrap();
        assert!(waiting.awaiting_ai());
        assert!(waiting.begin_ai_turn().is_none());
        assert_eq!(waiting.submit_human_move(1), Err(TurnError::AwaitingAi));
    }

    #[test]
    fn test_begin_ai_turn_needs_ai_to_move() {
        assert!(MatchState::new().begin_ai_turn().is_none());
        assert!(MatchState::new().start().begin_ai_turn().is_none());
    }

    #[test]
    fn test_accept_ai_move_requires_outstanding_turn() {
        let state = MatchState::new().start().submit_human_move(0).unwrap();
        assert_eq!(state.accept_ai_move(1), Err(TurnError::NoAiTurnPending));
    }

    #[test]
    fn test_ai_move_returns_turn_to_human() {
        let state = MatchState::new().start().submit_human_move(0).unwrap();
        let next = state.begin_ai_turn().unwrap().accept_ai_move(0).unwrap();
        assert_eq!(next.current_player(), Player::Human);
        assert!(!next.awaiting_ai());
        assert_eq!(next.board().get(4, 0), Cell::Ai);
    }

    #[test]
    fn test_abort_ai_turn_restores_human_control() {
        let state = MatchState::new().start().submit_human_move(0).unwrap();
        let waiting = state.begin_ai_turn().unwrap();
        let aborted = waiting.abort_ai_turn();

        assert_eq!(aborted.status(), MatchStatus::InProgress);
        assert_eq!(aborted.current_player(), Player::Human);
        assert!(!aborted.awaiting_ai());
        assert_eq!(aborted.board(), state.board());
    }

    #[test]
    fn test_full_board_finishes_with_scores() {
        let state = play_both_sides(MatchState::new().start(), &HUMAN_WINS);

        assert!(state.is_finished());
        assert!(state.board().is_full());
        assert_eq!(state.scores(), ScoreTally { human: 1, ai: 0 });
        assert_eq!(state.winner(), Some(Winner::Human));
        assert!(state.begin_ai_turn().is_none());
        assert_eq!(state.submit_human_move(0), Err(TurnError::NotInProgress));
    }

    #[test]
    fn test_drawn_game_is_a_tie() {
        let state = play_both_sides(MatchState::new().start(), &DRAWN_GAME);
        assert!(state.is_finished());
        assert_eq!(state.scores(), ScoreTally { human: 0, ai: 0 });
        assert_eq!(state.winner(), Some(Winner::Tie));
    }

    #[test]
    fn test_turns_alternate_until_full() {
        let mut state = MatchState::new().start();
        let mut expected = Player::Human;
        for &col in &HUMAN_WINS[..HUMAN_WINS.len() - 1] {
            assert_eq!(state.current_player(), expected);
            state = play_both_sides(state, &[col]);
            expected = expected.other();
        }
        assert_eq!(state.status(), MatchStatus::InProgress);
    }

    #[test]
    fn test_start_resets_finished_match() {
        let finished = play_both_sides(MatchState::new().start(), &HUMAN_WINS);
        let restarted = finished.start();

        assert_eq!(restarted.status(), MatchStatus::InProgress);
        assert_eq!(restarted.scores(), ScoreTally { human: 0, ai: 0 });
        assert_eq!(restarted.winner(), None);
        assert_eq!(restarted.current_player(), Player::Human);
        assert_eq!(restarted.board(), &Board::new());
        assert!(restarted.generation() > finished.generation());
    }

    #[test]
    fn test_reset_returns_to_not_started() {
        let state = MatchState::new().start().submit_human_move(2).unwrap();
        let reset = state.reset();
        assert_eq!(reset.status(), MatchStatus::NotStarted);
        assert_eq!(reset.board(), &Board::new());
        assert_eq!(reset.last_move(), None);
        assert_ne!(reset.generation(), state.generation());
    }
}
