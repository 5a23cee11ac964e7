//! Match orchestration: human input, the remote AI turn, and publication of
//! each new match snapshot.

pub mod machine;

pub use machine::{AiSettings, AiTurn, AiTurnOutcome, MatchStateMachine, ScoreCheck};
