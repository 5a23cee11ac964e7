use std::path::PathBuf;

use crate::game::TurnError;

/// Failures of the external AI service. The match treats every kind the same
/// way: the AI turn is aborted and control goes back to the human.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AiClientError {
    #[error("AI service unreachable: {0}")]
    Unreachable(String),

    #[error("invalid response from AI service: {0}")]
    InvalidResponse(String),

    #[error("AI service error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },
}

/// Errors surfaced by the match state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error("AI chose column {column}, which cannot be played")]
    AiIllegalMove { column: i64 },

    #[error("AI turn aborted: {0}")]
    AiUnavailable(#[from] AiClientError),

    #[error("AI result belongs to a turn that is no longer outstanding")]
    StaleAiTurn,

    #[error("search depth {depth} is outside 2..=8")]
    InvalidDepth { depth: u8 },
}

/// Reasons a decision-tree payload was not accepted for display.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("malformed decision tree: {0}")]
    Malformed(String),

    #[error("decision tree has {nodes} nodes (limit {limit})")]
    TooLarge { nodes: usize, limit: usize },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
