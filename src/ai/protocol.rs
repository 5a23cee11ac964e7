//! JSON shapes exchanged with the AI decision service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::{Player, WireGrid};

pub const MIN_DEPTH: u8 = 2;
pub const MAX_DEPTH: u8 = 8;
pub const DEFAULT_DEPTH: u8 = 4;

/// Search strategy run by the remote service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Minimax,
    #[default]
    MinimaxAlphaBeta,
    Expectiminimax,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::Minimax,
        Algorithm::MinimaxAlphaBeta,
        Algorithm::Expectiminimax,
    ];

    /// Identifier used on the wire and in config files.
    pub fn id(self) -> &'static str {
        match self {
            Algorithm::Minimax => "minimax",
            Algorithm::MinimaxAlphaBeta => "minimax_alpha_beta",
            Algorithm::Expectiminimax => "expectiminimax",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Algorithm::Minimax => "Minimax (No Pruning)",
            Algorithm::MinimaxAlphaBeta => "Minimax with Alpha-Beta Pruning",
            Algorithm::Expectiminimax => "Expected Minimax",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.id() == s)
            .ok_or_else(|| {
                format!(
                    "unknown algorithm '{s}' (expected 'minimax', 'minimax_alpha_beta', or 'expectiminimax')"
                )
            })
    }
}

/// Body of `POST /api/move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRequest {
    pub board: WireGrid,
    pub algorithm: Algorithm,
    pub depth: u8,
    pub player: u8,
}

impl MoveRequest {
    pub fn new(board: WireGrid, algorithm: Algorithm, depth: u8) -> Self {
        MoveRequest {
            board,
            algorithm,
            depth,
            player: Player::Ai.wire_code(),
        }
    }
}

/// Body returned by `POST /api/move`. `tree` is kept as raw JSON so a
/// malformed tree never spoils an otherwise usable move.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub column: Option<i64>,
    #[serde(default)]
    pub tree: Option<serde_json::Value>,
    #[serde(default)]
    pub evaluation: Option<f64>,
    #[serde(default)]
    pub nodes_expanded: Option<u64>,
    #[serde(default)]
    pub time_taken: Option<f64>,
}

/// Body of `POST /api/score`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreRequest {
    pub board: WireGrid,
}

/// Body returned by `POST /api/score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub human_score: u32,
    pub ai_score: u32,
}

/// Error body the service sends with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, Player};

    #[test]
    fn test_algorithm_ids_roundtrip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.id().parse::<Algorithm>(), Ok(algorithm));
        }
        assert!("alphabeta".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_move_request_wire_shape() {
        let board = Board::new().apply_move(3, Player::Human).unwrap().0;
        let request = MoveRequest::new(board.to_wire(), Algorithm::Expectiminimax, 5);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["algorithm"], "expectiminimax");
        assert_eq!(json["depth"], 5);
        assert_eq!(json["player"], 2);
        assert_eq!(json["board"][5][3], 1);
        assert_eq!(json["board"].as_array().unwrap().len(), 6);
        assert_eq!(json["board"][0].as_array().unwrap().len(), 7);
    }

    #[test]
    fn test_move_response_parses_service_body() {
        let body = r#"{
            "column": 4,
            "tree": {"type": "root", "children": []},
            "nodesExpanded": 1250,
            "timeTaken": 0.345,
            "evaluation": 10,
            "score": [0, 0]
        }"#;
        let response: MoveResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.column, Some(4));
        assert_eq!(response.nodes_expanded, Some(1250));
        assert_eq!(response.evaluation, Some(10.0));
        assert!(response.tree.is_some());
    }

    #[test]
    fn test_move_response_missing_column() {
        let response: MoveResponse = serde_json::from_str(r#"{"column": null}"#).unwrap();
        assert_eq!(response.column, None);
        let response: MoveResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.column, None);
    }

    #[test]
    fn test_score_response_parses() {
        let response: ScoreResponse =
            serde_json::from_str(r#"{"humanScore": 3, "aiScore": 5}"#).unwrap();
        assert_eq!(
            response,
            ScoreResponse {
                human_score: 3,
                ai_score: 5
            }
        );
    }
}
