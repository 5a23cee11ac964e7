use std::future::Future;
use std::time::Duration;

use crate::error::AiClientError;
use crate::game::{Board, ScoreTally};

use super::protocol::{Algorithm, MoveResponse};

/// Search statistics the service reports with a move.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveStats {
    pub nodes_expanded: Option<u64>,
    pub elapsed_seconds: Option<f64>,
    pub evaluation: Option<f64>,
}

/// A successful answer from the AI service. `column` is whatever the
/// service sent; legality is decided by the match, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct AiMove {
    pub column: i64,
    pub tree: Option<serde_json::Value>,
    pub stats: MoveStats,
}

impl TryFrom<MoveResponse> for AiMove {
    type Error = AiClientError;

    fn try_from(response: MoveResponse) -> Result<Self, Self::Error> {
        let column = response
            .column
            .ok_or_else(|| AiClientError::InvalidResponse("missing column".into()))?;
        Ok(AiMove {
            column,
            tree: response.tree,
            stats: MoveStats {
                nodes_expanded: response.nodes_expanded,
                elapsed_seconds: response.time_taken,
                evaluation: response.evaluation,
            },
        })
    }
}

/// The external decision-making service, as seen by the match.
pub trait AiMoveClient: Send + Sync {
    /// Ask for the AI's column on `board`.
    fn get_move(
        &self,
        board: &Board,
        algorithm: Algorithm,
        depth: u8,
    ) -> impl Future<Output = Result<AiMove, AiClientError>> + Send;

    /// Reachability only.
    fn health_check(&self) -> impl Future<Output = bool> + Send;

    /// The service's own full-board tally, for cross-checking.
    fn score(&self, board: &Board) -> impl Future<Output = Result<ScoreTally, AiClientError>> + Send;
}

/// Bound `request` by `limit`, reporting expiry as an unreachable service.
/// With no limit the request runs until the transport gives up.
pub async fn with_timeout<T>(
    limit: Option<Duration>,
    request: impl Future<Output = Result<T, AiClientError>>,
) -> Result<T, AiClientError> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, request).await.map_err(|_| {
            AiClientError::Unreachable(format!("no answer within {:.1}s", limit.as_secs_f64()))
        })?,
        None => request.await,
    }
}
