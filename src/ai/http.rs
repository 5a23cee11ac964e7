use std::time::Instant;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::error::AiClientError;
use crate::game::{Board, ScoreTally};

use super::client::{AiMove, AiMoveClient};
use super::protocol::{Algorithm, ErrorResponse, MoveRequest, MoveResponse, ScoreRequest, ScoreResponse};

/// [`AiMoveClient`] speaking JSON over HTTP to the decision service.
///
/// No request timeout is configured on the underlying client; callers that
/// need bounded latency wrap calls with [`super::with_timeout`].
#[derive(Debug, Clone)]
pub struct HttpAiClient {
    http: Client,
    base_url: String,
}

impl HttpAiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpAiClient {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, AiClientError>
    where
        B: serde::Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let url = self.endpoint(path);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AiClientError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(server_error(status, response.text().await.unwrap_or_default()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AiClientError::Unreachable(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| AiClientError::InvalidResponse(e.to_string()))
    }
}

/// Prefer the service's `{"error": ...}` message over the raw body.
fn server_error(status: StatusCode, body: String) -> AiClientError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or(body);
    AiClientError::ServerError {
        status: status.as_u16(),
        message,
    }
}

impl AiMoveClient for HttpAiClient {
    async fn get_move(
        &self,
        board: &Board,
        algorithm: Algorithm,
        depth: u8,
    ) -> Result<AiMove, AiClientError> {
        let request = MoveRequest::new(board.to_wire(), algorithm, depth);
        let started = Instant::now();
        debug!(%algorithm, depth, "requesting AI move");

        let result = self
            .post_json::<_, MoveResponse>("move", &request)
            .await
            .and_then(AiMove::try_from);

        match &result {
            Ok(ai_move) => debug!(
                column = ai_move.column,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "AI move received"
            ),
            Err(err) => warn!(error = %err, "AI move request failed"),
        }
        result
    }

    async fn health_check(&self) -> bool {
        match self.http.get(self.endpoint("health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                debug!(error = %err, "health check failed");
                false
            }
        }
    }

    async fn score(&self, board: &Board) -> Result<ScoreTally, AiClientError> {
        let request = ScoreRequest {
            board: board.to_wire(),
        };
        let response: ScoreResponse = self.post_json("score", &request).await?;
        Ok(ScoreTally {
            human: response.human_score,
            ai: response.ai_score,
        })
    }
}
