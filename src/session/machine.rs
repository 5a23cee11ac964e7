use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::ai::{
    with_timeout, AiMove, AiMoveClient, Algorithm, DecisionTreeIngestor, MAX_DEPTH, MIN_DEPTH,
};
use crate::error::{AiClientError, MatchError};
use crate::game::{Board, MatchState, ScoreTally, TurnError};

/// How the AI service is asked to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiSettings {
    pub algorithm: Algorithm,
    pub depth: u8,
    /// Caller-side bound on one AI request; `None` waits on the transport.
    pub timeout: Option<Duration>,
}

impl AiSettings {
    /// The service only searches depths in `MIN_DEPTH..=MAX_DEPTH`.
    pub fn validate(&self) -> Result<(), MatchError> {
        if !(MIN_DEPTH..=MAX_DEPTH).contains(&self.depth) {
            return Err(MatchError::InvalidDepth { depth: self.depth });
        }
        Ok(())
    }
}

impl Default for AiSettings {
    fn default() -> Self {
        AiSettings {
            algorithm: Algorithm::default(),
            depth: crate::ai::DEFAULT_DEPTH,
            timeout: None,
        }
    }
}

/// An outstanding AI request: what to send, and which match it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiTurn {
    generation: u64,
    board: Board,
    algorithm: Algorithm,
    depth: u8,
    timeout: Option<Duration>,
}

impl AiTurn {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// True while `state` is still waiting on this very turn: same match,
    /// same position, request outstanding.
    fn is_pending_in(&self, state: &MatchState) -> bool {
        state.generation() == self.generation && state.awaiting_ai() && *state.board() == self.board
    }

    /// Ask `client` for this turn's move, honoring the configured timeout.
    pub async fn fetch<C: AiMoveClient>(&self, client: &C) -> Result<AiMove, AiClientError> {
        with_timeout(
            self.timeout,
            client.get_move(&self.board, self.algorithm, self.depth),
        )
        .await
    }
}

/// A landed AI move.
#[derive(Debug, Clone, PartialEq)]
pub struct AiTurnOutcome {
    pub column: usize,
    pub state: Arc<MatchState>,
}

/// Local tally next to the service's for the same finished board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreCheck {
    pub local: ScoreTally,
    pub remote: ScoreTally,
}

impl ScoreCheck {
    pub fn agrees(&self) -> bool {
        self.local == self.remote
    }
}

/// Owns a match and sequences human input with the asynchronous AI turn.
///
/// Every transition publishes a fresh `Arc<MatchState>`; readers holding an
/// older snapshot are unaffected. At most one AI request is outstanding.
pub struct MatchStateMachine<C> {
    client: Arc<C>,
    settings: AiSettings,
    ingestor: DecisionTreeIngestor,
    state: watch::Sender<Arc<MatchState>>,
}

impl<C: AiMoveClient> MatchStateMachine<C> {
    pub fn new(
        client: C,
        settings: AiSettings,
        ingestor: DecisionTreeIngestor,
    ) -> Result<Self, MatchError> {
        settings.validate()?;
        let (state, _) = watch::channel(Arc::new(MatchState::new()));
        Ok(MatchStateMachine {
            client: Arc::new(client),
            settings,
            ingestor,
            state,
        })
    }

    pub fn client(&self) -> Arc<C> {
        Arc::clone(&self.client)
    }

    /// The current snapshot.
    pub fn state(&self) -> Arc<MatchState> {
        Arc::clone(&self.state.borrow())
    }

    /// Receive every snapshot published from now on.
    pub fn subscribe(&self) -> watch::Receiver<Arc<MatchState>> {
        self.state.subscribe()
    }

    pub fn settings(&self) -> AiSettings {
        self.settings
    }

    /// Change algorithm/depth for subsequent AI turns.
    pub fn set_settings(&mut self, settings: AiSettings) -> Result<(), MatchError> {
        settings.validate()?;
        if self.state().awaiting_ai() {
            return Err(TurnError::AwaitingAi.into());
        }
        self.settings = settings;
        Ok(())
    }

    fn publish(&self, next: MatchState) -> Arc<MatchState> {
        let next = Arc::new(next);
        self.state.send_replace(Arc::clone(&next));
        next
    }

    /// Start a fresh match. Any AI request still in flight is orphaned.
    pub fn start(&mut self) -> Arc<MatchState> {
        let next = self.state().start();
        info!(
            generation = next.generation(),
            algorithm = %self.settings.algorithm,
            depth = self.settings.depth,
            "match started"
        );
        self.publish(next)
    }

    /// Back to a not-started match.
    pub fn reset(&mut self) -> Arc<MatchState> {
        let next = self.state().reset();
        debug!(generation = next.generation(), "match reset");
        self.publish(next)
    }

    pub fn submit_human_move(&mut self, column: usize) -> Result<Arc<MatchState>, MatchError> {
        let next = self.state().submit_human_move(column).inspect_err(|err| {
            debug!(column, error = %err, "human move rejected");
        })?;
        debug!(column, "human move accepted");
        log_if_finished(&next);
        Ok(self.publish(next))
    }

    /// Open the AI turn if one is due. Returns `None` otherwise, including
    /// while a request is already outstanding, so repeated triggers are
    /// harmless.
    pub fn begin_ai_turn(&mut self) -> Option<AiTurn> {
        let current = self.state();
        let next = current.begin_ai_turn()?;
        let turn = AiTurn {
            generation: next.generation(),
            board: *next.board(),
            algorithm: self.settings.algorithm,
            depth: self.settings.depth,
            timeout: self.settings.timeout,
        };
        debug!(algorithm = %turn.algorithm, depth = turn.depth, "AI turn opened");
        self.publish(next);
        Some(turn)
    }

    /// Close the AI turn with the service's answer. On any failure the board
    /// is left unchanged and the human gets the move back.
    pub fn finish_ai_turn(
        &mut self,
        turn: AiTurn,
        result: Result<AiMove, AiClientError>,
    ) -> Result<AiTurnOutcome, MatchError> {
        let current = self.state();
        if !turn.is_pending_in(&current) {
            debug!("dropping AI result for a superseded turn");
            return Err(MatchError::StaleAiTurn);
        }

        let ai_move = match result {
            Ok(ai_move) => ai_move,
            Err(err) => {
                warn!(error = %err, "AI turn aborted, returning control to human");
                self.publish(current.abort_ai_turn());
                return Err(err.into());
            }
        };

        let tree = self.ingestor.ingest(ai_move.tree);
        let with_insight = current.with_ai_insight(ai_move.stats, tree);

        let placed = usize::try_from(ai_move.column)
            .ok()
            .and_then(|column| with_insight.accept_ai_move(column).ok().map(|s| (column, s)));
        match placed {
            Some((column, next)) => {
                debug!(column, "AI move accepted");
                log_if_finished(&next);
                let state = self.publish(next);
                Ok(AiTurnOutcome { column, state })
            }
            None => {
                warn!(column = ai_move.column, "AI chose an unplayable column");
                self.publish(with_insight.abort_ai_turn());
                Err(MatchError::AiIllegalMove {
                    column: ai_move.column,
                })
            }
        }
    }

    /// Give up on the outstanding AI turn and hand the move back to the
    /// human. A reply for the cancelled turn is later rejected as stale.
    /// Returns false when no AI turn was outstanding.
    pub fn cancel_ai_turn(&mut self) -> bool {
        let current = self.state();
        if !current.awaiting_ai() {
            return false;
        }
        debug!("AI turn cancelled");
        self.publish(current.abort_ai_turn());
        true
    }

    /// Run a whole AI turn against the client. `Ok(None)` when no AI turn
    /// was due. No retry is attempted on failure.
    ///
    /// Dropping the returned future before it completes cancels the turn
    /// and the human gets the move back.
    pub async fn request_ai_move(&mut self) -> Result<Option<AiTurnOutcome>, MatchError> {
        let Some(turn) = self.begin_ai_turn() else {
            return Ok(None);
        };
        let guard = PendingTurn {
            state: &self.state,
            turn: &turn,
            armed: true,
        };
        let result = turn.fetch(self.client.as_ref()).await;
        guard.disarm();
        self.finish_ai_turn(turn, result).map(Some)
    }

    /// Compare the local tally of a finished match with the service's.
    /// `Ok(None)` while the match is not finished. Never changes the match.
    pub async fn cross_check_score(&self) -> Result<Option<ScoreCheck>, AiClientError> {
        let current = self.state();
        if !current.is_finished() {
            return Ok(None);
        }
        let remote = self.client.score(current.board()).await?;
        let check = ScoreCheck {
            local: current.scores(),
            remote,
        };
        if !check.agrees() {
            warn!(
                local_human = check.local.human,
                local_ai = check.local.ai,
                remote_human = check.remote.human,
                remote_ai = check.remote.ai,
                "score endpoint disagrees with local tally"
            );
        }
        Ok(Some(check))
    }
}

/// Aborts its AI turn when dropped while still armed.
struct PendingTurn<'a> {
    state: &'a watch::Sender<Arc<MatchState>>,
    turn: &'a AiTurn,
    armed: bool,
}

impl PendingTurn<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingTurn<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.state.send_if_modified(|current| {
            if !self.turn.is_pending_in(current) {
                return false;
            }
            warn!("AI request dropped before completing, returning control to human");
            *current = Arc::new(current.abort_ai_turn());
            true
        });
    }
}

fn log_if_finished(state: &MatchState) {
    if let Some(winner) = state.winner() {
        let scores = state.scores();
        info!(human = scores.human, ai = scores.ai, %winner, "match finished");
    }
}
