use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::ai::{with_timeout, AiMove, AiMoveClient, Algorithm, MAX_DEPTH, MIN_DEPTH};
use crate::error::{AiClientError, MatchError};
use crate::game::{MatchStatus, MoveError, TurnError, COLS};
use crate::session::{AiSettings, AiTurn, MatchStateMachine};

/// Upper bound for the blocking calls made from the UI thread.
const QUICK_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// A finished AI request coming back from the runtime.
struct AiReply {
    turn: AiTurn,
    result: Result<AiMove, AiClientError>,
}

pub struct App<C: AiMoveClient + 'static> {
    machine: MatchStateMachine<C>,
    runtime: Handle,
    replies_tx: mpsc::Sender<AiReply>,
    replies_rx: mpsc::Receiver<AiReply>,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
    cross_check_score: bool,
    tree_export_path: PathBuf,
}

impl<C: AiMoveClient + 'static> App<C> {
    pub fn new(machine: MatchStateMachine<C>, runtime: Handle) -> Self {
        let (replies_tx, replies_rx) = mpsc::channel();
        App {
            machine,
            runtime,
            replies_tx,
            replies_rx,
            selected_column: 3, // Start in middle
            should_quit: false,
            message: Some("Press 's' to start a match.".to_string()),
            cross_check_score: false,
            tree_export_path: PathBuf::from("decision_tree.json"),
        }
    }

    /// Ask the service to score each finished board and report disagreement.
    pub fn with_score_cross_check(mut self, enabled: bool) -> Self {
        self.cross_check_score = enabled;
        self
    }

    /// Main application loop
    pub fn run<W: io::Write>(&mut self, terminal: &mut Terminal<CrosstermBackend<W>>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
            self.drain_replies();
            self.dispatch_ai_turn();
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column < COLS - 1 {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.drop_piece(),
            KeyCode::Char('s') => {
                self.machine.start();
                self.selected_column = 3;
                self.message = Some("Match started. You play first.".to_string());
            }
            KeyCode::Char('n') => {
                self.machine.reset();
                self.selected_column = 3;
                self.message = Some("New match. Pick settings, then press 's'.".to_string());
            }
            KeyCode::Char('a') => {
                let settings = self.machine.settings();
                let position = Algorithm::ALL
                    .iter()
                    .position(|a| *a == settings.algorithm)
                    .unwrap_or(0);
                let algorithm = Algorithm::ALL[(position + 1) % Algorithm::ALL.len()];
                self.change_settings(AiSettings {
                    algorithm,
                    ..settings
                });
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let settings = self.machine.settings();
                self.change_settings(AiSettings {
                    depth: (settings.depth + 1).min(MAX_DEPTH),
                    ..settings
                });
            }
            KeyCode::Char('-') => {
                let settings = self.machine.settings();
                self.change_settings(AiSettings {
                    depth: settings.depth.saturating_sub(1).max(MIN_DEPTH),
                    ..settings
                });
            }
            KeyCode::Char('h') => self.check_health(),
            KeyCode::Char('e') => self.export_tree(),
            _ => {}
        }
    }

    /// Drop piece in selected column
    fn drop_piece(&mut self) {
        self.message = match self.machine.submit_human_move(self.selected_column) {
            Ok(state) => state.winner().map(|winner| winner.to_string()),
            Err(MatchError::Turn(TurnError::NotInProgress)) => Some(
                match self.machine.state().status() {
                    MatchStatus::Finished => "Match over! Press 's' to play again.",
                    _ => "Press 's' to start a match.",
                }
                .to_string(),
            ),
            Err(MatchError::Turn(TurnError::AwaitingAi | TurnError::NotHumanTurn)) => {
                Some("The AI is thinking...".to_string())
            }
            Err(MatchError::Turn(TurnError::InvalidMove(MoveError::ColumnFull(_)))) => {
                Some("Column is full!".to_string())
            }
            Err(err) => Some(err.to_string()),
        };
    }

    fn change_settings(&mut self, settings: AiSettings) {
        self.message = Some(match self.machine.set_settings(settings) {
            Ok(()) => format!(
                "AI: {} at depth {}",
                settings.algorithm.display_name(),
                settings.depth
            ),
            Err(MatchError::Turn(TurnError::AwaitingAi)) => {
                "Settings are locked while the AI is thinking.".to_string()
            }
            Err(err) => err.to_string(),
        });
    }

    /// Hand the AI turn, if one is due, to the runtime.
    fn dispatch_ai_turn(&mut self) {
        let Some(turn) = self.machine.begin_ai_turn() else {
            return;
        };
        let client = self.machine.client();
        let replies = self.replies_tx.clone();
        self.runtime.spawn(async move {
            let result = turn.fetch(client.as_ref()).await;
            // The receiver is gone only when the app is shutting down.
            let _ = replies.send(AiReply { turn, result });
        });
    }

    fn drain_replies(&mut self) {
        while let Ok(reply) = self.replies_rx.try_recv() {
            self.apply_reply(reply);
        }
    }

    fn apply_reply(&mut self, reply: AiReply) {
        match self.machine.finish_ai_turn(reply.turn, reply.result) {
            Ok(outcome) => {
                self.message = outcome.state.winner().map(|winner| winner.to_string());
                if outcome.state.is_finished() && self.cross_check_score {
                    self.cross_check();
                }
            }
            Err(MatchError::StaleAiTurn) => {}
            Err(err) => {
                self.message = Some(format!("{err}. Your move."));
            }
        }
    }

    fn cross_check(&mut self) {
        let check = self
            .runtime
            .block_on(with_timeout(Some(QUICK_CALL_TIMEOUT), self.machine.cross_check_score()));
        match check {
            Ok(Some(check)) if !check.agrees() => {
                self.message = Some(format!(
                    "Score service disagrees: local {}-{}, service {}-{}",
                    check.local.human, check.local.ai, check.remote.human, check.remote.ai
                ));
            }
            Ok(_) => {}
            Err(err) => warn!(error = %err, "score cross-check failed"),
        }
    }

    fn check_health(&mut self) {
        let client = self.machine.client();
        let healthy = self.runtime.block_on(with_timeout(Some(QUICK_CALL_TIMEOUT), async {
            Ok(client.health_check().await)
        }));
        self.message = Some(match healthy {
            Ok(true) => "AI service is up.".to_string(),
            _ => "AI service is not reachable.".to_string(),
        });
    }

    fn export_tree(&mut self) {
        let state = self.machine.state();
        let Some(tree) = state.decision_tree().tree() else {
            self.message = Some("No decision tree to export.".to_string());
            return;
        };
        let written = tree
            .to_pretty_json()
            .map_err(io::Error::other)
            .and_then(|json| std::fs::write(&self.tree_export_path, json));
        self.message = Some(match written {
            Ok(()) => {
                info!(path = %self.tree_export_path.display(), "decision tree exported");
                format!("Tree saved to {}", self.tree_export_path.display())
            }
            Err(err) => format!("Could not save tree: {err}"),
        });
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(
            frame,
            &self.machine.state(),
            &self.machine.settings(),
            self.selected_column,
            &self.message,
        );
    }
}
