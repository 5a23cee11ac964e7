//! # Connect Four Arena
//!
//! A human plays Connect Four against a remote search AI. The board is
//! filled completely and both players score one point per four-in-a-row
//! window. The AI's moves come from an HTTP decision service that also
//! reports its search tree.
//!
//! ## Modules
//!
//! - [`game`]: board, players, full-board scoring, match snapshots
//! - [`ai`]: AI client contract, HTTP transport, wire protocol, decision trees
//! - [`session`]: the match state machine driving human and AI turns
//! - [`ui`]: terminal front end
//! - [`config`]: TOML configuration loading and validation
//! - [`logging`]: tracing subscriber setup
//! - [`error`]: structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod session;
pub mod ui;
