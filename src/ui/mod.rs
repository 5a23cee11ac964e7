//! Terminal UI: play against the remote AI, with the latest search
//! statistics and decision-tree summary alongside the board.

mod app;
mod game_view;

pub use app::App;
