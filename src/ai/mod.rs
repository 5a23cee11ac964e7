//! Boundary with the external AI decision service: the client contract, its
//! HTTP transport and wire shapes, and ingestion of the search tree it
//! reports with each move.

mod client;
pub mod http;
pub mod protocol;
pub mod tree;

pub use client::{with_timeout, AiMove, AiMoveClient, MoveStats};
pub use http::HttpAiClient;
pub use protocol::{Algorithm, DEFAULT_DEPTH, MAX_DEPTH, MIN_DEPTH};
pub use tree::{DecisionNode, DecisionTree, DecisionTreeIngestor, NodeKind, TreeArtifact, TreeSummary};
