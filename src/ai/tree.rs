//! Search trees reported by the AI service alongside its move.
//!
//! The tree is only validated and kept for display; gameplay never depends
//! on it. Each new AI move replaces the previous artifact wholesale.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::TreeError;

pub const DEFAULT_MAX_NODES: usize = 250_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Root,
    Max,
    Min,
    Chance,
    Leaf,
}

/// One node of the search tree, in the service's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pruned: bool,
    /// Text rendering of the position some services attach for debugging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,
    #[serde(default)]
    pub children: Vec<DecisionNode>,
}

impl DecisionNode {
    /// Nodes without children are leaves whatever their declared kind.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Aggregate figures for a status line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeSummary {
    pub nodes: usize,
    pub leaves: usize,
    pub pruned: usize,
    pub max_depth: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    root: DecisionNode,
}

impl DecisionTree {
    pub fn new(root: DecisionNode) -> Self {
        DecisionTree { root }
    }

    pub fn root(&self) -> &DecisionNode {
        &self.root
    }

    /// Walks the tree without recursion; depth of the root is 0.
    pub fn summary(&self) -> TreeSummary {
        let mut summary = TreeSummary::default();
        let mut stack = vec![(&self.root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            summary.nodes += 1;
            summary.max_depth = summary.max_depth.max(depth);
            if node.pruned {
                summary.pruned += 1;
            }
            if node.is_leaf() {
                summary.leaves += 1;
            }
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        summary
    }

    /// Pretty JSON in the service's wire shape, for saving to disk.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.root)
    }
}

/// What the display layer has to show for the latest AI move.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TreeArtifact {
    /// The service sent no tree.
    #[default]
    Absent,
    /// The service sent something that is not a valid tree.
    Malformed(TreeError),
    Tree(Arc<DecisionTree>),
}

impl TreeArtifact {
    pub fn tree(&self) -> Option<&DecisionTree> {
        match self {
            TreeArtifact::Tree(tree) => Some(tree),
            _ => None,
        }
    }
}

/// Turns the raw `tree` field of a move response into a [`TreeArtifact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionTreeIngestor {
    max_nodes: usize,
}

impl DecisionTreeIngestor {
    pub fn new(max_nodes: usize) -> Self {
        DecisionTreeIngestor { max_nodes }
    }

    /// Never fails: a malformed payload becomes [`TreeArtifact::Malformed`].
    pub fn ingest(&self, payload: Option<serde_json::Value>) -> TreeArtifact {
        let Some(value) = payload.filter(|value| !value.is_null()) else {
            return TreeArtifact::Absent;
        };
        match self.parse(value) {
            Ok(tree) => {
                debug!(nodes = tree.summary().nodes, "decision tree ingested");
                TreeArtifact::Tree(Arc::new(tree))
            }
            Err(err) => {
                warn!(error = %err, "discarding decision tree");
                TreeArtifact::Malformed(err)
            }
        }
    }

    pub fn parse(&self, value: serde_json::Value) -> Result<DecisionTree, TreeError> {
        let root: DecisionNode =
            serde_json::from_value(value).map_err(|e| TreeError::Malformed(e.to_string()))?;
        let tree = DecisionTree::new(root);
        let nodes = tree.summary().nodes;
        if nodes > self.max_nodes {
            return Err(TreeError::TooLarge {
                nodes,
                limit: self.max_nodes,
            });
        }
        Ok(tree)
    }
}

impl Default for DecisionTreeIngestor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NODES)
    }
}
