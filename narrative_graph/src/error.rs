//! Errors raised while building, loading or querying a narrative graph.

use std::path::PathBuf;

use thiserror::Error;

use crate::node::{NodeId, OptionLetter};

/// Every variant is an authoring bug in the graph data, not a runtime condition.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GraphError {
    #[error("node '{0}' does not exist in the graph")]
    NodeNotFound(NodeId),

    #[error("node '{0}' is defined more than once")]
    DuplicateNode(NodeId),

    #[error("start node '{0}' is not defined")]
    MissingStart(NodeId),

    #[error("node '{0}' reuses the terminal id")]
    TerminalCollision(NodeId),

    #[error("option {letter} of node '{node}' points to unknown node '{target}'")]
    DanglingOption {
        node: NodeId,
        letter: OptionLetter,
        target: NodeId,
    },

    #[error("choice graph contains a cycle: {}", format_path(.path))]
    Cycle { path: Vec<NodeId> },

    #[error("tiebreaker id '{0}' is already used by the main graph or the terminal")]
    TiebreakerCollision(NodeId),

    #[error("tiebreaker option {letter} must lead to the terminal, not '{target}'")]
    TiebreakerNotTerminal { letter: OptionLetter, target: NodeId },

    #[error("failed to parse graph document: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read graph document {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn format_path(path: &[NodeId]) -> String {
    path.iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
