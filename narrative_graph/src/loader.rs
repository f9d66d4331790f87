//! Loading graphs from TOML documents.
//!
//! A document names the start and terminal ids, the tiebreaker, optional
//! epilogue text, and one `[[node]]` table per question:
//!
//! ```toml
//! start = "start"
//! terminal = "end"
//!
//! [epilogues]
//! together = "..."
//! alone = "..."
//!
//! [tiebreaker]
//! id = "tiebreaker"
//! question = "..."
//! option_a = { label = "...", next = "end", together = true }
//! option_b = { label = "...", next = "end", together = false }
//!
//! [[node]]
//! id = "start"
//! context = "..."
//! question = "..."
//! option_a = { label = "...", next = "dinner", together = true }
//! option_b = { label = "...", next = "end", together = false }
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::error::GraphError;
use crate::graph::{Epilogues, NarrativeGraph};
use crate::node::{NodeId, QuestionNode};

/// The bundled Valentine mini-game.
const VALENTINE_TOML: &str = include_str!("../data/valentine.toml");

#[derive(Debug, Deserialize)]
struct GraphDocument {
    start: NodeId,
    terminal: NodeId,
    #[serde(default)]
    epilogues: Epilogues,
    tiebreaker: QuestionNode,
    #[serde(rename = "node", default)]
    nodes: Vec<QuestionNode>,
}

impl NarrativeGraph {
    /// Parse and validate a graph document.
    pub fn from_toml_str(source: &str) -> Result<Self, GraphError> {
        let document: GraphDocument = toml::from_str(source)?;
        log::debug!(
            "parsed graph document: {} nodes, start '{}', terminal '{}'",
            document.nodes.len(),
            document.start,
            document.terminal
        );
        Self::new(
            document.start,
            document.terminal,
            document.nodes,
            document.tiebreaker,
            document.epilogues,
        )
    }

    /// Read, parse and validate a graph document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// The bundled Valentine graph.
    pub fn valentine() -> Result<Self, GraphError> {
        Self::from_toml_str(VALENTINE_TOML)
    }
}
