//! Edge records used for path display.

use serde::{Deserialize, Serialize};

use super::NodeId;

/// Opaque display tag attached to an edge (a color name, a CSS class, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeTag(String);

impl EdgeTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EdgeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed edge between two nodes, tagged for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub tag: EdgeTag,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId, tag: EdgeTag) -> Self {
        Self { from, to, tag }
    }

    /// The `(from, to)` pair identifying this edge.
    pub fn key(&self) -> (&NodeId, &NodeId) {
        (&self.from, &self.to)
    }
}
