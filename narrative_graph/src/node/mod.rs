//! Node definitions for the narrative graph.

mod edge;
mod question;

pub use edge::*;
pub use question::*;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Unique identifier for question nodes and the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node ID from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the two choices offered at every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionLetter {
    A,
    B,
}

impl OptionLetter {
    pub fn as_char(&self) -> char {
        match self {
            OptionLetter::A => 'A',
            OptionLetter::B => 'B',
        }
    }
}

impl std::fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Input that names neither option.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a recognised option letter (expected A or B)")]
pub struct ParseOptionLetterError(pub String);

impl FromStr for OptionLetter {
    type Err = ParseOptionLetterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(OptionLetter::A),
            "B" | "b" => Ok(OptionLetter::B),
            other => Err(ParseOptionLetterError(other.to_string())),
        }
    }
}
