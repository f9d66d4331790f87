//! Engine configuration.

use narrative_graph::{EdgeTag, OptionLetter};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Display tags attached to edges. Purely presentational; remap freely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeTagConfig {
    /// Tag for an edge taken through option A.
    pub option_a: EdgeTag,

    /// Tag for an edge taken through option B.
    pub option_b: EdgeTag,

    /// Tag for edges nobody has taken yet.
    pub untraversed: EdgeTag,
}

impl Default for EdgeTagConfig {
    fn default() -> Self {
        Self {
            option_a: EdgeTag::new("pink"),
            option_b: EdgeTag::new("blue"),
            untraversed: EdgeTag::new("neutral"),
        }
    }
}

impl EdgeTagConfig {
    pub fn for_letter(&self, letter: OptionLetter) -> &EdgeTag {
        match letter {
            OptionLetter::A => &self.option_a,
            OptionLetter::B => &self.option_b,
        }
    }
}

/// Configuration for a [`crate::NarrativeEngine`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub edge_tags: EdgeTagConfig,

    /// Settle every choice inside `choose()` instead of waiting for `settle()`.
    ///
    /// For headless drivers with no transition animation to wait for.
    pub settle_immediately: bool,
}

impl EngineConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, EngineError> {
        Ok(toml::from_str(source)?)
    }

    pub fn with_settle_immediately(mut self, settle_immediately: bool) -> Self {
        self.settle_immediately = settle_immediately;
        self
    }
}
