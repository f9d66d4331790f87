//! Error types for the narrative engine.

use narrative_graph::GraphError;
use thiserror::Error;

/// Contract violations raised by the engine.
///
/// None of these are recoverable at runtime; they point at a caller or at the
/// graph data. A duplicate choice while a transition is pending is not an
/// error and never shows up here.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EngineError {
    #[error("'{0}' is not a recognised option letter (expected A or B)")]
    InvalidOptionLetter(String),

    #[error("cannot {operation} while {phase}")]
    InvalidState {
        operation: &'static str,
        phase: &'static str,
    },

    #[error("scores are tied at {together} together vs {alone} alone; the tiebreaker has not been applied")]
    TiedScore { together: u32, alone: u32 },

    #[error("together score {together} exceeds total steps {steps}")]
    ScoreExceedsSteps { together: u32, steps: u32 },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("invalid engine configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
