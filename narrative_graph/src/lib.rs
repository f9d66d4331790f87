//! # Narrative Graph
//!
//! The static half of the Valentine branching narrative: question nodes, their
//! two options, and the graph that links them from `start` to the terminal.
//! This crate is the single source of truth for authored story data and holds
//! no playthrough state.
//!
//! ## Core Components
//!
//! - **node**: `NodeId`, `QuestionNode`, `ChoiceOption`, `OptionLetter`, edge records
//! - **graph**: `NarrativeGraph`, load-time validation and edge derivation
//! - **loader**: TOML graph documents and the bundled Valentine graph

pub mod error;
pub mod graph;
pub mod loader;
pub mod node;

pub use error::*;
pub use graph::*;
pub use node::*;
