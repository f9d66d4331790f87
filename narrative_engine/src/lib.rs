//! # Narrative Engine
//!
//! The stateful half of the Valentine branching narrative. A
//! [`NarrativeEngine`] walks a [`narrative_graph::NarrativeGraph`] one choice
//! at a time, tallies "together" against "alone", inserts the tiebreaker when
//! the tallies are level, and resolves the final outcome.
//!
//! ## Core Components
//!
//! - **traversal**: the state machine, its phases and the mutable playthrough state
//! - **outcome**: pure resolution of final tallies into an outcome
//! - **events**: notifications queued for the presentation layer
//! - **config**: display tags and settle behaviour
//!
//! ## Design Philosophy
//!
//! - **No I/O**: every effect (camera moves, dialogue display) belongs to a caller observing transitions
//! - **Event-Driven**: the engine reacts to discrete choices and never owns a loop
//! - **Single owner**: one engine per playthrough, borrowing a shared immutable graph

pub mod config;
pub mod error;
pub mod events;
pub mod outcome;
pub mod traversal;

pub use config::*;
pub use error::*;
pub use events::*;
pub use outcome::*;
pub use traversal::*;
