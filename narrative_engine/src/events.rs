//! Notifications the engine queues for the presentation layer.
//!
//! The engine never drives cameras or dialogue itself. Each transition pushes
//! an event; the UI shell drains the queue after calling into the engine and
//! reacts however it likes.

use narrative_graph::{NodeId, OptionLetter};
use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;

/// A state transition worth telling the presentation layer about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NarrativeEvent {
    /// A choice was accounted for; the transition toward `to` is pending.
    ChoiceApplied {
        from: NodeId,
        to: NodeId,
        letter: OptionLetter,
        together: bool,
        step: u32,
    },

    /// A pending transition completed and `node` is now presented.
    Settled { node: NodeId },

    /// The terminal was reached and is awaiting resolution.
    TerminalReached { step: u32, together_score: u32 },

    /// Tallies were level at the terminal; the tiebreaker is on screen.
    TiebreakerPresented { node: NodeId },

    /// The playthrough is over.
    Resolved { outcome: Outcome },

    /// The engine was reset to the start node.
    Restarted,
}

/// FIFO of pending events, drained by the caller.
///
/// Unbounded: events accumulate until `drain()` is called.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<NarrativeEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: NarrativeEvent) {
        self.events.push(event);
    }

    /// Take all pending events, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<NarrativeEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &NarrativeEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
