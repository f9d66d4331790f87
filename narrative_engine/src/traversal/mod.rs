//! Traversal state machine - the single source of truth for a playthrough.
//!
//! Phases and the calls that move between them:
//!
//! ```text
//! AtNode --choose--> Transitioning --settle--> AtNode | AtTerminal
//! AtTerminal --resolve_terminal--> Resolved | AtTiebreaker
//! AtTiebreaker --choose_tiebreaker--> Resolved
//! any --restart--> AtNode(start)
//! ```
//!
//! `Transitioning` exists so a UI can hold the engine still while it animates
//! toward the next node. A second `choose()` in that window is ignored, which
//! absorbs double clicks without double-advancing.

mod state;

pub use state::*;

use narrative_graph::{Edge, NarrativeGraph, NodeId, OptionLetter, QuestionNode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::events::{EventQueue, NarrativeEvent};
use crate::outcome::{self, Outcome};

/// Identifier for one engine instance (one player's playthroughs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Phases of a playthrough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GamePhase {
    /// Awaiting a choice at this node.
    AtNode(NodeId),

    /// A choice was applied; the UI has not settled on `to` yet.
    Transitioning { from: NodeId, to: NodeId },

    /// The terminal was reached and awaits `resolve_terminal()`.
    AtTerminal,

    /// Tallies were level; awaiting `choose_tiebreaker()`.
    AtTiebreaker,

    /// The playthrough is over; only `restart()` leaves this phase.
    Resolved(Outcome),
}

impl GamePhase {
    /// Short description used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            GamePhase::AtNode(_) => "at a node",
            GamePhase::Transitioning { .. } => "transitioning",
            GamePhase::AtTerminal => "at the terminal",
            GamePhase::AtTiebreaker => "at the tiebreaker",
            GamePhase::Resolved(_) => "resolved",
        }
    }
}

/// Result of a `choose()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceResult {
    /// The choice was accounted for.
    Applied { from: NodeId, to: NodeId },

    /// A transition was already pending; nothing changed.
    Ignored,
}

/// Result of `resolve_terminal()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalResolution {
    Resolved(Outcome),

    /// Tallies were level and the tiebreaker must be answered first.
    TiebreakerRequired,
}

/// Drives one playthrough over a borrowed, immutable graph.
pub struct NarrativeEngine<'g> {
    graph: &'g NarrativeGraph,
    config: EngineConfig,
    session: SessionId,
    state: TraversalState,
    phase: GamePhase,
    events: EventQueue,
}

impl<'g> NarrativeEngine<'g> {
    /// Create an engine with default configuration.
    pub fn new(graph: &'g NarrativeGraph) -> Self {
        Self::with_config(graph, EngineConfig::default())
    }

    pub fn with_config(graph: &'g NarrativeGraph, config: EngineConfig) -> Self {
        let start = graph.start().clone();
        let session = SessionId::new();
        log::debug!("session {} created at '{}'", session, start);

        Self {
            graph,
            config,
            session,
            state: TraversalState::new(start.clone()),
            phase: GamePhase::AtNode(start),
            events: EventQueue::new(),
        }
    }

    /// Take the option behind `letter` at the current node.
    ///
    /// Valid while `AtNode`. While `Transitioning` the call is ignored and
    /// returns `ChoiceResult::Ignored`.
    pub fn choose(&mut self, letter: OptionLetter) -> Result<ChoiceResult, EngineError> {
        let from = match &self.phase {
            GamePhase::AtNode(id) => id.clone(),
            GamePhase::Transitioning { to, .. } => {
                log::warn!(
                    "session {}: ignoring choice {} while transitioning to '{}'",
                    self.session,
                    letter,
                    to
                );
                return Ok(ChoiceResult::Ignored);
            }
            other => return Err(self.invalid("choose", other)),
        };

        let graph = self.graph;
        let option = graph.get_node(&from)?.option(letter);
        let tag = self.config.edge_tags.for_letter(letter).clone();

        self.state.record_choice(&from, option, tag);
        let to = option.next.clone();

        log::debug!(
            "session {}: step {} '{}' -{}-> '{}' (together: {})",
            self.session,
            self.state.step(),
            from,
            letter,
            to,
            option.together
        );

        self.events.push(NarrativeEvent::ChoiceApplied {
            from: from.clone(),
            to: to.clone(),
            letter,
            together: option.together,
            step: self.state.step(),
        });
        self.phase = GamePhase::Transitioning {
            from: from.clone(),
            to: to.clone(),
        };

        if self.config.settle_immediately {
            self.settle()?;
        }

        Ok(ChoiceResult::Applied { from, to })
    }

    /// Parse a raw letter ("A"/"B") and choose it.
    ///
    /// An unrecognised letter fails with `InvalidOptionLetter` and changes nothing.
    pub fn choose_input(&mut self, input: &str) -> Result<ChoiceResult, EngineError> {
        let letter: OptionLetter = input
            .parse()
            .map_err(|e: narrative_graph::ParseOptionLetterError| {
                EngineError::InvalidOptionLetter(e.0)
            })?;
        self.choose(letter)
    }

    /// Complete a pending transition.
    pub fn settle(&mut self) -> Result<(), EngineError> {
        let to = match &self.phase {
            GamePhase::Transitioning { to, .. } => to.clone(),
            other => return Err(self.invalid("settle", other)),
        };

        self.events.push(NarrativeEvent::Settled { node: to.clone() });

        if self.graph.is_terminal(&to) {
            log::info!(
                "session {}: reached terminal after {} steps ({} together)",
                self.session,
                self.state.step(),
                self.state.together_score()
            );
            self.events.push(NarrativeEvent::TerminalReached {
                step: self.state.step(),
                together_score: self.state.together_score(),
            });
            self.phase = GamePhase::AtTerminal;
        } else {
            log::debug!("session {}: settled at '{}'", self.session, to);
            self.phase = GamePhase::AtNode(to);
        }

        Ok(())
    }

    /// Resolve the outcome at the terminal, or present the tiebreaker on a tie.
    pub fn resolve_terminal(&mut self) -> Result<TerminalResolution, EngineError> {
        if self.phase != GamePhase::AtTerminal {
            return Err(self.invalid("resolve the terminal", &self.phase));
        }

        let together = self.state.together_score();
        let alone = self.state.alone_score();

        if together == alone {
            let tiebreaker = self.graph.tiebreaker().id.clone();
            log::info!(
                "session {}: tied {} to {}, presenting '{}'",
                self.session,
                together,
                alone,
                tiebreaker
            );
            self.events
                .push(NarrativeEvent::TiebreakerPresented { node: tiebreaker });
            self.phase = GamePhase::AtTiebreaker;
            return Ok(TerminalResolution::TiebreakerRequired);
        }

        let outcome = outcome::resolve(together, self.state.step())?;
        self.finish(outcome);
        Ok(TerminalResolution::Resolved(outcome))
    }

    /// Answer the tiebreaker and resolve.
    pub fn choose_tiebreaker(&mut self, letter: OptionLetter) -> Result<Outcome, EngineError> {
        if self.phase != GamePhase::AtTiebreaker {
            return Err(self.invalid("choose the tiebreaker", &self.phase));
        }

        let graph = self.graph;
        let tiebreaker = graph.tiebreaker();
        let option = tiebreaker.option(letter);
        self.state.record_tiebreaker(&tiebreaker.id, option);

        log::debug!(
            "session {}: tiebreaker {} (together: {})",
            self.session,
            letter,
            option.together
        );

        let outcome = outcome::resolve(self.state.together_score(), self.state.step())?;
        self.finish(outcome);
        Ok(outcome)
    }

    /// Reset to the start node. Valid in any phase.
    pub fn restart(&mut self) {
        let start = self.graph.start().clone();
        log::info!("session {}: restarting at '{}'", self.session, start);

        self.state = TraversalState::new(start.clone());
        self.phase = GamePhase::AtNode(start);
        self.events.push(NarrativeEvent::Restarted);
    }

    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    pub fn state(&self) -> &TraversalState {
        &self.state
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn graph(&self) -> &'g NarrativeGraph {
        self.graph
    }

    /// The question currently on screen.
    ///
    /// The current node while `AtNode`, the tiebreaker while `AtTiebreaker`,
    /// `None` otherwise.
    pub fn current_node(&self) -> Option<&'g QuestionNode> {
        match &self.phase {
            GamePhase::AtNode(id) => self.graph.get_node(id).ok(),
            GamePhase::AtTiebreaker => Some(self.graph.tiebreaker()),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            GamePhase::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Narrative text for the resolved outcome.
    pub fn epilogue(&self) -> Option<&'g str> {
        self.outcome().map(|o| self.graph.epilogue(o.together))
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.phase, GamePhase::Resolved(_))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.session, &self.phase, &self.state)
    }

    /// Every edge of the graph, with taken edges carrying the tag of the
    /// option that took them and the rest tagged as untraversed.
    pub fn map_edges(&self) -> Vec<Edge> {
        let mut edges = self
            .graph
            .derive_edges(&self.config.edge_tags.untraversed);
        for edge in &mut edges {
            if let Some(tag) = self.state.edge_tag(&edge.from, &edge.to) {
                edge.tag = tag.clone();
            }
        }
        edges
    }

    /// Take all events queued since the last drain.
    ///
    /// The engine never discards events on its own, `restart()` included, so
    /// a shell must drain after each call it reacts to.
    pub fn drain_events(&mut self) -> Vec<NarrativeEvent> {
        self.events.drain()
    }

    pub fn pending_events(&self) -> &EventQueue {
        &self.events
    }

    fn finish(&mut self, outcome: Outcome) {
        log::info!(
            "session {}: resolved {} ({} together / {} alone)",
            self.session,
            outcome.kind(),
            self.state.together_score(),
            self.state.alone_score()
        );
        self.events.push(NarrativeEvent::Resolved { outcome });
        self.phase = GamePhase::Resolved(outcome);
    }

    fn invalid(&self, operation: &'static str, phase: &GamePhase) -> EngineError {
        EngineError::InvalidState {
            operation,
            phase: phase.name(),
        }
    }
}
