//! Mutable playthrough state and its serializable snapshot.

use narrative_graph::{ChoiceOption, Edge, EdgeTag, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{GamePhase, SessionId};
use crate::error::EngineError;

/// Where the player is and what they have chosen so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalState {
    current_node_id: NodeId,
    step: u32,
    together_score: u32,

    /// (from, to) -> tag of the option taken.
    traversed_edges: BTreeMap<(NodeId, NodeId), EdgeTag>,

    visited_nodes: BTreeSet<NodeId>,
}

impl TraversalState {
    /// Fresh state positioned at `start`.
    pub fn new(start: NodeId) -> Self {
        let mut visited_nodes = BTreeSet::new();
        visited_nodes.insert(start.clone());
        Self {
            current_node_id: start,
            step: 0,
            together_score: 0,
            traversed_edges: BTreeMap::new(),
            visited_nodes,
        }
    }

    pub fn current_node_id(&self) -> &NodeId {
        &self.current_node_id
    }

    /// Decisions made so far, tiebreaker included.
    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn together_score(&self) -> u32 {
        self.together_score
    }

    pub fn alone_score(&self) -> u32 {
        self.step - self.together_score
    }

    /// Tag recorded for the edge `from -> to`, if it was taken.
    pub fn edge_tag(&self, from: &NodeId, to: &NodeId) -> Option<&EdgeTag> {
        self.traversed_edges.get(&(from.clone(), to.clone()))
    }

    pub fn traversed_edge_count(&self) -> usize {
        self.traversed_edges.len()
    }

    /// Taken edges as display records, ordered by (from, to).
    pub fn traversed_edges(&self) -> Vec<Edge> {
        self.traversed_edges
            .iter()
            .map(|((from, to), tag)| Edge::new(from.clone(), to.clone(), tag.clone()))
            .collect()
    }

    pub fn has_visited(&self, id: &NodeId) -> bool {
        self.visited_nodes.contains(id)
    }

    pub fn visited_nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.visited_nodes.iter()
    }

    /// Account for a main-graph choice made at `from` and move to its destination.
    pub(crate) fn record_choice(&mut self, from: &NodeId, option: &ChoiceOption, tag: EdgeTag) {
        self.count_decision(option.together);
        self.traversed_edges
            .insert((from.clone(), option.next.clone()), tag);
        self.visited_nodes.insert(option.next.clone());
        self.current_node_id = option.next.clone();
    }

    /// Account for the tiebreaker choice. No edge is recorded.
    pub(crate) fn record_tiebreaker(&mut self, tiebreaker: &NodeId, option: &ChoiceOption) {
        self.count_decision(option.together);
        self.visited_nodes.insert(tiebreaker.clone());
    }

    fn count_decision(&mut self, together: bool) {
        self.step += 1;
        if together {
            self.together_score += 1;
        }
    }
}

/// Read-only copy of the engine state for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub session: SessionId,
    pub phase: GamePhase,
    pub current_node_id: NodeId,
    pub step: u32,
    pub together_score: u32,
    pub alone_score: u32,
    pub traversed_edges: Vec<Edge>,
    pub visited_nodes: Vec<NodeId>,
}

impl Snapshot {
    pub(crate) fn capture(session: SessionId, phase: &GamePhase, state: &TraversalState) -> Self {
        Self {
            session,
            phase: phase.clone(),
            current_node_id: state.current_node_id.clone(),
            step: state.step,
            together_score: state.together_score,
            alone_score: state.alone_score(),
            traversed_edges: state.traversed_edges(),
            visited_nodes: state.visited_nodes.iter().cloned().collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string(self)?)
    }
}
