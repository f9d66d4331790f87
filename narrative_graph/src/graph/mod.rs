//! The narrative graph - immutable question nodes linked from `start` to the terminal.

mod validate;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::GraphError;
use crate::node::{Edge, EdgeTag, NodeId, QuestionNode};

/// Narrative text for the two outcome screens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epilogues {
    pub together: String,
    pub alone: String,
}

/// The complete, validated story graph.
///
/// Nodes are kept in authored order with an id index beside them, so lookups
/// are constant time and derived edge lists come out in a stable order.
/// A `NarrativeGraph` can only be obtained through [`NarrativeGraph::new`] (or
/// the loaders built on it), which means every instance satisfies the
/// authoring invariants: every option leads somewhere, there are no cycles,
/// and every node eventually reaches the terminal.
#[derive(Debug, Clone)]
pub struct NarrativeGraph {
    start: NodeId,
    terminal: NodeId,

    /// All question nodes in authored order.
    nodes: Vec<QuestionNode>,

    /// Index: NodeId -> position in `nodes`.
    index: HashMap<NodeId, usize>,

    /// Extra node presented only on a tie; not part of the main graph.
    tiebreaker: QuestionNode,

    epilogues: Epilogues,

    /// Decisions on the longest route from start to terminal.
    longest_path: usize,
}

impl NarrativeGraph {
    /// Build a graph and validate it.
    pub fn new(
        start: impl Into<NodeId>,
        terminal: impl Into<NodeId>,
        nodes: Vec<QuestionNode>,
        tiebreaker: QuestionNode,
        epilogues: Epilogues,
    ) -> Result<Self, GraphError> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), position).is_some() {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
        }

        let mut graph = Self {
            start: start.into(),
            terminal: terminal.into(),
            nodes,
            index,
            tiebreaker,
            epilogues,
            longest_path: 0,
        };

        validate::validate(&graph)?;
        graph.longest_path = validate::longest_path(&graph)?;

        let unreachable = validate::unreachable_nodes(&graph);
        if !unreachable.is_empty() {
            log::warn!(
                "{} node(s) cannot be reached from '{}': {:?}",
                unreachable.len(),
                graph.start,
                unreachable
            );
        }

        Ok(graph)
    }

    /// Get a node by ID.
    pub fn get_node(&self, id: &NodeId) -> Result<&QuestionNode, GraphError> {
        self.index
            .get(id)
            .map(|&position| &self.nodes[position])
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))
    }

    /// Check if a question node with this ID exists.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn is_terminal(&self, id: &NodeId) -> bool {
        *id == self.terminal
    }

    pub fn start(&self) -> &NodeId {
        &self.start
    }

    pub fn terminal(&self) -> &NodeId {
        &self.terminal
    }

    /// All question nodes in authored order.
    pub fn nodes(&self) -> &[QuestionNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn tiebreaker(&self) -> &QuestionNode {
        &self.tiebreaker
    }

    /// Narrative text for the given outcome.
    pub fn epilogue(&self, together: bool) -> &str {
        if together {
            &self.epilogues.together
        } else {
            &self.epilogues.alone
        }
    }

    /// Number of decisions on the longest route from start to terminal.
    ///
    /// Any playthrough reaches the terminal within this many choices.
    pub fn longest_path(&self) -> usize {
        self.longest_path
    }

    /// Derive every edge implied by the nodes' options, tagged with `default_tag`.
    ///
    /// When both options of a node lead to the same next node only one edge is
    /// produced. Edges come out in authored node order, option A before B.
    pub fn derive_edges(&self, default_tag: &EdgeTag) -> Vec<Edge> {
        let mut seen: HashSet<(&NodeId, &NodeId)> = HashSet::new();
        let mut edges = Vec::new();

        for node in &self.nodes {
            for (_, option) in node.options() {
                if seen.insert((&node.id, &option.next)) {
                    edges.push(Edge::new(
                        node.id.clone(),
                        option.next.clone(),
                        default_tag.clone(),
                    ));
                }
            }
        }

        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ChoiceOption;

    fn tiebreaker() -> QuestionNode {
        QuestionNode::new(
            "tiebreaker",
            "Last chance?",
            ChoiceOption::new("Stay", "end", true),
            ChoiceOption::new("Go", "end", false),
        )
    }

    fn small_graph() -> NarrativeGraph {
        NarrativeGraph::new(
            "start",
            "end",
            vec![
                QuestionNode::new(
                    "start",
                    "Call or text?",
                    ChoiceOption::new("Call", "porch", true),
                    ChoiceOption::new("Text", "porch", false),
                ),
                QuestionNode::new(
                    "porch",
                    "Open the door?",
                    ChoiceOption::new("Open", "end", true),
                    ChoiceOption::new("Wait", "end", false),
                ),
            ],
            tiebreaker(),
            Epilogues::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_get_node() {
        let graph = small_graph();

        let node = graph.get_node(&NodeId::new("porch")).unwrap();
        assert_eq!(node.question, "Open the door?");
        assert!(graph.contains(&NodeId::new("start")));
        assert!(!graph.contains(&NodeId::new("end")));
        assert!(graph.is_terminal(&NodeId::new("end")));
    }

    #[test]
    fn test_get_node_not_found() {
        let graph = small_graph();

        let err = graph.get_node(&NodeId::new("attic")).unwrap_err();
        assert!(matches!(err, GraphError::NodeNotFound(id) if id.as_str() == "attic"));
    }

    #[test]
    fn test_derive_edges_deduplicates() {
        let graph = small_graph();
        let tag = EdgeTag::new("neutral");

        let edges = graph.derive_edges(&tag);

        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].key(), (&NodeId::new("start"), &NodeId::new("porch")));
        assert_eq!(edges[1].key(), (&NodeId::new("porch"), &NodeId::new("end")));
        assert!(edges.iter().all(|e| e.tag == tag));
    }

    #[test]
    fn test_derive_edges_is_repeatable() {
        let graph = small_graph();
        let tag = EdgeTag::new("neutral");

        assert_eq!(graph.derive_edges(&tag), graph.derive_edges(&tag));
    }

    #[test]
    fn test_longest_path() {
        assert_eq!(small_graph().longest_path(), 2);
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let node = QuestionNode::new(
            "start",
            "?",
            ChoiceOption::new("a", "end", true),
            ChoiceOption::new("b", "end", false),
        );
        let result = NarrativeGraph::new(
            "start",
            "end",
            vec![node.clone(), node],
            tiebreaker(),
            Epilogues::default(),
        );
        assert!(matches!(result, Err(GraphError::DuplicateNode(_))));
    }

    #[test]
    fn test_epilogue_selection() {
        let graph = NarrativeGraph::new(
            "start",
            "end",
            vec![QuestionNode::new(
                "start",
                "?",
                ChoiceOption::new("a", "end", true),
                ChoiceOption::new("b", "end", false),
            )],
            tiebreaker(),
            Epilogues {
                together: "Side by side.".to_string(),
                alone: "Your own company.".to_string(),
            },
        )
        .unwrap();

        assert_eq!(graph.epilogue(true), "Side by side.");
        assert_eq!(graph.epilogue(false), "Your own company.");
    }
}
