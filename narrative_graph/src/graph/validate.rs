//! Load-time checks for authored graphs.

use std::collections::{HashMap, HashSet, VecDeque};

use super::NarrativeGraph;
use crate::error::GraphError;
use crate::node::NodeId;

/// Check every authoring invariant the engine relies on.
pub(super) fn validate(graph: &NarrativeGraph) -> Result<(), GraphError> {
    for node in &graph.nodes {
        if graph.is_terminal(&node.id) {
            return Err(GraphError::TerminalCollision(node.id.clone()));
        }
    }

    if !graph.contains(&graph.start) {
        return Err(GraphError::MissingStart(graph.start.clone()));
    }

    for node in &graph.nodes {
        for (letter, option) in node.options() {
            if !graph.contains(&option.next) && !graph.is_terminal(&option.next) {
                return Err(GraphError::DanglingOption {
                    node: node.id.clone(),
                    letter,
                    target: option.next.clone(),
                });
            }
        }
    }

    // Acyclic plus no dangling options means every node reaches the terminal.
    topological_order(graph)?;

    let tiebreaker = &graph.tiebreaker;
    if graph.contains(&tiebreaker.id) || graph.is_terminal(&tiebreaker.id) {
        return Err(GraphError::TiebreakerCollision(tiebreaker.id.clone()));
    }

    for (letter, option) in tiebreaker.options() {
        if !graph.is_terminal(&option.next) {
            return Err(GraphError::TiebreakerNotTerminal {
                letter,
                target: option.next.clone(),
            });
        }
    }

    Ok(())
}

/// Positions of the node's successors, terminal excluded, option A first.
fn successors(graph: &NarrativeGraph, position: usize) -> impl Iterator<Item = usize> + '_ {
    graph.nodes[position]
        .options()
        .into_iter()
        .filter_map(move |(_, option)| graph.index.get(&option.next).copied())
}

/// Node positions ordered so every option points forward (Kahn's algorithm).
///
/// Fails with `Cycle` when some nodes can never be released.
fn topological_order(graph: &NarrativeGraph) -> Result<Vec<usize>, GraphError> {
    let count = graph.nodes.len();
    let mut in_degree = vec![0usize; count];
    for position in 0..count {
        for next in successors(graph, position) {
            in_degree[next] += 1;
        }
    }

    let mut ready: Vec<usize> = (0..count).rev().filter(|&p| in_degree[p] == 0).collect();
    let mut order = Vec::with_capacity(count);

    while let Some(position) = ready.pop() {
        order.push(position);
        for next in successors(graph, position) {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.push(next);
            }
        }
    }

    if order.len() < count {
        return Err(GraphError::Cycle {
            path: find_cycle(graph, &in_degree),
        });
    }

    Ok(order)
}

/// Recover one cycle among the nodes Kahn's algorithm left behind.
///
/// Every leftover node has a leftover predecessor, so walking predecessors
/// must revisit a node. The walk runs backwards; the result is reversed into
/// choice order, rotated to begin at the earliest authored node and closed.
fn find_cycle(graph: &NarrativeGraph, in_degree: &[usize]) -> Vec<NodeId> {
    let leftover = |p: usize| in_degree[p] > 0;
    let count = graph.nodes.len();

    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); count];
    for position in (0..count).filter(|&p| leftover(p)) {
        for next in successors(graph, position) {
            if leftover(next) {
                predecessors[next].push(position);
            }
        }
    }

    let Some(first) = (0..count).find(|&p| leftover(p)) else {
        return Vec::new();
    };

    let mut seen_at: HashMap<usize, usize> = HashMap::new();
    let mut walk = Vec::new();
    let mut current = first;
    while let std::collections::hash_map::Entry::Vacant(entry) = seen_at.entry(current) {
        entry.insert(walk.len());
        walk.push(current);
        match predecessors[current].first() {
            Some(&previous) => current = previous,
            None => break,
        }
    }

    let begin = seen_at.get(&current).copied().unwrap_or(0);
    let mut cycle: Vec<usize> = walk[begin..].iter().rev().copied().collect();
    if let Some(lowest) = cycle
        .iter()
        .enumerate()
        .min_by_key(|&(_, &p)| p)
        .map(|(i, _)| i)
    {
        cycle.rotate_left(lowest);
    }
    if let Some(&head) = cycle.first() {
        cycle.push(head);
    }

    cycle
        .into_iter()
        .map(|p| graph.nodes[p].id.clone())
        .collect()
}

/// Longest number of decisions from start to terminal. Requires a validated graph.
pub(super) fn longest_path(graph: &NarrativeGraph) -> Result<usize, GraphError> {
    let order = topological_order(graph)?;

    // Depth of a node = decisions to the terminal along its longest route.
    let mut depth = vec![0usize; graph.nodes.len()];
    for &position in order.iter().rev() {
        depth[position] = 1 + successors(graph, position)
            .map(|next| depth[next])
            .max()
            .unwrap_or(0);
    }

    graph
        .index
        .get(&graph.start)
        .map(|&start| depth[start])
        .ok_or_else(|| GraphError::MissingStart(graph.start.clone()))
}

/// Nodes no sequence of choices from start can reach, in authored order.
pub(super) fn unreachable_nodes(graph: &NarrativeGraph) -> Vec<NodeId> {
    let mut reached: HashSet<&NodeId> = HashSet::new();
    let mut queue: VecDeque<&NodeId> = VecDeque::new();

    reached.insert(&graph.start);
    queue.push_back(&graph.start);

    while let Some(id) = queue.pop_front() {
        let Ok(node) = graph.get_node(id) else {
            continue;
        };
        for (_, option) in node.options() {
            if reached.insert(&option.next) {
                queue.push_back(&option.next);
            }
        }
    }

    graph
        .nodes
        .iter()
        .filter(|node| !reached.contains(&node.id))
        .map(|node| node.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::graph::{Epilogues, NarrativeGraph};
    use crate::node::{ChoiceOption, NodeId, OptionLetter, QuestionNode};
    use crate::GraphError;

    fn node(id: &str, a: &str, b: &str) -> QuestionNode {
        QuestionNode::new(
            id,
            "?",
            ChoiceOption::new("a", a, true),
            ChoiceOption::new("b", b, false),
        )
    }

    fn build(start: &str, nodes: Vec<QuestionNode>) -> Result<NarrativeGraph, GraphError> {
        NarrativeGraph::new(
            start,
            "end",
            nodes,
            node("tiebreaker", "end", "end"),
            Epilogues::default(),
        )
    }

    /// `n0 -> n1 -> ... -> n{len-1} -> end`, option B always ending early.
    fn chain(len: usize) -> Vec<QuestionNode> {
        (0..len)
            .map(|i| {
                let next = if i + 1 == len {
                    "end".to_string()
                } else {
                    format!("n{}", i + 1)
                };
                node(&format!("n{}", i), &next, "end")
            })
            .collect()
    }

    #[test]
    fn test_deep_chain_validates() {
        let graph = build("n0", chain(20_000)).unwrap();

        assert_eq!(graph.node_count(), 20_000);
        assert_eq!(graph.longest_path(), 20_000);
    }

    #[test]
    fn test_deep_cycle_reported() {
        let mut nodes = chain(10_000);
        nodes[9_999] = node("n9999", "n0", "end");

        match build("n0", nodes) {
            Err(GraphError::Cycle { path }) => {
                assert_eq!(path.len(), 10_001);
                assert_eq!(path.first(), path.last());
                assert_eq!(path[0].as_str(), "n0");
                assert_eq!(path[1].as_str(), "n1");
            }
            other => panic!("expected cycle, got {:?}", other.map(|g| g.node_count())),
        }
    }

    #[test]
    fn test_tiebreaker_id_collides_with_node() {
        let result = NarrativeGraph::new(
            "start",
            "end",
            vec![node("start", "end", "end")],
            node("start", "end", "end"),
            Epilogues::default(),
        );
        assert!(matches!(result, Err(GraphError::TiebreakerCollision(id)) if id.as_str() == "start"));
    }

    #[test]
    fn test_tiebreaker_id_collides_with_terminal() {
        let result = NarrativeGraph::new(
            "start",
            "end",
            vec![node("start", "end", "end")],
            node("end", "end", "end"),
            Epilogues::default(),
        );
        assert!(matches!(result, Err(GraphError::TiebreakerCollision(id)) if id.as_str() == "end"));
    }

    #[test]
    fn test_missing_start() {
        let result = build("start", vec![node("first", "end", "end")]);
        assert!(matches!(result, Err(GraphError::MissingStart(id)) if id.as_str() == "start"));
    }

    #[test]
    fn test_terminal_collision() {
        let result = build("start", vec![node("start", "end", "end"), node("end", "start", "start")]);
        assert!(matches!(result, Err(GraphError::TerminalCollision(_))));
    }

    #[test]
    fn test_dangling_option() {
        let result = build("start", vec![node("start", "end", "garden")]);
        match result {
            Err(GraphError::DanglingOption { node, letter, target }) => {
                assert_eq!(node.as_str(), "start");
                assert_eq!(letter, OptionLetter::B);
                assert_eq!(target.as_str(), "garden");
            }
            other => panic!("expected dangling option, got {:?}", other),
        }
    }

    #[test]
    fn test_cycle_detected() {
        let result = build(
            "start",
            vec![
                node("start", "hall", "end"),
                node("hall", "kitchen", "end"),
                node("kitchen", "end", "hall"),
            ],
        );
        match result {
            Err(GraphError::Cycle { path }) => {
                let ids: Vec<_> = path.iter().map(NodeId::as_str).collect();
                assert_eq!(ids, vec!["hall", "kitchen", "hall"]);
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_self_loop_detected() {
        let result = build("start", vec![node("start", "start", "end")]);
        assert!(matches!(result, Err(GraphError::Cycle { .. })));
    }

    #[test]
    fn test_tiebreaker_must_end() {
        let result = NarrativeGraph::new(
            "start",
            "end",
            vec![node("start", "end", "end")],
            node("tiebreaker", "end", "start"),
            Epilogues::default(),
        );
        assert!(matches!(
            result,
            Err(GraphError::TiebreakerNotTerminal { letter: OptionLetter::B, .. })
        ));
    }

    #[test]
    fn test_unreachable_nodes_allowed() {
        let graph = build(
            "start",
            vec![node("start", "end", "end"), node("orphan", "end", "end")],
        )
        .unwrap();

        assert_eq!(super::unreachable_nodes(&graph), vec![NodeId::new("orphan")]);
    }

    #[test]
    fn test_longest_path_takes_longer_branch() {
        let graph = build(
            "start",
            vec![
                node("start", "short", "long"),
                node("short", "end", "end"),
                node("long", "longer", "end"),
                node("longer", "end", "end"),
            ],
        )
        .unwrap();

        assert_eq!(graph.longest_path(), 3);
    }
}
