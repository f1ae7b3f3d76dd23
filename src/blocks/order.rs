//! Deterministic node ordering.
//!
//! Reverse post-order of a depth-first walk from the entry node. The
//! walk takes [`ordered_successors`] children in reverse order, so the
//! reversed post-order honors the enumerator's priority: the
//! fall-through successor lands immediately after its predecessor
//! whenever the graph allows it. An on-stack marker detects back edges,
//! which are skipped silently; cycles are permitted. Ties are broken
//! only by the enumerator's ordering, so the result is a function of
//! the input graph alone.

use fixedbitset::FixedBitSet;
use tracing::{debug, trace};

use crate::blocks::succ::ordered_successors;
use crate::error::{BlockflowError, Result};
use crate::graph::{FlowGraph, NodeId};

/// Order all nodes reachable from the entry, forward edges first.
///
/// For every edge `u -> v` that is not part of a cycle, `u` precedes
/// `v` in the result. Unreachable nodes are omitted.
///
/// # Errors
/// Returns [`BlockflowError::MissingEntry`] if the graph has no entry
/// node.
pub fn sort_nodes<T>(graph: &FlowGraph<T>) -> Result<Vec<NodeId>> {
    let entry = graph.entry().ok_or(BlockflowError::MissingEntry)?;

    let mut visited = FixedBitSet::with_capacity(graph.node_count());
    let mut on_stack = FixedBitSet::with_capacity(graph.node_count());
    let mut postorder = Vec::with_capacity(graph.node_count());

    visit(graph, entry, &mut visited, &mut on_stack, &mut postorder);

    postorder.reverse();
    debug!(
        "ordered {} of {} nodes from {:?}",
        postorder.len(),
        graph.node_count(),
        entry
    );
    Ok(postorder)
}

/// Post-order DFS. A successor still on the recursion stack marks a
/// back edge and is skipped; an already-visited successor off the stack
/// is a cross edge and needs no action either way.
fn visit<T>(
    graph: &FlowGraph<T>,
    node: NodeId,
    visited: &mut FixedBitSet,
    on_stack: &mut FixedBitSet,
    postorder: &mut Vec<NodeId>,
) {
    visited.insert(node.0);
    on_stack.insert(node.0);

    // Reverse order: the highest-priority child is visited last, so it
    // posts latest and sits closest to its parent after the reversal.
    for succ in ordered_successors(graph, node).into_iter().rev() {
        if !visited.contains(succ.0) {
            visit(graph, succ, visited, on_stack, postorder);
        } else if on_stack.contains(succ.0) {
            trace!("back edge {:?} -> {:?} ignored", node, succ);
        }
    }

    on_stack.set(node.0, false);
    postorder.push(node);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::FlowGraph;

    #[test]
    fn test_linear_chain() {
        let mut graph = FlowGraph::new();
        let root = graph.root_region();
        let a = graph.add_node(root, "a");
        let b = graph.add_node(root, "b");
        let c = graph.add_node(root, "c");
        graph.set_fallthrough(a, b);
        graph.set_fallthrough(b, c);

        assert_eq!(sort_nodes(&graph).unwrap(), vec![a, b, c]);
    }

    #[test]
    fn test_branch_join_honors_enumerator_order() {
        // A falls through to B, branches to C; both rejoin at D.
        let mut graph = FlowGraph::new();
        let root = graph.root_region();
        let a = graph.add_node(root, "a");
        let b = graph.add_node(root, "b");
        let c = graph.add_node(root, "c");
        let d = graph.add_node(root, "d");
        graph.set_fallthrough(a, b);
        graph.add_conditional(a, c);
        graph.set_fallthrough(b, d);
        graph.set_fallthrough(c, d);

        // D must not precede C: C -> D is a forward edge.
        assert_eq!(sort_nodes(&graph).unwrap(), vec![a, b, c, d]);
    }

    #[test]
    fn test_back_edge_ignored() {
        let mut graph = FlowGraph::new();
        let root = graph.root_region();
        let a = graph.add_node(root, "a");
        let b = graph.add_node(root, "b");
        let c = graph.add_node(root, "c");
        graph.set_fallthrough(a, b);
        graph.set_fallthrough(b, c);
        graph.add_conditional(c, b);

        assert_eq!(sort_nodes(&graph).unwrap(), vec![a, b, c]);
    }

    #[test]
    fn test_self_loop_terminates() {
        let mut graph = FlowGraph::new();
        let root = graph.root_region();
        let a = graph.add_node(root, "a");
        let b = graph.add_node(root, "b");
        graph.set_fallthrough(a, b);
        graph.add_conditional(b, b);

        assert_eq!(sort_nodes(&graph).unwrap(), vec![a, b]);
    }

    #[test]
    fn test_unreachable_nodes_omitted() {
        let mut graph = FlowGraph::new();
        let root = graph.root_region();
        let a = graph.add_node(root, "a");
        let b = graph.add_node(root, "b");
        let _island = graph.add_node(root, "island");
        graph.set_fallthrough(a, b);

        assert_eq!(sort_nodes(&graph).unwrap(), vec![a, b]);
    }

    #[test]
    fn test_missing_entry_rejected() {
        let graph = FlowGraph::<()>::new();
        assert_eq!(sort_nodes(&graph), Err(BlockflowError::MissingEntry));
    }

    #[test]
    fn test_deterministic_across_runs() {
        let mut graph = FlowGraph::new();
        let root = graph.root_region();
        let nodes: Vec<_> = (0..16).map(|i| graph.add_node(root, i)).collect();
        for pair in nodes.windows(2) {
            graph.set_fallthrough(pair[0], pair[1]);
        }
        graph.add_conditional(nodes[0], nodes[8]);
        graph.add_conditional(nodes[3], nodes[12]);
        graph.add_conditional(nodes[15], nodes[4]);

        let first = sort_nodes(&graph).unwrap();
        let second = sort_nodes(&graph).unwrap();
        assert_eq!(first, second);
    }
}
