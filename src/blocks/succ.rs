//! Successor enumeration: the traversal fan-out of a node.
//!
//! Priority order: the fall-through successor, conditional targets in
//! declaration order, abnormal targets in declaration order, then the
//! handler entries of every try region whose protected region encloses
//! the node, walking the region chain outward (innermost try first).
//!
//! The handler entries make every node of a protected region a
//! predecessor of every handler entry, so the sorter cannot place a
//! handler body before its protected code. The fixed priority is what
//! the sorter's tie-breaking rests on; fall-through runs stay
//! contiguous because fall-through comes first.

use fixedbitset::FixedBitSet;
use tracing::trace;

use crate::graph::{FlowGraph, NodeId, RegionKind};

/// Ordered, duplicate-free successors of `node`.
///
/// Duplicates are filtered with a visited set scoped to this call; a
/// target is emitted at its highest-priority position only.
pub fn ordered_successors<T>(graph: &FlowGraph<T>, node: NodeId) -> Vec<NodeId> {
    let mut seen = FixedBitSet::with_capacity(graph.node_count());
    let mut out = Vec::new();
    let n = graph.node(node);

    if let Some(target) = n.fallthrough {
        push_unique(target, &mut seen, &mut out);
    }
    for &target in &n.conditional {
        push_unique(target, &mut seen, &mut out);
    }
    for &target in &n.abnormal {
        push_unique(target, &mut seen, &mut out);
    }

    // Handler entries of enclosing try regions, innermost first: each
    // region on the chain that is the protected sub-region of its
    // parent contributes that parent's handler entries.
    let mut current = Some(n.region);
    while let Some(region) = current {
        let parent = graph.region(region).parent;
        if let Some(parent_id) = parent {
            if let RegionKind::Try { protected, handlers } = &graph.region(parent_id).kind {
                if *protected == region {
                    for &handler in handlers {
                        match graph.region(handler).entry {
                            Some(entry) => push_unique(entry, &mut seen, &mut out),
                            None => {
                                trace!("handler region {:?} has no entry node; skipped", handler);
                            }
                        }
                    }
                }
            }
        }
        current = parent;
    }

    out
}

fn push_unique(id: NodeId, seen: &mut FixedBitSet, out: &mut Vec<NodeId>) {
    if !seen.contains(id.0) {
        seen.insert(id.0);
        out.push(id);
    }
}
