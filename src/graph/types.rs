//! Input-graph definitions: nodes, successor lists, and the graph arena.
//!
//! [`FlowGraph`] is a passive provider: the reconstruction pass in
//! [`crate::blocks`] only reads it. Nodes and regions live in arenas
//! indexed by [`NodeId`] / [`RegionId`], which keeps every traversal
//! index-stable and free of hash-iteration order.

use serde::{Deserialize, Serialize};

use crate::error::{BlockflowError, Result};
use crate::graph::region::{Region, RegionId, RegionKind};

/// Unique identifier for a CFG node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// A CFG node: an opaque payload plus its region and successor lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowNode<T> {
    /// Opaque basic-block payload.
    pub contents: T,
    /// Innermost region this node belongs to.
    pub region: RegionId,
    /// Implicit next node when control does not branch.
    pub fallthrough: Option<NodeId>,
    /// Conditional-branch targets in declaration order.
    pub conditional: Vec<NodeId>,
    /// Non-local transfer targets (throw, branch-out) in declaration order.
    pub abnormal: Vec<NodeId>,
}

/// A control-flow graph annotated with a region tree.
///
/// Construction is append-only: regions first, then nodes, then edges.
/// Identifiers handed out by one graph are not meaningful in another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowGraph<T> {
    nodes: Vec<FlowNode<T>>,
    regions: Vec<Region>,
    root: RegionId,
    entry: Option<NodeId>,
}

impl<T> FlowGraph<T> {
    /// Create an empty graph with a fresh root region.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            regions: vec![Region::new(None, RegionKind::Scope)],
            root: RegionId(0),
            entry: None,
        }
    }

    /// The root region of the region tree.
    pub fn root_region(&self) -> RegionId {
        self.root
    }

    /// The designated entry node, if any.
    ///
    /// The first node added to the graph becomes the entry;
    /// [`set_entry`](Self::set_entry) overrides it.
    pub fn entry(&self) -> Option<NodeId> {
        self.entry
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of regions in the region tree.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> &FlowNode<T> {
        &self.nodes[id.0]
    }

    /// Borrow a node, or `None` if the id is out of range.
    pub fn get_node(&self, id: NodeId) -> Option<&FlowNode<T>> {
        self.nodes.get(id.0)
    }

    /// Borrow a region.
    pub fn region(&self, id: RegionId) -> &Region {
        &self.regions[id.0]
    }

    /// Iterate over all nodes with their ids, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &FlowNode<T>)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Add a plain scope region under `parent`.
    pub fn add_region(&mut self, parent: RegionId) -> RegionId {
        let id = RegionId(self.regions.len());
        self.regions.push(Region::new(Some(parent), RegionKind::Scope));
        id
    }

    /// Add a try region under `parent`, creating its protected
    /// sub-region along with it.
    ///
    /// Returns `(try_region, protected_region)`.
    pub fn add_try_region(&mut self, parent: RegionId) -> (RegionId, RegionId) {
        let try_id = RegionId(self.regions.len());
        let protected = RegionId(try_id.0 + 1);
        self.regions.push(Region::new(
            Some(parent),
            RegionKind::Try {
                protected,
                handlers: Vec::new(),
            },
        ));
        self.regions.push(Region::new(Some(try_id), RegionKind::Scope));
        (try_id, protected)
    }

    /// Add a handler sub-region to `try_region`, in declaration order.
    ///
    /// # Errors
    /// Returns [`BlockflowError::NotATryRegion`] if `try_region` is a
    /// plain scope.
    pub fn add_handler_region(&mut self, try_region: RegionId) -> Result<RegionId> {
        let id = RegionId(self.regions.len());
        match &mut self.regions[try_region.0].kind {
            RegionKind::Try { handlers, .. } => handlers.push(id),
            RegionKind::Scope => return Err(BlockflowError::NotATryRegion(try_region)),
        }
        self.regions.push(Region::new(Some(try_region), RegionKind::Scope));
        Ok(id)
    }

    /// Add a node carrying `contents` to `region`.
    ///
    /// The first node added to a region becomes that region's entry
    /// point, and the first node added to the graph becomes the graph
    /// entry.
    pub fn add_node(&mut self, region: RegionId, contents: T) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(FlowNode {
            contents,
            region,
            fallthrough: None,
            conditional: Vec::new(),
            abnormal: Vec::new(),
        });
        let reg = &mut self.regions[region.0];
        if reg.entry.is_none() {
            reg.entry = Some(id);
        }
        if self.entry.is_none() {
            self.entry = Some(id);
        }
        id
    }

    /// Designate the graph entry node.
    pub fn set_entry(&mut self, node: NodeId) {
        self.entry = Some(node);
    }

    /// Override a region's entry-point node.
    pub fn set_region_entry(&mut self, region: RegionId, node: NodeId) {
        self.regions[region.0].entry = Some(node);
    }

    /// Set the fall-through successor of `from`.
    pub fn set_fallthrough(&mut self, from: NodeId, to: NodeId) {
        self.nodes[from.0].fallthrough = Some(to);
    }

    /// Append a conditional-branch target to `from`.
    pub fn add_conditional(&mut self, from: NodeId, to: NodeId) {
        self.nodes[from.0].conditional.push(to);
    }

    /// Append an abnormal (throw/branch-out) target to `from`.
    pub fn add_abnormal(&mut self, from: NodeId, to: NodeId) {
        self.nodes[from.0].abnormal.push(to);
    }

    /// Region chain of `region`: outermost (root) first, `region` last.
    pub fn region_chain(&self, region: RegionId) -> Vec<RegionId> {
        let mut chain = Vec::new();
        let mut current = Some(region);
        while let Some(r) = current {
            chain.push(r);
            current = self.regions[r.0].parent;
        }
        chain.reverse();
        chain
    }

    /// Whether `node` lies within `region`, directly or transitively.
    pub fn region_contains(&self, region: RegionId, node: NodeId) -> bool {
        let mut current = Some(self.nodes[node.0].region);
        while let Some(r) = current {
            if r == region {
                return true;
            }
            current = self.regions[r.0].parent;
        }
        false
    }

    /// Validate structural invariants of the graph.
    ///
    /// Checks that an entry node is designated, that every successor
    /// reference resolves, that no node sits directly in a try region,
    /// that try-region children are correctly cross-linked, and that
    /// handler regions carry entry points.
    ///
    /// # Errors
    ///
    /// Returns the first violation found as a [`BlockflowError`].
    ///
    /// # Example
    ///
    /// ```
    /// use blockflow::graph::FlowGraph;
    ///
    /// let mut graph = FlowGraph::new();
    /// let root = graph.root_region();
    /// let a = graph.add_node(root, "a");
    /// let b = graph.add_node(root, "b");
    /// graph.set_fallthrough(a, b);
    ///
    /// assert!(graph.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<()> {
        let entry = self.entry.ok_or(BlockflowError::MissingEntry)?;
        if entry.0 >= self.nodes.len() {
            return Err(BlockflowError::InvalidEntry(entry));
        }

        for (id, node) in self.nodes() {
            let targets = node
                .fallthrough
                .iter()
                .chain(node.conditional.iter())
                .chain(node.abnormal.iter());
            for &to in targets {
                if to.0 >= self.nodes.len() {
                    return Err(BlockflowError::InvalidSuccessor { from: id, to });
                }
            }
            if self.regions[node.region.0].is_try() {
                return Err(BlockflowError::NodeInTryRegion {
                    node: id,
                    region: node.region,
                });
            }
        }

        for (idx, region) in self.regions.iter().enumerate() {
            let id = RegionId(idx);
            if let RegionKind::Try { protected, handlers } = &region.kind {
                if self.regions[protected.0].parent != Some(id) {
                    return Err(BlockflowError::UnlistedTryChild {
                        child: *protected,
                        parent: id,
                    });
                }
                for &handler in handlers {
                    if self.regions[handler.0].parent != Some(id) {
                        return Err(BlockflowError::UnlistedTryChild {
                            child: handler,
                            parent: id,
                        });
                    }
                    if self.regions[handler.0].entry.is_none() {
                        return Err(BlockflowError::HandlerWithoutEntry(handler));
                    }
                }
            }
            if let Some(parent) = region.parent {
                if let RegionKind::Try { protected, handlers } = &self.regions[parent.0].kind {
                    if *protected != id && !handlers.contains(&id) {
                        return Err(BlockflowError::UnlistedTryChild { child: id, parent });
                    }
                }
            }
        }

        Ok(())
    }
}

impl<T> Default for FlowGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}
