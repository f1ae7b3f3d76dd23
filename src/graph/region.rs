//! Region model: the lexical-scope annotations carried by CFG nodes.
//!
//! Regions form a tree rooted at the graph's root region. A plain
//! region is an anonymous scope; a try region carries exactly one
//! protected sub-region and an ordered list of handler sub-regions,
//! and those sub-regions are its only children in the region tree.

use serde::{Deserialize, Serialize};

use crate::graph::types::NodeId;

/// Unique identifier for a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionId(pub usize);

/// Shape of a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    /// Anonymous lexical scope.
    Scope,
    /// Try/catch construct: one protected sub-region plus ordered
    /// handler sub-regions.
    Try {
        /// The protected sub-region.
        protected: RegionId,
        /// Handler sub-regions in declaration order.
        handlers: Vec<RegionId>,
    },
}

/// A node in the region tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Parent region; `None` only for the root region.
    pub parent: Option<RegionId>,
    /// Entry-point node. Set when the first node is added to the
    /// region; [`set_region_entry`](crate::graph::FlowGraph::set_region_entry)
    /// overrides it.
    pub entry: Option<NodeId>,
    /// Plain scope or try construct.
    pub kind: RegionKind,
}

impl Region {
    pub(crate) fn new(parent: Option<RegionId>, kind: RegionKind) -> Self {
        Self {
            parent,
            entry: None,
            kind,
        }
    }

    /// Whether this region is a try construct.
    pub fn is_try(&self) -> bool {
        matches!(self.kind, RegionKind::Try { .. })
    }
}
