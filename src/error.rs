//! Error types for block-structure reconstruction.

use thiserror::Error;

use crate::graph::{NodeId, RegionId};

/// Result type alias for reconstruction operations.
pub type Result<T> = std::result::Result<T, BlockflowError>;

/// Top-level error type.
///
/// Variants describe structural violations in the input graph. The
/// reconstruction pass reports them at the point of detection and
/// produces no partial output; unreachable nodes are not an error and
/// are silently omitted instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockflowError {
    /// The graph has no designated entry node.
    #[error("graph has no entry node")]
    MissingEntry,

    /// The entry node does not exist in the node arena.
    #[error("entry node {0:?} does not exist")]
    InvalidEntry(NodeId),

    /// A successor reference points outside the node arena.
    #[error("edge from {from:?} references non-existent node {to:?}")]
    InvalidSuccessor { from: NodeId, to: NodeId },

    /// A node is placed directly inside a try region rather than in its
    /// protected or handler sub-regions.
    #[error("node {node:?} lies directly in try region {region:?}")]
    NodeInTryRegion { node: NodeId, region: RegionId },

    /// A try region is a direct child of another try region.
    #[error("try region {child:?} is a direct child of try region {parent:?}")]
    TryInTryRegion { child: RegionId, parent: RegionId },

    /// A region's parent is a try region, but the region is neither the
    /// protected sub-region nor in the handler list.
    #[error(
        "region {child:?} is not the protected region or a listed handler of try region {parent:?}"
    )]
    UnlistedTryChild { child: RegionId, parent: RegionId },

    /// A handler region has no entry node.
    #[error("handler region {0:?} has no entry node")]
    HandlerWithoutEntry(RegionId),

    /// A handler region was added to a region that is not a try region.
    #[error("region {0:?} is not a try region")]
    NotATryRegion(RegionId),
}
