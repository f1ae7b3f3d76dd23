//! Scope-stack reconstruction of the block tree.
//!
//! Consumes the sorted node stream and maintains a stack of frames
//! mirroring the currently-open region nesting. Frames own the blocks
//! they are filling; a finished block attaches to the frame below when
//! its frame is popped, which preserves append order. Reconciling the
//! stack against each node's region chain leaves and enters any number
//! of regions in one step.
//!
//! Try constructs get special frames: entering a try region opens a
//! fresh [`TryBlock`] whose protected scope already exists. Entering
//! the protected sub-region takes that scope's children into the new
//! frame and restores them on pop, so a re-entered protected region
//! accumulates into the same scope. Each handler sub-region fills a
//! fresh scope appended to the handler list when it closes. The frame
//! records the sub-region that was actually entered, so reconciliation
//! between sibling handlers finds the correct common depth.

use std::mem;

use tracing::{debug, trace};

use crate::blocks::order::sort_nodes;
use crate::blocks::types::{Block, ScopeBlock, TryBlock};
use crate::error::{BlockflowError, Result};
use crate::graph::{FlowGraph, NodeId, RegionId, RegionKind};

/// Build the block tree for `graph`.
///
/// The returned root scope holds one basic block per reachable node, in
/// [`sort_nodes`] order, nested to mirror each node's region chain;
/// try regions appear as [`Block::Try`]. Payloads are cloned out of the
/// graph; the tree owns its data.
///
/// # Errors
///
/// - [`BlockflowError::MissingEntry`] if the graph has no entry node.
/// - [`BlockflowError::NodeInTryRegion`] if a reachable node sits
///   directly in a try region.
/// - [`BlockflowError::TryInTryRegion`] if a try region is a direct
///   child of another try region.
/// - [`BlockflowError::UnlistedTryChild`] if a region's parent is a try
///   region that does not list it as protected or handler.
///
/// No partial tree is produced on error.
pub fn build_blocks<T: Clone>(graph: &FlowGraph<T>) -> Result<ScopeBlock<T>> {
    let order = sort_nodes(graph)?;
    BlockTreeBuilder::new(graph).build(&order)
}

/// One open region on the reconstruction stack.
struct Frame<T> {
    /// The region this frame was entered for.
    region: RegionId,
    kind: FrameKind<T>,
}

/// What the frame is filling.
enum FrameKind<T> {
    /// An ordinary scope: child blocks accumulate here.
    Scope(Vec<Block<T>>),
    /// A try construct: children attach only through its protected or
    /// handler sub-regions, never directly.
    Try(TryBlock<T>),
}

struct BlockTreeBuilder<'g, T> {
    graph: &'g FlowGraph<T>,
    stack: Vec<Frame<T>>,
}

impl<'g, T: Clone> BlockTreeBuilder<'g, T> {
    fn new(graph: &'g FlowGraph<T>) -> Self {
        let root = Frame {
            region: graph.root_region(),
            kind: FrameKind::Scope(Vec::new()),
        };
        Self {
            graph,
            stack: vec![root],
        }
    }

    fn build(mut self, order: &[NodeId]) -> Result<ScopeBlock<T>> {
        for &id in order {
            let node = self.graph.node(id);
            if self.top().region != node.region {
                self.reconcile(node.region)?;
            }
            self.append_basic(id, node.contents.clone())?;
        }

        // Close every region still open down to the root.
        while self.stack.len() > 1 {
            self.pop();
        }

        match self.stack.pop() {
            Some(Frame {
                kind: FrameKind::Scope(blocks),
                ..
            }) => {
                debug!("reconstructed tree with {} top-level blocks", blocks.len());
                Ok(ScopeBlock { blocks })
            }
            _ => unreachable!("the root frame is always a scope frame"),
        }
    }

    /// Match the stack to the region chain of the next node: pop to the
    /// common prefix, then enter the remaining chain suffix.
    fn reconcile(&mut self, region: RegionId) -> Result<()> {
        let chain = self.graph.region_chain(region);
        debug_assert_eq!(chain[0], self.stack[0].region);

        // Both sides agree on the root, so the prefix is at least 1.
        let mut common = 1;
        while common < self.stack.len()
            && common < chain.len()
            && self.stack[common].region == chain[common]
        {
            common += 1;
        }

        while self.stack.len() > common {
            self.pop();
        }
        for &next in &chain[common..] {
            self.enter(next)?;
        }
        Ok(())
    }

    /// Open a frame for `region` on top of the stack.
    fn enter(&mut self, region: RegionId) -> Result<()> {
        trace!("entering region {:?}", region);
        let reg = self.graph.region(region);

        // A try region opens a fresh try block. Its parent frame must
        // be able to receive a child block, so another try frame on top
        // is malformed input.
        if reg.is_try() {
            let top = self.top();
            if matches!(top.kind, FrameKind::Try(_)) {
                return Err(BlockflowError::TryInTryRegion {
                    child: region,
                    parent: top.region,
                });
            }
            self.stack.push(Frame {
                region,
                kind: FrameKind::Try(TryBlock::new()),
            });
            return Ok(());
        }

        // Sub-regions of a try construct attach to its block: the
        // protected scope is reused, each handler gets a fresh scope.
        if let Some(parent) = reg.parent {
            if let RegionKind::Try { protected, handlers } = &self.graph.region(parent).kind {
                let frame = match self.stack.last_mut() {
                    Some(frame) => frame,
                    None => unreachable!("frame stack never empties"),
                };
                debug_assert_eq!(frame.region, parent);
                let try_block = match &mut frame.kind {
                    FrameKind::Try(try_block) => try_block,
                    FrameKind::Scope(_) => {
                        unreachable!("open try region {parent:?} has no try frame")
                    }
                };
                let kind = if *protected == region {
                    FrameKind::Scope(mem::take(&mut try_block.protected.blocks))
                } else if handlers.contains(&region) {
                    FrameKind::Scope(Vec::new())
                } else {
                    return Err(BlockflowError::UnlistedTryChild {
                        child: region,
                        parent,
                    });
                };
                self.stack.push(Frame { region, kind });
                return Ok(());
            }
        }

        // Ordinary nested scope.
        self.stack.push(Frame {
            region,
            kind: FrameKind::Scope(Vec::new()),
        });
        Ok(())
    }

    /// Close the top frame and attach its finished block to the frame
    /// below.
    fn pop(&mut self) {
        let frame = match self.stack.pop() {
            Some(frame) => frame,
            None => unreachable!("frame stack never empties"),
        };
        trace!("leaving region {:?}", frame.region);
        let parent = match self.stack.last_mut() {
            Some(parent) => parent,
            None => unreachable!("the root frame is never popped mid-build"),
        };
        let parent_region = parent.region;

        match frame.kind {
            FrameKind::Scope(blocks) => {
                let scope = ScopeBlock { blocks };
                match &mut parent.kind {
                    FrameKind::Scope(parent_blocks) => parent_blocks.push(Block::Scope(scope)),
                    FrameKind::Try(try_block) => {
                        match &self.graph.region(parent_region).kind {
                            RegionKind::Try { protected, .. } if *protected == frame.region => {
                                try_block.protected.blocks = scope.blocks;
                            }
                            RegionKind::Try { .. } => try_block.push_handler(scope),
                            RegionKind::Scope => unreachable!("try frame for a plain region"),
                        }
                    }
                }
            }
            FrameKind::Try(try_block) => match &mut parent.kind {
                FrameKind::Scope(parent_blocks) => parent_blocks.push(Block::Try(try_block)),
                // enter() refuses to open a try frame on top of another.
                FrameKind::Try(_) => unreachable!("try frame opened inside a try frame"),
            },
        }
    }

    /// Append a basic block to the top frame, which must be a scope.
    fn append_basic(&mut self, id: NodeId, contents: T) -> Result<()> {
        let frame = match self.stack.last_mut() {
            Some(frame) => frame,
            None => unreachable!("frame stack never empties"),
        };
        match &mut frame.kind {
            FrameKind::Scope(blocks) => {
                blocks.push(Block::Basic(contents));
                Ok(())
            }
            FrameKind::Try(_) => Err(BlockflowError::NodeInTryRegion {
                node: id,
                region: frame.region,
            }),
        }
    }

    fn top(&self) -> &Frame<T> {
        match self.stack.last() {
            Some(frame) => frame,
            None => unreachable!("frame stack never empties"),
        }
    }
}
