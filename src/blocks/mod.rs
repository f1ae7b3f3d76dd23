//! Block-structure reconstruction.
//!
//! Turns a region-annotated control-flow graph into a tree of scope,
//! try, and basic blocks:
//!
//! 1. [`ordered_successors`] defines the traversal fan-out of a node.
//! 2. [`sort_nodes`] produces a deterministic forward ordering of the
//!    reachable nodes, ignoring back edges.
//! 3. [`build_blocks`] replays that ordering against a scope stack and
//!    emits the tree.
//!
//! # Modules
//!
//! - [`types`]: the output block tree
//! - [`succ`]: successor enumeration
//! - [`order`]: deterministic node ordering
//! - [`builder`]: the scope-stack reconstructor
//! - [`render`]: text and JSON output
//!
//! # Example
//!
//! ```
//! # fn main() -> Result<(), blockflow::BlockflowError> {
//! use blockflow::blocks::build_blocks;
//! use blockflow::graph::FlowGraph;
//!
//! let mut graph = FlowGraph::new();
//! let root = graph.root_region();
//! let a = graph.add_node(root, "a");
//! let b = graph.add_node(root, "b");
//! graph.set_fallthrough(a, b);
//!
//! let tree = build_blocks(&graph)?;
//! assert_eq!(tree.basic_blocks(), vec![&"a", &"b"]);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod order;
pub mod render;
pub mod succ;
pub mod types;

pub use builder::build_blocks;
pub use order::sort_nodes;
pub use render::{to_json, to_json_compact, to_text};
pub use succ::ordered_successors;
pub use types::{Block, ScopeBlock, TryBlock};
