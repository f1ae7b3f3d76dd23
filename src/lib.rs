//! Block-structure reconstruction for control-flow graphs.
//!
//! Given a control-flow graph whose nodes are annotated with the
//! lexical region they belong to (plain scopes and try/catch
//! constructs), this crate rebuilds the program's nested block
//! structure: a deterministic forward ordering of the nodes is replayed
//! against a scope stack that opens and closes regions, yielding a tree
//! of scope blocks, try blocks, and basic blocks suitable for emitting
//! structured output (pseudocode, serialized IL, decompiler trees).
//!
//! The crate does not build CFGs from source or bytecode and does not
//! infer regions; [`graph::FlowGraph`] is the read-only input model the
//! reconstruction consumes.
//!
//! # Modules
//!
//! - [`graph`]: the input model, a region-annotated CFG arena
//! - [`blocks`]: the reconstruction pass and the output block tree
//! - [`error`]: the crate error type

pub mod blocks;
pub mod error;
pub mod graph;

pub use blocks::{build_blocks, Block, ScopeBlock, TryBlock};
pub use error::{BlockflowError, Result};
pub use graph::{FlowGraph, FlowNode, NodeId, Region, RegionId, RegionKind};
