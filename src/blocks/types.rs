//! Output block-tree definitions.
//!
//! Tagged variants instead of an inheritance hierarchy: a block is a
//! basic block (leaf payload), a scope block (ordered children), or a
//! try block (protected scope plus ordered handler scopes). The tree is
//! built append-only and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// One block in the reconstructed tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Block<T> {
    /// Leaf holding a node's payload.
    Basic(T),
    /// Ordered list of child blocks.
    Scope(ScopeBlock<T>),
    /// Protected scope plus ordered handler scopes.
    Try(TryBlock<T>),
}

/// Ordered container of child blocks.
///
/// The root of a reconstructed tree is always a scope block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeBlock<T> {
    /// Child blocks in emission order.
    pub blocks: Vec<Block<T>>,
}

impl<T> ScopeBlock<T> {
    /// Create an empty scope block.
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Append a child block.
    pub fn push(&mut self, block: Block<T>) {
        self.blocks.push(block);
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether this scope has no children.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Payloads of all basic blocks in this subtree, in order.
    ///
    /// For a tree returned by [`build_blocks`](crate::blocks::build_blocks)
    /// this sequence equals the sorter's node ordering.
    pub fn basic_blocks(&self) -> Vec<&T> {
        let mut out = Vec::new();
        collect_basic(self, &mut out);
        out
    }
}

impl<T> Default for ScopeBlock<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reconstructed try/catch construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TryBlock<T> {
    /// The protected scope.
    pub protected: ScopeBlock<T>,
    /// Handler scopes, in the order their regions were entered.
    pub handlers: Vec<ScopeBlock<T>>,
}

impl<T> TryBlock<T> {
    /// Create a try block with an empty protected scope and no handlers.
    pub fn new() -> Self {
        Self {
            protected: ScopeBlock::new(),
            handlers: Vec::new(),
        }
    }

    /// Append a handler scope.
    pub fn push_handler(&mut self, handler: ScopeBlock<T>) {
        self.handlers.push(handler);
    }
}

impl<T> Default for TryBlock<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_basic<'a, T>(scope: &'a ScopeBlock<T>, out: &mut Vec<&'a T>) {
    for block in &scope.blocks {
        match block {
            Block::Basic(payload) => out.push(payload),
            Block::Scope(inner) => collect_basic(inner, out),
            Block::Try(try_block) => {
                collect_basic(&try_block.protected, out);
                for handler in &try_block.handlers {
                    collect_basic(handler, out);
                }
            }
        }
    }
}
