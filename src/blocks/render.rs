//! Rendering of reconstructed block trees.
//!
//! Text output is an indented outline, one line per block; JSON output
//! serializes the tree via serde.

use std::fmt::Display;

use serde::Serialize;

use crate::blocks::types::{Block, ScopeBlock};

/// Render a block tree as an indented text outline.
///
/// Each basic block prints its payload on one line; nested scopes print
/// a `scope` header, try constructs print `try` and `catch` headers.
pub fn to_text<T: Display>(root: &ScopeBlock<T>) -> String {
    let mut out = String::new();
    render_scope(root, 0, &mut out);
    out
}

/// Serialize a block tree to pretty-printed JSON.
pub fn to_json<T: Serialize>(root: &ScopeBlock<T>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(root)
}

/// Serialize a block tree to compact JSON.
pub fn to_json_compact<T: Serialize>(root: &ScopeBlock<T>) -> Result<String, serde_json::Error> {
    serde_json::to_string(root)
}

fn render_scope<T: Display>(scope: &ScopeBlock<T>, depth: usize, out: &mut String) {
    for block in &scope.blocks {
        match block {
            Block::Basic(payload) => {
                indent(out, depth);
                out.push_str(&payload.to_string());
                out.push('\n');
            }
            Block::Scope(inner) => {
                indent(out, depth);
                out.push_str("scope\n");
                render_scope(inner, depth + 1, out);
            }
            Block::Try(try_block) => {
                indent(out, depth);
                out.push_str("try\n");
                render_scope(&try_block.protected, depth + 1, out);
                for handler in &try_block.handlers {
                    indent(out, depth);
                    out.push_str("catch\n");
                    render_scope(handler, depth + 1, out);
                }
            }
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}
