//! Language Support - tree-sitter Go configuration
//!
//! All parser setup lives here so the resolver and the extractors parse files
//! the same way.

use crate::error::{ModelError, Result};
use std::path::Path;
use tree_sitter::{Parser, Tree};

/// Get the tree-sitter Go grammar
pub fn go_language() -> tree_sitter::Language {
    tree_sitter_go::LANGUAGE.into()
}

/// Parse Go source into a syntax tree
///
/// tree-sitter recovers from malformed input by inserting ERROR and MISSING
/// nodes. A tree that needed recovery is rejected: downstream generation
/// assumes every reachable file is well formed.
pub fn parse_go(content: &str, file_path: &Path) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&go_language())
        .map_err(|e| ModelError::parse(file_path, format!("failed to load Go grammar: {e}")))?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| ModelError::parse(file_path, "parser produced no tree"))?;

    if tree.root_node().has_error() {
        let line = first_error_line(&tree).unwrap_or(0);
        return Err(ModelError::parse(
            file_path,
            format!("syntax error near line {line}"),
        ));
    }

    Ok(tree)
}

/// Whether a path names a Go source file that takes part in extraction
///
/// Test files (`_test.go`) are excluded: they may declare a separate
/// `_test` package and never contribute schema types.
pub fn is_go_source(path: &Path) -> bool {
    let is_go = path.extension().and_then(|e| e.to_str()) == Some("go");
    let is_test = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with("_test.go"));
    is_go && !is_test
}

fn first_error_line(tree: &Tree) -> Option<usize> {
    let mut cursor = tree.walk();
    let mut stack = vec![tree.root_node()];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node.start_position().row + 1);
        }
        if node.has_error() {
            stack.extend(node.children(&mut cursor));
        }
    }
    None
}
