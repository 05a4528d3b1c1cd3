// BaseExtractor
//
// Per-file state shared by the Go extraction passes: where the file lives,
// its source text, and node helpers over that text.

use crate::error::ModelError;
use crate::utils::paths::PathModel;
use tree_sitter::Node;

/// Source text and location of the file being extracted
pub struct BaseExtractor {
    pub path: PathModel,
    pub content: String,
}

impl BaseExtractor {
    pub fn new(path: PathModel, content: String) -> Self {
        Self { path, content }
    }

    /// Get text from a tree-sitter node
    pub fn get_node_text(&self, node: &Node) -> String {
        let start_byte = node.start_byte();
        let end_byte = node.end_byte();

        // Use byte slice but handle UTF-8 boundaries properly
        let content_bytes = self.content.as_bytes();
        if start_byte < content_bytes.len() && end_byte <= content_bytes.len() {
            String::from_utf8_lossy(&content_bytes[start_byte..end_byte]).to_string()
        } else {
            String::new()
        }
    }

    /// Text of a named field child, if present
    pub fn field_text(&self, node: &Node, field_name: &str) -> Option<String> {
        node.child_by_field_name(field_name)
            .map(|child| self.get_node_text(&child))
    }

    /// 1-based line of a node, for diagnostics
    pub fn line_of(&self, node: &Node) -> usize {
        node.start_position().row + 1
    }

    /// Fatal error for a shape the model cannot represent
    pub fn unsupported(&self, node: &Node, reason: impl std::fmt::Display) -> ModelError {
        ModelError::unsupported(
            &self.path.absolute_file_path,
            format!("{} (line {})", reason, self.line_of(node)),
        )
    }
}
