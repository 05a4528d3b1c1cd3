use tree_sitter::Node;

/// Named children of a node, comments excluded
pub(super) fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    let children: Vec<Node> = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect();
    children
}

pub(super) fn first_named_child(node: Node) -> Option<Node> {
    named_children(node).into_iter().next()
}

/// Lower-case Go token kind of a basic literal (`int`, `float`, `string`, ...)
pub(super) fn literal_kind(kind: &str) -> Option<&'static str> {
    match kind {
        "int_literal" => Some("int"),
        "float_literal" => Some("float"),
        "imaginary_literal" => Some("imag"),
        "rune_literal" => Some("char"),
        "interpreted_string_literal" | "raw_string_literal" => Some("string"),
        _ => None,
    }
}

/// Helper methods for node text
impl super::GoExtractor {
    pub(super) fn get_node_text(&self, node: Node) -> String {
        self.base.get_node_text(&node)
    }

    /// The identity-sequence marker. Older grammars parse it as a plain identifier.
    pub(super) fn is_iota(&self, node: Node) -> bool {
        node.kind() == "iota" || (node.kind() == "identifier" && self.get_node_text(node) == "iota")
    }

    /// String literal contents without the surrounding quotes
    pub(super) fn string_literal_value(&self, node: Node) -> String {
        let text = self.get_node_text(node);
        text.trim_matches(|c| c == '"' || c == '`').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_kind() {
        assert_eq!(literal_kind("int_literal"), Some("int"));
        assert_eq!(literal_kind("raw_string_literal"), Some("string"));
        assert_eq!(literal_kind("rune_literal"), Some("char"));
        assert_eq!(literal_kind("identifier"), None);
    }
}
