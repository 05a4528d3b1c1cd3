use super::helpers::{literal_kind, named_children};
use crate::error::{ModelError, Result};
use crate::extractors::base::{EnumEntry, DEFAULT_ENUM_GROUP, DEFAULT_ENUM_UNDERLYING};
use tracing::debug;
use tree_sitter::{Node, Tree};

/// One `import` line of a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Written alias, including `.` and `_`
    pub alias: Option<String>,
    /// Import path without quotes
    pub path: String,
}

impl ImportSpec {
    /// Last path segment, the name Go binds an unaliased import to
    pub fn default_alias(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Import and constant specifications
impl super::GoExtractor {
    /// Every import of the file, in source order
    pub fn extract_imports(&self, tree: &Tree) -> Result<Vec<ImportSpec>> {
        let mut imports = Vec::new();

        for declaration in named_children(tree.root_node()) {
            if declaration.kind() != "import_declaration" {
                continue;
            }
            for child in named_children(declaration) {
                match child.kind() {
                    "import_spec" => imports.push(self.import_spec(child)?),
                    "import_spec_list" => {
                        for spec in named_children(child) {
                            if spec.kind() != "import_spec" {
                                return Err(self.not_an_import());
                            }
                            imports.push(self.import_spec(spec)?);
                        }
                    }
                    _ => return Err(self.not_an_import()),
                }
            }
        }

        Ok(imports)
    }

    fn import_spec(&self, node: Node) -> Result<ImportSpec> {
        let path = node
            .child_by_field_name("path")
            .map(|path| self.string_literal_value(path))
            .ok_or_else(|| self.not_an_import())?;
        let alias = self.base.field_text(&node, "name");
        Ok(ImportSpec { alias, path })
    }

    fn not_an_import(&self) -> ModelError {
        ModelError::NotAnImport {
            path: self.base.path.absolute_file_path.clone(),
        }
    }

    /// Enum entries of one `const` block
    ///
    /// A constant is an entry when it has no initializer, is initialized to
    /// `iota` or a basic literal, or to a single-argument conversion such as
    /// `Kind("a")`. Other initializers are left out of the model.
    pub(super) fn extract_const_block(&self, node: Node, block_id: u32) -> Result<Vec<EnumEntry>> {
        let specs: Vec<Node> = named_children(node)
            .into_iter()
            .flat_map(|child| match child.kind() {
                "const_spec_list" => named_children(child),
                _ => vec![child],
            })
            .filter(|child| child.kind() == "const_spec")
            .collect();

        let mut entries = Vec::new();
        let mut ordinal = 0;
        let mut group_name: Option<String> = None;
        let mut underlying_type = DEFAULT_ENUM_UNDERLYING.to_string();

        for spec in specs {
            let mut cursor = spec.walk();
            let names: Vec<String> = spec
                .children_by_field_name("name", &mut cursor)
                .map(|name| self.get_node_text(name))
                .collect();
            let explicit_type = spec
                .child_by_field_name("type")
                .filter(|t| t.kind() == "type_identifier")
                .map(|t| self.get_node_text(t));

            let values = spec
                .child_by_field_name("value")
                .map(named_children)
                .unwrap_or_default();

            if values.is_empty() {
                // Repeats the previous expression; type and group carry over
                if explicit_type.is_some() {
                    group_name = explicit_type;
                }
                for name in names {
                    entries.push(self.enum_entry(
                        name,
                        group_name.as_deref(),
                        block_id,
                        ordinal,
                        &underlying_type,
                    ));
                    ordinal += 1;
                }
                continue;
            }

            if values.len() != 1 {
                return Err(self
                    .base
                    .unsupported(&spec, "enum block values should be 1"));
            }
            let Some(name) = names.into_iter().next() else {
                continue;
            };

            let Some((call_group, literal)) = self.classify_initializer(values[0]) else {
                debug!(
                    "Skipping constant {} in {}",
                    name, self.base.path.source_file_path
                );
                continue;
            };

            if let Some(group) = explicit_type.or(call_group) {
                group_name = Some(group);
            }
            underlying_type = literal.unwrap_or(DEFAULT_ENUM_UNDERLYING).to_string();

            entries.push(self.enum_entry(
                name,
                group_name.as_deref(),
                block_id,
                ordinal,
                &underlying_type,
            ));
            ordinal += 1;
        }

        Ok(entries)
    }

    /// `Some((conversion type, literal kind))` for initializers that make an enum entry
    fn classify_initializer(&self, value: Node) -> Option<(Option<String>, Option<&'static str>)> {
        if self.is_iota(value) {
            return Some((None, None));
        }
        if let Some(kind) = literal_kind(value.kind()) {
            return Some((None, Some(kind)));
        }
        if value.kind() != "call_expression" {
            return None;
        }

        let function = value.child_by_field_name("function")?;
        if function.kind() != "identifier" {
            return None;
        }
        let function_name = self.get_node_text(function);
        if function_name == "make" {
            return None;
        }
        let arguments = value
            .child_by_field_name("arguments")
            .map(named_children)
            .unwrap_or_default();
        if arguments.len() != 1 {
            return None;
        }

        Some((Some(function_name), literal_kind(arguments[0].kind())))
    }

    fn enum_entry(
        &self,
        declared_name: String,
        group_name: Option<&str>,
        block_id: u32,
        ordinal: u32,
        underlying_type: &str,
    ) -> EnumEntry {
        EnumEntry {
            package_name: self.package_name.clone(),
            path: self.base.path.clone(),
            declared_name,
            group_name: group_name.unwrap_or(DEFAULT_ENUM_GROUP).to_string(),
            block_id,
            ordinal,
            underlying_type: underlying_type.to_string(),
        }
    }
}
