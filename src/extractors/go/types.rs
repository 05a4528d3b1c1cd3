use super::helpers::named_children;
use super::TypeExpr;
use crate::error::Result;
use crate::extractors::base::{ParseResult, RecordType, ScalarAlias};
use tracing::{debug, warn};
use tree_sitter::Node;

/// Name of the single field synthesized for `type Xs []X`
const ARRAY_ALIAS_FIELD: &str = "Elements";

/// Type declaration extraction for Go (interfaces, structs, aliases)
impl super::GoExtractor {
    pub(super) fn extract_type_declaration(
        &self,
        node: Node,
        result: &mut ParseResult,
    ) -> Result<()> {
        for spec in named_children(node) {
            match spec.kind() {
                // `type A = B` is modelled like `type A B`
                "type_spec" | "type_alias" => self.extract_type_spec(spec, result)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn extract_type_spec(&self, node: Node, result: &mut ParseResult) -> Result<()> {
        let Some(name) = self.base.field_text(&node, "name") else {
            return Ok(());
        };
        let Some(type_node) = node.child_by_field_name("type") else {
            return Ok(());
        };

        if node.child_by_field_name("type_parameters").is_some() {
            warn!(
                "Ignoring generic type {} in {}",
                name, self.base.path.source_file_path
            );
            return Ok(());
        }

        match type_node.kind() {
            "interface_type" => {
                self.extract_interface(&name, type_node, &mut result.functions)?;
            }
            "struct_type" => {
                let fields = self.fields_from_struct(type_node)?;
                debug!("Record {}.{} with {} fields", self.package_name, name, fields.len());
                result.records.push(RecordType {
                    path: self.base.path.clone(),
                    package_name: self.package_name.clone(),
                    name,
                    fields,
                });
            }
            "type_identifier" => {
                result.scalar_aliases.push(ScalarAlias {
                    path: self.base.path.clone(),
                    package_name: self.package_name.clone(),
                    name,
                    underlying_base_type: self.get_node_text(type_node),
                });
            }
            "slice_type" | "array_type" => {
                let element = type_node
                    .child_by_field_name("element")
                    .map(|element| self.type_expr(element));
                match element {
                    Some(expr @ TypeExpr::Named(_)) => {
                        let fields = self.build_fields(
                            vec![ARRAY_ALIAS_FIELD.to_string()],
                            &TypeExpr::Array(Box::new(expr)),
                            type_node,
                        )?;
                        result.records.push(RecordType {
                            path: self.base.path.clone(),
                            package_name: self.package_name.clone(),
                            name,
                            fields,
                        });
                    }
                    other => {
                        let shape = other.map(|e| e.to_string()).unwrap_or_default();
                        return Err(self
                            .base
                            .unsupported(&type_node, format!("array type {name} of []{shape}")));
                    }
                }
            }
            other => {
                warn!(
                    "Ignoring type {} ({}) in {}",
                    name, other, self.base.path.source_file_path
                );
            }
        }

        Ok(())
    }
}
