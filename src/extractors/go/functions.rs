use crate::error::Result;
use crate::extractors::base::{Field, FunctionSignature};
use tree_sitter::Node;

/// Interface method extraction for Go
impl super::GoExtractor {
    /// One FunctionSignature per interface method
    ///
    /// Embedded interfaces and type constraints cannot become RPC methods,
    /// so any non-method member aborts extraction.
    pub(super) fn extract_interface(
        &self,
        interface_name: &str,
        node: Node,
        functions: &mut Vec<FunctionSignature>,
    ) -> Result<()> {
        for member in super::helpers::named_children(node) {
            match member.kind() {
                "method_elem" | "method_spec" => {
                    functions.push(self.extract_method_signature(member)?);
                }
                other => {
                    return Err(self.base.unsupported(
                        &member,
                        format!("unexpected non func `{other}` in interface {interface_name}"),
                    ));
                }
            }
        }
        Ok(())
    }

    fn extract_method_signature(&self, node: Node) -> Result<FunctionSignature> {
        let name = self
            .base
            .field_text(&node, "name")
            .ok_or_else(|| self.base.unsupported(&node, "interface method without a name"))?;

        let parameter_fields = match node.child_by_field_name("parameters") {
            Some(list) => self.fields_from_parameter_list(list)?,
            None => Vec::new(),
        };

        // `F() error` has a bare type result, `F() (a, b T)` a parameter list
        let return_fields = match node.child_by_field_name("result") {
            Some(result) if result.kind() == "parameter_list" => {
                self.fields_from_parameter_list(result)?
            }
            Some(result) => {
                let expr = self.type_expr(result);
                self.build_fields(Vec::new(), &expr, result)?
            }
            None => Vec::new(),
        };

        Ok(FunctionSignature {
            name,
            parameter_fields,
            return_fields,
        })
    }

    /// Fields of a `parameter_list`; `a, b int` yields two fields
    pub(super) fn fields_from_parameter_list(&self, node: Node) -> Result<Vec<Field>> {
        let mut fields = Vec::new();

        for declaration in super::helpers::named_children(node) {
            let Some(type_node) = declaration.child_by_field_name("type") else {
                continue;
            };
            let mut cursor = declaration.walk();
            let names: Vec<String> = declaration
                .children_by_field_name("name", &mut cursor)
                .map(|name| self.get_node_text(name))
                .collect();

            let expr = match declaration.kind() {
                "parameter_declaration" => self.type_expr(type_node),
                // `xs ...T` arrives as a slice of T
                "variadic_parameter_declaration" => {
                    super::TypeExpr::Array(Box::new(self.type_expr(type_node)))
                }
                _ => continue,
            };

            fields.extend(self.build_fields(names, &expr, declaration)?);
        }

        Ok(fields)
    }
}
