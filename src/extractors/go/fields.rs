use crate::error::Result;
use crate::extractors::base::{Field, INTERFACE_TYPE, UNKNOWN_TYPE};
use std::fmt;
use tracing::warn;
use tree_sitter::Node;

/// A Go type expression, reduced to the shapes the classifier distinguishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// `int`, `A`
    Named(String),
    /// `pkg.A`
    Qualified { package: String, name: String },
    /// `[]T` and `[N]T`
    Array(Box<TypeExpr>),
    /// `*T`
    Pointer(Box<TypeExpr>),
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// `interface{...}`
    Interface,
    /// Anything else, by tree-sitter node kind (`function_type`, `channel_type`, ...)
    Other(String),
}

impl TypeExpr {
    /// Field name used when a declaration has no names (embedded fields,
    /// unnamed parameters and results)
    pub fn implicit_name(&self) -> String {
        match self {
            TypeExpr::Named(name) | TypeExpr::Qualified { name, .. } => name.clone(),
            TypeExpr::Array(inner) | TypeExpr::Pointer(inner) => inner.implicit_name(),
            TypeExpr::Interface => INTERFACE_TYPE.to_string(),
            TypeExpr::Map { .. } | TypeExpr::Other(_) => "unknown_name".to_string(),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named(name) => write!(f, "{name}"),
            TypeExpr::Qualified { package, name } => write!(f, "{package}.{name}"),
            TypeExpr::Array(inner) => write!(f, "[]{inner}"),
            TypeExpr::Pointer(inner) => write!(f, "*{inner}"),
            TypeExpr::Map { key, value } => write!(f, "map[{key}]{value}"),
            TypeExpr::Interface => write!(f, "interface{{}}"),
            TypeExpr::Other(kind) => write!(f, "<{kind}>"),
        }
    }
}

/// Field attributes derived from a type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldShape {
    pub base_type: String,
    pub repeated: bool,
    pub optional: bool,
    pub is_selector: bool,
}

impl FieldShape {
    fn new(base_type: impl Into<String>, repeated: bool, optional: bool, is_selector: bool) -> Self {
        Self {
            base_type: base_type.into(),
            repeated,
            optional,
            is_selector,
        }
    }
}

/// Outcome of classifying one type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Field(FieldShape),
    /// No parser for this shape; kept as an `unknown` field
    Unknown { optional: bool },
    /// Dropped from the model (pointer to map)
    Skipped,
}

/// Reduce a type expression to (base type, repeated, optional, selector)
///
/// `Err` carries the reason for shapes that must abort extraction.
pub fn classify(expr: &TypeExpr) -> std::result::Result<Shape, String> {
    let shape = match expr {
        TypeExpr::Named(name) => Shape::Field(FieldShape::new(name, false, false, false)),
        TypeExpr::Qualified { .. } => {
            Shape::Field(FieldShape::new(expr.to_string(), false, false, true))
        }
        TypeExpr::Interface => Shape::Field(FieldShape::new(INTERFACE_TYPE, false, false, false)),
        TypeExpr::Array(element) => match element.as_ref() {
            TypeExpr::Named(name) => Shape::Field(FieldShape::new(name, true, false, false)),
            TypeExpr::Qualified { .. } => {
                Shape::Field(FieldShape::new(element.to_string(), true, false, true))
            }
            TypeExpr::Pointer(pointee) => match pointee.as_ref() {
                TypeExpr::Named(name) => Shape::Field(FieldShape::new(name, true, true, false)),
                TypeExpr::Qualified { .. } => {
                    Shape::Field(FieldShape::new(pointee.to_string(), true, true, true))
                }
                // Degenerate: keep the map's element type as the base type
                TypeExpr::Map { value, .. } => {
                    Shape::Field(FieldShape::new(value.to_string(), true, true, false))
                }
                other => return Err(format!("array of pointer to {other}")),
            },
            other => return Err(format!("array of {other}")),
        },
        TypeExpr::Pointer(pointee) => match pointee.as_ref() {
            TypeExpr::Named(name) => Shape::Field(FieldShape::new(name, false, true, false)),
            TypeExpr::Qualified { .. } => {
                Shape::Field(FieldShape::new(pointee.to_string(), false, true, true))
            }
            TypeExpr::Map { .. } => Shape::Skipped,
            _ => Shape::Unknown { optional: true },
        },
        TypeExpr::Map { .. } | TypeExpr::Other(_) => Shape::Unknown { optional: false },
    };
    Ok(shape)
}

/// Field/type classification for struct fields and parameters
impl super::GoExtractor {
    /// Build a TypeExpr from a tree-sitter type node
    pub(super) fn type_expr(&self, node: Node) -> TypeExpr {
        match node.kind() {
            "type_identifier" => TypeExpr::Named(self.get_node_text(node)),
            "qualified_type" => {
                match (
                    self.base.field_text(&node, "package"),
                    self.base.field_text(&node, "name"),
                ) {
                    (Some(package), Some(name)) => TypeExpr::Qualified { package, name },
                    _ => TypeExpr::Other(node.kind().to_string()),
                }
            }
            "slice_type" | "array_type" => match node.child_by_field_name("element") {
                Some(element) => TypeExpr::Array(Box::new(self.type_expr(element))),
                None => TypeExpr::Other(node.kind().to_string()),
            },
            "pointer_type" => match super::helpers::first_named_child(node) {
                Some(pointee) => TypeExpr::Pointer(Box::new(self.type_expr(pointee))),
                None => TypeExpr::Other(node.kind().to_string()),
            },
            "map_type" => match (
                node.child_by_field_name("key"),
                node.child_by_field_name("value"),
            ) {
                (Some(key), Some(value)) => TypeExpr::Map {
                    key: Box::new(self.type_expr(key)),
                    value: Box::new(self.type_expr(value)),
                },
                _ => TypeExpr::Other(node.kind().to_string()),
            },
            "interface_type" => TypeExpr::Interface,
            "parenthesized_type" => match super::helpers::first_named_child(node) {
                Some(inner) => self.type_expr(inner),
                None => TypeExpr::Other(node.kind().to_string()),
            },
            other => TypeExpr::Other(other.to_string()),
        }
    }

    /// One Field per declared name, or one named after the type when unnamed
    pub(super) fn build_fields(
        &self,
        names: Vec<String>,
        expr: &TypeExpr,
        node: Node,
    ) -> Result<Vec<Field>> {
        let names = if names.is_empty() {
            vec![expr.implicit_name()]
        } else {
            names
        };

        let shape = match classify(expr) {
            Ok(Shape::Field(shape)) => shape,
            Ok(Shape::Unknown { optional }) => {
                warn!(
                    "Missing parser for {} field {} in {}:{}",
                    expr,
                    names.join(", "),
                    self.base.path.source_file_path,
                    self.base.line_of(&node)
                );
                FieldShape::new(UNKNOWN_TYPE, false, optional, false)
            }
            Ok(Shape::Skipped) => {
                warn!(
                    "Ignoring map field {} in {}:{}",
                    names.join(", "),
                    self.base.path.source_file_path,
                    self.base.line_of(&node)
                );
                return Ok(Vec::new());
            }
            Err(reason) => {
                return Err(self
                    .base
                    .unsupported(&node, format!("field {}: {}", names.join(", "), reason)))
            }
        };

        Ok(names
            .into_iter()
            .map(|name| Field {
                path: self.base.path.clone(),
                package_name: self.package_name.clone(),
                name,
                base_type: shape.base_type.clone(),
                repeated: shape.repeated,
                optional: shape.optional,
                is_selector: shape.is_selector,
            })
            .collect())
    }

    /// Fields of a `struct_type`, in declaration order
    pub(super) fn fields_from_struct(&self, struct_node: Node) -> Result<Vec<Field>> {
        let mut fields = Vec::new();
        let Some(list) = super::helpers::first_named_child(struct_node) else {
            return Ok(fields);
        };

        for declaration in super::helpers::named_children(list) {
            if declaration.kind() == "field_declaration" {
                fields.extend(self.fields_from_field_declaration(declaration)?);
            }
        }
        Ok(fields)
    }

    /// `X, Y float64`, `Name *pkg.T`, or an embedded `*Base` / `pkg.Base`
    fn fields_from_field_declaration(&self, node: Node) -> Result<Vec<Field>> {
        let mut cursor = node.walk();
        let names: Vec<String> = node
            .children_by_field_name("name", &mut cursor)
            .map(|name| self.get_node_text(name))
            .collect();

        let Some(type_node) = node.child_by_field_name("type") else {
            return Ok(Vec::new());
        };
        let mut expr = self.type_expr(type_node);

        // Embedded pointers keep the `*` outside the type node
        if names.is_empty() {
            let mut cursor = node.walk();
            let embedded_pointer = node
                .children(&mut cursor)
                .any(|child| !child.is_named() && child.kind() == "*");
            if embedded_pointer {
                expr = TypeExpr::Pointer(Box::new(expr));
            }
        }

        self.build_fields(names, &expr, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> TypeExpr {
        TypeExpr::Named(name.to_string())
    }

    fn qualified(package: &str, name: &str) -> TypeExpr {
        TypeExpr::Qualified {
            package: package.to_string(),
            name: name.to_string(),
        }
    }

    fn array(inner: TypeExpr) -> TypeExpr {
        TypeExpr::Array(Box::new(inner))
    }

    fn pointer(inner: TypeExpr) -> TypeExpr {
        TypeExpr::Pointer(Box::new(inner))
    }

    fn map(key: TypeExpr, value: TypeExpr) -> TypeExpr {
        TypeExpr::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    fn triple(expr: TypeExpr) -> (String, bool, bool, bool) {
        match classify(&expr).unwrap() {
            Shape::Field(s) => (s.base_type, s.repeated, s.optional, s.is_selector),
            other => panic!("expected field shape for {expr}, got {other:?}"),
        }
    }

    #[test]
    fn test_classification_table() {
        let cases = vec![
            (named("int"), ("int", false, false, false)),
            (array(named("string")), ("string", true, false, false)),
            (array(qualified("pkg1", "A")), ("pkg1.A", true, false, true)),
            (array(pointer(named("A"))), ("A", true, true, false)),
            (array(pointer(qualified("pkg1", "A"))), ("pkg1.A", true, true, true)),
            (array(pointer(map(named("string"), named("int")))), ("int", true, true, false)),
            (qualified("time", "Time"), ("time.Time", false, false, true)),
            (pointer(named("string")), ("string", false, true, false)),
            (pointer(qualified("pkg1", "A")), ("pkg1.A", false, true, true)),
            (TypeExpr::Interface, ("interface", false, false, false)),
        ];

        for (expr, (base, repeated, optional, selector)) in cases {
            let label = expr.to_string();
            assert_eq!(
                triple(expr),
                (base.to_string(), repeated, optional, selector),
                "wrong classification for {label}"
            );
        }
    }

    #[test]
    fn test_pointer_to_map_is_skipped() {
        let expr = pointer(map(named("string"), named("int")));
        assert_eq!(classify(&expr).unwrap(), Shape::Skipped);
    }

    #[test]
    fn test_unparsed_shapes_become_unknown() {
        assert_eq!(
            classify(&TypeExpr::Other("function_type".to_string())).unwrap(),
            Shape::Unknown { optional: false }
        );
        assert_eq!(
            classify(&map(named("string"), named("int"))).unwrap(),
            Shape::Unknown { optional: false }
        );
        assert_eq!(
            classify(&pointer(pointer(named("int")))).unwrap(),
            Shape::Unknown { optional: true }
        );
    }

    #[test]
    fn test_fatal_array_shapes() {
        let err = classify(&array(TypeExpr::Interface)).unwrap_err();
        assert!(err.contains("array of interface"));

        assert!(classify(&array(map(named("string"), named("int")))).is_err());
        assert!(classify(&array(array(named("int")))).is_err());
        assert!(classify(&array(pointer(TypeExpr::Interface))).is_err());
    }

    #[test]
    fn test_implicit_names() {
        assert_eq!(named("Base").implicit_name(), "Base");
        assert_eq!(pointer(qualified("pkg", "Base")).implicit_name(), "Base");
        assert_eq!(array(named("string")).implicit_name(), "string");
    }
}
