// Extracted model types
//
// Everything the extractors produce for one run. Entities are created in a
// single extraction pass, optionally patched by overrides, then read-only.

use crate::utils::paths::PathModel;
use serde::Serialize;

/// Base type given to interface-typed fields
pub const INTERFACE_TYPE: &str = "interface";
/// Base type given to fields whose shape has no parser
pub const UNKNOWN_TYPE: &str = "unknown";
/// Group name for enum entries with no explicit or inherited type
pub const DEFAULT_ENUM_GROUP: &str = "Type";
/// Underlying type of enum entries without a literal
pub const DEFAULT_ENUM_UNDERLYING: &str = "int";

/// A struct field, interface method parameter or result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub path: PathModel,
    /// Package of the file the field is declared in
    pub package_name: String,
    pub name: String,
    /// Type name; `pkg.Name` when `is_selector` is set
    pub base_type: String,
    pub repeated: bool,
    pub optional: bool,
    /// The type refers to another package
    pub is_selector: bool,
}

/// The two halves of a `pkg.Name` type reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector<'a> {
    pub package: &'a str,
    pub name: &'a str,
}

impl Field {
    /// Split a cross-package base type into qualifier and name
    ///
    /// `None` for fields that are not selectors or whose base type was
    /// rewritten to an unqualified name.
    pub fn selector(&self) -> Option<Selector<'_>> {
        if !self.is_selector {
            return None;
        }
        self.base_type
            .split_once('.')
            .map(|(package, name)| Selector { package, name })
    }
}

/// A Go struct, or an array alias synthesized into a one-field record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordType {
    pub path: PathModel,
    pub package_name: String,
    pub name: String,
    /// Declaration order; downstream field numbering depends on it
    pub fields: Vec<Field>,
}

/// `type Name underlying` over a named type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScalarAlias {
    pub path: PathModel,
    pub package_name: String,
    pub name: String,
    pub underlying_base_type: String,
}

/// One constant of a `const` block that forms an enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumEntry {
    pub package_name: String,
    pub path: PathModel,
    /// Constant name
    pub declared_name: String,
    /// Name of the generated enum type
    pub group_name: String,
    /// Synthetic id of the `const` block the constant belongs to
    pub block_id: u32,
    /// Position inside the block
    pub ordinal: u32,
    /// `int` unless inferred from a literal (`string`, `float`, ...)
    pub underlying_type: String,
}

/// An interface method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSignature {
    pub name: String,
    pub parameter_fields: Vec<Field>,
    pub return_fields: Vec<Field>,
}

/// All constants of one `const` block, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumGroup<'a> {
    pub block_id: u32,
    /// Group name of the first member
    pub name: &'a str,
    pub entries: Vec<&'a EnumEntry>,
}

/// Declarations extracted from a set of directories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub functions: Vec<FunctionSignature>,
    pub records: Vec<RecordType>,
    pub scalar_aliases: Vec<ScalarAlias>,
    pub enums: Vec<EnumEntry>,
}

impl ParseResult {
    pub(crate) fn extend(&mut self, other: ParseResult) {
        self.functions.extend(other.functions);
        self.records.extend(other.records);
        self.scalar_aliases.extend(other.scalar_aliases);
        self.enums.extend(other.enums);
    }

    /// Order every list by name so output does not depend on directory order
    ///
    /// Sorts are stable and fall back to the declaring file; record fields
    /// keep their declaration order.
    pub(crate) fn sort(&mut self) {
        self.functions.sort_by(|a, b| a.name.cmp(&b.name));
        self.records.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.path.source_file_path.cmp(&b.path.source_file_path))
        });
        self.scalar_aliases.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.path.source_file_path.cmp(&b.path.source_file_path))
        });
        self.enums.sort_by(|a, b| {
            a.declared_name
                .cmp(&b.declared_name)
                .then_with(|| a.block_id.cmp(&b.block_id))
        });
    }

    /// Enum entries grouped by declaring block, sorted by group name
    pub fn enum_groups(&self) -> Vec<EnumGroup<'_>> {
        let mut by_block: std::collections::BTreeMap<u32, Vec<&EnumEntry>> =
            std::collections::BTreeMap::new();
        for entry in &self.enums {
            by_block.entry(entry.block_id).or_default().push(entry);
        }

        let mut groups: Vec<EnumGroup<'_>> = by_block
            .into_iter()
            .map(|(block_id, mut entries)| {
                entries.sort_by_key(|e| e.ordinal);
                EnumGroup {
                    block_id,
                    name: entries[0].group_name.as_str(),
                    entries,
                }
            })
            .collect();
        groups.sort_by(|a, b| {
            a.name
                .cmp(b.name)
                .then_with(|| a.entries[0].declared_name.cmp(&b.entries[0].declared_name))
        });
        groups
    }

    /// Stable JSON rendering of the whole model
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
