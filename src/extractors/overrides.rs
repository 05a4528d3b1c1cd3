//! Post-extraction overrides
//!
//! Overrides patch naming and typing policy into an extracted model without
//! teaching the extractor about it. Every override sees every field (or enum
//! entry) in list order; a match never stops later overrides from running.

use crate::config::TranspilerConfig;
use crate::extractors::base::{EnumEntry, Field, ParseResult};
use tracing::debug;

/// Declaration a field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOwner<'a> {
    /// Parameter or result of an interface method
    Function(&'a str),
    Record {
        name: &'a str,
        package_name: &'a str,
    },
}

/// Rewrites a field in place; returns true when it changed something
pub type FieldOverride = Box<dyn Fn(&mut Field, FieldOwner<'_>) -> bool + Send + Sync>;

/// Rewrites an enum entry in place; returns true when it changed something
pub type EnumOverride = Box<dyn Fn(&mut EnumEntry) -> bool + Send + Sync>;

/// Ordered field and enum overrides
#[derive(Default)]
pub struct Overrides {
    fields: Vec<FieldOverride>,
    enums: Vec<EnumOverride>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field<F>(mut self, override_fn: F) -> Self
    where
        F: Fn(&mut Field, FieldOwner<'_>) -> bool + Send + Sync + 'static,
    {
        self.fields.push(Box::new(override_fn));
        self
    }

    pub fn with_enum<F>(mut self, override_fn: F) -> Self
    where
        F: Fn(&mut EnumEntry) -> bool + Send + Sync + 'static,
    {
        self.enums.push(Box::new(override_fn));
        self
    }

    /// Base type renames and forced enum group names from the config
    pub fn from_config(config: &TranspilerConfig) -> Self {
        let mut overrides = Self::new();

        if !config.type_renames.is_empty() {
            let renames = config.type_renames.clone();
            overrides = overrides.with_field(move |field, _owner| {
                match renames.get(&field.base_type) {
                    Some(renamed) if *renamed != field.base_type => {
                        field.base_type = renamed.clone();
                        true
                    }
                    _ => false,
                }
            });
        }

        if !config.enum_groups.is_empty() {
            let groups = config.enum_groups.clone();
            overrides = overrides.with_enum(move |entry| match groups.get(&entry.declared_name) {
                Some(group) if *group != entry.group_name => {
                    entry.group_name = group.clone();
                    true
                }
                _ => false,
            });
        }

        overrides
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.enums.is_empty()
    }

    fn apply_field(&self, field: &mut Field, owner: FieldOwner<'_>) -> usize {
        self.fields
            .iter()
            .filter(|override_fn| override_fn(field, owner))
            .count()
    }

    fn apply_enum(&self, entry: &mut EnumEntry) -> usize {
        self.enums
            .iter()
            .filter(|override_fn| override_fn(entry))
            .count()
    }
}

/// How many override applications reported a rewrite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverrideReport {
    pub fields_rewritten: usize,
    pub enums_rewritten: usize,
}

impl ParseResult {
    /// Offer every field and enum entry to every override
    pub fn apply_overrides(&mut self, overrides: &Overrides) -> OverrideReport {
        let mut report = OverrideReport::default();

        for function in &mut self.functions {
            let owner = FieldOwner::Function(&function.name);
            for field in function
                .parameter_fields
                .iter_mut()
                .chain(function.return_fields.iter_mut())
            {
                report.fields_rewritten += overrides.apply_field(field, owner);
            }
        }

        for record in &mut self.records {
            let owner = FieldOwner::Record {
                name: &record.name,
                package_name: &record.package_name,
            };
            for field in record.fields.iter_mut() {
                report.fields_rewritten += overrides.apply_field(field, owner);
            }
        }

        for entry in &mut self.enums {
            report.enums_rewritten += overrides.apply_enum(entry);
        }

        debug!(
            "Overrides rewrote {} fields and {} enum entries",
            report.fields_rewritten, report.enums_rewritten
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::base::{FunctionSignature, RecordType};
    use crate::utils::paths::PathModel;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn path() -> PathModel {
        PathModel::new(Path::new("/src"), "app/api/api.go")
    }

    fn field(name: &str, base_type: &str) -> Field {
        Field {
            path: path(),
            package_name: "api".to_string(),
            name: name.to_string(),
            base_type: base_type.to_string(),
            repeated: false,
            optional: false,
            is_selector: false,
        }
    }

    fn entry(name: &str) -> EnumEntry {
        EnumEntry {
            package_name: "api".to_string(),
            path: path(),
            declared_name: name.to_string(),
            group_name: "Type".to_string(),
            block_id: 0,
            ordinal: 0,
            underlying_type: "int".to_string(),
        }
    }

    fn model() -> ParseResult {
        ParseResult {
            functions: vec![FunctionSignature {
                name: "Get".to_string(),
                parameter_fields: vec![field("ctx", "context.Context"), field("path", "WizardPath")],
                return_fields: vec![field("Field1", "ContentTags"), field("Field2", "error")],
            }],
            records: vec![RecordType {
                path: path(),
                package_name: "api".to_string(),
                name: "Item".to_string(),
                fields: vec![field("Tags", "ContentTags"), field("ID", "string")],
            }],
            scalar_aliases: vec![],
            enums: vec![entry("SortAscending"), entry("SortDescending"), entry("Other")],
        }
    }

    #[test]
    fn test_config_overrides_rewrite_types_and_groups() {
        let mut config = TranspilerConfig::new("app", "app/api/api.go", "gen");
        for from in ["WizardPath", "ContentTags"] {
            config
                .type_renames
                .insert(from.to_string(), "StringArray".to_string());
        }
        for name in ["SortAscending", "SortDescending"] {
            config
                .enum_groups
                .insert(name.to_string(), "SortType".to_string());
        }

        let mut result = model();
        let report = result.apply_overrides(&Overrides::from_config(&config));

        assert_eq!(report.fields_rewritten, 3);
        assert_eq!(report.enums_rewritten, 2);
        assert_eq!(result.functions[0].parameter_fields[1].base_type, "StringArray");
        assert_eq!(result.functions[0].return_fields[0].base_type, "StringArray");
        assert_eq!(result.records[0].fields[0].base_type, "StringArray");
        assert_eq!(result.enums[0].group_name, "SortType");
        assert_eq!(result.enums[2].group_name, "Type");
    }

    #[test]
    fn test_every_override_sees_every_field() {
        let calls = Arc::new(AtomicUsize::new(0));
        let first = Arc::clone(&calls);
        let second = Arc::clone(&calls);

        let overrides = Overrides::new()
            .with_field(move |_field, _owner| {
                first.fetch_add(1, Ordering::SeqCst);
                true
            })
            .with_field(move |_field, _owner| {
                second.fetch_add(1, Ordering::SeqCst);
                false
            });

        let mut result = model();
        let report = result.apply_overrides(&overrides);

        // 6 fields, 2 overrides each, no early exit after a match
        assert_eq!(calls.load(Ordering::SeqCst), 12);
        assert_eq!(report.fields_rewritten, 6);
    }

    #[test]
    fn test_owner_is_passed_through() {
        let overrides = Overrides::new().with_field(|field, owner| match owner {
            FieldOwner::Record { name: "Item", .. } if field.name == "ID" => {
                field.base_type = "ItemID".to_string();
                true
            }
            _ => false,
        });

        let mut result = model();
        result.apply_overrides(&overrides);
        assert_eq!(result.records[0].fields[1].base_type, "ItemID");
        assert_eq!(result.functions[0].parameter_fields[0].base_type, "context.Context");
    }
}
