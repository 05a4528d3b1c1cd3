// Cross-package selector resolution
//
// A field typed `pkg.Name` only carries the qualifier as written. The
// qualifier is looked up among the import edges of the field's own file,
// and a local hit is turned into the destination schema namespace.

use super::{DependencyGraph, GraphNode};
use crate::error::Result;
use crate::extractors::base::Field;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Where a field's type lives
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorResolution<'g> {
    /// The field refers to a type in its own package
    NotSelector,
    /// The qualifier names a package inside the module
    Local {
        alias: String,
        /// Dotted, module-relative (`pkg2.nest`); empty for the module root
        namespace: String,
        /// Slash separated form of `namespace`
        schema_dir: String,
        /// Type name without the qualifier
        name: String,
        target: &'g GraphNode,
    },
    /// External package, or a qualifier with no matching import
    Unresolved { alias: String },
}

/// Resolve the `pkg.Name` type of a field against the import graph
pub fn resolve_selector<'g>(
    graph: &'g DependencyGraph,
    field: &Field,
    module_root: &str,
) -> Result<SelectorResolution<'g>> {
    let Some(selector) = field.selector() else {
        return Ok(SelectorResolution::NotSelector);
    };

    let edges = graph.imports_for_path(&field.path.source_file_path);
    let edge = graph.find_import(selector.package, edges);

    match edge.and_then(|edge| edge.target) {
        Some(target) => {
            let target = graph.node(target);
            Ok(SelectorResolution::Local {
                alias: selector.package.to_string(),
                namespace: target.path.schema_namespace(module_root)?,
                schema_dir: target.path.schema_dir(module_root)?,
                name: selector.name.to_string(),
                target,
            })
        }
        None => {
            if edge.is_some() {
                debug!(
                    "External selector {} in {}",
                    field.base_type, field.path.source_file_path
                );
            } else {
                warn!(
                    "Unresolved selector {} for field {} in {}",
                    field.base_type, field.name, field.path.source_file_path
                );
            }
            Ok(SelectorResolution::Unresolved {
                alias: selector.package.to_string(),
            })
        }
    }
}

/// A local package a schema file has to import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDependency {
    pub namespace: String,
    pub schema_dir: String,
    pub package_name: String,
}

/// Dependencies collected while resolving the fields of one schema file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    /// Keyed by namespace so imports come out ordered and deduplicated
    pub local: BTreeMap<String, LocalDependency>,
    pub unresolved: BTreeSet<String>,
}

impl DependencySet {
    pub fn add(&mut self, resolution: &SelectorResolution<'_>) {
        match resolution {
            SelectorResolution::NotSelector => {}
            SelectorResolution::Local {
                namespace,
                schema_dir,
                target,
                ..
            } => self.add_local(LocalDependency {
                namespace: namespace.clone(),
                schema_dir: schema_dir.clone(),
                package_name: target.package_name.clone(),
            }),
            SelectorResolution::Unresolved { alias } => {
                self.unresolved.insert(alias.clone());
            }
        }
    }

    /// Record a same-module dependency found without a selector
    pub fn add_local(&mut self, dependency: LocalDependency) {
        self.local
            .entry(dependency.namespace.clone())
            .or_insert(dependency);
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.unresolved.is_empty()
    }
}
