//! Source model pipeline - the single entry point from a config to a model
//!
//! Resolves the import graph of the entry file, extracts every directory the
//! graph reaches, then applies overrides. Any fatal error aborts before a
//! model is returned.

use crate::config::{SourceRoot, TranspilerConfig};
use crate::error::Result;
use crate::extractors::base::ParseResult;
use crate::extractors::manager::ExtractorManager;
use crate::extractors::overrides::{OverrideReport, Overrides};
use crate::graph::{self, DependencyGraph};
use tracing::info;

/// Everything generators need: the declarations and the graph to resolve
/// their selectors against
#[derive(Debug, Clone)]
pub struct SourceModel {
    pub graph: DependencyGraph,
    pub result: ParseResult,
    pub overrides: OverrideReport,
}

/// Run resolution, extraction and overrides for one configured entry file
pub fn extract_source_model(
    source_root: &SourceRoot,
    config: &TranspilerConfig,
    overrides: &Overrides,
) -> Result<SourceModel> {
    config.validate()?;

    let graph = graph::resolve(source_root, &config.entry_file, &config.module_root)?;
    let dirs = graph.unique_dir_paths();
    info!(
        "Extracting {} package directories reachable from {}",
        dirs.len(),
        config.entry_file
    );

    let mut result = ExtractorManager::new(source_root.dir()).extract(&dirs)?;
    let report = result.apply_overrides(overrides);

    Ok(SourceModel {
        graph,
        result,
        overrides: report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture(root: &Path) {
        write(
            root,
            "app/I.go",
            r#"package root

import (
	"context"

	"app/p1"
	"app/p2"
)

type I interface {
	Get(ctx context.Context, color p2.Color) (*p1.A, error)
}
"#,
        );
        write(
            root,
            "app/p1/a.go",
            "package p1\n\ntype A struct {\n\tX int\n\tY *string\n}\n",
        );
        write(
            root,
            "app/p2/color.go",
            "package p2\n\ntype Color int\n\nconst (\n\tRed Color = iota\n\tGreen\n\tBlue\n)\n",
        );
    }

    #[test]
    fn test_end_to_end_scenario() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let config = TranspilerConfig::new("app", "app/I.go", "example.com/gen");

        let model =
            extract_source_model(&SourceRoot::new(dir.path()), &config, &Overrides::new()).unwrap();

        // The entry file plus the two imported files
        let root_edges = &model.graph.root().imports;
        let imported: Vec<_> = root_edges.iter().filter_map(|e| e.target).collect();
        assert_eq!(imported.len(), 2);
        assert_eq!(model.graph.unique_file_paths().len(), 3);

        assert_eq!(model.result.records.len(), 1);
        let a = &model.result.records[0];
        assert_eq!(a.name, "A");
        let fields: Vec<(&str, &str, bool, bool, bool)> = a
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.base_type.as_str(), f.repeated, f.optional, f.is_selector))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("X", "int", false, false, false),
                ("Y", "string", false, true, false),
            ]
        );

        let groups = model.result.enum_groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Color");
        let members: Vec<&str> = groups[0]
            .entries
            .iter()
            .map(|e| e.declared_name.as_str())
            .collect();
        assert_eq!(members, vec!["Red", "Green", "Blue"]);

        assert_eq!(model.result.functions.len(), 1);
        assert_eq!(model.result.functions[0].return_fields[0].base_type, "p1.A");
    }

    #[test]
    fn test_runs_are_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let config = TranspilerConfig::new("app", "app/I.go", "example.com/gen");
        let root = SourceRoot::new(dir.path());

        let first = extract_source_model(&root, &config, &Overrides::new()).unwrap();
        let second = extract_source_model(&root, &config, &Overrides::new()).unwrap();
        assert_eq!(
            first.result.to_json().unwrap(),
            second.result.to_json().unwrap()
        );
    }

    #[test]
    fn test_invalid_config_fails_before_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let config = TranspilerConfig::new("", "app/I.go", "example.com/gen");
        let err = extract_source_model(&SourceRoot::new(dir.path()), &config, &Overrides::new())
            .unwrap_err();
        assert!(err.is_config());
    }
}
