// Protobuf schema emission
//
// One proto file per Go package directory, plus one service file for the
// interface methods. Every message and enum reference is fully qualified
// with its proto package, so files only need to import each other.

use crate::config::TranspilerConfig;
use crate::error::Result;
use crate::extractors::base::{Field, ParseResult, INTERFACE_TYPE};
use crate::graph::{
    resolve_selector, DependencyGraph, DependencySet, LocalDependency, SelectorResolution,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use tracing::debug;

const WELL_KNOWN_IMPORTS: [&str; 3] = [
    "google/protobuf/timestamp.proto",
    "google/protobuf/struct.proto",
    "google/protobuf/duration.proto",
];

/// Go result type dropped from RPC responses
const ERROR_TYPE: &str = "error";

/// Proto type for Go types that have no same-named proto equivalent
pub fn proto_scalar(base_type: &str) -> Option<&'static str> {
    match base_type {
        "time.Time" => Some("google.protobuf.Timestamp"),
        "time.Duration" => Some("google.protobuf.Duration"),
        "float64" => Some("double"),
        "float32" => Some("float"),
        "int" | "int8" | "int16" | "rune" => Some("int32"),
        "uint" | "uint8" | "uint16" | "byte" => Some("uint32"),
        "interface{}" => Some("google.protobuf.Value"),
        t if t == INTERFACE_TYPE => Some("google.protobuf.Value"),
        _ => None,
    }
}

/// Output path of a package's proto file, relative to the output directory
pub fn proto_file_path(schema_dir: &str, package_name: &str) -> String {
    if schema_dir.is_empty() {
        format!("{package_name}.proto")
    } else {
        format!("{schema_dir}/{package_name}.proto")
    }
}

/// One generated `.proto` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtoFile {
    /// Relative to the output directory
    pub path: String,
    pub package: String,
    pub go_package: String,
    pub dependencies: DependencySet,
    enums: Vec<String>,
    messages: Vec<String>,
    service: Option<String>,
}

impl ProtoFile {
    fn new(path: String, package: String, go_package: String) -> Self {
        Self {
            path,
            package,
            go_package,
            dependencies: DependencySet::default(),
            enums: Vec::new(),
            messages: Vec::new(),
            service: None,
        }
    }

    fn merge_dependencies(&mut self, dependencies: DependencySet) {
        for dependency in dependencies.local.into_values() {
            self.dependencies.add_local(dependency);
        }
        self.dependencies.unresolved.extend(dependencies.unresolved);
    }

    /// Header, imports, enums, messages, then the service block
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("syntax = \"proto3\";\n");
        out.push_str(&format!("package {};\n", self.package));
        out.push_str(&format!("option go_package = \"{}\";\n\n", self.go_package));

        for import in WELL_KNOWN_IMPORTS {
            out.push_str(&format!("import \"{import}\";\n"));
        }
        out.push('\n');

        let imports: Vec<String> = self
            .dependencies
            .local
            .values()
            .map(|dep| proto_file_path(&dep.schema_dir, &dep.package_name))
            .filter(|path| *path != self.path)
            .collect();
        for import in &imports {
            out.push_str(&format!("import \"{import}\";\n"));
        }
        if !imports.is_empty() {
            out.push('\n');
        }

        let blocks: Vec<&str> = self
            .enums
            .iter()
            .chain(self.messages.iter())
            .chain(self.service.iter())
            .map(String::as_str)
            .collect();
        out.push_str(&blocks.join("\n"));
        out
    }
}

fn key(schema_dir: &str, name: &str) -> (String, String) {
    (schema_dir.to_string(), name.to_string())
}

/// Declared names per package directory
struct TypeIndex {
    messages: FxHashSet<(String, String)>,
    enums: FxHashSet<(String, String)>,
    aliases: FxHashMap<(String, String), String>,
}

impl TypeIndex {
    fn new(result: &ParseResult, module_root: &str) -> Result<Self> {
        let mut index = Self {
            messages: FxHashSet::default(),
            enums: FxHashSet::default(),
            aliases: FxHashMap::default(),
        };
        for record in &result.records {
            index
                .messages
                .insert(key(&record.path.schema_dir(module_root)?, &record.name));
        }
        for entry in &result.enums {
            index
                .enums
                .insert(key(&entry.path.schema_dir(module_root)?, &entry.group_name));
        }
        for alias in &result.scalar_aliases {
            index.aliases.insert(
                key(&alias.path.schema_dir(module_root)?, &alias.name),
                alias.underlying_base_type.clone(),
            );
        }
        Ok(index)
    }
}

/// Renders the extracted model as proto3 files
pub struct SchemaWriter<'a> {
    graph: &'a DependencyGraph,
    config: &'a TranspilerConfig,
}

impl<'a> SchemaWriter<'a> {
    pub fn new(graph: &'a DependencyGraph, config: &'a TranspilerConfig) -> Self {
        Self { graph, config }
    }

    /// Proto package for a dotted namespace; the module root maps to the
    /// configured root package name
    pub fn proto_package(&self, namespace: &str) -> String {
        let local = if namespace.is_empty() {
            self.config.root_package_name.as_str()
        } else {
            namespace
        };
        let prefix = self.config.package_prefix.trim_end_matches('.');
        if prefix.is_empty() {
            local.to_string()
        } else {
            format!("{prefix}.{local}")
        }
    }

    fn go_package(&self, schema_dir: &str) -> String {
        let dir = if schema_dir.is_empty() {
            self.config.root_package_name.as_str()
        } else {
            schema_dir
        };
        format!(
            "{}/{}",
            self.config.go_package_prefix.trim_end_matches('/'),
            dir
        )
    }

    /// One file per package directory holding records or enums, ordered by path
    pub fn proto_files(&self, result: &ParseResult) -> Result<Vec<ProtoFile>> {
        let module_root = self.config.module_root.as_str();
        let index = TypeIndex::new(result, module_root)?;
        let mut files: BTreeMap<String, ProtoFile> = BTreeMap::new();

        for group in result.enum_groups() {
            let first = group.entries[0];
            let schema_dir = first.path.schema_dir(module_root)?;
            let mut block = format!("enum {} {{\n", group.name);
            for (value, entry) in group.entries.iter().enumerate() {
                block.push_str(&format!("    {} = {};\n", entry.declared_name, value));
            }
            block.push_str("}\n");

            self.file_for(&mut files, &schema_dir, &first.package_name)
                .enums
                .push(block);
        }

        for record in &result.records {
            let schema_dir = record.path.schema_dir(module_root)?;
            let mut dependencies = DependencySet::default();
            let mut block = format!("message {} {{\n", record.name);
            for (idx, field) in record.fields.iter().enumerate() {
                block.push_str(&self.render_field(
                    field,
                    &field.name,
                    idx + 1,
                    Some(&schema_dir),
                    &index,
                    &mut dependencies,
                )?);
            }
            block.push_str("}\n");

            let file = self.file_for(&mut files, &schema_dir, &record.package_name);
            file.messages.push(block);
            file.merge_dependencies(dependencies);
        }

        debug!("Rendered {} proto files", files.len());
        Ok(files.into_values().collect())
    }

    /// Request and response messages for every interface method, and the service
    ///
    /// The first parameter (the context) is dropped, as are `error` results.
    /// Results are named `Field<n>` after their position.
    pub fn service_file(&self, result: &ParseResult) -> Result<ProtoFile> {
        let index = TypeIndex::new(result, &self.config.module_root)?;
        let root = self.config.root_package_name.as_str();
        let mut file = ProtoFile::new(
            format!("{}.proto", self.config.service_name.to_lowercase()),
            self.proto_package(""),
            self.go_package(""),
        );
        let mut dependencies = DependencySet::default();

        for function in &result.functions {
            let mut request = format!("message {}Request {{\n", function.name);
            for (idx, field) in function.parameter_fields.iter().skip(1).enumerate() {
                request.push_str(&self.render_field(
                    field,
                    &field.name,
                    idx + 1,
                    None,
                    &index,
                    &mut dependencies,
                )?);
            }
            request.push_str("}\n");

            let mut response = format!("message {}Response {{\n", function.name);
            for (idx, field) in function.return_fields.iter().enumerate() {
                if field.base_type == ERROR_TYPE {
                    continue;
                }
                let name = format!("Field{}", idx + 1);
                response.push_str(&self.render_field(
                    field,
                    &name,
                    idx + 1,
                    None,
                    &index,
                    &mut dependencies,
                )?);
            }
            response.push_str("}\n");

            file.messages.push(request);
            file.messages.push(response);
        }

        let mut service = format!("service {} {{\n", self.config.service_name);
        for function in &result.functions {
            service.push_str(&format!(
                "    rpc {0}({0}Request) returns ({0}Response);\n",
                function.name
            ));
        }
        service.push_str("}\n");
        file.service = Some(service);
        file.merge_dependencies(dependencies);

        debug!(
            "Rendered service {} with {} methods for package {}",
            self.config.service_name,
            result.functions.len(),
            root
        );
        Ok(file)
    }

    fn file_for<'f>(
        &self,
        files: &'f mut BTreeMap<String, ProtoFile>,
        schema_dir: &str,
        package_name: &str,
    ) -> &'f mut ProtoFile {
        files.entry(schema_dir.to_string()).or_insert_with(|| {
            ProtoFile::new(
                proto_file_path(schema_dir, package_name),
                self.proto_package(&schema_dir.replace('/', ".")),
                self.go_package(schema_dir),
            )
        })
    }

    fn render_field(
        &self,
        field: &Field,
        name: &str,
        number: usize,
        current_dir: Option<&str>,
        index: &TypeIndex,
        dependencies: &mut DependencySet,
    ) -> Result<String> {
        let label = if field.repeated {
            "repeated "
        } else if field.optional {
            "optional "
        } else {
            ""
        };
        let proto_type = self.proto_type(field, current_dir, index, dependencies)?;
        Ok(format!("    {label}{proto_type} {name} = {number};\n"))
    }

    /// Proto type of a field, recording any file it has to import
    fn proto_type(
        &self,
        field: &Field,
        current_dir: Option<&str>,
        index: &TypeIndex,
        dependencies: &mut DependencySet,
    ) -> Result<String> {
        if let Some(scalar) = proto_scalar(&field.base_type) {
            return Ok(scalar.to_string());
        }

        let module_root = self.config.module_root.as_str();
        let (home_dir, name, package_name) =
            match resolve_selector(self.graph, field, module_root)? {
                SelectorResolution::NotSelector => (
                    field.path.schema_dir(module_root)?,
                    field.base_type.clone(),
                    field.package_name.clone(),
                ),
                SelectorResolution::Local {
                    schema_dir,
                    name,
                    target,
                    ..
                } => (schema_dir, name, target.package_name.clone()),
                SelectorResolution::Unresolved { alias } => {
                    dependencies.unresolved.insert(alias);
                    return Ok(field.base_type.clone());
                }
            };

        let declared = key(&home_dir, &name);
        let is_enum = index.enums.contains(&declared);
        if !is_enum {
            // One level only: `type Name string` becomes `string`
            if let Some(underlying) = index.aliases.get(&declared) {
                return Ok(proto_scalar(underlying)
                    .map(str::to_string)
                    .unwrap_or_else(|| underlying.clone()));
            }
        }

        if !is_enum && !index.messages.contains(&declared) && !field.is_selector {
            return Ok(name);
        }

        let namespace = home_dir.replace('/', ".");
        if current_dir != Some(home_dir.as_str()) {
            dependencies.add_local(LocalDependency {
                namespace: namespace.clone(),
                schema_dir: home_dir,
                package_name,
            });
        }
        Ok(format!("{}.{}", self.proto_package(&namespace), name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceRoot;
    use crate::extractors::{extract_source_model, Overrides, SourceModel};
    use std::fs;
    use std::path::Path;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn model(root: &Path) -> (SourceModel, TranspilerConfig) {
        write(
            root,
            "app/api/api.go",
            r#"package api

import (
	"context"
	"time"

	"app/p1"
	nestpkg "app/p2/nest"
)

type API interface {
	Get(ctx context.Context, id string, when time.Time) (*p1.A, error)
	Nested(ctx context.Context, n *nestpkg.Nest) error
}
"#,
        );
        write(
            root,
            "app/p1/a.go",
            r#"package p1

import "app/p2/nest"

type Label string

type A struct {
	X     int
	Y     *string
	Tags  []Label
	Nest  nest.Nest
	Color nest.Color
	Ghost ghost.Thing
}
"#,
        );
        write(
            root,
            "app/p2/nest/nest.go",
            "package nest\n\ntype Color int\n\nconst (\n\tRed Color = iota\n\tGreen\n)\n\ntype Nest struct {\n\tRatio float64\n}\n",
        );

        let mut config = TranspilerConfig::new("app", "app/api/api.go", "example.com/gen");
        config.package_prefix = "acme.v1".to_string();
        let model =
            extract_source_model(&SourceRoot::new(root), &config, &Overrides::new()).unwrap();
        (model, config)
    }

    #[test]
    fn test_scalar_mapping() {
        assert_eq!(proto_scalar("time.Time"), Some("google.protobuf.Timestamp"));
        assert_eq!(proto_scalar("time.Duration"), Some("google.protobuf.Duration"));
        assert_eq!(proto_scalar("float64"), Some("double"));
        assert_eq!(proto_scalar("float32"), Some("float"));
        assert_eq!(proto_scalar("int"), Some("int32"));
        assert_eq!(proto_scalar("interface"), Some("google.protobuf.Value"));
        assert_eq!(proto_scalar("string"), None);
        assert_eq!(proto_scalar("int64"), None);
    }

    #[test]
    fn test_proto_files_per_package() {
        let dir = tempfile::tempdir().unwrap();
        let (model, config) = model(dir.path());
        let writer = SchemaWriter::new(&model.graph, &config);

        let files = writer.proto_files(&model.result).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["p1/p1.proto", "p2/nest/nest.proto"]);

        let p1 = files[0].render();
        assert!(p1.contains("package acme.v1.p1;"));
        assert!(p1.contains("option go_package = \"example.com/gen/p1\";"));
        assert!(p1.contains("import \"p2/nest/nest.proto\";"));
        assert!(p1.contains("message A {\n"));
        assert!(p1.contains("    int32 X = 1;\n"));
        assert!(p1.contains("    optional string Y = 2;\n"));
        assert!(p1.contains("    repeated string Tags = 3;\n"));
        assert!(p1.contains("    acme.v1.p2.nest.Nest Nest = 4;\n"));
        assert!(p1.contains("    acme.v1.p2.nest.Color Color = 5;\n"));
        // Unresolved selectors keep their literal type and do not abort
        assert!(p1.contains("    ghost.Thing Ghost = 6;\n"));
        assert!(files[0].dependencies.unresolved.contains("ghost"));

        let nest = files[1].render();
        assert!(nest.contains("enum Color {\n    Red = 0;\n    Green = 1;\n}\n"));
        assert!(nest.contains("    double Ratio = 1;\n"));
        assert!(!nest.contains("import \"p2/nest/nest.proto\";"));
    }

    #[test]
    fn test_service_file() {
        let dir = tempfile::tempdir().unwrap();
        let (model, config) = model(dir.path());
        let writer = SchemaWriter::new(&model.graph, &config);

        let file = writer.service_file(&model.result).unwrap();
        assert_eq!(file.path, "service.proto");
        let rendered = file.render();

        assert!(rendered.contains("package acme.v1.root;"));
        assert!(rendered.contains("import \"p1/p1.proto\";"));
        assert!(rendered.contains("import \"p2/nest/nest.proto\";"));
        assert!(rendered.contains(
            "message GetRequest {\n    string id = 1;\n    google.protobuf.Timestamp when = 2;\n}\n"
        ));
        assert!(rendered.contains("message GetResponse {\n    optional acme.v1.p1.A Field1 = 1;\n}\n"));
        assert!(rendered.contains("message NestedResponse {\n}\n"));
        assert!(rendered.contains("service Service {\n"));
        assert!(rendered.contains("    rpc Get(GetRequest) returns (GetResponse);\n"));
        assert!(rendered.contains("    rpc Nested(NestedRequest) returns (NestedResponse);\n"));
    }
}
