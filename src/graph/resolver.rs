// Import graph resolution
//
// Depth-first walk from the entry file. Every file is parsed once: its arena
// slot is reserved before its imports are followed, so fan-in and cycles hit
// the cache instead of re-parsing.

use super::{DependencyGraph, GraphNode, ImportEdge, NodeId};
use crate::config::SourceRoot;
use crate::error::Result;
use crate::extractors::go::GoExtractor;
use crate::language::parse_go;
use crate::utils::file_utils::{go_files_in_dir, read_file_content};
use crate::utils::paths::PathModel;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Whether an import path names a package inside the module root
pub fn is_local_import(import_path: &str, module_root: &str) -> bool {
    let root = module_root.trim_end_matches('/');
    if root.is_empty() {
        return false;
    }
    import_path == root
        || import_path
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Build the import graph of `entry_file` (relative to the source root)
///
/// Imports inside `module_root` are followed file by file; all other imports
/// are recorded as edges without a target.
pub fn resolve(source_root: &SourceRoot, entry_file: &str, module_root: &str) -> Result<DependencyGraph> {
    let mut resolver = Resolver {
        source_root,
        module_root,
        nodes: Vec::new(),
        by_absolute: FxHashMap::default(),
        in_progress: FxHashSet::default(),
    };

    let root = resolver.resolve_file(entry_file)?;
    info!(
        "Resolved {} files from {}",
        resolver.nodes.len(),
        entry_file
    );

    Ok(DependencyGraph::from_arena(
        resolver.nodes,
        resolver.by_absolute,
        root,
    ))
}

struct Resolver<'a> {
    source_root: &'a SourceRoot,
    module_root: &'a str,
    nodes: Vec<GraphNode>,
    by_absolute: FxHashMap<PathBuf, NodeId>,
    in_progress: FxHashSet<NodeId>,
}

impl Resolver<'_> {
    fn resolve_file(&mut self, relative_file: &str) -> Result<NodeId> {
        let path = PathModel::new(self.source_root.dir(), relative_file);

        if let Some(&id) = self.by_absolute.get(&path.absolute_file_path) {
            if self.in_progress.contains(&id) {
                warn!("Import cycle through {}", relative_file);
            }
            return Ok(id);
        }

        debug!("Resolving {}", relative_file);
        let content = read_file_content(&path.absolute_file_path)?;
        let tree = parse_go(&content, &path.absolute_file_path)?;
        let extractor = GoExtractor::new(path.clone(), content, &tree);
        let specs = extractor.extract_imports(&tree)?;
        let sibling_files = go_files_in_dir(&path.absolute_dir_path)?;

        let id = NodeId(self.nodes.len());
        self.nodes.push(GraphNode {
            package_name: extractor.package_name().to_string(),
            path: path.clone(),
            sibling_files,
            imports: Vec::new(),
        });
        self.by_absolute.insert(path.absolute_file_path, id);
        self.in_progress.insert(id);

        let mut edges = Vec::new();
        for spec in specs {
            let alias = spec
                .alias
                .clone()
                .unwrap_or_else(|| spec.default_alias().to_string());
            let explicit_alias = spec.alias.is_some();

            if !is_local_import(&spec.path, self.module_root) {
                edges.push(ImportEdge {
                    alias,
                    explicit_alias,
                    import_path: spec.path,
                    target: None,
                });
                continue;
            }

            let files = go_files_in_dir(&self.source_root.join(&spec.path))?;
            if files.is_empty() {
                warn!(
                    "No Go files in imported package {} (from {})",
                    spec.path, relative_file
                );
                continue;
            }

            // One edge per file of the imported package
            for file in files {
                let target = self.resolve_file(&format!("{}/{}", spec.path, file))?;
                edges.push(ImportEdge {
                    alias: alias.clone(),
                    explicit_alias,
                    import_path: spec.path.clone(),
                    target: Some(target),
                });
            }
        }

        self.nodes[id.0].imports = edges;
        self.in_progress.remove(&id);
        Ok(id)
    }
}
