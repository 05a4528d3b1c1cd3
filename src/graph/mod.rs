// Import Graph Module
//
// Per-file dependency graph of a Go source tree:
// - resolver: builds the graph from one entry file, parsing each file once
// - selector: maps `pkg.Name` field types back onto the graph
//
// Nodes live in an arena owned by the graph; import edges hold indices, so a
// file imported from many places (fan-in) is still exactly one node.

mod resolver;
mod selector;

pub use resolver::{is_local_import, resolve};
pub use selector::{resolve_selector, DependencySet, LocalDependency, SelectorResolution};

use crate::utils::paths::PathModel;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use std::path::PathBuf;

/// Index of a node in the graph arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One Go source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    /// Name from the file's package clause
    pub package_name: String,
    pub path: PathModel,
    /// Go files in the same directory (this one included), sorted
    pub sibling_files: Vec<String>,
    pub imports: Vec<ImportEdge>,
}

/// One import of a file
///
/// A local import of a package with N files produces N edges, one per file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportEdge {
    /// Explicit alias, or the last import path segment when none was written
    pub alias: String,
    /// Whether `alias` was written in the source
    pub explicit_alias: bool,
    pub import_path: String,
    /// `None` for imports outside the module root
    pub target: Option<NodeId>,
}

impl ImportEdge {
    pub fn is_local(&self) -> bool {
        self.target.is_some()
    }
}

/// Resolved import graph rooted at the entry file
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: Vec<GraphNode>,
    by_absolute: FxHashMap<PathBuf, NodeId>,
    by_source: FxHashMap<String, NodeId>,
    root: NodeId,
}

impl DependencyGraph {
    pub(crate) fn from_arena(
        nodes: Vec<GraphNode>,
        by_absolute: FxHashMap<PathBuf, NodeId>,
        root: NodeId,
    ) -> Self {
        let by_source = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.path.source_file_path.clone(), NodeId(idx)))
            .collect();
        Self {
            nodes,
            by_absolute,
            by_source,
            root,
        }
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn root(&self) -> &GraphNode {
        self.node(self.root)
    }

    pub fn node(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id.0]
    }

    /// Number of distinct files in the graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &GraphNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (NodeId(idx), node))
    }

    /// Node for an absolute file path, if that file was resolved
    pub fn node_for_absolute(&self, path: &std::path::Path) -> Option<NodeId> {
        self.by_absolute.get(path).copied()
    }

    /// Every node reachable from `start` (itself included), each once
    pub fn reachable_from(&self, start: NodeId) -> Vec<NodeId> {
        let mut seen = FxHashSet::default();
        let mut stack = vec![start];
        let mut out = Vec::new();

        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            out.push(id);
            for edge in self.node(id).imports.iter().rev() {
                if let Some(target) = edge.target {
                    stack.push(target);
                }
            }
        }
        out
    }

    /// Source-root relative paths of every file reachable from `start`, sorted
    pub fn unique_file_paths_from(&self, start: NodeId) -> Vec<String> {
        let mut paths: Vec<String> = self
            .reachable_from(start)
            .into_iter()
            .map(|id| self.node(id).path.source_file_path.clone())
            .collect();
        paths.sort();
        paths.dedup();
        paths
    }

    pub fn unique_file_paths(&self) -> Vec<String> {
        self.unique_file_paths_from(self.root)
    }

    /// Absolute directories of every file reachable from `start`, sorted
    pub fn unique_dir_paths_from(&self, start: NodeId) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = self
            .reachable_from(start)
            .into_iter()
            .map(|id| self.node(id).path.absolute_dir_path.clone())
            .collect();
        dirs.sort();
        dirs.dedup();
        dirs
    }

    pub fn unique_dir_paths(&self) -> Vec<PathBuf> {
        self.unique_dir_paths_from(self.root)
    }

    /// Outgoing import edges of a file, by source-root relative path
    ///
    /// Unknown files have no imports.
    pub fn imports_for_path(&self, source_file_path: &str) -> &[ImportEdge] {
        self.by_source
            .get(source_file_path)
            .map(|id| self.node(*id).imports.as_slice())
            .unwrap_or(&[])
    }

    /// Find the edge a selector qualifier refers to
    ///
    /// An alias match anywhere in `edges` wins over a package-name match.
    pub fn find_import<'e>(&self, selector: &str, edges: &'e [ImportEdge]) -> Option<&'e ImportEdge> {
        edges
            .iter()
            .find(|edge| edge.alias == selector)
            .or_else(|| {
                edges.iter().find(|edge| {
                    edge.target
                        .is_some_and(|id| self.node(id).package_name == selector)
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn node(file: &str, package: &str, imports: Vec<ImportEdge>) -> GraphNode {
        GraphNode {
            package_name: package.to_string(),
            path: PathModel::new(Path::new("/src"), file),
            sibling_files: vec![],
            imports,
        }
    }

    fn edge(alias: &str, explicit: bool, path: &str, target: Option<usize>) -> ImportEdge {
        ImportEdge {
            alias: alias.to_string(),
            explicit_alias: explicit,
            import_path: path.to_string(),
            target: target.map(NodeId),
        }
    }

    /// root -> {a, nest(aliased)}, a -> nest, nest -> (external "time")
    fn diamond() -> DependencyGraph {
        let nodes = vec![
            node(
                "app/api/api.go",
                "api",
                vec![
                    edge("pkg1", false, "app/pkg1", Some(1)),
                    edge("nestpkg", true, "app/pkg2/nest", Some(2)),
                ],
            ),
            node("app/pkg1/const.go", "pkg1", vec![edge("nest", false, "app/pkg2/nest", Some(2))]),
            node("app/pkg2/nest/nest.go", "nest", vec![edge("time", false, "time", None)]),
        ];
        let by_absolute = nodes
            .iter()
            .enumerate()
            .map(|(idx, n)| (n.path.absolute_file_path.clone(), NodeId(idx)))
            .collect();
        DependencyGraph::from_arena(nodes, by_absolute, NodeId(0))
    }

    #[test]
    fn test_unique_paths_collapse_fan_in() {
        let graph = diamond();
        assert_eq!(
            graph.unique_file_paths(),
            vec![
                "app/api/api.go".to_string(),
                "app/pkg1/const.go".to_string(),
                "app/pkg2/nest/nest.go".to_string(),
            ]
        );
        assert_eq!(graph.unique_dir_paths().len(), 3);
        assert_eq!(graph.unique_file_paths_from(NodeId(1)).len(), 2);
    }

    #[test]
    fn test_imports_for_path() {
        let graph = diamond();
        assert_eq!(graph.imports_for_path("app/pkg1/const.go").len(), 1);
        assert!(graph.imports_for_path("test").is_empty());
    }

    #[test]
    fn test_find_import_prefers_alias() {
        let graph = diamond();
        let edges = &graph.root().imports;

        let found = graph.find_import("nestpkg", edges).unwrap();
        assert!(found.explicit_alias);
        assert_eq!(found.import_path, "app/pkg2/nest");

        let found = graph.find_import("pkg1", edges).unwrap();
        assert_eq!(found.target, Some(NodeId(1)));
    }

    #[test]
    fn test_find_import_falls_back_to_package_name() {
        let graph = diamond();
        let edges = &graph.root().imports;

        // "nest" is not an alias in the root file, but it is the target's package name
        let found = graph.find_import("nest", edges).unwrap();
        assert_eq!(found.alias, "nestpkg");
        assert!(graph.find_import("missing", edges).is_none());
    }

    #[test]
    fn test_alias_match_beats_earlier_package_match() {
        let mut graph = diamond();
        // Edge 0 targets a package named "shared"; edge 1 is explicitly aliased "shared"
        graph.nodes[1].package_name = "shared".to_string();
        graph.nodes[0].imports[1].alias = "shared".to_string();

        let found = graph.find_import("shared", &graph.root().imports).unwrap();
        assert_eq!(found.import_path, "app/pkg2/nest");
    }
}
