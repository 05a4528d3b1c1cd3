mod fields;
mod functions;
mod helpers;
mod specs;
mod types;

pub use fields::{classify, FieldShape, Shape, TypeExpr};
pub use specs::ImportSpec;

use crate::error::Result;
use crate::extractors::base::{BaseExtractor, ParseResult};
use crate::utils::paths::PathModel;
use tree_sitter::Tree;

/// Go declaration extractor for one source file:
/// - interfaces become function signatures
/// - structs and array aliases become records
/// - aliases of named types become scalar aliases
/// - `const` blocks become enum entries
pub struct GoExtractor {
    base: BaseExtractor,
    package_name: String,
}

/// Allocator of synthetic `const` block ids, shared across every file of a run
#[derive(Debug, Default)]
pub struct BlockIds {
    next: u32,
}

impl BlockIds {
    pub fn next(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl GoExtractor {
    /// The package name comes from the package clause, falling back to the
    /// directory name for files without one
    pub fn new(path: PathModel, content: String, tree: &Tree) -> Self {
        let base = BaseExtractor::new(path, content);
        let package_name = helpers::named_children(tree.root_node())
            .into_iter()
            .find(|node| node.kind() == "package_clause")
            .and_then(helpers::first_named_child)
            .map(|ident| base.get_node_text(&ident))
            .unwrap_or_else(|| {
                base.path
                    .source_path
                    .rsplit('/')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            });

        Self { base, package_name }
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn path(&self) -> &PathModel {
        &self.base.path
    }

    /// Every top-level type and const declaration of the file
    pub fn extract_declarations(&self, tree: &Tree, block_ids: &mut BlockIds) -> Result<ParseResult> {
        let mut result = ParseResult::default();

        for node in helpers::named_children(tree.root_node()) {
            match node.kind() {
                "type_declaration" => self.extract_type_declaration(node, &mut result)?,
                "const_declaration" => {
                    let block_id = block_ids.next();
                    result
                        .enums
                        .extend(self.extract_const_block(node, block_id)?);
                }
                _ => {}
            }
        }

        Ok(result)
    }
}
