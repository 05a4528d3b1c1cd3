//! ExtractorManager - declaration extraction over a set of package directories
//!
//! Handles file enumeration and parsing, and hands every tree to the Go
//! extractor. Results from all files are merged and sorted once at the end.

use crate::error::Result;
use crate::extractors::base::ParseResult;
use crate::extractors::go::{BlockIds, GoExtractor};
use crate::language::parse_go;
use crate::utils::file_utils::{go_files_in_dir, read_file_content};
use crate::utils::paths::{to_relative_unix_style, PathModel};
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extracts the declarations of whole package directories
pub struct ExtractorManager {
    search_root: PathBuf,
}

impl ExtractorManager {
    /// `search_root` is the directory import paths are relative to
    pub fn new(search_root: impl Into<PathBuf>) -> Self {
        Self {
            search_root: search_root.into(),
        }
    }

    /// Extract every Go file directly inside each directory
    ///
    /// A directory listed more than once is extracted once. Any parse or
    /// shape error aborts the whole run.
    pub fn extract(&self, dirs: &[PathBuf]) -> Result<ParseResult> {
        let mut visited: FxHashSet<&Path> = FxHashSet::default();
        let mut block_ids = BlockIds::default();
        let mut result = ParseResult::default();
        let mut file_count = 0;

        for dir in dirs {
            if !visited.insert(dir.as_path()) {
                debug!("Skipping already extracted {}", dir.display());
                continue;
            }

            for file_name in go_files_in_dir(dir)? {
                let file_result = self.extract_file(&dir.join(&file_name), &mut block_ids)?;
                result.extend(file_result);
                file_count += 1;
            }
        }

        result.sort();
        info!(
            "Extracted {} functions, {} records, {} scalar aliases and {} enum entries from {} files",
            result.functions.len(),
            result.records.len(),
            result.scalar_aliases.len(),
            result.enums.len(),
            file_count
        );
        Ok(result)
    }

    /// Extract the declarations of one file
    pub fn extract_file(&self, absolute_file: &Path, block_ids: &mut BlockIds) -> Result<ParseResult> {
        let relative = to_relative_unix_style(absolute_file, &self.search_root)?;
        let path = PathModel::new(&self.search_root, &relative);

        let content = read_file_content(absolute_file)?;
        let tree = parse_go(&content, absolute_file)?;
        let extractor = GoExtractor::new(path, content, &tree);
        let result = extractor.extract_declarations(&tree, block_ids)?;

        debug!(
            "Extracted {} records and {} enum entries from {}",
            result.records.len(),
            result.enums.len(),
            relative
        );
        Ok(result)
    }
}
