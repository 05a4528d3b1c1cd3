// Path conversion utilities
//
// Every extracted entity carries a PathModel: four views of one physical Go
// file, built once and never mutated. The relative views are Unix-style and
// relative to the search root ($GOPATH/src), so they double as import paths.

use crate::error::{ModelError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// Four co-located views of one source file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PathModel {
    /// Directory relative to the search root (`example.com/app/pkg1`)
    pub source_path: String,
    /// File relative to the search root (`example.com/app/pkg1/const.go`)
    pub source_file_path: String,
    pub absolute_file_path: PathBuf,
    pub absolute_dir_path: PathBuf,
}

impl PathModel {
    pub fn new(search_root: &Path, relative_file: &str) -> Self {
        let source_file_path = relative_file.replace('\\', "/");
        let source_path = match source_file_path.rfind('/') {
            Some(pos) => source_file_path[..pos].to_string(),
            None => String::new(),
        };
        let absolute_file_path = to_absolute_native(&source_file_path, search_root);
        let absolute_dir_path = absolute_file_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| search_root.to_path_buf());

        Self {
            source_path,
            source_file_path,
            absolute_file_path,
            absolute_dir_path,
        }
    }

    /// File name without its directory (`const.go`)
    pub fn file_name(&self) -> &str {
        self.source_file_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.source_file_path)
    }

    /// Directory relative to the module root, slash separated
    ///
    /// The module root directory itself maps to the empty string.
    pub fn schema_dir(&self, module_root: &str) -> Result<String> {
        let root = module_root.trim_end_matches('/');
        if self.source_path == root {
            return Ok(String::new());
        }
        self.source_path
            .strip_prefix(root)
            .and_then(|rest| rest.strip_prefix('/'))
            .map(str::to_string)
            .ok_or_else(|| ModelError::PathOutsideModule {
                path: self.source_path.clone(),
                root: module_root.to_string(),
            })
    }

    /// Destination schema namespace: module-relative directory, dot separated
    pub fn schema_namespace(&self, module_root: &str) -> Result<String> {
        Ok(self.schema_dir(module_root)?.replace('/', "."))
    }
}

/// Convert an absolute path to a relative Unix-style path (with `/` separators)
///
/// Both paths are canonicalized when they exist so symlinked temp dirs
/// (`/var` -> `/private/var` on macOS) still compare equal.
pub fn to_relative_unix_style(absolute: &Path, root: &Path) -> Result<String> {
    let (path_to_use, root_to_use) = match (absolute.canonicalize(), root.canonicalize()) {
        (Ok(canonical_abs), Ok(canonical_root)) => (canonical_abs, canonical_root),
        _ => (absolute.to_path_buf(), root.to_path_buf()),
    };

    let relative =
        path_to_use
            .strip_prefix(&root_to_use)
            .map_err(|_| ModelError::PathOutsideModule {
                path: path_to_use.display().to_string(),
                root: root_to_use.display().to_string(),
            })?;

    let path_str = relative.to_string_lossy();
    let unix_style = if MAIN_SEPARATOR == '\\' {
        path_str.replace('\\', "/")
    } else {
        path_str.into_owned()
    };

    Ok(unix_style)
}

/// Convert a relative Unix-style path to an absolute native path
///
/// `Path::join()` handles `/` separators on every platform.
pub fn to_absolute_native(relative_unix: &str, root: &Path) -> PathBuf {
    root.join(relative_unix)
}
