// Utilities Module
//
// File enumeration and path conversion shared by the resolver and the extractors.

/// File utilities
pub mod file_utils {
    use crate::error::{ModelError, Result};
    use crate::language::is_go_source;
    use std::fs;
    use std::path::Path;

    /// Names of the Go source files directly inside `dir`, sorted
    ///
    /// Sorting keeps graph construction and extraction independent of the
    /// order the file system hands entries back.
    pub fn go_files_in_dir(dir: &Path) -> Result<Vec<String>> {
        if !dir.is_dir() {
            return Err(ModelError::io(
                dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "directory does not exist"),
            ));
        }

        let pattern = format!(
            "{}/*.go",
            glob::Pattern::escape(&dir.to_string_lossy())
        );
        let entries = glob::glob(&pattern).map_err(|e| {
            ModelError::io(
                dir,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()),
            )
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| ModelError::io(dir, e.into_error()))?;
            if !path.is_file() || !is_go_source(&path) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Read file content
    pub fn read_file_content(path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| ModelError::io(path, e))
    }
}

/// Path conversion utilities (PathModel, absolute <-> relative Unix-style)
pub mod paths;

#[cfg(test)]
mod tests {
    use super::file_utils::*;
    use std::fs;

    #[test]
    fn test_go_files_in_dir_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.go"), "package p\n").unwrap();
        fs::write(dir.path().join("a.go"), "package p\n").unwrap();
        fs::write(dir.path().join("a_test.go"), "package p\n").unwrap();
        fs::write(dir.path().join("notes.md"), "# notes\n").unwrap();
        fs::create_dir(dir.path().join("nested.go")).unwrap();

        let files = go_files_in_dir(dir.path()).unwrap();
        assert_eq!(files, vec!["a.go".to_string(), "b.go".to_string()]);
    }

    #[test]
    fn test_go_files_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = go_files_in_dir(&dir.path().join("missing")).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }
}
