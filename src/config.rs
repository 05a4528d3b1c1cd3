//! Run configuration
//!
//! The core treats these values as opaque strings: it only checks that the
//! required ones are non-empty and threads them into path derivation.

use crate::error::{ModelError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// The directory import paths are resolved against (`$GOPATH/src`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRoot {
    dir: PathBuf,
}

impl SourceRoot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Derive the search root from the `GOPATH` environment variable
    pub fn from_env() -> Result<Self> {
        Self::from_gopath(std::env::var_os("GOPATH"))
    }

    pub fn from_gopath(gopath: Option<OsString>) -> Result<Self> {
        match gopath {
            Some(gopath) if !gopath.is_empty() => Ok(Self::new(PathBuf::from(gopath).join("src"))),
            _ => Err(ModelError::MissingGoPath),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Absolute location of a search-root relative path
    pub fn join(&self, relative: &str) -> PathBuf {
        crate::utils::paths::to_absolute_native(relative, &self.dir)
    }
}

fn default_root_package_name() -> String {
    "root".to_string()
}

fn default_service_name() -> String {
    "Service".to_string()
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("out")
}

/// Transpiler settings, usually loaded from a JSON file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranspilerConfig {
    /// Import path prefix that marks an import as local (e.g. `example.com/team/project`)
    pub module_root: String,
    /// Entry file, relative to the search root
    pub entry_file: String,
    /// Dotted prefix prepended to generated proto packages
    #[serde(default)]
    pub package_prefix: String,
    /// Slash separated prefix for `option go_package`
    pub go_package_prefix: String,
    #[serde(default = "default_root_package_name")]
    pub root_package_name: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    /// Base type rewrites applied to every field (`WizardPath` -> `StringArray`)
    #[serde(default)]
    pub type_renames: BTreeMap<String, String>,
    /// Forced enum group names keyed by constant name
    #[serde(default)]
    pub enum_groups: BTreeMap<String, String>,
}

impl TranspilerConfig {
    pub fn new(
        module_root: impl Into<String>,
        entry_file: impl Into<String>,
        go_package_prefix: impl Into<String>,
    ) -> Self {
        Self {
            module_root: module_root.into(),
            entry_file: entry_file.into(),
            package_prefix: String::new(),
            go_package_prefix: go_package_prefix.into(),
            root_package_name: default_root_package_name(),
            service_name: default_service_name(),
            out_dir: default_out_dir(),
            type_renames: BTreeMap::new(),
            enum_groups: BTreeMap::new(),
        }
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("module_root", &self.module_root),
            ("entry_file", &self.entry_file),
            ("go_package_prefix", &self.go_package_prefix),
            ("root_package_name", &self.root_package_name),
            ("service_name", &self.service_name),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ModelError::InvalidConfig {
                    reason: format!("{name} must not be empty"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_gopath_is_config_error() {
        let err = SourceRoot::from_gopath(None).unwrap_err();
        assert!(matches!(err, ModelError::MissingGoPath));
        assert!(err.is_config());

        let err = SourceRoot::from_gopath(Some(OsString::new())).unwrap_err();
        assert!(matches!(err, ModelError::MissingGoPath));
    }

    #[test]
    fn test_gopath_maps_to_src_dir() {
        let root = SourceRoot::from_gopath(Some(OsString::from("/home/dev/go"))).unwrap();
        assert_eq!(root.dir(), Path::new("/home/dev/go/src"));
        assert_eq!(
            root.join("example.com/app/a.go"),
            PathBuf::from("/home/dev/go/src/example.com/app/a.go")
        );
    }

    #[test]
    fn test_load_applies_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "module_root": "example.com/app",
                "entry_file": "example.com/app/api/api.go",
                "go_package_prefix": "example.com/app/gen",
                "type_renames": {{ "WizardPath": "StringArray" }}
            }}"#
        )
        .unwrap();

        let config = TranspilerConfig::load(file.path()).unwrap();
        assert_eq!(config.root_package_name, "root");
        assert_eq!(config.service_name, "Service");
        assert_eq!(config.out_dir, PathBuf::from("out"));
        assert_eq!(config.type_renames["WizardPath"], "StringArray");
        assert!(config.enum_groups.is_empty());
    }

    #[test]
    fn test_validate_rejects_empty_module_root() {
        let config = TranspilerConfig::new("  ", "a.go", "gen");
        let err = config.validate().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("module_root"));
    }
}
