//! Error types for model extraction.
//!
//! Every variant is fatal: the pipeline either produces the complete model or
//! aborts. Soft-skips (ignored declarations, map fields, unresolved selectors)
//! never surface here, they are logged through `tracing` instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    /// `GOPATH` is unset or empty, so no search root can be derived
    #[error("missing GOPATH: cannot locate the Go source tree")]
    MissingGoPath,

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{}': {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// A spec inside an import declaration is not an import spec
    #[error("unexpected non import in '{}'", path.display())]
    NotAnImport { path: PathBuf },

    #[error("unsupported shape in '{}': {reason}", path.display())]
    UnsupportedShape { path: PathBuf, reason: String },

    #[error("path '{path}' is not within module root '{root}'")]
    PathOutsideModule { path: String, root: String },
}

impl ModelError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ModelError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ModelError::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ModelError::UnsupportedShape {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for operator-controlled configuration failures
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ModelError::MissingGoPath | ModelError::InvalidConfig { .. }
        )
    }

    /// Returns true if a source file could not be parsed
    pub fn is_parse(&self) -> bool {
        matches!(self, ModelError::Parse { .. } | ModelError::NotAnImport { .. })
    }

    /// Returns true if a declaration or field shape cannot be represented
    pub fn is_unsupported(&self) -> bool {
        matches!(self, ModelError::UnsupportedShape { .. })
    }
}
