//! Go Declaration Extractors Module
//!
//! Tree-sitter based extraction of the declarations a schema is generated
//! from: interface methods, structs, aliases and constant-block enums.
//!
//! # Architecture
//!
//! - `base` - model types and the shared per-file extractor state
//! - `go` - the Go declaration extractor and the field classifier
//! - `manager` - ExtractorManager, extraction over package directories
//! - `overrides` - post-extraction field and enum rewrites
//! - `factory` - the resolve, extract, override pipeline

pub mod base;
pub mod factory;
pub mod go;
pub mod manager;
pub mod overrides;

// Re-export the public API
pub use base::{
    EnumEntry, EnumGroup, Field, FunctionSignature, ParseResult, RecordType, ScalarAlias,
    Selector,
};
pub use factory::{extract_source_model, SourceModel};
pub use manager::ExtractorManager;
pub use overrides::{EnumOverride, FieldOverride, FieldOwner, OverrideReport, Overrides};
