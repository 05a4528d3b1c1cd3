// goproto core - tree-sitter based Go source model extraction
//
// Resolves the import graph of a Go entry file, extracts the declarations of
// every local package it reaches and renders them as proto3 schemas.
// Architecture: parse once per file, arena graph, declarative model, writers on top.

pub mod config;
pub mod error;
pub mod extractors;
pub mod graph;
pub mod language;
pub mod utils;
pub mod writers;

pub use config::{SourceRoot, TranspilerConfig};
pub use error::{ModelError, Result};
pub use extractors::{extract_source_model, Overrides, ParseResult, SourceModel};
pub use graph::DependencyGraph;
