// Base extractor types
//
// - types.rs: the extracted model (fields, records, aliases, enum entries, signatures)
// - extractor.rs: BaseExtractor, per-file source text and node helpers

pub mod extractor;
pub mod types;

// Re-export key types for external use
pub use extractor::BaseExtractor;
pub use types::{
    EnumEntry, EnumGroup, Field, FunctionSignature, ParseResult, RecordType, ScalarAlias,
    Selector, DEFAULT_ENUM_GROUP, DEFAULT_ENUM_UNDERLYING, INTERFACE_TYPE, UNKNOWN_TYPE,
};
