//! otorp-compiler
//!
//! Turns C# classes into proto3 messages. This crate implements:
//!  1) A type map from C# property types to proto types (`type_map`),
//!  2) A line-based property extractor with snake_case field naming (`extractor`),
//!  3) A run-wide import accumulator (`imports`),
//!  4) Proto3 document emission and atomic persistence (`emitter`),
//!  5) A directory runner tying it together (`runner`), and the `OtorpError` type.

pub mod error;
pub mod types;
pub mod utils;
pub mod type_map;
pub mod imports;
pub mod extractor;
pub mod emitter;
pub mod runner;

pub use emitter::{emit_message, persist};
pub use error::OtorpError;
pub use extractor::extract_properties;
pub use imports::ImportSet;
pub use runner::{run, RunConfiguration};
pub use type_map::map_type;
pub use types::{MessageDocument, PersistResult, PropertyDeclaration, RunReport, SchemaType};
