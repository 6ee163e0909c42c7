//! scriptgen-compiler
//!
//! This crate implements:
//!  1) A line preprocessor and regex catalog for legacy script class sources,
//!  2) Parsers for data records, network messages/types and enum classes,
//!  3) Recovery of the wire order of protocol fields from their deserializers,
//!  4) The authoritative id registry,
//!  5) C# generators (`generate_protocol_class`, `generate_record_class`, `generate_enum`),
//!  6) A reference codec executing the same serialization plan the generators render,
//!  7) Error types (`GenError`) and the generator configuration.

pub mod error;
pub mod config;
pub mod patterns;
pub mod utils;
pub mod preprocess;
pub mod ir;
pub mod record_parser;
pub mod protocol_parser;
pub mod enum_parser;
pub mod ordering;
pub mod ids;
pub mod plan;
pub mod csharp;
pub mod codec;
pub mod gen_record;
pub mod gen_protocol;
pub mod gen_enum;

pub use config::GeneratorConfig;
pub use enum_parser::parse_enum_class;
pub use error::GenError;
pub use gen_enum::{generate_enum, generate_enum_file};
pub use gen_protocol::{generate_protocol_class, generate_protocol_file, ClassTable, GenContext, GeneratedFile};
pub use gen_record::{analyze_record, generate_record_class, generate_record_file};
pub use ids::IdRegistry;
pub use ir::Family;
pub use protocol_parser::parse_protocol_class;
pub use record_parser::parse_record_class;
