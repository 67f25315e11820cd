//! # yeti-codegen
//!
//! Turns a parsed Yeti schema into SQL DDL text.
//!
//! The orchestration is fixed and dialect-agnostic: per namespace it emits
//! schema creation, enum types (when the target supports them), tables with
//! inline column constraints, and finally foreign keys as a trailing pass so
//! circular references between entities resolve. Targeting a new SQL engine
//! means implementing [`SqlDialect`] and [`TemplateProvider`], nothing else.
//!
//! ```rust
//! use yeti_codegen::postgres;
//! use yeti_core::parse_document;
//!
//! let source = "namespace app:\n  entity users:\n    id: serial @pk\n";
//! let result = parse_document(source).unwrap();
//! let sql = postgres().generate(&result.ast).unwrap();
//!
//! assert!(sql.contains("CREATE SCHEMA IF NOT EXISTS \"app\";"));
//! assert!(sql.contains("PRIMARY KEY"));
//! ```

pub mod dialect;
mod error;
mod fk;
pub mod generator;
pub mod postgres;
pub mod templates;

pub use dialect::SqlDialect;
pub use error::GenerateError;
pub use fk::ForeignKeyRef;
pub use generator::SqlGenerator;
pub use postgres::{postgres, PostgresDialect, PostgresTemplates};
pub use templates::{ForeignKeyParts, TemplateProvider};

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, GenerateError>;
