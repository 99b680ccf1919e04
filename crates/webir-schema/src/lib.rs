//! Schema Validator for webir IR documents.
//!
//! The validator checks a parsed JSON value against the bundled JSON Schema
//! (`resources/ir.schema.json`) every IR document must satisfy before
//! bindings are emitted. It never stops at the first problem: every
//! violation is collected and reported.

pub mod validator;
pub use validator::{IR_SCHEMA, SchemaValidator, ValidationReport};

#[cfg(test)]
#[path = "tests/validator_tests.rs"]
mod validator_tests;
