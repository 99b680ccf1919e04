//! Common types and utilities for webir.
//!
//! This crate provides the foundational types shared by every webir crate:
//! - The IR data model (`MemberEntry`, `Parameter`, `Ir`, `ExtendsMap`, `IrDocument`)
//! - Naming rules (word splitting, PascalCase, the event-name pattern)
//! - Schema diagnostics (`SchemaViolation`, `ViolationCode`)
//! - The pipeline error taxonomy (`WebirError`)

// IR data model and its JSON file form
pub mod ir;
pub use ir::{
    EXTENDS_KEY, ExtendsMap, Ir, IrDocument, MemberEntry, MemberKind, MethodEntry, Parameter,
    PropertyEntry,
};

// Identifier case conversion and member classification
pub mod naming;
pub use naming::{event_name, is_event_name, to_pascal, to_snake};

// Structured schema violations
pub mod diagnostics;
pub use diagnostics::{SchemaViolation, ViolationCode, ViolationLocation};

pub mod error;
pub use error::WebirError;

#[cfg(test)]
#[path = "tests/ir_tests.rs"]
mod ir_tests;
#[cfg(test)]
#[path = "tests/naming_tests.rs"]
mod naming_tests;
#[cfg(test)]
#[path = "tests/diagnostics_tests.rs"]
mod diagnostics_tests;
