//! Inheritance resolution and binding emission for webir.
//!
//! - `inheritance` - Ancestor closure and merged member sets
//! - `types` - Declared type text to Gleam type mapping
//! - `gleam` - Gleam module rendering (interface, upcast, aggregator)
//! - `output` - Emitted files and writing them to disk

pub mod inheritance;
pub use inheritance::InheritanceResolver;

pub mod types;
pub use types::TargetType;

pub mod target;
pub use target::BindingTarget;

mod printer;

pub mod gleam;
pub use gleam::{DEFAULT_PACKAGE_NAME, EmitOptions, GleamEmitter};

pub mod output;
pub use output::{EmitError, EmittedFile, write_files};

#[cfg(test)]
#[path = "tests/inheritance_tests.rs"]
mod inheritance_tests;
#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod types_tests;
#[cfg(test)]
#[path = "tests/gleam_tests.rs"]
mod gleam_tests;
