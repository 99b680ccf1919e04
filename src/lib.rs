//! webir: DOM interface IR extraction, schema validation and Gleam binding
//! emission.
//!
//! The pipeline lives in the workspace crates and is re-exported here:
//! declarations are read by `webir_decl`, checked by `webir_schema`, and
//! turned into bindings by `webir_emitter`.

// IR data model, naming rules, diagnostics and the error taxonomy
pub use webir_common::{
    EXTENDS_KEY, ExtendsMap, Ir, IrDocument, MemberEntry, MemberKind, MethodEntry, Parameter,
    PropertyEntry, SchemaViolation, ViolationCode, ViolationLocation, WebirError, event_name,
    is_event_name, to_pascal, to_snake,
};

// Declaration provider and IR extractor
pub use webir_decl::{
    DEFAULT_LIB_PATH, DeclError, DeclarationProvider, DtsSource, Extraction, InterfaceDecl,
    extract, extract_declarations,
};

// Schema validator
pub use webir_schema::{SchemaValidator, ValidationReport};

// Inheritance resolution and binding emission
pub use webir_emitter::{
    BindingTarget, DEFAULT_PACKAGE_NAME, EmitError, EmitOptions, EmittedFile, GleamEmitter,
    InheritanceResolver, TargetType, write_files,
};

// Tracing subscriber setup for the binary
pub mod tracing_config;

// Command-line interface: arguments, configuration, reporting and dispatch
pub mod cli;
