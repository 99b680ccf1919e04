//! Declaration provider and IR extractor for webir.
//!
//! This crate turns TypeScript declaration text into the canonical IR:
//! - `scanner` - Tokenizer for `.d.ts` text (JSDoc comments attached to tokens)
//! - `declarations` - Interface declaration parser producing `InterfaceDecl`
//! - `provider` - The `DeclarationProvider` boundary and the bundled `DtsSource`
//! - `extract` - IR Extractor: member classification and the extends map

pub mod error;
pub use error::DeclError;

pub mod scanner;
pub use scanner::{Token, TokenKind, tokenize};

pub mod declarations;
pub use declarations::{InterfaceDecl, RawMember, RawMethod, RawParam, RawProperty};

pub mod provider;
pub use provider::{DEFAULT_LIB_PATH, DeclarationProvider, DtsSource};

pub mod extract;
pub use extract::{Extraction, extract, extract_declarations};

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod scanner_tests;
#[cfg(test)]
#[path = "tests/declarations_tests.rs"]
mod declarations_tests;
