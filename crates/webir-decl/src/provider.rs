//! The Declaration Provider boundary.
//!
//! The extractor only needs interface names, `extends` edges and raw
//! member signatures. `DtsSource` supplies them from TypeScript declaration
//! text; tests and embedders can hand over prepared `InterfaceDecl`s.

use indexmap::IndexMap;
use indexmap::map::Entry;
use std::path::Path;
use tracing::debug;

use crate::declarations::{InterfaceDecl, parse_declarations};
use crate::error::DeclError;
use crate::scanner::tokenize;

/// Declaration file read when no `--lib` path is configured.
pub const DEFAULT_LIB_PATH: &str = "node_modules/typescript/lib/lib.dom.d.ts";

pub trait DeclarationProvider {
    /// Every interface, one declaration per name, in first-seen order.
    fn interfaces(&self) -> Result<Vec<InterfaceDecl>, DeclError>;
}

impl DeclarationProvider for [InterfaceDecl] {
    fn interfaces(&self) -> Result<Vec<InterfaceDecl>, DeclError> {
        Ok(merge_declarations(self.to_vec()))
    }
}

impl DeclarationProvider for Vec<InterfaceDecl> {
    fn interfaces(&self) -> Result<Vec<InterfaceDecl>, DeclError> {
        self.as_slice().interfaces()
    }
}

/// TypeScript declaration text, e.g. the contents of `lib.dom.d.ts`.
#[derive(Debug, Clone)]
pub struct DtsSource {
    name: String,
    text: String,
}

impl DtsSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        DtsSource {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, DeclError> {
        let text = std::fs::read_to_string(path).map_err(|source| DeclError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(DtsSource::new(path.display().to_string(), text))
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl DeclarationProvider for DtsSource {
    fn interfaces(&self) -> Result<Vec<InterfaceDecl>, DeclError> {
        let tokens = tokenize(&self.text)?;
        let declarations = parse_declarations(&self.text, &tokens)?;
        debug!(
            source = %self.name,
            tokens = tokens.len(),
            declarations = declarations.len(),
            "parsed declaration source"
        );
        Ok(merge_declarations(declarations))
    }
}

/// Combine repeated declarations of one interface.
///
/// Members are appended in source order; parents are appended when not
/// already listed.
fn merge_declarations(declarations: Vec<InterfaceDecl>) -> Vec<InterfaceDecl> {
    let mut merged: IndexMap<String, InterfaceDecl> = IndexMap::new();
    for decl in declarations {
        match merged.entry(decl.name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(decl);
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                for parent in decl.extends {
                    if !existing.extends.contains(&parent) {
                        existing.extends.push(parent);
                    }
                }
                existing.members.extend(decl.members);
            }
        }
    }
    merged.into_values().collect()
}
