//! IR Extractor.
//!
//! Classification is decided here and only here:
//! - callable members become `method` entries;
//! - property members whose name matches the event pattern become `event`;
//! - every other property becomes `property`.

use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::{debug, warn};

use webir_common::{
    ExtendsMap, Ir, IrDocument, MemberEntry, MethodEntry, Parameter, PropertyEntry, is_event_name,
};

use crate::declarations::{InterfaceDecl, RawMember};
use crate::error::DeclError;
use crate::provider::DeclarationProvider;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub ir: Ir,
    pub extends: ExtendsMap,
    /// Interfaces with at least one member, in declaration order.
    pub interface_names: Vec<String>,
}

pub fn extract(provider: &(impl DeclarationProvider + ?Sized)) -> Result<Extraction, DeclError> {
    let declarations = provider.interfaces()?;
    Ok(extract_declarations(&declarations))
}

pub fn extract_declarations(declarations: &[InterfaceDecl]) -> Extraction {
    let mut extraction = Extraction::default();
    for decl in declarations {
        for parent in &decl.extends {
            extraction.extends.add_parent(&decl.name, parent);
        }

        let entries: Vec<MemberEntry> = decl
            .members
            .iter()
            .map(|member| member_entry(&decl.name, member))
            .collect();
        if entries.is_empty() {
            debug!(interface = %decl.name, "no extractable members, omitted from IR");
            continue;
        }
        debug!(interface = %decl.name, members = entries.len(), "extracted interface");
        if !extraction.ir.contains(&decl.name) {
            extraction.interface_names.push(decl.name.clone());
        }
        extraction.ir.extend_interface(&decl.name, entries);
    }
    extraction
}

fn member_entry(interface: &str, member: &RawMember) -> MemberEntry {
    match member {
        RawMember::Method(method) => {
            let parameters = method
                .params
                .iter()
                .map(|p| Parameter {
                    name: p.name.clone(),
                    type_text: p.type_text.clone(),
                    optional: p.optional,
                    rest: p.rest,
                })
                .collect();
            let mut entry =
                MethodEntry::new(interface, &method.name, parameters, &method.return_type);
            entry.this_type = method.this_type.clone();
            entry.doc = method.doc.clone();
            MemberEntry::Method(entry)
        }
        RawMember::Property(property) => {
            let mut entry = PropertyEntry::new(interface, &property.name, &property.type_text);
            entry.doc = property.doc.clone();
            if is_event_name(&property.name) {
                MemberEntry::Event(entry)
            } else {
                MemberEntry::Property(entry)
            }
        }
    }
}

impl Extraction {
    /// Keep only `selected` interfaces, plus the extends edges needed to
    /// resolve their ancestors.
    pub fn restrict(mut self, selected: &[String]) -> Extraction {
        if selected.is_empty() {
            return self;
        }
        for name in selected {
            if !self.ir.contains(name) {
                warn!(interface = %name, "requested interface has no extractable members");
            }
        }

        let wanted: FxHashSet<&str> = selected.iter().map(String::as_str).collect();
        self.ir.retain(|name| wanted.contains(name));
        self.interface_names.retain(|name| wanted.contains(name.as_str()));

        let mut reachable: FxHashSet<String> = FxHashSet::default();
        let mut queue: VecDeque<&str> = selected.iter().map(String::as_str).collect();
        while let Some(name) = queue.pop_front() {
            if !reachable.insert(name.to_string()) {
                continue;
            }
            queue.extend(self.extends.parents(name).iter().map(String::as_str));
        }
        self.extends.retain(|name| reachable.contains(name));
        self
    }

    pub fn sorted_interface_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.interface_names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn into_document(self) -> IrDocument {
        IrDocument::new(self.ir, self.extends)
    }
}
