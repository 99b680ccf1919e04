//! The canonical intermediate representation.
//!
//! An [`Ir`] maps every interface name to the members it declares itself,
//! in declaration order. Inherited members are never stored here; they are
//! merged at emission time from the [`ExtendsMap`].
//!
//! On disk both maps travel together as an [`IrDocument`]:
//!
//! ```json
//! {
//!   "Node": [{ "kind": "property", "interface": "Node", "name": "nodeName", "type": "string" }],
//!   "__extends__": { "Element": ["Node"] }
//! }
//! ```

use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Reserved top-level key holding the extends map in an IR document.
pub const EXTENDS_KEY: &str = "__extends__";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_text: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub rest: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_text: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            type_text: type_text.into(),
            optional: false,
            rest: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn rest(mut self) -> Self {
        self.rest = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Method,
    Property,
    Event,
}

impl MemberKind {
    pub const ALL: [MemberKind; 3] = [MemberKind::Method, MemberKind::Property, MemberKind::Event];

    pub fn as_str(self) -> &'static str {
        match self {
            MemberKind::Method => "method",
            MemberKind::Property => "property",
            MemberKind::Event => "event",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == text)
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodEntry {
    pub interface: String,
    pub name: String,
    pub parameters: Vec<Parameter>,
    /// Number of declared parameters.
    #[serde(default)]
    pub arity: usize,
    /// Number of parameters not marked optional.
    #[serde(default)]
    pub required: usize,
    pub return_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub this_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl MethodEntry {
    pub fn new(
        interface: impl Into<String>,
        name: impl Into<String>,
        parameters: Vec<Parameter>,
        return_type: impl Into<String>,
    ) -> Self {
        let mut entry = MethodEntry {
            interface: interface.into(),
            name: name.into(),
            parameters,
            arity: 0,
            required: 0,
            return_type: return_type.into(),
            this_type: None,
            doc: None,
        };
        entry.refresh_counts();
        entry
    }

    /// Recompute `arity` and `required` from the parameter list.
    pub fn refresh_counts(&mut self) {
        self.arity = self.parameters.len();
        self.required = self.parameters.iter().filter(|p| !p.optional).count();
    }
}

/// Shape shared by property and event entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyEntry {
    pub interface: String,
    pub name: String,
    #[serde(rename = "type")]
    pub type_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl PropertyEntry {
    pub fn new(
        interface: impl Into<String>,
        name: impl Into<String>,
        type_text: impl Into<String>,
    ) -> Self {
        PropertyEntry {
            interface: interface.into(),
            name: name.into(),
            type_text: type_text.into(),
            doc: None,
        }
    }
}

/// One method, property or event handler belonging to an interface.
///
/// The variant is fixed when the entry is created and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MemberEntry {
    Method(MethodEntry),
    Property(PropertyEntry),
    Event(PropertyEntry),
}

impl MemberEntry {
    pub fn kind(&self) -> MemberKind {
        match self {
            MemberEntry::Method(_) => MemberKind::Method,
            MemberEntry::Property(_) => MemberKind::Property,
            MemberEntry::Event(_) => MemberKind::Event,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MemberEntry::Method(m) => &m.name,
            MemberEntry::Property(p) | MemberEntry::Event(p) => &p.name,
        }
    }

    pub fn interface(&self) -> &str {
        match self {
            MemberEntry::Method(m) => &m.interface,
            MemberEntry::Property(p) | MemberEntry::Event(p) => &p.interface,
        }
    }

    pub fn doc(&self) -> Option<&str> {
        match self {
            MemberEntry::Method(m) => m.doc.as_deref(),
            MemberEntry::Property(p) | MemberEntry::Event(p) => p.doc.as_deref(),
        }
    }

    pub fn with_doc(mut self, doc: Option<String>) -> Self {
        match &mut self {
            MemberEntry::Method(m) => m.doc = doc,
            MemberEntry::Property(p) | MemberEntry::Event(p) => p.doc = doc,
        }
        self
    }
}

/// Interface name -> own members, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ir(IndexMap<String, Vec<MemberEntry>>);

impl Ir {
    pub fn new() -> Self {
        Ir(IndexMap::new())
    }

    /// Append entries to an interface, creating it on first use.
    pub fn extend_interface(&mut self, name: &str, entries: impl IntoIterator<Item = MemberEntry>) {
        self.0.entry(name.to_string()).or_default().extend(entries);
    }

    pub fn insert(&mut self, name: impl Into<String>, entries: Vec<MemberEntry>) {
        self.0.insert(name.into(), entries);
    }

    /// Own members of `name`; empty when the interface is not in the IR.
    pub fn members(&self, name: &str) -> &[MemberEntry] {
        self.0.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MemberEntry])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|name, _| keep(name));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn members_mut(&mut self) -> impl Iterator<Item = &mut MemberEntry> {
        self.0.values_mut().flat_map(|entries| entries.iter_mut())
    }
}

/// Interface name -> ordered direct parent names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtendsMap(IndexMap<String, Vec<String>>);

impl ExtendsMap {
    pub fn new() -> Self {
        ExtendsMap(IndexMap::new())
    }

    /// Record a direct parent, ignoring duplicates.
    pub fn add_parent(&mut self, child: &str, parent: &str) {
        let parents = self.0.entry(child.to_string()).or_default();
        if !parents.iter().any(|p| p == parent) {
            parents.push(parent.to_string());
        }
    }

    pub fn insert(&mut self, child: impl Into<String>, parents: Vec<String>) {
        self.0.insert(child.into(), parents);
    }

    /// Direct parents of `name`; empty when it has none or is unknown.
    pub fn parents(&self, name: &str) -> &[String] {
        self.0.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|name, _| keep(name));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, P> FromIterator<(K, Vec<P>)> for ExtendsMap
where
    K: Into<String>,
    P: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Vec<P>)>>(edges: I) -> Self {
        let mut map = ExtendsMap::new();
        for (child, parents) in edges {
            map.insert(child, parents.into_iter().map(Into::into).collect());
        }
        map
    }
}

/// The serialized IR: interface keys plus the reserved extends key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IrDocument {
    pub ir: Ir,
    pub extends: ExtendsMap,
}

impl IrDocument {
    pub fn new(ir: Ir, extends: ExtendsMap) -> Self {
        IrDocument { ir, extends }
    }

    /// Build a document from already-parsed JSON, recomputing derived counts.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for IrDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.ir.len() + 1))?;
        for (name, entries) in self.ir.iter() {
            map.serialize_entry(name, entries)?;
        }
        map.serialize_entry(EXTENDS_KEY, &self.extends)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for IrDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = IrDocument;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping interface names to member arrays")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<IrDocument, A::Error> {
                let mut document = IrDocument::default();
                while let Some(key) = access.next_key::<String>()? {
                    if key == EXTENDS_KEY {
                        document.extends = access.next_value()?;
                    } else {
                        let entries: Vec<MemberEntry> = access.next_value()?;
                        document.ir.insert(key, entries);
                    }
                }
                for entry in document.ir.members_mut() {
                    if let MemberEntry::Method(method) = entry {
                        method.refresh_counts();
                    }
                }
                Ok(document)
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}
