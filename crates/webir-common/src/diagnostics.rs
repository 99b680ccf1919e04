use serde::Serialize;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationCode {
    DocumentNotObject,
    EntriesNotArray,
    EntryNotObject,
    MissingField,
    WrongFieldType,
    UnknownKind,
    EmptyName,
    NegativeCount,
    ParameterNotObject,
    ExtendsNotObject,
    ParentsNotArray,
    ParentNotString,
}

impl ViolationCode {
    pub fn code(self) -> u32 {
        match self {
            ViolationCode::DocumentNotObject => 1001,
            ViolationCode::EntriesNotArray => 1002,
            ViolationCode::EntryNotObject => 1003,
            ViolationCode::MissingField => 1004,
            ViolationCode::WrongFieldType => 1005,
            ViolationCode::UnknownKind => 1006,
            ViolationCode::EmptyName => 1007,
            ViolationCode::NegativeCount => 1008,
            ViolationCode::ParameterNotObject => 1009,
            ViolationCode::ExtendsNotObject => 1010,
            ViolationCode::ParentsNotArray => 1011,
            ViolationCode::ParentNotString => 1012,
        }
    }
}

/// Where a violation sits inside the candidate IR document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ViolationLocation {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn interface(name: &str) -> Self {
        ViolationLocation {
            interface: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn entry(interface: &str, index: usize) -> Self {
        ViolationLocation {
            interface: Some(interface.to_string()),
            index: Some(index),
            ..Self::default()
        }
    }

    pub fn with_parameter(mut self, parameter: usize) -> Self {
        self.parameter = Some(parameter);
        self
    }

    pub fn with_field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    /// JSON pointer to the offending value, e.g. `/Element/0/parameters/1/type`.
    pub fn instance_path(&self) -> String {
        let mut path = String::new();
        if let Some(interface) = &self.interface {
            path.push('/');
            path.push_str(&escape_pointer_token(interface));
        }
        if let Some(index) = self.index {
            path.push_str(&format!("/{index}"));
        }
        if let Some(parameter) = self.parameter {
            path.push_str(&format!("/parameters/{parameter}"));
        }
        if let Some(field) = &self.field {
            path.push('/');
            path.push_str(&escape_pointer_token(field));
        }
        path
    }
}

fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaViolation {
    pub code: ViolationCode,
    pub instance_path: String,
    pub location: ViolationLocation,
    pub message: String,
}

impl SchemaViolation {
    pub fn new(code: ViolationCode, location: ViolationLocation, message: impl Into<String>) -> Self {
        SchemaViolation {
            code,
            instance_path: location.instance_path(),
            location,
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.instance_path.is_empty() {
            "/"
        } else {
            &self.instance_path
        };
        write!(f, "{path}: {}", self.message)
    }
}
