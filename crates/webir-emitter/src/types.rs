use std::fmt;

/// Gleam type a declared type text maps to.
///
/// Mapping is total: anything without a direct counterpart becomes the
/// opaque `JsUnknown` handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetType {
    String,
    Bool,
    Float,
    Nil,
    Opaque,
}

impl TargetType {
    pub fn from_type_text(type_text: &str) -> Self {
        match type_text.trim() {
            "string" => TargetType::String,
            "boolean" => TargetType::Bool,
            "number" | "float" | "double" => TargetType::Float,
            "void" => TargetType::Nil,
            _ => TargetType::Opaque,
        }
    }

    pub fn gleam_name(self) -> &'static str {
        match self {
            TargetType::String => "String",
            TargetType::Bool => "Bool",
            TargetType::Float => "Float",
            TargetType::Nil => "Nil",
            TargetType::Opaque => "JsUnknown",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.gleam_name())
    }
}
