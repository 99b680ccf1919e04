use std::cmp::Ordering;
use std::fmt;

use jsonschema::JSONSchema;
use jsonschema::error::ValidationErrorKind;
use serde_json::Value;
use tracing::{debug, trace};

use webir_common::{EXTENDS_KEY, SchemaViolation, ViolationCode, ViolationLocation};

/// The JSON Schema every IR document must satisfy.
pub const IR_SCHEMA: &str = include_str!("../resources/ir.schema.json");

/// A compiled IR schema.
///
/// Build one per call site with [`SchemaValidator::new`] and reuse it for
/// as many documents as needed.
pub struct SchemaValidator {
    schema: JSONSchema,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator").finish_non_exhaustive()
    }
}

/// Outcome of validating one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub violations: Vec<SchemaViolation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn into_result(self) -> Result<(), Vec<SchemaViolation>> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(self.violations)
        }
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaValidator {
    pub fn new() -> Self {
        let schema: Value = serde_json::from_str(IR_SCHEMA).expect("bundled IR schema is JSON");
        let schema = JSONSchema::compile(&schema).expect("bundled IR schema compiles");
        SchemaValidator { schema }
    }

    /// Checks `document` and collects every violation, ordered by where it
    /// sits in the document.
    pub fn validate(&self, document: &Value) -> ValidationReport {
        let mut violations: Vec<SchemaViolation> = match self.schema.validate(document) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|error| {
                    let pointer = error.instance_path.to_string();
                    let missing = match &error.kind {
                        ValidationErrorKind::Required { property } => Some(
                            property
                                .as_str()
                                .map_or_else(|| property.to_string(), str::to_string),
                        ),
                        _ => None,
                    };
                    trace!(%pointer, kind = ?error.kind, "schema error");
                    violation(document, &pointer, missing)
                })
                .collect(),
        };

        violations.sort_by(|a, b| compare(document, a, b));
        // A wrongly typed `kind` fails both its type and its enum.
        violations.dedup();

        debug!(violations = violations.len(), "validated IR document");
        ValidationReport { violations }
    }
}

/// Translates one schema error into a located, coded violation.
///
/// `missing` names the absent property when the error is a `required`
/// failure on the object at `pointer`.
fn violation(document: &Value, pointer: &str, missing: Option<String>) -> SchemaViolation {
    let tokens = pointer_tokens(pointer);
    let found = document.pointer(pointer).map_or("nothing", json_type);

    if let Some(field) = missing {
        let mut tokens = tokens;
        tokens.push(field.clone());
        return SchemaViolation::new(
            ViolationCode::MissingField,
            locate(&tokens),
            format!("missing required field '{field}'"),
        );
    }

    let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();
    let location = locate_str(&tokens);
    let value = document.pointer(pointer);

    let (code, message) = match tokens.as_slice() {
        [] => (
            ViolationCode::DocumentNotObject,
            format!("IR document must be a JSON object, found {found}"),
        ),
        [EXTENDS_KEY] => (
            ViolationCode::ExtendsNotObject,
            format!("'{EXTENDS_KEY}' must be an object, found {found}"),
        ),
        [EXTENDS_KEY, child] => (
            ViolationCode::ParentsNotArray,
            format!("parents of '{child}' must be an array, found {found}"),
        ),
        [EXTENDS_KEY, child, n, ..] => (
            ViolationCode::ParentNotString,
            format!("parent {n} of '{child}' must be a string, found {found}"),
        ),
        [interface] => (
            ViolationCode::EntriesNotArray,
            format!("members of '{interface}' must be an array, found {found}"),
        ),
        [_, _] => (
            ViolationCode::EntryNotObject,
            format!("member entry must be an object, found {found}"),
        ),
        [_, _, "parameters", _] => (
            ViolationCode::ParameterNotObject,
            format!("parameter must be an object, found {found}"),
        ),
        [_, _, "kind"] => match value {
            Some(Value::String(text)) => (
                ViolationCode::UnknownKind,
                format!("unknown kind '{text}', expected one of method, property, event"),
            ),
            _ => wrong_type("kind", "a string", found),
        },
        [_, _, "name"] => match value {
            Some(Value::String(text)) if text.is_empty() => (
                ViolationCode::EmptyName,
                "field 'name' must not be empty".to_string(),
            ),
            _ => wrong_type("name", "a non-empty string", found),
        },
        [_, _, field @ ("arity" | "required")] => match value.and_then(Value::as_i64) {
            Some(count) if count < 0 => (
                ViolationCode::NegativeCount,
                format!("field '{field}' must not be negative, found {count}"),
            ),
            _ => wrong_type(field, "a non-negative integer", found),
        },
        [.., field] => wrong_type(field, expected(field), found),
    };
    SchemaViolation::new(code, location, message)
}

fn wrong_type(field: &str, expected: &str, found: &str) -> (ViolationCode, String) {
    (
        ViolationCode::WrongFieldType,
        format!("field '{field}' must be {expected}, found {found}"),
    )
}

/// Shape the schema requires for a field, for messages.
fn expected(field: &str) -> &'static str {
    match field {
        "parameters" => "an array",
        "arity" | "required" => "a non-negative integer",
        "optional" | "rest" => "a boolean",
        _ => "a string",
    }
}

fn locate(tokens: &[String]) -> ViolationLocation {
    let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();
    locate_str(&tokens)
}

fn locate_str(tokens: &[&str]) -> ViolationLocation {
    match tokens {
        [] => ViolationLocation::root(),
        [EXTENDS_KEY, child, ..] => ViolationLocation::interface(EXTENDS_KEY).with_field(child),
        [interface] => ViolationLocation::interface(interface),
        [interface, index, rest @ ..] => {
            let Ok(index) = index.parse::<usize>() else {
                return ViolationLocation::interface(interface).with_field(index);
            };
            let location = ViolationLocation::entry(interface, index);
            match rest {
                [] => location,
                ["parameters", n, field @ ..] => match (n.parse::<usize>(), field.first()) {
                    (Ok(n), Some(field)) => location.with_parameter(n).with_field(field),
                    (Ok(n), None) => location.with_parameter(n),
                    (Err(_), _) => location.with_field("parameters"),
                },
                [field, ..] => location.with_field(field),
            }
        }
    }
}

fn pointer_tokens(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// Document order of interfaces first, then entry, parameter and field.
fn compare(document: &Value, a: &SchemaViolation, b: &SchemaViolation) -> Ordering {
    let position = |location: &ViolationLocation| {
        let keys = document.as_object();
        location
            .interface
            .as_deref()
            .and_then(|name| keys.and_then(|map| map.keys().position(|key| key == name)))
    };
    position(&a.location)
        .cmp(&position(&b.location))
        .then_with(|| a.location.index.cmp(&b.location.index))
        .then_with(|| a.location.parameter.cmp(&b.location.parameter))
        .then_with(|| a.location.field.cmp(&b.location.field))
        .then_with(|| a.code.code().cmp(&b.code.code()))
        .then_with(|| a.message.cmp(&b.message))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
