use crate::types::TargetType;

#[test]
fn maps_primitive_type_texts() {
    let cases = [
        ("string", "String"),
        ("boolean", "Bool"),
        ("number", "Float"),
        ("float", "Float"),
        ("double", "Float"),
        ("void", "Nil"),
        ("  string ", "String"),
    ];
    for (text, expected) in cases {
        assert_eq!(TargetType::from_type_text(text).gleam_name(), expected, "{text}");
    }
}

#[test]
fn everything_else_is_opaque() {
    for text in [
        "any",
        "unknown",
        "",
        "string | null",
        "Node",
        "Promise<void>",
        "(Node | string)[]",
        "String",
        "bigint",
    ] {
        assert_eq!(TargetType::from_type_text(text), TargetType::Opaque, "{text}");
    }
    assert_eq!(TargetType::Opaque.to_string(), "JsUnknown");
}
