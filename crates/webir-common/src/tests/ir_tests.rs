use crate::ir::*;
use serde_json::json;

#[test]
fn method_entry_derives_counts() {
    let entry = MethodEntry::new(
        "Element",
        "setAttribute",
        vec![
            Parameter::new("qualifiedName", "string"),
            Parameter::new("value", "string").optional(),
        ],
        "void",
    );

    assert_eq!(entry.arity, 2);
    assert_eq!(entry.required, 1);
}

#[test]
fn document_round_trips_with_reserved_key_last() {
    let mut ir = Ir::new();
    ir.insert(
        "Node",
        vec![MemberEntry::Property(PropertyEntry::new(
            "Node", "nodeName", "string",
        ))],
    );
    let extends: ExtendsMap = [("Element", vec!["Node"])].into_iter().collect();
    let document = IrDocument::new(ir, extends);

    let json = serde_json::to_value(&document).expect("serialize");
    let keys: Vec<&String> = json.as_object().expect("object").keys().collect();
    assert_eq!(keys, vec!["Node", EXTENDS_KEY]);
    assert_eq!(json["Node"][0]["kind"], "property");
    assert_eq!(json["Node"][0]["type"], "string");

    let back = IrDocument::from_value(json).expect("deserialize");
    assert_eq!(back, document);
}

#[test]
fn loading_recomputes_method_counts() {
    let value = json!({
        "Element": [{
            "interface": "Element",
            "kind": "method",
            "name": "getAttribute",
            "parameters": [{ "name": "name", "type": "string", "optional": false, "rest": false }],
            "returnType": "string"
        }]
    });

    let document = IrDocument::from_value(value).expect("valid document");
    let MemberEntry::Method(method) = &document.ir.members("Element")[0] else {
        panic!("expected a method entry");
    };
    assert_eq!(method.arity, 1);
    assert_eq!(method.required, 1);
    assert!(document.extends.is_empty());
}

#[test]
fn loading_keeps_declared_kind() {
    // "onclick" would classify as an event, but the file says property.
    let value = json!({
        "Button": [{ "interface": "Button", "kind": "property", "name": "onclick", "type": "any" }]
    });

    let document = IrDocument::from_value(value).expect("valid document");
    assert_eq!(document.ir.members("Button")[0].kind(), MemberKind::Property);
}

#[test]
fn key_order_is_preserved() {
    let text = r#"{"Zeta": [], "Alpha": [], "Mid": [], "__extends__": {}}"#;
    let document: IrDocument = serde_json::from_str(text).expect("parse");
    let names: Vec<&str> = document.ir.names().collect();
    assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
}

#[test]
fn extends_map_ignores_duplicate_parents() {
    let mut extends = ExtendsMap::new();
    extends.add_parent("HTMLElement", "Element");
    extends.add_parent("HTMLElement", "ElementCSSInlineStyle");
    extends.add_parent("HTMLElement", "Element");

    assert_eq!(
        extends.parents("HTMLElement"),
        &["Element".to_string(), "ElementCSSInlineStyle".to_string()]
    );
    assert!(extends.parents("Unknown").is_empty());
}

#[test]
fn member_kind_parse_is_closed() {
    assert_eq!(MemberKind::parse("event"), Some(MemberKind::Event));
    assert_eq!(MemberKind::parse("getter"), None);
    assert_eq!(MemberKind::parse("Method"), None);
}
