//! Tests for einvoice-model types.

use einvoice_model::{BaseType, FieldKind, FieldValue, SchemaDocument};

const SCHEMA: &str = r#"{
    "rules": [
        {"key": "Note", "label": "Invoice note", "type": "text", "required": false},
        {"key": "IssueDate", "label": "Issue date", "required": true}
    ],
    "validations": [
        {"name": "NoteType", "base_type": "string", "resource": {}, "max_length": 300},
        {"name": "IssueDateType", "base_type": "date", "resource": []}
    ],
    "defaultFields": {"Note": "Thank you"},
    "components": [
        {"type": "InvoiceType", "elements": [
            {"name": "Note", "min": 0, "max": 1},
            {"name": "IssueDate", "min": 1, "max": 1}
        ]},
        {"type": "NoteType", "elements": []},
        {"type": "IssueDateType"}
    ],
    "excluded": []
}"#;

#[test]
fn schema_document_deserializes() {
    let schema: SchemaDocument = serde_json::from_str(SCHEMA).expect("parse schema");
    assert_eq!(schema.components.len(), 3);
    assert_eq!(schema.components[0].elements.len(), 2);
    assert!(schema.components[2].is_leaf());
    assert_eq!(schema.components[2].field_key(), "IssueDate");
    assert_eq!(schema.default_fields["Note"], "Thank you");
    assert!(schema.rules[1].required);
    assert_eq!(schema.rules[0].rule_type.as_deref(), Some("text"));
    assert_eq!(schema.validations[1].base_type, BaseType::Date);
}

#[test]
fn missing_sections_default_to_empty() {
    let schema: SchemaDocument = serde_json::from_str("{}").expect("parse empty schema");
    assert!(schema.is_empty());
    assert!(schema.excluded.is_empty());
    assert!(schema.default_fields.is_empty());
}

#[test]
fn field_kind_serializes_with_tag() {
    let json = serde_json::to_value(FieldKind::Numeric).unwrap();
    assert_eq!(json, serde_json::json!({"kind": "numeric"}));
}

#[test]
fn field_values_serialize_untagged() {
    let values = vec![
        FieldValue::Text("INV-1".to_string()),
        FieldValue::Number(12.5),
        FieldValue::Bool(false),
    ];
    let json = serde_json::to_string(&values).unwrap();
    assert_eq!(json, r#"["INV-1",12.5,false]"#);
}
