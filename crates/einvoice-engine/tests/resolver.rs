//! Resolver behaviour over small and realistic schemas.

use einvoice_engine::{RemovablePool, Resolution, resolve};
use einvoice_model::{BaseType, Component, ElementRef, FieldKind, Rule, SchemaDocument, Validation};
use einvoice_schema::{TypeGraph, parse_schema};
use proptest::prelude::*;

const MY_SCHEMA: &str = include_str!("../../../schemas/MY.json");

fn minimal(excluded: &[&str]) -> SchemaDocument {
    SchemaDocument {
        rules: vec![Rule::new("Leaf", "Leaf Field", false)],
        validations: vec![Validation::new("LeafType", BaseType::String)],
        default_fields: Default::default(),
        components: vec![
            Component {
                component_type: "RootType".to_string(),
                elements: vec![ElementRef {
                    name: "Leaf".to_string(),
                    min: 0,
                    max: Some(1),
                }],
            },
            Component::leaf("LeafType"),
        ],
        excluded: excluded.iter().map(|s| s.to_string()).collect(),
    }
}

fn run(schema: SchemaDocument, pool: &RemovablePool) -> Resolution {
    let graph = TypeGraph::build(schema);
    let excluded = graph.exclusion_set();
    resolve(&graph, &excluded, pool)
}

fn keys(resolution: &Resolution) -> Vec<&str> {
    resolution
        .payload_keys
        .iter()
        .map(|spec| spec.key.as_str())
        .collect()
}

#[test]
fn minimal_schema_resolves_one_text_field() {
    let resolution = run(minimal(&[]), &RemovablePool::new());

    assert_eq!(resolution.fields.len(), 1);
    let field = &resolution.fields[0];
    assert_eq!(field.field_key, "Leaf");
    assert_eq!(field.kind, FieldKind::Text);
    assert_eq!(field.label, "Leaf Field");
    assert!(!field.required);
    assert!(field.removable);
    assert_eq!(field.path.as_str(), "RootType|LeafType");
    assert_eq!(keys(&resolution), ["Leaf"]);
}

#[test]
fn excluded_root_resolves_nothing() {
    let resolution = run(minimal(&["RootType"]), &RemovablePool::new());
    assert!(resolution.fields.is_empty());
    assert!(resolution.payload_keys.is_empty());
}

#[test]
fn removed_leaf_is_skipped() {
    let mut pool = RemovablePool::new();
    pool.insert("LeafType");
    let resolution = run(minimal(&[]), &pool);
    assert!(resolution.is_empty());
    assert_eq!(resolution.stats.removed, 1);
}

#[test]
fn shared_descendant_is_rendered_once() {
    let schema = SchemaDocument {
        validations: vec![Validation::new("AmountType", BaseType::Decimal)],
        components: vec![
            Component::container("InvoiceType", ["Line", "Total"]),
            Component::container("LineType", ["Amount"]),
            Component::container("TotalType", ["Amount"]),
            Component::leaf("AmountType"),
        ],
        ..SchemaDocument::default()
    };
    let resolution = run(schema, &RemovablePool::new());
    assert_eq!(keys(&resolution), ["Amount"]);
    assert_eq!(
        resolution.fields[0].path.as_str(),
        "InvoiceType|LineType|AmountType"
    );
    assert_eq!(resolution.fields[0].kind, FieldKind::Numeric);
}

#[test]
fn cycles_and_dangling_references_degrade_to_placeholders() {
    let schema = SchemaDocument {
        validations: vec![Validation::new("NoteType", BaseType::String)],
        components: vec![
            Component::container("AType", ["B", "Missing"]),
            Component::container("BType", ["A", "Note"]),
            Component::leaf("NoteType"),
            Component::leaf("OrphanType"),
        ],
        ..SchemaDocument::default()
    };
    let resolution = run(schema, &RemovablePool::new());
    assert_eq!(keys(&resolution), ["Note"]);
    // MissingType is undefined and OrphanType has no validation.
    assert_eq!(resolution.stats.placeholders, 2);
    assert!(resolution.stats.duplicates >= 1);
}

#[test]
fn leaf_declared_before_parent_keeps_its_short_path() {
    let schema = SchemaDocument {
        validations: vec![Validation::new("NoteType", BaseType::String)],
        components: vec![
            Component::leaf("NoteType"),
            Component::container("InvoiceType", ["Note"]),
        ],
        ..SchemaDocument::default()
    };
    let resolution = run(schema, &RemovablePool::new());
    assert_eq!(resolution.fields.len(), 1);
    assert_eq!(resolution.fields[0].path.as_str(), "NoteType");
}

#[test]
fn invoice_schema_resolves_in_declaration_order() {
    let schema = parse_schema(MY_SCHEMA, "MY.json").unwrap();
    let resolution = run(schema, &RemovablePool::new());

    assert_eq!(
        keys(&resolution),
        [
            "ID",
            "IssueDate",
            "InvoiceTypeCode",
            "DocumentCurrencyCode",
            "Note",
            "PartyName",
            "CityName",
            "PostalZone",
            "CountrySubentityCode",
            "CompanyID",
            "TaxAmount",
            "TaxableAmount",
            "Percent",
            "TaxExemptionReason",
            "PayableAmount",
            "PrepaidAmount",
            "PrepaidIndicator",
        ]
    );
    assert!(resolution.field("SignatureMethod").is_none());
    assert_eq!(resolution.stats.excluded, 2);
    assert_eq!(resolution.stats.placeholders, 1);

    let currency = resolution.field("DocumentCurrencyCode").unwrap();
    assert!(!currency.required);
    assert!(!currency.removable);
    assert_eq!(currency.kind.widget(), "select");

    let postal = resolution.field("PostalZone").unwrap();
    assert_eq!(postal.label, "PostalZone");

    let percent = resolution.field("Percent").unwrap();
    assert_eq!(
        percent.path.as_str(),
        "InvoiceType|TaxTotalType|TaxSubtotalType|TaxCategoryType|PercentType"
    );
}

fn arb_schema() -> impl Strategy<Value = SchemaDocument> {
    let children = prop::collection::vec(prop::collection::vec(0usize..10, 0..3), 10);
    let excluded = prop::collection::vec(0usize..10, 0..2);
    let validated = prop::collection::vec(any::<bool>(), 10);
    (children, excluded, validated).prop_map(|(children, excluded, validated)| {
        let name = |i: usize| format!("N{i}");
        let components = children
            .iter()
            .enumerate()
            .map(|(i, kids)| {
                Component::container(format!("N{i}Type"), kids.iter().map(|&k| name(k)))
            })
            .collect();
        let validations = validated
            .iter()
            .enumerate()
            .filter(|(_, has)| **has)
            .map(|(i, _)| Validation::new(format!("N{i}Type"), BaseType::String))
            .collect();
        SchemaDocument {
            validations,
            components,
            excluded: excluded.iter().map(|&i| format!("N{i}Type")).collect(),
            ..SchemaDocument::default()
        }
    })
}

proptest! {
    #[test]
    fn resolution_is_deterministic(schema in arb_schema()) {
        let pool = RemovablePool::new();
        let first = run(schema.clone(), &pool);
        let second = run(schema, &pool);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn excluded_subtrees_contribute_nothing(schema in arb_schema()) {
        let graph = TypeGraph::build(schema);
        let excluded = graph.exclusion_set();
        let resolution = resolve(&graph, &excluded, &RemovablePool::new());
        for field in &resolution.fields {
            prop_assert!(!excluded.contains(&field.component_type));
        }
        for spec in &resolution.payload_keys {
            prop_assert!(!excluded.contains(&spec.component_type));
        }
    }

    #[test]
    fn every_type_is_rendered_at_most_once(schema in arb_schema()) {
        let resolution = run(schema, &RemovablePool::new());
        let mut seen = std::collections::HashSet::new();
        for field in &resolution.fields {
            prop_assert!(seen.insert(field.component_type.clone()));
        }
        prop_assert_eq!(resolution.fields.len(), resolution.payload_keys.len());
    }
}
