use chrono::{TimeZone, Utc};
use docseed_analyze::{AnalyzerOptions, SchemaAnalyzer, constraints};
use docseed_core::{
    Element, Facets, FieldDefinition, FieldValue, Kind, Required, SchemaDefinition,
    TimestampLabels,
};
use serde_json::json;

fn person_schema() -> SchemaDefinition {
    SchemaDefinition::new(vec![
        FieldDefinition::new("_id", Kind::ObjectId),
        FieldDefinition::new("__v", Kind::Integer),
        FieldDefinition::new("name", Kind::Text).required(true).trim(),
        FieldDefinition::new("age", Kind::Integer).min(0_i64).max(120_i64),
        FieldDefinition::new("referee", Kind::ObjectId).reference("Person"),
        FieldDefinition::map_of("labels", FieldDefinition::element(Kind::Text)),
        FieldDefinition::new("labels.$*", Kind::Text),
    ])
}

#[test]
fn skips_reserved_and_wildcard_paths() {
    let tree = constraints(&person_schema());
    let paths: Vec<&str> = tree.paths().collect();
    assert_eq!(paths, vec!["name", "age", "referee", "labels"]);
}

#[test]
fn user_exclusions_are_unioned_with_reserved_paths() {
    let analyzer = SchemaAnalyzer::new(AnalyzerOptions::excluding(["age"]));
    let tree = analyzer.constraints(&person_schema());
    assert!(!tree.contains("age"));
    assert!(!tree.contains("_id"));
    assert!(tree.contains("name"));
}

#[test]
fn copies_scalar_facets() {
    let tree = constraints(&person_schema());

    let name = tree.get("name").expect("name node");
    assert!(matches!(name.required, Some(Required::Literal(true))));
    match &name.facets {
        Facets::Text(text) => assert!(text.trim),
        other => panic!("unexpected facets: {other:?}"),
    }

    let age = tree.get("age").expect("age node");
    match &age.facets {
        Facets::Integer(number) => {
            assert_eq!(number.min, Some(0.0));
            assert_eq!(number.max, Some(120.0));
        }
        other => panic!("unexpected facets: {other:?}"),
    }

    let referee = tree.get("referee").expect("referee node");
    assert_eq!(referee.reference().map(|r| r.resolve()).as_deref(), Some("Person"));
}

#[test]
fn normalizes_legacy_array_facets() {
    let raw = json!({
        "fields": [
            { "path": "code", "type": "text", "required": [true, "code is required"],
              "minlength": [2], "maxlength": [4, "too long"], "enum": ["ab", "abc", 12] },
            { "path": "score", "type": "float", "min": [1], "max": [5, "max 5"], "enum": [1, "2.5"] },
            { "path": "born", "type": "timestamp", "min": ["1990-01-01"], "max": "2000-01-01T00:00:00Z" }
        ]
    });
    let schema = SchemaDefinition::from_json_str(&raw.to_string()).expect("parse schema");
    let tree = constraints(&schema);

    let code = tree.get("code").expect("code node");
    assert!(matches!(code.required, Some(Required::Literal(true))));
    match &code.facets {
        Facets::Text(text) => {
            assert_eq!(text.minlength, Some(2));
            assert_eq!(text.maxlength, Some(4));
            assert_eq!(text.enumeration, vec!["ab", "abc", "12"]);
        }
        other => panic!("unexpected facets: {other:?}"),
    }

    match &tree.get("score").expect("score node").facets {
        Facets::Float(number) => {
            assert_eq!(number.min, Some(1.0));
            assert_eq!(number.max, Some(5.0));
            assert_eq!(number.enumeration, vec![1.0, 2.5]);
        }
        other => panic!("unexpected facets: {other:?}"),
    }

    match &tree.get("born").expect("born node").facets {
        Facets::Timestamp(ts) => {
            assert_eq!(ts.min, Some(Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap()));
            assert_eq!(ts.max, Some(Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()));
        }
        other => panic!("unexpected facets: {other:?}"),
    }
}

#[test]
fn recurses_into_embedded_schemas() {
    let schema = SchemaDefinition::new(vec![FieldDefinition::embedded(
        "address",
        SchemaDefinition::new(vec![
            FieldDefinition::new("_id", Kind::ObjectId),
            FieldDefinition::new("city", Kind::Text).required(true),
            FieldDefinition::new("zip", Kind::Text),
        ]),
    )]);
    let tree = constraints(&schema);

    match &tree.get("address").expect("address node").facets {
        Facets::Embedded(child) => {
            let paths: Vec<&str> = child.paths().collect();
            assert_eq!(paths, vec!["city", "zip"]);
        }
        other => panic!("unexpected facets: {other:?}"),
    }
}

#[test]
fn describes_list_elements() {
    let schema = SchemaDefinition::new(vec![
        FieldDefinition::list_of("tags", FieldDefinition::element(Kind::Text)),
        FieldDefinition::list_of(
            "grid",
            FieldDefinition::element(Kind::List).of(
                FieldDefinition::element(Kind::List).of(FieldDefinition::element(Kind::Int32)),
            ),
        ),
        FieldDefinition::list_of(
            "items",
            FieldDefinition::element(Kind::Embedded).with_schema(SchemaDefinition::new(vec![
                FieldDefinition::new("sku", Kind::Text),
                FieldDefinition::new("qty", Kind::Integer),
            ])),
        ),
        FieldDefinition::list_of(
            "friends",
            FieldDefinition::element(Kind::ObjectId).reference("Person"),
        ),
    ]);
    let tree = constraints(&schema);

    match &tree.get("tags").expect("tags").facets {
        Facets::List(list) => {
            assert!(matches!(list.of, Element::Primitive(Kind::Text)));
            assert!(list.reference.is_none());
        }
        other => panic!("unexpected facets: {other:?}"),
    }

    match &tree.get("grid").expect("grid").facets {
        Facets::List(list) => match &list.of {
            Element::List(inner) => match &inner.of {
                Element::List(innermost) => {
                    assert!(matches!(innermost.of, Element::Primitive(Kind::Int32)));
                }
                other => panic!("unexpected element: {other:?}"),
            },
            other => panic!("unexpected element: {other:?}"),
        },
        other => panic!("unexpected facets: {other:?}"),
    }

    match &tree.get("items").expect("items").facets {
        Facets::List(list) => match &list.of {
            Element::Document(child) => assert_eq!(child.len(), 2),
            other => panic!("unexpected element: {other:?}"),
        },
        other => panic!("unexpected facets: {other:?}"),
    }

    let friends = tree.get("friends").expect("friends");
    assert_eq!(friends.reference().map(|r| r.resolve()).as_deref(), Some("Person"));
}

#[test]
fn describes_map_values() {
    let schema = SchemaDefinition::new(vec![
        FieldDefinition::map_of("counters", FieldDefinition::element(Kind::Integer)),
        FieldDefinition::map_of(
            "contacts",
            FieldDefinition::element(Kind::Embedded).with_schema(SchemaDefinition::new(vec![
                FieldDefinition::new("email", Kind::Text),
            ])),
        ),
    ]);
    let tree = constraints(&schema);

    match &tree.get("counters").expect("counters").facets {
        Facets::Map(map) => assert!(matches!(map.of, Element::Primitive(Kind::Integer))),
        other => panic!("unexpected facets: {other:?}"),
    }
    match &tree.get("contacts").expect("contacts").facets {
        Facets::Map(map) => match &map.of {
            Element::Document(child) => assert!(child.contains("email")),
            other => panic!("unexpected element: {other:?}"),
        },
        other => panic!("unexpected facets: {other:?}"),
    }
}

#[test]
fn keeps_producers_and_timestamp_labels() {
    let schema = SchemaDefinition::new(vec![
        FieldDefinition::new("status", Kind::Text).default_value("draft"),
        FieldDefinition::new("notes", Kind::Text)
            .required_when(|doc| doc.get("status").and_then(FieldValue::as_str) == Some("done")),
    ])
    .with_timestamps(TimestampLabels::default());
    let tree = constraints(&schema);

    let status = tree.get("status").expect("status");
    assert!(!status.depends_on_siblings());
    assert!(tree.get("notes").expect("notes").depends_on_siblings());
    assert_eq!(
        tree.get("createdAt").map(|node| node.kind()),
        Some(Kind::Timestamp)
    );
    assert!(tree.contains("updatedAt"));
}
