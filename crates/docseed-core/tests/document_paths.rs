use docseed_core::{Document, DocumentId, FieldValue, Kind};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::json;

#[test]
fn dotted_paths_expand_into_nested_documents() {
    let mut doc = Document::new();
    doc.insert_path("address.city", FieldValue::from("Lisbon"));
    doc.insert_path("address.geo.lat", FieldValue::Float(38.7));
    doc.insert_path("name", FieldValue::from("Ana"));

    assert_eq!(doc.len(), 2);
    assert_eq!(
        doc.get_path("address.city").and_then(FieldValue::as_str),
        Some("Lisbon")
    );
    assert!(doc.contains_path("address.geo.lat"));
    assert!(!doc.contains_path("address.zip"));
    assert_eq!(
        doc.to_json(),
        json!({ "address": { "city": "Lisbon", "geo": { "lat": 38.7 } }, "name": "Ana" })
    );
}

#[test]
fn scalar_on_intermediate_segment_is_replaced() {
    let mut doc = Document::new();
    doc.insert_path("meta", FieldValue::Int(1));
    doc.insert_path("meta.source", FieldValue::from("seed"));
    assert_eq!(
        doc.get_path("meta.source").and_then(FieldValue::as_str),
        Some("seed")
    );
}

#[test]
fn document_ids_parse_their_display_form() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let id = DocumentId::from_rng(&mut rng);
    let hex = id.to_string();
    assert_eq!(hex.len(), 24);
    assert_eq!(hex.parse::<DocumentId>().expect("parse id"), id);
    assert!(id.timestamp().is_some());

    assert!("not-hex".parse::<DocumentId>().is_err());
    assert!("abcd".parse::<DocumentId>().is_err());
}

#[test]
fn depth_counts_compound_nesting() {
    let leaf = FieldValue::Int(1);
    let array = FieldValue::Array(vec![leaf.clone()]);
    let nested: Document = [("inner".to_string(), array.clone())].into_iter().collect();
    let value = FieldValue::Document(nested);

    assert_eq!(leaf.depth(), 0);
    assert_eq!(array.depth(), 1);
    assert_eq!(value.depth(), 2);
    assert!(value.conforms_to(Kind::Embedded));
    assert!(value.conforms_to(Kind::Mixed));
    assert!(!leaf.conforms_to(Kind::Text));
}
