use std::sync::Arc;

use docseed_analyze::constraints;
use docseed_core::{
    ConstraintNode, ConstraintTree, Document, Element, Facets, FieldDefinition, FieldValue,
    Kind, ListFacets, SchemaDefinition, TimestampLabels,
};
use docseed_generate::{
    FieldOverrides, GenerationError, Generator, GeneratorOptions, InMemoryStore, Registry,
};

fn generator(entity: &str, options: GeneratorOptions) -> Generator {
    let store = Arc::new(InMemoryStore::new());
    let collection = store.register(entity);
    let registry = Arc::new(Registry::new(store));
    Generator::new(collection, registry, options).expect("valid options")
}

fn seeded(seed: u64) -> GeneratorOptions {
    GeneratorOptions {
        seed: Some(seed),
        ..GeneratorOptions::default()
    }
}

#[tokio::test]
async fn required_fields_are_always_present_and_typed() {
    let schema = SchemaDefinition::new(vec![
        FieldDefinition::new("name", Kind::Text).required(true),
        FieldDefinition::new("age", Kind::Integer)
            .required(true)
            .min(0_i64)
            .max(120_i64),
        FieldDefinition::new("active", Kind::Boolean).required(true),
        FieldDefinition::new("token", Kind::Uuid).required(true),
        FieldDefinition::new("avatar", Kind::Bytes).required(true),
    ]);
    let tree = constraints(&schema);
    let mut generator = generator("Person", seeded(1));

    for _ in 0..200 {
        let doc = generator.generate(&tree).await.expect("generate");
        for node in &tree {
            let value = doc.get_path(&node.path).expect("required field present");
            assert!(value.conforms_to(node.kind()), "{} -> {value:?}", node.path);
        }
    }
}

#[tokio::test]
async fn optional_fields_follow_the_configured_probability() {
    let schema = SchemaDefinition::new(vec![
        FieldDefinition::new("nickname", Kind::Text),
        FieldDefinition::new("score", Kind::Float).required(false),
    ]);
    let tree = constraints(&schema);
    let mut generator = generator("Person", seeded(42));

    let total = 2000;
    let (mut nickname, mut score) = (0, 0);
    for _ in 0..total {
        let doc = generator.generate(&tree).await.expect("generate");
        nickname += usize::from(doc.contains_path("nickname"));
        score += usize::from(doc.contains_path("score"));
    }
    for present in [nickname, score] {
        let rate = present as f64 / total as f64;
        assert!((rate - 0.7).abs() < 0.05, "presence rate {rate}");
    }
}

#[tokio::test]
async fn zero_probability_omits_optional_fields() {
    let schema = SchemaDefinition::new(vec![
        FieldDefinition::new("nickname", Kind::Text),
        FieldDefinition::new("name", Kind::Text).required(true),
    ]);
    let tree = constraints(&schema);
    let mut generator = generator(
        "Person",
        GeneratorOptions {
            optional_field_probability: 0.0,
            ..seeded(3)
        },
    );
    for _ in 0..50 {
        let doc = generator.generate(&tree).await.expect("generate");
        assert!(!doc.contains_path("nickname"));
        assert!(doc.contains_path("name"));
    }
}

#[tokio::test]
async fn text_lengths_respect_declared_bounds() {
    let schema = SchemaDefinition::new(vec![
        FieldDefinition::new("code", Kind::Text)
            .required(true)
            .minlength(5)
            .maxlength(12),
        FieldDefinition::new("email", Kind::Text).required(true).maxlength(8),
        FieldDefinition::new("bio", Kind::Text).required(true).minlength(400),
        FieldDefinition::new("password", Kind::Text)
            .required(true)
            .minlength(80)
            .maxlength(100),
        FieldDefinition::new("passwordHash", Kind::Text).required(true),
    ]);
    let tree = constraints(&schema);
    let mut generator = generator("User", seeded(7));

    for _ in 0..300 {
        let doc = generator.generate(&tree).await.expect("generate");
        let len = |path: &str| {
            doc.get_path(path)
                .and_then(FieldValue::as_str)
                .map(|text| text.chars().count())
                .expect("text field")
        };
        assert!((5..=12).contains(&len("code")));
        assert!((1..=8).contains(&len("email")));
        assert!(len("bio") >= 400);
        assert!((80..=100).contains(&len("password")));
        assert_eq!(len("passwordHash"), 64);
    }
}

#[tokio::test]
async fn heuristics_pick_realistic_values() {
    let schema = SchemaDefinition::new(vec![
        FieldDefinition::new("email", Kind::Text).required(true),
        FieldDefinition::new("status", Kind::Text).required(true),
        FieldDefinition::new("passwordHash", Kind::Text).required(true),
    ]);
    let tree = constraints(&schema);
    let mut generator = generator("Order", seeded(9));

    let doc = generator.generate(&tree).await.expect("generate");
    let email = doc.get("email").and_then(FieldValue::as_str).expect("email");
    assert!(email.contains('@'));
    let status = doc.get("status").and_then(FieldValue::as_str).expect("status");
    assert!(
        ["pending", "paid", "shipped", "delivered", "cancelled", "refunded"].contains(&status)
    );
    let digest = doc.get("passwordHash").and_then(FieldValue::as_str).expect("digest");
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn numeric_values_stay_within_bounds() {
    let schema = SchemaDefinition::new(vec![
        FieldDefinition::new("age", Kind::Integer)
            .required(true)
            .min(0_i64)
            .max(120_i64),
        FieldDefinition::new("price", Kind::Float)
            .required(true)
            .min(10_i64)
            .max(20_i64),
        FieldDefinition::new("delta", Kind::Int32)
            .required(true)
            .min(-5_i64)
            .max(5_i64),
        FieldDefinition::new("balance", Kind::Decimal)
            .required(true)
            .min(1_i64)
            .max(2_i64),
        FieldDefinition::new("views", Kind::BigInt).required(true).min(1000_i64),
    ]);
    let tree = constraints(&schema);
    let mut generator = generator("Account", seeded(11));

    for _ in 0..500 {
        let doc = generator.generate(&tree).await.expect("generate");
        let number = |path: &str| doc.get(path).and_then(FieldValue::as_f64).expect(path);
        assert!((0.0..=120.0).contains(&number("age")));
        assert!(matches!(doc.get("age"), Some(FieldValue::Int(_))));
        assert!((10.0..=20.0).contains(&number("price")));
        assert!((-5.0..=5.0).contains(&number("delta")));
        assert!((1.0..=2.0).contains(&number("balance")));
        assert!(number("views") >= 1000.0);
        assert!(matches!(doc.get("views"), Some(FieldValue::Long(_))));
    }
}

#[tokio::test]
async fn extreme_numeric_bounds_still_generate() {
    let schema = SchemaDefinition::new(vec![
        FieldDefinition::new("reading", Kind::Float)
            .required(true)
            .min(-1.0e308)
            .max(1.0e308),
        FieldDefinition::new("ledger", Kind::Decimal)
            .required(true)
            .min(-1.0e300)
            .max(1.0e300),
    ]);
    let tree = constraints(&schema);
    let mut generator = generator("Sensor", seeded(17));

    let mut nonzero_ledgers = 0;
    for _ in 0..200 {
        let doc = generator.generate(&tree).await.expect("generate");
        let reading = doc.get("reading").and_then(FieldValue::as_f64).expect("reading");
        assert!(reading.is_finite());
        assert!((-1.0e308..=1.0e308).contains(&reading));

        let ledger = doc.get("ledger").and_then(FieldValue::as_f64).expect("ledger");
        assert!(matches!(doc.get("ledger"), Some(FieldValue::Decimal(_))));
        assert!(ledger.abs() <= 7.95e28, "{ledger}");
        nonzero_ledgers += usize::from(ledger != 0.0);
    }
    assert!(nonzero_ledgers > 190);
}

#[tokio::test]
async fn name_hints_shape_unbounded_numbers() {
    let schema = SchemaDefinition::new(vec![
        FieldDefinition::new("age", Kind::Integer).required(true),
        FieldDefinition::new("rating", Kind::Float).required(true),
        FieldDefinition::new("latitude", Kind::Float).required(true),
    ]);
    let tree = constraints(&schema);
    let mut generator = generator("Person", seeded(13));

    for _ in 0..200 {
        let doc = generator.generate(&tree).await.expect("generate");
        let number = |path: &str| doc.get(path).and_then(FieldValue::as_f64).expect(path);
        assert!((18.0..=90.0).contains(&number("age")));
        assert!((1.0..=5.0).contains(&number("rating")));
        assert!((-90.0..=90.0).contains(&number("latitude")));
    }
}

#[tokio::test]
async fn enumerations_and_patterns_are_honoured() {
    let schema = SchemaDefinition::new(vec![
        FieldDefinition::new("tier", Kind::Text)
            .required(true)
            .enumeration(["gold", "silver"]),
        FieldDefinition::new("level", Kind::Integer)
            .required(true)
            .enumeration([1, 3, 5]),
        FieldDefinition::new("sku", Kind::Text)
            .required(true)
            .pattern("^[A-Z]{3}-[0-9]{4}$"),
        FieldDefinition::new("broken", Kind::Text)
            .required(true)
            .pattern("(unclosed")
            .maxlength(20),
    ]);
    let tree = constraints(&schema);
    let sku_pattern = regex::Regex::new("^[A-Z]{3}-[0-9]{4}$").expect("regex");
    let mut generator = generator("Product", seeded(17));

    for _ in 0..100 {
        let doc = generator.generate(&tree).await.expect("generate");
        let tier = doc.get("tier").and_then(FieldValue::as_str).expect("tier");
        assert!(["gold", "silver"].contains(&tier));
        let level = doc.get("level").and_then(FieldValue::as_i64).expect("level");
        assert!([1, 3, 5].contains(&level));
        let sku = doc.get("sku").and_then(FieldValue::as_str).expect("sku");
        assert!(sku_pattern.is_match(sku), "{sku}");
        let broken = doc.get("broken").and_then(FieldValue::as_str).expect("broken");
        assert!(broken.chars().count() <= 20);
    }
}

#[tokio::test]
async fn case_flags_apply_after_generation() {
    let schema = SchemaDefinition::new(vec![
        FieldDefinition::new("city", Kind::Text).required(true).uppercase(),
        FieldDefinition::new("handle", Kind::Text)
            .required(true)
            .lowercase()
            .uppercase(),
    ]);
    let tree = constraints(&schema);
    let mut generator = generator("Venue", seeded(19));

    for _ in 0..50 {
        let doc = generator.generate(&tree).await.expect("generate");
        let city = doc.get("city").and_then(FieldValue::as_str).expect("city");
        assert_eq!(city, city.to_uppercase());
        let handle = doc.get("handle").and_then(FieldValue::as_str).expect("handle");
        assert_eq!(handle, handle.to_lowercase());
    }
}

#[tokio::test]
async fn mixed_values_never_exceed_depth_three() {
    let schema =
        SchemaDefinition::new(vec![FieldDefinition::new("payload", Kind::Mixed).required(true)]);
    let tree = constraints(&schema);
    let mut generator = generator("Event", seeded(23));

    let mut deepest = 0;
    for _ in 0..1000 {
        let doc = generator.generate(&tree).await.expect("generate");
        let depth = doc.get("payload").map(FieldValue::depth).expect("payload");
        assert!(depth <= 3, "depth {depth}");
        deepest = deepest.max(depth);
    }
    assert_eq!(deepest, 3);
}

#[tokio::test]
async fn compound_kinds_recurse() {
    let schema = SchemaDefinition::new(vec![
        FieldDefinition::embedded(
            "address",
            SchemaDefinition::new(vec![
                FieldDefinition::new("city", Kind::Text).required(true),
                FieldDefinition::new("zip", Kind::Text).required(true),
            ]),
        )
        .required(true),
        FieldDefinition::list_of("tags", FieldDefinition::element(Kind::Text)).required(true),
        FieldDefinition::list_of(
            "grid",
            FieldDefinition::element(Kind::List).of(FieldDefinition::element(Kind::Int32)),
        )
        .required(true),
        FieldDefinition::map_of("counters", FieldDefinition::element(Kind::Integer))
            .required(true),
        FieldDefinition::new("profile.nickname", Kind::Text).required(true),
    ]);
    let tree = constraints(&schema);
    let mut generator = generator("Customer", seeded(29));

    for _ in 0..50 {
        let doc = generator.generate(&tree).await.expect("generate");

        let address = doc.get("address").and_then(FieldValue::as_document).expect("address");
        assert!(address.get("city").is_some_and(|v| v.conforms_to(Kind::Text)));

        let tags = doc.get("tags").and_then(FieldValue::as_array).expect("tags");
        assert!((1..=10).contains(&tags.len()));
        assert!(tags.iter().all(|tag| tag.conforms_to(Kind::Text)));

        let grid = doc.get("grid").and_then(FieldValue::as_array).expect("grid");
        for row in grid {
            let row = row.as_array().expect("row");
            assert!((1..=10).contains(&row.len()));
            assert!(row.iter().all(|cell| matches!(cell, FieldValue::Int32(_))));
        }

        let counters = doc.get("counters").and_then(FieldValue::as_document).expect("counters");
        assert!((1..=5).contains(&counters.len()));

        assert!(doc.get_path("profile.nickname").is_some());
    }
}

#[tokio::test]
async fn timestamp_labels_share_one_instant() {
    let schema = SchemaDefinition::new(vec![FieldDefinition::new("title", Kind::Text)])
        .with_timestamps(TimestampLabels::default());
    let tree = constraints(&schema);
    let mut generator = generator(
        "Post",
        GeneratorOptions {
            timestamp_labels: Some(TimestampLabels::default()),
            ..seeded(31)
        },
    );

    for _ in 0..100 {
        let doc = generator.generate(&tree).await.expect("generate");
        let created = doc.get("createdAt").and_then(FieldValue::as_timestamp);
        let updated = doc.get("updatedAt").and_then(FieldValue::as_timestamp);
        assert!(created.is_some());
        assert_eq!(created, updated);
    }
}

#[tokio::test]
async fn timestamp_override_writes_both_labels() {
    let schema = SchemaDefinition::new(vec![]).with_timestamps(TimestampLabels::default());
    let tree = constraints(&schema);
    let mut generator = generator(
        "Post",
        GeneratorOptions {
            timestamp_labels: Some(TimestampLabels::default()),
            timestamp_override: Some(Arc::new(|_doc: &Document| {
                (FieldValue::from("created"), FieldValue::from("updated"))
            })),
            ..seeded(37)
        },
    );

    let doc = generator.generate(&tree).await.expect("generate");
    assert_eq!(doc.get("createdAt"), Some(&FieldValue::from("created")));
    assert_eq!(doc.get("updatedAt"), Some(&FieldValue::from("updated")));
}

#[tokio::test]
async fn dependent_fields_observe_independent_siblings() {
    let schema = SchemaDefinition::new(vec![
        FieldDefinition::new("summary", Kind::Text).default_with(|doc| {
            let status = doc
                .get("status")
                .and_then(FieldValue::as_str)
                .unwrap_or("missing");
            FieldValue::Text(format!("status={status}"))
        }),
        FieldDefinition::new("closedReason", Kind::Text)
            .required_when(|doc| doc.get("status").and_then(FieldValue::as_str) == Some("closed")),
        FieldDefinition::new("status", Kind::Text)
            .required(true)
            .enumeration(["open", "closed"]),
    ]);
    let tree = constraints(&schema);
    let mut generator = generator("Ticket", seeded(41));

    for _ in 0..100 {
        let doc = generator.generate(&tree).await.expect("generate");
        let status = doc.get("status").and_then(FieldValue::as_str).expect("status");
        assert_eq!(
            doc.get("summary").and_then(FieldValue::as_str),
            Some(format!("status={status}").as_str())
        );
        assert_eq!(doc.contains_path("closedReason"), status == "closed");
    }
}

#[tokio::test]
async fn defaults_overrides_and_setters() {
    let schema = SchemaDefinition::new(vec![
        FieldDefinition::new("kind", Kind::Text).default_value("internal"),
        FieldDefinition::new("name", Kind::Text).required(true),
        FieldDefinition::new("slug", Kind::Text)
            .required(true)
            .enumeration(["Hello World"])
            .set(|value| match value {
                FieldValue::Text(text) => FieldValue::Text(text.replace(' ', "-").to_lowercase()),
                other => other,
            }),
    ]);
    let tree = constraints(&schema);
    let options = GeneratorOptions {
        overrides: FieldOverrides::new().with("name", |_doc, _rng| FieldValue::from("fixed")),
        ..seeded(43)
    };
    let mut generator = generator("Page", options);

    let doc = generator.generate(&tree).await.expect("generate");
    assert_eq!(doc.get("kind"), Some(&FieldValue::from("internal")));
    assert_eq!(doc.get("name"), Some(&FieldValue::from("fixed")));
    assert_eq!(doc.get("slug"), Some(&FieldValue::from("hello-world")));
}

#[tokio::test]
async fn seeded_generators_are_deterministic() {
    let schema = SchemaDefinition::new(vec![
        FieldDefinition::new("name", Kind::Text).required(true),
        FieldDefinition::new("age", Kind::Integer),
        FieldDefinition::list_of("tags", FieldDefinition::element(Kind::Text)),
    ]);
    let tree = constraints(&schema);
    let mut first = generator("Person", seeded(47));
    let mut second = generator("Person", seeded(47));

    for _ in 0..20 {
        let left = first.generate(&tree).await.expect("generate");
        let right = second.generate(&tree).await.expect("generate");
        assert_eq!(left, right);
    }
}

#[tokio::test]
async fn compound_list_elements_are_rejected() {
    let mut node = ConstraintNode::new(
        "weird",
        Facets::List(ListFacets {
            of: Element::Primitive(Kind::Embedded),
            reference: None,
        }),
    );
    node.required = Some(true.into());
    let tree: ConstraintTree = [node].into_iter().collect();
    let mut generator = generator("Odd", seeded(53));

    let err = generator.generate(&tree).await.expect_err("unsupported");
    assert!(matches!(
        err,
        GenerationError::UnsupportedPrimitive {
            kind: Kind::Embedded,
            ..
        }
    ));
}

#[test]
fn invalid_probability_is_rejected() {
    let store = Arc::new(InMemoryStore::new());
    let collection = store.register("Person");
    let registry = Arc::new(Registry::new(store));
    let result = Generator::new(
        collection,
        registry,
        GeneratorOptions {
            optional_field_probability: 1.5,
            ..GeneratorOptions::default()
        },
    );
    assert!(matches!(result, Err(GenerationError::InvalidOptions(_))));
}
