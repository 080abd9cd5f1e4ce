use std::collections::HashSet;
use std::sync::Arc;

use docseed_core::{Document, DocumentId};
use docseed_generate::{Collection, GenerationError, InMemoryStore, Registry};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn ids(count: usize) -> Vec<DocumentId> {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    (0..count).map(|_| DocumentId::from_rng(&mut rng)).collect()
}

struct Fixture {
    store: Arc<InMemoryStore>,
    registry: Arc<Registry>,
    requester: Arc<dyn Collection>,
}

fn fixture(entities: &[&str]) -> Fixture {
    let store = Arc::new(InMemoryStore::new());
    for entity in entities {
        store.register(entity);
    }
    let requester: Arc<dyn Collection> = store.register("Order");
    let registry = Arc::new(Registry::new(store.clone()));
    Fixture {
        store,
        registry,
        requester,
    }
}

#[tokio::test]
async fn empty_targets_are_unresolvable() {
    let fx = fixture(&["Person"]);
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let one = fx.registry.resolve_one(&fx.requester, "Person", &mut rng).await;
    assert!(matches!(
        one,
        Err(GenerationError::ReferenceUnresolvable { ref entity }) if entity == "Person"
    ));

    let many = fx
        .registry
        .resolve_many(&fx.requester, "Person", 2, &mut rng)
        .await;
    assert!(matches!(many, Err(GenerationError::ReferenceUnresolvable { .. })));
}

#[tokio::test]
async fn unregistered_targets_are_reported_separately() {
    let fx = fixture(&[]);
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let err = fx
        .registry
        .resolve_one(&fx.requester, "Ghost", &mut rng)
        .await
        .expect_err("unregistered");
    assert!(matches!(err, GenerationError::ReferenceTargetUnregistered { .. }));
    assert!(err.to_string().contains("not registered"));
}

#[tokio::test]
async fn remembered_ids_are_resolved() {
    let fx = fixture(&["Person"]);
    let known = ids(3);
    fx.registry.remember("Person", known.clone());
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    for _ in 0..50 {
        let id = fx
            .registry
            .resolve_one(&fx.requester, "Person", &mut rng)
            .await
            .expect("resolve");
        assert!(known.contains(&id));
    }

    let pair = fx
        .registry
        .resolve_many(&fx.requester, "Person", 2, &mut rng)
        .await
        .expect("resolve many");
    assert_eq!(pair.len(), 2);
    assert_ne!(pair[0], pair[1]);
    assert!(pair.iter().all(|id| known.contains(id)));
}

#[tokio::test]
async fn resolve_many_truncates_to_distinct_ids() {
    let fx = fixture(&["Person"]);
    let known = ids(3);
    fx.registry.remember("Person", known.clone());
    fx.registry.remember("Person", known.clone());
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let picked = fx
        .registry
        .resolve_many(&fx.requester, "Person", 10, &mut rng)
        .await
        .expect("resolve many");
    let distinct: HashSet<_> = picked.iter().collect();
    assert_eq!(picked.len(), 3);
    assert_eq!(distinct.len(), 3);
}

#[tokio::test]
async fn loads_from_the_store_once() {
    let fx = fixture(&[]);
    let people = fx.store.register("Person");
    let stored = people
        .insert_many(vec![Document::new(), Document::new()])
        .await
        .expect("insert");
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    for _ in 0..5 {
        let id = fx
            .registry
            .resolve_one(&fx.requester, "Person", &mut rng)
            .await
            .expect("resolve");
        assert!(stored.contains(&id));
    }
    assert_eq!(people.find_calls(), 1);
    assert_eq!(fx.registry.known("Person"), stored);
}

#[tokio::test]
async fn empty_loads_are_retried_after_inserts() {
    let fx = fixture(&[]);
    let people = fx.store.register("Person");
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let first = fx.registry.resolve_one(&fx.requester, "Person", &mut rng).await;
    assert!(matches!(first, Err(GenerationError::ReferenceUnresolvable { .. })));

    let stored = people
        .insert_many(vec![Document::new()])
        .await
        .expect("insert");
    let id = fx
        .registry
        .resolve_one(&fx.requester, "Person", &mut rng)
        .await
        .expect("resolve");
    assert_eq!(id, stored[0]);
    assert_eq!(people.find_calls(), 2);
}

#[tokio::test]
async fn self_references_reuse_the_requester() {
    let store = Arc::new(InMemoryStore::new());
    let people = store.register("Person");
    let stored = people
        .insert_many(vec![Document::new()])
        .await
        .expect("insert");
    let requester: Arc<dyn Collection> = people.clone();
    // The registry sees an empty store, so only the requester can satisfy it.
    let registry = Registry::new(Arc::new(InMemoryStore::new()));
    let mut rng = ChaCha8Rng::seed_from_u64(6);

    let id = registry
        .resolve_one(&requester, "Person", &mut rng)
        .await
        .expect("self reference");
    assert_eq!(id, stored[0]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_references_share_one_load() {
    let fx = fixture(&[]);
    let people = fx.store.register("Person");
    people
        .insert_many(vec![Document::new(), Document::new(), Document::new()])
        .await
        .expect("insert");

    let tasks: Vec<_> = (0..8_u64)
        .map(|seed| {
            let registry = Arc::clone(&fx.registry);
            let requester = Arc::clone(&fx.requester);
            tokio::spawn(async move {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                registry.resolve_one(&requester, "Person", &mut rng).await
            })
        })
        .collect();
    for task in tasks {
        task.await.expect("join").expect("resolve");
    }

    assert_eq!(people.find_calls(), 1);
    assert_eq!(fx.registry.known("Person").len(), 3);
}
