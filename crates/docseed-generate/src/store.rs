//! Persistence collaborator seen by the registry and the seeder.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use docseed_core::{Document, DocumentId, FieldValue, ID_PATH};
use tokio::sync::Mutex;

use crate::errors::StoreError;

/// One named collection of documents.
#[async_trait]
pub trait Collection: Send + Sync {
    fn name(&self) -> &str;

    /// Identifiers of every stored document, in storage order.
    async fn find_all_ids(&self) -> Result<Vec<DocumentId>, StoreError>;

    /// Persist `docs`, assigning `_id` where missing, and return their ids.
    async fn insert_many(&self, docs: Vec<Document>) -> Result<Vec<DocumentId>, StoreError>;

    /// Remove every document and return how many were removed.
    async fn delete_all(&self) -> Result<u64, StoreError>;
}

/// Lookup of registered collections by entity name.
pub trait DocumentStore: Send + Sync {
    fn collection(&self, name: &str) -> Option<Arc<dyn Collection>>;
}

/// Identifier of `doc`, assigning a fresh one when absent.
pub fn ensure_id(doc: &mut Document) -> DocumentId {
    if let Some(id) = doc.get(ID_PATH).and_then(FieldValue::as_object_id) {
        return id;
    }
    let id = DocumentId::new();
    doc.insert(ID_PATH, FieldValue::ObjectId(id));
    id
}

/// Process-local store used by tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<BTreeMap<String, Arc<InMemoryCollection>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or fetch) the collection for `name`.
    pub fn register(&self, name: &str) -> Arc<InMemoryCollection> {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            collections
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(InMemoryCollection::new(name))),
        )
    }
}

impl DocumentStore for InMemoryStore {
    fn collection(&self, name: &str) -> Option<Arc<dyn Collection>> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        collections
            .get(name)
            .map(|collection| Arc::clone(collection) as Arc<dyn Collection>)
    }
}

#[derive(Debug)]
pub struct InMemoryCollection {
    name: String,
    documents: Mutex<Vec<Document>>,
    find_calls: AtomicUsize,
}

impl InMemoryCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Mutex::new(Vec::new()),
            find_calls: AtomicUsize::new(0),
        }
    }

    /// Snapshot of the stored documents.
    pub async fn documents(&self) -> Vec<Document> {
        self.documents.lock().await.clone()
    }

    /// How many times `find_all_ids` has run.
    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Collection for InMemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find_all_ids(&self) -> Result<Vec<DocumentId>, StoreError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        let documents = self.documents.lock().await;
        Ok(documents
            .iter()
            .filter_map(|doc| doc.get(ID_PATH).and_then(FieldValue::as_object_id))
            .collect())
    }

    async fn insert_many(&self, mut docs: Vec<Document>) -> Result<Vec<DocumentId>, StoreError> {
        let ids = docs.iter_mut().map(ensure_id).collect();
        self.documents.lock().await.extend(docs);
        Ok(ids)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let mut documents = self.documents.lock().await;
        let removed = documents.len() as u64;
        documents.clear();
        Ok(removed)
    }
}
