//! Known identifiers per entity, used to fill reference fields.
//!
//! The cache is filled by [`Registry::remember`] after a batch is persisted,
//! or lazily from the store the first time an entity is referenced. Entries
//! only grow and live as long as the registry. Loads are single-flight per
//! entity: concurrent first references wait for one `find_all_ids` call.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use docseed_core::DocumentId;
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use crate::errors::GenerationError;
use crate::store::{Collection, DocumentStore};

pub struct Registry {
    store: Arc<dyn DocumentStore>,
    cache: Mutex<HashMap<String, Vec<DocumentId>>>,
    loads: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl Registry {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            cache: Mutex::new(HashMap::new()),
            loads: Mutex::new(HashMap::new()),
        }
    }

    /// Append newly persisted identifiers for `entity`.
    pub fn remember(&self, entity: &str, ids: impl IntoIterator<Item = DocumentId>) {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.entry(entity.to_string()).or_default().extend(ids);
    }

    /// Snapshot of the identifiers cached for `entity`.
    pub fn known(&self, entity: &str) -> Vec<DocumentId> {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get(entity).cloned().unwrap_or_default()
    }

    /// One identifier of `entity`, chosen uniformly.
    pub async fn resolve_one<R: Rng + ?Sized>(
        &self,
        requester: &Arc<dyn Collection>,
        entity: &str,
        rng: &mut R,
    ) -> Result<DocumentId, GenerationError> {
        self.ensure_loaded(requester, entity).await?;
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache
            .get(entity)
            .and_then(|ids| ids.choose(rng).copied())
            .ok_or_else(|| unresolvable(entity))
    }

    /// Up to `count` distinct identifiers of `entity`, sampled without
    /// replacement. Fewer are returned when fewer distinct ids are known.
    pub async fn resolve_many<R: Rng + ?Sized>(
        &self,
        requester: &Arc<dyn Collection>,
        entity: &str,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<DocumentId>, GenerationError> {
        self.ensure_loaded(requester, entity).await?;
        let distinct = {
            let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            let ids = cache.get(entity).map(Vec::as_slice).unwrap_or_default();
            let mut seen = HashSet::with_capacity(ids.len());
            ids.iter()
                .copied()
                .filter(|id| seen.insert(*id))
                .collect::<Vec<_>>()
        };
        if distinct.is_empty() {
            return Err(unresolvable(entity));
        }
        if distinct.len() < count {
            debug!(
                entity,
                requested = count,
                available = distinct.len(),
                "fewer distinct references than requested"
            );
        }
        Ok(distinct.choose_multiple(rng, count).copied().collect())
    }

    async fn ensure_loaded(
        &self,
        requester: &Arc<dyn Collection>,
        entity: &str,
    ) -> Result<(), GenerationError> {
        if self.has_cached(entity) {
            return Ok(());
        }

        let guard = self.load_guard(entity);
        let _load = guard.lock().await;
        if self.has_cached(entity) {
            return Ok(());
        }

        let collection = if requester.name() == entity {
            Arc::clone(requester)
        } else {
            self.store.collection(entity).ok_or_else(|| {
                GenerationError::ReferenceTargetUnregistered {
                    entity: entity.to_string(),
                }
            })?
        };

        let started = Instant::now();
        let ids = collection.find_all_ids().await?;
        info!(
            entity,
            requester = requester.name(),
            count = ids.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "reference documents loaded"
        );
        if ids.is_empty() {
            return Err(unresolvable(entity));
        }
        self.remember(entity, ids);
        Ok(())
    }

    fn has_cached(&self, entity: &str) -> bool {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get(entity).is_some_and(|ids| !ids.is_empty())
    }

    fn load_guard(&self, entity: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut loads = self.loads.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(loads.entry(entity.to_string()).or_default())
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Registry")
            .field("entities", &cache.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn unresolvable(entity: &str) -> GenerationError {
    GenerationError::ReferenceUnresolvable {
        entity: entity.to_string(),
    }
}
