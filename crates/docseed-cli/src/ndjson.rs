//! File-backed document store used by the `seed` command.
//!
//! Each registered entity owns `<dir>/<entity>.ndjson`, one JSON document per
//! line. Writes append; `delete_all` truncates the file.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use docseed_core::{Document, DocumentId, ID_PATH};
use docseed_generate::{Collection, DocumentStore, StoreError, ensure_id};
use serde_json::Value;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

#[derive(Debug)]
pub struct NdjsonStore {
    dir: PathBuf,
    collections: BTreeMap<String, Arc<NdjsonCollection>>,
}

impl NdjsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            collections: BTreeMap::new(),
        }
    }

    /// Register (or fetch) the collection backing `name`.
    pub fn register(&mut self, name: &str) -> Arc<NdjsonCollection> {
        let path = self.dir.join(format!("{name}.ndjson"));
        Arc::clone(
            self.collections
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(NdjsonCollection::new(name, path))),
        )
    }

    /// Registered collection for `name`, or `UnknownCollection`.
    pub fn require(&self, name: &str) -> Result<Arc<dyn Collection>, StoreError> {
        self.collection(name)
            .ok_or_else(|| StoreError::UnknownCollection(name.to_string()))
    }
}

impl DocumentStore for NdjsonStore {
    fn collection(&self, name: &str) -> Option<Arc<dyn Collection>> {
        self.collections
            .get(name)
            .map(|collection| Arc::clone(collection) as Arc<dyn Collection>)
    }
}

#[derive(Debug)]
pub struct NdjsonCollection {
    name: String,
    path: PathBuf,
    lock: Mutex<()>,
}

impl NdjsonCollection {
    fn new(name: &str, path: PathBuf) -> Self {
        Self {
            name: name.to_string(),
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn lines(&self) -> Result<Vec<String>, StoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn corrupt(&self, line: usize, message: impl std::fmt::Display) -> StoreError {
        StoreError::Corrupt {
            collection: self.name.clone(),
            message: format!("line {line}: {message}"),
        }
    }
}

#[async_trait]
impl Collection for NdjsonCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find_all_ids(&self) -> Result<Vec<DocumentId>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut ids = Vec::new();
        for (index, line) in self.lines().await?.iter().enumerate() {
            let record: Value =
                serde_json::from_str(line).map_err(|err| self.corrupt(index + 1, err))?;
            let raw = record
                .get(ID_PATH)
                .and_then(Value::as_str)
                .ok_or_else(|| self.corrupt(index + 1, format!("missing {ID_PATH}")))?;
            let id = DocumentId::from_str(raw).map_err(|err| self.corrupt(index + 1, err))?;
            ids.push(id);
        }
        Ok(ids)
    }

    async fn insert_many(&self, docs: Vec<Document>) -> Result<Vec<DocumentId>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut ids = Vec::with_capacity(docs.len());
        let mut buffer = Vec::new();
        for mut doc in docs {
            ids.push(ensure_id(&mut doc));
            serde_json::to_writer(&mut buffer, &doc)?;
            buffer.push(b'\n');
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&buffer).await?;
        file.flush().await?;
        Ok(ids)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let _guard = self.lock.lock().await;
        let removed = self.lines().await?.len() as u64;
        if removed > 0 {
            fs::write(&self.path, b"").await?;
        }
        Ok(removed)
    }
}
