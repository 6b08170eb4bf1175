//! In-memory document and chunk store with JSON snapshots.
//!
//! Rows are validated on the way in; readers always get owned copies so no
//! lock is held across an await point.
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use docsift_core::error::{Error, Result};
use docsift_core::traits::{ChunkStore, DocumentStore};
use docsift_core::types::{Chunk, ChunkId, Document, FileId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub documents: Vec<Document>,
    pub chunks: Vec<Chunk>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn from_corpus(documents: Vec<Document>, chunks: Vec<Chunk>) -> Result<Self> {
        let store = Self::new();
        for document in documents { store.insert_document(document)?; }
        store.insert_chunks(chunks)?;
        Ok(store)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Snapshot>> {
        self.inner.read().map_err(|_| Error::Storage("store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Snapshot>> {
        self.inner.write().map_err(|_| Error::Storage("store lock poisoned".into()))
    }

    /// Inserts or replaces a document by id.
    pub fn insert_document(&self, document: Document) -> Result<()> {
        document.validate()?;
        let mut inner = self.write()?;
        match inner.documents.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => *existing = document,
            None => inner.documents.push(document),
        }
        Ok(())
    }

    /// Appends chunks after validating all of them; nothing is inserted if any is invalid.
    pub fn insert_chunks(&self, chunks: Vec<Chunk>) -> Result<()> {
        for chunk in &chunks { chunk.validate()?; }
        self.write()?.chunks.extend(chunks);
        Ok(())
    }

    pub fn chunks(&self) -> Result<Vec<Chunk>> { Ok(self.read()?.chunks.clone()) }

    pub fn documents(&self) -> Result<Vec<Document>> { Ok(self.read()?.documents.clone()) }

    pub fn len(&self) -> Result<usize> { Ok(self.read()?.chunks.len()) }

    pub fn is_empty(&self) -> Result<bool> { Ok(self.len()? == 0) }

    /// Stores embeddings by chunk id; returns how many chunks were updated.
    pub fn set_embeddings(&self, updates: Vec<(ChunkId, Vec<f32>)>) -> Result<usize> {
        let by_id: HashMap<ChunkId, Vec<f32>> = updates.into_iter().collect();
        let mut inner = self.write()?;
        let mut updated = 0;
        for chunk in inner.chunks.iter_mut() {
            if let Some(v) = by_id.get(&chunk.id) {
                chunk.embedding = Some(v.clone());
                updated += 1;
            }
        }
        Ok(updated)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() { fs::create_dir_all(parent)?; }
        }
        let snapshot = self.read()?.clone();
        let file = fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), &snapshot)?;
        info!(path = %path.display(), documents = snapshot.documents.len(), chunks = snapshot.chunks.len(), "snapshot saved");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(format!("snapshot {}", path.display())));
        }
        let file = fs::File::open(path)?;
        let snapshot: Snapshot = serde_json::from_reader(std::io::BufReader::new(file))?;
        info!(path = %path.display(), chunks = snapshot.chunks.len(), "snapshot loaded");
        Self::from_corpus(snapshot.documents, snapshot.chunks)
    }
}

fn selected(file_ids: &[FileId], file_id: &str) -> bool {
    file_ids.is_empty() || file_ids.iter().any(|f| f == file_id)
}

#[async_trait]
impl ChunkStore for MemoryStore {
    async fn fetch_chunks(&self, file_ids: &[FileId]) -> Result<Vec<Chunk>> {
        Ok(self.read()?.chunks.iter().filter(|c| selected(file_ids, &c.file_id)).cloned().collect())
    }

    async fn file_names(&self, file_ids: &[FileId]) -> Result<HashMap<FileId, String>> {
        Ok(self
            .read()?
            .documents
            .iter()
            .filter(|d| selected(file_ids, &d.id))
            .map(|d| (d.id.clone(), d.title.clone()))
            .collect())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch_documents(&self, exclude_id: Option<&str>) -> Result<Vec<Document>> {
        Ok(self.read()?.documents.iter().filter(|d| Some(d.id.as_str()) != exclude_id).cloned().collect())
    }
}
