use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Chunk, Document, FileId, PlagiarismMatch, SearchHit};

/// Produces fixed-dimension embeddings. Implementations must return vectors of
/// exactly `dim()` elements.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Cosine ranking over stored chunk embeddings.
///
/// An empty `file_ids` slice means "every stored chunk". Returned hits carry
/// `SourceKind::Vector` and scores in `[0, 1]`, best first.
#[async_trait]
pub trait VectorSearch: Send + Sync {
    async fn search(&self, query: &str, file_ids: &[FileId], limit: usize) -> Result<Vec<SearchHit>>;
}

#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Chunks for the given files; an empty slice selects every file.
    async fn fetch_chunks(&self, file_ids: &[FileId]) -> Result<Vec<Chunk>>;
    /// Display names keyed by file id. Unknown ids are omitted.
    async fn file_names(&self, file_ids: &[FileId]) -> Result<HashMap<FileId, String>>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn fetch_documents(&self, exclude_id: Option<&str>) -> Result<Vec<Document>>;
}

/// Third-party plagiarism scan. Matches must use word offsets into the
/// scanned text.
#[async_trait]
pub trait ExternalScanner: Send + Sync {
    fn name(&self) -> &str;
    async fn scan(&self, text: &str) -> Result<Vec<PlagiarismMatch>>;
}
