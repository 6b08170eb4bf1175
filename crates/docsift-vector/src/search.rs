use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use docsift_core::error::{Error, Result};
use docsift_core::traits::{Embedder, VectorSearch};
use docsift_core::types::{FileId, SearchHit, SourceKind};

use crate::similarity::embedding_cosine;
use crate::store::MemoryStore;

/// Brute-force cosine ranking over the embeddings held by a [`MemoryStore`].
///
/// Chunks without an embedding are skipped. Negative cosines are reported as
/// `0.0` so scores stay in `[0, 1]`.
pub struct MemoryVectorSearch {
    store: Arc<MemoryStore>,
    embedder: Arc<dyn Embedder>,
}

impl MemoryVectorSearch {
    pub fn new(store: Arc<MemoryStore>, embedder: Arc<dyn Embedder>) -> Self { Self { store, embedder } }

    fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        self.embedder
            .embed_batch(&[query.to_string()])
            .map_err(|e| Error::Operation(format!("query embedding failed: {e}")))?
            .pop()
            .ok_or_else(|| Error::Operation("embedder returned no vector".into()))
    }
}

#[async_trait]
impl VectorSearch for MemoryVectorSearch {
    async fn search(&self, query: &str, file_ids: &[FileId], limit: usize) -> Result<Vec<SearchHit>> {
        let query_vec = self.embed_query(query)?;
        let chunks = self.store.chunks()?;
        let mut hits = Vec::new();
        for chunk in chunks {
            if !file_ids.is_empty() && !file_ids.contains(&chunk.file_id) { continue; }
            let Some(embedding) = chunk.embedding.as_deref() else { continue };
            let score = embedding_cosine(&query_vec, embedding)?.max(0.0);
            hits.push(SearchHit { chunk, score, source: SourceKind::Vector });
        }
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(limit);
        debug!(hits = hits.len(), limit, "vector search");
        Ok(hits)
    }
}
