//! docsift-hybrid
//!
//! Hybrid retrieval: keyword and vector sources fused with configurable
//! weights, optional re-ranking, grounding of generated text and prompt
//! context assembly.
#![deny(unused_imports)]

pub mod context;
pub mod fusion;
pub mod grounding;
pub mod keyword;
pub mod rerank;
pub mod sources;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use docsift_core::config::{Bm25Params, ContextSettings, RetrievalSettings, SearchSettings, Settings};
use docsift_core::error::Result;
use docsift_core::traits::{ChunkStore, VectorSearch};
use docsift_core::types::{Chunk, FileId, GroundedClaim, SearchHit, SearchResult, SourceKind};
use docsift_core::with_timeout;

pub use context::{assemble_context, estimate_tokens, format_context, RagContext};
pub use fusion::fuse;
pub use grounding::ground_sources;
pub use keyword::keyword_search;
pub use rerank::rerank;
pub use sources::{SearchOutcome, SourceReport, SourceStatus};

/// Fuses, filters and orders hits from whichever sources answered.
fn rank(query: &str, outcomes: Vec<(SourceKind, Result<Vec<SearchHit>>)>, options: &SearchSettings) -> Result<SearchOutcome> {
    let (hits, sources) = sources::collect_hits(outcomes)?;
    let mut results: Vec<SearchResult> = fuse(hits, options.vector_weight, options.keyword_weight)
        .into_iter()
        .filter(|r| r.score >= options.min_score)
        .collect();
    if options.rerank {
        rerank(query, &mut results);
    } else {
        fusion::sort_by_score(&mut results);
    }
    Ok(SearchOutcome { results, sources })
}

/// Hybrid search over an explicit candidate set.
///
/// Keyword scoring runs locally over `candidates`; `vector` is asked for
/// `2 * limit` hits restricted to the candidates' files, and hits outside
/// the candidate set are ignored. A vector failure or timeout degrades to
/// keyword-only ranking. An empty candidate set yields no results.
///
/// There is no store here, so `file_name` stays `None` on every result;
/// [`HybridSearchEngine::search`] attaches names.
pub async fn hybrid_search(query: &str, candidates: &[Chunk], vector: &dyn VectorSearch, settings: &Settings) -> Result<SearchOutcome> {
    if candidates.is_empty() {
        return Ok(SearchOutcome::default());
    }
    let options = &settings.search;
    let fetch = options.limit.saturating_mul(2);

    let mut file_ids: Vec<FileId> = Vec::new();
    for chunk in candidates {
        if !file_ids.contains(&chunk.file_id) {
            file_ids.push(chunk.file_id.clone());
        }
    }
    let ids: HashSet<&str> = candidates.iter().map(|c| c.id.as_str()).collect();

    let vector_hits: Result<Vec<SearchHit>> = with_timeout("vector search", settings.retrieval.vector_timeout_ms, vector.search(query, &file_ids, fetch))
        .await
        .map(|hits| hits.into_iter().filter(|h| ids.contains(h.chunk.id.as_str())).collect());
    let keyword_hits: Result<Vec<SearchHit>> = Ok(keyword_search(query, candidates, fetch, &settings.bm25));

    let mut outcome = rank(query, vec![(SourceKind::Vector, vector_hits), (SourceKind::Keyword, keyword_hits)], options)?;
    outcome.results.truncate(options.limit);
    Ok(outcome)
}

/// Retrieval engine over a chunk store and a vector index.
pub struct HybridSearchEngine {
    chunks: Arc<dyn ChunkStore>,
    vector: Arc<dyn VectorSearch>,
    bm25: Bm25Params,
    retrieval: RetrievalSettings,
    context: ContextSettings,
    defaults: SearchSettings,
}

impl HybridSearchEngine {
    pub fn new(chunks: Arc<dyn ChunkStore>, vector: Arc<dyn VectorSearch>, settings: &Settings) -> Self {
        Self {
            chunks,
            vector,
            bm25: settings.bm25,
            retrieval: settings.retrieval.clone(),
            context: settings.context.clone(),
            defaults: settings.search.clone(),
        }
    }

    /// Searches the chunks of `file_ids` (every file when empty).
    ///
    /// Both sources run concurrently under their own timeouts. Fails with
    /// `RetrievalUnavailable` only when neither source answered.
    pub async fn search(&self, query: &str, file_ids: &[FileId], options: &SearchSettings) -> Result<SearchOutcome> {
        options.validate()?;
        let fetch = options.limit.saturating_mul(2);

        let (vector_hits, chunks) = tokio::join!(
            with_timeout("vector search", self.retrieval.vector_timeout_ms, self.vector.search(query, file_ids, fetch)),
            with_timeout("chunk fetch", self.retrieval.storage_timeout_ms, self.chunks.fetch_chunks(file_ids)),
        );
        let keyword_hits = chunks.map(|chunks| keyword_search(query, &chunks, fetch, &self.bm25));

        let mut outcome = rank(query, vec![(SourceKind::Vector, vector_hits), (SourceKind::Keyword, keyword_hits)], options)?;
        self.attach_file_names(&mut outcome.results).await;
        outcome.results.truncate(options.limit);
        debug!(query, results = outcome.results.len(), degraded = outcome.is_degraded(), "hybrid search done");
        Ok(outcome)
    }

    /// Names are cosmetic: when the lookup fails results keep `file_name = None`.
    async fn attach_file_names(&self, results: &mut [SearchResult]) {
        if results.is_empty() {
            return;
        }
        let mut ids: Vec<FileId> = results.iter().map(|r| r.file_id.clone()).collect();
        ids.sort();
        ids.dedup();
        match with_timeout("file name lookup", self.retrieval.storage_timeout_ms, self.chunks.file_names(&ids)).await {
            Ok(names) => {
                for r in results.iter_mut() {
                    r.file_name = names.get(&r.file_id).cloned();
                }
            }
            Err(e) => warn!(error = %e, "file name lookup failed; results left unnamed"),
        }
    }

    /// Searches with the default options and packs the results into a
    /// numbered prompt context.
    pub async fn build_rag_context(&self, query: &str, file_ids: &[FileId]) -> Result<RagContext> {
        let outcome = self.search(query, file_ids, &self.defaults).await?;
        Ok(assemble_context(outcome.results, &self.context))
    }

    /// Retrieves passages for `query` and grounds `generated_text` against them.
    pub async fn ground(&self, generated_text: &str, query: &str, file_ids: &[FileId]) -> Result<Vec<GroundedClaim>> {
        let outcome = self.search(query, file_ids, &self.defaults).await?;
        Ok(ground_sources(generated_text, &outcome.results))
    }
}
