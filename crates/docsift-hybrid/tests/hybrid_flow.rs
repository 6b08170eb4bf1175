use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use docsift_core::config::{SearchSettings, Settings};
use docsift_core::error::{Error, Result};
use docsift_core::traits::{ChunkStore, VectorSearch};
use docsift_core::types::{Chunk, Document, FileId, SearchHit, SourceKind};
use docsift_embed::HashingEmbedder;
use docsift_hybrid::{hybrid_search, HybridSearchEngine, SourceStatus};
use docsift_vector::{backfill_embeddings, MemoryStore, MemoryVectorSearch};

struct OfflineVector;

#[async_trait]
impl VectorSearch for OfflineVector {
    async fn search(&self, _query: &str, _file_ids: &[FileId], _limit: usize) -> Result<Vec<SearchHit>> {
        Err(Error::Operation("vector index offline".into()))
    }
}

struct SlowVector;

#[async_trait]
impl VectorSearch for SlowVector {
    async fn search(&self, _query: &str, _file_ids: &[FileId], _limit: usize) -> Result<Vec<SearchHit>> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(Vec::new())
    }
}

/// Returns its chunks with one fixed score, whatever the query.
struct FixedVector {
    chunks: Vec<Chunk>,
    score: f32,
}

#[async_trait]
impl VectorSearch for FixedVector {
    async fn search(&self, _query: &str, _file_ids: &[FileId], limit: usize) -> Result<Vec<SearchHit>> {
        Ok(self
            .chunks
            .iter()
            .take(limit)
            .map(|chunk| SearchHit { chunk: chunk.clone(), score: self.score, source: SourceKind::Vector })
            .collect())
    }
}

struct BrokenStore;

#[async_trait]
impl ChunkStore for BrokenStore {
    async fn fetch_chunks(&self, _file_ids: &[FileId]) -> Result<Vec<Chunk>> {
        Err(Error::Storage("connection refused".into()))
    }
    async fn file_names(&self, _file_ids: &[FileId]) -> Result<std::collections::HashMap<FileId, String>> {
        Err(Error::Storage("connection refused".into()))
    }
}

fn corpus() -> Arc<MemoryStore> {
    let store = MemoryStore::from_corpus(
        vec![Document::new("ml", "Machine Learning Notes", ""), Document::new("cooking", "Kitchen Basics", "")],
        vec![
            Chunk::new("ml:0", "ml", "Machine learning is a subfield of AI.", 1),
            Chunk::new("ml:1", "ml", "Learning a new skill like machine maintenance takes patience.", 2),
            Chunk::new("cooking:0", "cooking", "Knead the dough and let it rest overnight.", 1),
        ],
    )
    .unwrap();
    Arc::new(store)
}

fn settings(rerank: bool) -> Settings {
    let mut settings = Settings::default();
    settings.search = SearchSettings { rerank, ..SearchSettings::default() };
    settings
}

#[tokio::test]
async fn full_pipeline_ranks_phrase_match_first() {
    let store = corpus();
    let embedder = Arc::new(HashingEmbedder::new(384).unwrap());
    backfill_embeddings(&store, embedder.as_ref(), 8, false).unwrap();
    let vector = Arc::new(MemoryVectorSearch::new(store.clone(), embedder));
    let settings = settings(true);
    let engine = HybridSearchEngine::new(store, vector, &settings);

    let outcome = engine.search("machine learning", &[], &settings.search).await.unwrap();
    assert!(!outcome.is_degraded());
    let top = &outcome.results[0];
    assert_eq!(top.chunk_id, "ml:0");
    assert_eq!(top.file_name.as_deref(), Some("Machine Learning Notes"));
    assert!(outcome.results.iter().all(|r| r.chunk_id != "cooking:0"));
}

#[tokio::test]
async fn vector_failure_degrades_to_keyword_ranking() {
    let store = corpus();
    let settings = settings(false);
    let engine = HybridSearchEngine::new(store, Arc::new(OfflineVector), &settings);

    let outcome = engine.search("dough overnight", &[], &settings.search).await.unwrap();
    assert!(outcome.is_degraded());
    assert_eq!(outcome.results[0].chunk_id, "cooking:0");
    assert_eq!(outcome.results[0].vector_score, 0.0);
    let vector = outcome.sources.iter().find(|s| s.kind == SourceKind::Vector).unwrap();
    assert!(matches!(vector.status, SourceStatus::Unavailable { .. }));
}

#[tokio::test]
async fn both_sources_failing_is_an_error() {
    let settings = settings(false);
    let engine = HybridSearchEngine::new(Arc::new(BrokenStore), Arc::new(OfflineVector), &settings);
    let err = engine.search("anything here", &[], &settings.search).await.unwrap_err();
    assert!(matches!(err, Error::RetrievalUnavailable { ref reasons } if reasons.len() == 2));
}

#[tokio::test]
async fn slow_vector_source_times_out() {
    let store = corpus();
    let mut settings = settings(false);
    settings.retrieval.vector_timeout_ms = 20;
    let chunks = store.chunks().unwrap();

    let outcome = hybrid_search("knead dough", &chunks, &SlowVector, &settings).await.unwrap();
    assert_eq!(outcome.results[0].chunk_id, "cooking:0");
    // no store on this path, so nothing is named
    assert!(outcome.results.iter().all(|r| r.file_name.is_none()));
    match &outcome.sources[0].status {
        SourceStatus::Unavailable { reason } => assert!(reason.contains("timed out") || reason.contains("vector search")),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_candidates_give_empty_results() {
    let settings = settings(false);
    let outcome = hybrid_search("anything", &[], &OfflineVector, &settings).await.unwrap();
    assert!(outcome.results.is_empty());
}

#[tokio::test]
async fn min_score_filters_weak_results() {
    let store = corpus();
    let mut settings = settings(false);
    settings.search.min_score = 0.95;
    let engine = HybridSearchEngine::new(store, Arc::new(OfflineVector), &settings);
    // Keyword-only scores top out at the keyword weight, below the cut.
    let outcome = engine.search("dough", &[], &settings.search).await.unwrap();
    assert!(outcome.results.is_empty());
}

#[tokio::test]
async fn rag_context_cites_sources() {
    let store = corpus();
    let settings = settings(false);
    let engine = HybridSearchEngine::new(store, Arc::new(OfflineVector), &settings);
    let ctx = engine.build_rag_context("knead dough", &[]).await.unwrap();
    assert!(ctx.formatted_context.starts_with("[1] Kitchen Basics, Page 1\n"));
    assert_eq!(ctx.citations[0].chunk_id, "cooking:0");
    assert!(ctx.total_tokens > 0);
}

#[tokio::test]
async fn keyword_failure_degrades_to_vector_ranking() {
    let settings = settings(false);
    let vector = FixedVector { chunks: vec![Chunk::new("ml:0", "ml", "Machine learning is a subfield of AI.", 1)], score: 0.9 };
    let engine = HybridSearchEngine::new(Arc::new(BrokenStore), Arc::new(vector), &settings);

    let outcome = engine.search("machine learning", &[], &settings.search).await.unwrap();
    assert!(outcome.is_degraded());
    assert_eq!(outcome.results.len(), 1);
    let top = &outcome.results[0];
    assert_eq!(top.chunk_id, "ml:0");
    assert_eq!(top.keyword_score, 0.0);
    assert!(top.vector_score * settings.search.vector_weight >= settings.search.min_score);
    // name lookup goes through the same broken store
    assert!(top.file_name.is_none());
    let keyword = outcome.sources.iter().find(|s| s.kind == SourceKind::Keyword).unwrap();
    assert!(matches!(keyword.status, SourceStatus::Unavailable { .. }));
}

#[tokio::test]
async fn rerank_prefers_early_full_coverage_over_a_late_single_mention() {
    let early = Chunk::new("early", "doc", "Machine learning applications now span medicine, finance and logistics.", 1);
    let late = Chunk::new(
        "late",
        "doc",
        "This long chapter describes the history of agriculture, irrigation, crop rotation and the slow \
         spread of farming tools across many regions before any machine appeared.",
        2,
    );
    let candidates = vec![late.clone(), early.clone()];
    let vector = FixedVector { chunks: candidates.clone(), score: 0.5 };
    let mut settings = settings(true);
    settings.search.min_score = 0.0;

    let outcome = hybrid_search("machine learning applications", &candidates, &vector, &settings).await.unwrap();
    let ids: Vec<&str> = outcome.results.iter().map(|r| r.chunk_id.as_str()).collect();
    assert_eq!(ids, vec!["early", "late"]);
    assert_eq!(outcome.results[0].vector_score, outcome.results[1].vector_score);
    assert!(outcome.results[0].score > outcome.results[1].score);
}
