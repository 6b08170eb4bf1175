//! Keyword retrieval over an in-memory candidate set.
use docsift_core::config::Bm25Params;
use docsift_core::types::{Chunk, SearchHit, SourceKind};
use docsift_text::{bm25_keyword_score, tokenize_keywords};

/// Scores every candidate with the BM25-like scorer and returns the top
/// `limit` chunks with a positive score, best first. Equal scores keep
/// candidate order.
pub fn keyword_search(query: &str, chunks: &[Chunk], limit: usize, params: &Bm25Params) -> Vec<SearchHit> {
    let keywords = tokenize_keywords(query);
    if keywords.is_empty() || limit == 0 {
        return Vec::new();
    }
    let mut hits: Vec<SearchHit> = chunks
        .iter()
        .filter_map(|chunk| {
            let score = bm25_keyword_score(&chunk.content, &keywords, params);
            (score > 0.0).then(|| SearchHit { chunk: chunk.clone(), score, source: SourceKind::Keyword })
        })
        .collect();
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(limit);
    hits
}
