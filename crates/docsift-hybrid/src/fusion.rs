//! Weighted score fusion of vector and keyword hits.
use std::collections::HashMap;

use docsift_core::types::{ChunkId, SearchHit, SearchResult, SourceKind};

/// Fuses hits from both sources by chunk id.
///
/// A chunk seen by only one source gets `0` for the other. When a source
/// reports the same chunk twice, its best score is kept. Input scores are
/// clamped to `[0, 1]`, so with non-negative weights the fused score is
/// non-negative and monotone in each source score.
///
/// Results come back in first-seen order (vector hits first); callers sort.
pub fn fuse(hits: impl IntoIterator<Item = SearchHit>, vector_weight: f32, keyword_weight: f32) -> Vec<SearchResult> {
    let mut order: Vec<ChunkId> = Vec::new();
    let mut by_id: HashMap<ChunkId, SearchResult> = HashMap::new();

    for hit in hits {
        let score = hit.score.clamp(0.0, 1.0);
        let result = by_id.entry(hit.chunk.id.clone()).or_insert_with(|| {
            order.push(hit.chunk.id.clone());
            SearchResult::from_chunk(&hit.chunk)
        });
        let slot = match hit.source {
            SourceKind::Vector => &mut result.vector_score,
            SourceKind::Keyword => &mut result.keyword_score,
        };
        *slot = slot.max(score);
    }

    order
        .into_iter()
        .filter_map(|id| by_id.remove(&id))
        .map(|mut r| {
            r.score = fused_score(r.vector_score, r.keyword_score, vector_weight, keyword_weight);
            r
        })
        .collect()
}

pub fn fused_score(vector_score: f32, keyword_score: f32, vector_weight: f32, keyword_weight: f32) -> f32 {
    vector_score * vector_weight + keyword_score * keyword_weight
}

/// Descending by score; equal scores keep their current order.
pub fn sort_by_score(results: &mut [SearchResult]) {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
}
