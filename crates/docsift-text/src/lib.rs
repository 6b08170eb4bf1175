//! docsift-text
//!
//! Text metrics, span matching and overlap merging. Everything here is pure
//! and synchronous so callers can fan the work out across threads.
pub mod matcher;
pub mod merge;
pub mod metrics;
pub mod tokenize;

pub use matcher::{find_exact_matches, find_similar_passages};
pub use merge::merge_overlapping_matches;
pub use metrics::{
    bm25_keyword_score, cosine_similarity, jaccard_similarity, levenshtein_distance,
    levenshtein_similarity, ngram_similarity, ngrams, TermVector,
};
pub use tokenize::tokenize_keywords;
