//! Pure string similarity measures.
//!
//! Every function here is allocation-local and safe to call from many threads
//! at once. All similarities are in `[0, 1]`.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use docsift_core::config::Bm25Params;

use crate::tokenize::{lowercase_words, normalized_words};

/// Edit distance over Unicode scalar values with unit insert, delete and
/// substitute costs.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() { return b.len(); }
    if b.is_empty() { return a.len(); }

    // Two rows of the (|a|+1) x (|b|+1) matrix are enough.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// `1 - distance / max(|a|, |b|)`, `1.0` for two empty strings.
pub fn levenshtein_similarity(a: &str, b: &str) -> f32 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 { return 1.0; }
    1.0 - levenshtein_distance(a, b) as f32 / max_len as f32
}

fn jaccard<T: Eq + std::hash::Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f32 {
    let union = a.union(b).count();
    if union == 0 { return 0.0; }
    a.intersection(b).count() as f32 / union as f32
}

/// Case-folded word-set Jaccard index; `0.0` when both texts have no words.
pub fn jaccard_similarity(a: &str, b: &str) -> f32 {
    let a: HashSet<String> = lowercase_words(a).into_iter().collect();
    let b: HashSet<String> = lowercase_words(b).into_iter().collect();
    jaccard(&a, &b)
}

/// Term-frequency vector of a text. Ordered so that float accumulation is
/// identical regardless of argument order.
#[derive(Debug, Clone, Default)]
pub struct TermVector {
    counts: BTreeMap<String, u32>,
    norm: f64,
}

impl TermVector {
    pub fn from_text(text: &str) -> Self {
        let mut counts: BTreeMap<String, u32> = BTreeMap::new();
        for word in lowercase_words(text) {
            *counts.entry(word).or_insert(0) += 1;
        }
        Self::from_counts(counts)
    }

    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Self {
        let mut counts: BTreeMap<String, u32> = BTreeMap::new();
        for word in words {
            *counts.entry(word.as_ref().to_lowercase()).or_insert(0) += 1;
        }
        Self::from_counts(counts)
    }

    fn from_counts(counts: BTreeMap<String, u32>) -> Self {
        let norm = counts.values().map(|&c| f64::from(c) * f64::from(c)).sum::<f64>().sqrt();
        Self { counts, norm }
    }

    pub fn is_empty(&self) -> bool { self.counts.is_empty() }

    pub fn cosine(&self, other: &TermVector) -> f32 {
        if self.norm == 0.0 || other.norm == 0.0 { return 0.0; }
        // Terms missing from either side contribute zero to the dot product.
        let vocabulary: BTreeSet<&String> = self.counts.keys().chain(other.counts.keys()).collect();
        let dot: f64 = vocabulary
            .into_iter()
            .map(|w| {
                let x = self.counts.get(w).copied().unwrap_or(0);
                let y = other.counts.get(w).copied().unwrap_or(0);
                f64::from(x) * f64::from(y)
            })
            .sum();
        ((dot / (self.norm * other.norm)) as f32).clamp(0.0, 1.0)
    }
}

/// Term-frequency cosine similarity; `0.0` when either text has no words.
pub fn cosine_similarity(a: &str, b: &str) -> f32 {
    TermVector::from_text(a).cosine(&TermVector::from_text(b))
}

/// Lowercased word n-grams joined by a single space.
pub fn ngrams(text: &str, n: usize) -> Vec<String> {
    let words = lowercase_words(text);
    if n == 0 || words.len() < n { return Vec::new(); }
    words.windows(n).map(|w| w.join(" ")).collect()
}

/// Jaccard index over the n-gram sets of both texts.
pub fn ngram_similarity(a: &str, b: &str, n: usize) -> f32 {
    let a: HashSet<String> = ngrams(a, n).into_iter().collect();
    let b: HashSet<String> = ngrams(b, n).into_iter().collect();
    jaccard(&a, &b)
}

/// BM25-style relevance of `content` for `keywords`, averaged over keywords
/// and clamped to `[0, 1]`.
///
/// Term frequency counts normalized tokens equal to the keyword. Document
/// length is the whitespace word count. The inverse document frequency uses
/// the fixed pseudo corpus size from `params` rather than real statistics.
pub fn bm25_keyword_score(content: &str, keywords: &[String], params: &Bm25Params) -> f32 {
    if keywords.is_empty() { return 0.0; }
    let tokens = normalized_words(content);
    let doc_len = content.split_whitespace().count() as f32;
    let length_norm = 1.0 - params.b + params.b * doc_len / params.avg_doc_length;

    let mut score = 0.0f32;
    for keyword in keywords {
        let tf = tokens.iter().filter(|t| *t == keyword).count() as f32;
        if tf == 0.0 { continue; }
        let saturation = tf * (params.k1 + 1.0) / (tf + params.k1 * length_norm);
        let idf = ((params.corpus_size + 1.0) / (tf + 0.5)).ln();
        score += saturation * idf;
    }
    (score / keywords.len() as f32).clamp(0.0, 1.0)
}
