//! Raw span matching between an analyzed text (source) and a candidate (target).
//!
//! Both finders return possibly overlapping spans positioned by word offsets
//! into `source`; see [`crate::merge`] for the clean-up pass. Source metadata
//! (`source_title`, `source_url`) is left empty for the caller to fill in.

use docsift_core::types::{MatchType, PlagiarismMatch};

use crate::metrics::TermVector;

/// Word range `[start, end)`.
type Span = (usize, usize);

fn span(source_words: &[&str], target_words: &[&str], source: Span, target: Span, similarity: f32) -> PlagiarismMatch {
    PlagiarismMatch {
        source_text: source_words[source.0..source.1].join(" "),
        matched_text: target_words[target.0..target.1].join(" "),
        similarity,
        start_position: source.0,
        end_position: source.1,
        source_url: None,
        source_title: None,
        match_type: MatchType::from_similarity(similarity),
    }
}

/// Finds verbatim runs of at least `min_length` words, compared case-insensitively.
///
/// For each source position the longest run over all target positions is
/// taken (leftmost target on ties). Once a run is recorded the scan resumes
/// after it, so sub-runs of a reported run are never reported again. The
/// policy is greedy and not globally optimal.
pub fn find_exact_matches(source: &str, target: &str, min_length: usize) -> Vec<PlagiarismMatch> {
    let source_words: Vec<&str> = source.split_whitespace().collect();
    let target_words: Vec<&str> = target.split_whitespace().collect();
    let source_lower: Vec<String> = source_words.iter().map(|w| w.to_lowercase()).collect();
    let target_lower: Vec<String> = target_words.iter().map(|w| w.to_lowercase()).collect();
    let min_length = min_length.max(1);

    let mut matches = Vec::new();
    let mut i = 0;
    while i < source_lower.len() {
        let mut best_len = 0;
        let mut best_j = 0;
        for j in 0..target_lower.len() {
            let mut run = 0;
            while i + run < source_lower.len()
                && j + run < target_lower.len()
                && source_lower[i + run] == target_lower[j + run]
            {
                run += 1;
            }
            if run > best_len {
                best_len = run;
                best_j = j;
            }
        }
        if best_len >= min_length {
            matches.push(span(&source_words, &target_words, (i, i + best_len), (best_j, best_j + best_len), 1.0));
            i += best_len;
        } else {
            i += 1;
        }
    }
    matches
}

/// Word windows `[start, end)` of at most `size` words with stride `size / 2`.
/// A text shorter than `size` yields a single window over all of it.
pub fn word_windows(word_count: usize, size: usize) -> Vec<(usize, usize)> {
    let size = size.max(1);
    let stride = (size / 2).max(1);
    let mut windows = Vec::new();
    let mut start = 0;
    while start < word_count {
        let end = (start + size).min(word_count);
        windows.push((start, end));
        if end == word_count { break; }
        start += stride;
    }
    windows
}

/// Compares half-overlapping word windows of both texts with term-frequency
/// cosine similarity.
///
/// Each source window is reported at most once, paired with its best target
/// window (earliest on ties), when that score reaches `threshold`.
pub fn find_similar_passages(source: &str, target: &str, window_size: usize, threshold: f32) -> Vec<PlagiarismMatch> {
    let source_words: Vec<&str> = source.split_whitespace().collect();
    let target_words: Vec<&str> = target.split_whitespace().collect();
    let target_windows: Vec<(Span, TermVector)> = word_windows(target_words.len(), window_size)
        .into_iter()
        .map(|(s, e)| ((s, e), TermVector::from_words(&target_words[s..e])))
        .collect();

    let mut matches = Vec::new();
    for (start, end) in word_windows(source_words.len(), window_size) {
        let window = TermVector::from_words(&source_words[start..end]);
        let mut best: Option<(f32, Span)> = None;
        for (bounds, candidate) in &target_windows {
            let score = window.cosine(candidate);
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, *bounds));
            }
        }
        if let Some((score, target)) = best {
            if score >= threshold {
                matches.push(span(&source_words, &target_words, (start, end), target, score));
            }
        }
    }
    matches
}
