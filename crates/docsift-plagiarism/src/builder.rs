//! Report assembly from a candidate corpus.
use chrono::Utc;
use tracing::{debug, info};

use docsift_core::config::PlagiarismSettings;
use docsift_core::types::{Document, MatchType, PlagiarismMatch, PlagiarismReport};
use docsift_text::{find_exact_matches, find_similar_passages, merge_overlapping_matches, TermVector};

/// Matches `text` against one document.
///
/// The whole-text cosine is a cheap pre-filter: documents below
/// `settings.threshold` are skipped without span matching. Matches are
/// tagged with the document's title and url.
pub fn match_document(text: &str, text_vector: &TermVector, document: &Document, settings: &PlagiarismSettings) -> Vec<PlagiarismMatch> {
    let prefilter = text_vector.cosine(&TermVector::from_text(&document.content));
    if prefilter < settings.threshold {
        debug!(document = %document.id, prefilter, "below pre-filter threshold");
        return Vec::new();
    }

    let mut matches = find_exact_matches(text, &document.content, settings.min_match_length);
    matches.extend(find_similar_passages(text, &document.content, settings.window_size, settings.threshold));
    for m in &mut matches {
        m.source_title = Some(document.title.clone());
        m.source_url = document.url.clone();
    }
    matches
}

/// Checks `text` against every document and builds the report.
pub fn check_against_corpus(text: &str, documents: &[Document], settings: &PlagiarismSettings) -> PlagiarismReport {
    let text_vector = TermVector::from_text(text);
    let matches = documents
        .iter()
        .flat_map(|d| match_document(text, &text_vector, d, settings))
        .collect();
    build_report(text, matches)
}

/// Keeps third-party matches that fit the analyzed text.
///
/// Matches with a non-finite similarity, an inverted span, or an end past
/// `word_count` are dropped. Similarity is clamped to `[0, 1]`, the match
/// type is re-derived from it, and matches below `threshold` are dropped.
/// Returns the kept matches and how many were dropped.
pub fn sanitize_external(matches: Vec<PlagiarismMatch>, word_count: usize, threshold: f32) -> (Vec<PlagiarismMatch>, usize) {
    let total = matches.len();
    let kept: Vec<PlagiarismMatch> = matches
        .into_iter()
        .filter(|m| m.similarity.is_finite() && m.start_position <= m.end_position && m.end_position <= word_count)
        .filter_map(|mut m| {
            m.similarity = m.similarity.clamp(0.0, 1.0);
            m.match_type = MatchType::from_similarity(m.similarity);
            (m.similarity >= threshold).then_some(m)
        })
        .collect();
    let dropped = total - kept.len();
    (kept, dropped)
}

/// Merges raw matches and aggregates them.
///
/// `overall_similarity` is the mean similarity of the surviving matches
/// (`0` with none). `sources` lists each title (or url) once, in match order.
pub fn build_report(text: &str, matches: Vec<PlagiarismMatch>) -> PlagiarismReport {
    let raw = matches.len();
    let matches = merge_overlapping_matches(matches);
    let overall_similarity = if matches.is_empty() {
        0.0
    } else {
        matches.iter().map(|m| m.similarity).sum::<f32>() / matches.len() as f32
    };

    let mut sources: Vec<String> = Vec::new();
    for m in &matches {
        if let Some(source) = m.source_title.as_ref().or(m.source_url.as_ref()) {
            if !sources.contains(source) {
                sources.push(source.clone());
            }
        }
    }

    let word_count = text.split_whitespace().count();
    info!(raw, merged = matches.len(), overall_similarity, word_count, "plagiarism report built");
    PlagiarismReport {
        overall_similarity,
        total_matches: matches.len(),
        matches,
        analyzed_text: text.to_string(),
        word_count,
        checked_at: Utc::now(),
        sources,
    }
}
