//! Heuristic re-ranking of fused results.
//!
//! Bonuses are additive, so a re-ranked score may exceed 1.
use docsift_core::types::SearchResult;
use docsift_text::tokenize_keywords;

use crate::fusion::sort_by_score;

/// Bonus when the whole trimmed query appears in the content.
pub const PHRASE_BONUS: f32 = 0.2;
/// Per-keyword bonus for a mention near the start, decaying linearly.
pub const EARLY_MENTION_BONUS: f32 = 0.05;
/// Character window, from the start of the content, that earns the early bonus.
pub const EARLY_MENTION_CHARS: usize = 100;
/// Bonus scaled by the fraction of query keywords present.
pub const COVERAGE_BONUS: f32 = 0.1;

pub fn rerank_bonus(query: &str, keywords: &[String], content: &str) -> f32 {
    let phrase = query.trim().to_lowercase();
    let content = content.to_lowercase();
    let mut bonus = 0.0;

    if !phrase.is_empty() && content.contains(&phrase) {
        bonus += PHRASE_BONUS;
    }

    let mut found = 0usize;
    for keyword in keywords {
        let Some(byte_pos) = content.find(keyword.as_str()) else { continue };
        found += 1;
        let pos = content[..byte_pos].chars().count();
        if pos < EARLY_MENTION_CHARS {
            bonus += EARLY_MENTION_BONUS * (1.0 - pos as f32 / EARLY_MENTION_CHARS as f32);
        }
    }

    if !keywords.is_empty() {
        bonus += COVERAGE_BONUS * found as f32 / keywords.len() as f32;
    }
    bonus
}

/// Adds the bonus to every result and re-sorts, best first.
pub fn rerank(query: &str, results: &mut [SearchResult]) {
    let keywords = tokenize_keywords(query);
    for result in results.iter_mut() {
        result.score += rerank_bonus(query, &keywords, &result.content);
    }
    sort_by_score(results);
}
