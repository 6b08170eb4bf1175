//! Attributes sentences of generated text to retrieved passages.
use docsift_core::types::{GroundedClaim, SearchResult, SupportingSource};
use docsift_text::tokenize_keywords;

/// Fragments of this many characters or fewer are not treated as claims.
pub const MIN_CLAIM_CHARS: usize = 10;
/// A source must score strictly above this to support a claim.
pub const MIN_SOURCE_CONFIDENCE: f32 = 0.3;
pub const MAX_SOURCES_PER_CLAIM: usize = 3;
const VERBATIM_BONUS: f32 = 0.5;

/// Splits on `.`, `!` and `?`; fragments are trimmed and short ones dropped.
pub fn split_claims(text: &str) -> Vec<String> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_CLAIM_CHARS)
        .map(str::to_string)
        .collect()
}

/// Keyword overlap ratio plus a bonus when the claim appears verbatim,
/// capped at `1`.
pub fn claim_support(claim: &str, claim_keywords: &[String], content: &str) -> f32 {
    if claim_keywords.is_empty() {
        return 0.0;
    }
    let content_lower = content.to_lowercase();
    let present = claim_keywords.iter().filter(|k| content_lower.contains(k.as_str())).count();
    let mut confidence = present as f32 / claim_keywords.len() as f32;
    if content_lower.contains(&claim.to_lowercase()) {
        confidence += VERBATIM_BONUS;
    }
    confidence.min(1.0)
}

/// Pairs each claim in `generated_text` with up to three supporting results.
///
/// Claims without any source above the cutoff are omitted. A claim's
/// confidence is that of its strongest source.
pub fn ground_sources(generated_text: &str, results: &[SearchResult]) -> Vec<GroundedClaim> {
    let mut grounded = Vec::new();
    for claim in split_claims(generated_text) {
        let keywords = tokenize_keywords(&claim);
        let mut sources: Vec<SupportingSource> = results
            .iter()
            .filter_map(|r| {
                let confidence = claim_support(&claim, &keywords, &r.content);
                (confidence > MIN_SOURCE_CONFIDENCE).then(|| SupportingSource { result: r.clone(), confidence })
            })
            .collect();
        if sources.is_empty() {
            continue;
        }
        sources.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        sources.truncate(MAX_SOURCES_PER_CLAIM);
        let confidence = sources[0].confidence;
        grounded.push(GroundedClaim { claim, sources, confidence });
    }
    grounded
}
