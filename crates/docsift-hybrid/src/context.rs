//! Prompt context assembly with numbered citations.
use serde::{Deserialize, Serialize};
use tracing::debug;

use docsift_core::config::ContextSettings;
use docsift_core::types::{Citation, SearchResult};

pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RagContext {
    pub results: Vec<SearchResult>,
    pub citations: Vec<Citation>,
    pub formatted_context: String,
    pub total_tokens: usize,
}

/// Rough token estimate: one token per four characters, rounded up.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// The first `max_chars` characters, with `...` appended when cut.
pub fn excerpt(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

pub fn citation_for(result: &SearchResult, excerpt_chars: usize) -> Citation {
    Citation {
        source_id: result.file_id.clone(),
        source_name: result.source_name().to_string(),
        page_number: result.page_number,
        chunk_id: result.chunk_id.clone(),
        excerpt: excerpt(&result.content, excerpt_chars),
        confidence: result.score.clamp(0.0, 1.0),
    }
}

fn format_entry(number: usize, result: &SearchResult) -> String {
    format!("[{}] {}, Page {}\n{}", number, result.source_name(), result.page_number, result.content)
}

/// Numbers the results `[1]..[n]` in order and joins them with
/// [`CONTEXT_SEPARATOR`].
pub fn format_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format_entry(i + 1, r))
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Builds the context from ranked results, dropping trailing results that
/// would push the estimate past `settings.max_tokens`. The first result is
/// always kept.
pub fn assemble_context(results: Vec<SearchResult>, settings: &ContextSettings) -> RagContext {
    let mut kept: Vec<SearchResult> = Vec::new();
    let mut used = 0usize;
    for result in results {
        let mut cost = estimate_tokens(&format_entry(kept.len() + 1, &result));
        if !kept.is_empty() {
            cost += estimate_tokens(CONTEXT_SEPARATOR);
        }
        if !kept.is_empty() && used + cost > settings.max_tokens {
            debug!(kept = kept.len(), budget = settings.max_tokens, "context budget reached");
            break;
        }
        used += cost;
        kept.push(result);
    }

    let formatted_context = format_context(&kept);
    let citations = kept.iter().map(|r| citation_for(r, settings.excerpt_chars)).collect();
    RagContext { total_tokens: estimate_tokens(&formatted_context), formatted_context, citations, results: kept }
}
