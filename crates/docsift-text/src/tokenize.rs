//! Keyword extraction shared by keyword scoring, re-ranking and grounding.

/// Function words dropped from keyword lists. Tokens of two characters or
/// fewer are dropped separately, so only longer words need listing here.
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "are", "was", "were", "for", "with", "from", "this", "that", "these", "those",
    "have", "has", "had", "been", "being", "will", "would", "could", "should", "can", "may",
    "might", "must", "does", "did", "not", "but", "its", "their", "there", "they", "them",
    "then", "than", "what", "which", "who", "whom", "when", "where", "why", "how", "into",
    "about", "also",
];

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Lowercases and removes every character that is neither a word character
/// (alphanumeric or `_`) nor whitespace.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalized tokens, including stop words and short tokens.
pub fn normalized_words(text: &str) -> Vec<String> {
    normalize(text).split_whitespace().map(str::to_string).collect()
}

/// Lowercased whitespace-separated words, punctuation kept.
pub fn lowercase_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Extracts query keywords: normalized tokens longer than two characters that
/// are not stop words, in input order. Duplicates are kept.
pub fn tokenize_keywords(query: &str) -> Vec<String> {
    normalize(query)
        .split_whitespace()
        .filter(|t| t.chars().count() > 2 && !is_stop_word(t))
        .map(str::to_string)
        .collect()
}
