//! Property-based tests for the text metrics and the overlap merge.

use docsift_core::types::{MatchType, PlagiarismMatch};
use docsift_text::*;
use proptest::prelude::*;

fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z]{1,8}", 0..20).prop_map(|w| w.join(" "))
}

fn arb_match() -> impl Strategy<Value = PlagiarismMatch> {
    (0usize..200, 1usize..40, 0.0f32..=1.0).prop_map(|(start, len, similarity)| PlagiarismMatch {
        source_text: String::new(),
        matched_text: String::new(),
        similarity,
        start_position: start,
        end_position: start + len,
        source_url: None,
        source_title: None,
        match_type: MatchType::from_similarity(similarity),
    })
}

proptest! {
    #[test]
    fn jaccard_is_symmetric(a in arb_text(), b in arb_text()) {
        prop_assert_eq!(jaccard_similarity(&a, &b), jaccard_similarity(&b, &a));
    }

    #[test]
    fn cosine_is_symmetric(a in arb_text(), b in arb_text()) {
        prop_assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn similarities_are_bounded(a in arb_text(), b in arb_text(), n in 1usize..4) {
        for s in [
            jaccard_similarity(&a, &b),
            cosine_similarity(&a, &b),
            levenshtein_similarity(&a, &b),
            ngram_similarity(&a, &b, n),
        ] {
            prop_assert!((0.0..=1.0).contains(&s), "out of range: {}", s);
        }
    }

    #[test]
    fn identity(s in "[a-z]{1,12}( [a-z]{1,12}){0,6}") {
        prop_assert_eq!(levenshtein_similarity(&s, &s), 1.0);
        prop_assert_eq!(jaccard_similarity(&s, &s), 1.0);
    }

    #[test]
    fn levenshtein_is_symmetric_and_bounded(a in "[a-z]{0,15}", b in "[a-z]{0,15}") {
        let d = levenshtein_distance(&a, &b);
        prop_assert_eq!(d, levenshtein_distance(&b, &a));
        prop_assert!(d <= a.chars().count().max(b.chars().count()));
    }

    #[test]
    fn bm25_is_bounded(content in arb_text(), query in arb_text()) {
        let keywords = tokenize_keywords(&query);
        let score = bm25_keyword_score(&content, &keywords, &Default::default());
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn merge_leaves_no_overlap(matches in prop::collection::vec(arb_match(), 0..40)) {
        let input_len = matches.len();
        let merged = merge_overlapping_matches(matches);
        prop_assert!(merged.len() <= input_len);
        for pair in merged.windows(2) {
            prop_assert!(pair[0].end_position <= pair[1].start_position);
        }
        for (i, a) in merged.iter().enumerate() {
            for b in merged.iter().skip(i + 1) {
                prop_assert!(!a.overlaps(b));
            }
        }
    }

    #[test]
    fn merge_is_deterministic(matches in prop::collection::vec(arb_match(), 0..40)) {
        prop_assert_eq!(merge_overlapping_matches(matches.clone()), merge_overlapping_matches(matches));
    }
}
