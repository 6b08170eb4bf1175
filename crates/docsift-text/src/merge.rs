//! Overlap merge for match spans.
//!
//! A single greedy sweep, not an interval-scheduling optimum:
//!
//! 1. stable-sort by `start_position`;
//! 2. keep a "last accepted" match; a match starting at or before its
//!    `end_position` belongs to the same cluster and replaces it only when
//!    its similarity is strictly higher (so the earlier match wins ties);
//! 3. any other match opens a new cluster.
//!
//! Output spans never overlap, are sorted by start, and number at most as
//! many as the input. Re-running on the same input order gives the same output.

use docsift_core::types::PlagiarismMatch;

pub fn merge_overlapping_matches(mut matches: Vec<PlagiarismMatch>) -> Vec<PlagiarismMatch> {
    matches.sort_by_key(|m| m.start_position);

    let mut merged: Vec<PlagiarismMatch> = Vec::with_capacity(matches.len());
    for next in matches {
        match merged.last_mut() {
            Some(last) if next.start_position <= last.end_position => {
                if next.similarity > last.similarity {
                    *last = next;
                }
            }
            _ => merged.push(next),
        }
    }
    merged
}
