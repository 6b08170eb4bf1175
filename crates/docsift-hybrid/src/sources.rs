//! Per-source outcomes of one retrieval call.
use serde::{Deserialize, Serialize};
use tracing::warn;

use docsift_core::error::{Error, Result};
use docsift_core::types::{SearchHit, SearchResult, SourceKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    Ok { hits: usize },
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReport {
    pub kind: SourceKind,
    #[serde(flatten)]
    pub status: SourceStatus,
}

impl SourceReport {
    pub fn is_ok(&self) -> bool { matches!(self.status, SourceStatus::Ok { .. }) }
}

/// Ranked results plus what each source contributed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub sources: Vec<SourceReport>,
}

impl SearchOutcome {
    /// True when at least one source failed but results were still produced.
    pub fn is_degraded(&self) -> bool { self.sources.iter().any(|s| !s.is_ok()) }
}

/// Splits source outcomes into the surviving hits and their reports.
///
/// A failed source is logged and contributes nothing. Fails with
/// [`Error::RetrievalUnavailable`] only when every source failed.
pub fn collect_hits(outcomes: Vec<(SourceKind, Result<Vec<SearchHit>>)>) -> Result<(Vec<SearchHit>, Vec<SourceReport>)> {
    let mut hits = Vec::new();
    let mut reports = Vec::with_capacity(outcomes.len());
    let mut reasons = Vec::new();

    for (kind, outcome) in outcomes {
        match outcome {
            Ok(found) => {
                reports.push(SourceReport { kind, status: SourceStatus::Ok { hits: found.len() } });
                hits.extend(found);
            }
            Err(e) => {
                warn!(source = %kind, error = %e, "retrieval source unavailable, continuing without it");
                reasons.push(format!("{kind}: {e}"));
                reports.push(SourceReport { kind, status: SourceStatus::Unavailable { reason: e.to_string() } });
            }
        }
    }

    if !reports.is_empty() && reasons.len() == reports.len() {
        return Err(Error::RetrievalUnavailable { reasons });
    }
    Ok((hits, reports))
}
