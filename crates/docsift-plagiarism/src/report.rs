//! Severity classification and a renderer-agnostic view of a report.
use std::fmt;

use serde::{Deserialize, Serialize};

use docsift_core::types::{MatchType, PlagiarismReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Low,
    Moderate,
    High,
}

impl Severity {
    pub fn from_coverage(coverage: f32) -> Self {
        if coverage <= 0.0 {
            Severity::None
        } else if coverage < 0.15 {
            Severity::Low
        } else if coverage < 0.40 {
            Severity::Moderate
        } else {
            Severity::High
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::None => "none",
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
        };
        f.write_str(s)
    }
}

/// Share of analyzed words inside some match, in `[0, 1]`.
pub fn coverage(report: &PlagiarismReport) -> f32 {
    if report.word_count == 0 {
        return 0.0;
    }
    let mut covered = vec![false; report.word_count];
    for m in &report.matches {
        let end = m.end_position.min(report.word_count);
        for slot in covered.iter_mut().take(end).skip(m.start_position) {
            *slot = true;
        }
    }
    covered.iter().filter(|c| **c).count() as f32 / report.word_count as f32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    /// Index into `PlagiarismReport::matches` for highlighted segments.
    pub match_index: Option<usize>,
    pub match_type: Option<MatchType>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportView {
    pub severity: Severity,
    pub coverage: f32,
    pub segments: Vec<Segment>,
    pub summary: String,
}

impl ReportView {
    /// Splits the analyzed text into plain and highlighted word runs.
    /// Matches must be sorted and non-overlapping, as in a built report.
    pub fn from_report(report: &PlagiarismReport) -> Self {
        let words: Vec<&str> = report.analyzed_text.split_whitespace().collect();
        let mut segments = Vec::new();
        let mut cursor = 0;

        for (index, m) in report.matches.iter().enumerate() {
            let start = m.start_position.min(words.len());
            let end = m.end_position.min(words.len());
            if start < cursor || start >= end {
                continue;
            }
            if cursor < start {
                segments.push(plain(&words[cursor..start]));
            }
            segments.push(Segment {
                text: words[start..end].join(" "),
                match_index: Some(index),
                match_type: Some(m.match_type),
                source: m.source_title.clone().or_else(|| m.source_url.clone()),
            });
            cursor = end;
        }
        if cursor < words.len() {
            segments.push(plain(&words[cursor..]));
        }

        let coverage = coverage(report);
        let severity = Severity::from_coverage(coverage);
        let summary = format!(
            "{} match(es) from {} source(s); {:.0}% of {} words flagged; severity {}",
            report.total_matches,
            report.sources.len(),
            coverage * 100.0,
            report.word_count,
            severity
        );
        Self { severity, coverage, segments, summary }
    }
}

fn plain(words: &[&str]) -> Segment {
    Segment { text: words.join(" "), match_index: None, match_type: None, source: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use docsift_core::types::PlagiarismMatch;

    fn report(text: &str, spans: &[(usize, usize)]) -> PlagiarismReport {
        let matches: Vec<PlagiarismMatch> = spans
            .iter()
            .map(|&(s, e)| PlagiarismMatch {
                source_text: String::new(),
                matched_text: String::new(),
                similarity: 1.0,
                start_position: s,
                end_position: e,
                source_url: None,
                source_title: Some("Src".into()),
                match_type: MatchType::Exact,
            })
            .collect();
        PlagiarismReport {
            overall_similarity: if matches.is_empty() { 0.0 } else { 1.0 },
            total_matches: matches.len(),
            matches,
            analyzed_text: text.to_string(),
            word_count: text.split_whitespace().count(),
            checked_at: Utc::now(),
            sources: vec!["Src".into()],
        }
    }

    #[test]
    fn severity_bands() {
        assert_eq!(Severity::from_coverage(0.0), Severity::None);
        assert_eq!(Severity::from_coverage(0.1), Severity::Low);
        assert_eq!(Severity::from_coverage(0.15), Severity::Moderate);
        assert_eq!(Severity::from_coverage(0.39), Severity::Moderate);
        assert_eq!(Severity::from_coverage(0.4), Severity::High);
    }

    #[test]
    fn segments_cover_the_text() {
        let r = report("a b c d e f g h i j", &[(2, 4), (7, 10)]);
        let view = ReportView::from_report(&r);
        let texts: Vec<&str> = view.segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["a b", "c d", "e f g", "h i j"]);
        assert_eq!(view.segments[1].match_index, Some(0));
        assert_eq!(view.segments[3].source.as_deref(), Some("Src"));
        assert!((view.coverage - 0.5).abs() < 1e-6);
        assert_eq!(view.severity, Severity::High);
        assert!(view.summary.contains("50% of 10 words"));
    }

    #[test]
    fn clean_report_is_one_plain_segment() {
        let view = ReportView::from_report(&report("nothing to see here", &[]));
        assert_eq!(view.severity, Severity::None);
        assert_eq!(view.segments.len(), 1);
        assert!(view.segments[0].match_index.is_none());
    }

    #[test]
    fn out_of_range_spans_are_clamped() {
        let r = report("one two three", &[(1, 40)]);
        assert!((coverage(&r) - 2.0 / 3.0).abs() < 1e-6);
    }
}
