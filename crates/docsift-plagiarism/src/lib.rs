//! docsift-plagiarism
//!
//! Overlap and paraphrase detection between an analyzed text and a document
//! corpus, aggregated into a report with severity and a highlight view.
#![deny(unused_imports)]

pub mod builder;
pub mod checker;
pub mod report;

pub use builder::{build_report, check_against_corpus, match_document, sanitize_external};
pub use checker::PlagiarismChecker;
pub use report::{coverage, ReportView, Segment, Severity};
