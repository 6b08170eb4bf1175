//! Async plagiarism check against a document store and an optional
//! external scanner.
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use docsift_core::config::{PlagiarismSettings, RetrievalSettings, Settings};
use docsift_core::error::{Error, Result};
use docsift_core::traits::{DocumentStore, ExternalScanner};
use docsift_core::types::{Document, PlagiarismMatch, PlagiarismReport};
use docsift_core::with_timeout;
use docsift_text::TermVector;

use crate::builder::{build_report, match_document, sanitize_external};

pub struct PlagiarismChecker {
    documents: Arc<dyn DocumentStore>,
    external: Option<Arc<dyn ExternalScanner>>,
    settings: PlagiarismSettings,
    retrieval: RetrievalSettings,
}

impl PlagiarismChecker {
    pub fn new(documents: Arc<dyn DocumentStore>, settings: &Settings) -> Self {
        Self {
            documents,
            external: None,
            settings: settings.plagiarism.clone(),
            retrieval: settings.retrieval.clone(),
        }
    }

    pub fn with_external(mut self, scanner: Arc<dyn ExternalScanner>) -> Self {
        self.external = Some(scanner);
        self
    }

    /// Per-call settings override, e.g. a threshold from the command line.
    pub fn with_settings(mut self, settings: PlagiarismSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Checks `text` against every stored document except `exclude_document_id`.
    ///
    /// Document matching fans out on the blocking pool, one task per
    /// document, and fans back in before the merge. A failing external
    /// scanner is logged and ignored. The store failing is fatal unless the
    /// external scanner answered.
    pub async fn check(&self, text: &str, exclude_document_id: Option<&str>) -> Result<PlagiarismReport> {
        if text.trim().is_empty() {
            return Ok(build_report(text, Vec::new()));
        }

        let (documents, external) = tokio::join!(
            with_timeout("document fetch", self.retrieval.storage_timeout_ms, self.documents.fetch_documents(exclude_document_id)),
            self.scan_external(text),
        );

        let mut matches = match (documents, &external) {
            (Ok(documents), _) => self.match_corpus(text, documents).await?,
            (Err(e), Some(_)) => {
                warn!(error = %e, "document store unavailable; reporting external matches only");
                Vec::new()
            }
            (Err(e), None) => {
                let mut reasons = vec![format!("documents: {e}")];
                if let Some(scanner) = self.external.as_ref().filter(|_| self.settings.use_external) {
                    reasons.push(format!("{}: unavailable", scanner.name()));
                }
                return Err(Error::RetrievalUnavailable { reasons });
            }
        };
        matches.extend(external.unwrap_or_default());
        Ok(build_report(text, matches))
    }

    async fn match_corpus(&self, text: &str, documents: Vec<Document>) -> Result<Vec<PlagiarismMatch>> {
        debug!(documents = documents.len(), "matching corpus");
        let text: Arc<str> = Arc::from(text);
        let text_vector = Arc::new(TermVector::from_text(&text));
        let tasks = documents.into_iter().map(|document| {
            let text = Arc::clone(&text);
            let text_vector = Arc::clone(&text_vector);
            let settings = self.settings.clone();
            tokio::task::spawn_blocking(move || match_document(&text, &text_vector, &document, &settings))
        });

        let mut matches = Vec::new();
        for joined in join_all(tasks).await {
            matches.extend(joined.map_err(|e| Error::Operation(format!("document matching task failed: {e}")))?);
        }
        Ok(matches)
    }

    /// `None` when no scanner is configured, it is disabled, or it failed.
    /// Returned matches are sanitized against `text`.
    async fn scan_external(&self, text: &str) -> Option<Vec<PlagiarismMatch>> {
        let scanner = self.external.as_ref().filter(|_| self.settings.use_external)?;
        match with_timeout("external scan", self.retrieval.external_timeout_ms, scanner.scan(text)).await {
            Ok(found) => {
                let word_count = text.split_whitespace().count();
                let (kept, dropped) = sanitize_external(found, word_count, self.settings.threshold);
                if dropped > 0 {
                    warn!(scanner = scanner.name(), dropped, "dropped external matches that do not fit the text");
                }
                debug!(scanner = scanner.name(), matches = kept.len(), "external scan done");
                Some(kept)
            }
            Err(e) => {
                warn!(scanner = scanner.name(), error = %e, "external scan failed; continuing without it");
                None
            }
        }
    }
}
