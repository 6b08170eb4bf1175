//! Embeds stored chunks that have no vector yet.
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use docsift_core::error::{Error, Result};
use docsift_core::traits::Embedder;

use crate::store::MemoryStore;

/// Embeds every chunk without an embedding, `batch_size` texts at a time.
///
/// A failing batch is logged and skipped; its chunks stay unembedded and are
/// picked up by the next run. Returns the number of chunks embedded.
pub fn backfill_embeddings(store: &MemoryStore, embedder: &dyn Embedder, batch_size: usize, show_progress: bool) -> Result<usize> {
    let pending: Vec<(String, String)> = store
        .chunks()?
        .into_iter()
        .filter(|c| c.embedding.is_none())
        .map(|c| (c.id, c.content))
        .collect();
    if pending.is_empty() { return Ok(0); }

    let pb = if show_progress { ProgressBar::new(pending.len() as u64) } else { ProgressBar::hidden() };
    if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}") {
        pb.set_style(style.progress_chars("#>-"));
    }

    let mut processed = 0usize;
    for batch in pending.chunks(batch_size.max(1)) {
        let texts: Vec<String> = batch.iter().map(|(_, content)| content.clone()).collect();
        let vectors = match embedder.embed_batch(&texts) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, batch = batch.len(), "embedding batch failed, skipping");
                pb.inc(batch.len() as u64);
                continue;
            }
        };
        if vectors.len() != texts.len() {
            return Err(Error::Operation(format!("embedder returned {} vectors for {} texts", vectors.len(), texts.len())));
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != embedder.dim()) {
            return Err(Error::InvalidInput(format!("dim mismatch: got {} expected {}", bad.len(), embedder.dim())));
        }
        let updates = batch.iter().map(|(id, _)| id.clone()).zip(vectors).collect();
        processed += store.set_embeddings(updates)?;
        pb.set_position(processed as u64);
    }
    pb.finish_with_message("embedding backfill complete");
    info!(processed, "embedded chunks");
    Ok(processed)
}
