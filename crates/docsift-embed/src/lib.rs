//! docsift-embed
//!
//! Deterministic feature-hashing embedder. It stands in for a real embedding
//! model in development, tests and offline runs: tokens are hashed into a
//! fixed number of buckets and the result is L2-normalized, so texts sharing
//! words get a positive cosine similarity.
use std::hash::{Hash, Hasher};

use anyhow::{anyhow, Result};
use docsift_core::traits::Embedder;
use tracing::debug;
use twox_hash::XxHash64;

pub const DEFAULT_DIM: usize = 384;
const DEFAULT_MAX_LEN: usize = 512;

pub struct HashingEmbedder { dim: usize, max_len: usize }

impl HashingEmbedder {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 { return Err(anyhow!("embedding dimension must be > 0")); }
        Ok(Self { dim, max_len: DEFAULT_MAX_LEN })
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for token in text.split_whitespace().take(self.max_len) {
            let token: String = token.chars().filter(|c| c.is_alphanumeric()).flat_map(char::to_lowercase).collect();
            if token.is_empty() { continue; }
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            let val = 0.5 + (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 { for x in &mut v { *x /= norm; } }
        v
    }
}

impl Embedder for HashingEmbedder {
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { self.max_len }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        debug!(batch = texts.len(), dim = self.dim, "hashing embed");
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

/// Embedder used by the CLI; `APP_EMBEDDING_DIM` overrides `dim`.
pub fn get_default_embedder(dim: usize) -> Result<Box<dyn Embedder>> {
    let dim = std::env::var("APP_EMBEDDING_DIM").ok().and_then(|v| v.parse().ok()).unwrap_or(dim);
    Ok(Box::new(HashingEmbedder::new(dim)?))
}
