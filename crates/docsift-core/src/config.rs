//! Configuration loader, typed engine settings and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars.
//! Every settings section falls back to its documented defaults when absent.
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?;
        Ok(config)
    }

    /// Builds a config from an in-memory TOML document, without env overrides.
    pub fn from_toml_str(toml: &str) -> Self {
        Self { figment: Figment::new().merge(Toml::string(toml)) }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Extracts and validates every engine section.
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchSettings,
    pub bm25: Bm25Params,
    pub plagiarism: PlagiarismSettings,
    pub retrieval: RetrievalSettings,
    pub context: ContextSettings,
    pub data: DataSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        self.bm25.validate()?;
        self.plagiarism.validate()?;
        if self.retrieval.embedding_dim == 0 {
            return Err(Error::InvalidConfig("retrieval.embedding_dim must be > 0".into()));
        }
        if self.data.words_per_chunk == 0 || !(0.0..1.0).contains(&self.data.overlap_percent) {
            return Err(Error::InvalidConfig(
                "data.words_per_chunk must be > 0 and data.overlap_percent in [0, 1)".into(),
            ));
        }
        Ok(())
    }
}

/// Hybrid search options. Weights must be non-negative so the fused score
/// never decreases when either component grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub limit: usize,
    pub vector_weight: f32,
    pub keyword_weight: f32,
    pub min_score: f32,
    pub rerank: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { limit: 10, vector_weight: 0.6, keyword_weight: 0.4, min_score: 0.3, rerank: false }
    }
}

impl SearchSettings {
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(Error::InvalidConfig("search.limit must be > 0".into()));
        }
        let weights = [self.vector_weight, self.keyword_weight];
        if weights.iter().any(|w| w.is_nan() || *w < 0.0) {
            return Err(Error::InvalidConfig("search weights must be non-negative".into()));
        }
        if !self.min_score.is_finite() || self.min_score < 0.0 {
            return Err(Error::InvalidConfig("search.min_score must be a non-negative number".into()));
        }
        Ok(())
    }
}

/// Constants of the BM25-like keyword scorer.
///
/// `corpus_size` is a fixed pseudo document count standing in for real
/// document-frequency statistics: `idf = ln((corpus_size + 1) / (tf + 0.5))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bm25Params {
    pub k1: f32,
    pub b: f32,
    pub avg_doc_length: f32,
    pub corpus_size: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75, avg_doc_length: 300.0, corpus_size: 1000.0 }
    }
}

impl Bm25Params {
    pub fn validate(&self) -> Result<()> {
        if self.k1 < 0.0 || !(0.0..=1.0).contains(&self.b) {
            return Err(Error::InvalidConfig("bm25.k1 must be >= 0 and bm25.b in [0, 1]".into()));
        }
        if self.avg_doc_length <= 0.0 || self.corpus_size <= 0.0 {
            return Err(Error::InvalidConfig("bm25.avg_doc_length and bm25.corpus_size must be > 0".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlagiarismSettings {
    pub threshold: f32,
    pub min_match_length: usize,
    pub window_size: usize,
    pub use_external: bool,
}

impl Default for PlagiarismSettings {
    fn default() -> Self {
        Self { threshold: 0.7, min_match_length: 5, window_size: 50, use_external: true }
    }
}

impl PlagiarismSettings {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidConfig("plagiarism.threshold must be in [0, 1]".into()));
        }
        if self.min_match_length == 0 || self.window_size == 0 {
            return Err(Error::InvalidConfig(
                "plagiarism.min_match_length and plagiarism.window_size must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Timeouts for the asynchronous collaborators, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub vector_timeout_ms: u64,
    pub storage_timeout_ms: u64,
    pub external_timeout_ms: u64,
    pub embedding_dim: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { vector_timeout_ms: 5_000, storage_timeout_ms: 5_000, external_timeout_ms: 10_000, embedding_dim: 384 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextSettings {
    pub max_tokens: usize,
    pub excerpt_chars: usize,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self { max_tokens: 4_000, excerpt_chars: 200 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub raw_txt_dir: String,
    pub snapshot_path: String,
    pub words_per_chunk: usize,
    pub overlap_percent: f32,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            raw_txt_dir: "./data/txt".to_string(),
            snapshot_path: "./data/corpus.json".to_string(),
            words_per_chunk: 300,
            overlap_percent: 0.2,
        }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
