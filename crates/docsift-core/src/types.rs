//! Domain types shared by the retrieval and similarity engines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub type ChunkId = String;
pub type FileId = String;

/// A slice of a source document's text; the unit of retrieval.
///
/// - `id`: globally unique chunk identifier (`<file_id>:<index>`)
/// - `file_id`: identity of the parent document
/// - `page_number`: 1-based page the chunk was cut from
/// - `embedding`: dense vector produced by the embedding collaborator, if any
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub file_id: FileId,
    pub content: String,
    pub page_number: u32,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

impl Chunk {
    pub fn new(id: impl Into<String>, file_id: impl Into<String>, content: impl Into<String>, page_number: u32) -> Self {
        Self { id: id.into(), file_id: file_id.into(), content: content.into(), page_number, embedding: None }
    }

    /// Rejects rows that cannot take part in scoring.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidInput("chunk id is empty".into()));
        }
        if self.file_id.trim().is_empty() {
            return Err(Error::InvalidInput(format!("chunk {} has no file id", self.id)));
        }
        if let Some(v) = &self.embedding {
            if v.is_empty() || v.iter().any(|x| !x.is_finite()) {
                return Err(Error::InvalidInput(format!("chunk {} has a malformed embedding", self.id)));
            }
        }
        Ok(())
    }
}

/// A whole document as seen by the plagiarism checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: FileId,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    pub content: String,
}

impl Document {
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into(), url: None, content: content.into() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidInput("document id is empty".into()));
        }
        Ok(())
    }
}

/// Indicates which retrieval source produced a hit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Vector,
    Keyword,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Vector => f.write_str("vector"),
            SourceKind::Keyword => f.write_str("keyword"),
        }
    }
}

/// A chunk scored by one source. `score` is in `[0, 1]`, higher is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub chunk: Chunk,
    pub score: f32,
    pub source: SourceKind,
}

/// One fused retrieval result.
///
/// `score` is the ranking key: a non-negative weighted sum of `vector_score`
/// and `keyword_score`, plus any re-ranking bonus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk_id: ChunkId,
    pub content: String,
    pub page_number: u32,
    pub file_id: FileId,
    pub file_name: Option<String>,
    pub vector_score: f32,
    pub keyword_score: f32,
    pub score: f32,
}

impl SearchResult {
    pub fn from_chunk(chunk: &Chunk) -> Self {
        Self {
            chunk_id: chunk.id.clone(),
            content: chunk.content.clone(),
            page_number: chunk.page_number,
            file_id: chunk.file_id.clone(),
            file_name: None,
            vector_score: 0.0,
            keyword_score: 0.0,
            score: 0.0,
        }
    }

    /// Human-readable source label, falling back to the file id.
    pub fn source_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or(&self.file_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub source_id: FileId,
    pub source_name: String,
    pub page_number: u32,
    pub chunk_id: ChunkId,
    pub excerpt: String,
    pub confidence: f32,
}

/// Lower bound of the `Exact` band for scored matches.
pub const EXACT_MATCH_SIMILARITY: f32 = 0.9;
/// Lower bound of the `Paraphrase` band.
pub const PARAPHRASE_SIMILARITY: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchType {
    Exact,
    Paraphrase,
    Similar,
}

impl MatchType {
    /// Classifies a window score. Thresholding happens before this call.
    pub fn from_similarity(similarity: f32) -> Self {
        if similarity >= EXACT_MATCH_SIMILARITY {
            MatchType::Exact
        } else if similarity >= PARAPHRASE_SIMILARITY {
            MatchType::Paraphrase
        } else {
            MatchType::Similar
        }
    }
}

/// A matched span of the analyzed text.
///
/// Positions are word offsets into the analyzed (source) text; `end_position`
/// is exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismMatch {
    pub source_text: String,
    pub matched_text: String,
    pub similarity: f32,
    pub start_position: usize,
    pub end_position: usize,
    pub source_url: Option<String>,
    pub source_title: Option<String>,
    pub match_type: MatchType,
}

impl PlagiarismMatch {
    pub fn word_len(&self) -> usize {
        self.end_position.saturating_sub(self.start_position)
    }

    pub fn overlaps(&self, other: &PlagiarismMatch) -> bool {
        self.start_position < other.end_position && other.start_position < self.end_position
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismReport {
    pub overall_similarity: f32,
    pub total_matches: usize,
    pub matches: Vec<PlagiarismMatch>,
    pub analyzed_text: String,
    pub word_count: usize,
    pub checked_at: DateTime<Utc>,
    pub sources: Vec<String>,
}

/// A retrieved result backing a claim, with the claim-level confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportingSource {
    pub result: SearchResult,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundedClaim {
    pub claim: String,
    pub sources: Vec<SupportingSource>,
    pub confidence: f32,
}
