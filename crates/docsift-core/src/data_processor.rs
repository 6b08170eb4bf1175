//! Turns a directory of extracted `.txt` files into documents and page-aware chunks.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::DataSettings;
use crate::error::Result;
use crate::types::{Chunk, Document};

/// Form feed, emitted between pages by most PDF text extractors.
const PAGE_BREAK: char = '\u{c}';

#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub words_per_chunk: usize,
    pub overlap_percent: f32,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { words_per_chunk: 300, overlap_percent: 0.2 }
    }
}

impl From<&DataSettings> for ChunkingConfig {
    fn from(data: &DataSettings) -> Self {
        Self { words_per_chunk: data.words_per_chunk.max(1), overlap_percent: data.overlap_percent }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IngestedCorpus {
    pub documents: Vec<Document>,
    pub chunks: Vec<Chunk>,
}

#[derive(Default)]
pub struct DataProcessor {
    chunking_config: ChunkingConfig,
}

impl DataProcessor {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(chunking_config: ChunkingConfig) -> Self { Self { chunking_config } }

    pub fn process_directory(&self, data_dir: &Path) -> Result<IngestedCorpus> {
        self.process_files(data_dir, self.list_txt_files(data_dir))
    }

    pub fn process_directory_limited(&self, data_dir: &Path, limit: usize) -> Result<IngestedCorpus> {
        let mut files = self.list_txt_files(data_dir);
        if files.len() > limit {
            files.truncate(limit);
            info!(limit, "limited ingest to first files");
        }
        self.process_files(data_dir, files)
    }

    /// Builds the document and its chunks from already-extracted text.
    pub fn process_text(&self, doc_id: &str, title: &str, content: &str) -> (Document, Vec<Chunk>) {
        let document = Document::new(doc_id, title, content);
        let chunks = self.chunk_content(content, doc_id);
        (document, chunks)
    }

    fn process_files(&self, data_dir: &Path, files: Vec<PathBuf>) -> Result<IngestedCorpus> {
        if files.is_empty() {
            warn!(dir = %data_dir.display(), "no .txt files found");
            return Ok(IngestedCorpus::default());
        }
        let mut corpus = IngestedCorpus::default();
        for (file_index, file_path) in files.iter().enumerate() {
            info!(file = %file_path.display(), "processing file {}/{}", file_index + 1, files.len());
            let content = self.read_file_content(file_path)?;
            let doc_id = self.extract_doc_id(file_path, data_dir);
            let title = self.extract_title(file_path);
            let (document, chunks) = self.process_text(&doc_id, &title, &content);
            corpus.documents.push(document);
            corpus.chunks.extend(chunks);
        }
        info!(files = files.len(), chunks = corpus.chunks.len(), "ingest finished");
        Ok(corpus)
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
        }
    }

    /// Relative path without extension, `/`-separated on every platform.
    fn extract_doc_id(&self, file_path: &Path, data_dir: &Path) -> String {
        let relative = file_path.strip_prefix(data_dir).unwrap_or(file_path).with_extension("");
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn extract_title(&self, file_path: &Path) -> String {
        file_path
            .file_stem()
            .map(|s| s.to_string_lossy().replace(['_', '-'], " "))
            .unwrap_or_else(|| "untitled".to_string())
    }

    fn chunk_content(&self, content: &str, doc_id: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for (page_index, page) in content.split(PAGE_BREAK).enumerate() {
            let page_number = u32::try_from(page_index + 1).unwrap_or(u32::MAX);
            for paragraph in page.split("\n\n") {
                let paragraph = paragraph.trim();
                if paragraph.is_empty() { continue; }
                let pieces = if paragraph.split_whitespace().count() <= self.chunking_config.words_per_chunk {
                    vec![paragraph.to_string()]
                } else {
                    self.split_paragraph_with_overlap(paragraph)
                };
                for piece in pieces {
                    chunks.push(Chunk::new(format!("{}:{}", doc_id, chunks.len()), doc_id, piece, page_number));
                }
            }
        }
        chunks
    }

    fn split_paragraph_with_overlap(&self, paragraph: &str) -> Vec<String> {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        let words_per_chunk = self.chunking_config.words_per_chunk.max(1);
        let overlap_words = ((words_per_chunk as f32 * self.chunking_config.overlap_percent) as usize).min(words_per_chunk - 1);
        let mut chunks = Vec::new();
        let mut start = 0;
        while start < words.len() {
            let end = (start + words_per_chunk).min(words.len());
            chunks.push(words[start..end].join(" "));
            if end >= words.len() { break; }
            start = end - overlap_words;
        }
        chunks
    }

    fn list_txt_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut txt_files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("txt") { txt_files.push(path.to_path_buf()); }
        }
        txt_files.sort();
        txt_files
    }
}
