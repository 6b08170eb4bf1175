use std::fs;
use std::io::Write;
use tempfile::TempDir;

use docsift_core::config::{Config, Settings};
use docsift_core::data_processor::DataProcessor;
use docsift_core::types::{Chunk, MatchType};
use docsift_core::Error;

#[test]
fn process_directory_single_small_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let file_path = dir.join("a.txt");
    let mut f = fs::File::create(&file_path).unwrap();
    writeln!(f, "Short text").unwrap();

    let processor = DataProcessor::new();
    let corpus = processor.process_directory(dir).expect("process");

    assert_eq!(corpus.documents.len(), 1);
    assert_eq!(corpus.chunks.len(), 1, "one small paragraph becomes one chunk");
    assert_eq!(corpus.chunks[0].content.trim(), "Short text");
    assert_eq!(corpus.chunks[0].file_id, "a");
    assert_eq!(corpus.chunks[0].page_number, 1);
}

#[test]
fn process_directory_limited_two_files_limit_one() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("a.txt"), "alpha bravo").unwrap();
    fs::write(dir.join("b.txt"), "charlie delta").unwrap();

    let processor = DataProcessor::new();
    let corpus = processor
        .process_directory_limited(dir, 1)
        .expect("process limited");

    // Only chunks from one document should be present
    let mut doc_ids = std::collections::HashSet::new();
    for c in &corpus.chunks { doc_ids.insert(c.file_id.clone()); }
    assert_eq!(doc_ids.len(), 1, "limited to one source document");
    assert_eq!(corpus.documents.len(), 1);
}

#[test]
fn nested_files_get_path_ids_and_stem_titles() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::create_dir_all(dir.join("papers")).unwrap();
    fs::write(dir.join("papers/deep_learning.txt"), "neural networks").unwrap();

    let corpus = DataProcessor::new().process_directory(dir).expect("process");
    assert_eq!(corpus.documents[0].id, "papers/deep_learning");
    assert_eq!(corpus.documents[0].title, "deep learning");
}

#[test]
fn settings_default_when_sections_missing() {
    let settings = Config::from_toml_str("").settings().expect("defaults");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.search.limit, 10);
    assert!((settings.search.vector_weight - 0.6).abs() < f32::EPSILON);
    assert!((settings.bm25.avg_doc_length - 300.0).abs() < f32::EPSILON);
    assert!((settings.bm25.corpus_size - 1000.0).abs() < f32::EPSILON);
}

#[test]
fn settings_override_single_field() {
    let config = Config::from_toml_str("[search]\nrerank = true\nlimit = 3\n[bm25]\navg_doc_length = 120.0\n");
    let settings = config.settings().expect("settings");
    assert!(settings.search.rerank);
    assert_eq!(settings.search.limit, 3);
    assert!((settings.search.min_score - 0.3).abs() < f32::EPSILON);
    assert!((settings.bm25.avg_doc_length - 120.0).abs() < f32::EPSILON);
    let limit: usize = config.get("search.limit").expect("raw get");
    assert_eq!(limit, 3);
}

#[test]
fn negative_weight_is_rejected() {
    let config = Config::from_toml_str("[search]\nkeyword_weight = -0.1\n");
    assert!(matches!(config.settings(), Err(Error::InvalidConfig(_))));
}

#[test]
fn chunk_validation_rejects_empty_ids_and_bad_vectors() {
    assert!(Chunk::new("", "f", "text", 1).validate().is_err());
    assert!(Chunk::new("c", " ", "text", 1).validate().is_err());
    let mut chunk = Chunk::new("c", "f", "text", 1);
    chunk.embedding = Some(vec![0.1, f32::NAN]);
    assert!(matches!(chunk.validate(), Err(Error::InvalidInput(_))));
    chunk.embedding = Some(vec![0.1, 0.2]);
    assert!(chunk.validate().is_ok());
}

#[test]
fn match_type_bands() {
    assert_eq!(MatchType::from_similarity(0.95), MatchType::Exact);
    assert_eq!(MatchType::from_similarity(0.9), MatchType::Exact);
    assert_eq!(MatchType::from_similarity(0.75), MatchType::Paraphrase);
    assert_eq!(MatchType::from_similarity(0.5), MatchType::Similar);
}

#[test]
fn shipped_config_matches_defaults() {
    let config = Config::from_toml_str(include_str!("../../../config.toml"));
    assert_eq!(config.settings().unwrap(), Settings::default());
}

#[test]
fn dev_overlay_is_valid() {
    let config = Config::from_toml_str(include_str!("../../../config.dev.toml"));
    let settings = config.settings().unwrap();
    assert_eq!(settings.retrieval.embedding_dim, 128);
    assert_eq!(settings.search, Default::default());
}
