use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use docsift_core::config::{resolve_with_base, Config, Settings};
use docsift_core::data_processor::{ChunkingConfig, DataProcessor};
use docsift_core::traits::Embedder;
use docsift_core::types::FileId;
use docsift_embed::get_default_embedder;
use docsift_hybrid::HybridSearchEngine;
use docsift_plagiarism::{PlagiarismChecker, ReportView};
use docsift_vector::{backfill_embeddings, MemoryStore, MemoryVectorSearch};

#[derive(Parser, Debug)]
#[command(name = "docsift", version, about = "Hybrid retrieval and overlap detection over a local text corpus")]
struct Cli {
    /// Corpus snapshot (defaults to `data.snapshot_path`)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Chunk a directory of .txt files, embed the chunks and write a snapshot
    Ingest {
        /// Source directory (defaults to `data.raw_txt_dir`)
        dir: Option<PathBuf>,
        /// Only ingest the first N files
        #[arg(long)]
        limit_files: Option<usize>,
        #[arg(long, default_value_t = 32)]
        batch_size: usize,
    },
    /// Hybrid search over the snapshot
    Search {
        query: String,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        rerank: bool,
        /// Restrict to these file ids (repeatable)
        #[arg(long = "file")]
        files: Vec<FileId>,
    },
    /// Build a numbered prompt context for a query
    Context {
        query: String,
        #[arg(long = "file")]
        files: Vec<FileId>,
    },
    /// Attribute the sentences of an answer file to passages retrieved for a query
    Ground {
        answer_file: PathBuf,
        query: String,
        #[arg(long = "file")]
        files: Vec<FileId>,
    },
    /// Check a text file for overlap with the corpus
    Check {
        file: PathBuf,
        #[arg(long)]
        threshold: Option<f32>,
        /// Document id to leave out, e.g. the checked file itself
        #[arg(long)]
        exclude: Option<String>,
    },
}

fn load_store(path: &Path) -> anyhow::Result<Arc<MemoryStore>> {
    let store = MemoryStore::load(path)
        .with_context(|| format!("loading snapshot {} (run `docsift ingest` first)", path.display()))?;
    Ok(Arc::new(store))
}

fn engine(store: Arc<MemoryStore>, settings: &Settings) -> anyhow::Result<HybridSearchEngine> {
    let embedder: Arc<dyn Embedder> = Arc::from(get_default_embedder(settings.retrieval.embedding_dim)?);
    let vector = Arc::new(MemoryVectorSearch::new(store.clone(), embedder));
    Ok(HybridSearchEngine::new(store, vector, settings))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let settings = config.settings()?;
    let cwd = env::current_dir()?;
    let snapshot = cli
        .snapshot
        .clone()
        .unwrap_or_else(|| resolve_with_base(&cwd, &settings.data.snapshot_path));

    match cli.command {
        Command::Ingest { dir, limit_files, batch_size } => {
            let dir = dir.unwrap_or_else(|| resolve_with_base(&cwd, &settings.data.raw_txt_dir));
            let processor = DataProcessor::with_config(ChunkingConfig::from(&settings.data));
            let corpus = match limit_files {
                Some(limit) => processor.process_directory_limited(&dir, limit)?,
                None => processor.process_directory(&dir)?,
            };
            let store = MemoryStore::from_corpus(corpus.documents, corpus.chunks)?;
            let embedder = get_default_embedder(settings.retrieval.embedding_dim)?;
            let embedded = backfill_embeddings(&store, embedder.as_ref(), batch_size, true)?;
            store.save(&snapshot)?;
            info!(dir = %dir.display(), snapshot = %snapshot.display(), embedded, "ingest complete");
        }
        Command::Search { query, limit, rerank, files } => {
            let mut options = settings.search.clone();
            if let Some(limit) = limit {
                options.limit = limit;
            }
            options.rerank |= rerank;
            let engine = engine(load_store(&snapshot)?, &settings)?;
            print_json(&engine.search(&query, &files, &options).await?)?;
        }
        Command::Context { query, files } => {
            let engine = engine(load_store(&snapshot)?, &settings)?;
            print_json(&engine.build_rag_context(&query, &files).await?)?;
        }
        Command::Ground { answer_file, query, files } => {
            let answer = fs::read_to_string(&answer_file)
                .with_context(|| format!("reading {}", answer_file.display()))?;
            let engine = engine(load_store(&snapshot)?, &settings)?;
            print_json(&engine.ground(&answer, &query, &files).await?)?;
        }
        Command::Check { file, threshold, exclude } => {
            let text = fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
            let mut plagiarism = settings.plagiarism.clone();
            if let Some(threshold) = threshold {
                plagiarism.threshold = threshold;
            }
            plagiarism.validate()?;
            let checker = PlagiarismChecker::new(load_store(&snapshot)?, &settings).with_settings(plagiarism);
            let report = checker.check(&text, exclude.as_deref()).await?;
            let view = ReportView::from_report(&report);
            print_json(&serde_json::json!({ "report": report, "view": view }))?;
        }
    }
    Ok(())
}
