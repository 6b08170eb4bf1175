//! docsift-vector
//!
//! Embedding similarity, the in-memory chunk/document store and a brute-force
//! vector search over it.
pub mod backfill;
pub mod search;
pub mod similarity;
pub mod store;

pub use backfill::backfill_embeddings;
pub use search::MemoryVectorSearch;
pub use similarity::embedding_cosine;
pub use store::{MemoryStore, Snapshot};
