//! docsift-core
//!
//! Domain types, the error enum, collaborator traits, configuration and
//! directory ingestion shared by every docsift crate.
#![deny(unused_imports)]

pub mod config;
pub mod data_processor;
pub mod error;
pub mod timeout;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use timeout::with_timeout;
