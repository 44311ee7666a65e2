//! tb-core: Shared types for trecbench
//!
//! This crate has zero internal crate dependencies and defines the
//! canonical types used across all other tb-* crates: the directory
//! layout experiments write into, indexing options, the Lucene
//! similarity-model map, query sets, and operation outcomes.

pub mod model;
pub mod options;
pub mod paths;
pub mod query;
pub mod status;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown stemmer code: {0}")]
    UnknownStemmer(String),
    #[error("model map {path}: {message}")]
    ModelMap { path: String, message: String },
    #[error("unknown similarity model code: {0}")]
    UnknownModel(String),
    #[error("topics file {path}, line {line}: {message}")]
    Topics {
        path: String,
        line: usize,
        message: String,
    },
}

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::model::ModelMap;
    pub use crate::options::{IndexOptions, Stemmer};
    pub use crate::paths::PathLayout;
    pub use crate::query::QuerySet;
    pub use crate::status::OpStatus;
    pub use crate::CoreError;
}
