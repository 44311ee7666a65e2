//! tb-engines: Adapters for the external retrieval tools.
//!
//! Each engine implements the same three-operation contract — index,
//! retrieve, evaluate — against its own command-line conventions.
//! The adapters generate whatever parameter or query files the tool
//! expects, invoke it as a subprocess, and persist outputs into the
//! shared [`PathLayout`]. Operations whose outputs already exist are
//! skipped; engine failures land in log files, not in `Err`.

pub mod indri;
pub mod lucene;
pub mod process;
pub mod trec_eval;

pub use indri::IndriEngine;
pub use lucene::LuceneEngine;

use async_trait::async_trait;
use std::path::Path;
use tb_core::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("failed to spawn {program}: {message}")]
    Spawn { program: String, message: String },
    #[error("unknown engine: {0}")]
    UnknownEngine(String),
}

/// The adapter contract. Implementations translate these calls into
/// the wrapped tool's own command line; none of them rank, stem, or
/// score anything themselves.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Short engine name, used in log file names and reports.
    fn name(&self) -> &'static str;

    /// Build the index tagged `itag` from the corpus at `corpus`.
    async fn index(
        &self,
        itag: &str,
        corpus: &Path,
        opt: &IndexOptions,
    ) -> Result<OpStatus, EngineError>;

    /// Run `queries` against the index tagged `itag`, persisting a
    /// TREC-format run file tagged `rtag`. `model` is the similarity
    /// model code; engines without a pluggable model ignore it.
    async fn retrieve(
        &self,
        itag: &str,
        rtag: &str,
        opt: &IndexOptions,
        model: &str,
        queries: &QuerySet,
    ) -> Result<OpStatus, EngineError>;

    /// Score the run file tagged `rtag` against `qrels` with trec_eval.
    async fn evaluate(&self, rtag: &str, qrels: &Path) -> Result<OpStatus, EngineError>;
}

/// Look up an engine adapter by its config code.
pub fn engine_for(code: &str, layout: PathLayout) -> Result<Box<dyn SearchEngine>, EngineError> {
    match code {
        "indri" => Ok(Box::new(IndriEngine::new(layout))),
        "lucene" => Ok(Box::new(LuceneEngine::new(layout))),
        other => Err(EngineError::UnknownEngine(other.to_string())),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;
    use tb_core::paths::PathLayout;

    /// A layout rooted under `root` with all output dirs created and
    /// tool homes pointing at (usually nonexistent) paths under it.
    pub fn temp_layout(root: &Path) -> PathLayout {
        let layout = PathLayout {
            corpus: root.join("doc"),
            index: root.join("index"),
            runs: root.join("runs"),
            evals: root.join("evals"),
            log: root.join("log"),
            misc: root.join("misc"),
            indri_home: root.join("indri"),
            lucene_home: root.join("lucene-trec"),
            trec_eval: root.join("trec_eval"),
        };
        layout.ensure_dirs().unwrap();
        std::fs::create_dir_all(&layout.corpus).unwrap();
        std::fs::create_dir_all(&layout.misc).unwrap();
        layout
    }
}
