//! Indri adapter.
//!
//! Drives `IndriBuildIndex` and `IndriRunQuery` from an Indri
//! installation. Both binaries are parameter-file driven; the files
//! are generated by [`params`] under the layout's index/runs roots so
//! a failed run can be reproduced by hand.

pub mod params;

use crate::{process, trec_eval, EngineError, SearchEngine};
use async_trait::async_trait;
use std::path::Path;
use tb_core::prelude::*;

pub struct IndriEngine {
    layout: PathLayout,
}

impl IndriEngine {
    pub fn new(layout: PathLayout) -> Self {
        Self { layout }
    }
}

#[async_trait]
impl SearchEngine for IndriEngine {
    fn name(&self) -> &'static str {
        "indri"
    }

    async fn index(
        &self,
        itag: &str,
        corpus: &Path,
        opt: &IndexOptions,
    ) -> Result<OpStatus, EngineError> {
        let out_dir = self.layout.index_dir(itag);
        if out_dir.exists() {
            tracing::info!("index: found {itag}, skipping");
            return Ok(OpStatus::Skipped { existing: out_dir });
        }

        let corpus = self.layout.resolve_corpus(corpus);
        if !corpus.exists() {
            tracing::warn!("index: corpus not found for {itag}: {}", corpus.display());
            return Ok(OpStatus::MissingInput { path: corpus });
        }

        let stopwords = opt
            .stopwords
            .as_deref()
            .map(|name| self.layout.stopwords_file(name));
        // Indri only knows porter and krovetz; anything else indexes
        // unstemmed.
        let stemmer = opt.stemmer.and_then(|s| {
            let name = s.indri_name();
            if name.is_none() {
                tracing::warn!("index: indri has no {:?} stemmer, building unstemmed", s);
            }
            name
        });

        let doc = params::index_params(&corpus, &out_dir, stopwords.as_deref(), stemmer)?;
        let p_file = self.layout.index_params_file(itag);
        tokio::fs::write(&p_file, doc).await?;

        let cap =
            process::run(self.layout.indri_build_index(), &[p_file.display().to_string()])
                .await?;

        // The build log is kept on success too; Indri reports term and
        // document counts there.
        let log = self.layout.index_log(self.name(), itag);
        tokio::fs::write(&log, cap.log_text()).await?;

        if cap.success() {
            Ok(OpStatus::Completed)
        } else {
            tracing::warn!("index: IndriBuildIndex failed for {itag}, see {}", log.display());
            Ok(OpStatus::Failed { log })
        }
    }

    async fn retrieve(
        &self,
        itag: &str,
        rtag: &str,
        _opt: &IndexOptions,
        _model: &str,
        queries: &QuerySet,
    ) -> Result<OpStatus, EngineError> {
        // A stemmed index stems query terms itself; there is nothing to
        // restate here, and Indri's query language fixes the retrieval
        // model, so `_opt` and `_model` stay unused.
        let i_dir = self.layout.index_dir(itag);
        if !i_dir.exists() {
            tracing::warn!("retrieve: didn't find index {itag}");
            return Ok(OpStatus::MissingInput { path: i_dir });
        }

        let out = self.layout.run_file(rtag);
        if out.exists() {
            tracing::info!("retrieve: found {rtag}, skipping");
            return Ok(OpStatus::Skipped { existing: out });
        }

        let doc = params::query_params(queries)?;
        let p_file = self.layout.query_params_file(rtag);
        tokio::fs::write(&p_file, doc).await?;

        let args = vec![
            p_file.display().to_string(),
            format!("-index={}", i_dir.display()),
            "-count=1000".to_string(),
            "-trecFormat=true".to_string(),
        ];
        let cap = process::run(self.layout.indri_run_query(), &args).await?;

        if cap.success() {
            tokio::fs::write(&out, &cap.stdout).await?;
            Ok(OpStatus::Completed)
        } else {
            let log = self.layout.retrieve_log(self.name(), rtag);
            tokio::fs::write(&log, cap.log_text()).await?;
            tracing::warn!("retrieve: IndriRunQuery failed for {rtag}, see {}", log.display());
            Ok(OpStatus::Failed { log })
        }
    }

    async fn evaluate(&self, rtag: &str, qrels: &Path) -> Result<OpStatus, EngineError> {
        trec_eval::evaluate(&self.layout, self.name(), rtag, qrels).await
    }
}
