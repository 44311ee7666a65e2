//! trec_eval invocation, shared by every adapter's `evaluate`.
//!
//! `trec_eval -q <qrels> <run_file>` writes per-query and summary
//! measures to stdout; that stdout becomes the evaluation report.

use crate::{process, EngineError};
use std::path::Path;
use tb_core::paths::PathLayout;
use tb_core::status::OpStatus;

pub async fn evaluate(
    layout: &PathLayout,
    engine: &str,
    rtag: &str,
    qrels: &Path,
) -> Result<OpStatus, EngineError> {
    let run = layout.run_file(rtag);
    if !run.exists() {
        tracing::warn!("evaluate: didn't find run {rtag}");
        return Ok(OpStatus::MissingInput { path: run });
    }

    if !qrels.exists() {
        tracing::warn!("evaluate: didn't find qrels {}", qrels.display());
        return Ok(OpStatus::MissingInput { path: qrels.to_path_buf() });
    }

    let out = layout.eval_file(rtag);
    if out.exists() {
        tracing::info!("evaluate: found {rtag}, skipping");
        return Ok(OpStatus::Skipped { existing: out });
    }

    let args = vec![
        "-q".to_string(),
        qrels.display().to_string(),
        run.display().to_string(),
    ];
    let cap = process::run(&layout.trec_eval, &args).await?;

    if cap.success() {
        tokio::fs::write(&out, &cap.stdout).await?;
        Ok(OpStatus::Completed)
    } else {
        let log = layout.eval_log(engine, rtag);
        tokio::fs::write(&log, cap.log_text()).await?;
        tracing::warn!("evaluate: trec_eval failed for {rtag}, see {}", log.display());
        Ok(OpStatus::Failed { log })
    }
}
