//! tb-runner: Sequential experiment pipeline.
//!
//! An [`Experiment`] names an engine, a corpus, analysis options, a
//! similarity model, topics, and qrels. Running one executes
//! index → retrieve → evaluate strictly in order, one subprocess at a
//! time. Stages whose outputs exist are skipped by the adapters, so
//! re-running a finished experiment performs no subprocess work; a
//! failed or skipped stage never aborts the pipeline, it just shows up
//! in the report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tb_core::prelude::*;
use tb_engines::{engine_for, EngineError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// One experiment declaration, a `[[experiment]]` table in the config
/// file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    /// Engine code: "indri" or "lucene".
    pub engine: String,
    /// Base tag; index and run tags derive from it unless overridden.
    pub tag: String,
    /// Corpus path, resolved against the corpus root when relative.
    pub corpus: PathBuf,
    /// Topics file (tab-separated number/title lines).
    pub topics: PathBuf,
    /// Relevance judgments for trec_eval.
    pub qrels: PathBuf,
    /// Similarity model code, resolved through the engine's model map.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub itag: Option<String>,
    #[serde(default)]
    pub rtag: Option<String>,
    #[serde(flatten)]
    pub options: IndexOptions,
}

impl Experiment {
    pub fn model_code(&self) -> &str {
        self.model.as_deref().unwrap_or("default")
    }

    /// Index tag: explicit, or the base tag.
    pub fn itag(&self) -> String {
        self.itag.clone().unwrap_or_else(|| self.tag.clone())
    }

    /// Run tag: explicit, or `<tag>.<model>`.
    pub fn rtag(&self) -> String {
        self.rtag
            .clone()
            .unwrap_or_else(|| format!("{}.{}", self.tag, self.model_code()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Index,
    Retrieve,
    Evaluate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Index => write!(f, "index"),
            Stage::Retrieve => write!(f, "retrieve"),
            Stage::Evaluate => write!(f, "evaluate"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: Stage,
    pub status: OpStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub engine: String,
    pub itag: String,
    pub rtag: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub stages: Vec<StageReport>,
}

impl ExperimentReport {
    /// True when no stage failed (skips count as fine).
    pub fn clean(&self) -> bool {
        !self
            .stages
            .iter()
            .any(|s| matches!(s.status, OpStatus::Failed { .. }))
    }
}

/// Run one experiment end to end.
pub async fn run_experiment(
    layout: &PathLayout,
    exp: &Experiment,
) -> Result<ExperimentReport, RunnerError> {
    let engine = engine_for(&exp.engine, layout.clone())?;
    let queries = QuerySet::from_file(&exp.topics)?;
    let itag = exp.itag();
    let rtag = exp.rtag();

    let started_at = Utc::now();
    let mut stages = Vec::with_capacity(3);

    let status = engine.index(&itag, &exp.corpus, &exp.options).await?;
    tracing::info!("{} index {itag}: {status}", exp.engine);
    stages.push(StageReport { stage: Stage::Index, status });

    let status = engine
        .retrieve(&itag, &rtag, &exp.options, exp.model_code(), &queries)
        .await?;
    tracing::info!("{} retrieve {rtag}: {status}", exp.engine);
    stages.push(StageReport { stage: Stage::Retrieve, status });

    let status = engine.evaluate(&rtag, &exp.qrels).await?;
    tracing::info!("{} evaluate {rtag}: {status}", exp.engine);
    stages.push(StageReport { stage: Stage::Evaluate, status });

    Ok(ExperimentReport {
        engine: exp.engine.clone(),
        itag,
        rtag,
        started_at,
        finished_at: Utc::now(),
        stages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn temp_layout(root: &Path) -> PathLayout {
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
        layout
    }

    fn experiment(root: &Path) -> Experiment {
        let topics = root.join("topics.401-450");
        std::fs::write(&topics, "401\tforeign minorities Germany\n").unwrap();
        let qrels = root.join("qrels.401-450");
        std::fs::write(&qrels, "401 0 AP880212-0001 1\n").unwrap();
        Experiment {
            engine: "indri".to_string(),
            tag: "ap".to_string(),
            corpus: PathBuf::from("ap88"),
            topics,
            qrels,
            model: Some("lm".to_string()),
            itag: None,
            rtag: None,
            options: IndexOptions::default(),
        }
    }

    #[test]
    fn tags_derive_from_base_tag() {
        let dir = tempfile::tempdir().unwrap();
        let exp = experiment(dir.path());
        assert_eq!(exp.itag(), "ap");
        assert_eq!(exp.rtag(), "ap.lm");

        let mut exp = exp;
        exp.itag = Some("ap.p".to_string());
        exp.rtag = Some("ap.p.km".to_string());
        assert_eq!(exp.itag(), "ap.p");
        assert_eq!(exp.rtag(), "ap.p.km");
    }

    #[test]
    fn experiment_deserializes_from_toml() {
        let exp: Experiment = toml::from_str(
            r#"
            engine = "lucene"
            tag = "ap.k"
            corpus = "ap88"
            topics = "/data/topics.401-450"
            qrels = "/data/qrels.401-450"
            model = "bm25"
            stopwords = "ser17.txt"
            stemmer = "k"
            "#,
        )
        .unwrap();
        assert_eq!(exp.engine, "lucene");
        assert_eq!(exp.rtag(), "ap.k.bm25");
        assert_eq!(exp.options.stopwords.as_deref(), Some("ser17.txt"));
        assert_eq!(exp.options.stemmer, Some(Stemmer::Krovetz));
    }

    #[tokio::test]
    async fn finished_experiment_is_all_skips() {
        let dir = tempfile::tempdir().unwrap();
        let layout = temp_layout(dir.path());
        let exp = experiment(dir.path());

        // Outputs of all three stages already exist; the engine
        // binaries do not, so any spawn attempt would surface as Err.
        std::fs::create_dir_all(layout.index_dir("ap")).unwrap();
        std::fs::write(layout.run_file("ap.lm"), "401 Q0 D1 1 1.0 x\n").unwrap();
        std::fs::write(layout.eval_file("ap.lm"), "map all 0.1\n").unwrap();

        let report = run_experiment(&layout, &exp).await.unwrap();
        assert!(report.clean());
        assert!(report.stages.iter().all(|s| s.status.skipped()));
    }

    #[tokio::test]
    async fn missing_inputs_cascade_without_aborting() {
        let dir = tempfile::tempdir().unwrap();
        let layout = temp_layout(dir.path());
        let exp = experiment(dir.path());

        // No corpus, no index, no run file: every stage reports a
        // missing prerequisite and the pipeline still completes.
        let report = run_experiment(&layout, &exp).await.unwrap();
        assert_eq!(report.stages.len(), 3);
        for s in &report.stages {
            assert!(
                matches!(s.status, OpStatus::MissingInput { .. }),
                "stage {} was {:?}",
                s.stage,
                s.status
            );
        }
        assert!(report.clean());
    }

    #[tokio::test]
    async fn unknown_engine_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let layout = temp_layout(dir.path());
        let mut exp = experiment(dir.path());
        exp.engine = "terrier".to_string();

        assert!(matches!(
            run_experiment(&layout, &exp).await,
            Err(RunnerError::Engine(EngineError::UnknownEngine(_)))
        ));
    }
}
