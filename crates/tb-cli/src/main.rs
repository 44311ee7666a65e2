//! trecbench — orchestrates Indri, Lucene, and trec_eval over
//! TREC-style collections.

mod config;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use config::Config;
use std::path::PathBuf;
use tb_core::prelude::*;
use tb_engines::engine_for;
use tb_runner::run_experiment;

#[derive(Parser, Debug)]
#[command(name = "trecbench", version, about = "TREC retrieval experiment orchestrator")]
struct Cli {
    /// Config file with the [paths] layout and [[experiment]] tables.
    #[arg(long, default_value = "trecbench.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Builds an index from a corpus.
    Index {
        /// Engine code: indri or lucene.
        #[arg(long)]
        engine: String,
        /// Index tag; names the index directory and its logs.
        #[arg(long)]
        itag: String,
        /// Corpus path, resolved against the corpus root when relative.
        #[arg(long)]
        corpus: PathBuf,
        /// Stopword file name under the misc root.
        #[arg(long)]
        stop: Option<String>,
        /// Stemmer code: p, k, s, or snowball.
        #[arg(long)]
        stem: Option<String>,
    },
    /// Runs queries against an existing index.
    Retrieve {
        #[arg(long)]
        engine: String,
        #[arg(long)]
        itag: String,
        /// Run tag; names the run file.
        #[arg(long)]
        rtag: String,
        /// Topics file (tab-separated number/title lines).
        #[arg(long)]
        topics: PathBuf,
        /// Similarity model code (Lucene only).
        #[arg(long, default_value = "default")]
        model: String,
        #[arg(long)]
        stop: Option<String>,
        #[arg(long)]
        stem: Option<String>,
    },
    /// Scores a run file with trec_eval.
    Evaluate {
        #[arg(long)]
        engine: String,
        #[arg(long)]
        rtag: String,
        /// Relevance judgments file.
        #[arg(long)]
        qrels: PathBuf,
    },
    /// Runs the configured experiments end to end.
    Run {
        /// Restrict to the experiment with this tag.
        #[arg(long)]
        only: Option<String>,
    },
}

fn parse_options(stop: Option<String>, stem: Option<&str>) -> Result<IndexOptions> {
    Ok(IndexOptions {
        stopwords: stop,
        stemmer: stem.map(Stemmer::from_code).transpose()?,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    config.paths.ensure_dirs()?;

    match cli.command {
        Commands::Index { engine, itag, corpus, stop, stem } => {
            let opt = parse_options(stop, stem.as_deref())?;
            let engine = engine_for(&engine, config.paths.clone())?;
            let status = engine.index(&itag, &corpus, &opt).await?;
            println!("index {itag}: {status}");
        }
        Commands::Retrieve { engine, itag, rtag, topics, model, stop, stem } => {
            let opt = parse_options(stop, stem.as_deref())?;
            let queries = QuerySet::from_file(&topics)?;
            let engine = engine_for(&engine, config.paths.clone())?;
            let status = engine
                .retrieve(&itag, &rtag, &opt, &model, &queries)
                .await?;
            println!("retrieve {rtag}: {status}");
        }
        Commands::Evaluate { engine, rtag, qrels } => {
            let engine = engine_for(&engine, config.paths.clone())?;
            let status = engine.evaluate(&rtag, &qrels).await?;
            println!("evaluate {rtag}: {status}");
        }
        Commands::Run { only } => {
            let experiments: Vec<_> = match &only {
                Some(tag) => config
                    .experiments
                    .iter()
                    .filter(|e| &e.tag == tag)
                    .collect(),
                None => config.experiments.iter().collect(),
            };
            if experiments.is_empty() {
                match only {
                    Some(tag) => bail!("no experiment tagged {tag} in {}", cli.config.display()),
                    None => bail!("no experiments in {}", cli.config.display()),
                }
            }

            for exp in experiments {
                let report = run_experiment(&config.paths, exp).await?;
                for stage in &report.stages {
                    println!(
                        "{} {} [{}]: {}",
                        report.engine, stage.stage, report.rtag, stage.status
                    );
                }
                if !report.clean() {
                    tracing::warn!("experiment {} had failed stages", exp.tag);
                }
            }
        }
    }

    Ok(())
}
