//! Directory layout for experiment artifacts.
//!
//! Every path an adapter reads or writes is derived here, so the
//! conventions (where indexes, run files, evaluation reports, and
//! subprocess logs land) live in exactly one place.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root directories for experiment artifacts plus the locations of the
/// external tools. Deserialized from the `[paths]` section of the config
/// file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathLayout {
    /// Where document collections live; relative corpus paths in an
    /// experiment resolve against this.
    pub corpus: PathBuf,
    /// Engine-built indexes and Indri index parameter files.
    pub index: PathBuf,
    /// Retrieval run files and query parameter files.
    pub runs: PathBuf,
    /// trec_eval reports.
    pub evals: PathBuf,
    /// Subprocess logs.
    pub log: PathBuf,
    /// Auxiliary inputs, e.g. stopword lists.
    pub misc: PathBuf,
    /// Indri installation root (contains bin/IndriBuildIndex etc.).
    pub indri_home: PathBuf,
    /// Lucene TREC jar root (contains lib/ and mods/models.lucene).
    pub lucene_home: PathBuf,
    /// Path to the trec_eval binary.
    pub trec_eval: PathBuf,
}

impl PathLayout {
    /// Resolve every relative path in the layout against `base`.
    /// External tools are handed these paths verbatim, so they must be
    /// absolute by the time an adapter runs.
    pub fn resolve_against(&mut self, base: &Path) {
        for p in [
            &mut self.corpus,
            &mut self.index,
            &mut self.runs,
            &mut self.evals,
            &mut self.log,
            &mut self.misc,
            &mut self.indri_home,
            &mut self.lucene_home,
            &mut self.trec_eval,
        ] {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
    }

    /// Create the output roots (index, runs, evals, log) if absent.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        for dir in [&self.index, &self.runs, &self.evals, &self.log] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Resolve an experiment's corpus path, joining relative ones onto
    /// the corpus root.
    pub fn resolve_corpus(&self, doc: &Path) -> PathBuf {
        if doc.is_relative() {
            self.corpus.join(doc)
        } else {
            doc.to_path_buf()
        }
    }

    // ----- indexes -----

    pub fn index_dir(&self, itag: &str) -> PathBuf {
        self.index.join(itag)
    }

    pub fn index_params_file(&self, itag: &str) -> PathBuf {
        self.index.join(format!("{itag}.indri"))
    }

    pub fn index_log(&self, engine: &str, itag: &str) -> PathBuf {
        self.log.join(format!("{itag}.{engine}.i"))
    }

    // ----- runs -----

    pub fn run_file(&self, rtag: &str) -> PathBuf {
        self.runs.join(rtag)
    }

    pub fn query_params_file(&self, rtag: &str) -> PathBuf {
        self.runs.join(format!("{rtag}.indri"))
    }

    pub fn lucene_query_file(&self, rtag: &str) -> PathBuf {
        self.runs.join(format!("{rtag}.lucene"))
    }

    pub fn retrieve_log(&self, engine: &str, rtag: &str) -> PathBuf {
        self.log.join(format!("{rtag}.{engine}.r"))
    }

    // ----- evaluation -----

    pub fn eval_file(&self, rtag: &str) -> PathBuf {
        self.evals.join(rtag)
    }

    pub fn eval_log(&self, engine: &str, rtag: &str) -> PathBuf {
        self.log.join(format!("{rtag}.{engine}.e"))
    }

    // ----- external tools -----

    pub fn stopwords_file(&self, name: &str) -> PathBuf {
        self.misc.join(name)
    }

    pub fn indri_build_index(&self) -> PathBuf {
        self.indri_home.join("bin").join("IndriBuildIndex")
    }

    pub fn indri_run_query(&self) -> PathBuf {
        self.indri_home.join("bin").join("IndriRunQuery")
    }

    /// Classpath entry covering the Lucene TREC jar and its libs. The
    /// glob is expanded by the JVM, not the shell.
    pub fn lucene_classpath(&self) -> String {
        format!("{}/*", self.lucene_home.join("lib").display())
    }

    pub fn lucene_model_map(&self) -> PathBuf {
        self.lucene_home.join("mods").join("models.lucene")
    }
}
