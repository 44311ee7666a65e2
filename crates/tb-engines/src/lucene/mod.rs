//! Lucene adapter.
//!
//! The engine side lives in a TREC jar driven through the JVM: an
//! `IndexTREC` main for indexing and a `BatchSearch` main for
//! retrieval. Both take the analysis chain (`-stop`, `-stem`) on the
//! command line, with the literal string `None` disabling a stage;
//! `BatchSearch` additionally wants a similarity class name, resolved
//! here through the jar's own model map before anything is spawned.

use crate::{process, trec_eval, EngineError, SearchEngine};
use async_trait::async_trait;
use std::path::Path;
use tb_core::prelude::*;

const JVM_HEAP: &str = "-Xmx2048m";

pub struct LuceneEngine {
    layout: PathLayout,
}

impl LuceneEngine {
    pub fn new(layout: PathLayout) -> Self {
        Self { layout }
    }

    fn stop_arg(&self, opt: &IndexOptions) -> String {
        match opt.stopwords.as_deref() {
            Some(name) => self.layout.stopwords_file(name).display().to_string(),
            None => "None".to_string(),
        }
    }

    fn stem_arg(&self, opt: &IndexOptions) -> String {
        match opt.stemmer {
            Some(s) => s.lucene_filter().to_string(),
            None => "None".to_string(),
        }
    }

    fn index_args(&self, out_dir: &Path, corpus: &Path, opt: &IndexOptions) -> Vec<String> {
        vec![
            JVM_HEAP.to_string(),
            "-cp".to_string(),
            self.layout.lucene_classpath(),
            "IndexTREC".to_string(),
            "-index".to_string(),
            out_dir.display().to_string(),
            "-docs".to_string(),
            corpus.display().to_string(),
            "-stop".to_string(),
            self.stop_arg(opt),
            "-stem".to_string(),
            self.stem_arg(opt),
        ]
    }

    fn search_args(
        &self,
        i_dir: &Path,
        q_file: &Path,
        similarity: &str,
        opt: &IndexOptions,
    ) -> Vec<String> {
        vec![
            "-cp".to_string(),
            self.layout.lucene_classpath(),
            "BatchSearch".to_string(),
            "-index".to_string(),
            i_dir.display().to_string(),
            "-queries".to_string(),
            q_file.display().to_string(),
            "-similarity".to_string(),
            similarity.to_string(),
            "-stop".to_string(),
            self.stop_arg(opt),
            "-stem".to_string(),
            self.stem_arg(opt),
        ]
    }

    /// BatchSearch reads queries from a file: `<number>\t<title>` per
    /// line, topic order preserved.
    fn render_query_file(queries: &QuerySet) -> String {
        let mut body = String::new();
        for (num, title) in queries.iter() {
            body.push_str(num);
            body.push('\t');
            body.push_str(title);
            body.push('\n');
        }
        body
    }
}

#[async_trait]
impl SearchEngine for LuceneEngine {
    fn name(&self) -> &'static str {
        "lucene"
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

        let args = self.index_args(&out_dir, &corpus, opt);
        let cap = process::run("java", &args).await?;

        let log = self.layout.index_log(self.name(), itag);
        tokio::fs::write(&log, cap.log_text()).await?;

        if cap.success() {
            Ok(OpStatus::Completed)
        } else {
            tracing::warn!("index: IndexTREC failed for {itag}, see {}", log.display());
            Ok(OpStatus::Failed { log })
        }
    }

    async fn retrieve(
        &self,
        itag: &str,
        rtag: &str,
        opt: &IndexOptions,
        model: &str,
        queries: &QuerySet,
    ) -> Result<OpStatus, EngineError> {
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

        // Resolve the similarity class first so a bad model code fails
        // before any file is written or process spawned.
        let map = ModelMap::load(&self.layout.lucene_model_map())?;
        let similarity = map.resolve(model)?.to_string();

        let q_file = self.layout.lucene_query_file(rtag);
        tokio::fs::write(&q_file, Self::render_query_file(queries)).await?;

        let args = self.search_args(&i_dir, &q_file, &similarity, opt);
        let cap = process::run("java", &args).await?;

        if cap.success() {
            tokio::fs::write(&out, &cap.stdout).await?;
            Ok(OpStatus::Completed)
        } else {
            let log = self.layout.retrieve_log(self.name(), rtag);
            tokio::fs::write(&log, cap.log_text()).await?;
            tracing::warn!("retrieve: BatchSearch failed for {rtag}, see {}", log.display());
            Ok(OpStatus::Failed { log })
        }
    }

    async fn evaluate(&self, rtag: &str, qrels: &Path) -> Result<OpStatus, EngineError> {
        trec_eval::evaluate(&self.layout, self.name(), rtag, qrels).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_layout;

    #[test]
    fn index_args_spell_out_the_jar_contract() {
        let dir = tempfile::tempdir().unwrap();
        let layout = temp_layout(dir.path());
        let engine = LuceneEngine::new(layout.clone());

        let opt = IndexOptions {
            stopwords: Some("ser17.txt".to_string()),
            stemmer: Some(Stemmer::Krovetz),
        };
        let args = engine.index_args(
            &layout.index_dir("ap.k"),
            &layout.corpus.join("ap88"),
            &opt,
        );

        assert_eq!(
            args,
            vec![
                "-Xmx2048m".to_string(),
                "-cp".to_string(),
                layout.lucene_classpath(),
                "IndexTREC".to_string(),
                "-index".to_string(),
                layout.index_dir("ap.k").display().to_string(),
                "-docs".to_string(),
                layout.corpus.join("ap88").display().to_string(),
                "-stop".to_string(),
                layout.stopwords_file("ser17.txt").display().to_string(),
                "-stem".to_string(),
                "KStemFilter".to_string(),
            ]
        );
    }

    #[test]
    fn absent_options_become_the_literal_none() {
        let dir = tempfile::tempdir().unwrap();
        let layout = temp_layout(dir.path());
        let engine = LuceneEngine::new(layout.clone());

        let args = engine.search_args(
            &layout.index_dir("ap"),
            &layout.lucene_query_file("ap.bm25"),
            "BM25Similarity",
            &IndexOptions::default(),
        );

        assert_eq!(args[args.len() - 3], "None"); // -stop value
        assert_eq!(args[args.len() - 1], "None"); // -stem value
        assert!(args.contains(&"BatchSearch".to_string()));
        assert!(args.contains(&"BM25Similarity".to_string()));
        // BatchSearch has no heap flag in the original invocation.
        assert!(!args.contains(&JVM_HEAP.to_string()));
    }

    #[test]
    fn query_file_is_tab_separated_in_order() {
        let mut q = QuerySet::new();
        q.push("401", "foreign minorities Germany");
        q.push("402", "behavioral genetics");
        assert_eq!(
            LuceneEngine::render_query_file(&q),
            "401\tforeign minorities Germany\n402\tbehavioral genetics\n"
        );
    }

    #[tokio::test]
    async fn retrieve_fails_fast_on_unknown_model() {
        let dir = tempfile::tempdir().unwrap();
        let layout = temp_layout(dir.path());
        std::fs::create_dir_all(layout.index_dir("ap")).unwrap();
        std::fs::create_dir_all(layout.lucene_home.join("mods")).unwrap();
        std::fs::write(
            layout.lucene_model_map(),
            r#"{"tfidf": "ClassicSimilarity"}"#,
        )
        .unwrap();

        let engine = LuceneEngine::new(layout.clone());
        let err = engine
            .retrieve("ap", "ap.dfr", &IndexOptions::default(), "dfr", &QuerySet::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::UnknownModel(_))
        ));
        // No query file was written.
        assert!(!layout.lucene_query_file("ap.dfr").exists());
    }

    #[tokio::test]
    async fn index_skips_before_touching_java() {
        let dir = tempfile::tempdir().unwrap();
        let layout = temp_layout(dir.path());
        std::fs::create_dir_all(layout.index_dir("ap.k")).unwrap();

        let engine = LuceneEngine::new(layout.clone());
        let status = engine
            .index("ap.k", Path::new("ap88"), &IndexOptions::default())
            .await
            .unwrap();
        assert_eq!(
            status,
            OpStatus::Skipped { existing: layout.index_dir("ap.k") }
        );
    }
}
