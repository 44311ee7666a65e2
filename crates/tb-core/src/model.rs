//! Similarity-model map for the Lucene TREC jar.
//!
//! The jar ships a JSON file (`mods/models.lucene`) mapping short model
//! codes to the Java similarity class BatchSearch should instantiate,
//! e.g. `{"tfidf": "ClassicSimilarity", "bm25": "BM25Similarity"}`.
//! Resolution happens before any subprocess is spawned so a bad code
//! fails fast.

use crate::CoreError;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ModelMap {
    map: BTreeMap<String, String>,
}

impl ModelMap {
    /// Load the map from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path).map_err(|e| CoreError::ModelMap {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let map: BTreeMap<String, String> =
            serde_json::from_str(&raw).map_err(|e| CoreError::ModelMap {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { map })
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            map: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Translate a short model code into the similarity class name.
    pub fn resolve(&self, code: &str) -> Result<&str, CoreError> {
        self.map
            .get(code)
            .map(String::as_str)
            .ok_or_else(|| CoreError::UnknownModel(code.to_string()))
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_and_resolves() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r#"{{"tfidf": "ClassicSimilarity", "bm25": "BM25Similarity"}}"#
        )
        .unwrap();

        let map = ModelMap::load(f.path()).unwrap();
        assert_eq!(map.resolve("bm25").unwrap(), "BM25Similarity");
        assert!(matches!(
            map.resolve("dfr"),
            Err(CoreError::UnknownModel(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ModelMap::load(Path::new("/nonexistent/models.lucene")).unwrap_err();
        match err {
            CoreError::ModelMap { path, .. } => assert!(path.contains("models.lucene")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_json_is_an_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "not json").unwrap();
        assert!(matches!(
            ModelMap::load(f.path()),
            Err(CoreError::ModelMap { .. })
        ));
    }
}
