//! Query sets — ordered topic number → title mappings.
//!
//! Titles are passed to the engines verbatim; the loader does no
//! tokenization or punctuation handling. Topics keep file order, which
//! is the order they are written into engine query files.

use crate::CoreError;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySet {
    topics: Vec<(String, String)>,
}

impl QuerySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a tab-separated topics file: `<number>\t<title>` per
    /// line. Blank lines and `#` comments are skipped.
    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path)?;
        let mut set = QuerySet::new();

        for (lineno, line) in raw.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (num, title) = line.split_once('\t').ok_or_else(|| CoreError::Topics {
                path: path.display().to_string(),
                line: lineno + 1,
                message: "expected <number>\\t<title>".to_string(),
            })?;
            set.push(num.trim(), title.trim());
        }

        Ok(set)
    }

    pub fn push(&mut self, num: impl Into<String>, title: impl Into<String>) {
        self.topics.push((num.into(), title.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.topics.iter().map(|(n, t)| (n.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}
