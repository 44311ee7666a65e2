//! Indexing options — stopword list and stemmer selection.
//!
//! Experiments name stemmers by short code; each engine wants its own
//! spelling. Both translation tables live here.

use crate::CoreError;
use serde::{Deserialize, Serialize};

/// Stemmer selection, parsed from the short codes used in experiment
/// declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Stemmer {
    Porter,
    Krovetz,
    /// Lucene's EnglishMinimalStemFilter (plural stripping only).
    SMinimal,
    Snowball,
}

impl Stemmer {
    /// Parse a stemmer option code. These are the codes the adapters
    /// accept: `p`/`porter`, `k`/`krovetz`, `s` (English minimal), and
    /// `snowball`.
    pub fn from_code(code: &str) -> Result<Self, CoreError> {
        match code {
            "p" | "porter" => Ok(Stemmer::Porter),
            "k" | "krovetz" => Ok(Stemmer::Krovetz),
            "s" => Ok(Stemmer::SMinimal),
            "snowball" => Ok(Stemmer::Snowball),
            other => Err(CoreError::UnknownStemmer(other.to_string())),
        }
    }

    /// The name Indri's `<stemmer><name>` element expects, or None when
    /// Indri has no such stemmer.
    pub fn indri_name(&self) -> Option<&'static str> {
        match self {
            Stemmer::Porter => Some("porter"),
            Stemmer::Krovetz => Some("krovetz"),
            Stemmer::SMinimal | Stemmer::Snowball => None,
        }
    }

    /// The token-filter class name the Lucene TREC jar expects for its
    /// `-stem` flag.
    pub fn lucene_filter(&self) -> &'static str {
        match self {
            Stemmer::Porter => "PorterStemFilter",
            Stemmer::Krovetz => "KStemFilter",
            Stemmer::SMinimal => "EnglishMinimalStemFilter",
            Stemmer::Snowball => "SnowballFilter",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Stemmer::Porter => "p",
            Stemmer::Krovetz => "k",
            Stemmer::SMinimal => "s",
            Stemmer::Snowball => "snowball",
        }
    }
}

impl TryFrom<String> for Stemmer {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Stemmer::from_code(&value)
    }
}

impl From<Stemmer> for String {
    fn from(value: Stemmer) -> Self {
        value.code().to_string()
    }
}

/// Options applied when building an index. Retrieval reuses them where
/// the engine requires the analysis chain to be restated (Lucene does,
/// Indri does not).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexOptions {
    /// File name of a stopword list under the misc root; None disables
    /// stopping.
    #[serde(default)]
    pub stopwords: Option<String>,
    /// None indexes unstemmed.
    #[serde(default)]
    pub stemmer: Option<Stemmer>,
}
