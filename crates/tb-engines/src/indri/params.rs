//! Indri parameter files.
//!
//! Indri's XML parser treats whitespace inside a leaf element as part
//! of the value: `<path>\n  /data/doc\n</path>` indexes a corpus named
//! "\n  /data/doc\n". Every leaf element is therefore emitted as
//! `<tag>value</tag>` on a single line, with container elements on
//! lines of their own. quick-xml does the escaping; the line shaping
//! is done here at write time rather than by post-processing a
//! pretty-printer.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io;
use std::path::Path;

/// The complex TREC fields Indri is told to index alongside the body.
pub const TREC_FIELDS: [&str; 5] = ["TEXT", "H3", "DOCTITLE", "HEADLINE", "TTL"];

struct ParamWriter {
    inner: Writer<Vec<u8>>,
}

impl ParamWriter {
    fn new() -> Self {
        Self {
            inner: Writer::new(Vec::new()),
        }
    }

    fn newline(&mut self) -> io::Result<()> {
        self.inner.write_event(Event::Text(BytesText::new("\n")))
    }

    /// `<tag>` on its own line.
    fn open(&mut self, tag: &str) -> io::Result<()> {
        self.inner.write_event(Event::Start(BytesStart::new(tag)))?;
        self.newline()
    }

    /// `</tag>` on its own line.
    fn close(&mut self, tag: &str) -> io::Result<()> {
        self.inner.write_event(Event::End(BytesEnd::new(tag)))?;
        self.newline()
    }

    /// `<tag>value</tag>` on a single line. This is the invariant
    /// Indri's parser depends on.
    fn leaf(&mut self, tag: &str, value: &str) -> io::Result<()> {
        self.inner.write_event(Event::Start(BytesStart::new(tag)))?;
        self.inner.write_event(Event::Text(BytesText::new(value)))?;
        self.inner.write_event(Event::End(BytesEnd::new(tag)))?;
        self.newline()
    }

    fn finish(self) -> String {
        // Writer<Vec<u8>> only ever emitted UTF-8
        String::from_utf8_lossy(&self.inner.into_inner()).into_owned()
    }
}

/// Build the IndriBuildIndex parameter file.
///
/// `corpus` and `out_dir` must be absolute; `stemmer` is Indri's own
/// stemmer name, already translated from the option code.
pub fn index_params(
    corpus: &Path,
    out_dir: &Path,
    stopwords: Option<&Path>,
    stemmer: Option<&str>,
) -> io::Result<String> {
    let mut w = ParamWriter::new();
    w.open("parameters")?;

    w.open("corpus")?;
    w.leaf("path", &corpus.display().to_string())?;
    w.leaf("class", "trectext")?;
    w.close("corpus")?;

    w.leaf("index", &out_dir.display().to_string())?;

    for field in TREC_FIELDS {
        w.open("field")?;
        w.leaf("name", field)?;
        w.close("field")?;
    }

    if let Some(stop) = stopwords {
        w.leaf("stopwords", &stop.display().to_string())?;
    }

    if let Some(name) = stemmer {
        w.open("stemmer")?;
        w.leaf("name", name)?;
        w.close("stemmer")?;
    }

    w.close("parameters")?;
    Ok(w.finish())
}

/// Build the IndriRunQuery parameter file: one `<query>` per topic, in
/// topic order, each title wrapped in Indri's `#combine(...)`.
pub fn query_params(queries: &tb_core::query::QuerySet) -> io::Result<String> {
    let mut w = ParamWriter::new();
    w.open("parameters")?;

    for (num, title) in queries.iter() {
        w.open("query")?;
        w.leaf("type", "indri")?;
        w.leaf("number", num)?;
        w.leaf("text", &format!("#combine({title})"))?;
        w.close("query")?;
    }

    w.close("parameters")?;
    Ok(w.finish())
}
