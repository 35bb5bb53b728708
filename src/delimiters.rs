//! Delimiter registry: which textual markers denote a front matter block
//!
//! The registry is configuration, not logic: an ordered table of
//! `(open, close)` marker pairs per format. Order matters — detection tries
//! JSON before YAML and each YAML variant in listed order, returning on the
//! first structural match. Open markers may span multiple lines to support
//! front matter hidden inside template-language comments (Haml, Slim, ERB).

use crate::error::{FrontMatterError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Front matter block format, in detection order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Yaml,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Json => write!(f, "json"),
            Format::Yaml => write!(f, "yaml"),
        }
    }
}

/// One accepted `(open, close)` marker pair
///
/// Serializable so hosts can carry delimiter overrides in their own
/// configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelimiterPair {
    pub open: String,
    pub close: String,
}

impl DelimiterPair {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

pub(crate) struct CompiledPair {
    pub(crate) format: Format,
    pub(crate) pair: DelimiterPair,
    pub(crate) regex: Regex,
}

/// Ordered table of accepted delimiter pairs, compiled for matching
///
/// The default table accepts `;;;` fences for JSON and, for YAML: the plain
/// `---` fence, the Pandoc `---`/`...` variant, and comment-wrapped fences
/// for Haml, Slim, and ERB templates.
pub struct DelimiterRegistry {
    entries: Vec<CompiledPair>,
}

impl DelimiterRegistry {
    /// Build a registry from per-format pair lists, JSON tried first
    pub fn from_pairs(json: Vec<DelimiterPair>, yaml: Vec<DelimiterPair>) -> Result<Self> {
        let mut entries = Vec::with_capacity(json.len() + yaml.len());
        for (format, pairs) in [(Format::Json, json), (Format::Yaml, yaml)] {
            for pair in pairs {
                let regex = compile_pair(&pair)?;
                entries.push(CompiledPair {
                    format,
                    pair,
                    regex,
                });
            }
        }
        Ok(Self { entries })
    }

    /// The accepted pairs in detection order
    pub fn pairs(&self) -> impl Iterator<Item = (Format, &DelimiterPair)> {
        self.entries.iter().map(|e| (e.format, &e.pair))
    }

    pub(crate) fn entries(&self) -> &[CompiledPair] {
        &self.entries
    }
}

impl Default for DelimiterRegistry {
    fn default() -> Self {
        let json = vec![DelimiterPair::new(";;;", ";;;")];
        let yaml = vec![
            // Normal
            DelimiterPair::new("---", "---"),
            // Pandoc
            DelimiterPair::new("---", "..."),
            // Haml with commented front matter
            DelimiterPair::new("-#\n  ---", "  ---"),
            // Slim with commented front matter
            DelimiterPair::new("/\n  ---", "  ---"),
            // ERB with commented front matter
            DelimiterPair::new("<%#\n  ---", "  ---\n%>"),
        ];
        Self::from_pairs(json, yaml).expect("default delimiter table compiles")
    }
}

/// Anchor `open` at the start of the text and `close` as a standalone line,
/// both as literal (possibly multi-line) markers, tolerating trailing spaces
/// and CRLF line endings. `front` is the block between them, `rest` the text
/// after the close line.
fn compile_pair(pair: &DelimiterPair) -> Result<Regex> {
    let pattern = format!(
        "^{open}[ \\t]*\\r?\\n(?s:(?P<front>.*?))(?m:^){close}[ \\t]*(?:\\r?\\n|$)(?s:(?P<rest>.*))",
        open = regex::escape(&pair.open),
        close = regex::escape(&pair.close),
    );
    Regex::new(&pattern).map_err(|e| {
        FrontMatterError::invalid_delimiters(format!(
            "cannot compile pair ({:?}, {:?}): {}",
            pair.open, pair.close, e
        ))
    })
}
