//! Front matter detection and parsing
//!
//! Detection walks the delimiter registry in order and returns on the first
//! structural match; parsing slices the block between the matched markers and
//! runs it through the format's deserializer. A file with no recognized block
//! is not an error — it yields empty metadata and no remainder. A block that
//! fails to deserialize is fatal for that file: malformed content must block
//! the build rather than silently produce a half-configured site.

use crate::delimiters::{CompiledPair, DelimiterRegistry, Format};
use crate::error::{FrontMatterError, Result};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Parsed front matter mapping, keyed by string
pub type Metadata = BTreeMap<String, Value>;

/// Result of extracting front matter from one file
///
/// `remainder` is `None` when no block was detected, which is distinct from
/// `Some("")` (a detected block followed by an empty body).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedFrontMatter {
    pub data: Metadata,
    pub remainder: Option<String>,
}

impl ParsedFrontMatter {
    /// The empty/no-match result
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Check whether the text begins with a recognized front matter block
pub fn contains_front_matter(text: &str, registry: &DelimiterRegistry) -> bool {
    detect(text, registry).is_some()
}

/// Which delimiter pair opened the text, if any
pub fn detect_format(text: &str, registry: &DelimiterRegistry) -> Option<Format> {
    detect(text, registry).map(|(entry, _)| entry.format)
}

fn detect<'r, 't>(
    text: &'t str,
    registry: &'r DelimiterRegistry,
) -> Option<(&'r CompiledPair, regex::Captures<'t>)> {
    registry
        .entries()
        .iter()
        .find_map(|entry| entry.regex.captures(text).map(|caps| (entry, caps)))
}

/// Extract and parse the front matter of `text`
///
/// `path` is reporting context only; no file is read here.
pub fn parse(text: &str, registry: &DelimiterRegistry, path: &Path) -> Result<ParsedFrontMatter> {
    let Some((entry, caps)) = detect(text, registry) else {
        return Ok(ParsedFrontMatter::empty());
    };

    let block = &caps["front"];
    let value = match entry.format {
        Format::Yaml => serde_yaml::from_str::<Value>(block)
            .map_err(|e| FrontMatterError::invalid_front_matter(path, e.to_string()))?,
        Format::Json => {
            let json = serde_json::from_str::<serde_json::Value>(block)
                .map_err(|e| FrontMatterError::invalid_front_matter(path, e.to_string()))?;
            json_to_yaml(json)
        }
    };

    Ok(ParsedFrontMatter {
        data: into_metadata(value, path)?,
        remainder: Some(caps["rest"].to_string()),
    })
}

/// Normalize a deserialized block to a string-keyed mapping
///
/// `null` (an empty block) becomes an empty mapping; any other non-mapping
/// top level, or a non-string key, is malformed front matter.
fn into_metadata(value: Value, path: &Path) -> Result<Metadata> {
    match value {
        Value::Null => Ok(Metadata::new()),
        Value::Mapping(map) => {
            let mut data = Metadata::new();
            for (key, val) in map {
                match key {
                    Value::String(k) => {
                        data.insert(k, val);
                    }
                    other => {
                        return Err(FrontMatterError::invalid_front_matter(
                            path,
                            format!("non-string key found: {:?}", other),
                        ));
                    }
                }
            }
            Ok(data)
        }
        other => Err(FrontMatterError::invalid_front_matter(
            path,
            format!("expected mapping or null, found {:?}", other),
        )),
    }
}

fn json_to_yaml(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                Value::Number(serde_yaml::Number::from(n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::Sequence(items.into_iter().map(json_to_yaml).collect())
        }
        serde_json::Value::Object(map) => {
            let mut mapping = serde_yaml::Mapping::new();
            for (k, v) in map {
                mapping.insert(Value::String(k), json_to_yaml(v));
            }
            Value::Mapping(mapping)
        }
    }
}
