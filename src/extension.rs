//! The front matter extension: cache ownership plus the resource-merge pass
//!
//! One extension instance lives for one pipeline run. It owns the extraction
//! cache, subscribes to source-change notifications through
//! [`FrontMatterExtension::on_source_change`], and applies cached front
//! matter to every eligible resource once per resource-list manipulation
//! cycle.

use crate::cache::ExtractionCache;
use crate::delimiters::DelimiterRegistry;
use crate::error::Result;
use crate::extract::{Metadata, ParsedFrontMatter};
use crate::sitemap::{IndexCategory, ResourceList};
use crate::source::{FileIndex, FileType, SourceFile};
use log::debug;
use serde_yaml::Value;
use std::path::Path;
use std::sync::Arc;

/// Reserved option keys, routed to resource options and never copied into
/// page metadata
pub const SPECIAL_OPTION_KEYS: [&str; 5] = [
    "layout",
    "layout_engine",
    "renderer_options",
    "directory_index",
    "content_type",
];

/// Remove the given keys from `data`, returning the extracted entries
///
/// Present keys move to the returned mapping; absent keys are skipped; the
/// rest of `data` is left intact.
pub fn extract_keys(data: &mut Metadata, keys: &[&str]) -> Metadata {
    let mut extracted = Metadata::new();
    for &key in keys {
        if let Some(value) = data.remove(key) {
            extracted.insert(key.to_string(), value);
        }
    }
    extracted
}

/// Canonicalize the inner keys of a `renderer_options` mapping: scalar keys
/// become strings with `-` rewritten to `_` so engines can look them up as
/// identifiers
fn normalize_option_keys(value: &mut Value) {
    let Value::Mapping(map) = value else { return };
    let normalized = std::mem::take(map)
        .into_iter()
        .map(|(key, val)| {
            let canonical = match key {
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                other => return (other, val),
            };
            (Value::String(canonical.replace('-', "_")), val)
        })
        .collect();
    *map = normalized;
}

/// Front matter engine for one pipeline run
pub struct FrontMatterExtension<I: FileIndex> {
    index: I,
    cache: ExtractionCache,
}

impl<I: FileIndex> FrontMatterExtension<I> {
    /// Build with the default delimiter table
    pub fn new(index: I) -> Self {
        Self::with_delimiters(index, DelimiterRegistry::default())
    }

    /// Build with a host-overridden delimiter table
    pub fn with_delimiters(index: I, registry: DelimiterRegistry) -> Self {
        Self {
            index,
            cache: ExtractionCache::new(registry),
        }
    }

    pub fn cache(&self) -> &ExtractionCache {
        &self.cache
    }

    /// Parsed front matter for a logical path
    ///
    /// A path the index cannot resolve yields the empty result (virtual
    /// pages have no backing file); resolvable paths go through the cache.
    pub fn data(&self, path: &Path) -> Result<Arc<ParsedFrontMatter>> {
        match self.index.find(path) {
            Some(file) => self.cache.fetch(&file.full_path),
            None => Ok(Arc::new(ParsedFrontMatter::empty())),
        }
    }

    /// The template body of a file, i.e. everything after its front matter
    pub fn template_data_for_file(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.data(path)?.remainder.clone())
    }

    /// Source-change callback: invalidate the union of updated and removed
    pub fn on_source_change(&self, updated: &[SourceFile], removed: &[SourceFile]) {
        self.cache
            .invalidate(updated.iter().chain(removed).map(|f| f.full_path.as_path()));
    }

    /// Apply cached front matter to every eligible resource in the list
    ///
    /// Runs to completion or fails on the first malformed file; a parse
    /// failure surfaces before any mutation of the failing resource.
    pub fn manipulate_resource_list(&self, list: &mut ResourceList) -> Result<()> {
        for handle in list.non_binary() {
            let Some(file) = list.get(handle).and_then(|r| r.file().cloned()) else {
                continue;
            };
            if file.has_type(FileType::NoFrontMatter) {
                continue;
            }

            // Private copy of the cached mapping; later steps extract from
            // it destructively.
            let mut fmdata = self.data(&file.full_path)?.data.clone();

            let mut opts = extract_keys(&mut fmdata, &SPECIAL_OPTION_KEYS);
            if let Some(renderer_options) = opts.get_mut("renderer_options") {
                normalize_option_keys(renderer_options);
            }

            let ignored = matches!(fmdata.remove("ignored"), Some(Value::Bool(true)));

            if let Some(resource) = list.get_mut(handle) {
                resource.add_metadata_options(opts);
            }

            if fmdata.contains_key("id") {
                debug!(
                    "front matter id override for {}",
                    file.full_path.display()
                );
                list.update_under_index(handle, IndexCategory::PageId, |r| {
                    r.add_metadata_page(fmdata);
                });
            } else if let Some(resource) = list.get_mut(handle) {
                resource.add_metadata_page(fmdata);
            }

            let derived = list.get(handle).is_some_and(|r| r.is_derived());
            if ignored && !derived {
                list.update_under_index(handle, IndexCategory::Ignored, |r| r.ignore());
            }
        }
        Ok(())
    }
}
