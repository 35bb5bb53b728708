//! Per-path memoization of front matter parse results
//!
//! Entries are created lazily on first fetch and removed only by
//! event-driven invalidation; there is no expiry and no size bound.
//! Correctness relies on invalidation being synchronous relative to
//! subsequent reads, so both fetch and invalidate hold the same lock.

use crate::delimiters::DelimiterRegistry;
use crate::error::Result;
use crate::extract::{self, ParsedFrontMatter};
use log::{debug, trace};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Memoized front matter extraction, keyed by absolute source path
pub struct ExtractionCache {
    registry: DelimiterRegistry,
    entries: Mutex<HashMap<PathBuf, Arc<ParsedFrontMatter>>>,
}

impl ExtractionCache {
    pub fn new(registry: DelimiterRegistry) -> Self {
        Self {
            registry,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The delimiter table this cache detects with
    pub fn registry(&self) -> &DelimiterRegistry {
        &self.registry
    }

    /// Fetch the parse result for `full_path`, reading and parsing the file
    /// at most once per path between invalidations
    ///
    /// Parse failures propagate and are not cached, so a fixed file is
    /// re-read on the next fetch.
    pub fn fetch(&self, full_path: &Path) -> Result<Arc<ParsedFrontMatter>> {
        let mut entries = self.lock();
        if let Some(hit) = entries.get(full_path) {
            trace!("front matter cache hit: {}", full_path.display());
            return Ok(Arc::clone(hit));
        }

        let text = fs::read_to_string(full_path)?;
        let parsed = if extract::contains_front_matter(&text, &self.registry) {
            extract::parse(&text, &self.registry, full_path)?
        } else {
            ParsedFrontMatter::empty()
        };
        let parsed = Arc::new(parsed);
        debug!(
            "parsed front matter for {} ({} keys)",
            full_path.display(),
            parsed.data.len()
        );
        entries.insert(full_path.to_path_buf(), Arc::clone(&parsed));
        Ok(parsed)
    }

    /// Drop the entries for exactly the given paths; unknown paths are a no-op
    pub fn invalidate<'a>(&self, paths: impl IntoIterator<Item = &'a Path>) {
        let mut entries = self.lock();
        for path in paths {
            if entries.remove(path).is_some() {
                debug!("invalidated front matter cache for {}", path.display());
            }
        }
    }

    /// Number of memoized paths
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Arc<ParsedFrontMatter>>> {
        // A panic can only poison the lock outside the critical sections
        // above, which never unwind mid-update.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
