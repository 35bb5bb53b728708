//! Source file descriptors and the file index seam
//!
//! The watcher/indexer subsystem that enumerates source files lives outside
//! this crate; the engine only needs to resolve a logical path to a
//! descriptor carrying the absolute path and the file's type tags.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Type tags attached to a source file by the indexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileType {
    /// Binary content, never scanned for front matter
    Binary,
    /// Explicitly exempted from front matter extraction (raw assets)
    NoFrontMatter,
}

/// A resolved source file: absolute path plus indexer type tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub full_path: PathBuf,
    pub types: BTreeSet<FileType>,
}

impl SourceFile {
    pub fn new(full_path: impl Into<PathBuf>) -> Self {
        Self {
            full_path: full_path.into(),
            types: BTreeSet::new(),
        }
    }

    pub fn with_type(mut self, tag: FileType) -> Self {
        self.types.insert(tag);
        self
    }

    pub fn has_type(&self, tag: FileType) -> bool {
        self.types.contains(&tag)
    }
}

/// Resolves a logical path to a source file, or reports it unknown
pub trait FileIndex {
    fn find(&self, path: &Path) -> Option<SourceFile>;
}

/// Map-backed index for hosts without a live watcher, and for tests
///
/// Files are found under their logical key and under their full path, the
/// same ways the real indexer resolves lookups.
#[derive(Debug, Default)]
pub struct InMemoryFileIndex {
    files: HashMap<PathBuf, SourceFile>,
}

impl InMemoryFileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, logical: impl Into<PathBuf>, file: SourceFile) {
        let logical = logical.into();
        self.files.insert(file.full_path.clone(), file.clone());
        self.files.insert(logical, file);
    }

    pub fn remove(&mut self, path: &Path) -> Option<SourceFile> {
        let file = self.files.remove(path)?;
        self.files.remove(&file.full_path);
        Some(file)
    }
}

impl FileIndex for InMemoryFileIndex {
    fn find(&self, path: &Path) -> Option<SourceFile> {
        self.files.get(path).cloned()
    }
}
