//! Error types for the sitematter library
//!
//! Detection misses and missing source files are not errors (they degrade to
//! "no metadata"); only genuinely malformed front matter and I/O failures
//! surface here.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum FrontMatterError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed front matter block in a source file
    #[error("Invalid front matter in {path}: {reason}")]
    InvalidFrontMatter { path: PathBuf, reason: String },

    /// A host-supplied delimiter pair could not be compiled
    #[error("Invalid front matter delimiters: {reason}")]
    InvalidDelimiters { reason: String },
}

impl FrontMatterError {
    pub fn invalid_front_matter(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::InvalidFrontMatter {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn invalid_delimiters(reason: impl Into<String>) -> Self {
        Self::InvalidDelimiters {
            reason: reason.into(),
        }
    }

    /// The source path this error refers to, when it refers to one
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::InvalidFrontMatter { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, FrontMatterError>;
