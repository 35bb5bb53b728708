//! sitematter: front matter extraction and resource-metadata merging for
//! static site pipelines
//!
//! This library implements the metadata side of a site build: it detects and
//! parses delimiter-fenced front matter blocks (JSON and several YAML
//! variants, including comment-wrapped fences for Haml, Slim, and ERB
//! templates), memoizes parse results per source path, and merges the parsed
//! metadata into the site's resource model once per resource-list
//! manipulation cycle.
//!
//! # Features
//!
//! - **Configurable delimiter table** tried in deterministic order, JSON
//!   before YAML, first structural match wins
//! - **Event-driven cache invalidation** wired to the host's file watcher
//! - **Special-option routing**: `layout`, `layout_engine`,
//!   `renderer_options`, `directory_index`, and `content_type` go to
//!   resource options, never to page metadata
//! - **Identity-aware merging**: an `id` key reindexes the resource under
//!   its new page id; `ignored: true` flags non-derived resources through
//!   the index-consistent update path
//! - **Fail-loud parsing**: malformed front matter aborts the pass with the
//!   offending path instead of half-configuring the site
//!
//! # Quick Start
//!
//! ## Extracting front matter from text
//!
//! ```rust
//! use sitematter::{extract, DelimiterRegistry};
//! use std::path::Path;
//!
//! # fn main() -> sitematter::Result<()> {
//! let registry = DelimiterRegistry::default();
//! let parsed = extract::parse("---\ntitle: Hello\n---\nBody text", &registry, Path::new("a.md"))?;
//!
//! assert_eq!(parsed.data["title"].as_str(), Some("Hello"));
//! assert_eq!(parsed.remainder.as_deref(), Some("Body text"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Merging metadata into a resource list
//!
//! ```rust,no_run
//! use sitematter::{
//!     FrontMatterExtension, InMemoryFileIndex, Resource, ResourceList, SourceFile,
//! };
//!
//! # fn main() -> sitematter::Result<()> {
//! let mut index = InMemoryFileIndex::new();
//! index.insert("posts/hello.md", SourceFile::new("/site/source/posts/hello.md"));
//!
//! let mut resources = ResourceList::new();
//! resources.push(
//!     Resource::new("posts/hello.html")
//!         .with_file(SourceFile::new("/site/source/posts/hello.md")),
//! );
//!
//! let extension = FrontMatterExtension::new(index);
//! extension.manipulate_resource_list(&mut resources)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Reacting to file changes
//!
//! ```rust,no_run
//! use sitematter::{FrontMatterExtension, InMemoryFileIndex, SourceFile};
//!
//! let extension = FrontMatterExtension::new(InMemoryFileIndex::new());
//! let updated = vec![SourceFile::new("/site/source/index.md")];
//! let removed = vec![];
//! extension.on_source_change(&updated, &removed);
//! ```
//!
//! # Architecture
//!
//! - [`delimiters`]: the ordered delimiter table and its compiled matchers
//! - [`extract`]: block detection and format-appropriate deserialization
//! - [`cache`]: per-path memoization with event-driven invalidation
//! - [`source`]: source file descriptors and the file-index seam
//! - [`sitemap`]: the resource model and its index-consistent update path
//! - [`extension`]: the per-run engine tying the above together
//! - [`error`]: error types
//!
//! The file watcher, template engines, and routing live outside this crate;
//! they connect through [`FileIndex`], `on_source_change`, and
//! `template_data_for_file`.

// Public API exports
pub use error::{FrontMatterError, Result};

pub use cache::ExtractionCache;
pub use delimiters::{DelimiterPair, DelimiterRegistry, Format};
pub use extension::{extract_keys, FrontMatterExtension, SPECIAL_OPTION_KEYS};
pub use extract::{contains_front_matter, Metadata, ParsedFrontMatter};
pub use sitemap::{IndexCategory, Resource, ResourceList};
pub use source::{FileIndex, FileType, InMemoryFileIndex, SourceFile};

pub mod cache;
pub mod delimiters;
pub mod error;
pub mod extension;
pub mod extract;
pub mod sitemap;
pub mod source;
