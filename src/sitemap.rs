//! In-memory resource model and the index-consistent mutation seam
//!
//! A [`ResourceList`] owns its resources and two secondary indices: by page
//! id and by ignored-state. Any mutation that can change an indexed field
//! must go through [`ResourceList::update_under_index`], which removes the
//! resource from the named index, runs the mutator, and reinserts it under
//! its new state. Plain metadata attachment that touches no indexed field
//! may mutate the resource directly.

use crate::extract::Metadata;
use crate::source::{FileType, SourceFile};
use serde_yaml::Value;
use std::collections::{BTreeSet, HashMap};

/// Secondary indices a mutation may need to keep consistent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexCategory {
    PageId,
    Ignored,
}

/// One logical output unit (page or asset) tracked by the list
#[derive(Debug, Clone)]
pub struct Resource {
    path: String,
    file: Option<SourceFile>,
    derived: bool,
    options: Metadata,
    page_data: Metadata,
    ignored: bool,
}

impl Resource {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            file: None,
            derived: false,
            options: Metadata::new(),
            page_data: Metadata::new(),
            ignored: false,
        }
    }

    /// Attach the backing source file descriptor
    pub fn with_file(mut self, file: SourceFile) -> Self {
        self.file = Some(file);
        self
    }

    /// Mark this resource as synthesized from another (proxy) rather than
    /// backed 1:1 by a source file
    pub fn as_derived(mut self) -> Self {
        self.derived = true;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn file(&self) -> Option<&SourceFile> {
        self.file.as_ref()
    }

    pub fn is_binary(&self) -> bool {
        self.file
            .as_ref()
            .is_some_and(|f| f.has_type(FileType::Binary))
    }

    pub fn is_derived(&self) -> bool {
        self.derived
    }

    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    pub fn options(&self) -> &Metadata {
        &self.options
    }

    pub fn page_data(&self) -> &Metadata {
        &self.page_data
    }

    /// The id this resource is indexed under: the `id` page datum when
    /// present (scalars stringified), otherwise the destination path
    pub fn page_id(&self) -> String {
        match self.page_data.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => self.path.clone(),
        }
    }

    /// Merge resource-level options, last write per key wins; no deep merge
    pub fn add_metadata_options(&mut self, opts: Metadata) {
        self.options.extend(opts);
    }

    /// Merge page-level metadata, last write per key wins; no deep merge
    pub fn add_metadata_page(&mut self, data: Metadata) {
        self.page_data.extend(data);
    }

    /// Flag the resource ignored; callers changing this on a listed resource
    /// must do so under [`IndexCategory::Ignored`]
    pub fn ignore(&mut self) {
        self.ignored = true;
    }
}

/// Ordered resource container with page-id and ignored-state indices
///
/// Resources are addressed by the `usize` handle returned from [`push`];
/// handles stay valid for the life of the list.
///
/// [`push`]: ResourceList::push
#[derive(Debug, Default)]
pub struct ResourceList {
    resources: Vec<Resource>,
    by_page_id: HashMap<String, usize>,
    ignored: BTreeSet<usize>,
}

impl ResourceList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, resource: Resource) -> usize {
        let handle = self.resources.len();
        self.by_page_id.insert(resource.page_id(), handle);
        if resource.is_ignored() {
            self.ignored.insert(handle);
        }
        self.resources.push(resource);
        handle
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn get(&self, handle: usize) -> Option<&Resource> {
        self.resources.get(handle)
    }

    /// Direct mutable access, for mutations that touch no indexed field
    pub fn get_mut(&mut self, handle: usize) -> Option<&mut Resource> {
        self.resources.get_mut(handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    /// Handles of non-binary resources, in insertion order
    pub fn non_binary(&self) -> Vec<usize> {
        self.resources
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_binary())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn find_by_page_id(&self, page_id: &str) -> Option<&Resource> {
        self.by_page_id
            .get(page_id)
            .and_then(|&i| self.resources.get(i))
    }

    pub fn ignored_count(&self) -> usize {
        self.ignored.len()
    }

    /// Mutate one resource while keeping the named index consistent
    ///
    /// The resource is removed from the index, the mutator runs against it
    /// alone, and it is reinserted under its new state. The mutator must not
    /// touch other resources. Unknown handles are a no-op.
    pub fn update_under_index<F>(&mut self, handle: usize, category: IndexCategory, mutate: F)
    where
        F: FnOnce(&mut Resource),
    {
        if handle >= self.resources.len() {
            return;
        }
        match category {
            IndexCategory::PageId => {
                let old_id = self.resources[handle].page_id();
                if self.by_page_id.get(&old_id) == Some(&handle) {
                    self.by_page_id.remove(&old_id);
                }
                mutate(&mut self.resources[handle]);
                self.by_page_id
                    .insert(self.resources[handle].page_id(), handle);
            }
            IndexCategory::Ignored => {
                self.ignored.remove(&handle);
                mutate(&mut self.resources[handle]);
                if self.resources[handle].is_ignored() {
                    self.ignored.insert(handle);
                }
            }
        }
    }
}
