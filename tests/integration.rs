//! Integration tests for the sitematter library
//!
//! These tests drive the whole engine the way a site pipeline does: source
//! files on disk, a file index, a resource list, a manipulation pass, and
//! file-change notifications between passes.

use sitematter::*;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

struct Site {
    dir: TempDir,
    index: InMemoryFileIndex,
    list: ResourceList,
}

impl Site {
    fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            dir: TempDir::new().unwrap(),
            index: InMemoryFileIndex::new(),
            list: ResourceList::new(),
        }
    }

    fn page(&mut self, logical: &str, content: &str) -> (usize, PathBuf) {
        let full_path = self.dir.path().join(logical);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        self.index.insert(logical, SourceFile::new(&full_path));
        let handle = self
            .list
            .push(Resource::new(logical).with_file(SourceFile::new(&full_path)));
        (handle, full_path)
    }
}

fn s(v: &str) -> Value {
    Value::String(v.into())
}

#[test]
fn full_manipulation_pass_over_a_mixed_site() {
    let mut site = Site::new();
    let (post, _) = site.page(
        "posts/first.md",
        "---\ntitle: First Post\nlayout: post\ntags:\n  - intro\n  - meta\n---\n# First\n\nWelcome.",
    );
    let (json_page, _) = site.page(
        "api.html",
        ";;;\n{\"layout\": \"none\", \"content_type\": \"application/json\"}\n;;;\n{}",
    );
    let (plain, _) = site.page("plain.html", "<h1>No front matter at all</h1>");
    let (draft, _) = site.page("draft.md", "---\nignored: true\ntitle: WIP\n---\nSoon.");

    let extension = FrontMatterExtension::new(site.index);
    extension.manipulate_resource_list(&mut site.list).unwrap();

    let post = site.list.get(post).unwrap();
    assert_eq!(post.options().get("layout"), Some(&s("post")));
    assert_eq!(post.page_data().get("title"), Some(&s("First Post")));
    assert!(!post.page_data().contains_key("layout"));
    assert_eq!(
        post.page_data().get("tags"),
        Some(&Value::Sequence(vec![s("intro"), s("meta")]))
    );

    let json_page = site.list.get(json_page).unwrap();
    assert_eq!(json_page.options().get("layout"), Some(&s("none")));
    assert_eq!(
        json_page.options().get("content_type"),
        Some(&s("application/json"))
    );
    assert!(json_page.page_data().is_empty());

    let plain = site.list.get(plain).unwrap();
    assert!(plain.options().is_empty());
    assert!(plain.page_data().is_empty());

    let draft = site.list.get(draft).unwrap();
    assert!(draft.is_ignored());
    assert_eq!(draft.page_data().get("title"), Some(&s("WIP")));
    assert_eq!(site.list.ignored_count(), 1);
}

#[test]
fn repeated_passes_are_idempotent_and_served_from_cache() {
    let mut site = Site::new();
    let (handle, full_path) = site.page("page.md", "---\ntitle: Cached\n---\nBody");

    let extension = FrontMatterExtension::new(site.index);
    extension.manipulate_resource_list(&mut site.list).unwrap();

    // Change the file on disk without a change event: the second pass must
    // reuse the memoized parse, so the old title stays.
    fs::write(&full_path, "---\ntitle: Changed\n---\nBody").unwrap();
    extension.manipulate_resource_list(&mut site.list).unwrap();

    let resource = site.list.get(handle).unwrap();
    assert_eq!(resource.page_data().get("title"), Some(&s("Cached")));
    assert_eq!(extension.cache().len(), 1);
}

#[test]
fn change_event_between_passes_picks_up_new_metadata() {
    let mut site = Site::new();
    let (handle, full_path) = site.page("page.md", "---\ntitle: Before\n---\n");

    let extension = FrontMatterExtension::new(site.index);
    extension.manipulate_resource_list(&mut site.list).unwrap();

    fs::write(&full_path, "---\ntitle: After\n---\n").unwrap();
    extension.on_source_change(&[SourceFile::new(&full_path)], &[]);
    extension.manipulate_resource_list(&mut site.list).unwrap();

    let resource = site.list.get(handle).unwrap();
    assert_eq!(resource.page_data().get("title"), Some(&s("After")));
}

#[test]
fn id_override_reindexes_and_later_lookups_resolve() {
    let mut site = Site::new();
    site.page(
        "deeply/nested/contact-page.md",
        "---\nid: contact\ntitle: Contact us\n---\nWrite to us.",
    );

    let extension = FrontMatterExtension::new(site.index);
    extension.manipulate_resource_list(&mut site.list).unwrap();

    let contact = site.list.find_by_page_id("contact").unwrap();
    assert_eq!(contact.page_data().get("title"), Some(&s("Contact us")));
    assert_eq!(contact.path(), "deeply/nested/contact-page.md");
    assert!(site.list.find_by_page_id("deeply/nested/contact-page.md").is_none());
}

#[test]
fn id_and_ignored_combine_as_two_sequential_updates() {
    let mut site = Site::new();
    let (handle, _) = site.page(
        "hidden.md",
        "---\nid: hidden-page\nignored: true\n---\n",
    );

    let extension = FrontMatterExtension::new(site.index);
    extension.manipulate_resource_list(&mut site.list).unwrap();

    // Identity update first, ignore update second: both indices see the
    // final state.
    assert!(site.list.find_by_page_id("hidden-page").is_some());
    assert!(site.list.get(handle).unwrap().is_ignored());
    assert_eq!(site.list.ignored_count(), 1);
}

#[test]
fn malformed_file_fails_the_pass_and_names_it() {
    let mut site = Site::new();
    site.page("good.md", "---\ntitle: Fine\n---\n");
    let (_, bad_path) = site.page("bad.md", "---\ntitle: [unterminated\n---\n");

    let extension = FrontMatterExtension::new(site.index);
    let err = extension
        .manipulate_resource_list(&mut site.list)
        .unwrap_err();
    assert_eq!(err.path(), Some(bad_path.as_path()));
    assert!(err.to_string().contains("bad.md"));
}

#[test]
fn template_body_is_exposed_to_engines() {
    let mut site = Site::new();
    site.page("page.md", "---\nlayout: article\n---\nThe body the engine renders.");

    let extension = FrontMatterExtension::new(site.index);
    assert_eq!(
        extension
            .template_data_for_file(Path::new("page.md"))
            .unwrap()
            .as_deref(),
        Some("The body the engine renders.")
    );
}

#[test]
fn host_overridden_delimiters_take_effect() {
    let registry = DelimiterRegistry::from_pairs(
        vec![DelimiterPair::new(";;;", ";;;")],
        vec![DelimiterPair::new("+++", "+++")],
    )
    .unwrap();

    let mut site = Site::new();
    let (custom, _) = site.page("custom.md", "+++\nlayout: wide\n+++\nBody");
    let (standard, _) = site.page("standard.md", "---\nlayout: wide\n---\nBody");

    let extension = FrontMatterExtension::with_delimiters(site.index, registry);
    extension.manipulate_resource_list(&mut site.list).unwrap();

    assert_eq!(
        site.list.get(custom).unwrap().options().get("layout"),
        Some(&s("wide"))
    );
    // The default fences are gone from the table, so this file has no
    // recognized front matter any more.
    assert!(site.list.get(standard).unwrap().options().is_empty());
}

#[test]
fn haml_and_slim_commented_front_matter_round_trips() {
    let mut site = Site::new();
    let (haml, _) = site.page(
        "view.haml",
        "-#\n  ---\nlayout: admin\ntitle: Dashboard\n  ---\n%h1 Dashboard",
    );
    let (slim, _) = site.page(
        "view.slim",
        "/\n  ---\nlayout: admin\n  ---\nh1 Dashboard",
    );

    let extension = FrontMatterExtension::new(site.index);
    extension.manipulate_resource_list(&mut site.list).unwrap();

    for handle in [haml, slim] {
        let resource = site.list.get(handle).unwrap();
        assert_eq!(resource.options().get("layout"), Some(&s("admin")));
    }
    assert_eq!(
        site.list.get(haml).unwrap().page_data().get("title"),
        Some(&s("Dashboard"))
    );
}

#[test]
fn concurrent_fetches_share_one_memoized_entry() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shared.md");
    fs::write(&path, "---\ntitle: Shared\n---\n").unwrap();

    let cache = Arc::new(ExtractionCache::new(DelimiterRegistry::default()));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let path = path.clone();
            std::thread::spawn(move || cache.fetch(&path).unwrap())
        })
        .collect();

    for handle in handles {
        let parsed = handle.join().unwrap();
        assert_eq!(parsed.data.get("title"), Some(&s("Shared")));
    }
    assert_eq!(cache.len(), 1);
}
