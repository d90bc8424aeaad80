//! Shared test utilities for the docsite test suite.
//!
//! Provides fixture setup, lookup helpers, and sidebar tree assertions that
//! work with loaded sites and built navigation.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let site = load_site(tmp.path()).unwrap();
//! let snapshot = find_snapshot(&site, None);
//! let nav = snapshot.sidebars.build(&snapshot.corpus, &snapshot.urls).unwrap();
//!
//! assert_sidebar_shape(find_tree(&nav, "docs"), &[
//!     ("Introduction", &[]),
//!     ("Planning", &["Upload a Mission Model", "Snapshots"]),
//! ]);
//! ```

use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use crate::generate::{Site, Snapshot};
use crate::nav::{BuiltNavigation, SidebarItem, SidebarTree};
use crate::snippet::{FetchError, Fetcher};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

struct OfflineFetcher;

impl Fetcher for OfflineFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        Err(FetchError::Http(format!("offline: {url}")))
    }
}

/// Snippet fetcher that fails every request without touching the network.
pub fn offline_fetcher() -> Arc<dyn Fetcher> {
    Arc::new(OfflineFetcher)
}

// =========================================================================
// Lookups (panic with the available names on a miss)
// =========================================================================

/// Find a snapshot by version (`None` for current). Panics if not found.
pub fn find_snapshot<'a>(site: &'a Site, version: Option<&str>) -> &'a Snapshot {
    site.snapshots
        .iter()
        .find(|s| s.version.as_deref() == version)
        .unwrap_or_else(|| {
            let versions: Vec<Option<&str>> =
                site.snapshots.iter().map(|s| s.version.as_deref()).collect();
            panic!("snapshot {version:?} not found. Available: {versions:?}")
        })
}

/// Find a sidebar tree by root name. Panics if not found.
pub fn find_tree<'a>(nav: &'a BuiltNavigation, root: &str) -> &'a SidebarTree {
    nav.tree(root).unwrap_or_else(|| {
        let roots: Vec<&str> = nav.trees.iter().map(|t| t.root.as_str()).collect();
        panic!("sidebar root '{root}' not found. Available: {roots:?}")
    })
}

// =========================================================================
// Sidebar helpers
// =========================================================================

/// Top-level labels of a tree in order.
pub fn sidebar_labels(tree: &SidebarTree) -> Vec<&str> {
    tree.items.iter().map(|i| i.label()).collect()
}

/// Child labels of a top-level category. Panics if not found or not a category.
pub fn category_labels<'a>(tree: &'a SidebarTree, label: &str) -> Vec<&'a str> {
    match tree.items.iter().find(|i| i.label() == label) {
        Some(SidebarItem::Category { items, .. }) => items.iter().map(|i| i.label()).collect(),
        Some(other) => panic!("sidebar item '{label}' is not a category: {other:?}"),
        None => {
            let labels = sidebar_labels(tree);
            panic!("sidebar item '{label}' not found. Available: {labels:?}")
        }
    }
}

/// Assert that a tree matches an expected shape.
///
/// Each entry is `(label, children)`. Use `&[]` for links and for
/// categories whose children are not checked.
///
/// ```rust
/// assert_sidebar_shape(tree, &[
///     ("Introduction", &[]),
///     ("Planning", &["Upload a Mission Model", "Snapshots"]),
/// ]);
/// ```
pub fn assert_sidebar_shape(tree: &SidebarTree, expected: &[(&str, &[&str])]) {
    let actual = sidebar_labels(tree);
    let expected_labels: Vec<&str> = expected.iter().map(|(l, _)| *l).collect();
    assert_eq!(actual, expected_labels, "sidebar '{}' top-level labels mismatch", tree.root);

    for (label, children) in expected {
        if children.is_empty() {
            continue;
        }
        let actual_children = category_labels(tree, label);
        assert_eq!(
            actual_children,
            children.to_vec(),
            "children of '{label}' in sidebar '{}' mismatch",
            tree.root
        );
    }
}
