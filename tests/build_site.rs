//! End-to-end build of the fixture site through the library API.
//!
//! Uses the real HTTP snippet fetcher: the fixture's remote fence points at a
//! closed local port, so the fetch fails fast and the block renders empty.

use docsite::generate::{self, GenerateError, PageKind};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let dst_path = dst.join(entry.file_name());
        if entry.path().is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&entry.path(), &dst_path)?;
        } else {
            fs::copy(entry.path(), &dst_path)?;
        }
    }
    Ok(())
}

fn fixture_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn read(dir: &Path, rel: &str) -> String {
    fs::read_to_string(dir.join(rel)).unwrap_or_else(|e| panic!("reading {rel}: {e}"))
}

#[test]
fn builds_fixture_site() {
    let site = fixture_site();
    let out = TempDir::new().unwrap();
    let report = generate::build(site.path(), out.path()).unwrap();

    assert_eq!(report.remote_snippets, 1);
    assert_eq!(report.broken_links.len(), 1);
    assert_eq!(report.broken_links[0].target, "restore-legacy.md");

    let docs = report.pages.iter().filter(|p| p.kind == PageKind::Document).count();
    assert!(docs >= 10, "expected current and versioned documents, got {docs}");

    let home = read(out.path(), "index.html");
    assert!(home.contains("Plan, schedule and simulate spacecraft activities."));
    assert!(home.contains("Coming soon"));
    assert!(home.contains("What people say"));
}

#[test]
fn failed_remote_snippet_renders_empty_block() {
    let site = fixture_site();
    let out = TempDir::new().unwrap();
    generate::build(site.path(), out.path()).unwrap();

    let page = read(out.path(), "api/examples/index.html");
    assert!(page.contains(r#"data-state="failed""#));
    assert!(page.contains(r#"<code class="language-graphql"></code>"#));
    assert!(page.contains("plans.graphql"));
}

#[test]
fn api_pages_use_api_sidebar() {
    let site = fixture_site();
    let out = TempDir::new().unwrap();
    generate::build(site.path(), out.path()).unwrap();

    let page = read(out.path(), "api/introduction/index.html");
    assert!(page.contains("Query Examples"));
    assert!(!page.contains("Upload a Mission Model"));
}

#[test]
fn dangling_sidebar_reference_writes_nothing() {
    let site = fixture_site();
    let sidebars = site.path().join("sidebars.toml");
    let content = fs::read_to_string(&sidebars).unwrap();
    fs::write(
        &sidebars,
        content.replace("\"planning/snapshots\"", "\"planning/restore\""),
    )
    .unwrap();

    let out = TempDir::new().unwrap();
    let err = generate::build(site.path(), out.path()).unwrap_err();
    assert!(matches!(err, GenerateError::Nav { .. }), "unexpected error: {err}");
    assert!(format!("{err:?}").contains("planning/restore"));
    assert!(!out.path().join("index.html").exists());
}

#[test]
fn base_url_prefixes_every_internal_link() {
    let site = fixture_site();
    let config = site.path().join("site.toml");
    let content = fs::read_to_string(&config).unwrap();
    fs::write(&config, content.replace("base_url = \"/\"", "base_url = \"/aerie-docs/\"")).unwrap();

    let out = TempDir::new().unwrap();
    generate::build(site.path(), out.path()).unwrap();

    let home = read(out.path(), "index.html");
    assert!(home.contains(r#"href="/aerie-docs/introduction/""#));
    assert!(home.contains(r#"href="/aerie-docs/planning/upload-mission-model/""#));
    assert!(!home.contains(r#"href="/introduction/""#));
    assert!(!home.contains(r#"href="/planning/upload-mission-model/""#));

    let intro = read(out.path(), "introduction/index.html");
    assert!(intro.contains(r##"<a class="sidebar-link" href="/aerie-docs/introduction/#fast-track">"##));
    assert!(intro.contains(r#"href="/aerie-docs/style.css""#));
    // pages are still written relative to the output root
    assert!(out.path().join("planning/snapshots/index.html").exists());
}
