//! CLI output formatting for the `nav`, `check`, and `build` commands.
//!
//! # Information-First Display
//!
//! Output leads with what a reader of the site sees: sidebar labels in
//! order, page titles, and the href each one resolves to. Document ids and
//! output paths are secondary context, shown after `→` or on indented lines.
//!
//! # Output Format
//!
//! ## Nav
//!
//! ```text
//! docs
//! 001 Introduction → /introduction/
//! 002 Planning → /category/planning/
//!     001 Upload a Mission Model → /planning/upload-mission-model/
//!     002 Snapshots → /planning/snapshots/
//! 003 Javadoc → https://example.org/javadoc (external)
//! ```
//!
//! ## Check
//!
//! ```text
//! current: 9 documents, 3 sidebars, 1 generated index
//!     Unlisted: drafts/notes
//! version 1.0.0: 3 documents, 3 sidebars, 0 generated indexes
//!
//! Broken links
//!     current planning/snapshots → restore-legacy.md
//!
//! Checked 2 snapshots, 7 assets, 4 homepage sections
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! current
//!     001 Introduction → introduction/index.html
//!     002 Planning → category/planning/index.html
//! version 1.0.0
//!     001 Introduction → 1.0.0/introduction/index.html
//! Page Not Found → 404.html
//!
//! Generated 12 pages, 1 generated index, 2 remote snippets, 7 assets
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::generate::{BrokenLinkRecord, BuildReport, CheckReport, PageKind, PageRecord};
use crate::nav::{SidebarItem, SidebarTree};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Singular or plural noun for a count: `1 document`, `3 documents`.
fn count_noun(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, plural)
    }
}

// ============================================================================
// Tree walker
// ============================================================================

/// A flattened sidebar node with its depth and sibling position.
struct TreeNode<'a> {
    depth: usize,
    position: usize,
    item: &'a SidebarItem,
}

fn walk_sidebar(items: &[SidebarItem]) -> Vec<TreeNode<'_>> {
    let mut nodes = Vec::new();
    walk_sidebar_recursive(items, 0, &mut nodes);
    nodes
}

fn walk_sidebar_recursive<'a>(items: &'a [SidebarItem], depth: usize, nodes: &mut Vec<TreeNode<'a>>) {
    for (i, item) in items.iter().enumerate() {
        nodes.push(TreeNode {
            depth,
            position: i + 1,
            item,
        });
        if let SidebarItem::Category { items, .. } = item {
            walk_sidebar_recursive(items, depth + 1, nodes);
        }
    }
}

fn sidebar_line(node: &TreeNode<'_>) -> String {
    let head = format!("{}{} {}", indent(node.depth), format_index(node.position), node.item.label());
    match node.item {
        SidebarItem::Link { href, .. } => format!("{} \u{2192} {}", head, href),
        SidebarItem::Category { href: Some(href), .. } => format!("{} \u{2192} {}", head, href),
        SidebarItem::Category { href: None, .. } => head,
        SidebarItem::External { href, .. } => format!("{} \u{2192} {} (external)", head, href),
    }
}

// ============================================================================
// Nav output
// ============================================================================

/// Format resolved sidebar trees, one block per navigation root.
pub fn format_nav_output(trees: &[SidebarTree]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, tree) in trees.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(tree.root.clone());
        if tree.items.is_empty() {
            lines.push("    (empty)".to_string());
        }
        for node in walk_sidebar(&tree.items) {
            lines.push(sidebar_line(&node));
        }
    }
    lines
}

/// Print nav output to stdout.
pub fn print_nav_output(trees: &[SidebarTree]) {
    for line in format_nav_output(trees) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

fn snapshot_name(version: Option<&str>) -> String {
    match version {
        Some(v) => format!("version {}", v),
        None => "current".to_string(),
    }
}

fn broken_link_lines(broken: &[BrokenLinkRecord]) -> Vec<String> {
    let mut lines = Vec::new();
    if broken.is_empty() {
        return lines;
    }
    lines.push(String::new());
    lines.push("Broken links".to_string());
    for link in broken {
        lines.push(format!("    {} {} \u{2192} {}", link.snapshot, link.doc, link.target));
    }
    lines
}

/// Format the result of validating a site.
pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines = Vec::new();

    for snapshot in &report.snapshots {
        lines.push(format!(
            "{}: {}, {}, {}",
            snapshot_name(snapshot.version.as_deref()),
            count_noun(snapshot.documents, "document", "documents"),
            count_noun(snapshot.trees.len(), "sidebar", "sidebars"),
            count_noun(snapshot.generated_indexes, "generated index", "generated indexes"),
        ));
        if !snapshot.unlisted.is_empty() {
            lines.push(format!("    Unlisted: {}", snapshot.unlisted.join(", ")));
        }
    }

    lines.extend(broken_link_lines(&report.broken_links));

    lines.push(String::new());
    lines.push(format!(
        "Checked {}, {}, {}",
        count_noun(report.snapshots.len(), "snapshot", "snapshots"),
        count_noun(report.assets, "asset", "assets"),
        count_noun(report.homepage_sections, "homepage section", "homepage sections"),
    ));
    lines
}

/// Print check output to stdout.
pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

fn page_line(position: usize, page: &PageRecord) -> String {
    format!("    {} {} \u{2192} {}", format_index(position), page.title, page.path)
}

/// Format the pages written by a build, grouped by snapshot.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    for page in report.pages.iter().filter(|p| p.kind == PageKind::Homepage) {
        lines.push(format!("Home \u{2192} {}", page.path));
    }

    // Snapshot order follows the order pages were recorded in.
    let mut versions: Vec<Option<&str>> = Vec::new();
    for page in &report.pages {
        if matches!(page.kind, PageKind::Document | PageKind::GeneratedIndex)
            && !versions.contains(&page.version.as_deref())
        {
            versions.push(page.version.as_deref());
        }
    }

    for version in versions {
        lines.push(snapshot_name(version));
        let pages = report
            .pages
            .iter()
            .filter(|p| matches!(p.kind, PageKind::Document | PageKind::GeneratedIndex))
            .filter(|p| p.version.as_deref() == version);
        for (i, page) in pages.enumerate() {
            lines.push(page_line(i + 1, page));
        }
    }

    for page in report.pages.iter().filter(|p| p.kind == PageKind::NotFound) {
        lines.push(format!("{} \u{2192} {}", page.title, page.path));
    }

    lines.extend(broken_link_lines(&report.broken_links));

    let generated_indexes = report
        .pages
        .iter()
        .filter(|p| p.kind == PageKind::GeneratedIndex)
        .count();
    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {}, {}",
        count_noun(report.pages.len(), "page", "pages"),
        count_noun(generated_indexes, "generated index", "generated indexes"),
        count_noun(report.remote_snippets, "remote snippet", "remote snippets"),
        count_noun(report.assets_copied, "asset", "assets"),
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
