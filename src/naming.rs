//! Name handling shared by the corpus scanner and the navigation model.
//!
//! ## Ordering Prefixes
//!
//! Document files and directories may carry a numeric ordering prefix
//! (`02-planning/`, `010-snapshots.md`). The prefix is stripped when
//! building document ids, so `docs/02-planning/010-snapshots.md` has the id
//! `planning/snapshots`. Sidebar order is declared in `sidebars.toml`, never
//! inferred from prefixes.
//!
//! ## Display Titles and Slugs
//!
//! - `first-build` → "first build" (fallback title for a document with no heading)
//! - `Scheduling & Constraints` → `scheduling-constraints` (generated-index slug)

/// Split an optional `NNN-` ordering prefix off a path segment.
///
/// - `"02-planning"` → `(Some(2), "planning")`
/// - `"planning"` → `(None, "planning")`
/// - `"2-17-0-to-2-18-0"` → `(None, "2-17-0-to-2-18-0")`
///
/// A remainder starting with a digit is not split, so version-like names
/// such as upgrade guides keep their full text.
pub fn strip_order_prefix(segment: &str) -> (Option<u32>, &str) {
    let Some((prefix, rest)) = segment.split_once('-') else {
        return (None, segment);
    };
    if rest.is_empty() || rest.starts_with(|c: char| c.is_ascii_digit()) {
        return (None, segment);
    }
    match prefix.parse::<u32>() {
        Ok(num) => (Some(num), rest),
        Err(_) => (None, segment),
    }
}

/// Build a document id from `/`-separated path segments without extension.
pub fn doc_id_from_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    segments
        .into_iter()
        .map(|s| strip_order_prefix(s).1)
        .collect::<Vec<_>>()
        .join("/")
}

/// Fallback display title from an id segment: dashes and underscores become spaces.
pub fn display_title(segment: &str) -> String {
    segment.replace(['-', '_'], " ")
}

/// URL slug from a free-form label.
///
/// Lowercases ASCII letters, keeps alphanumerics, and collapses every run of
/// other characters into a single dash. Leading/trailing dashes are dropped.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_dash = false;
    for c in label.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
