//! Shared types used across the navigation model, the content renderer and
//! the build driver.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Stable identifier naming one document in a corpus.
///
/// Ids are `/`-separated paths relative to the docs directory, without the
/// `.md` extension and with numeric ordering prefixes stripped
/// (`docs/02-planning/snapshots.md` → `planning/snapshots`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory part of the id (`planning/snapshots` → `planning`).
    pub fn parent(&self) -> &str {
        self.0.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
    }

    /// Last path segment (`planning/snapshots` → `snapshots`).
    pub fn leaf(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DocId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::borrow::Borrow<str> for DocId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Display mode used when selecting light/dark image variants and color tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Light,
    Dark,
}

impl ColorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }
}

/// Whether an href leaves the site: it carries a scheme (`https:`,
/// `mailto:`) or is protocol-relative.
pub fn is_external_href(href: &str) -> bool {
    if href.starts_with("//") {
        return true;
    }
    match href.split_once(':') {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Maps document ids and generated-index slugs to hrefs and output paths
/// for one snapshot.
///
/// The current snapshot lives at the base URL; a versioned snapshot lives
/// under `<base_url><version>/`.
#[derive(Debug, Clone)]
pub struct UrlScheme {
    base_url: String,
    version: Option<String>,
}

impl UrlScheme {
    pub fn new(base_url: &str, version: Option<&str>) -> Self {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self {
            base_url: base,
            version: version.map(str::to_string),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Href of the snapshot root (`/docs/` or `/docs/1.2.0/`).
    pub fn root_href(&self) -> String {
        match &self.version {
            Some(v) => format!("{}{}/", self.base_url, v),
            None => self.base_url.clone(),
        }
    }

    pub fn doc_href(&self, id: &DocId) -> String {
        format!("{}{}/", self.root_href(), id)
    }

    pub fn index_href(&self, slug: &str) -> String {
        format!("{}{}/", self.root_href(), slug.trim_matches('/'))
    }

    /// Href of a site-wide file such as the stylesheet or a bundled asset.
    pub fn site_href(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Href for an authored link target.
    ///
    /// Site-absolute paths (`/introduction/#fast-track`) are placed under the
    /// base URL unless they already start with it. Anything else (scheme
    /// URLs, protocol-relative URLs, fragments, relative paths) is returned
    /// unchanged.
    pub fn link_href(&self, href: &str) -> String {
        if !href.starts_with('/') || href.starts_with("//") {
            return href.to_string();
        }
        if self.base_url != "/" && href.starts_with(&self.base_url) {
            return href.to_string();
        }
        self.site_href(href)
    }

    /// Output path of a document page, relative to the output directory.
    pub fn doc_output_path(&self, id: &DocId) -> PathBuf {
        self.snapshot_dir().join(id.as_str()).join("index.html")
    }

    pub fn index_output_path(&self, slug: &str) -> PathBuf {
        self.snapshot_dir()
            .join(slug.trim_matches('/'))
            .join("index.html")
    }

    fn snapshot_dir(&self) -> PathBuf {
        match &self.version {
            Some(v) => PathBuf::from(v),
            None => PathBuf::new(),
        }
    }
}
