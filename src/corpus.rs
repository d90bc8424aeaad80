//! Document corpus scanning.
//!
//! Walks a `docs/` directory and turns every markdown file into a
//! [`Document`] keyed by its [`DocId`]. The corpus is the set of valid
//! targets for navigation references and markdown cross-links.
//!
//! ```text
//! docs/
//! ├── introduction.md                 → introduction
//! ├── 01-overview/
//! │   └── concept-of-operations.md    → overview/concept-of-operations
//! └── planning/
//!     ├── upload-mission-model.md     → planning/upload-mission-model
//!     └── collaboration/
//!         └── introduction.md         → planning/collaboration/introduction
//! ```
//!
//! Ordering prefixes are stripped from ids (see [`crate::naming`]). Two files
//! that collapse onto the same id are rejected.

use crate::naming;
use crate::types::DocId;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Non UTF-8 document path: {0}")]
    NonUtf8Path(PathBuf),
    #[error("Documents {first} and {second} both map to id \"{id}\"")]
    DuplicateId {
        id: DocId,
        first: PathBuf,
        second: PathBuf,
    },
}

/// One markdown document.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocId,
    /// First `# ` heading, or the id's last segment as a fallback.
    pub title: String,
    /// Raw markdown.
    pub body: String,
    /// Path relative to the site source root (`docs/planning/snapshots.md`).
    pub source_path: String,
}

impl Document {
    pub fn new(id: impl Into<DocId>, body: impl Into<String>, source_path: impl Into<String>) -> Self {
        let id = id.into();
        let body = body.into();
        let title = extract_title(&body).unwrap_or_else(|| naming::display_title(id.leaf()));
        Self {
            id,
            title,
            body,
            source_path: source_path.into(),
        }
    }
}

/// Text of the first level-one heading. Parsed rather than scanned by line
/// so `# comment` lines inside code fences are not mistaken for headings.
fn extract_title(body: &str) -> Option<String> {
    let mut title: Option<String> = None;
    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => title = Some(String::new()),
            Event::Text(text) | Event::Code(text) => {
                if let Some(t) = title.as_mut() {
                    t.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                if let Some(t) = title.take() {
                    let t = t.trim();
                    if !t.is_empty() {
                        return Some(t.to_string());
                    }
                }
            }
            _ => {}
        }
    }
    None
}

/// All documents of one snapshot, ordered by id.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    docs: BTreeMap<DocId, Document>,
}

impl Corpus {
    /// Build a corpus from documents. Later duplicates replace earlier ones;
    /// use [`scan_corpus`] for duplicate detection on disk.
    pub fn new(docs: impl IntoIterator<Item = Document>) -> Self {
        Self {
            docs: docs.into_iter().map(|d| (d.id.clone(), d)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.docs.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.docs.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.docs.values()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// Scan a docs directory into a corpus.
///
/// `source_root` is the site source directory; document `source_path`s are
/// recorded relative to it. A missing docs directory yields an empty corpus.
pub fn scan_corpus(docs_dir: &Path, source_root: &Path) -> Result<Corpus, CorpusError> {
    let mut docs: BTreeMap<DocId, Document> = BTreeMap::new();
    let mut origins: BTreeMap<DocId, PathBuf> = BTreeMap::new();

    if !docs_dir.is_dir() {
        return Ok(Corpus::default());
    }

    let walker = WalkDir::new(docs_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.'));

    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_markdown(path) {
            continue;
        }

        let id = doc_id_for(path, docs_dir)?;
        if let Some(first) = origins.get(&id) {
            return Err(CorpusError::DuplicateId {
                id,
                first: first.clone(),
                second: path.to_path_buf(),
            });
        }

        let body = fs::read_to_string(path)?;
        let source_path = path
            .strip_prefix(source_root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        origins.insert(id.clone(), path.to_path_buf());
        docs.insert(id.clone(), Document::new(id, body, source_path));
    }

    Ok(Corpus { docs })
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("mdx"))
        .unwrap_or(false)
}

fn doc_id_for(path: &Path, docs_dir: &Path) -> Result<DocId, CorpusError> {
    let rel = path
        .strip_prefix(docs_dir)
        .map_err(|_| CorpusError::NonUtf8Path(path.to_path_buf()))?
        .with_extension("");
    let mut segments = Vec::new();
    for component in rel.components() {
        let segment = component
            .as_os_str()
            .to_str()
            .ok_or_else(|| CorpusError::NonUtf8Path(path.to_path_buf()))?;
        segments.push(segment);
    }
    Ok(DocId::new(naming::doc_id_from_segments(segments)))
}
