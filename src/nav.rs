//! Navigation model.
//!
//! A site declares one or more independent **navigation roots** in
//! `sidebars.toml` (primary docs, API reference, upgrade-guide history, ...).
//! Each root is an ordered tree of [`NavigationEntry`] values; declaration
//! order is display order.
//!
//! ## Declaration Format
//!
//! ```toml
//! docs = [
//!   "introduction",
//!   { type = "category", label = "Planning", link = { type = "generated-index" }, items = [
//!     "planning/upload-mission-model",
//!     "planning/snapshots",
//!   ] },
//!   { type = "category", label = "Mission Modeling", link = { type = "doc", id = "mission-modeling/introduction" }, items = [
//!     "mission-modeling/parameters",
//!     { type = "link", label = "Javadoc", href = "https://example.org/javadoc/" },
//!   ] },
//!   { type = "doc", id = "keyboard-shortcuts", label = "Keyboard Shortcuts" },
//! ]
//!
//! upgrade_guides = ["upgrade-guides/2-0-0-to-2-1-0"]
//! ```
//!
//! A bare string is shorthand for `{ type = "doc", id = "..." }`.
//!
//! ## Validation
//!
//! Before anything is rendered, every document reference (leaf documents and
//! category landing documents) is checked against the [`Corpus`]:
//!
//! - a reference to a document that does not exist is a **dangling reference**;
//! - a document listed twice within one root is a **duplicate**.
//!
//! Every issue across all roots is collected into a single
//! [`NavError::Invalid`] so one build run reports all of them. Roots are
//! independently scoped: the same document may appear in two roots.
//!
//! ## Rendering
//!
//! [`Sidebars::build`] resolves labels and hrefs into a [`BuiltNavigation`]:
//! one [`SidebarTree`] per root plus one [`GeneratedIndexPage`] per
//! generated-index category. [`SidebarTree::render`] produces the sidebar
//! widget markup.

use crate::corpus::Corpus;
use crate::naming;
use crate::types::{DocId, UrlScheme, is_external_href};
use maud::{Markup, html};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const SIDEBARS_FILE: &str = "sidebars.toml";

#[derive(Error, Debug)]
pub enum NavError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error in sidebars: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Sidebar root \"{0}\" must be an array of entries")]
    RootNotArray(String),
    #[error("Navigation is invalid:\n{}", format_issues(.0))]
    Invalid(Vec<NavIssue>),
    #[error("Navbar references unknown sidebar \"{0}\"")]
    UnknownSidebar(String),
    #[error("Navbar references missing document \"{0}\"")]
    DanglingNavbarDoc(DocId),
    #[error("Sidebar \"{0}\" has no document to link to")]
    EmptySidebar(String),
}

/// A single validation problem in one navigation root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavIssue {
    DanglingReference { root: String, id: DocId },
    DuplicateDocument { root: String, id: DocId },
    DuplicateIndexSlug { root: String, slug: String },
}

impl fmt::Display for NavIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavIssue::DanglingReference { root, id } => {
                write!(f, "[{root}] dangling document reference \"{id}\"")
            }
            NavIssue::DuplicateDocument { root, id } => {
                write!(f, "[{root}] document \"{id}\" is listed more than once")
            }
            NavIssue::DuplicateIndexSlug { root, slug } => {
                write!(f, "[{root}] generated index slug \"{slug}\" is used more than once")
            }
        }
    }
}

fn format_issues(issues: &[NavIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("  - {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Declared model
// ============================================================================

/// One entry of a navigation tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawEntry")]
pub enum NavigationEntry {
    Document(DocumentReference),
    Category(CategoryNode),
    External(ExternalLink),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentReference {
    pub id: DocId,
    /// Overrides the document title in the sidebar.
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryNode {
    pub label: String,
    pub link: Option<CategoryLink>,
    pub items: Vec<NavigationEntry>,
    pub collapsed: bool,
    pub collapsible: bool,
}

/// Landing page of a category.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryLink {
    Doc(DocId),
    GeneratedIndex(GeneratedIndex),
}

/// A category landing page listing the category's children, with no
/// authored content of its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedIndex {
    pub title: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
}

impl GeneratedIndex {
    /// Explicit slug, or `category/<slugified label>`.
    pub fn slug_for(&self, label: &str) -> String {
        match &self.slug {
            Some(s) => s.trim_matches('/').to_string(),
            None => format!("category/{}", naming::slugify(label)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExternalLink {
    pub label: String,
    pub href: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Id(String),
    Tagged(TaggedEntry),
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum TaggedEntry {
    Doc {
        id: String,
        #[serde(default)]
        label: Option<String>,
    },
    Category {
        label: String,
        #[serde(default)]
        link: Option<RawCategoryLink>,
        #[serde(default)]
        items: Vec<NavigationEntry>,
        #[serde(default = "default_true")]
        collapsed: bool,
        #[serde(default = "default_true")]
        collapsible: bool,
    },
    Link {
        label: String,
        href: String,
    },
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum RawCategoryLink {
    Doc {
        id: String,
    },
    GeneratedIndex {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        slug: Option<String>,
    },
}

fn default_true() -> bool {
    true
}

impl From<RawEntry> for NavigationEntry {
    fn from(raw: RawEntry) -> Self {
        match raw {
            RawEntry::Id(id) => NavigationEntry::Document(DocumentReference {
                id: DocId::new(id),
                label: None,
            }),
            RawEntry::Tagged(TaggedEntry::Doc { id, label }) => {
                NavigationEntry::Document(DocumentReference {
                    id: DocId::new(id),
                    label,
                })
            }
            RawEntry::Tagged(TaggedEntry::Category {
                label,
                link,
                items,
                collapsed,
                collapsible,
            }) => NavigationEntry::Category(CategoryNode {
                label,
                link: link.map(|l| match l {
                    RawCategoryLink::Doc { id } => CategoryLink::Doc(DocId::new(id)),
                    RawCategoryLink::GeneratedIndex {
                        title,
                        description,
                        slug,
                    } => CategoryLink::GeneratedIndex(GeneratedIndex {
                        title,
                        description,
                        slug,
                    }),
                }),
                items,
                collapsed,
                collapsible,
            }),
            RawEntry::Tagged(TaggedEntry::Link { label, href }) => {
                NavigationEntry::External(ExternalLink { label, href })
            }
        }
    }
}

/// One independently-scoped navigation tree.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationRoot {
    pub name: String,
    pub entries: Vec<NavigationEntry>,
}

impl NavigationRoot {
    /// Every document reference in depth-first declaration order, including
    /// category landing documents (listed before the category's children).
    pub fn doc_refs(&self) -> Vec<&DocId> {
        let mut refs = Vec::new();
        collect_doc_refs(&self.entries, &mut refs);
        refs
    }
}

fn collect_doc_refs<'a>(entries: &'a [NavigationEntry], refs: &mut Vec<&'a DocId>) {
    for entry in entries {
        match entry {
            NavigationEntry::Document(doc) => refs.push(&doc.id),
            NavigationEntry::Category(cat) => {
                if let Some(CategoryLink::Doc(id)) = &cat.link {
                    refs.push(id);
                }
                collect_doc_refs(&cat.items, refs);
            }
            NavigationEntry::External(_) => {}
        }
    }
}

/// All navigation roots of one snapshot, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sidebars {
    roots: Vec<NavigationRoot>,
}

impl Sidebars {
    pub fn new(roots: Vec<NavigationRoot>) -> Self {
        Self { roots }
    }

    pub fn from_toml(content: &str) -> Result<Self, NavError> {
        let table: toml::Table = toml::from_str(content)?;
        let mut roots = Vec::with_capacity(table.len());
        for (name, value) in table {
            if !value.is_array() {
                return Err(NavError::RootNotArray(name));
            }
            let entries: Vec<NavigationEntry> = value.try_into()?;
            roots.push(NavigationRoot { name, entries });
        }
        Ok(Self { roots })
    }

    pub fn roots(&self) -> &[NavigationRoot] {
        &self.roots
    }

    pub fn root(&self, name: &str) -> Option<&NavigationRoot> {
        self.roots.iter().find(|r| r.name == name)
    }

    /// First root, in declaration order, that lists the document.
    pub fn root_for_doc(&self, id: &DocId) -> Option<&NavigationRoot> {
        self.roots.iter().find(|r| r.doc_refs().contains(&id))
    }

    /// Check every document reference against the corpus.
    pub fn validate(&self, corpus: &Corpus) -> Result<(), NavError> {
        let mut issues = Vec::new();
        for root in &self.roots {
            let mut seen = HashSet::new();
            for id in root.doc_refs() {
                if !corpus.contains(id.as_str()) {
                    issues.push(NavIssue::DanglingReference {
                        root: root.name.clone(),
                        id: id.clone(),
                    });
                } else if !seen.insert(id) {
                    issues.push(NavIssue::DuplicateDocument {
                        root: root.name.clone(),
                        id: id.clone(),
                    });
                }
            }

            let mut slugs = HashSet::new();
            for (slug, _, _) in generated_index_decls(&root.entries) {
                if !slugs.insert(slug.clone()) {
                    issues.push(NavIssue::DuplicateIndexSlug {
                        root: root.name.clone(),
                        slug,
                    });
                }
            }
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(NavError::Invalid(issues))
        }
    }

    /// Validate, then resolve labels and hrefs into render trees.
    pub fn build(&self, corpus: &Corpus, urls: &UrlScheme) -> Result<BuiltNavigation, NavError> {
        self.validate(corpus)?;

        let mut trees = Vec::with_capacity(self.roots.len());
        let mut indexes = Vec::new();
        for root in &self.roots {
            let items = build_items(&root.entries, corpus, urls);
            for (slug, index, cat) in generated_index_decls(&root.entries) {
                indexes.push(GeneratedIndexPage {
                    root: root.name.clone(),
                    title: index.title.clone().unwrap_or_else(|| cat.label.clone()),
                    description: index.description.clone(),
                    href: urls.index_href(&slug),
                    slug,
                    items: build_items(&cat.items, corpus, urls),
                });
            }
            trees.push(SidebarTree {
                root: root.name.clone(),
                items,
            });
        }
        Ok(BuiltNavigation { trees, indexes })
    }
}

/// Every generated-index category in a tree: `(slug, index, category)`.
fn generated_index_decls(entries: &[NavigationEntry]) -> Vec<(String, &GeneratedIndex, &CategoryNode)> {
    let mut out = Vec::new();
    collect_generated_indexes(entries, &mut out);
    out
}

fn collect_generated_indexes<'a>(
    entries: &'a [NavigationEntry],
    out: &mut Vec<(String, &'a GeneratedIndex, &'a CategoryNode)>,
) {
    for entry in entries {
        if let NavigationEntry::Category(cat) = entry {
            if let Some(CategoryLink::GeneratedIndex(index)) = &cat.link {
                out.push((index.slug_for(&cat.label), index, cat));
            }
            collect_generated_indexes(&cat.items, out);
        }
    }
}

/// Load `sidebars.toml` from a directory. A missing file means no roots.
pub fn load_sidebars(dir: &Path) -> Result<Sidebars, NavError> {
    let path = dir.join(SIDEBARS_FILE);
    if !path.exists() {
        return Ok(Sidebars::default());
    }
    let content = fs::read_to_string(&path)?;
    Sidebars::from_toml(&content)
}

// ============================================================================
// Render model
// ============================================================================

/// A resolved sidebar entry.
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarItem {
    Link {
        label: String,
        href: String,
        doc_id: DocId,
    },
    Category {
        label: String,
        /// Landing page href (document or generated index).
        href: Option<String>,
        collapsed: bool,
        collapsible: bool,
        items: Vec<SidebarItem>,
    },
    External {
        label: String,
        href: String,
    },
}

impl SidebarItem {
    pub fn label(&self) -> &str {
        match self {
            SidebarItem::Link { label, .. }
            | SidebarItem::Category { label, .. }
            | SidebarItem::External { label, .. } => label,
        }
    }

    fn contains_href(&self, target: &str) -> bool {
        match self {
            SidebarItem::Link { href, .. } => href == target,
            SidebarItem::Category { href, items, .. } => {
                href.as_deref() == Some(target) || items.iter().any(|i| i.contains_href(target))
            }
            SidebarItem::External { .. } => false,
        }
    }

    fn contains_doc(&self, id: &DocId) -> bool {
        match self {
            SidebarItem::Link { doc_id, .. } => doc_id == id,
            SidebarItem::Category { items, .. } => items.iter().any(|i| i.contains_doc(id)),
            SidebarItem::External { .. } => false,
        }
    }
}

fn build_items(entries: &[NavigationEntry], corpus: &Corpus, urls: &UrlScheme) -> Vec<SidebarItem> {
    entries
        .iter()
        .map(|entry| match entry {
            NavigationEntry::Document(doc) => SidebarItem::Link {
                label: doc.label.clone().unwrap_or_else(|| doc_title(corpus, &doc.id)),
                href: urls.doc_href(&doc.id),
                doc_id: doc.id.clone(),
            },
            NavigationEntry::Category(cat) => SidebarItem::Category {
                label: cat.label.clone(),
                href: cat.link.as_ref().map(|link| match link {
                    CategoryLink::Doc(id) => urls.doc_href(id),
                    CategoryLink::GeneratedIndex(index) => {
                        urls.index_href(&index.slug_for(&cat.label))
                    }
                }),
                collapsed: cat.collapsed,
                collapsible: cat.collapsible,
                items: build_items(&cat.items, corpus, urls),
            },
            NavigationEntry::External(link) => SidebarItem::External {
                label: link.label.clone(),
                href: urls.link_href(&link.href),
            },
        })
        .collect()
}

fn doc_title(corpus: &Corpus, id: &DocId) -> String {
    corpus
        .get(id.as_str())
        .map(|d| d.title.clone())
        .unwrap_or_else(|| naming::display_title(id.leaf()))
}

/// The render tree of one navigation root.
#[derive(Debug, Clone, PartialEq)]
pub struct SidebarTree {
    pub root: String,
    pub items: Vec<SidebarItem>,
}

/// Rendering switches taken from `[sidebar]` in the site config.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidebarOptions {
    pub auto_collapse_categories: bool,
    pub hideable: bool,
}

impl SidebarTree {
    /// Internal page hrefs in reading order (category landing pages before
    /// their children). Used for previous/next pagination.
    pub fn page_hrefs(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        collect_page_hrefs(&self.items, &mut out);
        out
    }

    /// First internal page of the tree.
    pub fn first_href(&self) -> Option<&str> {
        self.page_hrefs().first().map(|(_, href)| *href)
    }

    pub fn contains_doc(&self, id: &DocId) -> bool {
        self.items.iter().any(|i| i.contains_doc(id))
    }

    pub fn contains_href(&self, href: &str) -> bool {
        self.items.iter().any(|i| i.contains_href(href))
    }

    /// Sidebar widget markup. The entry whose href equals `current_href` is
    /// marked active and every category containing it is expanded.
    ///
    /// With `auto_collapse_categories`, sibling categories share a
    /// `<details name>` group so opening one closes the others, and only one
    /// of them starts open.
    pub fn render(&self, current_href: &str, options: SidebarOptions) -> Markup {
        let group = options
            .auto_collapse_categories
            .then(|| format!("sidebar-{}", naming::slugify(&self.root)));
        html! {
            nav.sidebar data-root=(self.root) aria-label="Docs sidebar" {
                @if options.hideable {
                    input.sidebar-toggle type="checkbox" id="sidebar-toggle";
                    label.sidebar-hide for="sidebar-toggle" { "Hide sidebar" }
                }
                (render_sidebar_items(&self.items, current_href, group.as_deref()))
            }
        }
    }
}

fn collect_page_hrefs<'a>(items: &'a [SidebarItem], out: &mut Vec<(&'a str, &'a str)>) {
    for item in items {
        match item {
            SidebarItem::Link { label, href, .. } => out.push((label, href)),
            SidebarItem::Category {
                label, href, items, ..
            } => {
                if let Some(href) = href {
                    out.push((label, href));
                }
                collect_page_hrefs(items, out);
            }
            SidebarItem::External { .. } => {}
        }
    }
}

/// Index of the one sibling category left open in an exclusive group: the
/// one containing the current page, else the first declared expanded.
fn exclusive_open(items: &[SidebarItem], current_href: &str) -> Option<usize> {
    let collapsible = |item: &SidebarItem| matches!(item, SidebarItem::Category { collapsible: true, .. });
    items
        .iter()
        .position(|item| collapsible(item) && item.contains_href(current_href))
        .or_else(|| {
            items.iter().position(|item| {
                collapsible(item) && matches!(item, SidebarItem::Category { collapsed: false, .. })
            })
        })
}

fn render_sidebar_items(items: &[SidebarItem], current_href: &str, group: Option<&str>) -> Markup {
    let open = group.and_then(|_| exclusive_open(items, current_href));
    html! {
        ul.sidebar-menu {
            @for (i, item) in items.iter().enumerate() {
                @let expanded = match group {
                    Some(_) => open == Some(i),
                    None => item_expanded(item, current_href),
                };
                @let child_group = group.map(|g| format!("{g}-{i}"));
                (render_sidebar_item(item, current_href, group, expanded, child_group.as_deref()))
            }
        }
    }
}

fn item_expanded(item: &SidebarItem, current_href: &str) -> bool {
    match item {
        SidebarItem::Category { collapsed, .. } => !collapsed || item.contains_href(current_href),
        _ => false,
    }
}

fn render_sidebar_item(
    item: &SidebarItem,
    current_href: &str,
    group: Option<&str>,
    expanded: bool,
    child_group: Option<&str>,
) -> Markup {
    match item {
        SidebarItem::Link { label, href, .. } => {
            let active = href == current_href;
            html! {
                li.sidebar-item {
                    a.sidebar-link.active[active] href=(href)
                        aria-current=[active.then_some("page")] { (label) }
                }
            }
        }
        SidebarItem::External { label, href } => {
            let external = is_external_href(href);
            html! {
                li.sidebar-item {
                    a.sidebar-link.external[external] href=(href)
                        target=[external.then_some("_blank")]
                        rel=[external.then_some("noopener noreferrer")] {
                        (label)
                    }
                }
            }
        }
        SidebarItem::Category {
            label,
            href,
            collapsible,
            items,
            ..
        } => {
            let active = href.as_deref() == Some(current_href);
            let heading = html! {
                @if let Some(href) = href {
                    a.sidebar-link.active[active] href=(href)
                        aria-current=[active.then_some("page")] { (label) }
                } @else {
                    span.sidebar-category-label { (label) }
                }
            };
            html! {
                li.sidebar-item.sidebar-category {
                    @if *collapsible {
                        details name=[group] open[expanded] {
                            summary { (heading) }
                            (render_sidebar_items(items, current_href, child_group))
                        }
                    } @else {
                        div.sidebar-category-heading { (heading) }
                        (render_sidebar_items(items, current_href, child_group))
                    }
                }
            }
        }
    }
}

/// A synthetic category landing page.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedIndexPage {
    pub root: String,
    pub title: String,
    pub description: Option<String>,
    pub slug: String,
    pub href: String,
    /// The category's children; may be empty.
    pub items: Vec<SidebarItem>,
}

impl GeneratedIndexPage {
    /// Listing of the category's children as cards.
    pub fn render_listing(&self) -> Markup {
        html! {
            header.generated-index-header {
                h1 { (self.title) }
                @if let Some(desc) = &self.description {
                    p.generated-index-description { (desc) }
                }
            }
            @if self.items.is_empty() {
                p.generated-index-empty { "This category has no pages yet." }
            } @else {
                section.generated-index-grid {
                    @for item in &self.items {
                        (render_index_card(item))
                    }
                }
            }
        }
    }
}

fn render_index_card(item: &SidebarItem) -> Markup {
    match item {
        SidebarItem::Link { label, href, .. } => html! {
            a.index-card href=(href) { h2 { (label) } }
        },
        SidebarItem::External { label, href } => {
            let external = is_external_href(href);
            html! {
                a.index-card.external[external] href=(href)
                    target=[external.then_some("_blank")]
                    rel=[external.then_some("noopener noreferrer")] {
                    h2 { (label) }
                }
            }
        }
        SidebarItem::Category {
            label, href, items, ..
        } => {
            let count = items.len();
            html! {
                @if let Some(href) = href {
                    a.index-card href=(href) {
                        h2 { (label) }
                        p { (count) @if count == 1 { " item" } @else { " items" } }
                    }
                } @else {
                    div.index-card {
                        h2 { (label) }
                        p { (count) @if count == 1 { " item" } @else { " items" } }
                    }
                }
            }
        }
    }
}

/// Resolved navigation of one snapshot.
#[derive(Debug, Clone, Default)]
pub struct BuiltNavigation {
    pub trees: Vec<SidebarTree>,
    pub indexes: Vec<GeneratedIndexPage>,
}

impl BuiltNavigation {
    pub fn tree(&self, root: &str) -> Option<&SidebarTree> {
        self.trees.iter().find(|t| t.root == root)
    }

    /// Sidebar for a document page: the first root (in declaration order)
    /// listing the document, either as a leaf or as a category landing page.
    pub fn tree_for_doc(&self, id: &DocId, urls: &UrlScheme) -> Option<&SidebarTree> {
        let href = urls.doc_href(id);
        self.trees
            .iter()
            .find(|t| t.contains_doc(id) || t.contains_href(&href))
    }

    pub fn tree_for_index(&self, index: &GeneratedIndexPage) -> Option<&SidebarTree> {
        self.tree(&index.root)
    }

    pub fn generated_indexes(&self) -> &[GeneratedIndexPage] {
        &self.indexes
    }
}
