//! Site build driver.
//!
//! Loads every declarative input once, validates it, and renders static HTML.
//! Nothing is written until every snapshot's navigation, the navbar and the
//! homepage assets have resolved, so a dangling reference or an unknown asset
//! never leaves a half-written site behind.
//!
//! ## Source Layout
//!
//! ```text
//! site/
//! ├── site.toml
//! ├── sidebars.toml
//! ├── homepage.toml
//! ├── docs/                        # current snapshot
//! ├── static/                      # fingerprinted and copied to assets/
//! └── versioned/
//!     └── 1.0.0/
//!         ├── sidebars.toml
//!         └── docs/
//! ```
//!
//! ## Output Structure
//!
//! ```text
//! build/
//! ├── index.html                   # homepage
//! ├── 404.html
//! ├── style.css                    # color tokens + base stylesheet
//! ├── build-manifest.json          # every page, plus search settings
//! ├── assets/img/logo.3f9a01bc.svg
//! ├── introduction/index.html
//! ├── category/planning/index.html # generated index
//! └── 1.0.0/introduction/index.html
//! ```
//!
//! Document pages of a snapshot are rendered in parallel with rayon. A
//! document's remote snippets are fetched concurrently inside its own render.

use crate::assets::{AssetError, AssetTable};
use crate::config::{self, ConfigError, SiteConfig};
use crate::content::{self, ContentError, Hero, ResolvedHomepage, RenderContext};
use crate::corpus::{self, Corpus, CorpusError, Document};
use crate::markdown::{self, MarkdownContext, MarkdownError};
use crate::nav::{self, BuiltNavigation, NavError, SidebarOptions, SidebarTree, Sidebars};
use crate::navbar::{self, Navbar, NavbarLogo};
use crate::snippet::{Fetcher, HttpFetcher};
use crate::types::{ColorMode, UrlScheme};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub const DOCS_DIR: &str = "docs";
pub const STATIC_DIR: &str = "static";
pub const VERSIONED_DIR: &str = "versioned";
pub const MANIFEST_FILE: &str = "build-manifest.json";

const CSS_STATIC: &str = include_str!("../static/style.css");

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Corpus(#[from] CorpusError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Markdown(#[from] MarkdownError),
    #[error("{snapshot}: {source}")]
    Nav {
        snapshot: String,
        #[source]
        source: NavError,
    },
}

// ============================================================================
// Loading
// ============================================================================

/// One version's independent sidebars and documents.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// `None` for the current docs.
    pub version: Option<String>,
    pub sidebars: Sidebars,
    pub corpus: Corpus,
    pub urls: UrlScheme,
}

impl Snapshot {
    pub fn label(&self) -> String {
        match &self.version {
            Some(v) => format!("version {v}"),
            None => "current".to_string(),
        }
    }
}

/// Every declarative input of a site, loaded but not yet validated.
#[derive(Debug, Clone)]
pub struct Site {
    pub source: PathBuf,
    pub config: SiteConfig,
    pub assets: AssetTable,
    pub snapshots: Vec<Snapshot>,
    pub homepage: Option<content::Homepage>,
}

pub fn load_site(source: &Path) -> Result<Site, GenerateError> {
    let config = config::load_config(source)?;
    let assets = AssetTable::scan(&source.join(STATIC_DIR))?;
    let snapshots = load_snapshots(source, &config.base_url)?;
    let homepage = content::load_homepage(source)?;
    info!(
        snapshots = snapshots.len(),
        assets = assets.len(),
        "loaded site from {}",
        source.display()
    );
    Ok(Site {
        source: source.to_path_buf(),
        config,
        assets,
        snapshots,
        homepage,
    })
}

/// Current snapshot first, then every `versioned/<version>/` in name order.
pub fn load_snapshots(source: &Path, base_url: &str) -> Result<Vec<Snapshot>, GenerateError> {
    let mut snapshots = vec![load_snapshot(source, source, None, base_url)?];

    let versioned = source.join(VERSIONED_DIR);
    if versioned.is_dir() {
        let mut dirs: Vec<(String, PathBuf)> = fs::read_dir(&versioned)?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .map(|e| (e.file_name().to_string_lossy().to_string(), e.path()))
            .filter(|(name, _)| !name.starts_with('.'))
            .collect();
        dirs.sort();
        for (version, dir) in dirs {
            snapshots.push(load_snapshot(&dir, source, Some(&version), base_url)?);
        }
    }

    Ok(snapshots)
}

fn load_snapshot(
    dir: &Path,
    source_root: &Path,
    version: Option<&str>,
    base_url: &str,
) -> Result<Snapshot, GenerateError> {
    let label = version.map_or_else(|| "current".to_string(), |v| format!("version {v}"));
    let sidebars = nav::load_sidebars(dir).map_err(|source| GenerateError::Nav {
        snapshot: label,
        source,
    })?;
    let corpus = corpus::scan_corpus(&dir.join(DOCS_DIR), source_root)?;
    debug!(
        version = version.unwrap_or("current"),
        documents = corpus.len(),
        roots = sidebars.roots().len(),
        "scanned snapshot"
    );
    Ok(Snapshot {
        version: version.map(str::to_string),
        sidebars,
        corpus,
        urls: UrlScheme::new(base_url, version),
    })
}

// ============================================================================
// Resolution
// ============================================================================

/// A snapshot whose navigation and navbar have resolved.
struct ResolvedSnapshot<'a> {
    snapshot: &'a Snapshot,
    nav: BuiltNavigation,
    navbar: Navbar,
}

/// Everything rendering needs, all references resolved.
struct ResolvedSite<'a> {
    site: &'a Site,
    snapshots: Vec<ResolvedSnapshot<'a>>,
    homepage: Option<ResolvedHomepage>,
    favicon_href: Option<String>,
}

fn resolve_site(site: &Site) -> Result<ResolvedSite<'_>, GenerateError> {
    let site_urls = UrlScheme::new(&site.config.base_url, None);
    let logo = site
        .config
        .navbar
        .logo
        .as_ref()
        .map(|logo| NavbarLogo::resolve(logo, &site.assets, &site_urls))
        .transpose()?;
    let favicon_href = site
        .config
        .favicon
        .as_deref()
        .map(|name| -> Result<String, AssetError> {
            Ok(site_urls.site_href(&site.assets.resolve(name)?.bundled_path))
        })
        .transpose()?;

    let mut snapshots = Vec::with_capacity(site.snapshots.len());
    for snapshot in &site.snapshots {
        let nav_error = |source| GenerateError::Nav {
            snapshot: snapshot.label(),
            source,
        };
        let nav = snapshot
            .sidebars
            .build(&snapshot.corpus, &snapshot.urls)
            .map_err(nav_error)?;
        let links = navbar::build_navbar(
            &site.config.navbar,
            &snapshot.sidebars,
            &snapshot.corpus,
            &snapshot.urls,
        )
        .map_err(nav_error)?;
        snapshots.push(ResolvedSnapshot {
            snapshot,
            nav,
            navbar: Navbar {
                title: site.config.title.clone(),
                home_href: site_urls.root_href(),
                logo: logo.clone(),
                links,
            },
        });
    }

    let homepage = site
        .homepage
        .as_ref()
        .map(|h| content::resolve_homepage(h, &site.assets, &site_urls))
        .transpose()?;

    Ok(ResolvedSite {
        site,
        snapshots,
        homepage,
        favicon_href,
    })
}

// ============================================================================
// Reports
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageKind {
    Document,
    GeneratedIndex,
    Homepage,
    NotFound,
}

/// One written page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRecord {
    pub kind: PageKind,
    pub title: String,
    pub href: String,
    /// Output path relative to the output directory, `/`-separated.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrokenLinkRecord {
    pub snapshot: String,
    pub doc: String,
    pub target: String,
}

#[derive(Debug, Clone)]
pub struct BuildReport {
    pub output: PathBuf,
    pub pages: Vec<PageRecord>,
    pub assets_copied: usize,
    pub remote_snippets: usize,
    pub broken_links: Vec<BrokenLinkRecord>,
}

#[derive(Debug, Clone)]
pub struct SnapshotReport {
    pub version: Option<String>,
    pub documents: usize,
    pub trees: Vec<SidebarTree>,
    pub generated_indexes: usize,
    /// Documents not listed in any navigation root.
    pub unlisted: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CheckReport {
    pub snapshots: Vec<SnapshotReport>,
    pub assets: usize,
    pub homepage_sections: usize,
    pub broken_links: Vec<BrokenLinkRecord>,
}

#[derive(Serialize)]
struct BuildManifest<'a> {
    generator: String,
    title: &'a str,
    url: &'a str,
    base_url: &'a str,
    default_mode: ColorMode,
    locales: &'a [String],
    versions: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a toml::Table>,
    pages: &'a [PageRecord],
}

// ============================================================================
// Entry points
// ============================================================================

/// Validate a site without writing anything.
///
/// Runs every fatal check of a build: config, navigation of every snapshot,
/// navbar, asset references, and markdown cross-links. Remote snippets are
/// not fetched.
pub fn check(source: &Path) -> Result<CheckReport, GenerateError> {
    let site = load_site(source)?;
    let resolved = resolve_site(&site)?;

    let mut broken_links = Vec::new();
    let mut snapshots = Vec::with_capacity(resolved.snapshots.len());
    for rs in &resolved.snapshots {
        for doc in rs.snapshot.corpus.iter() {
            let ctx = MarkdownContext {
                doc_id: &doc.id,
                corpus: &rs.snapshot.corpus,
                urls: &rs.snapshot.urls,
                on_broken_links: site.config.on_broken_markdown_links,
                fetcher: None,
            };
            let rendered = markdown::render_markdown(&doc.body, &ctx)?;
            broken_links.extend(broken_records(rs.snapshot, doc, rendered.broken_links));
        }
        snapshots.push(SnapshotReport {
            version: rs.snapshot.version.clone(),
            documents: rs.snapshot.corpus.len(),
            trees: rs.nav.trees.clone(),
            generated_indexes: rs.nav.generated_indexes().len(),
            unlisted: unlisted_docs(rs),
        });
    }

    Ok(CheckReport {
        snapshots,
        assets: site.assets.len(),
        homepage_sections: resolved.homepage.as_ref().map_or(0, |h| h.sections.len()),
        broken_links,
    })
}

/// Build the site from `source` into `output`.
pub fn build(source: &Path, output: &Path) -> Result<BuildReport, GenerateError> {
    let site = load_site(source)?;
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(Duration::from_secs(
        site.config.snippets.timeout_secs,
    )));
    build_site(&site, output, &fetcher)
}

/// Build an already-loaded site with the given snippet fetcher.
pub fn build_site(site: &Site, output: &Path, fetcher: &Arc<dyn Fetcher>) -> Result<BuildReport, GenerateError> {
    let resolved = resolve_site(site)?;
    let site_urls = UrlScheme::new(&site.config.base_url, None);
    let chrome = Chrome {
        config: &site.config,
        css_href: site_urls.site_href("style.css"),
        favicon_href: resolved.favicon_href.clone(),
        ctx: RenderContext::new(site.config.theme.default_mode),
        sidebar: SidebarOptions {
            auto_collapse_categories: site.config.sidebar.auto_collapse_categories,
            hideable: site.config.sidebar.hideable,
        },
    };

    fs::create_dir_all(output)?;
    let css = format!("{}\n\n{}", config::generate_color_css(&site.config.colors), CSS_STATIC);
    fs::write(output.join("style.css"), css)?;

    let mut pages = Vec::new();
    let mut broken_links = Vec::new();
    let mut remote_snippets = 0;

    for rs in &resolved.snapshots {
        info!(snapshot = %rs.snapshot.label(), "rendering documents");
        let docs: Vec<&Document> = rs.snapshot.corpus.iter().collect();
        let outcomes = docs
            .par_iter()
            .map(|doc| write_doc_page(doc, rs, &chrome, output, fetcher))
            .collect::<Result<Vec<_>, GenerateError>>()?;
        for outcome in outcomes {
            pages.push(outcome.page);
            broken_links.extend(outcome.broken_links);
            remote_snippets += outcome.remote_snippets;
        }

        for index in rs.nav.generated_indexes() {
            let sidebar = rs.nav.tree_for_index(index);
            let markup = render_page(
                &chrome,
                &rs.navbar,
                sidebar,
                &index.href,
                &index.title,
                html! {
                    (version_banner(rs.snapshot, &site_urls))
                    article.generated-index { (index.render_listing()) }
                },
            );
            let path = rs.snapshot.urls.index_output_path(&index.slug);
            write_page(output, &path, markup)?;
            pages.push(PageRecord {
                kind: PageKind::GeneratedIndex,
                title: index.title.clone(),
                href: index.href.clone(),
                path: path_string(&path),
                version: rs.snapshot.version.clone(),
            });
        }
    }

    let current = resolved
        .snapshots
        .first()
        .map(|rs| &rs.navbar)
        .cloned()
        .unwrap_or_default();

    let home = render_page(
        &chrome,
        &current,
        None,
        &site_urls.root_href(),
        &site.config.title,
        render_home_content(&resolved, &chrome),
    );
    write_page(output, Path::new("index.html"), home)?;
    pages.push(PageRecord {
        kind: PageKind::Homepage,
        title: site.config.title.clone(),
        href: site_urls.root_href(),
        path: "index.html".to_string(),
        version: None,
    });

    let not_found = render_page(
        &chrome,
        &current,
        None,
        "",
        "Page Not Found",
        html! {
            main.not-found {
                h1 { "Page Not Found" }
                p { "We could not find what you were looking for." }
                p { a href=(site_urls.root_href()) { "Back to the homepage" } }
            }
        },
    );
    write_page(output, Path::new("404.html"), not_found)?;
    pages.push(PageRecord {
        kind: PageKind::NotFound,
        title: "Page Not Found".to_string(),
        href: site_urls.site_href("404.html"),
        path: "404.html".to_string(),
        version: None,
    });

    let assets_copied = site.assets.copy_to(output)?;

    let manifest = BuildManifest {
        generator: format!("docsite {}", env!("CARGO_PKG_VERSION")),
        title: &site.config.title,
        url: &site.config.url,
        base_url: &site.config.base_url,
        default_mode: site.config.theme.default_mode,
        locales: &site.config.i18n.locales,
        versions: site
            .snapshots
            .iter()
            .filter_map(|s| s.version.as_deref())
            .collect(),
        search: site.config.search.as_ref(),
        pages: &pages,
    };
    fs::write(output.join(MANIFEST_FILE), serde_json::to_string_pretty(&manifest)?)?;

    info!(pages = pages.len(), assets = assets_copied, "site written to {}", output.display());

    Ok(BuildReport {
        output: output.to_path_buf(),
        pages,
        assets_copied,
        remote_snippets,
        broken_links,
    })
}

struct DocOutcome {
    page: PageRecord,
    broken_links: Vec<BrokenLinkRecord>,
    remote_snippets: usize,
}

fn write_doc_page(
    doc: &Document,
    rs: &ResolvedSnapshot<'_>,
    chrome: &Chrome<'_>,
    output: &Path,
    fetcher: &Arc<dyn Fetcher>,
) -> Result<DocOutcome, GenerateError> {
    let urls = &rs.snapshot.urls;
    let ctx = MarkdownContext {
        doc_id: &doc.id,
        corpus: &rs.snapshot.corpus,
        urls,
        on_broken_links: chrome.config.on_broken_markdown_links,
        fetcher: Some(fetcher),
    };
    let rendered = markdown::render_markdown(&doc.body, &ctx)?;

    let href = urls.doc_href(&doc.id);
    let sidebar = rs.nav.tree_for_doc(&doc.id, urls);
    let site_urls = UrlScheme::new(&chrome.config.base_url, None);
    let markup = render_page(
        chrome,
        &rs.navbar,
        sidebar,
        &href,
        &doc.title,
        html! {
            (version_banner(rs.snapshot, &site_urls))
            article.doc {
                (PreEscaped(&rendered.html))
            }
            @if let Some(edit_url) = &chrome.config.edit_url {
                div.edit-this-page {
                    a href={ (edit_url.trim_end_matches('/')) "/" (doc.source_path) } { "Edit this page" }
                }
            }
            @if let Some(tree) = sidebar {
                (render_pagination(tree, &href))
            }
        },
    );

    let path = urls.doc_output_path(&doc.id);
    write_page(output, &path, markup)?;

    Ok(DocOutcome {
        page: PageRecord {
            kind: PageKind::Document,
            title: doc.title.clone(),
            href,
            path: path_string(&path),
            version: rs.snapshot.version.clone(),
        },
        broken_links: broken_records(rs.snapshot, doc, rendered.broken_links),
        remote_snippets: rendered.remote_snippets,
    })
}

fn broken_records(snapshot: &Snapshot, doc: &Document, targets: Vec<String>) -> Vec<BrokenLinkRecord> {
    targets
        .into_iter()
        .map(|target| BrokenLinkRecord {
            snapshot: snapshot.label(),
            doc: doc.id.to_string(),
            target,
        })
        .collect()
}

fn unlisted_docs(rs: &ResolvedSnapshot<'_>) -> Vec<String> {
    rs.snapshot
        .corpus
        .iter()
        .filter(|doc| rs.nav.tree_for_doc(&doc.id, &rs.snapshot.urls).is_none())
        .map(|doc| doc.id.to_string())
        .collect()
}

fn write_page(output: &Path, rel: &Path, markup: Markup) -> std::io::Result<()> {
    let path = output.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, markup.into_string())?;
    debug!(path = %rel.display(), "wrote page");
    Ok(())
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

// ============================================================================
// HTML Components
// ============================================================================

/// Site-wide inputs shared by every page.
struct Chrome<'a> {
    config: &'a SiteConfig,
    css_href: String,
    favicon_href: Option<String>,
    ctx: RenderContext,
    sidebar: SidebarOptions,
}

/// Renders the base HTML document structure
fn base_document(chrome: &Chrome<'_>, title: &str, content: Markup) -> Markup {
    let full_title = if title == chrome.config.title {
        title.to_string()
    } else {
        format!("{title} | {}", chrome.config.title)
    };
    html! {
        (DOCTYPE)
        html lang=(chrome.config.i18n.default_locale) data-theme=(chrome.ctx.mode.as_str()) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                @if !chrome.config.tagline.is_empty() {
                    meta name="description" content=(chrome.config.tagline);
                }
                title { (full_title) }
                link rel="stylesheet" href=(chrome.css_href);
                @if let Some(favicon) = &chrome.favicon_href {
                    link rel="icon" href=(favicon);
                }
            }
            body {
                (content)
            }
        }
    }
}

/// Navbar, optional sidebar, and main content.
fn render_page(
    chrome: &Chrome<'_>,
    navbar: &Navbar,
    sidebar: Option<&SidebarTree>,
    current_href: &str,
    title: &str,
    content: Markup,
) -> Markup {
    base_document(
        chrome,
        title,
        html! {
            (navbar.render(current_href, chrome.ctx.mode))
            div.page-wrapper {
                @if let Some(tree) = sidebar {
                    aside.doc-sidebar { (tree.render(current_href, chrome.sidebar)) }
                }
                div.page-content {
                    (content)
                }
            }
        },
    )
}

fn version_banner(snapshot: &Snapshot, site_urls: &UrlScheme) -> Markup {
    html! {
        @if let Some(version) = &snapshot.version {
            div.version-banner role="alert" {
                "This is documentation for version " strong { (version) } ". "
                a href=(site_urls.root_href()) { "See the latest version." }
            }
        }
    }
}

fn render_pagination(tree: &SidebarTree, current_href: &str) -> Markup {
    let pages = tree.page_hrefs();
    let Some(pos) = pages.iter().position(|(_, href)| *href == current_href) else {
        return html! {};
    };
    let prev = pos.checked_sub(1).map(|i| pages[i]);
    let next = pages.get(pos + 1).copied();
    html! {
        nav.pagination-nav aria-label="Docs pages" {
            @if let Some((label, href)) = prev {
                a.pagination-link.pagination-prev href=(href) {
                    div.pagination-sublabel { "Previous" }
                    div.pagination-label { (label) }
                }
            }
            @if let Some((label, href)) = next {
                a.pagination-link.pagination-next href=(href) {
                    div.pagination-sublabel { "Next" }
                    div.pagination-label { (label) }
                }
            }
        }
    }
}

/// Declared homepage, or a plain hero linking to the first documentation page.
fn render_home_content(resolved: &ResolvedSite<'_>, chrome: &Chrome<'_>) -> Markup {
    if let Some(homepage) = &resolved.homepage {
        return content::render_homepage(homepage, &chrome.ctx);
    }
    let start = resolved
        .snapshots
        .first()
        .and_then(|rs| rs.nav.trees.first())
        .and_then(|tree| tree.first_href())
        .map(|href| content::CallToAction {
            href: href.to_string(),
            label: "Get Started".to_string(),
            pending: false,
        });
    let fallback: ResolvedHomepage = content::Homepage {
        hero: Some(Hero {
            title: resolved.site.config.title.clone(),
            tagline: Some(resolved.site.config.tagline.clone()).filter(|t| !t.is_empty()),
            image: None,
            link: start,
        }),
        sections: Vec::new(),
    };
    content::render_homepage(&fallback, &chrome.ctx)
}
