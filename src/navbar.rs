//! Top navigation bar.
//!
//! Navbar items are declared in `site.toml` and resolved per snapshot against
//! that snapshot's sidebars and corpus. A versioned snapshot whose navbar
//! names a document it does not contain fails the build like any other
//! dangling reference.

use crate::assets::{AssetError, AssetTable};
use crate::config::{LogoConfig, NavbarConfig, NavbarItemConfig, NavbarPosition};
use crate::corpus::Corpus;
use crate::nav::{NavError, Sidebars};
use crate::types::{ColorMode, DocId, UrlScheme, is_external_href};
use maud::{Markup, html};

/// A navbar entry with a resolved href.
#[derive(Debug, Clone, PartialEq)]
pub struct NavbarLink {
    pub label: String,
    pub href: String,
    pub position: NavbarPosition,
    pub external: bool,
    pub aria_label: Option<String>,
    pub class_name: Option<String>,
}

/// Navbar logo with both variants resolved to bundled hrefs.
#[derive(Debug, Clone, PartialEq)]
pub struct NavbarLogo {
    pub alt: String,
    pub light: String,
    pub dark: Option<String>,
    pub width: Option<u32>,
}

impl NavbarLogo {
    pub fn resolve(logo: &LogoConfig, assets: &AssetTable, urls: &UrlScheme) -> Result<Self, AssetError> {
        let light = urls.site_href(&assets.resolve(&logo.src)?.bundled_path);
        let dark = match &logo.src_dark {
            Some(name) => Some(urls.site_href(&assets.resolve(name)?.bundled_path)),
            None => None,
        };
        Ok(Self {
            alt: logo.alt.clone(),
            light,
            dark,
            width: logo.width,
        })
    }

    pub fn src(&self, mode: ColorMode) -> &str {
        match (mode, &self.dark) {
            (ColorMode::Dark, Some(dark)) => dark,
            _ => &self.light,
        }
    }
}

/// Resolved navbar of one snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Navbar {
    pub title: String,
    pub home_href: String,
    pub logo: Option<NavbarLogo>,
    pub links: Vec<NavbarLink>,
}

/// Resolve navbar items against one snapshot.
pub fn build_navbar(
    config: &NavbarConfig,
    sidebars: &Sidebars,
    corpus: &Corpus,
    urls: &UrlScheme,
) -> Result<Vec<NavbarLink>, NavError> {
    config
        .items
        .iter()
        .map(|item| resolve_item(item, sidebars, corpus, urls))
        .collect()
}

fn resolve_item(
    item: &NavbarItemConfig,
    sidebars: &Sidebars,
    corpus: &Corpus,
    urls: &UrlScheme,
) -> Result<NavbarLink, NavError> {
    match item {
        NavbarItemConfig::Doc {
            doc_id,
            label,
            position,
        } => {
            let doc = corpus
                .get(doc_id)
                .ok_or_else(|| NavError::DanglingNavbarDoc(DocId::from(doc_id.as_str())))?;
            Ok(NavbarLink {
                label: label.clone().unwrap_or_else(|| doc.title.clone()),
                href: urls.doc_href(&doc.id),
                position: *position,
                external: false,
                aria_label: None,
                class_name: None,
            })
        }
        NavbarItemConfig::DocSidebar {
            sidebar_id,
            label,
            position,
        } => {
            let root = sidebars
                .root(sidebar_id)
                .ok_or_else(|| NavError::UnknownSidebar(sidebar_id.clone()))?;
            let first = root
                .doc_refs()
                .into_iter()
                .next()
                .ok_or_else(|| NavError::EmptySidebar(sidebar_id.clone()))?;
            if !corpus.contains(first.as_str()) {
                return Err(NavError::DanglingNavbarDoc(first.clone()));
            }
            Ok(NavbarLink {
                label: label.clone(),
                href: urls.doc_href(first),
                position: *position,
                external: false,
                aria_label: None,
                class_name: None,
            })
        }
        NavbarItemConfig::Href {
            href,
            label,
            aria_label,
            class_name,
            position,
        } => Ok(NavbarLink {
            label: label.clone().unwrap_or_default(),
            href: urls.link_href(href),
            position: *position,
            external: is_external_href(href),
            aria_label: aria_label.clone(),
            class_name: class_name.clone(),
        }),
    }
}

impl Navbar {
    /// Navbar widget markup. `current_href` marks the link of the current page.
    pub fn render(&self, current_href: &str, mode: ColorMode) -> Markup {
        let left = self.links.iter().filter(|l| l.position == NavbarPosition::Left);
        let right = self.links.iter().filter(|l| l.position == NavbarPosition::Right);
        html! {
            header.navbar {
                a.navbar-brand href=(self.home_href) {
                    @if let Some(logo) = &self.logo {
                        img.navbar-logo src=(logo.src(mode)) alt=(logo.alt) width=[logo.width];
                    }
                    span.navbar-title { (self.title) }
                }
                ul.navbar-items.navbar-left {
                    @for link in left {
                        (render_link(link, current_href))
                    }
                }
                ul.navbar-items.navbar-right {
                    @for link in right {
                        (render_link(link, current_href))
                    }
                }
            }
        }
    }
}

fn render_link(link: &NavbarLink, current_href: &str) -> Markup {
    let active = !link.external && link.href == current_href;
    let mut classes = String::from("navbar-link");
    if active {
        classes.push_str(" active");
    }
    if let Some(extra) = &link.class_name {
        classes.push(' ');
        classes.push_str(extra);
    }
    html! {
        li.navbar-item {
            @if link.external {
                a class=(classes) href=(link.href)
                    aria-label=[link.aria_label.as_deref()]
                    target="_blank" rel="noopener noreferrer" { (link.label) }
            } @else {
                a class=(classes) href=(link.href)
                    aria-label=[link.aria_label.as_deref()]
                    aria-current=[active.then_some("page")] { (link.label) }
            }
        }
    }
}
