//! Homepage content renderer.
//!
//! The homepage is declared in `homepage.toml` as a hero plus ordered
//! sections of flat content records:
//!
//! ```toml
//! [hero]
//! title = "Mission Planning"
//! tagline = "Plan, schedule and simulate spacecraft activities."
//! image = { light = "img/hero-light.svg", dark = "img/hero-dark.svg" }
//! link = { href = "/introduction/", label = "Get Started" }
//!
//! [[sections]]
//! kind = "cards"
//! heading = "Features"
//!
//! [[sections.items]]
//! title = "Planning"
//! image = { light = "img/cards/planning-light.png", dark = "img/cards/planning-dark.png" }
//! size = "col--6"
//! link = { href = "/planning/upload-mission-model/", label = "Planning docs" }
//! description = "Build, edit and analyze activity plans."
//! ```
//!
//! Image fields hold symbolic asset names. [`resolve_homepage`] swaps every
//! name for its bundled href once per build; only the resolved form can be
//! rendered, so an unknown name fails the build instead of a page.
//!
//! Rendering is pure: the same resolved content and the same [`RenderContext`]
//! always produce the same markup.

use crate::assets::{AssetError, AssetTable};
use crate::types::{ColorMode, UrlScheme};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const HOMEPAGE_FILE: &str = "homepage.toml";

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error in homepage: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Display-mode context passed to every render call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderContext {
    pub mode: ColorMode,
}

impl RenderContext {
    pub fn new(mode: ColorMode) -> Self {
        Self { mode }
    }
}

/// Symbolic light/dark image pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageRef {
    pub light: String,
    #[serde(default)]
    pub dark: Option<String>,
}

impl ImageRef {
    /// Dark variant in dark mode when declared, otherwise the light one.
    pub fn select(&self, mode: ColorMode) -> &str {
        match (mode, &self.dark) {
            (ColorMode::Dark, Some(dark)) => dark,
            _ => &self.light,
        }
    }

    fn resolve(&self, assets: &AssetTable, urls: &UrlScheme) -> Result<ResolvedImage, AssetError> {
        let href = |name: &str| -> Result<String, AssetError> {
            Ok(urls.site_href(&assets.resolve(name)?.bundled_path))
        };
        Ok(ResolvedImage {
            light: href(&self.light)?,
            dark: self.dark.as_deref().map(href).transpose()?,
        })
    }
}

/// Light/dark image pair resolved to bundled hrefs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedImage {
    pub light: String,
    pub dark: Option<String>,
}

impl ResolvedImage {
    pub fn select(&self, mode: ColorMode) -> &str {
        match (mode, &self.dark) {
            (ColorMode::Dark, Some(dark)) => dark,
            _ => &self.light,
        }
    }
}

/// Column width of a card in a 12-column grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardSize {
    #[default]
    #[serde(rename = "col--4")]
    Third,
    #[serde(rename = "col--6")]
    Half,
    #[serde(rename = "col--8")]
    TwoThirds,
    #[serde(rename = "col--12")]
    Full,
}

impl CardSize {
    pub fn class(self) -> &'static str {
        match self {
            CardSize::Third => "col--4",
            CardSize::Half => "col--6",
            CardSize::TwoThirds => "col--8",
            CardSize::Full => "col--12",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CallToAction {
    pub href: String,
    #[serde(default = "default_cta_label")]
    pub label: String,
    /// Target not published yet; rendered as text, not a link.
    #[serde(default)]
    pub pending: bool,
}

impl CallToAction {
    fn resolve(&self, urls: &UrlScheme) -> Self {
        Self {
            href: urls.link_href(&self.href),
            ..self.clone()
        }
    }
}

fn default_cta_label() -> String {
    "Learn more".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InlineLink {
    pub url: String,
    pub text: String,
    #[serde(default)]
    pub new_tab: bool,
}

impl InlineLink {
    fn resolve(&self, urls: &UrlScheme) -> Self {
        Self {
            url: urls.link_href(&self.url),
            ..self.clone()
        }
    }
}

/// One flat homepage record (feature card, partner logo, testimonial,
/// footer column).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, bound(deserialize = "I: Deserialize<'de>"))]
pub struct ContentRecord<I = ImageRef> {
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub image: Option<I>,
    #[serde(default)]
    pub size: CardSize,
    #[serde(default)]
    pub link: Option<CallToAction>,
    #[serde(default)]
    pub links: Vec<InlineLink>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Cards,
    Logos,
    Testimonials,
    Video,
    Footer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, bound(deserialize = "I: Deserialize<'de>"))]
pub struct HomepageSection<I = ImageRef> {
    pub kind: SectionKind,
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default = "Vec::new")]
    pub items: Vec<ContentRecord<I>>,
    /// Static asset played by a `video` section. Holds the bundled href once
    /// resolved.
    #[serde(default)]
    pub video: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, bound(deserialize = "I: Deserialize<'de>"))]
pub struct Hero<I = ImageRef> {
    pub title: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub image: Option<I>,
    #[serde(default)]
    pub link: Option<CallToAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, bound(deserialize = "I: Deserialize<'de>"))]
pub struct Homepage<I = ImageRef> {
    #[serde(default)]
    pub hero: Option<Hero<I>>,
    #[serde(default = "Vec::new")]
    pub sections: Vec<HomepageSection<I>>,
}

pub type ResolvedRecord = ContentRecord<ResolvedImage>;
pub type ResolvedSection = HomepageSection<ResolvedImage>;
pub type ResolvedHomepage = Homepage<ResolvedImage>;

/// Load `homepage.toml` from a directory. Returns `Ok(None)` if absent.
pub fn load_homepage(dir: &Path) -> Result<Option<Homepage>, ContentError> {
    let path = dir.join(HOMEPAGE_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Resolve every symbolic image name to its bundled href, and place
/// site-absolute link targets under the base URL.
pub fn resolve_homepage(
    homepage: &Homepage,
    assets: &AssetTable,
    urls: &UrlScheme,
) -> Result<ResolvedHomepage, AssetError> {
    let resolve_image = |image: &Option<ImageRef>| -> Result<Option<ResolvedImage>, AssetError> {
        image.as_ref().map(|i| i.resolve(assets, urls)).transpose()
    };

    let hero = match &homepage.hero {
        Some(hero) => Some(Hero {
            title: hero.title.clone(),
            tagline: hero.tagline.clone(),
            image: resolve_image(&hero.image)?,
            link: hero.link.as_ref().map(|l| l.resolve(urls)),
        }),
        None => None,
    };

    let mut sections = Vec::with_capacity(homepage.sections.len());
    for section in &homepage.sections {
        let mut items = Vec::with_capacity(section.items.len());
        for record in &section.items {
            items.push(ContentRecord {
                title: record.title.clone(),
                subtitle: record.subtitle.clone(),
                image: resolve_image(&record.image)?,
                size: record.size,
                link: record.link.as_ref().map(|l| l.resolve(urls)),
                links: record.links.iter().map(|l| l.resolve(urls)).collect(),
                description: record.description.clone(),
            });
        }
        let video = match &section.video {
            Some(name) => Some(urls.site_href(&assets.resolve(name)?.bundled_path)),
            None => None,
        };
        sections.push(HomepageSection {
            kind: section.kind,
            heading: section.heading.clone(),
            items,
            video,
        });
    }

    Ok(Homepage { hero, sections })
}

// ============================================================================
// Rendering
// ============================================================================

/// Render the hero followed by every section, in declaration order.
pub fn render_homepage(homepage: &ResolvedHomepage, ctx: &RenderContext) -> Markup {
    html! {
        @if let Some(hero) = &homepage.hero {
            (render_hero(hero, ctx))
        }
        main.homepage {
            @for section in homepage.sections.iter().filter(|s| s.kind != SectionKind::Footer) {
                (render_section(section, ctx))
            }
        }
        @for section in homepage.sections.iter().filter(|s| s.kind == SectionKind::Footer) {
            (render_section(section, ctx))
        }
    }
}

fn render_hero(hero: &Hero<ResolvedImage>, ctx: &RenderContext) -> Markup {
    html! {
        header.hero {
            @if let Some(image) = &hero.image {
                img.hero-image src=(image.select(ctx.mode)) alt="";
            }
            h1.hero-title { (hero.title) }
            @if let Some(tagline) = &hero.tagline {
                p.hero-tagline { (tagline) }
            }
            @if let Some(cta) = &hero.link {
                div.hero-buttons { (render_cta(cta, "button button--primary")) }
            }
        }
    }
}

/// Render one section. Pure with respect to `section` and `ctx`.
pub fn render_section(section: &ResolvedSection, ctx: &RenderContext) -> Markup {
    let body = match section.kind {
        SectionKind::Cards => html! {
            div.row {
                @for record in &section.items {
                    (render_card(record, ctx))
                }
            }
        },
        SectionKind::Logos => html! {
            div.logo-grid {
                @for record in &section.items {
                    (render_logo(record, ctx))
                }
            }
        },
        SectionKind::Testimonials => html! {
            div.row {
                @for record in &section.items {
                    (render_testimonial(record, ctx))
                }
            }
        },
        SectionKind::Video => html! {
            @if let Some(src) = &section.video {
                div.row.video-section {
                    video width="100%" height="auto" controls {
                        source src=(src) type=[video_mime(src)];
                    }
                }
            }
        },
        SectionKind::Footer => html! {
            div.footer-columns {
                @for record in &section.items {
                    (render_footer_column(record, ctx))
                }
            }
        },
    };

    let class = match section.kind {
        SectionKind::Cards => "homepage-section cards",
        SectionKind::Logos => "homepage-section logos",
        SectionKind::Testimonials => "homepage-section testimonials",
        SectionKind::Video => "homepage-section video",
        SectionKind::Footer => "site-footer",
    };

    html! {
        @if section.kind == SectionKind::Footer {
            footer class=(class) {
                @if let Some(heading) = &section.heading { h2 { (heading) } }
                (body)
            }
        } @else {
            section class=(class) {
                @if let Some(heading) = &section.heading { h2 { (heading) } }
                (body)
            }
        }
    }
}

fn video_mime(src: &str) -> Option<&'static str> {
    match src.rsplit_once('.')?.1 {
        "mp4" => Some("video/mp4"),
        "webm" => Some("video/webm"),
        "ogv" => Some("video/ogg"),
        _ => None,
    }
}

fn render_card(record: &ResolvedRecord, ctx: &RenderContext) -> Markup {
    html! {
        div class={ "col " (record.size.class()) } {
            div.card {
                @if let Some(image) = &record.image {
                    div.card-image {
                        img src=(image.select(ctx.mode)) alt=(record.title);
                    }
                }
                div.card-body {
                    h3 { (record.title) }
                    @if !record.description.is_empty() {
                        p { (record.description) }
                    }
                    (render_inline_links(&record.links))
                }
                @if let Some(cta) = &record.link {
                    div.card-footer { (render_cta(cta, "button button--secondary")) }
                }
            }
        }
    }
}

fn render_logo(record: &ResolvedRecord, ctx: &RenderContext) -> Markup {
    let inner = html! {
        @if let Some(image) = &record.image {
            img.logo src=(image.select(ctx.mode)) alt=(record.title) title=(record.title);
        } @else {
            span.logo-text { (record.title) }
        }
    };
    html! {
        @match &record.link {
            Some(cta) if !cta.pending => {
                a.logo-link href=(cta.href) { (inner) }
            }
            _ => {
                div.logo-link { (inner) }
            }
        }
    }
}

fn render_testimonial(record: &ResolvedRecord, ctx: &RenderContext) -> Markup {
    html! {
        div class={ "col " (record.size.class()) } {
            figure.testimonial {
                blockquote { (record.description) }
                figcaption {
                    @if let Some(image) = &record.image {
                        img.avatar src=(image.select(ctx.mode)) alt=(record.title);
                    }
                    span.testimonial-name { (record.title) }
                    @if let Some(subtitle) = &record.subtitle {
                        span.testimonial-title { (subtitle) }
                    }
                }
            }
        }
    }
}

fn render_footer_column(record: &ResolvedRecord, ctx: &RenderContext) -> Markup {
    html! {
        div.footer-column {
            @if let Some(image) = &record.image {
                img.footer-wordmark src=(image.select(ctx.mode)) alt=(record.title);
            } @else {
                h3.footer-title { (record.title) }
            }
            @if !record.description.is_empty() {
                p.footer-text { (record.description) }
            }
            @if !record.links.is_empty() {
                ul.footer-links {
                    @for link in &record.links {
                        li { (render_inline_link(link)) }
                    }
                }
            }
        }
    }
}

fn render_cta(cta: &CallToAction, class: &str) -> Markup {
    html! {
        @if cta.pending {
            span.cta-pending { "Coming soon" }
        } @else {
            a class=(class) href=(cta.href) { (cta.label) }
        }
    }
}

fn render_inline_links(links: &[InlineLink]) -> Markup {
    html! {
        @if !links.is_empty() {
            p.card-links {
                @for (i, link) in links.iter().enumerate() {
                    @if i > 0 { " · " }
                    (render_inline_link(link))
                }
            }
        }
    }
}

fn render_inline_link(link: &InlineLink) -> Markup {
    html! {
        @if link.new_tab {
            a href=(link.url) target="_blank" rel="noopener noreferrer" { (link.text) }
        } @else {
            a href=(link.url) { (link.text) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HOMEPAGE: &str = r##"
[hero]
title = "Mission Planning"
tagline = "Plan and simulate."
link = { href = "/introduction/", label = "Get Started" }

[[sections]]
kind = "cards"
heading = "Features"

[[sections.items]]
title = "Planning"
image = { light = "img/cards/planning-light.png", dark = "img/cards/planning-dark.png" }
size = "col--6"
link = { href = "/planning/", label = "Planning docs" }
description = "Build activity plans."
links = [{ url = "https://example.org/ui", text = "UI", new_tab = true }]

[[sections.items]]
title = "Scheduling"
image = { light = "img/cards/scheduling.png" }
description = "Goal-based scheduling."

[[sections.items]]
title = "Sequencing"
description = "Command expansion."
link = { href = "#", label = "Coming soon", pending = true }

[[sections]]
kind = "logos"

[[sections.items]]
name = "Partner Lab"
image = { light = "img/logos/lab.svg" }
link = { href = "https://example.org" }

[[sections]]
kind = "testimonials"

[[sections.items]]
name = "Jane Doe"
subtitle = "Mission Planner"
description = "It changed how we plan."
"##;

    fn static_dir() -> TempDir {
        let tmp = TempDir::new().unwrap();
        for name in [
            "img/cards/planning-light.png",
            "img/cards/planning-dark.png",
            "img/cards/scheduling.png",
            "img/logos/lab.svg",
        ] {
            let path = tmp.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, name).unwrap();
        }
        tmp
    }

    fn resolved() -> ResolvedHomepage {
        let homepage: Homepage = toml::from_str(HOMEPAGE).unwrap();
        let tmp = static_dir();
        let assets = AssetTable::scan(tmp.path()).unwrap();
        resolve_homepage(&homepage, &assets, &UrlScheme::new("/", None)).unwrap()
    }

    #[test]
    fn parses_records_with_aliases_and_defaults() {
        let homepage: Homepage = toml::from_str(HOMEPAGE).unwrap();
        assert_eq!(homepage.sections.len(), 3);
        let cards = &homepage.sections[0];
        assert_eq!(cards.items[0].size, CardSize::Half);
        assert_eq!(cards.items[1].size, CardSize::Third);
        assert!(cards.items[2].link.as_ref().unwrap().pending);
        // logos use `name`
        assert_eq!(homepage.sections[1].items[0].title, "Partner Lab");
        assert_eq!(homepage.sections[1].items[0].link.as_ref().unwrap().label, "Learn more");
    }

    #[test]
    fn image_ref_selects_by_mode() {
        let both = ImageRef {
            light: "a-light.png".into(),
            dark: Some("a-dark.png".into()),
        };
        assert_eq!(both.select(ColorMode::Light), "a-light.png");
        assert_eq!(both.select(ColorMode::Dark), "a-dark.png");

        let light_only = ImageRef {
            light: "b.png".into(),
            dark: None,
        };
        assert_eq!(light_only.select(ColorMode::Dark), "b.png");
    }

    #[test]
    fn dark_mode_picks_dark_variants() {
        let homepage = resolved();
        let cards = &homepage.sections[0];

        let dark = render_section(cards, &RenderContext::new(ColorMode::Dark)).into_string();
        assert!(dark.contains("planning-dark."));
        assert!(!dark.contains("planning-light."));
        // no dark variant declared: light is used in dark mode
        assert!(dark.contains("scheduling."));

        let light = render_section(cards, &RenderContext::new(ColorMode::Light)).into_string();
        assert!(light.contains("planning-light."));
        assert!(!light.contains("planning-dark."));
    }

    #[test]
    fn rendering_is_idempotent() {
        let homepage = resolved();
        let ctx = RenderContext::new(ColorMode::Dark);
        let first = render_homepage(&homepage, &ctx).into_string();
        let second = render_homepage(&homepage, &ctx).into_string();
        assert_eq!(first, second);
    }

    #[test]
    fn record_without_image_or_link_renders_text_only() {
        let homepage = resolved();
        let html = render_section(&homepage.sections[0], &RenderContext::default()).into_string();
        let sequencing = &html[html.find("Sequencing").unwrap()..];
        let card_end = sequencing.find("</div></div></div>").unwrap_or(sequencing.len());
        assert!(!sequencing[..card_end].contains("<img"));

        let testimonials = render_section(&homepage.sections[2], &RenderContext::default()).into_string();
        assert!(testimonials.contains("Jane Doe"));
        assert!(testimonials.contains("Mission Planner"));
        assert!(!testimonials.contains("<img"));
        assert!(!testimonials.contains("button"));
    }

    #[test]
    fn pending_cta_is_not_a_link() {
        let homepage = resolved();
        let html = render_section(&homepage.sections[0], &RenderContext::default()).into_string();
        assert!(html.contains(r#"<span class="cta-pending">Coming soon</span>"#));
        assert!(!html.contains(r##"href="#""##));
        assert!(html.contains(r#"href="/planning/""#));
    }

    #[test]
    fn links_are_placed_under_base_url() {
        let homepage: Homepage = toml::from_str(HOMEPAGE).unwrap();
        let tmp = static_dir();
        let assets = AssetTable::scan(tmp.path()).unwrap();
        let resolved = resolve_homepage(&homepage, &assets, &UrlScheme::new("/aerie-docs/", None)).unwrap();

        let hero = resolved.hero.as_ref().unwrap();
        assert_eq!(hero.link.as_ref().unwrap().href, "/aerie-docs/introduction/");

        let html = render_homepage(&resolved, &RenderContext::default()).into_string();
        assert!(html.contains(r#"href="/aerie-docs/planning/""#));
        assert!(html.contains(r#"href="https://example.org/ui""#));
        assert!(html.contains(r#"href="https://example.org""#));
        assert!(!html.contains(r#"href="/introduction/""#));
        assert!(html.contains("/aerie-docs/assets/img/cards/planning-light."));
    }

    #[test]
    fn cards_follow_declaration_order_and_size() {
        let homepage = resolved();
        let html = render_section(&homepage.sections[0], &RenderContext::default()).into_string();
        let planning = html.find("Planning").unwrap();
        let scheduling = html.find("Scheduling").unwrap();
        let sequencing = html.find("Sequencing").unwrap();
        assert!(planning < scheduling && scheduling < sequencing);
        assert!(html.contains(r#"class="col col--6""#));
        assert!(html.contains(r#"target="_blank""#));
    }

    #[test]
    fn unknown_asset_fails_resolution() {
        let homepage: Homepage = toml::from_str(
            r#"
[[sections]]
kind = "cards"
[[sections.items]]
title = "Broken"
image = { light = "img/nope.png" }
"#,
        )
        .unwrap();
        let tmp = static_dir();
        let assets = AssetTable::scan(tmp.path()).unwrap();
        let err = resolve_homepage(&homepage, &assets, &UrlScheme::new("/", None)).unwrap_err();
        assert!(matches!(err, AssetError::Unresolved { ref name } if name == "img/nope.png"));
    }

    #[test]
    fn footer_renders_after_main() {
        let homepage: Homepage = toml::from_str(
            r#"
[[sections]]
kind = "footer"
[[sections.items]]
title = "Community"
links = [{ url = "https://example.org/chat", text = "Chat" }]

[[sections]]
kind = "cards"
[[sections.items]]
title = "Card"
"#,
        )
        .unwrap();
        let resolved = resolve_homepage(&homepage, &AssetTable::default(), &UrlScheme::new("/", None)).unwrap();
        let html = render_homepage(&resolved, &RenderContext::default()).into_string();
        assert!(html.find("Card").unwrap() < html.find("Community").unwrap());
        assert!(html.contains("<footer"));
    }

    #[test]
    fn video_section_plays_bundled_asset() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("video")).unwrap();
        fs::write(tmp.path().join("video/promo.mp4"), "frames").unwrap();
        let assets = AssetTable::scan(tmp.path()).unwrap();
        let homepage: Homepage = toml::from_str(
            r#"
[[sections]]
kind = "video"
video = "video/promo.mp4"
"#,
        )
        .unwrap();

        let resolved = resolve_homepage(&homepage, &assets, &UrlScheme::new("/aerie-docs/", None)).unwrap();
        let src = resolved.sections[0].video.clone().unwrap();
        assert!(src.starts_with("/aerie-docs/assets/video/promo."));

        let html = render_homepage(&resolved, &RenderContext::default()).into_string();
        assert!(html.contains(r#"<section class="homepage-section video">"#));
        assert!(html.contains(&format!(r#"<source src="{src}" type="video/mp4">"#)));
        assert!(html.contains("controls"));
    }

    #[test]
    fn video_with_unknown_asset_fails_resolution() {
        let tmp = TempDir::new().unwrap();
        let assets = AssetTable::scan(tmp.path()).unwrap();
        let homepage: Homepage = toml::from_str("[[sections]]\nkind = \"video\"\nvideo = \"video/missing.mp4\"\n").unwrap();
        let result = resolve_homepage(&homepage, &assets, &UrlScheme::new("/", None));
        assert!(matches!(result, Err(AssetError::Unresolved { .. })));
    }

    #[test]
    fn load_homepage_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(load_homepage(tmp.path()).unwrap().is_none());
        fs::write(tmp.path().join(HOMEPAGE_FILE), "sections = []\n").unwrap();
        assert!(load_homepage(tmp.path()).unwrap().is_some());
    }

    #[test]
    fn unknown_record_key_is_rejected() {
        let result: Result<Homepage, _> = toml::from_str(
            "[[sections]]\nkind = \"cards\"\n[[sections.items]]\ntitle = \"x\"\nImgDark = \"y\"\n",
        );
        assert!(result.is_err());
    }
}
