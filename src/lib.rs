//! # Docsite
//!
//! A static documentation site generator. A site is a directory of markdown
//! documents plus three declarative files: `site.toml` (navbar, theme,
//! snippets), `sidebars.toml` (navigation roots), and an optional
//! `homepage.toml` (hero and homepage sections).
//!
//! # Architecture: Load, Resolve, Render
//!
//! ```text
//! 1. Load      site/      →  Site             (config, corpus, sidebars, homepage, assets)
//! 2. Resolve   Site       →  resolved site    (sidebar trees, navbar links, asset urls)
//! 3. Render    resolved   →  build/           (HTML pages, stylesheet, assets, manifest)
//! ```
//!
//! Every fatal check happens in stages 1 and 2, before anything is written:
//! a sidebar reference to a missing document, a duplicate within one root, a
//! navbar item pointing at an unknown root, or a homepage image name that is
//! not in the asset table. `docsite check` runs the same stages and stops.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `site.toml` loading over stock defaults, validation, color CSS |
//! | [`types`] | Document ids, light/dark mode, and the url scheme shared by every page |
//! | [`naming`] | Ordering-prefix stripping, document ids from paths, display titles |
//! | [`corpus`] | Markdown documents keyed by id, read from `docs/` |
//! | [`nav`] | Navigation roots: parsing, validation, and resolved sidebar trees |
//! | [`navbar`] | Top navbar items and the light/dark logo |
//! | [`content`] | Declarative homepage content and its rendering |
//! | [`assets`] | Static asset table: name → fingerprinted output url |
//! | [`markdown`] | Document bodies: cross-link rewriting and remote fences |
//! | [`snippet`] | Remote snippet loader with loading/loaded/failed states |
//! | [`generate`] | Site loading, `check`, and `build` |
//! | [`output`] | CLI output formatting for `nav`, `check`, and `build` |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Malformed markup
//! is a compile error and every interpolation is escaped, which matters here
//! because remote snippets are untrusted text.
//!
//! ## One Theme Flag
//!
//! Pages are rendered for one color mode, chosen by `theme.default_mode`.
//! Components that have light and dark variants (the navbar logo, card
//! images) receive a [`content::RenderContext`] and pick one; they never read
//! global state.
//!
//! ## Ids Are Paths
//!
//! A document's id is its path under `docs/` without extension and with
//! ordering prefixes stripped, so `docs/02-planning/snapshots.md` is
//! `planning/snapshots`. Sidebars, navbar items, and cross-links all refer to
//! documents by id, and ids map one-to-one onto page urls.

pub mod assets;
pub mod config;
pub mod content;
pub mod corpus;
pub mod generate;
pub mod markdown;
pub mod naming;
pub mod nav;
pub mod navbar;
pub mod output;
pub mod snippet;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
