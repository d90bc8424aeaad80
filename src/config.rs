//! Site configuration module.
//!
//! Handles loading, validating, and merging `site.toml`. Stock defaults are
//! serialized to a TOML table and the user's file is merged on top, so a
//! config file only needs the keys it wants to override.
//!
//! ## Configuration Options
//!
//! ```toml
//! title = "Mission Planning Docs"
//! tagline = "A software framework for modeling spacecraft."
//! url = "https://example.github.io"
//! base_url = "/"                  # must start and end with '/'
//! favicon = "img/favicon.ico"     # symbolic name under static/
//! on_broken_links = "throw"       # navigation references are always strict
//! on_broken_markdown_links = "warn"  # throw | warn | ignore
//!
//! [i18n]
//! default_locale = "en"
//! locales = ["en"]
//!
//! [theme]
//! default_mode = "light"          # light | dark
//!
//! [sidebar]
//! auto_collapse_categories = true
//! hideable = true
//!
//! [[navbar.items]]
//! type = "doc"
//! doc_id = "introduction"
//! label = "Docs"
//!
//! [navbar.logo]
//! alt = "Logo"
//! src = "img/wordmark-light.svg"
//! src_dark = "img/wordmark-dark.svg"
//!
//! [colors.light]
//! background = "#ffffff"
//! primary = "#2e8555"
//!
//! [search]                        # opaque, passed through untouched
//! app_id = "..."
//!
//! [snippets]
//! timeout_secs = 10
//! ```
//!
//! Unknown keys are rejected to catch typos early, except inside `[search]`.

use crate::types::ColorMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = "site.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// How a build reacts to a link whose target cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrokenLinkPolicy {
    /// Abort the build.
    Throw,
    /// Log a warning, keep the link as authored.
    Warn,
    /// Keep the link as authored without logging.
    Ignore,
}

/// Site configuration loaded from `site.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub title: String,
    pub tagline: String,
    /// Scheme and host the site is served from.
    pub url: String,
    /// Path prefix of every generated href.
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    pub organization: String,
    pub project: String,
    /// Prefix for "Edit this page" links; the document's source path is appended.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_url: Option<String>,
    pub on_broken_links: BrokenLinkPolicy,
    pub on_broken_markdown_links: BrokenLinkPolicy,
    pub i18n: I18nConfig,
    pub theme: ThemeConfig,
    pub colors: ColorConfig,
    pub sidebar: SidebarConfig,
    pub navbar: NavbarConfig,
    /// Search-index settings. Not interpreted; copied into the build manifest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<toml::Table>,
    pub snippets: SnippetConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Documentation".to_string(),
            tagline: String::new(),
            url: "https://localhost".to_string(),
            base_url: "/".to_string(),
            favicon: None,
            organization: String::new(),
            project: String::new(),
            edit_url: None,
            on_broken_links: BrokenLinkPolicy::Throw,
            on_broken_markdown_links: BrokenLinkPolicy::Warn,
            i18n: I18nConfig::default(),
            theme: ThemeConfig::default(),
            colors: ColorConfig::default(),
            sidebar: SidebarConfig::default(),
            navbar: NavbarConfig::default(),
            search: None,
            snippets: SnippetConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::Validation("title must not be empty".into()));
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "url must start with http:// or https://".into(),
            ));
        }
        if !self.base_url.starts_with('/') || !self.base_url.ends_with('/') {
            return Err(ConfigError::Validation(
                "base_url must start and end with '/'".into(),
            ));
        }
        if self.on_broken_links != BrokenLinkPolicy::Throw {
            return Err(ConfigError::Validation(
                "on_broken_links only supports \"throw\"".into(),
            ));
        }
        if self.i18n.locales.is_empty() {
            return Err(ConfigError::Validation(
                "i18n.locales must not be empty".into(),
            ));
        }
        if !self.i18n.locales.contains(&self.i18n.default_locale) {
            return Err(ConfigError::Validation(format!(
                "i18n.default_locale \"{}\" is not listed in i18n.locales",
                self.i18n.default_locale
            )));
        }
        if self.snippets.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "snippets.timeout_secs must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct I18nConfig {
    pub default_locale: String,
    pub locales: Vec<String>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            locales: vec!["en".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Display mode every page is rendered in.
    pub default_mode: ColorMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SidebarConfig {
    /// Expanding one category collapses its siblings.
    pub auto_collapse_categories: bool,
    /// Readers may hide the sidebar.
    pub hideable: bool,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            auto_collapse_categories: true,
            hideable: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavbarConfig {
    pub items: Vec<NavbarItemConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<LogoConfig>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavbarPosition {
    #[default]
    Left,
    Right,
}

/// One navbar entry as declared in `site.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NavbarItemConfig {
    /// Link to a single document of the current snapshot.
    Doc {
        doc_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default)]
        position: NavbarPosition,
    },
    /// Link to the first document of a navigation root.
    DocSidebar {
        sidebar_id: String,
        label: String,
        #[serde(default)]
        position: NavbarPosition,
    },
    /// Plain href, never resolved.
    Href {
        href: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        aria_label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        class_name: Option<String>,
        #[serde(default)]
        position: NavbarPosition,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogoConfig {
    pub alt: String,
    /// Symbolic asset name of the light-mode logo.
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_dark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnippetConfig {
    /// Upper bound on one remote snippet request.
    pub timeout_secs: u64,
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// Color tokens for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    /// Cards, navbar and sidebar surfaces.
    pub surface: String,
    pub text: String,
    /// Sidebar labels, captions, footer text.
    pub text_muted: String,
    pub border: String,
    /// Accent color: links, active sidebar entry, buttons.
    pub primary: String,
    pub link_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            surface: "#f5f6f7".to_string(),
            text: "#1c1e21".to_string(),
            text_muted: "#606770".to_string(),
            border: "#dadde1".to_string(),
            primary: "#2e8555".to_string(),
            link_hover: "#205d3b".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#1b1b1d".to_string(),
            surface: "#242526".to_string(),
            text: "#e3e3e3".to_string(),
            text_muted: "#a8a8a8".to_string(),
            border: "#444950".to_string(),
            primary: "#25c2a0".to_string(),
            link_hover: "#4fddbf".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely; arrays such as
///   `navbar.items` are replaced, not appended.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `site.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `site.toml`.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `site.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `site.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# docsite configuration
# ======================
# All settings are optional. Values shown below are the defaults.
# Unknown keys cause an error (except inside [search]).

title = "Documentation"
tagline = ""

# Scheme and host the site is served from.
url = "https://localhost"

# Path prefix of every generated href. Must start and end with '/'.
base_url = "/"

# Symbolic name of the favicon under static/.
# favicon = "img/favicon.ico"

organization = ""
project = ""

# Prefix for "Edit this page" links. The document source path is appended.
# edit_url = "https://github.com/org/project/edit/main"

# Dangling navigation references always abort the build.
on_broken_links = "throw"

# Unresolvable markdown cross-links: "throw", "warn" or "ignore".
on_broken_markdown_links = "warn"

[i18n]
default_locale = "en"
locales = ["en"]

# ---------------------------------------------------------------------------
# Theme
# ---------------------------------------------------------------------------
[theme]
# Display mode pages are rendered in: "light" or "dark".
# Selects image variants and the active color tokens.
default_mode = "light"

[sidebar]
auto_collapse_categories = true
hideable = true

# ---------------------------------------------------------------------------
# Navbar
# ---------------------------------------------------------------------------
# [[navbar.items]]
# type = "doc"              # link to one document
# doc_id = "introduction"
# label = "Docs"
# position = "left"
#
# [[navbar.items]]
# type = "doc-sidebar"      # link to the first document of a sidebar root
# sidebar_id = "api"
# label = "API"
#
# [[navbar.items]]
# type = "href"             # plain link, never resolved
# href = "https://github.com/org/project"
# aria_label = "GitHub repository"
# position = "right"
#
# [navbar.logo]
# alt = "Logo"
# src = "img/wordmark-light.svg"
# src_dark = "img/wordmark-dark.svg"
# width = 130

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
surface = "#f5f6f7"
text = "#1c1e21"
text_muted = "#606770"
border = "#dadde1"
primary = "#2e8555"
link_hover = "#205d3b"

[colors.dark]
background = "#1b1b1d"
surface = "#242526"
text = "#e3e3e3"
text_muted = "#a8a8a8"
border = "#444950"
primary = "#25c2a0"
link_hover = "#4fddbf"

# ---------------------------------------------------------------------------
# Search (opaque; copied into build-manifest.json)
# ---------------------------------------------------------------------------
# [search]
# app_id = "..."
# api_key = "..."
# index_name = "..."

# ---------------------------------------------------------------------------
# Remote snippets
# ---------------------------------------------------------------------------
[snippets]
# Upper bound on one remote snippet request, in seconds.
timeout_secs = 10
"##
}

/// Generate CSS custom properties from color config.
///
/// Both schemes are emitted; the `data-theme` attribute on `<html>` selects one.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        "{}\n\n{}",
        scheme_css(":root, [data-theme=\"light\"]", &colors.light),
        scheme_css("[data-theme=\"dark\"]", &colors.dark),
    )
}

fn scheme_css(selector: &str, scheme: &ColorScheme) -> String {
    format!(
        r#"{selector} {{
    --color-bg: {background};
    --color-surface: {surface};
    --color-text: {text};
    --color-text-muted: {text_muted};
    --color-border: {border};
    --color-primary: {primary};
    --color-link-hover: {link_hover};
}}"#,
        background = scheme.background,
        surface = scheme.surface,
        text = scheme.text,
        text_muted = scheme.text_muted,
        border = scheme.border,
        primary = scheme.primary,
        link_hover = scheme.link_hover,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_validates() {
        SiteConfig::default().validate().unwrap();
    }

    #[test]
    fn default_link_policies() {
        let config = SiteConfig::default();
        assert_eq!(config.on_broken_links, BrokenLinkPolicy::Throw);
        assert_eq!(config.on_broken_markdown_links, BrokenLinkPolicy::Warn);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
title = "Mission Docs"

[colors.light]
primary = "#123456"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.title, "Mission Docs");
        assert_eq!(config.colors.light.primary, "#123456");
        // Defaults preserved
        assert_eq!(config.colors.light.background, "#ffffff");
        assert_eq!(config.base_url, "/");
        assert_eq!(config.i18n.locales, vec!["en"]);
    }

    #[test]
    fn parse_navbar_items() {
        let toml = r#"
[[navbar.items]]
type = "doc"
doc_id = "introduction"
label = "Docs"

[[navbar.items]]
type = "doc-sidebar"
sidebar_id = "testReport"
label = "Test Report"

[[navbar.items]]
type = "href"
href = "https://github.com/example/project"
aria_label = "GitHub repository"
position = "right"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.navbar.items.len(), 3);
        assert_eq!(
            config.navbar.items[0],
            NavbarItemConfig::Doc {
                doc_id: "introduction".into(),
                label: Some("Docs".into()),
                position: NavbarPosition::Left,
            }
        );
        assert!(matches!(
            &config.navbar.items[1],
            NavbarItemConfig::DocSidebar { sidebar_id, .. } if sidebar_id == "testReport"
        ));
        assert!(matches!(
            &config.navbar.items[2],
            NavbarItemConfig::Href { position: NavbarPosition::Right, .. }
        ));
    }

    #[test]
    fn search_table_is_opaque() {
        let toml = r#"
[search]
app_id = "ABC"
nested = { anything = [1, 2, 3] }
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        let search = config.search.unwrap();
        assert_eq!(search["app_id"].as_str(), Some("ABC"));
        assert!(search.contains_key("nested"));
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.title, "Documentation");
        assert_eq!(config.theme.default_mode, ColorMode::Light);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
title = "Aerie-style Docs"
base_url = "/mission-docs/"

[theme]
default_mode = "dark"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.title, "Aerie-style Docs");
        assert_eq!(config.base_url, "/mission-docs/");
        assert_eq!(config.theme.default_mode, ColorMode::Dark);
        assert!(config.sidebar.hideable);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "titel = \"typo\"\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn unknown_nested_key_rejected() {
        let toml = r#"
[sidebar]
hidable = true
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn base_url_must_be_slash_delimited() {
        let mut config = SiteConfig::default();
        config.base_url = "docs/".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.base_url = "/docs".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.base_url = "/docs/".into();
        config.validate().unwrap();
    }

    #[test]
    fn url_must_have_scheme() {
        let mut config = SiteConfig::default();
        config.url = "example.com".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn broken_links_must_throw() {
        let mut config = SiteConfig::default();
        config.on_broken_links = BrokenLinkPolicy::Warn;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("on_broken_links"));
    }

    #[test]
    fn default_locale_must_be_listed() {
        let mut config = SiteConfig::default();
        config.i18n.default_locale = "fr".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fr"));
    }

    #[test]
    fn validation_runs_after_merge() {
        let overlay: toml::Value = toml::from_str("base_url = \"nope\"").unwrap();
        let result = resolve_config(stock_defaults_value(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_replaces_arrays() {
        let base: toml::Value = toml::from_str("[i18n]\nlocales = [\"en\", \"fr\"]").unwrap();
        let overlay: toml::Value = toml::from_str("[i18n]\nlocales = [\"de\"]").unwrap();
        let merged = merge_toml(base, overlay);
        let locales = merged["i18n"]["locales"].as_array().unwrap();
        assert_eq!(locales.len(), 1);
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str("[colors.dark]\nprimary = \"#ff0000\"").unwrap();
        let config: SiteConfig = merge_toml(base, overlay).try_into().unwrap();
        assert_eq!(config.colors.dark.primary, "#ff0000");
        assert_eq!(config.colors.dark.background, "#1b1b1d");
        assert_eq!(config.colors.light.primary, "#2e8555");
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        config.validate().unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.title, defaults.title);
        assert_eq!(config.colors.dark.primary, defaults.colors.dark.primary);
        assert_eq!(config.snippets.timeout_secs, defaults.snippets.timeout_secs);
    }

    #[test]
    fn color_css_has_both_schemes() {
        let css = generate_color_css(&ColorConfig::default());
        assert!(css.contains("[data-theme=\"light\"]"));
        assert!(css.contains("[data-theme=\"dark\"]"));
        assert!(css.contains("--color-primary: #2e8555"));
        assert!(css.contains("--color-primary: #25c2a0"));
    }
}
