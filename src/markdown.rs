//! Markdown to HTML for document pages.
//!
//! On top of plain CommonMark rendering this does two things:
//!
//! - **Cross-links**: a relative link to another markdown file
//!   (`../planning/snapshots.md#restore`) is resolved against the linking
//!   document's directory and rewritten to the target page href. A link whose
//!   target is not in the corpus follows `on_broken_markdown_links`.
//!   Site-absolute links (`/introduction/#fast-track`) are placed under the
//!   base URL.
//! - **Remote fences**: fenced blocks with a `remote=<url>` attribute are
//!   replaced by the fetched snippet. Every snippet of a document is fetched
//!   concurrently and awaited before the HTML is returned.

use crate::config::BrokenLinkPolicy;
use crate::corpus::Corpus;
use crate::naming;
use crate::snippet::{self, Fetcher, RemoteFence, SnippetState};
use crate::types::{DocId, UrlScheme};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html as md_html};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum MarkdownError {
    #[error("Broken link in \"{doc}\": \"{target}\" does not resolve to a document")]
    BrokenLink { doc: DocId, target: String },
}

/// Everything needed to render one document body.
pub struct MarkdownContext<'a> {
    pub doc_id: &'a DocId,
    pub corpus: &'a Corpus,
    pub urls: &'a UrlScheme,
    pub on_broken_links: BrokenLinkPolicy,
    /// `None` skips fetching; remote blocks render empty.
    pub fetcher: Option<&'a Arc<dyn Fetcher>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedMarkdown {
    pub html: String,
    /// Cross-links left as authored because their target is missing.
    pub broken_links: Vec<String>,
    pub remote_snippets: usize,
}

pub fn render_markdown(body: &str, ctx: &MarkdownContext<'_>) -> Result<RenderedMarkdown, MarkdownError> {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let mut events: Vec<Event<'_>> = Vec::new();
    let mut fences: Vec<(usize, RemoteFence)> = Vec::new();
    let mut broken_links = Vec::new();
    let mut in_remote_fence = false;

    for event in Parser::new_ext(body, options) {
        match event {
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => {
                let dest_url = match rewrite_link(&dest_url, ctx)? {
                    LinkTarget::Resolved(href) => CowStr::from(href),
                    LinkTarget::Broken => {
                        broken_links.push(dest_url.to_string());
                        dest_url
                    }
                    LinkTarget::Untouched => dest_url,
                };
                events.push(Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                }));
            }
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                match snippet::parse_remote_info(&info) {
                    Some(fence) => {
                        in_remote_fence = true;
                        fences.push((events.len(), fence));
                        events.push(Event::Html(CowStr::Borrowed("")));
                    }
                    None => events.push(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info)))),
                }
            }
            Event::End(TagEnd::CodeBlock) if in_remote_fence => in_remote_fence = false,
            // inline body of a remote fence is replaced by the fetched text
            _ if in_remote_fence => {}
            other => events.push(other),
        }
    }

    let states = match ctx.fetcher {
        Some(fetcher) => {
            let urls: Vec<String> = fences.iter().map(|(_, f)| f.url.clone()).collect();
            snippet::load_all(&urls, fetcher)
        }
        None => vec![SnippetState::Failed; fences.len()],
    };
    for ((idx, fence), state) in fences.iter().zip(&states) {
        let block = snippet::render_code_block(fence.language.as_deref(), fence.title.as_deref(), state);
        events[*idx] = Event::Html(CowStr::from(block.into_string()));
    }

    let mut html = String::with_capacity(body.len() * 3 / 2);
    md_html::push_html(&mut html, events.into_iter());

    Ok(RenderedMarkdown {
        html,
        broken_links,
        remote_snippets: fences.len(),
    })
}

enum LinkTarget {
    Resolved(String),
    Broken,
    Untouched,
}

fn rewrite_link(dest: &str, ctx: &MarkdownContext<'_>) -> Result<LinkTarget, MarkdownError> {
    if dest.starts_with('/') && !dest.starts_with("//") {
        return Ok(LinkTarget::Resolved(ctx.urls.link_href(dest)));
    }
    if is_absolute(dest) {
        return Ok(LinkTarget::Untouched);
    }
    let (path, fragment) = match dest.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (dest, None),
    };
    let Some(stem) = path.strip_suffix(".mdx").or_else(|| path.strip_suffix(".md")) else {
        return Ok(LinkTarget::Untouched);
    };

    let resolved = resolve_relative(ctx.doc_id.parent(), stem).filter(|id| ctx.corpus.contains(id));
    if let Some(id) = resolved {
        let mut href = ctx.urls.doc_href(&DocId::new(id));
        if let Some(fragment) = fragment {
            href.push('#');
            href.push_str(fragment);
        }
        return Ok(LinkTarget::Resolved(href));
    }

    match ctx.on_broken_links {
        BrokenLinkPolicy::Throw => Err(MarkdownError::BrokenLink {
            doc: ctx.doc_id.clone(),
            target: dest.to_string(),
        }),
        BrokenLinkPolicy::Warn => {
            warn!(doc = %ctx.doc_id, target = dest, "broken markdown link");
            Ok(LinkTarget::Broken)
        }
        BrokenLinkPolicy::Ignore => Ok(LinkTarget::Broken),
    }
}

fn is_absolute(dest: &str) -> bool {
    dest.is_empty() || dest.starts_with('/') || dest.starts_with('#') || dest.contains(':')
}

/// Resolve `stem` against `base_dir`, both `/`-separated. Returns `None` if
/// `..` climbs above the docs root.
fn resolve_relative(base_dir: &str, stem: &str) -> Option<String> {
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for part in stem.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    Some(naming::doc_id_from_segments(segments))
}
