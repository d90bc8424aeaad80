//! Remote snippet loader.
//!
//! Example code that lives in another repository is inlined into documents
//! by a fenced block carrying a `remote=<url>` attribute:
//!
//! ````markdown
//! ```java remote=https://raw.githubusercontent.com/org/repo/main/Example.java title=Example.java
//! ```
//! ````
//!
//! Each snippet is fetched by one worker thread that reports back over an
//! mpsc channel. A snippet moves from [`SnippetState::Loading`] to either
//! `Loaded(text)` or `Failed`, exactly once. Any HTTP response counts as
//! loaded, error statuses included: the response body is what the page
//! shows. Only transport and body-read failures settle as `Failed`, which is
//! silent on the page (the code block renders empty) and logged at debug
//! level. There is no retry and no cancellation; the HTTP agent's timeout
//! bounds each request.

use maud::{Markup, html};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use ureq::Agent;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("unreadable body: {0}")]
    Body(String),
}

/// Lifecycle of one remote snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetState {
    Loading,
    Loaded(String),
    Failed,
}

impl SnippetState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, SnippetState::Loading)
    }

    /// Text shown inside the code block.
    pub fn body(&self) -> &str {
        match self {
            SnippetState::Loading => "Loading...",
            SnippetState::Loaded(text) => text,
            SnippetState::Failed => "",
        }
    }
}

/// Source of snippet text.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches snippets over HTTP(S).
pub struct HttpFetcher {
    agent: Agent,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "remote snippet answered with an error status");
        }

        response
            .into_body()
            .read_to_string()
            .map_err(|e| FetchError::Body(e.to_string()))
    }
}

/// One in-flight or settled snippet fetch.
pub struct RemoteSnippet {
    state: SnippetState,
    rx: Option<Receiver<SnippetState>>,
}

impl RemoteSnippet {
    /// Start fetching `url` on a worker thread.
    pub fn spawn(url: impl Into<String>, fetcher: Arc<dyn Fetcher>) -> Self {
        let url = url.into();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let state = match fetcher.fetch(&url) {
                Ok(text) => SnippetState::Loaded(text),
                Err(e) => {
                    debug!(url = %url, error = %e, "remote snippet fetch failed");
                    SnippetState::Failed
                }
            };
            // Receiver may already be gone; nothing to report to then.
            let _ = tx.send(state);
        });
        Self {
            state: SnippetState::Loading,
            rx: Some(rx),
        }
    }

    /// Current state without blocking.
    pub fn state(&mut self) -> &SnippetState {
        if let Some(rx) = &self.rx {
            match rx.try_recv() {
                Ok(state) => {
                    self.state = state;
                    self.rx = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.state = SnippetState::Failed;
                    self.rx = None;
                }
            }
        }
        &self.state
    }

    /// Block until the fetch settles.
    pub fn wait(mut self) -> SnippetState {
        match self.rx.take() {
            Some(rx) => rx.recv().unwrap_or(SnippetState::Failed),
            None => self.state,
        }
    }
}

/// Fetch every url concurrently and wait for all of them. Results keep the
/// input order.
pub fn load_all(urls: &[String], fetcher: &Arc<dyn Fetcher>) -> Vec<SnippetState> {
    let pending: Vec<RemoteSnippet> = urls
        .iter()
        .map(|url| RemoteSnippet::spawn(url.as_str(), Arc::clone(fetcher)))
        .collect();
    pending.into_iter().map(RemoteSnippet::wait).collect()
}

/// A fenced code block that pulls its body from a url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFence {
    pub language: Option<String>,
    pub url: String,
    pub title: Option<String>,
}

/// Parse a fence info string such as
/// `java remote=https://example.org/A.java title="A.java"`.
///
/// Returns `None` when the info string has no `remote=` attribute.
pub fn parse_remote_info(info: &str) -> Option<RemoteFence> {
    let mut language = None;
    let mut url = None;
    let mut title = None;

    for (i, token) in info_tokens(info).into_iter().enumerate() {
        match token.split_once('=') {
            Some(("remote", value)) => url = Some(value.to_string()),
            Some(("title", value)) => title = Some(value.to_string()),
            Some(_) => {}
            None if i == 0 => language = Some(token),
            None => {}
        }
    }

    url.filter(|u| !u.is_empty()).map(|url| RemoteFence {
        language,
        url,
        title,
    })
}

/// Split an info string on whitespace outside quotes. Quote characters are
/// dropped, so `title="My Example.java"` yields `title=My Example.java`.
fn info_tokens(info: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_token = false;

    for c in info.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}

/// Code block markup for a snippet in any state. Text is escaped.
pub fn render_code_block(language: Option<&str>, title: Option<&str>, state: &SnippetState) -> Markup {
    let class = language.map(|l| format!("language-{l}"));
    html! {
        div.code-block data-state=(state_name(state)) {
            @if let Some(title) = title {
                div.code-block-title { (title) }
            }
            pre {
                code class=[class] { (state.body()) }
            }
        }
    }
}

fn state_name(state: &SnippetState) -> &'static str {
    match state {
        SnippetState::Loading => "loading",
        SnippetState::Loaded(_) => "loaded",
        SnippetState::Failed => "failed",
    }
}
