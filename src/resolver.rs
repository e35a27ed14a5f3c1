use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use url::Url;

use crate::error::AnalyzerError;
use crate::settings::Settings;

/// Tags likely to wrap the main article body, scanned in this order. The
/// first one present in the document wins, whatever it contains.
const CONTENT_TAGS: [&str; 4] = ["article", "div", "main", "section"];

#[derive(Debug, Clone)]
pub enum ResolvedSource {
    Text,
    Url(String),
}

#[derive(Debug, Clone)]
pub struct ResolvedContent {
    pub text: String,
    pub source: ResolvedSource,
}

/// Treats the input as a URL only when it parses and carries a host; a bare
/// scheme (`mailto:...`) or plain prose falls through to the text branch.
pub fn classify(input: &str) -> Option<Url> {
    let url = Url::parse(input).ok()?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Some(url),
        _ => None,
    }
}

/// Resolves the user input to plain text. The text branch passes the input
/// through verbatim; the URL branch issues exactly one GET and scrapes the
/// page for a main content block.
pub async fn resolve(input: &str, settings: &Settings) -> Result<ResolvedContent, AnalyzerError> {
    let Some(url) = classify(input) else {
        return Ok(ResolvedContent {
            text: input.to_string(),
            source: ResolvedSource::Text,
        });
    };

    tracing::info!(url = %url, "fetching page content");
    let html = fetch_page(&url, settings)
        .await
        .map_err(AnalyzerError::Fetch)?;
    let text = extract_main_content(&html).ok_or(AnalyzerError::Extraction)?;
    Ok(ResolvedContent {
        text,
        source: ResolvedSource::Url(url.to_string()),
    })
}

async fn fetch_page(url: &Url, settings: &Settings) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.fetch_timeout_secs))
        .user_agent(settings.fetch_user_agent.clone())
        .build()
        .with_context(|| "failed to build fetch client")?;
    let response = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("request to {} failed", url))?;
    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!("unexpected status {} from {}", status, url));
    }
    response
        .text()
        .await
        .with_context(|| format!("failed to read body from {}", url))
}

/// Best-effort article extraction: the first candidate tag present decides
/// the result, even when a later tag would have carried more text. `None`
/// when no candidate exists or the winning element has no text at all.
pub fn extract_main_content(html: &str) -> Option<String> {
    use kuchiki::traits::*;

    let document = kuchiki::parse_html().one(html);
    for tag in CONTENT_TAGS {
        let Ok(element) = document.select_first(tag) else {
            continue;
        };
        let text = stripped_text(element.as_node());
        if text.is_empty() {
            return None;
        }
        return Some(text);
    }
    None
}

fn stripped_text(node: &kuchiki::NodeRef) -> String {
    use kuchiki::iter::NodeIterator;

    let mut output = String::new();
    for text in node.descendants().text_nodes() {
        output.push_str(text.borrow().trim());
    }
    output
}
