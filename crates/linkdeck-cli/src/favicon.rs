//! Favicon resolution
//!
//! Fetches a bookmark's page and extracts its favicon URL, plus the page
//! title as a fallback when the user didn't provide one.

use anyhow::Result;
use scraper::{Html, Selector};
use std::time::Duration;

use linkdeck_core::PLACEHOLDER_ICON;

/// Details extracted from a bookmark's page
#[derive(Debug, Clone)]
pub struct PageInfo {
    pub title: Option<String>,
    pub favicon: String,
}

impl Default for PageInfo {
    fn default() -> Self {
        Self {
            title: None,
            favicon: PLACEHOLDER_ICON.to_string(),
        }
    }
}

/// Fetch timeout in seconds
const FETCH_TIMEOUT: u64 = 10;

/// Fetch favicon and title for a URL (async)
///
/// Returns the placeholder icon on failure (graceful degradation).
pub async fn fetch_page_info(url: &str) -> PageInfo {
    if !url.starts_with("http") {
        return PageInfo::default();
    }

    fetch_page_info_inner(url).await.unwrap_or_default()
}

/// Inner fetch function that can fail
async fn fetch_page_info_inner(url: &str) -> Result<PageInfo> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT))
        .user_agent("Mozilla/5.0 (compatible; linkdeck/1.0)")
        .build()?;

    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Ok(PageInfo::default());
    }

    // Redirects may land on a different origin; icon hrefs resolve
    // against the final URL, not the requested one.
    let base = response.url().clone();
    let html = response.text().await?;

    Ok(parse_page_info(&html, &base))
}

/// Parse title and favicon from HTML content
fn parse_page_info(html: &str, base: &reqwest::Url) -> PageInfo {
    let document = Html::parse_document(html);

    PageInfo {
        title: extract_title(&document),
        favicon: extract_favicon(&document, base),
    }
}

/// Extract the page title
fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extract the favicon URL, resolved to an absolute URL
///
/// Takes the first icon `<link>` in document order. Falls back to
/// /favicon.ico at the site root, then the bundled placeholder.
fn extract_favicon(document: &Html, base: &reqwest::Url) -> String {
    if let Some(href) = extract_icon_href(document) {
        if let Ok(resolved) = base.join(&href) {
            return resolved.to_string();
        }
    }

    if let Ok(fallback) = base.join("/favicon.ico") {
        return fallback.to_string();
    }

    PLACEHOLDER_ICON.to_string()
}

/// Find the first icon link href in the document
fn extract_icon_href(document: &Html) -> Option<String> {
    // rel is a space-separated token list; ~= matches "icon" inside
    // "shortcut icon" as well
    for selector_str in [r#"link[rel~="icon"]"#, r#"link[rel="apple-touch-icon"]"#] {
        let selector = Selector::parse(selector_str).ok()?;
        let href = document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("href"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if href.is_some() {
            return href;
        }
    }

    None
}
