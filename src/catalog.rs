//! Walks the paginated stock-image catalog.
//!
//! Pages are fetched one after another, never in parallel. A page that fails
//! (bad status, network error, unreadable body) is logged and skipped; the
//! run only gives up at the caller when no page produced any item.

use crate::network::get_url_content;
use crate::options::Cli;
use crate::utils::truncate_message;
use console::style;
use governor::{Quota, RateLimiter};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::num::NonZeroU32;
use url::Url;

/// Title used for images the catalog returns without one.
pub const DEFAULT_TITLE: &str = "Stock Image";

/// Query parameter carrying the 1-based page number.
pub const PAGE_PARAMETER: &str = "search_page";

// region: Structs & Enums
/// One stock image as returned by the catalog API.
///
/// Only `content_id` is required. It may arrive as a JSON number or as a
/// numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogItem {
    #[serde(deserialize_with = "deserialize_content_id")]
    pub content_id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
}

impl CatalogItem {
    /// The title, or [`DEFAULT_TITLE`] when it is missing or empty.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(DEFAULT_TITLE)
    }

    pub fn thumbnail(&self) -> &str {
        self.thumbnail_url.as_deref().unwrap_or_default()
    }

    /// `by <author>`, or an empty string when the author is unknown.
    pub fn caption(&self) -> String {
        match self.author_name.as_deref() {
            Some(author) if !author.is_empty() => format!("by {author}"),
            _ => String::new(),
        }
    }
}

/// The items of one page that passed validation, plus how many did not.
#[derive(Debug, Default, PartialEq)]
pub struct ParsedPage {
    pub items: Vec<CatalogItem>,
    pub rejected: usize,
}

/// What happened when one catalog page was requested.
#[derive(Debug)]
pub enum PageOutcome {
    Items(ParsedPage),
    Status(StatusCode),
    Malformed(String),
    Network(reqwest::Error),
}

/// Where to read the catalog from and how many pages to read.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    pub api_url: Url,
    pub total_pages: u32,
    /// Requests per minute; `None` fetches as fast as the API answers.
    pub rate_limit: Option<u32>,
}

impl CatalogSource {
    pub fn from_options(options: &Cli) -> Self {
        CatalogSource {
            api_url: options.api_url.clone(),
            total_pages: options.pages,
            rate_limit: options.rate_limit,
        }
    }
}

/// Everything gathered while walking the catalog.
#[derive(Debug, Default)]
pub struct CatalogFetch {
    pub items: Vec<CatalogItem>,
    pub pages_fetched: u32,
    pub pages_skipped: u32,
    pub rejected_items: usize,
}

#[derive(Deserialize)]
struct RawPage {
    #[serde(default)]
    items: Option<RawItems>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawItems {
    Keyed(serde_json::Map<String, Value>),
    Listed(Vec<Value>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawContentId {
    Number(u64),
    Text(String),
}
// endregion

// region: Functions
fn deserialize_content_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawContentId::deserialize(deserializer)? {
        RawContentId::Number(id) => Ok(id),
        RawContentId::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid content_id '{text}'"))),
    }
}

/// Validates one catalog response body.
///
/// `items` may be an object (its values are taken in document order) or an
/// array. A missing or `null` `items` field is an empty page. Items that do
/// not validate are counted in [`ParsedPage::rejected`] instead of failing the
/// whole page.
///
/// # Errors
///
/// Returns the `serde_json::Error` when the body is not a JSON object or its
/// `items` field has an unexpected shape.
pub fn parse_page(body: &str) -> Result<ParsedPage, serde_json::Error> {
    let raw: RawPage = serde_json::from_str(body)?;
    let values: Vec<Value> = match raw.items {
        Some(RawItems::Keyed(map)) => map.into_iter().map(|(_, value)| value).collect(),
        Some(RawItems::Listed(list)) => list,
        None => Vec::new(),
    };

    let mut page = ParsedPage::default();
    for value in values {
        match serde_json::from_value::<CatalogItem>(value) {
            Ok(item) => page.items.push(item),
            Err(_) => page.rejected += 1,
        }
    }
    Ok(page)
}

/// The URL of page `page`, keeping any query parameters already on `api_url`.
pub fn page_url(api_url: &Url, page: u32) -> Url {
    let retained: Vec<(String, String)> = api_url
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAMETER)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = api_url.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair(PAGE_PARAMETER, &page.to_string());
    url
}

/// Requests a single catalog page and classifies the result.
pub async fn fetch_page(client: &Client, url: &Url) -> PageOutcome {
    match get_url_content(url, client).await {
        Err(e) => PageOutcome::Network(e),
        Ok(content) if !content.status.is_success() => PageOutcome::Status(content.status),
        Ok(content) => match parse_page(&content.body) {
            Ok(page) => PageOutcome::Items(page),
            Err(e) => PageOutcome::Malformed(e.to_string()),
        },
    }
}

fn warn(progress: &ProgressBar, message: String) {
    progress.suspend(|| eprintln!("{} {}", style("[WARN]").yellow(), message));
}

/// Fetches pages `1..=total_pages` in order and concatenates their items.
///
/// Items keep page order, then in-page order. Duplicates across pages are
/// kept. With `quiet` set the progress bar and per-page lines are hidden;
/// warnings still go to stderr.
pub async fn fetch_all_items(client: &Client, source: &CatalogSource, quiet: bool) -> CatalogFetch {
    let limiter = source
        .rate_limit
        .and_then(NonZeroU32::new)
        .map(|rate| RateLimiter::direct(Quota::per_minute(rate)));

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(source.total_pages as u64)
    };
    progress.set_style(
        ProgressStyle::default_bar()
            .template(concat!(
                "      📥 [{elapsed_precise}] [{bar:40.cyan/blue}]",
                " Page {pos}/{len} {msg}"
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("■┄"),
    );

    let mut fetch = CatalogFetch::default();

    for page in 1..=source.total_pages {
        if let Some(limiter) = &limiter {
            limiter.until_ready().await;
        }

        let url = page_url(&source.api_url, page);
        progress.set_message(truncate_message(url.as_str(), 60));

        match fetch_page(client, &url).await {
            PageOutcome::Items(parsed) => {
                if !quiet {
                    progress.suspend(|| {
                        println!(
                            "  {} Page {}/{}: {} images fetched",
                            style("✓").green(),
                            page,
                            source.total_pages,
                            parsed.items.len()
                        )
                    });
                }
                if parsed.rejected > 0 {
                    warn(
                        &progress,
                        format!(
                            "Page {}: skipped {} invalid items",
                            page, parsed.rejected
                        ),
                    );
                }
                fetch.pages_fetched += 1;
                fetch.rejected_items += parsed.rejected;
                fetch.items.extend(parsed.items);
            }
            PageOutcome::Status(status) => {
                warn(&progress, format!("Failed to fetch page {page}: {status}"));
                fetch.pages_skipped += 1;
            }
            PageOutcome::Malformed(reason) => {
                warn(
                    &progress,
                    format!("Page {page} returned an unreadable body: {reason}"),
                );
                fetch.pages_skipped += 1;
            }
            PageOutcome::Network(e) => {
                warn(&progress, format!("Error fetching page {page}: {e}"));
                fetch.pages_skipped += 1;
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();
    fetch
}
// endregion
