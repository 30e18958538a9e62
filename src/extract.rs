//! HTML extraction for minutes pages.
//!
//! Pulls the title, publication date and body text out of a page. The main
//! content region is found by trying a fixed list of selectors in order and
//! taking the first one that matches:
//!
//! | Priority | Selector          | Meaning                          |
//! |----------|-------------------|----------------------------------|
//! | 1        | `[role='main']`   | Region marked as primary content |
//! | 2        | `.article-body`   | Article body container           |
//! | 3        | `.content`        | Generic content container        |
//! | 4        | `body`            | Whole document body              |
//!
//! Navigation, asides, footers, scripts and styles inside the chosen region
//! are detached from the document tree before any text is collected.

use crate::models::PageContent;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, instrument};

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("valid selector"));
static DATE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("time").expect("valid selector"));
static STRIPPED_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("nav, aside, footer, script, style").expect("valid selector")
});

/// Candidate main-content selectors, highest priority first.
pub const MAIN_REGION_SELECTORS: [&str; 4] = ["[role='main']", ".article-body", ".content", "body"];

static MAIN_REGION_CHAIN: Lazy<Vec<Selector>> = Lazy::new(|| {
    MAIN_REGION_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("valid selector"))
        .collect()
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("document has no content region")]
    NoContentRegion,
}

/// Extract title, date and body text from a page.
///
/// Title and date come from the first `h1` and `time` elements anywhere in
/// the document. Body text is every remaining text node of the main region,
/// trimmed and joined with `\n`.
///
/// # Errors
///
/// [`ExtractError::NoContentRegion`] if none of [`MAIN_REGION_SELECTORS`]
/// match.
#[instrument(level = "debug", skip_all, fields(bytes = html.len()))]
pub fn extract(html: &str) -> Result<PageContent, ExtractError> {
    let mut document = Html::parse_document(html);

    let title = first_text(&document, &TITLE_SELECTOR);
    let date = first_text(&document, &DATE_SELECTOR);

    let main_id = main_region(&document)
        .ok_or(ExtractError::NoContentRegion)?
        .id();

    let stripped: Vec<_> = document
        .tree
        .get(main_id)
        .and_then(ElementRef::wrap)
        .ok_or(ExtractError::NoContentRegion)?
        .select(&STRIPPED_SELECTOR)
        .map(|el| el.id())
        .collect();
    for id in &stripped {
        if let Some(mut node) = document.tree.get_mut(*id) {
            node.detach();
        }
    }

    let main = document
        .tree
        .get(main_id)
        .and_then(ElementRef::wrap)
        .ok_or(ExtractError::NoContentRegion)?;
    let text = joined_text(main, "\n").trim().to_string();

    debug!(
        removed = stripped.len(),
        title_len = title.len(),
        text_len = text.len(),
        "Extracted page"
    );
    Ok(PageContent { title, date, text })
}

/// First element in `document` matched by the main-region chain.
fn main_region(document: &Html) -> Option<ElementRef<'_>> {
    MAIN_REGION_CHAIN
        .iter()
        .find_map(|selector| document.select(selector).next())
}

/// Stripped text of the first element matching `selector`, or empty.
fn first_text(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .map(|el| joined_text(el, ""))
        .unwrap_or_default()
}

/// Text nodes under `element`, each trimmed, empty ones dropped, joined
/// with `separator`.
fn joined_text(element: ElementRef<'_>, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}
