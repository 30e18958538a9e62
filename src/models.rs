//! Data models for scraped minutes pages and the assembled result table.
//!
//! This module defines the core data structures passed between pipeline stages:
//! - [`PageAddress`]: Canonical locator of a single minutes page
//! - [`RawDocument`]: Outcome of a fetch, either page content or absent
//! - [`PageContent`]: Title, date and body text pulled out of a page
//! - [`MinutesRecord`]: One extracted page plus its year/month/url metadata
//! - [`MinutesTable`]: Ordered collection of records, one row per page found

use serde::Serialize;
use std::fmt;

/// Address of a single minutes page.
///
/// Built by [`crate::address::build_address`]; the same (year, month) pair
/// always produces the same address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PageAddress(String);

impl PageAddress {
    pub(crate) fn new(address: String) -> Self {
        Self(address)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Result of fetching one page.
///
/// Not-found responses, other HTTP errors and transport failures all
/// collapse into [`RawDocument::Absent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDocument {
    /// The response body of a successful request.
    Content(String),
    /// No usable content for this page.
    Absent,
}

impl RawDocument {
    pub fn is_absent(&self) -> bool {
        matches!(self, RawDocument::Absent)
    }

    /// Consume the document, returning the body if there was one.
    pub fn into_content(self) -> Option<String> {
        match self {
            RawDocument::Content(html) => Some(html),
            RawDocument::Absent => None,
        }
    }
}

/// Fields pulled out of a single page by the extractor.
///
/// Metadata (year, month, url) is attached later by the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    /// Text of the first `h1`, or empty.
    pub title: String,
    /// Text of the first `time` element as published, or empty.
    pub date: String,
    /// Newline-joined body text of the main content region.
    pub text: String,
}

/// One row of the result table.
///
/// Field order matches the column order of [`MinutesTable::COLUMNS`], which
/// is also the order `serde` serializes them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinutesRecord {
    /// Page heading.
    pub title: String,
    /// Publication date, free-form as printed on the page.
    pub date: String,
    /// Body text with whitespace collapsed.
    pub text: String,
    /// Year of the meeting the page was requested for.
    pub year: i32,
    /// Lowercase English month name.
    pub month: String,
    /// Address the page was fetched from.
    pub url: PageAddress,
}

impl MinutesRecord {
    pub fn new(content: PageContent, year: i32, month: String, url: PageAddress) -> Self {
        Self {
            title: content.title,
            date: content.date,
            text: content.text,
            year,
            month,
            url,
        }
    }
}

/// Ordered collection of [`MinutesRecord`] rows.
///
/// Rows follow the traversal order of the (year, month) grid. An empty table
/// carries no rows and, when written out, no header either.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MinutesTable {
    rows: Vec<MinutesRecord>,
}

impl MinutesTable {
    /// Column names in output order.
    pub const COLUMNS: [&'static str; 6] = ["title", "date", "text", "year", "month", "url"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: MinutesRecord) {
        self.rows.push(record);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[MinutesRecord] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MinutesRecord> {
        self.rows.iter()
    }

    pub(crate) fn rows_mut(&mut self) -> std::slice::IterMut<'_, MinutesRecord> {
        self.rows.iter_mut()
    }

    pub fn into_rows(self) -> Vec<MinutesRecord> {
        self.rows
    }
}

impl From<Vec<MinutesRecord>> for MinutesTable {
    fn from(rows: Vec<MinutesRecord>) -> Self {
        Self { rows }
    }
}

impl IntoIterator for MinutesTable {
    type Item = MinutesRecord;
    type IntoIter = std::vec::IntoIter<MinutesRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a MinutesTable {
    type Item = &'a MinutesRecord;
    type IntoIter = std::slice::Iter<'a, MinutesRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, month: &str) -> MinutesRecord {
        MinutesRecord::new(
            PageContent {
                title: "Monetary Policy Summary".to_string(),
                date: "2 February 2023".to_string(),
                text: "Bank Rate increased".to_string(),
            },
            year,
            month.to_string(),
            PageAddress::new(format!("https://example.com/{year}/{month}-{year}")),
        )
    }

    #[test]
    fn test_raw_document_into_content() {
        let doc = RawDocument::Content("<html></html>".to_string());
        assert!(!doc.is_absent());
        assert_eq!(doc.into_content().as_deref(), Some("<html></html>"));
        assert!(RawDocument::Absent.is_absent());
        assert_eq!(RawDocument::Absent.into_content(), None);
    }

    #[test]
    fn test_table_preserves_insertion_order() {
        let mut table = MinutesTable::new();
        table.push(record(2022, "december"));
        table.push(record(2023, "february"));

        assert_eq!(table.len(), 2);
        let months: Vec<_> = table.iter().map(|r| r.month.as_str()).collect();
        assert_eq!(months, vec!["december", "february"]);
    }

    #[test]
    fn test_record_serializes_columns_in_order() {
        let json = serde_json::to_string(&record(2023, "february")).unwrap();
        let positions: Vec<usize> = MinutesTable::COLUMNS
            .iter()
            .map(|c| json.find(&format!("\"{c}\"")).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
        assert!(json.contains("\"url\":\"https://example.com/2023/february-2023\""));
    }

    #[test]
    fn test_empty_table_serializes_to_empty_array() {
        let table = MinutesTable::new();
        assert!(table.is_empty());
        assert_eq!(serde_json::to_string(&table).unwrap(), "[]");
    }
}
