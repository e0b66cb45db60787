pub mod html;
pub mod record;

#[cfg(test)]
mod tests;

use crate::config::AnalyzerConfig;
use crate::results::{ListingRecord, PageSnapshot};
use html::ListingSelectors;
use record::RecordExtractor;
use thiserror::Error;

/// Raw text pulled from one listing, before any parsing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFragment {
    /// Identifier attribute on the listing, when the page provides one
    pub explicit_id: Option<String>,
    /// Text of the price field
    pub price_text: String,
    /// Text of the feature/description field
    pub feature_text: String,
}

impl ListingFragment {
    pub fn new(
        explicit_id: Option<&str>,
        price_text: impl Into<String>,
        feature_text: impl Into<String>,
    ) -> Self {
        Self {
            explicit_id: explicit_id.map(|s| s.to_string()),
            price_text: price_text.into(),
            feature_text: feature_text.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("invalid selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Page parser: locates listings in HTML and turns them into records
#[derive(Debug, Clone)]
pub struct Parser {
    selectors: ListingSelectors,
    extractor: RecordExtractor,
}

impl Parser {
    pub fn new(config: &AnalyzerConfig) -> Result<Self, ParserError> {
        Ok(Self {
            selectors: ListingSelectors::new(&config.selectors)?,
            extractor: RecordExtractor::new(&config.currency_code, &config.area_unit)?,
        })
    }

    /// Parse a rendered page into a snapshot of its listing fragments
    pub fn parse_page(&self, html: &str, page_id: &str) -> PageSnapshot {
        let (category, fragments) = html::parse_document(html, &self.selectors);
        PageSnapshot::new(page_id.to_string(), category, fragments)
    }

    /// Extract valid records from a snapshot, dropping rejected fragments
    pub fn extract_records(&self, snapshot: &PageSnapshot) -> Vec<ListingRecord> {
        self.extractor.extract_all(&snapshot.fragments)
    }
}
