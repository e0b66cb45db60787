use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// CSS selectors used to locate listing data inside a rendered page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Selector matching one element per listing card
    #[serde(default = "default_card_selector")]
    pub card: String,

    /// Selector (relative to the card) for the price text
    #[serde(default = "default_price_selector")]
    pub price: String,

    /// Selector (relative to the card) for the feature/description text
    #[serde(default = "default_features_selector")]
    pub features: String,

    /// Attribute on the card holding its stable identifier
    #[serde(default = "default_id_attribute")]
    pub id_attribute: String,

    /// Selector for the element naming the listing category
    #[serde(default = "default_category_selector")]
    pub category: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            card: default_card_selector(),
            price: default_price_selector(),
            features: default_features_selector(),
            id_attribute: default_id_attribute(),
            category: default_category_selector(),
        }
    }
}

/// Configuration for the listing analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Currency code that prefixes every accepted price (e.g. "USD")
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    /// Unit symbol following the area figure in the feature text
    #[serde(default = "default_area_unit")]
    pub area_unit: String,

    /// Number of histogram bins used for the modal price estimate
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,

    /// Initial area quantity for the unit calculator
    #[serde(default = "default_area_quantity")]
    pub default_area_quantity: f64,

    /// Interval between page identifier checks
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Wait after a detected page change before extracting
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Lifetime of transient notices
    #[serde(default = "default_notification_secs")]
    pub notification_secs: u64,

    /// Key under which the session blob is stored
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Thousands separator used when displaying currency values
    #[serde(default = "default_grouping_separator")]
    pub grouping_separator: String,

    /// Category label used when the page does not name one
    #[serde(default = "default_category")]
    pub default_category: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Selectors for locating listings
    #[serde(default)]
    pub selectors: SelectorConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            currency_code: default_currency_code(),
            area_unit: default_area_unit(),
            histogram_bins: default_histogram_bins(),
            default_area_quantity: default_area_quantity(),
            poll_interval_ms: default_poll_interval_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            notification_secs: default_notification_secs(),
            storage_key: default_storage_key(),
            grouping_separator: default_grouping_separator(),
            default_category: default_category(),
            webdriver_url: default_webdriver_url(),
            selectors: SelectorConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        if config.histogram_bins == 0 {
            return Err("histogram_bins must be at least 1".into());
        }
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }
}

fn default_card_selector() -> String {
    r#"[data-qa="posting PROPERTY"]"#.to_string()
}

fn default_price_selector() -> String {
    r#"[data-qa="POSTING_CARD_PRICE"]"#.to_string()
}

fn default_features_selector() -> String {
    r#"[data-qa="POSTING_CARD_FEATURES"]"#.to_string()
}

fn default_id_attribute() -> String {
    "data-id".to_string()
}

fn default_category_selector() -> String {
    r#"h1, .breadcrumb, [data-qa="breadcrumb"]"#.to_string()
}

fn default_currency_code() -> String {
    "USD".to_string()
}

fn default_area_unit() -> String {
    "m²".to_string()
}

fn default_histogram_bins() -> usize {
    10
}

fn default_area_quantity() -> f64 {
    60.0
}

/// Default value for poll_interval_ms
fn default_poll_interval_ms() -> u64 {
    500
}

/// Default value for settle_delay_ms
fn default_settle_delay_ms() -> u64 {
    500
}

fn default_notification_secs() -> u64 {
    3
}

fn default_storage_key() -> String {
    "zonaprop_analyzer_data".to_string()
}

/// es-AR groups thousands with a dot
fn default_grouping_separator() -> String {
    ".".to_string()
}

fn default_category() -> String {
    "Propiedades".to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = AnalyzerConfig::from_json("{}").unwrap();
        assert_eq!(config.currency_code, "USD");
        assert_eq!(config.histogram_bins, 10);
        assert_eq!(config.default_area_quantity, 60.0);
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.notification_duration(), Duration::from_secs(3));
        assert_eq!(config.selectors.id_attribute, "data-id");
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{"currency_code": "EUR", "selectors": {"card": ".listing"}}"#;
        let config = AnalyzerConfig::from_json(json).unwrap();
        assert_eq!(config.currency_code, "EUR");
        assert_eq!(config.selectors.card, ".listing");
        assert_eq!(config.selectors.price, default_price_selector());
    }

    #[test]
    fn test_zero_bins_rejected() {
        assert!(AnalyzerConfig::from_json(r#"{"histogram_bins": 0}"#).is_err());
    }
}
