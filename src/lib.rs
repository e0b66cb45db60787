// Re-export modules
pub mod config;
pub mod dataset;
pub mod input;
pub mod panel;
pub mod parsers;
pub mod present;
pub mod results;
pub mod session;
pub mod sources;
pub mod stats;
pub mod store;
pub mod utils;
pub mod watch;

// Re-export commonly used types for convenience
pub use results::ListingRecord;
pub use session::{Command, Coordinator};
pub use stats::StatisticsSummary;

use std::path::PathBuf;
use store::{FileStore, MemoryStore, SessionStore};
use tokio::sync::mpsc;

/// Where the listings come from
#[derive(Debug, Clone)]
pub enum SourceType {
    /// A live page driven through WebDriver, watched for navigation
    Web(String),
    /// A saved HTML document, analyzed once
    File(String),
}

impl SourceType {
    /// Whether the source keeps being watched and takes user commands
    pub fn is_watched(&self) -> bool {
        matches!(self, SourceType::Web(_))
    }
}

/// Main builder for analyzing listing pages
pub struct Analyzer {
    source: SourceType,
    config: config::AnalyzerConfig,
    state_dir: Option<PathBuf>,
}

impl Analyzer {
    /// Create a new Analyzer builder for the given source
    pub fn new(source: SourceType) -> Self {
        Self {
            source,
            config: config::AnalyzerConfig::default(),
            state_dir: None,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: config::AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = config::AnalyzerConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a string
    pub fn with_config_str(self, config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config = config::AnalyzerConfig::from_json(config_str)?;
        Ok(self.with_config(config))
    }

    /// Set the number of histogram bins (at least 1)
    pub fn with_bins(mut self, bins: usize) -> Self {
        self.config.histogram_bins = bins.max(1);
        self
    }

    /// Set the initial area quantity of the unit calculator
    pub fn with_area_quantity(mut self, quantity: f64) -> Self {
        self.config.default_area_quantity = quantity;
        self
    }

    /// Set how often the page identifier is checked
    pub fn with_poll_interval_ms(mut self, millis: u64) -> Self {
        self.config.poll_interval_ms = millis;
        self
    }

    /// Set the wait between a detected page change and extraction
    pub fn with_settle_delay_ms(mut self, millis: u64) -> Self {
        self.config.settle_delay_ms = millis;
        self
    }

    /// Persist the session in this directory instead of in memory
    pub fn with_state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.state_dir = Some(dir.into());
        self
    }

    pub fn config(&self) -> &config::AnalyzerConfig {
        &self.config
    }

    fn session_store(&self) -> Box<dyn SessionStore> {
        match &self.state_dir {
            Some(dir) => Box::new(FileStore::new(dir)),
            None => Box::new(MemoryStore::new()),
        }
    }

    /// Analyze the source, printing to the terminal. Web sources keep watching
    /// for navigation and handle `commands` until told to stop.
    pub async fn run(
        self,
        commands: mpsc::Receiver<Command>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let store = self.session_store();
        let panel = panel::TerminalPanel::stdout();

        match self.source {
            SourceType::Web(ref url) => {
                let mut config = self.config.clone();

                // Override the WebDriver URL with an environment variable if provided
                if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
                    if !webdriver_url.is_empty() {
                        config.webdriver_url = webdriver_url;
                    }
                }

                let page = sources::WebPage::connect(&config.webdriver_url).await?;
                page.open(url).await?;

                let mut coordinator = Coordinator::new(config, page, store, panel)?;
                let result = coordinator.run(commands).await;
                coordinator.into_source().close().await;
                result?;
            }
            SourceType::File(ref path) => {
                let page = sources::StaticPage::from_file(path)?;
                let mut coordinator = Coordinator::new(self.config.clone(), page, store, panel)?;
                coordinator.initialize().await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let analyzer = Analyzer::new(SourceType::File("page.html".to_string()))
            .with_config_str(r#"{"currency_code": "EUR"}"#)
            .unwrap()
            .with_bins(0)
            .with_area_quantity(45.0)
            .with_poll_interval_ms(250)
            .with_settle_delay_ms(100);

        let config = analyzer.config();
        assert_eq!(config.currency_code, "EUR");
        assert_eq!(config.histogram_bins, 1);
        assert_eq!(config.default_area_quantity, 45.0);
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.settle_delay_ms, 100);
    }

    #[test]
    fn test_only_web_sources_are_watched() {
        assert!(SourceType::Web("https://example.com".to_string()).is_watched());
        assert!(!SourceType::File("page.html".to_string()).is_watched());
    }

    #[tokio::test]
    async fn test_run_file_source() {
        let path = std::env::temp_dir().join(format!("listing-stats-page-{}.html", std::process::id()));
        std::fs::write(
            &path,
            r#"<h1>Casas</h1><div data-qa="posting PROPERTY" data-id="1">
               <p data-qa="POSTING_CARD_PRICE">USD 200.000</p>
               <p data-qa="POSTING_CARD_FEATURES">100 m²</p></div>"#,
        )
        .unwrap();

        let (_tx, rx) = mpsc::channel(1);
        let result = Analyzer::new(SourceType::File(path.display().to_string()))
            .run(rx)
            .await;
        let _ = std::fs::remove_file(&path);
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_run_missing_file() {
        let (_tx, rx) = mpsc::channel(1);
        let result = Analyzer::new(SourceType::File("/no/such/page.html".to_string()))
            .run(rx)
            .await;
        assert!(result.is_err());
    }
}
