use crate::sources::{PageSource, SourceError};
use crate::utils::page_id;
use fantoccini::{Client, ClientBuilder};

/// Fallback WebDriver endpoints tried when the configured one is unreachable
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// A live browser tab driven over WebDriver
pub struct WebPage {
    client: Client,
}

impl WebPage {
    /// Connect to the WebDriver instance, falling back to common local endpoints
    pub async fn connect(webdriver_url: &str) -> Result<Self, SourceError> {
        match ClientBuilder::native().connect(webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", webdriver_url);
                return Ok(Self { client });
            }
            Err(e) => {
                ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            }
        }

        for url in FALLBACK_WEBDRIVER_URLS.iter() {
            if *url == webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = ClientBuilder::native().connect(url).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(Self { client });
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(SourceError::Connect(format!(
            "no WebDriver server reachable at {} or fallbacks",
            webdriver_url
        )))
    }

    /// Navigate the browser to the page to analyze
    pub async fn open(&self, url: &str) -> Result<(), SourceError> {
        ::log::info!("Opening {}", url);
        self.client
            .goto(url)
            .await
            .map_err(|e| log_command_error(e, "opening", url))
    }

    /// End the WebDriver session
    pub async fn close(self) {
        if let Err(e) = self.client.close().await {
            ::log::warn!("Failed to close WebDriver client: {}", e);
        }
    }
}

impl PageSource for WebPage {
    async fn page_id(&mut self) -> Result<String, SourceError> {
        let url = self
            .client
            .current_url()
            .await
            .map_err(|e| log_command_error(e, "reading location of", "current page"))?;
        Ok(page_id(&url))
    }

    async fn html(&mut self) -> Result<String, SourceError> {
        self.client
            .source()
            .await
            .map_err(|e| log_command_error(e, "getting source for", "current page"))
    }
}

/// Logs a failed WebDriver command, calling out lost sessions
fn log_command_error(
    error: fantoccini::error::CmdError,
    context: &str,
    target: &str,
) -> SourceError {
    if error.to_string().contains("Unable to find session") {
        ::log::warn!("Lost WebDriver session while {} {}", context, target);
    } else {
        ::log::error!("Failed {} {}: {}", context, target, error);
    }
    SourceError::WebDriver(error)
}
