use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("could not connect to WebDriver: {0}")]
    Connect(String),

    #[error("WebDriver command failed: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),

    #[error("could not read page: {0}")]
    Io(#[from] std::io::Error),
}

/// The page being analyzed: where it is and what it currently contains
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// Path + query of the current location
    async fn page_id(&mut self) -> Result<String, SourceError>;

    /// Rendered HTML of the current page
    async fn html(&mut self) -> Result<String, SourceError>;
}
