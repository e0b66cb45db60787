use crate::sources::{PageSource, SourceError};
use std::path::Path;

/// Page whose location and content only change when told to
#[derive(Debug, Clone, Default)]
pub struct StaticPage {
    page_id: String,
    html: String,
}

impl StaticPage {
    pub fn new(page_id: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            html: html.into(),
        }
    }

    /// Load a saved HTML document; its path serves as the page identifier
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let html = std::fs::read_to_string(path)?;
        ::log::debug!("Loaded {} bytes from {}", html.len(), path.display());
        Ok(Self::new(path.display().to_string(), html))
    }

    /// Simulate navigation to another page
    pub fn navigate(&mut self, page_id: impl Into<String>, html: impl Into<String>) {
        self.page_id = page_id.into();
        self.html = html.into();
    }
}

impl PageSource for StaticPage {
    async fn page_id(&mut self) -> Result<String, SourceError> {
        Ok(self.page_id.clone())
    }

    async fn html(&mut self) -> Result<String, SourceError> {
        Ok(self.html.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_navigate() {
        let mut page = StaticPage::new("/a", "<p>a</p>");
        assert_eq!(page.page_id().await.unwrap(), "/a");

        page.navigate("/b", "<p>b</p>");
        assert_eq!(page.page_id().await.unwrap(), "/b");
        assert_eq!(page.html().await.unwrap(), "<p>b</p>");
    }

    #[test]
    fn test_missing_file() {
        let result = StaticPage::from_file("/definitely/not/here.html");
        assert!(matches!(result, Err(SourceError::Io(_))));
    }
}
