use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_URL_PATTERN: &str = "https://en.wikipedia.org/wiki/{year}";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Markup of one year page, exactly as served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub year: i32,
    pub source_url: String,
    pub html: String,
}

impl RawDocument {
    pub fn new(year: i32, source_url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            year,
            source_url: source_url.into(),
            html: html.into(),
        }
    }
}

/// Expand `{year}` in a URL pattern.
pub fn year_url(pattern: &str, year: i32) -> String {
    pattern.replace("{year}", &year.to_string())
}

pub struct WikipediaClient {
    client: Client,
    url_pattern: String,
}

impl WikipediaClient {
    pub fn new(url_pattern: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url_pattern: url_pattern.into(),
        })
    }

    /// Fetch the page for `year`. Any network error or non-success status
    /// fails the run; there is no retry.
    pub async fn fetch_year(&self, year: i32) -> Result<RawDocument> {
        let url = year_url(&self.url_pattern, year);
        info!(%url, year, "fetching year page");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP error fetching {}: {}", url, status);
        }

        let html = response
            .text()
            .await
            .context("Failed to read response body")?;

        info!(bytes = html.len(), "year page fetched");

        Ok(RawDocument::new(year, url, html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_url_expands_placeholder() {
        assert_eq!(
            year_url(DEFAULT_URL_PATTERN, 2025),
            "https://en.wikipedia.org/wiki/2025"
        );
    }

    #[test]
    fn test_year_url_without_placeholder_is_unchanged() {
        assert_eq!(year_url("http://localhost/page", 2025), "http://localhost/page");
    }
}
