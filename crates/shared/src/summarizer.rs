use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use scraper::Html;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::models::Article;

const CLAUDE_MODEL: &str = "claude-3-5-haiku-20241022";
const MAX_PROMPT_CONTENT_CHARS: usize = 1000;
const FALLBACK_LONG_DESCRIPTION: usize = 200;

/// Produces a short natural-language summary of an article.
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, article: &Article) -> Result<String>;
}

#[derive(Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ClaudeResponse {
    content: Vec<Content>,
}

#[derive(Deserialize)]
struct Content {
    text: String,
}

pub struct ClaudeSummarizer {
    client: Client,
    api_key: String,
    semaphore: Arc<Semaphore>,
}

impl ClaudeSummarizer {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        // Reduce concurrency to avoid rate limits
        let semaphore = Arc::new(Semaphore::new(2));

        Ok(Self {
            client,
            api_key,
            semaphore,
        })
    }

    async fn try_summarize(&self, article: &Article) -> Result<String> {
        let request = ClaudeRequest {
            model: CLAUDE_MODEL.to_string(),
            max_tokens: 200,
            system: "You are a news summarizer creating concise, factual summaries for LLMs \
                     to understand recent world events."
                .to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: build_prompt(article),
            }],
        };

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Claude API")?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            anyhow::bail!("Claude API error: {}", error_text);
        }

        let claude_response = response
            .json::<ClaudeResponse>()
            .await
            .context("Failed to parse Claude API response")?;

        let summary = claude_response
            .content
            .first()
            .map(|c| c.text.trim().to_string())
            .unwrap_or_default();

        if summary.is_empty() {
            anyhow::bail!("Claude API returned an empty summary");
        }

        Ok(summary)
    }
}

#[async_trait::async_trait]
impl Summarizer for ClaudeSummarizer {
    async fn summarize(&self, article: &Article) -> Result<String> {
        let _permit = self.semaphore.acquire().await?;

        let mut last_error = None;
        for attempt in 0..3u32 {
            match self.try_summarize(article).await {
                Ok(summary) => return Ok(summary),
                Err(e) => {
                    let is_rate_limit = e.to_string().contains("rate_limit");
                    let backoff = if is_rate_limit {
                        std::time::Duration::from_secs(15 * u64::from(attempt + 1))
                    } else {
                        std::time::Duration::from_millis(1000 * 2_u64.pow(attempt))
                    };
                    debug!(attempt, ?backoff, "summarization failed: {:#}", e);
                    last_error = Some(e);
                    if attempt < 2 {
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Max retries reached")))
    }
}

fn build_prompt(article: &Article) -> String {
    let content = html2text::from_read(article.content.as_bytes(), 100);
    format!(
        "Summarize this news article in 2-3 sentences for an LLM that needs to understand \
         recent world events.\nFocus on the key facts, political implications, and why this \
         matters globally.\n\nTitle: {}\nDescription: {}\nContent: {}\n\n\
         Summary (2-3 sentences, focusing on facts and implications):",
        article.title,
        strip_markup(&article.description),
        truncate_at_char_boundary(&content, MAX_PROMPT_CONTENT_CHARS)
    )
}

/// Truncate to at most `max_bytes`, respecting UTF-8 boundaries.
fn truncate_at_char_boundary(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Plain text of an HTML fragment with whitespace collapsed.
pub fn strip_markup(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Offline summary built from the feed description.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackSummarizer;

impl FallbackSummarizer {
    pub fn summarize_sync(&self, article: &Article) -> String {
        let description = strip_markup(&article.description);

        let summary = if description.chars().count() > FALLBACK_LONG_DESCRIPTION {
            let sentences: Vec<&str> = description.split(". ").take(2).collect();
            format!("{}.", sentences.join(". ").trim_end_matches('.'))
        } else {
            description
        };

        format!(
            "{} (Published: {})",
            summary,
            article.published.format("%B %d, %Y")
        )
    }
}

#[async_trait::async_trait]
impl Summarizer for FallbackSummarizer {
    async fn summarize(&self, article: &Article) -> Result<String> {
        Ok(self.summarize_sync(article))
    }
}

/// A summarizer that never fails: the primary is tried first, the fallback
/// covers a missing primary or any error.
pub struct SummaryService {
    primary: Option<Box<dyn Summarizer>>,
    fallback: FallbackSummarizer,
}

impl SummaryService {
    pub fn new(primary: Option<Box<dyn Summarizer>>) -> Self {
        Self {
            primary,
            fallback: FallbackSummarizer,
        }
    }

    /// Claude when a key is configured, offline otherwise.
    pub fn from_api_key(api_key: Option<String>) -> Result<Self> {
        let primary = match api_key {
            Some(key) => Some(Box::new(ClaudeSummarizer::new(key)?) as Box<dyn Summarizer>),
            None => {
                warn!("ANTHROPIC_API_KEY not set; summaries will use the offline fallback");
                None
            }
        };
        Ok(Self::new(primary))
    }

    pub async fn summarize(&self, article: &Article) -> String {
        if let Some(primary) = &self.primary {
            match primary.summarize(article).await {
                Ok(summary) => return summary,
                Err(e) => warn!(title = %article.title, "LLM summary failed, using fallback: {:#}", e),
            }
        }
        self.fallback.summarize_sync(article)
    }

    /// Summaries in the same order as `articles`.
    pub async fn summarize_all(&self, articles: &[Article]) -> Vec<String> {
        stream::iter(articles)
            .map(|article| self.summarize(article))
            .buffered(2)
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn article(description: &str) -> Article {
        let at = Utc.with_ymd_and_hms(2025, 3, 7, 12, 0, 0).unwrap();
        Article {
            id: "id".to_string(),
            title: "Title".to_string(),
            url: "https://example.com".to_string(),
            source: "bbc".to_string(),
            category: "world".to_string(),
            published: at,
            description: description.to_string(),
            content: String::new(),
            fetched_at: at,
            tags: Vec::new(),
            summary: None,
        }
    }

    struct FailingSummarizer;

    #[async_trait::async_trait]
    impl Summarizer for FailingSummarizer {
        async fn summarize(&self, _article: &Article) -> Result<String> {
            anyhow::bail!("service unavailable")
        }
    }

    struct EchoSummarizer;

    #[async_trait::async_trait]
    impl Summarizer for EchoSummarizer {
        async fn summarize(&self, article: &Article) -> Result<String> {
            Ok(format!("summary of {}", article.description))
        }
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(
            strip_markup("<p>Leaders <b>met</b>\n in   Rome.</p>"),
            "Leaders met in Rome."
        );
    }

    #[test]
    fn test_fallback_short_description() {
        let summary = FallbackSummarizer.summarize_sync(&article("<p>Leaders met in Rome.</p>"));
        assert_eq!(summary, "Leaders met in Rome. (Published: March 07, 2025)");
    }

    #[test]
    fn test_fallback_long_description_keeps_two_sentences() {
        let long = format!(
            "First sentence is here. Second sentence follows. {}",
            "Third sentence pads the description well past the limit. ".repeat(4)
        );
        let summary = FallbackSummarizer.summarize_sync(&article(&long));
        assert_eq!(
            summary,
            "First sentence is here. Second sentence follows. (Published: March 07, 2025)"
        );
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        assert_eq!(truncate_at_char_boundary("héllo", 2), "h");
        assert_eq!(truncate_at_char_boundary("abc", 10), "abc");
    }

    #[tokio::test]
    async fn test_service_falls_back_on_error() {
        let service = SummaryService::new(Some(Box::new(FailingSummarizer)));
        let summary = service.summarize(&article("Talks resumed.")).await;
        assert_eq!(summary, "Talks resumed. (Published: March 07, 2025)");
    }

    #[tokio::test]
    async fn test_service_without_primary_uses_fallback() {
        let service = SummaryService::new(None);
        let summary = service.summarize(&article("Talks resumed.")).await;
        assert!(summary.ends_with("(Published: March 07, 2025)"));
    }

    #[tokio::test]
    async fn test_summarize_all_preserves_order() {
        let service = SummaryService::new(Some(Box::new(EchoSummarizer)));
        let articles = vec![article("a"), article("b"), article("c")];
        let summaries = service.summarize_all(&articles).await;
        assert_eq!(summaries, vec!["summary of a", "summary of b", "summary of c"]);
    }
}
