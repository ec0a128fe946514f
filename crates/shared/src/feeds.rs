use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use feed_rs::model::{Entry, Feed};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use tracing::{info, warn};

use crate::models::Article;

pub const MAX_ARTICLE_AGE_DAYS: i64 = 365;
const CONCURRENT_FEEDS: usize = 4;

/// Whether `published` falls in the `days`-long window ending at `now`.
/// The window start is inclusive.
pub fn is_within_days(published: DateTime<Utc>, now: DateTime<Utc>, days: i64) -> bool {
    published >= now - Duration::days(days)
}

/// One RSS/Atom feed of a news outlet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    pub source: String,
    pub category: String,
    pub url: String,
}

impl FeedSource {
    pub fn new(source: &str, category: &str, url: &str) -> Self {
        Self {
            source: source.to_string(),
            category: category.to_string(),
            url: url.to_string(),
        }
    }
}

pub fn default_sources() -> Vec<FeedSource> {
    vec![
        FeedSource::new("reuters", "world", "https://feeds.reuters.com/reuters/worldNews"),
        FeedSource::new("reuters", "politics", "https://feeds.reuters.com/reuters/politicsNews"),
        FeedSource::new("reuters", "top", "https://feeds.reuters.com/reuters/topNews"),
        FeedSource::new("ap", "world", "https://feeds.apnews.com/rss/apf-worldnews"),
        FeedSource::new("ap", "politics", "https://feeds.apnews.com/rss/apf-politics"),
        FeedSource::new("ap", "top", "https://feeds.apnews.com/rss/apf-topnews"),
        FeedSource::new("bbc", "world", "http://feeds.bbci.co.uk/news/world/rss.xml"),
        FeedSource::new("bbc", "politics", "http://feeds.bbci.co.uk/news/politics/rss.xml"),
        FeedSource::new("guardian", "world", "https://www.theguardian.com/world/rss"),
        FeedSource::new("guardian", "politics", "https://www.theguardian.com/politics/rss"),
        FeedSource::new("nyt", "world", "https://rss.nytimes.com/services/xml/rss/nyt/World.xml"),
        FeedSource::new("nyt", "politics", "https://rss.nytimes.com/services/xml/rss/nyt/Politics.xml"),
    ]
}

/// Stable article id: SHA-256 of the link, hex encoded.
pub fn article_id(link: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(link.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(64);
    for byte in digest.iter() {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

pub struct FeedAggregator {
    client: Client,
    sources: Vec<FeedSource>,
}

impl FeedAggregator {
    pub fn new(sources: Vec<FeedSource>, timeout: std::time::Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("news-digest/0.1 (+https://github.com)")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, sources })
    }

    pub fn sources(&self) -> &[FeedSource] {
        &self.sources
    }

    async fn fetch_feed(&self, source: &FeedSource) -> Result<Feed> {
        let response = self
            .client
            .get(&source.url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", source.url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Feed {} returned HTTP {}", source.url, status);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read feed body")?;
        feed_rs::parser::parse(bytes.as_ref())
            .with_context(|| format!("Failed to parse feed {}", source.url))
    }

    /// Fetch every source and return fresh articles, newest first.
    ///
    /// A feed that fails to load is logged and skipped. Links already seen
    /// earlier in the source list are dropped.
    pub async fn fetch_all(&self, now: DateTime<Utc>) -> Vec<Article> {
        let feeds: Vec<(&FeedSource, Result<Feed>)> = stream::iter(&self.sources)
            .map(|source| async move { (source, self.fetch_feed(source).await) })
            .buffered(CONCURRENT_FEEDS)
            .collect()
            .await;

        let mut seen_urls = HashSet::new();
        let mut articles = Vec::new();

        for (source, result) in feeds {
            match result {
                Ok(feed) => {
                    let batch = articles_from_feed(feed, source, now, &mut seen_urls);
                    info!(
                        source = %source.source,
                        category = %source.category,
                        count = batch.len(),
                        "fetched feed"
                    );
                    articles.extend(batch);
                }
                Err(e) => warn!("Skipping feed {}: {:#}", source.url, e),
            }
        }

        articles.sort_by(|a, b| b.published.cmp(&a.published));
        articles
    }
}

/// Convert feed entries into articles, dropping links already in
/// `seen_urls` and entries older than a year before `now`.
pub fn articles_from_feed(
    feed: Feed,
    source: &FeedSource,
    now: DateTime<Utc>,
    seen_urls: &mut HashSet<String>,
) -> Vec<Article> {
    feed.entries
        .into_iter()
        .filter_map(|entry| {
            let link = entry.links.first()?.href.clone();
            if !seen_urls.insert(link.clone()) {
                return None;
            }
            let article = article_from_entry(entry, link, source, now);
            is_within_days(article.published, now, MAX_ARTICLE_AGE_DAYS).then_some(article)
        })
        .collect()
}

fn article_from_entry(entry: Entry, link: String, source: &FeedSource, now: DateTime<Utc>) -> Article {
    let published = entry.published.or(entry.updated).unwrap_or(now);

    Article {
        id: article_id(&link),
        title: entry.title.map(|t| t.content).unwrap_or_default(),
        url: link,
        source: source.source.clone(),
        category: source.category.clone(),
        published,
        description: entry.summary.map(|t| t.content).unwrap_or_default(),
        content: entry.content.and_then(|c| c.body).unwrap_or_default(),
        fetched_at: now,
        tags: Vec::new(),
        summary: None,
    }
}
