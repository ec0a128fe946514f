use chrono::{DateTime, Datelike, Utc};
use std::collections::HashSet;
use tracing::info;

use crate::categorizer::categorize;
use crate::feeds::is_within_days;
use crate::models::{Article, ArticleMonth};
use crate::store::ArticleDatabase;
use crate::summarizer::SummaryService;

pub const DEFAULT_MAX_AGE_DAYS: i64 = 365;
pub const DEFAULT_LIMIT: usize = 100;

/// Turns the article database into tagged, summarized monthly groups.
#[derive(Debug, Clone, Copy)]
pub struct NewsProcessor {
    pub max_age_days: i64,
    pub limit: usize,
}

impl Default for NewsProcessor {
    fn default() -> Self {
        Self {
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl NewsProcessor {
    pub fn new(max_age_days: i64, limit: usize) -> Self {
        Self { max_age_days, limit }
    }

    /// Recent, unique articles, newest first, at most `limit` of them.
    pub fn select(&self, db: &ArticleDatabase, now: DateTime<Utc>) -> Vec<Article> {
        let mut recent: Vec<Article> = db
            .articles
            .values()
            .filter(|a| is_within_days(a.published, now, self.max_age_days))
            .cloned()
            .collect();
        recent.sort_by(|a, b| b.published.cmp(&a.published));

        let mut seen_titles = HashSet::new();
        recent
            .into_iter()
            .filter(|a| seen_titles.insert(title_key(&a.title)))
            .take(self.limit)
            .collect()
    }

    /// Select, tag, summarize and group articles by month.
    pub async fn process(
        &self,
        db: &ArticleDatabase,
        summaries: &SummaryService,
        now: DateTime<Utc>,
    ) -> Vec<ArticleMonth> {
        let mut articles = self.select(db, now);
        info!(selected = articles.len(), total = db.len(), "processing articles");

        for article in &mut articles {
            article.tags = categorize(article);
        }

        let texts = summaries.summarize_all(&articles).await;
        for (article, summary) in articles.iter_mut().zip(texts) {
            article.summary = Some(summary);
        }

        group_by_month(articles)
    }
}

/// Lowercase ASCII alphanumerics of a title.
pub fn title_key(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Group articles under "Month Year", newest month first. Order within a
/// month is kept.
pub fn group_by_month(articles: Vec<Article>) -> Vec<ArticleMonth> {
    let mut keyed: Vec<((i32, u32), ArticleMonth)> = Vec::new();

    for article in articles {
        let key = (article.published.year(), article.published.month());
        match keyed.iter_mut().find(|(k, _)| *k == key) {
            Some((_, month)) => month.articles.push(article),
            None => keyed.push((
                key,
                ArticleMonth {
                    label: article.published.format("%B %Y").to_string(),
                    articles: vec![article],
                },
            )),
        }
    }

    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    keyed.into_iter().map(|(_, month)| month).collect()
}
