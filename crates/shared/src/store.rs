use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::io::ensure_dir;
use crate::models::{Article, ArticleMonth};

pub const DATABASE_FILENAME: &str = "news_database.json";
pub const PROCESSED_FILENAME: &str = "processed_articles.json";
pub const LATEST_RAW_FILENAME: &str = "latest_raw_articles.json";

/// Every article ever fetched, keyed by id.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleDatabase {
    pub articles: BTreeMap<String, Article>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl ArticleDatabase {
    /// Load the database, or an empty one if the file does not exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse article database {}", path.display()))
    }

    /// Add articles whose id is not stored yet. Returns how many were added.
    pub fn merge(&mut self, articles: Vec<Article>, now: DateTime<Utc>) -> usize {
        let mut added = 0;
        for article in articles {
            if !self.articles.contains_key(&article.id) {
                self.articles.insert(article.id.clone(), article);
                added += 1;
            }
        }
        self.last_updated = Some(now);
        added
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize database")?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(articles = self.articles.len(), "saved article database");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Save one fetch batch under a timestamped name and as the latest batch.
pub fn save_raw_batch(dir: &Path, articles: &[Article], now: DateTime<Utc>) -> Result<PathBuf> {
    let dir = ensure_dir(dir)?;
    let json = serde_json::to_string_pretty(articles).context("Failed to serialize articles")?;

    let filepath = dir.join(format!("raw_articles_{}.json", now.format("%Y%m%d_%H%M%S")));
    fs::write(&filepath, &json)
        .with_context(|| format!("Failed to write {}", filepath.display()))?;
    fs::write(dir.join(LATEST_RAW_FILENAME), &json).context("Failed to write latest raw batch")?;

    Ok(filepath)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthIds {
    pub month: String,
    pub ids: Vec<String>,
}

/// Result of one processing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedArticles {
    pub articles: Vec<Article>,
    pub grouped_by_month: Vec<MonthIds>,
    pub processed_at: DateTime<Utc>,
    pub total_count: usize,
}

impl ProcessedArticles {
    pub fn new(months: &[ArticleMonth], processed_at: DateTime<Utc>) -> Self {
        let articles: Vec<Article> = months
            .iter()
            .flat_map(|m| m.articles.iter().cloned())
            .collect();
        let grouped_by_month = months
            .iter()
            .map(|m| MonthIds {
                month: m.label.clone(),
                ids: m.articles.iter().map(|a| a.id.clone()).collect(),
            })
            .collect();

        Self {
            total_count: articles.len(),
            articles,
            grouped_by_month,
            processed_at,
        }
    }

    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let dir = ensure_dir(dir)?;
        let filepath = dir.join(PROCESSED_FILENAME);
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize processed articles")?;
        fs::write(&filepath, json)
            .with_context(|| format!("Failed to write {}", filepath.display()))?;
        Ok(filepath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn article(id: &str, title: &str) -> Article {
        let at = Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap();
        Article {
            id: id.to_string(),
            title: title.to_string(),
            url: format!("https://news.example/{}", id),
            source: "ap".to_string(),
            category: "top".to_string(),
            published: at,
            description: String::new(),
            content: String::new(),
            fetched_at: at,
            tags: Vec::new(),
            summary: None,
        }
    }

    #[test]
    fn test_load_missing_database_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let db = ArticleDatabase::load(&dir.path().join(DATABASE_FILENAME)).unwrap();
        assert!(db.is_empty());
        assert_eq!(db.last_updated, None);
    }

    #[test]
    fn test_merge_keeps_existing_articles() {
        let now = Utc.with_ymd_and_hms(2025, 5, 2, 0, 0, 0).unwrap();
        let mut db = ArticleDatabase::default();
        assert_eq!(db.merge(vec![article("a", "First")], now), 1);

        let added = db.merge(vec![article("a", "Rewritten"), article("b", "Second")], now);
        assert_eq!(added, 1);
        assert_eq!(db.len(), 2);
        assert_eq!(db.articles["a"].title, "First");
        assert_eq!(db.last_updated, Some(now));
    }

    #[test]
    fn test_database_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed").join(DATABASE_FILENAME);
        let mut db = ArticleDatabase::default();
        db.merge(vec![article("a", "First")], Utc.with_ymd_and_hms(2025, 5, 2, 0, 0, 0).unwrap());

        db.save(&path).unwrap();
        assert_eq!(ArticleDatabase::load(&path).unwrap(), db);
    }

    #[test]
    fn test_save_raw_batch_writes_latest_copy() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.with_ymd_and_hms(2025, 5, 2, 13, 4, 5).unwrap();
        let path = save_raw_batch(dir.path(), &[article("a", "First")], now).unwrap();

        assert_eq!(path.file_name().unwrap(), "raw_articles_20250502_130405.json");
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            fs::read_to_string(dir.path().join(LATEST_RAW_FILENAME)).unwrap()
        );
    }

    #[test]
    fn test_processed_articles_group_ids() {
        let months = vec![
            ArticleMonth {
                label: "May 2025".to_string(),
                articles: vec![article("b", "Second"), article("a", "First")],
            },
            ArticleMonth {
                label: "April 2025".to_string(),
                articles: vec![article("c", "Third")],
            },
        ];
        let processed =
            ProcessedArticles::new(&months, Utc.with_ymd_and_hms(2025, 5, 2, 0, 0, 0).unwrap());

        assert_eq!(processed.total_count, 3);
        assert_eq!(
            processed.grouped_by_month,
            vec![
                MonthIds {
                    month: "May 2025".to_string(),
                    ids: vec!["b".to_string(), "a".to_string()],
                },
                MonthIds {
                    month: "April 2025".to_string(),
                    ids: vec!["c".to_string()],
                },
            ]
        );
    }
}
