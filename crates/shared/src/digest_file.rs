use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::{CitationRecord, EventRecord, Month, MonthBucket, YearDigest};
use crate::wikipedia::parse_date_prefix;

pub const DIGEST_FORMAT_VERSION: &str = "1.0";

fn default_version() -> String {
    DIGEST_FORMAT_VERSION.to_string()
}

/// On-disk form of a [`YearDigest`], the contract renderers read.
#[derive(Debug, Serialize, Deserialize)]
pub struct DigestFile {
    #[serde(default = "default_version")]
    pub version: String,
    pub year: i32,
    pub source: String,
    pub last_updated: String,
    pub events_by_month: MonthEntries,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEntry {
    pub text: String,
    #[serde(default)]
    pub citations: Vec<CitationRecord>,
}

/// Month label → events, kept in file order.
pub type MonthEntries = IndexMap<String, Vec<EventEntry>>;

impl From<&YearDigest> for DigestFile {
    fn from(digest: &YearDigest) -> Self {
        let events_by_month = digest
            .events_by_month
            .iter()
            .map(|bucket| {
                let events = bucket
                    .events
                    .iter()
                    .map(|e| EventEntry {
                        text: e.text.clone(),
                        citations: e.citations.clone(),
                    })
                    .collect();
                (bucket.label.clone(), events)
            })
            .collect();

        Self {
            version: DIGEST_FORMAT_VERSION.to_string(),
            year: digest.year,
            source: digest.source_url.clone(),
            last_updated: digest.generated_at.to_rfc3339(),
            events_by_month,
        }
    }
}

impl DigestFile {
    /// Rebuild the digest. Every event text must still open with its date.
    pub fn into_digest(self) -> Result<YearDigest> {
        if self.version != DIGEST_FORMAT_VERSION {
            anyhow::bail!(
                "Unsupported digest file version: {}. Expected {}. Regenerate it with collect-events.",
                self.version,
                DIGEST_FORMAT_VERSION
            );
        }

        let generated_at = DateTime::parse_from_rfc3339(&self.last_updated)
            .with_context(|| format!("Invalid last_updated timestamp: {}", self.last_updated))?
            .with_timezone(&Utc);

        let mut events_by_month = Vec::new();
        for (label, entries) in self.events_by_month {
            let month = label
                .split_whitespace()
                .next()
                .and_then(Month::from_name)
                .with_context(|| format!("Invalid month label: {}", label))?;

            let mut events = Vec::with_capacity(entries.len());
            for entry in entries {
                let prefix = parse_date_prefix(&entry.text)
                    .with_context(|| format!("Event under {} has no date: {}", label, entry.text))?;
                events.push(EventRecord {
                    raw_len: entry.text.chars().count(),
                    month: prefix.month,
                    day: prefix.day,
                    date: prefix.date_in(self.year),
                    citations: entry.citations,
                    text: entry.text,
                });
            }

            if !events.is_empty() {
                events_by_month.push(MonthBucket {
                    label,
                    month,
                    events,
                });
            }
        }

        Ok(YearDigest {
            year: self.year,
            source_url: self.source,
            generated_at,
            events_by_month,
        })
    }
}
