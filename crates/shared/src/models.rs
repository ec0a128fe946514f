use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar month, in calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Exact, case-sensitive English month name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.name() == name)
    }

    /// 1-based month number.
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    /// Label used for digest sections, e.g. "January 2025".
    pub fn label(&self, year: i32) -> String {
        format!("{} {}", self.name(), year)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved footnote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationRecord {
    #[serde(rename = "text")]
    pub display_text: String,
    pub url: Option<String>,
}

impl CitationRecord {
    pub fn new(display_text: impl Into<String>, url: Option<String>) -> Self {
        Self {
            display_text: display_text.into(),
            url,
        }
    }
}

/// One dated statement about a world event.
///
/// `text` always starts with the "Month Day" token that produced `month` and
/// `day`. `date` is `None` when the day does not exist in that month of the
/// reference year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub text: String,
    pub month: Month,
    pub day: u32,
    pub date: Option<NaiveDate>,
    pub citations: Vec<CitationRecord>,
    /// Character count of the item text before normalization.
    pub raw_len: usize,
}

/// Events of one month, labelled "<Month> <Year>".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthBucket {
    pub label: String,
    pub month: Month,
    pub events: Vec<EventRecord>,
}

/// Everything extracted from one year page, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearDigest {
    pub year: i32,
    pub source_url: String,
    pub generated_at: DateTime<Utc>,
    /// Buckets in document order; never contains an empty bucket.
    pub events_by_month: Vec<MonthBucket>,
}

impl YearDigest {
    pub fn total_events(&self) -> usize {
        self.events_by_month.iter().map(|b| b.events.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.events_by_month.is_empty()
    }
}

/// An article pulled from an RSS feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub url: String,
    pub source: String,
    pub category: String,
    pub published: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    pub fetched_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Articles of one month, newest month first in a [`Vec`].
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleMonth {
    pub label: String,
    pub articles: Vec<Article>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_round_trips_through_name() {
        for month in Month::ALL {
            assert_eq!(Month::from_name(month.name()), Some(month));
        }
    }

    #[test]
    fn test_month_from_name_is_case_sensitive() {
        assert_eq!(Month::from_name("march"), None);
        assert_eq!(Month::from_name("Marchh"), None);
    }

    #[test]
    fn test_month_number() {
        assert_eq!(Month::January.number(), 1);
        assert_eq!(Month::December.number(), 12);
    }

    #[test]
    fn test_month_label() {
        assert_eq!(Month::March.label(2025), "March 2025");
    }
}
