use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use super::blocks::CandidateListItem;
use super::normalize::normalize_text;
use super::references::CitationTable;
use crate::models::{CitationRecord, EventRecord, Month};

fn date_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(January|February|March|April|May|June|July|August|September|October|November|December)\s+(\d{1,2})\b",
        )
        .expect("date prefix pattern is valid")
    })
}

/// The leading "Month Day" of an event statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePrefix {
    pub month: Month,
    pub day: u32,
}

impl DatePrefix {
    /// Calendar date in `year`, or `None` for days like February 30.
    pub fn date_in(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month.number(), self.day)
    }

    fn token(&self) -> String {
        format!("{} {}", self.month, self.day)
    }
}

/// Parse a leading `<MonthName> <Day>` token. Days outside 1..=31 are not
/// dates at all.
pub fn parse_date_prefix(text: &str) -> Option<DatePrefix> {
    let caps = date_prefix_re().captures(text)?;
    let month = Month::from_name(caps.get(1)?.as_str())?;
    let day: u32 = caps.get(2)?.as_str().parse().ok()?;
    if !(1..=31).contains(&day) {
        return None;
    }
    Some(DatePrefix { month, day })
}

/// Turns candidate items into event records for one year's page.
pub struct RecordBuilder<'a> {
    year: i32,
    citations: &'a CitationTable,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(year: i32, citations: &'a CitationTable) -> Self {
        Self { year, citations }
    }

    /// Build a record from already-normalized text, or `None` if the text does
    /// not open with a date.
    pub fn build(&self, text: &str, raw_len: usize, markers: &[String]) -> Option<EventRecord> {
        let prefix = parse_date_prefix(text)?;
        Some(self.record(text.to_string(), prefix, raw_len, markers))
    }

    /// Records for `item` and everything nested under it, parent first.
    pub fn build_all(&self, item: &CandidateListItem) -> Vec<EventRecord> {
        let mut out = Vec::new();
        self.collect(item, None, &mut out);
        out
    }

    fn collect(
        &self,
        item: &CandidateListItem,
        inherited: Option<DatePrefix>,
        out: &mut Vec<EventRecord>,
    ) {
        let text = normalize_text(&item.raw_text);
        let raw_len = item.raw_text.trim().chars().count();
        let own = parse_date_prefix(&text);

        match (own, inherited) {
            (Some(prefix), _) => {
                out.push(self.record(text, prefix, raw_len, &item.citation_markers));
            }
            (None, Some(prefix)) if !text.is_empty() => {
                // Undated sub-bullets belong to the date of the bullet above.
                let token = prefix.token();
                let raw_len = raw_len + token.chars().count() + 2;
                let text = format!("{}: {}", token, text);
                out.push(self.record(text, prefix, raw_len, &item.citation_markers));
            }
            _ => {}
        }

        let date_for_children = own.or(inherited);
        for child in &item.nested_items {
            self.collect(child, date_for_children, out);
        }
    }

    fn record(
        &self,
        text: String,
        prefix: DatePrefix,
        raw_len: usize,
        markers: &[String],
    ) -> EventRecord {
        EventRecord {
            text,
            month: prefix.month,
            day: prefix.day,
            date: prefix.date_in(self.year),
            citations: self.resolve(markers),
            raw_len,
        }
    }

    fn resolve(&self, markers: &[String]) -> Vec<CitationRecord> {
        markers
            .iter()
            .filter_map(|m| self.citations.get(m))
            .cloned()
            .collect()
    }
}
