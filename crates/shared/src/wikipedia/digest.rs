use chrono::{DateTime, Utc};

use crate::models::{EventRecord, Month, MonthBucket, YearDigest};

/// Split records by month, months in the order they first appear.
pub fn group_by_month(records: Vec<EventRecord>) -> Vec<(Month, Vec<EventRecord>)> {
    let mut groups: Vec<(Month, Vec<EventRecord>)> = Vec::new();

    for record in records {
        match groups.iter_mut().find(|(month, _)| *month == record.month) {
            Some((_, events)) => events.push(record),
            None => groups.push((record.month, vec![record])),
        }
    }

    groups
}

/// Freeze per-month events into a digest, dropping months left empty.
pub fn assemble(
    year: i32,
    source_url: &str,
    generated_at: DateTime<Utc>,
    groups: Vec<(Month, Vec<EventRecord>)>,
) -> YearDigest {
    let events_by_month = groups
        .into_iter()
        .filter(|(_, events)| !events.is_empty())
        .map(|(month, events)| MonthBucket {
            label: month.label(year),
            month,
            events,
        })
        .collect();

    YearDigest {
        year,
        source_url: source_url.to_string(),
        generated_at,
        events_by_month,
    }
}
