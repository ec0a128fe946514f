use std::collections::HashSet;

use super::normalize::dedup_key;
use crate::models::EventRecord;

/// Statements with fewer raw characters than this are not meaningful events.
pub const MIN_EVENT_CHARS: usize = 30;

/// Drop short records and repeated statements from one month's events,
/// keeping the first occurrence of each statement in its original position.
pub fn dedupe_month(events: Vec<EventRecord>) -> Vec<EventRecord> {
    let mut seen = HashSet::new();

    events
        .into_iter()
        .filter(|event| event.raw_len >= MIN_EVENT_CHARS)
        .filter(|event| seen.insert(dedup_key(&event.text)))
        .collect()
}
