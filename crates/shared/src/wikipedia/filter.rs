use chrono::NaiveDate;

use crate::models::EventRecord;

/// Keeps events that have already happened as of a fixed date.
///
/// Records whose date could not be built are kept: an odd date is not a
/// reason to lose the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalFilter {
    as_of: NaiveDate,
}

impl TemporalFilter {
    pub fn new(as_of: NaiveDate) -> Self {
        Self { as_of }
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn retains(&self, record: &EventRecord) -> bool {
        record.date.map_or(true, |date| date <= self.as_of)
    }

    pub fn apply(&self, records: Vec<EventRecord>) -> Vec<EventRecord> {
        records.into_iter().filter(|r| self.retains(r)).collect()
    }
}
