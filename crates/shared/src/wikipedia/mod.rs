//! Extraction of dated world events from a Wikipedia year page.
//!
//! The pipeline runs strictly forward over one document:
//! references → candidate items → records → as-of filter → per-month
//! dedup → digest. Nothing in here reads the clock; the as-of date and the
//! digest timestamp are supplied by the caller.

pub mod blocks;
pub mod dedup;
pub mod digest;
pub mod fetch;
pub mod filter;
pub mod normalize;
pub mod records;
pub mod references;

use chrono::{DateTime, NaiveDate, Utc};
use scraper::{Html, Selector};
use tracing::{info, warn};

use crate::models::{EventRecord, YearDigest};
pub use blocks::{extract_candidates, is_event_list, CandidateListItem};
pub use dedup::dedupe_month;
pub use fetch::{RawDocument, WikipediaClient};
pub use filter::TemporalFilter;
pub use normalize::normalize_text;
pub use records::{parse_date_prefix, RecordBuilder};
pub use references::{resolve_references, CitationTable};

pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Run the whole extraction over a fetched page.
pub fn extract_digest(
    doc: &RawDocument,
    as_of: NaiveDate,
    generated_at: DateTime<Utc>,
) -> YearDigest {
    let html = Html::parse_document(&doc.html);

    let citations = resolve_references(&html, &doc.source_url);
    let candidates = extract_candidates(&html);
    info!(
        candidates = candidates.len(),
        citations = citations.len(),
        "scanned year page"
    );

    let builder = RecordBuilder::new(doc.year, &citations);
    let filter = TemporalFilter::new(as_of);
    let records: Vec<EventRecord> = candidates
        .iter()
        .flat_map(|item| builder.build_all(item))
        .filter(|record| filter.retains(record))
        .collect();
    info!(records = records.len(), %as_of, "events on or before as-of date");

    let groups = digest::group_by_month(records)
        .into_iter()
        .map(|(month, events)| (month, dedupe_month(events)))
        .collect();

    let digest = digest::assemble(doc.year, &doc.source_url, generated_at, groups);
    if digest.is_empty() {
        warn!(year = doc.year, "no events extracted; the page layout may have changed");
    } else {
        info!(
            events = digest.total_events(),
            months = digest.events_by_month.len(),
            "digest assembled"
        );
    }

    digest
}
