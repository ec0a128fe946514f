use chrono::{NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use shared::wikipedia::{extract_digest, RawDocument};
use shared::{CitationRecord, DigestFile, Month, YearDigest};

const SOURCE: &str = "https://en.wikipedia.org/wiki/2025";

/// Undated bullet that keeps a list above the minimum text length.
const FILLER: &str =
    "<li>Many other notable happenings around the world were recorded in the chronicle of this year.</li>";

fn page(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>2025</title></head><body>\
         <div id=\"mw-content-text\">{}</div></body></html>",
        body
    )
}

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap()
}

fn run(body: &str, as_of: NaiveDate) -> YearDigest {
    let doc = RawDocument::new(2025, SOURCE, page(body));
    extract_digest(&doc, as_of, Utc.with_ymd_and_hms(2025, 8, 25, 12, 0, 0).unwrap())
}

fn texts(digest: &YearDigest) -> Vec<String> {
    digest
        .events_by_month
        .iter()
        .flat_map(|b| b.events.iter().map(|e| e.text.clone()))
        .collect()
}

#[test]
fn full_pipeline_keeps_one_january_event() {
    let body = format!(
        "<h2>January</h2><ul>\
         <li>January 10: A signed a deal. <sup class=\"reference\"><a href=\"#cite_note-3\">[3]</a></sup></li>\
         <li>January 10: A signed a deal.</li>\
         {}</ul>",
        FILLER
    );

    let digest = run(&body, date(2, 1));

    assert_eq!(digest.year, 2025);
    assert_eq!(digest.source_url, SOURCE);
    assert_eq!(digest.events_by_month.len(), 1);
    let january = &digest.events_by_month[0];
    assert_eq!(january.label, "January 2025");
    assert_eq!(january.month, Month::January);
    assert_eq!(january.events.len(), 1);
    assert_eq!(january.events[0].text, "January 10: A signed a deal.");
    assert_eq!(january.events[0].date, Some(date(1, 10)));
}

#[test]
fn duplicates_within_a_month_are_dropped() {
    let body = format!(
        "<ul>\
         <li>January 12: Floods displaced thousands in the river valley. <sup class=\"reference\"><a href=\"#cite_note-4\">[4]</a></sup></li>\
         <li>January 12:   floods displaced thousands in the river valley.</li>\
         {}</ul>",
        FILLER
    );

    let digest = run(&body, date(12, 31));
    assert_eq!(
        texts(&digest),
        vec!["January 12: Floods displaced thousands in the river valley."]
    );
}

#[test]
fn citation_is_attached_from_footnote() {
    let body = format!(
        "<ul>\
         <li>March 3: Leaders met in Geneva for new trade talks.<sup class=\"reference\"><a href=\"#cite_note-7\">[7]</a></sup></li>\
         {}</ul>\
         <ol class=\"references\">\
         <li id=\"cite_note-7\"><span class=\"reference-text\"><cite>BBC News, 2025</cite> \
         <a class=\"external text\" href=\"https://bbc.com/x\">link</a></span></li>\
         </ol>",
        FILLER
    );

    let digest = run(&body, date(12, 31));
    let event = &digest.events_by_month[0].events[0];

    assert_eq!(event.text, "March 3: Leaders met in Geneva for new trade talks.");
    assert_eq!(
        event.citations,
        vec![CitationRecord::new(
            "BBC News, 2025",
            Some("https://bbc.com/x".to_string())
        )]
    );
}

#[test]
fn unresolved_marker_yields_no_citation() {
    let body = format!(
        "<ul>\
         <li>March 3: Leaders met in Geneva for new trade talks.<sup class=\"reference\"><a href=\"#cite_note-99\">[99]</a></sup></li>\
         {}</ul>",
        FILLER
    );

    let digest = run(&body, date(12, 31));
    assert!(digest.events_by_month[0].events[0].citations.is_empty());
}

#[test]
fn navigation_lists_contribute_nothing() {
    let body = "<ul><li>Toggle contents menu</li><li>item1</li><li>item2</li></ul>\
                <ul><li>Toggle the full table</li>\
                <li>January 5 A long dated line that would otherwise easily qualify as an event record here</li></ul>\
                <ul><li>January 6 Too short a list to count</li></ul>";

    let digest = run(body, date(12, 31));
    assert!(digest.is_empty());
}

#[test]
fn impossible_day_is_kept_without_a_date() {
    let body = format!(
        "<ul><li>February 30: Unusual report from the national observatory</li>{}</ul>",
        FILLER
    );

    let digest = run(&body, date(3, 1));
    let event = &digest.events_by_month[0].events[0];

    assert_eq!(event.text, "February 30: Unusual report from the national observatory");
    assert_eq!(event.month, Month::February);
    assert_eq!(event.day, 30);
    assert_eq!(event.date, None);
}

#[test]
fn nested_items_stay_separate() {
    let body = format!(
        "<ul>\
         <li>March 5 Treaty signed in the capital city\n\
           <ul><li>March 6 Sub-clause ratified by parliament</li></ul>\
         </li>\
         {}</ul>",
        FILLER
    );

    let digest = run(&body, date(12, 31));
    assert_eq!(
        texts(&digest),
        vec![
            "March 5 Treaty signed in the capital city",
            "March 6 Sub-clause ratified by parliament",
        ]
    );
}

#[test]
fn parent_carries_citations_from_its_sub_bullets() {
    let body = format!(
        "<ul>\
         <li>March 5: Treaty signed by the member states in Brussels today\
           <ul><li>March 5: Sub-clause ratified by the national parliaments\
           <sup class=\"reference\"><a href=\"#cite_note-9\">[9]</a></sup></li></ul>\
         </li>\
         {}</ul>\
         <ol class=\"references\">\
         <li id=\"cite_note-9\"><span class=\"reference-text\"><cite>Reuters, 2025</cite></span></li>\
         </ol>",
        FILLER
    );

    let digest = run(&body, date(12, 31));
    let events = &digest.events_by_month[0].events;
    let reuters = vec![CitationRecord::new("Reuters, 2025", None)];

    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0].text,
        "March 5: Treaty signed by the member states in Brussels today"
    );
    assert_eq!(events[0].citations, reuters);
    assert_eq!(
        events[1].text,
        "March 5: Sub-clause ratified by the national parliaments"
    );
    assert_eq!(events[1].citations, reuters);
}

#[test]
fn undated_sub_bullets_inherit_the_parent_date() {
    let body = format!(
        "<ul>\
         <li>April 2\
           <ul>\
             <li>Parliament passed the national budget after a long debate</li>\
             <li>A storm closed airports across the northern coast</li>\
           </ul>\
         </li>\
         {}</ul>",
        FILLER
    );

    let digest = run(&body, date(12, 31));
    assert_eq!(
        texts(&digest),
        vec![
            "April 2: Parliament passed the national budget after a long debate",
            "April 2: A storm closed airports across the northern coast",
        ]
    );
}

#[test]
fn events_after_as_of_are_excluded() {
    let body = format!(
        "<ul>\
         <li>January 10 Ministers agreed on a new fisheries accord</li>\
         <li>June 1 Voters went to the polls in the general election</li>\
         <li>December 25 Celebrations planned across the whole country</li>\
         {}</ul>",
        FILLER
    );

    let digest = run(&body, date(6, 1));
    let labels: Vec<&str> = digest
        .events_by_month
        .iter()
        .map(|b| b.label.as_str())
        .collect();

    assert_eq!(labels, vec!["January 2025", "June 2025"]);
    assert_eq!(digest.total_events(), 2);
}

#[test]
fn short_events_are_dropped() {
    let body = format!(
        "<ul><li>May 4 Brief note</li><li>May 5 A longer statement about the regional summit</li>{}</ul>",
        FILLER
    );

    let digest = run(&body, date(12, 31));
    assert_eq!(
        texts(&digest),
        vec!["May 5 A longer statement about the regional summit"]
    );
}

#[test]
fn repeated_runs_serialize_identically() {
    let body = format!(
        "<ul>\
         <li>March 3: Leaders met in Geneva for new trade talks.<sup class=\"reference\"><a href=\"#cite_note-7\">[7]</a></sup></li>\
         <li>January 10 Ministers agreed on a new fisheries accord</li>\
         <li>April 2\
           <ul><li>Parliament passed the national budget after a long debate</li></ul>\
         </li>\
         {}</ul>\
         <ol class=\"references\">\
         <li id=\"cite_note-7\"><cite>BBC News, 2025</cite> \
         <a class=\"external text\" href=\"https://bbc.com/x\">link</a></li>\
         </ol>",
        FILLER
    );

    let first = run(&body, date(6, 1));
    let second = run(&body, date(6, 1));

    assert_eq!(first.total_events(), 3);
    assert_eq!(
        serde_json::to_string_pretty(&DigestFile::from(&first)).unwrap(),
        serde_json::to_string_pretty(&DigestFile::from(&second)).unwrap()
    );
}

#[test]
fn page_without_lists_gives_empty_digest() {
    let digest = run("<p>Nothing to see.</p>", date(12, 31));
    assert!(digest.is_empty());
    assert_eq!(digest.total_events(), 0);
}
