use regex::Regex;
use scraper::Html;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;
use url::Url;

use super::blocks::visible_text;
use super::normalize::normalize_text;
use super::selector;
use crate::models::CitationRecord;

/// Footnote id → resolved citation. Read-only once built.
pub type CitationTable = HashMap<String, CitationRecord>;

fn marker_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^cite_note-(?:.+-)?\d+$").expect("marker id pattern is valid"))
}

/// Whether `id` names a footnote entry, e.g. `cite_note-7` or `cite_note-BBC-12`.
pub fn is_marker_id(id: &str) -> bool {
    marker_id_re().is_match(id)
}

/// Build the citation table from the document's footnote list.
///
/// Footnotes without a `<cite>` element are left out; looking up their marker
/// later simply finds nothing.
pub fn resolve_references(doc: &Html, source_url: &str) -> CitationTable {
    let footnote_sel = selector("li[id]");
    let cite_sel = selector("cite");
    let external_sel = selector("a.external[href]");
    let base = Url::parse(source_url).ok();

    let mut table = CitationTable::new();

    for note in doc.select(&footnote_sel) {
        let Some(id) = note.value().id().filter(|id| is_marker_id(id)) else {
            continue;
        };

        let Some(cite) = note.select(&cite_sel).next() else {
            debug!(id, "footnote has no citation element");
            continue;
        };

        let display_text = normalize_text(&visible_text(cite));
        if display_text.is_empty() {
            continue;
        }

        let url = note
            .select(&external_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| absolutize(href, base.as_ref()));

        table.insert(id.to_string(), CitationRecord::new(display_text, url));
    }

    debug!(count = table.len(), "resolved citations");
    table
}

/// Absolute hrefs are kept verbatim; relative and protocol-relative ones are
/// joined onto the page URL.
fn absolutize(href: &str, base: Option<&Url>) -> String {
    if Url::parse(href).is_ok() {
        return href.to_string();
    }
    base.and_then(|b| b.join(href).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| href.to_string())
}
