use scraper::{ElementRef, Html, Node};
use tracing::debug;

use super::selector;

/// Lists whose text contains any of these are navigation or table-of-contents
/// chrome, not event lists.
pub const NAVIGATION_MARKERS: [&str; 2] = ["Toggle", "Contents"];

/// Lists with less text than this are disambiguation links, infobox rows and
/// the like.
pub const MIN_LIST_TEXT_CHARS: usize = 100;

/// Decide from a list's flattened text whether it can hold events.
pub fn is_event_list(flattened_text: &str) -> bool {
    if NAVIGATION_MARKERS
        .iter()
        .any(|marker| flattened_text.contains(marker))
    {
        return false;
    }
    flattened_text.chars().count() >= MIN_LIST_TEXT_CHARS
}

/// One bullet of a candidate list with its own text separated from the
/// bullets nested below it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateListItem {
    /// Text belonging to this bullet only, before normalization.
    pub raw_text: String,
    pub nested_items: Vec<CandidateListItem>,
    /// Footnote ids referenced anywhere within this bullet: its own text
    /// first, then its nested bullets, first-seen order.
    pub citation_markers: Vec<String>,
}

impl CandidateListItem {
    /// Build the item tree rooted at an `<li>` element.
    pub fn from_element(li: ElementRef<'_>) -> Self {
        let mut item = Self::default();
        item.absorb(li);

        let nested: Vec<String> = item
            .nested_items
            .iter()
            .flat_map(|n| n.citation_markers.iter().cloned())
            .collect();
        for marker in nested {
            item.add_marker(&marker);
        }
        item
    }

    fn add_marker(&mut self, marker: &str) {
        if !marker.is_empty() && !self.citation_markers.iter().any(|m| m == marker) {
            self.citation_markers.push(marker.to_string());
        }
    }

    fn absorb(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.raw_text.push_str(text),
                Node::Element(el) => {
                    let Some(child_el) = ElementRef::wrap(child) else {
                        continue;
                    };
                    match el.name() {
                        "ul" | "ol" => self
                            .nested_items
                            .extend(list_items(child_el).map(Self::from_element)),
                        "style" | "script" => {}
                        "sup" if el.classes().any(|c| c == "reference") => {
                            self.raw_text.push_str(&visible_text(child_el));
                            self.harvest_markers(child_el);
                        }
                        _ => self.absorb(child_el),
                    }
                }
                _ => {}
            }
        }
    }

    fn harvest_markers(&mut self, reference: ElementRef<'_>) {
        let anchors = reference
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|e| e.value().name() == "a");

        for anchor in anchors {
            if let Some(marker) = anchor
                .value()
                .attr("href")
                .and_then(|href| href.strip_prefix('#'))
            {
                self.add_marker(marker);
            }
        }
    }
}

/// Direct `<li>` children of a list element.
fn list_items<'a>(list: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    list.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "li")
}

/// All text under `element`, skipping style and script contents.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    push_visible_text(element, &mut out);
    out
}

fn push_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if matches!(el.name(), "style" | "script") => {}
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    push_visible_text(child_el, out);
                }
            }
            _ => {}
        }
    }
}

fn is_inside_list_item(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| a.value().name() == "li")
}

/// Collect the direct items of every event-bearing `<ul>` in document order.
///
/// Lists nested inside a bullet are not visited on their own; they surface as
/// that bullet's `nested_items`.
pub fn extract_candidates(doc: &Html) -> Vec<CandidateListItem> {
    let list_sel = selector("ul");
    let mut items = Vec::new();

    for list in doc.select(&list_sel) {
        if is_inside_list_item(list) {
            continue;
        }
        let flattened = visible_text(list);
        if !is_event_list(&flattened) {
            debug!(chars = flattened.chars().count(), "skipping non-event list");
            continue;
        }
        items.extend(list_items(list).map(CandidateListItem::from_element));
    }

    items
}
