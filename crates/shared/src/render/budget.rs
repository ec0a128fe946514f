use std::collections::HashSet;
use tracing::debug;

use super::estimate_tokens;
use crate::models::YearDigest;
use crate::wikipedia::parse_date_prefix;

/// Substrings that mark an event as headline material. Stems like
/// "inaugurat" are meant to match several word forms.
const PRIORITY_KEYWORDS: &[&str] = &[
    "president", "prime minister", "election", "government",
    "war", "peace", "treaty", "agreement", "summit",
    "killed", "died", "death", "earthquake", "hurricane", "flood",
    "supreme court", "law", "legislation", "parliament",
    "coup", "protest", "resign", "sworn", "inaugurat",
    "pandemic", "virus", "vaccine", "climate", "record",
    "billion", "trillion", "crisis", "sanctions", "nuclear",
    "ceasefire", "invasion", "referendum", "constitution",
    "impeach", "arrest", "attack", "explosion", "crash",
];

/// Higher scores are kept longer when output has to shrink.
pub fn score_event(text: &str) -> u32 {
    let lower = text.to_lowercase();
    let mut score = 2 * PRIORITY_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(*kw))
        .count() as u32;

    let len = text.chars().count();
    if len > 100 {
        score += 1;
    }
    if len > 200 {
        score += 2;
    }
    if parse_date_prefix(text).is_some() {
        score += 1;
    }
    score
}

/// A rendered document and how many events had to be left out of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Budgeted {
    pub output: String,
    pub omitted: usize,
    pub tokens: usize,
}

/// Render `digest`, dropping the lowest-priority events until the output
/// fits in `max_tokens`.
///
/// `render` receives the reduced digest and the number of omitted events.
/// Ties in priority drop the later event first. Surviving events keep their
/// document order. If nothing fits, every event is dropped.
pub fn fit_to_budget<F>(digest: &YearDigest, max_tokens: usize, render: F) -> Budgeted
where
    F: Fn(&YearDigest, usize) -> String,
{
    let full = render(digest, 0);
    let tokens = estimate_tokens(&full);
    if tokens <= max_tokens {
        return Budgeted {
            output: full,
            omitted: 0,
            tokens,
        };
    }

    let drop_order = drop_order(digest);
    let attempt = |dropped: usize| {
        let output = render(&without(digest, &drop_order[..dropped]), dropped);
        let tokens = estimate_tokens(&output);
        Budgeted {
            output,
            omitted: dropped,
            tokens,
        }
    };

    // Smallest number of drops that fits.
    let (mut lo, mut hi) = (1, drop_order.len());
    let mut best = attempt(hi);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let candidate = attempt(mid);
        if candidate.tokens <= max_tokens {
            hi = mid;
            best = candidate;
        } else {
            lo = mid + 1;
        }
    }
    if best.omitted != hi {
        best = attempt(hi);
    }

    debug!(
        omitted = best.omitted,
        tokens = best.tokens,
        max_tokens,
        "trimmed digest to token budget"
    );
    best
}

/// (bucket, event) positions, least important first.
fn drop_order(digest: &YearDigest) -> Vec<(usize, usize)> {
    let mut ranked: Vec<(u32, usize, (usize, usize))> = Vec::new();
    for (b, bucket) in digest.events_by_month.iter().enumerate() {
        for (e, event) in bucket.events.iter().enumerate() {
            ranked.push((score_event(&event.text), ranked.len(), (b, e)));
        }
    }
    ranked.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
    ranked.into_iter().map(|(_, _, pos)| pos).collect()
}

fn without(digest: &YearDigest, dropped: &[(usize, usize)]) -> YearDigest {
    let dropped: HashSet<(usize, usize)> = dropped.iter().copied().collect();
    let mut reduced = digest.clone();
    for (b, bucket) in reduced.events_by_month.iter_mut().enumerate() {
        let mut e = 0;
        bucket.events.retain(|_| {
            let keep = !dropped.contains(&(b, e));
            e += 1;
            keep
        });
    }
    reduced.events_by_month.retain(|bucket| !bucket.events.is_empty());
    reduced
}
