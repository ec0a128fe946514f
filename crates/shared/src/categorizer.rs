use regex::Regex;
use std::sync::OnceLock;

use crate::models::Article;

pub const MAX_TAGS: usize = 3;

/// Category name and the words that put an article in it.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Politics",
        &[
            "election", "vote", "parliament", "congress", "president", "minister",
            "government", "political", "democrat", "republican", "party",
        ],
    ),
    (
        "Geopolitics",
        &["sanctions", "diplomacy", "summit", "nato", "un", "treaty", "alliance", "conflict", "tension"],
    ),
    (
        "Elections",
        &["election", "ballot", "voting", "campaign", "candidate", "polls", "primary", "electoral"],
    ),
    (
        "Policy Changes",
        &["policy", "reform", "legislation", "regulation", "law", "bill", "act", "amendment"],
    ),
    (
        "International Relations",
        &["bilateral", "multilateral", "foreign", "ambassador", "embassy", "diplomatic", "international"],
    ),
    (
        "Economic Policy",
        &["economy", "inflation", "gdp", "budget", "fiscal", "monetary", "tax", "trade", "tariff"],
    ),
    (
        "Climate & Environment",
        &["climate", "carbon", "emissions", "renewable", "sustainability", "environment", "cop28", "green"],
    ),
    (
        "Technology & AI",
        &["artificial intelligence", "ai", "technology", "tech", "digital", "cyber", "data", "algorithm"],
    ),
    (
        "Military & Defense",
        &["military", "defense", "weapon", "army", "navy", "air force", "nato", "pentagon"],
    ),
    (
        "Social Movements",
        &["protest", "movement", "activism", "rights", "equality", "justice", "demonstration"],
    ),
    (
        "Legal & Courts",
        &["court", "judge", "legal", "lawsuit", "ruling", "verdict", "justice", "constitutional"],
    ),
    (
        "Public Health",
        &["health", "pandemic", "vaccine", "disease", "healthcare", "medical", "hospital", "covid"],
    ),
];

/// Feed categories that default to "Politics" when no keyword matched.
const POLITICAL_FEEDS: [&str; 2] = ["politics", "world"];

/// One case-insensitive whole-word pattern per category. Words inside a
/// phrase may be separated by any run of non-word characters.
fn category_patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        CATEGORY_KEYWORDS
            .iter()
            .map(|(category, keywords)| {
                let alternatives: Vec<String> = keywords
                    .iter()
                    .map(|kw| regex::escape(kw).replace(' ', r"\W+"))
                    .collect();
                let pattern = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
                (
                    *category,
                    Regex::new(&pattern).expect("category keyword pattern is valid"),
                )
            })
            .collect()
    })
}

/// Tag an article with up to [`MAX_TAGS`] categories, in category order.
pub fn categorize(article: &Article) -> Vec<String> {
    let text = format!(
        "{} {} {}",
        article.title, article.description, article.content
    );

    let mut tags: Vec<String> = category_patterns()
        .iter()
        .filter(|(_, pattern)| pattern.is_match(&text))
        .map(|(category, _)| category.to_string())
        .collect();

    if tags.is_empty() && POLITICAL_FEEDS.contains(&article.category.as_str()) {
        tags.push("Politics".to_string());
    }

    tags.truncate(MAX_TAGS);
    tags
}
