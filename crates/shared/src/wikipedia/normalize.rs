use regex::Regex;
use std::sync::OnceLock;

fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[(?:\d+|edit)\]").expect("marker pattern is valid"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Clean item text for downstream consumption.
///
/// Strips `[12]` citation markers and `[edit]` links, turns line breaks and
/// whitespace runs into single spaces, straightens curly quotes and trims.
/// Applying it twice gives the same result as applying it once.
pub fn normalize_text(text: &str) -> String {
    let mut cleaned = text.to_string();

    // Removing "[1]" from "[[1]2]" leaves "[2]", so strip until nothing matches.
    while marker_re().is_match(&cleaned) {
        cleaned = marker_re().replace_all(&cleaned, "").into_owned();
    }

    let cleaned = cleaned
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\r', '\n'], " ");

    whitespace_re()
        .replace_all(&cleaned, " ")
        .trim()
        .to_string()
}

/// Key used to detect duplicate statements: lowercased, whitespace-collapsed.
pub fn dedup_key(text: &str) -> String {
    whitespace_re()
        .replace_all(&text.to_lowercase(), " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_numeric_citation_markers() {
        assert_eq!(
            normalize_text("January 10: A signed a deal. [3]"),
            "January 10: A signed a deal."
        );
        assert_eq!(normalize_text("Talks[12][13] resumed"), "Talks resumed");
    }

    #[test]
    fn test_strips_edit_markers() {
        assert_eq!(normalize_text("January[edit]"), "January");
    }

    #[test]
    fn test_keeps_non_numeric_brackets() {
        assert_eq!(normalize_text("Vote [a] held"), "Vote [a] held");
    }

    #[test]
    fn test_collapses_whitespace_and_line_breaks() {
        assert_eq!(
            normalize_text("  March 5\n\tTreaty   signed\r\n "),
            "March 5 Treaty signed"
        );
    }

    #[test]
    fn test_non_breaking_space_collapses() {
        assert_eq!(normalize_text("March\u{a0}5 talks"), "March 5 talks");
    }

    #[test]
    fn test_straightens_curly_quotes() {
        assert_eq!(
            normalize_text("\u{201C}Peace\u{201D} isn\u{2019}t \u{2018}near\u{2019}"),
            "\"Peace\" isn't 'near'"
        );
    }

    #[test]
    fn test_nested_markers_are_fully_removed() {
        assert_eq!(normalize_text("x [[1]2] y"), "x y");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "",
            "   ",
            "January 10: A signed a deal. [3]",
            "x [[1]2] y",
            "[[[1]2]3]",
            "[edit][1]\n\n  February 30:\u{a0}Unusual \u{201C}report\u{201D}",
            "a [ 1] b [1 ] c",
            "\u{2019}\u{2019}\n[edit]",
        ];
        for sample in samples {
            let once = normalize_text(sample);
            assert_eq!(normalize_text(&once), once, "input: {:?}", sample);
        }
    }

    #[test]
    fn test_dedup_key() {
        assert_eq!(dedup_key("  January 10:  A Signed\na deal. "), "january 10: a signed a deal.");
    }
}
