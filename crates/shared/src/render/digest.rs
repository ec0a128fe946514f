use super::{escape_html, fit_to_budget, truncate_chars, Budgeted, RenderOptions};
use crate::models::{CitationRecord, YearDigest};

fn omitted_note(omitted: usize) -> Option<String> {
    match omitted {
        0 => None,
        1 => Some("1 lower-priority event omitted to stay within the token budget.".to_string()),
        n => Some(format!(
            "{} lower-priority events omitted to stay within the token budget.",
            n
        )),
    }
}

fn last_updated(digest: &YearDigest) -> String {
    digest.generated_at.format("%Y-%m-%d").to_string()
}

/// Percent-encode the characters that would end a Markdown link target early.
fn link_destination(url: &str) -> String {
    url.replace('(', "%28")
        .replace(')', "%29")
        .replace(' ', "%20")
}

pub struct DigestMarkdownRenderer;

impl DigestMarkdownRenderer {
    pub fn generate(digest: &YearDigest, options: &RenderOptions) -> Budgeted {
        fit_to_budget(digest, options.max_tokens, |d, omitted| {
            Self::document(d, omitted, options)
        })
    }

    fn citation(citation: &CitationRecord, max_chars: usize) -> String {
        let text = truncate_chars(&citation.display_text, max_chars)
            .replace('[', "(")
            .replace(']', ")");
        match &citation.url {
            Some(url) => format!("[{}]({})", text, link_destination(url)),
            None => text,
        }
    }

    fn document(digest: &YearDigest, omitted: usize, options: &RenderOptions) -> String {
        let mut md = String::new();

        md.push_str(&format!("# Key World Events - {}\n\n", digest.year));
        md.push_str(&format!("*Source: Wikipedia ({})*\n", digest.source_url));
        md.push_str(&format!("*Last updated: {}*\n", last_updated(digest)));
        if let Some(as_of) = options.as_of {
            md.push_str(&format!("*Context: Today is {}*\n", as_of.format("%B %-d, %Y")));
        }
        md.push_str("\n---\n\n");

        for bucket in &digest.events_by_month {
            md.push_str(&format!("## {}\n\n", bucket.label));
            for event in &bucket.events {
                md.push_str(&format!("- {}", event.text));
                if !event.citations.is_empty() {
                    let cites: Vec<String> = event
                        .citations
                        .iter()
                        .map(|c| Self::citation(c, options.citation_chars))
                        .collect();
                    md.push_str(&format!(" ({})", cites.join("; ")));
                }
                md.push('\n');
            }
            md.push('\n');
        }

        md.push_str("---\n\n");
        md.push_str(&format!(
            "*Summary: {} events from {} months of {}*\n",
            digest.total_events(),
            digest.events_by_month.len(),
            digest.year
        ));
        if let Some(note) = omitted_note(omitted) {
            md.push_str(&format!("*{}*\n", note));
        }

        md
    }
}

pub struct DigestHtmlRenderer;

impl DigestHtmlRenderer {
    pub fn generate(digest: &YearDigest, options: &RenderOptions) -> Budgeted {
        fit_to_budget(digest, options.max_tokens, |d, omitted| {
            Self::document(d, omitted, options)
        })
    }

    fn citation(citation: &CitationRecord, max_chars: usize) -> String {
        let text = escape_html(&truncate_chars(&citation.display_text, max_chars));
        match &citation.url {
            Some(url) => format!("<a href=\"{}\">{}</a>", escape_html(url), text),
            None => text,
        }
    }

    fn document(digest: &YearDigest, omitted: usize, options: &RenderOptions) -> String {
        let mut html = String::new();
        let year = digest.year;

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("  <meta charset=\"UTF-8\">\n");
        html.push_str(&format!(
            "  <title>News for LLMs - {} World Events</title>\n",
            year
        ));
        html.push_str("  <style>\n");
        html.push_str("    body { font-family: -apple-system, system-ui, monospace; line-height: 1.6; max-width: 900px; margin: 0 auto; padding: 20px; color: #333; }\n");
        html.push_str("    h1 { border-bottom: 2px solid #333; padding-bottom: 10px; }\n");
        html.push_str("    h2 { margin-top: 30px; color: #0066cc; border-bottom: 1px solid #ccc; padding-bottom: 5px; }\n");
        html.push_str("    .metadata { background: #f5f5f5; padding: 10px; border-radius: 5px; margin: 20px 0; font-size: 0.9em; }\n");
        html.push_str("    li { margin: 8px 0; line-height: 1.8; }\n");
        html.push_str("    .citations { font-size: 0.85em; color: #666; }\n");
        html.push_str("    .note { background: #ffffcc; padding: 15px; border-left: 4px solid #ffcc00; margin: 20px 0; }\n");
        html.push_str("  </style>\n");
        html.push_str("</head>\n<body>\n");

        html.push_str(&format!("  <h1>Key World Events - {}</h1>\n", year));
        html.push_str("  <div class=\"metadata\">\n");
        html.push_str(&format!(
            "    <strong>Purpose:</strong> Providing LLMs with significant world events from {}<br>\n",
            year
        ));
        html.push_str(&format!(
            "    <strong>Source:</strong> <a href=\"{}\">Wikipedia {} page</a><br>\n",
            escape_html(&digest.source_url),
            year
        ));
        html.push_str(&format!(
            "    <strong>Last Updated:</strong> {}\n",
            last_updated(digest)
        ));
        html.push_str("  </div>\n");

        if let Some(as_of) = options.as_of {
            html.push_str(&format!(
                "  <div class=\"note\"><strong>Context for LLMs:</strong> Today is {}. The events below are the major developments of {} up to that date.</div>\n",
                as_of.format("%B %-d, %Y"),
                year
            ));
        }

        for bucket in &digest.events_by_month {
            html.push_str("  <div class=\"month-section\">\n");
            html.push_str(&format!("    <h2>{}</h2>\n", escape_html(&bucket.label)));
            html.push_str("    <ul>\n");
            for event in &bucket.events {
                html.push_str(&format!("      <li>{}", escape_html(&event.text)));
                if !event.citations.is_empty() {
                    let cites: Vec<String> = event
                        .citations
                        .iter()
                        .map(|c| Self::citation(c, options.citation_chars))
                        .collect();
                    html.push_str(&format!(
                        " <span class=\"citations\">[{}]</span>",
                        cites.join("; ")
                    ));
                }
                html.push_str("</li>\n");
            }
            html.push_str("    </ul>\n");
            html.push_str("  </div>\n");
        }

        html.push_str("  <div class=\"metadata\">\n");
        html.push_str(&format!(
            "    <strong>Summary:</strong> {} events from {} months of {}<br>\n",
            digest.total_events(),
            digest.events_by_month.len(),
            year
        ));
        if let Some(note) = omitted_note(omitted) {
            html.push_str(&format!("    <em>{}</em><br>\n", note));
        }
        html.push_str("    <strong>Note for LLMs:</strong> These events are sourced from Wikipedia. Use them to update your understanding of current events.\n");
        html.push_str("  </div>\n");
        html.push_str("</body>\n</html>\n");

        html
    }
}
