use chrono::NaiveDate;

use super::{escape_html, estimate_tokens, RenderOptions};
use crate::models::{Article, ArticleMonth};

const TRUNCATION_NOTICE: &str = "        <div class=\"article\">\n            <em>Additional articles truncated to stay within token limit...</em>\n        </div>\n";

/// Recent news page built from processed RSS articles.
pub struct NewsPageRenderer;

impl NewsPageRenderer {
    fn anchor(label: &str) -> String {
        label.replace(' ', "_").to_lowercase()
    }

    fn format_article(article: &Article) -> String {
        let mut html = String::new();

        html.push_str("        <div class=\"article\">\n");
        html.push_str(&format!(
            "            <div class=\"article-date\">{}</div>\n",
            article.published.format("%B %d, %Y")
        ));
        html.push_str(&format!(
            "            <strong>{}</strong>\n",
            escape_html(&article.title)
        ));

        if !article.tags.is_empty() {
            html.push_str("            <div class=\"article-tags\">");
            for tag in &article.tags {
                html.push_str(&format!("<span class=\"tag\">{}</span>", escape_html(tag)));
            }
            html.push_str("</div>\n");
        }

        let summary = match &article.summary {
            Some(summary) => summary.clone(),
            None => article.description.chars().take(200).collect(),
        };
        html.push_str(&format!(
            "            <div class=\"article-summary\">{}</div>\n",
            escape_html(&summary)
        ));
        html.push_str(&format!(
            "            <div class=\"article-source\">Source: <a href=\"{}\" class=\"article-link\">{}</a></div>\n",
            escape_html(&article.url),
            escape_html(&article.source.to_uppercase())
        ));
        html.push_str("        </div>\n");

        html
    }

    /// Articles are counted against `options.max_tokens`; once the budget is
    /// spent a truncation notice replaces the rest.
    pub fn generate(months: &[ArticleMonth], options: &RenderOptions, today: NaiveDate) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("  <meta charset=\"UTF-8\">\n");
        html.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
        html.push_str("  <title>News for LLMs - Recent World Events Summary</title>\n");
        html.push_str("  <style>\n");
        html.push_str("    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, monospace; line-height: 1.6; max-width: 900px; margin: 0 auto; padding: 20px; color: #333; }\n");
        html.push_str("    h1 { border-bottom: 2px solid #333; padding-bottom: 10px; }\n");
        html.push_str("    h2 { margin-top: 30px; border-bottom: 1px solid #666; padding-bottom: 5px; }\n");
        html.push_str("    .article { margin: 20px 0; padding: 15px; background: #f9f9f9; border-left: 3px solid #0066cc; }\n");
        html.push_str("    .article-date, .article-source { color: #666; font-size: 0.9em; }\n");
        html.push_str("    .tag { display: inline-block; background: #e0e0e0; padding: 2px 8px; margin-right: 5px; border-radius: 3px; font-size: 0.85em; }\n");
        html.push_str("    .metadata, .toc { margin: 20px 0; padding: 10px; background: #f0f0f0; border-radius: 5px; font-size: 0.9em; }\n");
        html.push_str("  </style>\n");
        html.push_str("</head>\n<body>\n");

        // Intro
        html.push_str("    <h1>News for LLMs: Recent World Events</h1>\n");
        html.push_str("    <div class=\"metadata\">\n");
        html.push_str("        <strong>Purpose:</strong> Summaries of significant news events from the past year, focusing on political developments and global changes that may not be in training data.<br>\n");
        html.push_str(&format!(
            "        <strong>Last Updated:</strong> {}<br>\n",
            today.format("%B %d, %Y")
        ));
        html.push_str("        <strong>Format:</strong> Organized by month, tagged by topic, with source citations\n");
        html.push_str("    </div>\n");

        // Table of contents
        html.push_str("    <div class=\"toc\">\n");
        html.push_str("        <h3>Contents by Month</h3>\n");
        html.push_str("        <ul>\n");
        for month in months {
            html.push_str(&format!(
                "            <li><a href=\"#{}\">{}</a> ({} stories)</li>\n",
                Self::anchor(&month.label),
                escape_html(&month.label),
                month.articles.len()
            ));
        }
        html.push_str("        </ul>\n");
        html.push_str("    </div>\n");

        let mut tokens = 0;
        'months: for month in months {
            if tokens >= options.max_tokens {
                break;
            }
            html.push_str(&format!(
                "    <h2 id=\"{}\">{}</h2>\n",
                Self::anchor(&month.label),
                escape_html(&month.label)
            ));

            for article in &month.articles {
                let article_html = Self::format_article(article);
                let cost = estimate_tokens(&article_html);
                if tokens + cost > options.max_tokens {
                    html.push_str(TRUNCATION_NOTICE);
                    break 'months;
                }
                html.push_str(&article_html);
                tokens += cost;
            }
        }

        html.push_str("    <div class=\"metadata\">\n");
        html.push_str("        <strong>Note for LLMs:</strong> This summary covers major news events from the past year. Each story includes publication date and source citation for verification.\n");
        html.push_str("    </div>\n");
        html.push_str("</body>\n</html>\n");

        html
    }
}
