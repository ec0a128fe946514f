use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate, Utc};
use clap::Parser;
use shared::io::{digest_filename, save_digest, write_output};
use shared::render::{DigestHtmlRenderer, DigestMarkdownRenderer, RenderOptions};
use shared::{extract_digest, Config, WikipediaClient};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "collect-events")]
#[command(about = "Extract dated world events from a Wikipedia year page into an LLM-sized digest")]
struct Args {
    /// Year page to scrape (defaults to the current year)
    #[arg(short, long)]
    year: Option<i32>,

    /// Keep events on or before this date, YYYY-MM-DD (defaults to today)
    #[arg(short, long)]
    as_of: Option<NaiveDate>,

    /// URL pattern for the year page, with {year} as placeholder
    #[arg(short, long)]
    url: Option<String>,

    /// Directory for the rendered Markdown and HTML
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Approximate token budget for rendered output
    #[arg(long)]
    max_tokens: Option<usize>,

    /// Longest citation text before it is truncated
    #[arg(long)]
    citation_chars: Option<usize>,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = Config::from_env()?;

    let today = Local::now().date_naive();
    let year = args.year.unwrap_or_else(|| today.year());
    let as_of = args.as_of.unwrap_or(today);
    let url_pattern = args.url.unwrap_or_else(|| config.wiki_url_pattern.clone());
    let output_dir = args.output_dir.unwrap_or_else(|| config.output_dir());

    println!("📚 Fetching Wikipedia events for {}...", year);
    let client = WikipediaClient::new(url_pattern, config.fetch_timeout)?;
    let document = client
        .fetch_year(year)
        .await
        .context("Failed to fetch year page")?;
    println!("✓ Downloaded {}", document.source_url);

    println!("\n🔍 Extracting events up to {}...", as_of.format("%B %-d, %Y"));
    let digest = extract_digest(&document, as_of, Utc::now());

    if digest.is_empty() {
        println!("⚠ No events found. The page layout may have changed.");
    } else {
        println!(
            "✓ Extracted {} events across {} months",
            digest.total_events(),
            digest.events_by_month.len()
        );
    }

    let json_path = save_digest(&digest, &config.processed_dir())
        .with_context(|| format!("Failed to save {}", digest_filename(year)))?;
    println!("✓ Saved JSON to {}", json_path.display());

    let options = RenderOptions {
        max_tokens: args.max_tokens.unwrap_or(config.max_output_tokens),
        citation_chars: args.citation_chars.unwrap_or(config.citation_chars),
        as_of: Some(as_of),
    };

    println!("\n📝 Rendering digest...");
    let markdown = DigestMarkdownRenderer::generate(&digest, &options);
    let md_path = write_output(
        &output_dir,
        &format!("newsforllms_{}.md", year),
        &markdown.output,
    )?;
    println!("✓ Markdown saved to {}", md_path.display());

    let html = DigestHtmlRenderer::generate(&digest, &options);
    let html_path = write_output(
        &output_dir,
        &format!("newsforllms_{}.html", year),
        &html.output,
    )?;
    write_output(&output_dir, "newsforllms.html", &html.output)?;
    println!("✓ HTML saved to {} (and newsforllms.html)", html_path.display());

    if html.omitted > 0 {
        println!(
            "  {} lower-priority events left out to fit {} tokens",
            html.omitted, options.max_tokens
        );
    }
    println!(
        "  Estimated tokens: {}/{}",
        html.tokens, options.max_tokens
    );

    println!("\n✅ Done!");

    Ok(())
}
