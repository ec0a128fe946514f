use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use shared::io::{list_digest_files, load_digest, write_output};
use shared::render::{DigestHtmlRenderer, DigestMarkdownRenderer, RenderOptions};
use shared::{Config, YearDigest};
use std::io::{self, Write as _};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prepare-digest")]
#[command(about = "Re-render a saved Wikipedia event digest with a different budget")]
struct Args {
    /// Path to the digest JSON (if not provided, will list available files)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Approximate token budget for rendered output
    #[arg(long)]
    max_tokens: Option<usize>,

    /// Longest citation text before it is truncated
    #[arg(long)]
    citation_chars: Option<usize>,

    /// Date for the "today is" context line, YYYY-MM-DD
    #[arg(short, long)]
    as_of: Option<NaiveDate>,

    /// Directory for the rendered Markdown and HTML
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = Config::from_env()?;

    let digest = if let Some(path) = args.file {
        println!("📖 Reading digest: {}", path.display());
        load_digest(&path)?
    } else {
        select_digest(&config)?
    };

    println!(
        "✓ Loaded {} events across {} months of {}",
        digest.total_events(),
        digest.events_by_month.len(),
        digest.year
    );

    let options = RenderOptions {
        max_tokens: args.max_tokens.unwrap_or(config.max_output_tokens),
        citation_chars: args.citation_chars.unwrap_or(config.citation_chars),
        as_of: args.as_of,
    };
    let output_dir = args.output_dir.unwrap_or_else(|| config.output_dir());

    println!("\n📝 Rendering with a budget of {} tokens...", options.max_tokens);
    let markdown = DigestMarkdownRenderer::generate(&digest, &options);
    let md_path = write_output(
        &output_dir,
        &format!("newsforllms_{}.md", digest.year),
        &markdown.output,
    )
    .context("Failed to save Markdown file")?;
    println!("✓ Markdown saved to: {}", md_path.display());

    let html = DigestHtmlRenderer::generate(&digest, &options);
    let html_path = write_output(
        &output_dir,
        &format!("newsforllms_{}.html", digest.year),
        &html.output,
    )
    .context("Failed to save HTML file")?;
    println!("✓ HTML saved to: {}", html_path.display());

    if html.omitted > 0 {
        println!("  {} lower-priority events left out", html.omitted);
    }

    println!("\n✅ Done!");

    Ok(())
}

fn select_digest(config: &Config) -> Result<YearDigest> {
    let dir = config.processed_dir();
    let mut files = list_digest_files(&dir)?;

    if files.is_empty() {
        anyhow::bail!(
            "No digest files found in {}. Run collect-events first.",
            dir.display()
        );
    }

    println!("Available digests:\n");
    for (i, (path, digest)) in files.iter().enumerate() {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        println!(
            "  {}) {} ({} events, generated {})",
            i + 1,
            filename,
            digest.total_events(),
            digest.generated_at.format("%Y-%m-%d %H:%M")
        );
    }

    print!("\nSelect file (1-{}): ", files.len());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let selection: usize = input
        .trim()
        .parse()
        .context("Invalid selection. Please enter a number.")?;

    if selection < 1 || selection > files.len() {
        anyhow::bail!("Selection out of range. Please choose 1-{}", files.len());
    }

    Ok(files.swap_remove(selection - 1).1)
}
