use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use shared::io::write_output;
use shared::render::{NewsPageRenderer, RenderOptions};
use shared::store::{save_raw_batch, DATABASE_FILENAME};
use shared::{
    default_sources, ArticleDatabase, Config, FeedAggregator, NewsProcessor, ProcessedArticles,
    SummaryService,
};

#[derive(Parser)]
#[command(name = "collect-news")]
#[command(about = "Poll news RSS feeds, tag and summarize articles, and render the news page")]
struct Args {
    /// Only look at articles published within this many days
    #[arg(short, long, default_value = "365")]
    days: i64,

    /// Maximum number of articles to process
    #[arg(short, long, default_value = "100")]
    limit: usize,

    /// Skip polling and only re-process the stored database
    #[arg(long)]
    no_fetch: bool,

    /// Approximate token budget for the rendered page
    #[arg(long)]
    max_tokens: Option<usize>,
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

    let now = Utc::now();
    let db_path = config.processed_dir().join(DATABASE_FILENAME);
    let mut db = ArticleDatabase::load(&db_path)?;

    if !args.no_fetch {
        let aggregator = FeedAggregator::new(default_sources(), config.fetch_timeout)?;
        println!(
            "📰 Fetching {} feeds...",
            aggregator.sources().len()
        );
        let articles = aggregator.fetch_all(now).await;
        println!("✓ Fetched {} articles", articles.len());

        let raw_path = save_raw_batch(&config.raw_dir(), &articles, now)
            .context("Failed to save raw articles")?;
        println!("✓ Saved raw batch to {}", raw_path.display());

        let added = db.merge(articles, now);
        db.save(&db_path)?;
        println!(
            "✓ Database now contains {} unique articles ({} new)",
            db.len(),
            added
        );
    }

    if db.is_empty() {
        println!("No articles in the database. Run without --no-fetch first.");
        return Ok(());
    }

    println!("\n🤖 Tagging and summarizing articles...");
    if config.anthropic_api_key.is_some() {
        println!("  (This may take a minute...)");
    }
    let summaries = SummaryService::from_api_key(config.anthropic_api_key.clone())?;
    let processor = NewsProcessor::new(args.days, args.limit);
    let months = processor.process(&db, &summaries, now).await;

    let processed = ProcessedArticles::new(&months, now);
    let processed_path = processed.save(&config.processed_dir())?;
    println!(
        "✓ Processed {} articles across {} months",
        processed.total_count,
        months.len()
    );
    println!("✓ Saved to {}", processed_path.display());

    println!("\n📝 Rendering news page...");
    let options = RenderOptions {
        max_tokens: args.max_tokens.unwrap_or(config.max_output_tokens),
        ..RenderOptions::default()
    };
    let html = NewsPageRenderer::generate(&months, &options, Local::now().date_naive());
    let html_path = write_output(&config.output_dir(), "news_digest.html", &html)?;
    println!("✓ HTML saved to {}", html_path.display());

    println!("\n✅ Done!");

    Ok(())
}
