// Public modules
pub mod categorizer;
pub mod config;
pub mod digest_file;
pub mod feeds;
pub mod io;
pub mod models;
pub mod processor;
pub mod render;
pub mod store;
pub mod summarizer;
pub mod wikipedia;

// Re-export commonly used types
pub use categorizer::categorize;
pub use config::Config;
pub use digest_file::DigestFile;
pub use feeds::{default_sources, FeedAggregator, FeedSource};
pub use io::{digest_filename, list_digest_files, load_digest, save_digest, write_output};
pub use models::{Article, ArticleMonth, CitationRecord, EventRecord, Month, MonthBucket, YearDigest};
pub use processor::NewsProcessor;
pub use render::{DigestHtmlRenderer, DigestMarkdownRenderer, NewsPageRenderer, RenderOptions};
pub use store::{ArticleDatabase, ProcessedArticles};
pub use summarizer::{ClaudeSummarizer, FallbackSummarizer, Summarizer, SummaryService};
pub use wikipedia::{extract_digest, RawDocument, WikipediaClient};
