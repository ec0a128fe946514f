use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::wikipedia::fetch::DEFAULT_URL_PATTERN;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_TOKENS: usize = 5000;
const DEFAULT_CITATION_CHARS: usize = 120;

#[derive(Debug, Clone)]
pub struct Config {
    /// Without a key, summaries come from the offline fallback.
    pub anthropic_api_key: Option<String>,
    pub wiki_url_pattern: String,
    pub fetch_timeout: Duration,
    pub max_output_tokens: usize,
    pub citation_chars: usize,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Try to load .env from multiple locations
        Self::try_load_dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source; `from_env` passes the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let data_dir = match get("NEWS_DIGEST_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_local_dir()
                .context(
                    "Could not determine local data directory. \
                     Set NEWS_DIGEST_DATA_DIR to choose one.",
                )?
                .join("news-digest"),
        };

        Ok(Self {
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            wiki_url_pattern: get("NEWS_DIGEST_WIKI_URL")
                .unwrap_or_else(|| DEFAULT_URL_PATTERN.to_string()),
            fetch_timeout: Duration::from_secs(parse_or(
                get("NEWS_DIGEST_TIMEOUT_SECS"),
                "NEWS_DIGEST_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
            max_output_tokens: parse_or(
                get("NEWS_DIGEST_MAX_TOKENS"),
                "NEWS_DIGEST_MAX_TOKENS",
                DEFAULT_MAX_TOKENS,
            )?,
            citation_chars: parse_or(
                get("NEWS_DIGEST_CITATION_CHARS"),
                "NEWS_DIGEST_CITATION_CHARS",
                DEFAULT_CITATION_CHARS,
            )?,
            data_dir,
        })
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir.join("processed")
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join("raw")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.data_dir.join("output")
    }

    fn try_load_dotenv() {
        // Try locations in order of preference:

        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/news-digest/.env (standard config location)
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("news-digest").join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                return;
            }
        }

        // 3. ~/.env (home directory)
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() {
                let _ = dotenvy::from_path(&home_path);
            }
        }

        // If none found, that's okay - environment variables might be set system-wide
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a non-negative integer, got {:?}", key, raw)),
        None => Ok(default),
    }
}
