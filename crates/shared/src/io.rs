use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::digest_file::DigestFile;
use crate::models::YearDigest;

/// Create `dir` if needed and hand it back.
pub fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    Ok(dir.to_path_buf())
}

pub fn digest_filename(year: i32) -> String {
    format!("wikipedia_{}_events.json", year)
}

/// Save a digest as pretty JSON under `dir`.
pub fn save_digest(digest: &YearDigest, dir: &Path) -> Result<PathBuf> {
    let dir = ensure_dir(dir)?;
    let filepath = dir.join(digest_filename(digest.year));

    let json = serde_json::to_string_pretty(&DigestFile::from(digest))
        .context("Failed to serialize digest")?;

    fs::write(&filepath, json).context("Failed to write digest file")?;

    Ok(filepath)
}

/// Load a digest written by [`save_digest`].
pub fn load_digest(filepath: &Path) -> Result<YearDigest> {
    if !filepath.exists() {
        anyhow::bail!("Digest file not found: {}", filepath.display());
    }

    let content = fs::read_to_string(filepath)
        .with_context(|| format!("Failed to read digest file: {}", filepath.display()))?;

    let file: DigestFile = serde_json::from_str(&content).with_context(|| {
        format!(
            "Failed to parse digest JSON from {}. The file may be corrupted or not a digest file.",
            filepath.display()
        )
    })?;

    file.into_digest()
        .with_context(|| format!("Invalid digest file: {}", filepath.display()))
}

/// Every loadable digest in `dir`, most recently generated first.
pub fn list_digest_files(dir: &Path) -> Result<Vec<(PathBuf, YearDigest)>> {
    let mut files = Vec::new();

    if dir.exists() {
        for entry in fs::read_dir(dir).context("Failed to read digest directory")? {
            let path = entry?.path();
            let is_digest = path
                .file_name()
                .and_then(|s| s.to_str())
                .map(|name| name.starts_with("wikipedia_") && name.ends_with("_events.json"))
                .unwrap_or(false);
            if !is_digest {
                continue;
            }

            match load_digest(&path) {
                Ok(digest) => files.push((path, digest)),
                Err(e) => warn!("Could not load {}: {:#}", path.display(), e),
            }
        }
    }

    files.sort_by(|a, b| b.1.generated_at.cmp(&a.1.generated_at));

    Ok(files)
}

/// Write a rendered document to `dir/filename`.
pub fn write_output(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let dir = ensure_dir(dir)?;
    let filepath = dir.join(filename);

    fs::write(&filepath, content)
        .with_context(|| format!("Failed to write {}", filepath.display()))?;

    Ok(filepath)
}
