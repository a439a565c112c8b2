use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::{debug, info};

/// Load the JSON array of paths to translate.
///
/// Entries that are not strings, or are blank, are dropped; the rest are
/// trimmed. A missing file, invalid JSON or a non-array document is an error.
pub fn load_file_list(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("file list not found or unreadable: {}", path.display()))?;
    let paths = parse_file_list(&contents)
        .with_context(|| format!("invalid file list: {}", path.display()))?;
    info!(count = paths.len(), "loaded file list from {}", path.display());
    Ok(paths)
}

pub fn parse_file_list(contents: &str) -> Result<Vec<String>> {
    let value: Value = serde_json::from_str(contents)?;
    let Value::Array(entries) = value else {
        bail!("expected a JSON array of file paths");
    };

    let total = entries.len();
    let paths: Vec<String> = entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
        .collect();

    if paths.len() < total {
        debug!(dropped = total - paths.len(), "ignored invalid file list entries");
    }
    Ok(paths)
}
