//! Offline smoke test behind `hanhua test`. Never talks to the API.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result, ensure};

use crate::config::HanhuaConfig;
use crate::error::TranslateError;
use crate::file_list::load_file_list;
use crate::llm::ChatClient;
use crate::processor::FileProcessor;
use crate::translator::Translator;
use crate::ui::print_check;

/// Deletes the wrapped file when dropped.
struct ScratchFile(PathBuf);

impl Drop for ScratchFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn scratch_path(name: &str) -> PathBuf {
    static SEQ: AtomicUsize = AtomicUsize::new(0);
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "hanhua-selftest-{}-{seq}-{name}",
        std::process::id()
    ))
}

pub async fn run(config: &HanhuaConfig) -> Result<()> {
    println!("Running translator self-test...");

    let client = ChatClient::from_config(config)?;
    let base_url = config.base_url.trim_end_matches('/');
    ensure!(client.base_url() == base_url, "client endpoint mismatch");
    let translator = Translator::new(client, config);
    ensure!(translator.model() == config.model, "translator model mismatch");
    let processor = FileProcessor::new(translator);
    print_check(
        1,
        "translator construction",
        &format!("endpoint {base_url}, model {}", config.model),
    );

    let missing = scratch_path("missing.md");
    ensure!(!missing.exists(), "{} unexpectedly exists", missing.display());
    let outcome = processor.process(&missing.to_string_lossy()).await;
    ensure!(
        !outcome.success && outcome.error == TranslateError::FileNotFound.to_string(),
        "missing file was not reported: {outcome:?}"
    );
    print_check(2, "missing file detection", "reported as file not found");

    let empty = ScratchFile(scratch_path("empty.md"));
    std::fs::write(&empty.0, "")
        .with_context(|| format!("cannot create {}", empty.0.display()))?;
    let outcome = processor.process(&empty.0.to_string_lossy()).await;
    ensure!(
        outcome.success && !outcome.skipped,
        "empty file failed: {}",
        outcome.error
    );
    ensure!(std::fs::read_to_string(&empty.0)?.is_empty(), "empty file was modified");
    let empty_path = empty.0.clone();
    drop(empty);
    ensure!(!empty_path.exists(), "scratch file was not cleaned up");
    print_check(3, "empty file round trip", "no request sent, file unchanged and removed");

    let list = Path::new(&config.files_list);
    let paths = load_file_list(list)?;
    ensure!(!paths.is_empty(), "{} contains no file paths", list.display());
    print_check(
        4,
        "file list loading",
        &format!("{} contains {} paths", list.display(), paths.len()),
    );

    println!();
    println!("All checks passed.");
    Ok(())
}
