use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::HanhuaConfig;
use crate::state_machine::{RunStatistics, TranslationOutcome};
use crate::ui;

/// Contents of `translation_result.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultDocument {
    pub stats: RunStatistics,
    pub results: Vec<TranslationOutcome>,
    pub timestamp: DateTime<Local>,
}

/// Contents of `translation_errors.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDocument {
    pub error_count: usize,
    pub errors: Vec<TranslationOutcome>,
    pub timestamp: DateTime<Local>,
}

/// Where a report ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub result_file: PathBuf,
    /// Only set when at least one file failed.
    pub errors_file: Option<PathBuf>,
}

/// Persists run results and prints the closing summary.
pub struct Reporter {
    result_file: PathBuf,
    errors_file: PathBuf,
}

impl Reporter {
    pub fn new(result_file: impl Into<PathBuf>, errors_file: impl Into<PathBuf>) -> Self {
        Self {
            result_file: result_file.into(),
            errors_file: errors_file.into(),
        }
    }

    pub fn from_config(config: &HanhuaConfig) -> Self {
        Self::new(&config.result_file, &config.errors_file)
    }

    /// Fill in the run duration, write the result documents and print the summary.
    pub fn report(
        &self,
        outcomes: &[TranslationOutcome],
        stats: &mut RunStatistics,
    ) -> Result<ReportSummary> {
        stats.duration_seconds = stats.elapsed_seconds();

        let document = ResultDocument {
            stats: stats.clone(),
            results: outcomes.to_vec(),
            timestamp: Local::now(),
        };
        write_json(&self.result_file, &document)?;

        let errors_file = if stats.has_failures() {
            let errors = ErrorDocument {
                error_count: stats.error_list.len(),
                errors: stats.error_list.clone(),
                timestamp: Local::now(),
            };
            write_json(&self.errors_file, &errors)?;
            Some(self.errors_file.clone())
        } else {
            None
        };

        info!(
            total = stats.total_files,
            succeeded = stats.successful_count,
            skipped = stats.skipped_count,
            failed = stats.failed_count,
            "results written to {}",
            self.result_file.display()
        );

        let errors_display = errors_file.as_ref().map(|p| p.display().to_string());
        ui::print_summary(
            stats,
            &self.result_file.display().to_string(),
            errors_display.as_deref(),
        );

        Ok(ReportSummary {
            result_file: self.result_file.clone(),
            errors_file,
        })
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
