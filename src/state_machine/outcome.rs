use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// The recorded result of attempting to translate one file.
///
/// Serialized field names match the `translation_result.json` layout, so
/// existing tooling that reads those documents keeps working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationOutcome {
    pub file_path: String,
    pub success: bool,
    pub skipped: bool,
    /// Empty when there is no error.
    pub error: String,
    pub timestamp: DateTime<Local>,
    /// Size of the original content in characters.
    pub original_size: usize,
    /// Size of the written content in characters; 0 unless the file was rewritten.
    pub translated_size: usize,
}

impl TranslationOutcome {
    pub fn translated(
        file_path: &str,
        timestamp: DateTime<Local>,
        original_size: usize,
        translated_size: usize,
    ) -> Self {
        Self {
            file_path: file_path.to_string(),
            success: true,
            skipped: false,
            error: String::new(),
            timestamp,
            original_size,
            translated_size,
        }
    }

    pub fn skipped(file_path: &str, timestamp: DateTime<Local>, original_size: usize) -> Self {
        Self {
            file_path: file_path.to_string(),
            success: true,
            skipped: true,
            error: String::new(),
            timestamp,
            original_size,
            translated_size: 0,
        }
    }

    pub fn failed(
        file_path: &str,
        timestamp: DateTime<Local>,
        original_size: usize,
        error: impl Into<String>,
    ) -> Self {
        let mut error = error.into();
        if error.is_empty() {
            error = "unknown error".to_string();
        }
        Self {
            file_path: file_path.to_string(),
            success: false,
            skipped: false,
            error,
            timestamp,
            original_size,
            translated_size: 0,
        }
    }

    pub fn is_failure(&self) -> bool {
        !self.success && !self.skipped
    }
}

/// Aggregate counters for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub total_files: usize,
    #[serde(rename = "successful_translations")]
    pub successful_count: usize,
    #[serde(rename = "failed_translations")]
    pub failed_count: usize,
    #[serde(rename = "skipped_files")]
    pub skipped_count: usize,
    pub start_time: Option<DateTime<Local>>,
    pub end_time: Option<DateTime<Local>>,
    #[serde(rename = "errors")]
    pub error_list: Vec<TranslationOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
}

impl RunStatistics {
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            ..Default::default()
        }
    }

    pub fn begin(&mut self) {
        self.start_time = Some(Local::now());
    }

    pub fn finish(&mut self) {
        self.end_time = Some(Local::now());
    }

    /// Count one resolved task.
    pub fn record(&mut self, outcome: &TranslationOutcome) {
        if outcome.skipped {
            self.skipped_count += 1;
        } else if outcome.success {
            self.successful_count += 1;
        } else {
            self.failed_count += 1;
            self.error_list.push(outcome.clone());
        }
    }

    /// Seconds between start and end, when both are known.
    pub fn elapsed_seconds(&self) -> Option<f64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => {
                Some((end - start).num_microseconds().unwrap_or(0) as f64 / 1_000_000.0)
            }
            _ => None,
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.error_list.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_hold_outcome_invariants() {
        let now = Local::now();
        let ok = TranslationOutcome::translated("a.md", now, 10, 8);
        assert!(ok.success && !ok.skipped && ok.error.is_empty());

        let skip = TranslationOutcome::skipped("b.md", now, 10);
        assert!(skip.success && skip.skipped);
        assert_eq!(skip.translated_size, 0);

        let fail = TranslationOutcome::failed("c.md", now, 0, "");
        assert!(!fail.success);
        assert!(!fail.error.is_empty());
        assert!(fail.is_failure());
    }

    #[test]
    fn record_routes_to_counters() {
        let now = Local::now();
        let mut stats = RunStatistics::new(4);
        stats.record(&TranslationOutcome::translated("a.md", now, 1, 1));
        stats.record(&TranslationOutcome::skipped("b.md", now, 1));
        stats.record(&TranslationOutcome::failed("c.md", now, 0, "file not found"));
        stats.record(&TranslationOutcome::failed("d.md", now, 0, "read error: x"));

        assert_eq!(stats.successful_count, 1);
        assert_eq!(stats.skipped_count, 1);
        assert_eq!(stats.failed_count, 2);
        assert_eq!(stats.error_list.len(), 2);
        assert_eq!(stats.error_list[0].file_path, "c.md");
        assert!(
            stats.successful_count + stats.skipped_count + stats.failed_count <= stats.total_files
        );
    }

    #[test]
    fn elapsed_needs_both_ends() {
        let mut stats = RunStatistics::new(0);
        assert_eq!(stats.elapsed_seconds(), None);
        stats.begin();
        assert_eq!(stats.elapsed_seconds(), None);
        stats.finish();
        assert!(stats.elapsed_seconds().unwrap() >= 0.0);
    }

    #[test]
    fn stats_serialize_with_legacy_keys() {
        let mut stats = RunStatistics::new(2);
        stats.record(&TranslationOutcome::failed("x.md", Local::now(), 0, "file not found"));
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["total_files"], 2);
        assert_eq!(value["failed_translations"], 1);
        assert_eq!(value["successful_translations"], 0);
        assert_eq!(value["skipped_files"], 0);
        assert_eq!(value["errors"][0]["file_path"], "x.md");
        assert!(value.get("duration_seconds").is_none());
    }
}
