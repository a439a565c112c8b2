use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::pin::pin;

use chrono::Local;
use futures::future::join_all;
use futures::{FutureExt, StreamExt, stream};
use tracing::{error, info};

use crate::config::ScheduleMode;
use crate::error::TranslateError;
use crate::llm::ChatSender;
use crate::processor::FileProcessor;
use crate::state_machine::{RunStatistics, TranslationOutcome};
use crate::ui::BatchProgress;

/// Path recorded for outcomes whose task faulted before reporting its own path.
pub const UNKNOWN_PATH: &str = "unknown";

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct BatchRun {
    /// One outcome per input path, in input order.
    pub outcomes: Vec<TranslationOutcome>,
    pub stats: RunStatistics,
}

/// Drives the file processor over a whole list with bounded concurrency.
pub struct BatchCoordinator<S> {
    processor: FileProcessor<S>,
    limit: usize,
    mode: ScheduleMode,
    progress: BatchProgress,
}

impl<S: ChatSender> BatchCoordinator<S> {
    /// `limit` is clamped to at least one file in flight.
    pub fn new(processor: FileProcessor<S>, limit: usize, mode: ScheduleMode) -> Self {
        Self {
            processor,
            limit: limit.max(1),
            mode,
            progress: BatchProgress::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: BatchProgress) -> Self {
        self.progress = progress;
        self
    }

    pub async fn run(&self, paths: &[String]) -> BatchRun {
        let mut stats = RunStatistics::new(paths.len());
        let mut outcomes = Vec::with_capacity(paths.len());

        info!(
            files = paths.len(),
            concurrency = self.limit,
            mode = ?self.mode,
            "starting batch translation"
        );
        stats.begin();

        match self.mode {
            ScheduleMode::Groups => {
                for (index, group) in paths.chunks(self.limit).enumerate() {
                    info!(group = index + 1, files = group.len(), "processing group");
                    let results = join_all(group.iter().map(|p| self.guarded(p))).await;
                    for outcome in results {
                        self.record(&outcome, &mut stats);
                        outcomes.push(outcome);
                    }
                }
            }
            ScheduleMode::Pool => {
                let mut results = pin!(
                    stream::iter(paths.iter().enumerate())
                        .map(|(index, p)| self.guarded(p).map(move |o| (index, o)))
                        .buffer_unordered(self.limit)
                );
                let mut indexed = Vec::with_capacity(paths.len());
                while let Some((index, outcome)) = results.next().await {
                    self.record(&outcome, &mut stats);
                    indexed.push((index, outcome));
                }
                indexed.sort_by_key(|(index, _)| *index);
                outcomes.extend(indexed.into_iter().map(|(_, outcome)| outcome));
            }
        }

        stats.finish();
        self.progress.finish();
        info!(
            succeeded = stats.successful_count,
            skipped = stats.skipped_count,
            failed = stats.failed_count,
            "batch translation finished"
        );

        BatchRun { outcomes, stats }
    }

    fn record(&self, outcome: &TranslationOutcome, stats: &mut RunStatistics) {
        stats.record(outcome);
        self.progress.advance(outcome);
    }

    /// Run one file, turning a panic into a failed outcome.
    async fn guarded(&self, path: &str) -> TranslationOutcome {
        match AssertUnwindSafe(self.processor.process(path))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(payload) => {
                let fault = TranslateError::TaskFault(panic_message(payload.as_ref()));
                error!("task faulted: {fault}");
                TranslationOutcome::failed(UNKNOWN_PATH, Local::now(), 0, fault.to_string())
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}
