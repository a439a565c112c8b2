use chrono::Local;
use tracing::{debug, error, info};

use crate::error::TranslateError;
use crate::llm::ChatSender;
use crate::state_machine::{FileLifecycle, FileState, TranslationOutcome};
use crate::translator::{Translation, Translator};

/// How a file left the pipeline when nothing went wrong.
enum Finished {
    Written { translated_size: usize },
    Skipped,
}

/// Reads one file, translates it and writes the result back in place.
pub struct FileProcessor<S> {
    translator: Translator<S>,
}

impl<S: ChatSender> FileProcessor<S> {
    pub fn new(translator: Translator<S>) -> Self {
        Self { translator }
    }

    #[cfg(test)]
    pub fn translator(&self) -> &Translator<S> {
        &self.translator
    }

    /// Process one file. Every failure is folded into the returned outcome.
    pub async fn process(&self, path: &str) -> TranslationOutcome {
        let started = Local::now();
        let mut lifecycle = FileLifecycle::new();
        let mut original_size = 0;

        let result = self
            .run_stages(path, &mut lifecycle, &mut original_size)
            .await;

        let outcome = match result {
            Ok(Finished::Written { translated_size }) => {
                TranslationOutcome::translated(path, started, original_size, translated_size)
            }
            Ok(Finished::Skipped) => TranslationOutcome::skipped(path, started, original_size),
            Err(e) => {
                lifecycle.fail();
                // API failures were already logged by the translator.
                if !matches!(e, TranslateError::Api(_)) {
                    error!(file = path, "processing failed: {e}");
                }
                TranslationOutcome::failed(path, started, original_size, e.to_string())
            }
        };

        debug!(
            file = path,
            state = %lifecycle.state(),
            trail = ?lifecycle.trail(),
            "file lifecycle finished"
        );
        outcome
    }

    async fn run_stages(
        &self,
        path: &str,
        lifecycle: &mut FileLifecycle,
        original_size: &mut usize,
    ) -> Result<Finished, TranslateError> {
        match tokio::fs::try_exists(path).await {
            Ok(true) => {}
            Ok(false) => return Err(TranslateError::FileNotFound),
            Err(e) => return Err(TranslateError::FileRead(e.to_string())),
        }
        lifecycle.advance(FileState::Checked)?;

        let original = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TranslateError::FileRead(e.to_string()))?;
        *original_size = original.chars().count();
        lifecycle.advance(FileState::Read)?;

        let translation = self.translator.translate(&original, path).await?;
        lifecycle.advance(FileState::Translated)?;

        let translated = match translation {
            Translation::AlreadyTranslated => {
                lifecycle.advance(FileState::Done)?;
                return Ok(Finished::Skipped);
            }
            Translation::Text(text) => text,
        };

        tokio::fs::write(path, &translated)
            .await
            .map_err(|e| TranslateError::FileWrite(e.to_string()))?;
        lifecycle.advance(FileState::Written)?;
        info!(file = path, "translated and overwrote file");

        lifecycle.advance(FileState::Done)?;
        Ok(Finished::Written {
            translated_size: translated.chars().count(),
        })
    }
}
