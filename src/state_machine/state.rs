use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::TranslateError;

/// The stages a single file goes through.
///
/// NOT_STARTED → CHECKED → READ → TRANSLATED → WRITTEN → DONE, with a
/// shortcut TRANSLATED → DONE for files the model reports as already
/// translated, and FAILED reachable from every non-terminal stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileState {
    NotStarted,
    Checked,
    Read,
    Translated,
    Written,
    Done,
    Failed,
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileState::NotStarted => write!(f, "NOT_STARTED"),
            FileState::Checked => write!(f, "CHECKED"),
            FileState::Read => write!(f, "READ"),
            FileState::Translated => write!(f, "TRANSLATED"),
            FileState::Written => write!(f, "WRITTEN"),
            FileState::Done => write!(f, "DONE"),
            FileState::Failed => write!(f, "FAILED"),
        }
    }
}

impl FileState {
    pub fn is_terminal(self) -> bool {
        matches!(self, FileState::Done | FileState::Failed)
    }

    /// Whether `self → next` is an edge of the lifecycle graph.
    pub fn can_advance_to(self, next: FileState) -> bool {
        use FileState::*;
        match (self, next) {
            (from, Failed) => !from.is_terminal(),
            (NotStarted, Checked)
            | (Checked, Read)
            | (Read, Translated)
            | (Translated, Written)
            | (Translated, Done)
            | (Written, Done) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal file state transition {from} -> {to}")]
pub struct IllegalTransition {
    pub from: FileState,
    pub to: FileState,
}

impl From<IllegalTransition> for TranslateError {
    fn from(err: IllegalTransition) -> Self {
        TranslateError::TaskFault(err.to_string())
    }
}

/// Tracks where one file is in its lifecycle.
#[derive(Debug, Clone)]
pub struct FileLifecycle {
    state: FileState,
    history: Vec<FileState>,
}

impl FileLifecycle {
    pub fn new() -> Self {
        Self {
            state: FileState::NotStarted,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> FileState {
        self.state
    }

    /// All states visited so far, including the current one.
    pub fn trail(&self) -> Vec<FileState> {
        let mut trail = self.history.clone();
        trail.push(self.state);
        trail
    }

    pub fn advance(&mut self, next: FileState) -> Result<(), IllegalTransition> {
        if !self.state.can_advance_to(next) {
            return Err(IllegalTransition {
                from: self.state,
                to: next,
            });
        }
        self.history.push(self.state);
        self.state = next;
        Ok(())
    }

    /// Move to FAILED. A lifecycle that already ended is left alone.
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.history.push(self.state);
            self.state = FileState::Failed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_walks_all_states() {
        let mut lc = FileLifecycle::new();
        for next in [
            FileState::Checked,
            FileState::Read,
            FileState::Translated,
            FileState::Written,
            FileState::Done,
        ] {
            lc.advance(next).unwrap();
            assert_eq!(lc.state(), next);
        }
        assert_eq!(
            lc.trail(),
            vec![
                FileState::NotStarted,
                FileState::Checked,
                FileState::Read,
                FileState::Translated,
                FileState::Written,
                FileState::Done,
            ]
        );
    }

    #[test]
    fn already_translated_skips_written() {
        let mut lc = FileLifecycle::new();
        lc.advance(FileState::Checked).unwrap();
        lc.advance(FileState::Read).unwrap();
        lc.advance(FileState::Translated).unwrap();
        lc.advance(FileState::Done).unwrap();
        assert!(lc.state().is_terminal());
    }

    #[test]
    fn skipping_a_stage_is_rejected() {
        let mut lc = FileLifecycle::new();
        let err = lc.advance(FileState::Read).unwrap_err();
        assert_eq!(
            err,
            IllegalTransition {
                from: FileState::NotStarted,
                to: FileState::Read
            }
        );
        assert_eq!(lc.state(), FileState::NotStarted);
        assert_eq!(
            err.to_string(),
            "illegal file state transition NOT_STARTED -> READ"
        );
    }

    #[test]
    fn fail_from_any_open_state() {
        let mut lc = FileLifecycle::new();
        lc.advance(FileState::Checked).unwrap();
        lc.fail();
        assert_eq!(lc.state(), FileState::Failed);
        assert_eq!(lc.trail(), vec![FileState::NotStarted, FileState::Checked, FileState::Failed]);
    }

    #[test]
    fn terminal_states_are_final() {
        let mut lc = FileLifecycle::new();
        lc.fail();
        lc.fail();
        assert_eq!(lc.trail().len(), 2);
        assert!(lc.advance(FileState::Checked).is_err());
        assert!(!FileState::Done.can_advance_to(FileState::Failed));
    }

    #[test]
    fn illegal_transition_becomes_task_fault() {
        let err: TranslateError = IllegalTransition {
            from: FileState::Done,
            to: FileState::Written,
        }
        .into();
        assert!(matches!(err, TranslateError::TaskFault(_)));
    }
}
