mod outcome;
mod state;

pub use outcome::{RunStatistics, TranslationOutcome};
pub use state::{FileLifecycle, FileState};
