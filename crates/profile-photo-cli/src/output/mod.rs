//! Output formatting for CLI.

mod progress;
mod report;

pub use progress::Spinner;
pub use report::{ReportWriter, SubmissionOutcome};
