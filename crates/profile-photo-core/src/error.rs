//! Submission error taxonomy.

use std::time::Duration;

use thiserror::Error;

use crate::orchestrator::CommitStep;

/// Failures of the submission workflow.
///
/// A policy rejection is not an error; it is the `Evaluated` state with an
/// invalid verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// One or both vision secrets could not be resolved.
    #[error("configuration incomplete: missing {}", .missing.join(", "))]
    ConfigMissing {
        /// Keys that resolved to nothing.
        missing: Vec<String>,
    },

    /// The analysis backend failed.
    #[error("image analysis failed: {0}")]
    AnalysisBackend(String),

    /// The analysis backend did not answer in time.
    #[error("image analysis timed out after {}s", .0.as_secs())]
    AnalysisTimeout(Duration),

    /// At least one profile call failed. Successful calls are not rolled back.
    #[error("profile update failed ({}): {detail}", step_names(.failed_steps))]
    Commit {
        /// Calls that failed, in execution order.
        failed_steps: Vec<CommitStep>,
        /// Backend error details.
        detail: String,
    },

    /// Commit was requested while the photo was not accepted.
    #[error("cannot commit from state '{state}': only an accepted photo can be committed")]
    NotConfirmable {
        /// Name of the current state.
        state: &'static str,
    },

    /// The submission was dismissed.
    #[error("submission was dismissed")]
    Dismissed,
}

impl SubmissionError {
    /// Message suitable for showing to the end user.
    ///
    /// Backend failures get a generic message; the backend's own detail is
    /// not part of this contract.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ConfigMissing { .. } => {
                "Photo analysis is not configured for this site. Ask an administrator to set the \
                 vision API key and endpoint."
                    .to_string()
            }
            Self::AnalysisBackend(_) | Self::AnalysisTimeout(_) => {
                "Something went wrong while analyzing your photo. Please try again.".to_string()
            }
            Self::Commit { .. } => {
                "Something went wrong while updating your profile photo. Please try again."
                    .to_string()
            }
            Self::NotConfirmable { .. } => {
                "Only a photo that meets every requirement can be submitted.".to_string()
            }
            Self::Dismissed => "The submission was cancelled.".to_string(),
        }
    }
}

fn step_names(steps: &[CommitStep]) -> String {
    steps
        .iter()
        .map(|s| s.name())
        .collect::<Vec<_>>()
        .join(", ")
}
