//! Submission states.

use serde::{Deserialize, Serialize};

use crate::domain::{AnalysisResult, Verdict};
use crate::error::SubmissionError;

/// One of the two sequential profile calls made on commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitStep {
    /// Single-value profile property update.
    PropertyUpdate,
    /// Binary profile picture upload.
    PictureUpload,
}

impl CommitStep {
    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PropertyUpdate => "property update",
            Self::PictureUpload => "picture upload",
        }
    }
}

/// An analysis and the verdict derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Backend analysis.
    pub analysis: AnalysisResult,
    /// Policy verdict.
    pub verdict: Verdict,
}

/// State of one submission attempt.
///
/// `Blocked`, `AnalysisFailed`, an invalid `Evaluated`, `Committed` and
/// `CommitFailed` are terminal for the attempt; a new `submit` starts over.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmissionState {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// Resolving configuration and waiting for the analysis backend.
    Analyzing,
    /// Configuration incomplete; the backend was never called.
    Blocked(SubmissionError),
    /// The analysis backend failed or timed out.
    AnalysisFailed(SubmissionError),
    /// Analysis evaluated against the policy.
    Evaluated(Evaluation),
    /// Profile calls in flight.
    Committing,
    /// Both profile calls succeeded.
    Committed,
    /// At least one profile call failed.
    CommitFailed(SubmissionError),
}

impl SubmissionState {
    /// Short state name for logs and reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Analyzing => "analyzing",
            Self::Blocked(_) => "blocked",
            Self::AnalysisFailed(_) => "analysis_failed",
            Self::Evaluated(e) if e.verdict.is_valid => "valid",
            Self::Evaluated(_) => "invalid",
            Self::Committing => "committing",
            Self::Committed => "committed",
            Self::CommitFailed(_) => "commit_failed",
        }
    }

    /// Returns the evaluation, if analysis completed.
    #[must_use]
    pub const fn evaluation(&self) -> Option<&Evaluation> {
        match self {
            Self::Evaluated(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the verdict, if analysis completed.
    #[must_use]
    pub fn verdict(&self) -> Option<&Verdict> {
        self.evaluation().map(|e| &e.verdict)
    }

    /// Returns the failure carried by an error state.
    #[must_use]
    pub const fn failure(&self) -> Option<&SubmissionError> {
        match self {
            Self::Blocked(e) | Self::AnalysisFailed(e) | Self::CommitFailed(e) => Some(e),
            _ => None,
        }
    }

    /// Returns true if the photo passed the policy and awaits confirmation.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.verdict().is_some_and(|v| v.is_valid)
    }

    /// Returns true if no further transition can happen without a new submit.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Idle | Self::Analyzing | Self::Committing => false,
            Self::Evaluated(e) => !e.verdict.is_valid,
            Self::Blocked(_)
            | Self::AnalysisFailed(_)
            | Self::Committed
            | Self::CommitFailed(_) => true,
        }
    }
}
