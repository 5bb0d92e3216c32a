//! Submission progress port for UI integration.

use crate::orchestrator::{CommitStep, SubmissionState};

/// Events emitted while a submission moves through its states.
#[derive(Debug, Clone)]
pub enum SubmissionEvent {
    /// The orchestrator entered a new state.
    StateChanged(SubmissionState),
    /// A commit call finished.
    CommitStepFinished {
        /// Which call finished.
        step: CommitStep,
        /// Whether it succeeded.
        succeeded: bool,
    },
}

/// Port for receiving submission events.
pub trait SubmissionObserver: Send + Sync {
    /// Called for every event, in order.
    fn on_event(&self, event: SubmissionEvent);
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SubmissionObserver for NoopObserver {
    fn on_event(&self, _event: SubmissionEvent) {}
}
