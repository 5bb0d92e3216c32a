//! Submission spinner using indicatif.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use profile_photo_core::{SubmissionEvent, SubmissionObserver, SubmissionState};

/// Spinner that follows the orchestrator's state.
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    /// Creates a spinner; a hidden one when `show` is false.
    #[must_use]
    pub fn new(show: bool) -> Self {
        if !show {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }

    fn message(state: &SubmissionState) -> Option<&'static str> {
        match state {
            SubmissionState::Analyzing => Some("Analyzing photo..."),
            SubmissionState::Committing => Some("Updating profile..."),
            _ => None,
        }
    }
}

impl SubmissionObserver for Spinner {
    fn on_event(&self, event: SubmissionEvent) {
        let Some(bar) = &self.bar else {
            return;
        };

        match event {
            SubmissionEvent::StateChanged(state) => match Self::message(&state) {
                Some(msg) => bar.set_message(msg),
                None => bar.finish_and_clear(),
            },
            SubmissionEvent::CommitStepFinished { step, succeeded } => {
                let outcome = if succeeded { "done" } else { "failed" };
                bar.println(format!("{}: {outcome}", step.name()));
            }
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
