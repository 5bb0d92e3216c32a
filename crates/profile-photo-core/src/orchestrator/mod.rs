//! Submission workflow state machine.
//!
//! `Idle -> Analyzing -> Evaluated(valid | invalid) -> Committing ->
//! Committed | CommitFailed`, with `Blocked` and `AnalysisFailed` as early
//! exits. Nothing is retried automatically: every failure is terminal for
//! the attempt and a new [`SubmissionOrchestrator::submit`] starts over.

mod session;
mod state;

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::{AnalysisResult, Policy, SubmittedImage};
use crate::error::SubmissionError;
use crate::evaluator::evaluate;
use crate::ports::{NoopObserver, PropertyUpdate, SubmissionEvent, SubmissionObserver};

pub use session::SessionContext;
pub use state::{CommitStep, Evaluation, SubmissionState};

/// Default bound on a single analysis call.
pub const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(30);

/// Default bound on each configuration lookup.
pub const DEFAULT_CONFIG_TIMEOUT: Duration = Duration::from_secs(10);

/// Default bound on each of the two profile calls.
pub const DEFAULT_COMMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Callback invoked once a photo has been committed.
pub type CompletionCallback = Box<dyn Fn() + Send + Sync>;

/// Cancels a submission from outside the task driving it.
///
/// In-flight calls are allowed to finish, but their results are discarded
/// and the orchestrator state no longer changes.
#[derive(Debug, Clone, Default)]
pub struct DismissHandle(Arc<AtomicBool>);

impl DismissHandle {
    /// Marks the submission as dismissed.
    pub fn dismiss(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true once dismissed.
    #[must_use]
    pub fn is_dismissed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Drives one user's photo submissions for the length of a session.
pub struct SubmissionOrchestrator {
    session: SessionContext,
    state: SubmissionState,
    /// Image awaiting confirmation; only set while the state is accepted.
    pending: Option<SubmittedImage>,
    observer: Arc<dyn SubmissionObserver>,
    analysis_timeout: Duration,
    config_timeout: Duration,
    commit_timeout: Duration,
    property_update: PropertyUpdate,
    on_complete: Option<CompletionCallback>,
    dismissed: DismissHandle,
}

impl SubmissionOrchestrator {
    /// Creates an idle orchestrator over a session.
    #[must_use]
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            state: SubmissionState::Idle,
            pending: None,
            observer: Arc::new(NoopObserver),
            analysis_timeout: DEFAULT_ANALYSIS_TIMEOUT,
            config_timeout: DEFAULT_CONFIG_TIMEOUT,
            commit_timeout: DEFAULT_COMMIT_TIMEOUT,
            property_update: PropertyUpdate::default(),
            on_complete: None,
            dismissed: DismissHandle::default(),
        }
    }

    /// Sets the observer notified of every transition.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SubmissionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Sets the bound on the analysis call.
    #[must_use]
    pub fn with_analysis_timeout(mut self, timeout: Duration) -> Self {
        self.analysis_timeout = timeout;
        self
    }

    /// Sets the bound on each configuration lookup. A lookup that times out
    /// counts as a missing key.
    #[must_use]
    pub fn with_config_timeout(mut self, timeout: Duration) -> Self {
        self.config_timeout = timeout;
        self
    }

    /// Sets the bound on each profile call. A call that times out is a
    /// failed commit step.
    #[must_use]
    pub fn with_commit_timeout(mut self, timeout: Duration) -> Self {
        self.commit_timeout = timeout;
        self
    }

    /// Sets the profile property written before the picture upload.
    #[must_use]
    pub fn with_property_update(mut self, update: PropertyUpdate) -> Self {
        self.property_update = update;
        self
    }

    /// Sets the callback invoked after a successful commit.
    #[must_use]
    pub fn with_completion(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Shares an existing dismiss handle, e.g. one owned by the UI.
    #[must_use]
    pub fn with_dismiss_handle(mut self, handle: DismissHandle) -> Self {
        self.dismissed = handle;
        self
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// The session this orchestrator runs in.
    #[must_use]
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Returns a handle that can dismiss this orchestrator from another task.
    #[must_use]
    pub fn dismiss_handle(&self) -> DismissHandle {
        self.dismissed.clone()
    }

    /// Dismisses the submission UI.
    pub fn dismiss(&self) {
        self.dismissed.dismiss();
    }

    /// Returns true once dismissed.
    #[must_use]
    pub fn is_dismissed(&self) -> bool {
        self.dismissed.is_dismissed()
    }

    /// Ends the session, dropping cached credentials.
    pub fn end_session(&mut self) {
        self.pending = None;
        self.session.end();
    }

    /// Submits an image: resolves credentials, analyzes, evaluates.
    ///
    /// Never fails: every outcome, including backend failures, is reported
    /// as the returned state. Any previous attempt is discarded.
    pub async fn submit(&mut self, image: SubmittedImage, policy: &Policy) -> &SubmissionState {
        self.pending = None;
        if !self.transition(SubmissionState::Analyzing) {
            return &self.state;
        }
        info!("Submitting {} ({} bytes)", image.source, image.len());

        if let Err(err) = self.session.ensure_credentials(self.config_timeout).await {
            warn!("Submission blocked: {err}");
            self.transition(SubmissionState::Blocked(err));
            return &self.state;
        }

        let analysis = match self.run_analysis(&image).await {
            Ok(analysis) => analysis,
            Err(err) => {
                warn!("{err}");
                self.transition(SubmissionState::AnalysisFailed(err));
                return &self.state;
            }
        };

        let verdict = evaluate(&analysis, policy);
        let accepted = verdict.is_valid;
        if !accepted {
            info!(
                "Photo rejected, failed criteria: {:?}",
                verdict.failed_criteria()
            );
        }

        if self.transition(SubmissionState::Evaluated(Evaluation { analysis, verdict }))
            && accepted
        {
            self.pending = Some(image);
        }
        &self.state
    }

    /// Commits an accepted photo: property update, then picture upload.
    ///
    /// The calls run strictly in sequence and are best-effort: a failed
    /// property update does not prevent the upload and nothing is rolled
    /// back. Any failure ends in `CommitFailed`.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::NotConfirmable`] unless the current state
    /// is an accepted evaluation, and [`SubmissionError::Dismissed`] after
    /// dismissal. Backend failures are reported through the state instead.
    pub async fn confirm(&mut self) -> Result<&SubmissionState, SubmissionError> {
        if self.is_dismissed() {
            return Err(SubmissionError::Dismissed);
        }
        if !self.state.is_accepted() {
            return Err(SubmissionError::NotConfirmable {
                state: self.state.name(),
            });
        }
        let Some(image) = self.pending.take() else {
            return Err(SubmissionError::NotConfirmable {
                state: self.state.name(),
            });
        };

        if !self.transition(SubmissionState::Committing) {
            return Err(SubmissionError::Dismissed);
        }

        let mut failed_steps = Vec::new();
        let mut details = Vec::new();

        let profile = self.session.profile();
        let property = bounded(
            self.commit_timeout,
            profile.update_property(&self.property_update),
        )
        .await;
        if let Err(e) = &property {
            warn!("Profile property update failed: {e:#}");
            failed_steps.push(CommitStep::PropertyUpdate);
            details.push(format!("{e:#}"));
        }
        self.emit(SubmissionEvent::CommitStepFinished {
            step: CommitStep::PropertyUpdate,
            succeeded: property.is_ok(),
        });

        let upload = bounded(self.commit_timeout, profile.upload_picture(&image.bytes)).await;
        if let Err(e) = &upload {
            warn!("Profile picture upload failed: {e:#}");
            failed_steps.push(CommitStep::PictureUpload);
            details.push(format!("{e:#}"));
        }
        self.emit(SubmissionEvent::CommitStepFinished {
            step: CommitStep::PictureUpload,
            succeeded: upload.is_ok(),
        });

        if failed_steps.is_empty() {
            if self.transition(SubmissionState::Committed) {
                if let Some(callback) = &self.on_complete {
                    callback();
                }
            }
        } else {
            self.transition(SubmissionState::CommitFailed(SubmissionError::Commit {
                failed_steps,
                detail: details.join("; "),
            }));
        }

        Ok(&self.state)
    }

    async fn run_analysis(
        &self,
        image: &SubmittedImage,
    ) -> Result<AnalysisResult, SubmissionError> {
        let call = self.session.analyze(&image.bytes);
        match tokio::time::timeout(self.analysis_timeout, call).await {
            Ok(Ok(analysis)) => Ok(analysis),
            Ok(Err(e)) => Err(SubmissionError::AnalysisBackend(format!("{e:#}"))),
            Err(_) => Err(SubmissionError::AnalysisTimeout(self.analysis_timeout)),
        }
    }

    /// Moves to `next` unless dismissed. Returns whether the move happened.
    fn transition(&mut self, next: SubmissionState) -> bool {
        if self.is_dismissed() {
            debug!(
                "Dismissed, discarding transition {} -> {}",
                self.state.name(),
                next.name()
            );
            return false;
        }
        info!("Submission {} -> {}", self.state.name(), next.name());
        self.state = next;
        self.observer.on_event(SubmissionEvent::StateChanged(self.state.clone()));
        true
    }

    fn emit(&self, event: SubmissionEvent) {
        if !self.is_dismissed() {
            self.observer.on_event(event);
        }
    }
}

/// Runs a profile call, failing it once `timeout` has passed.
async fn bounded<F>(timeout: Duration, call: F) -> anyhow::Result<()>
where
    F: Future<Output = anyhow::Result<()>>,
{
    tokio::time::timeout(timeout, call)
        .await
        .unwrap_or_else(|_| Err(anyhow::anyhow!("timed out after {timeout:?}")))
}
