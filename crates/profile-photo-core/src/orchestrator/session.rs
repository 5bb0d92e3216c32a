//! Session-scoped context: injected ports plus cached credentials.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{debug, warn};

use crate::domain::{AnalysisResult, Credentials, API_KEY_ENTITY, ENDPOINT_ENTITY};
use crate::error::SubmissionError;
use crate::ports::{AnalysisProvider, ConfigProvider, ProfileWriter};

/// Everything one editing session needs to talk to the outside world.
///
/// Credentials are resolved on first use and reused for the rest of the
/// session. They are read-only once resolved and dropped by [`end`].
///
/// [`end`]: SessionContext::end
pub struct SessionContext {
    config: Arc<dyn ConfigProvider>,
    analysis: Arc<dyn AnalysisProvider>,
    profile: Arc<dyn ProfileWriter>,
    credentials: Option<Credentials>,
}

impl SessionContext {
    /// Creates a session over the given ports.
    pub fn new(
        config: Arc<dyn ConfigProvider>,
        analysis: Arc<dyn AnalysisProvider>,
        profile: Arc<dyn ProfileWriter>,
    ) -> Self {
        Self {
            config,
            analysis,
            profile,
            credentials: None,
        }
    }

    /// Returns true once credentials have been resolved.
    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Drops the cached credentials. The next submission resolves them again.
    pub fn end(&mut self) {
        if self.credentials.take().is_some() {
            debug!("Session ended, credentials dropped");
        }
    }

    /// Resolves the API key and endpoint unless already cached.
    ///
    /// Both keys are looked up before deciding, so the error names every
    /// missing key. A store failure, or a lookup that takes longer than
    /// `timeout`, counts as a missing key.
    pub(crate) async fn ensure_credentials(
        &mut self,
        timeout: Duration,
    ) -> Result<(), SubmissionError> {
        if self.credentials.is_some() {
            return Ok(());
        }

        let key = self.lookup(API_KEY_ENTITY, timeout).await;
        let endpoint = self.lookup(ENDPOINT_ENTITY, timeout).await;

        match (key, endpoint) {
            (Some(key), Some(endpoint)) => {
                debug!("Vision credentials resolved");
                self.credentials = Some(Credentials::new(key, endpoint));
                Ok(())
            }
            (key, endpoint) => {
                let mut missing = Vec::new();
                if key.is_none() {
                    missing.push(API_KEY_ENTITY.to_string());
                }
                if endpoint.is_none() {
                    missing.push(ENDPOINT_ENTITY.to_string());
                }
                Err(SubmissionError::ConfigMissing { missing })
            }
        }
    }

    /// Runs the analysis provider with the cached credentials.
    pub(crate) async fn analyze(&self, image: &[u8]) -> anyhow::Result<AnalysisResult> {
        let credentials = self
            .credentials
            .as_ref()
            .context("credentials not resolved")?;
        debug!(
            "Sending {} bytes to analysis provider {}",
            image.len(),
            self.analysis.name()
        );
        self.analysis.analyze(image, credentials).await
    }

    pub(crate) fn profile(&self) -> &dyn ProfileWriter {
        self.profile.as_ref()
    }

    async fn lookup(&self, key: &str, timeout: Duration) -> Option<String> {
        match tokio::time::timeout(timeout, self.config.resolve(key)).await {
            Ok(Ok(Some(value))) if !value.trim().is_empty() => Some(value),
            Ok(Ok(_)) => {
                warn!("Configuration key '{key}' is not set");
                None
            }
            Ok(Err(e)) => {
                warn!("Configuration lookup for '{key}' failed: {e:#}");
                None
            }
            Err(_) => {
                warn!("Configuration lookup for '{key}' timed out after {timeout:?}");
                None
            }
        }
    }
}
