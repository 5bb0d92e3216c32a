//! Mock implementations of core port traits.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use profile_photo_core::domain::{AnalysisResult, Credentials, API_KEY_ENTITY, ENDPOINT_ENTITY};
use profile_photo_core::orchestrator::CommitStep;
use profile_photo_core::ports::{
    AnalysisProvider, ConfigProvider, ProfileWriter, PropertyUpdate, SubmissionEvent,
    SubmissionObserver,
};

type Hook = Box<dyn Fn() + Send + Sync>;

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock implementation of `ConfigProvider` backed by a map.
///
/// Tracks every key looked up for assertions.
pub struct MockConfigProvider {
    values: HashMap<String, String>,
    failing: bool,
    hanging: bool,
    lookups: Arc<Mutex<Vec<String>>>,
}

impl MockConfigProvider {
    /// Creates a provider with no keys set.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            values: HashMap::new(),
            failing: false,
            hanging: false,
            lookups: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a provider with both vision keys set.
    #[must_use]
    pub fn complete() -> Self {
        Self::empty()
            .with(API_KEY_ENTITY, "test-key")
            .with(ENDPOINT_ENTITY, "https://vision.test/")
    }

    /// Creates a provider whose store is unreachable.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::empty()
        }
    }

    /// Creates a provider whose lookups never answer.
    #[must_use]
    pub fn hanging() -> Self {
        Self {
            hanging: true,
            ..Self::complete()
        }
    }

    /// Sets a key.
    #[must_use]
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    /// Returns every key looked up, in order.
    #[must_use]
    pub fn lookups(&self) -> Vec<String> {
        lock(&self.lookups).clone()
    }
}

#[async_trait]
impl ConfigProvider for MockConfigProvider {
    async fn resolve(&self, key: &str) -> anyhow::Result<Option<String>> {
        lock(&self.lookups).push(key.to_string());
        if self.failing {
            anyhow::bail!("storage unreachable");
        }
        if self.hanging {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Ok(self.values.get(key).cloned())
    }
}

enum Script {
    Return(AnalysisResult),
    Fail(String),
    Hang,
}

/// Mock implementation of `AnalysisProvider` with a scripted outcome.
///
/// Counts calls and records the API key each call received.
pub struct ScriptedAnalysisProvider {
    script: Script,
    calls: Arc<Mutex<usize>>,
    api_keys: Arc<Mutex<Vec<String>>>,
    hook: Option<Hook>,
}

impl ScriptedAnalysisProvider {
    fn new(script: Script) -> Self {
        Self {
            script,
            calls: Arc::new(Mutex::new(0)),
            api_keys: Arc::new(Mutex::new(Vec::new())),
            hook: None,
        }
    }

    /// Always returns `analysis`.
    #[must_use]
    pub fn returning(analysis: AnalysisResult) -> Self {
        Self::new(Script::Return(analysis))
    }

    /// Always fails with `message`.
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self::new(Script::Fail(message.to_string()))
    }

    /// Never answers.
    #[must_use]
    pub fn hanging() -> Self {
        Self::new(Script::Hang)
    }

    /// Runs `hook` inside every call, before the outcome is produced.
    #[must_use]
    pub fn with_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Returns the number of `analyze` calls.
    #[must_use]
    pub fn calls(&self) -> usize {
        *lock(&self.calls)
    }

    /// Returns the API keys received, one per call.
    #[must_use]
    pub fn api_keys(&self) -> Vec<String> {
        lock(&self.api_keys).clone()
    }
}

#[async_trait]
impl AnalysisProvider for ScriptedAnalysisProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn analyze(
        &self,
        _image: &[u8],
        credentials: &Credentials,
    ) -> anyhow::Result<AnalysisResult> {
        *lock(&self.calls) += 1;
        lock(&self.api_keys).push(credentials.api_key().to_string());
        if let Some(hook) = &self.hook {
            hook();
        }
        match &self.script {
            Script::Return(analysis) => Ok(analysis.clone()),
            Script::Fail(message) => Err(anyhow::anyhow!("{message}")),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                anyhow::bail!("hanging provider woke up")
            }
        }
    }
}

/// One entry in a `RecordingProfileWriter` journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileCall {
    /// A call began.
    Started(CommitStep),
    /// A call returned.
    Finished(CommitStep),
}

/// Mock implementation of `ProfileWriter` that journals every call.
pub struct RecordingProfileWriter {
    journal: Arc<Mutex<Vec<ProfileCall>>>,
    updates: Arc<Mutex<Vec<PropertyUpdate>>>,
    uploads: Arc<Mutex<Vec<Vec<u8>>>>,
    fail_property: bool,
    fail_upload: bool,
    delay: Duration,
    hook: Option<Hook>,
}

impl RecordingProfileWriter {
    /// Creates a writer where every call succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            journal: Arc::new(Mutex::new(Vec::new())),
            updates: Arc::new(Mutex::new(Vec::new())),
            uploads: Arc::new(Mutex::new(Vec::new())),
            fail_property: false,
            fail_upload: false,
            delay: Duration::ZERO,
            hook: None,
        }
    }

    /// Makes the property update fail.
    #[must_use]
    pub fn failing_property_update(mut self) -> Self {
        self.fail_property = true;
        self
    }

    /// Makes the picture upload fail.
    #[must_use]
    pub fn failing_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    /// Makes every call take `delay`.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Runs `hook` inside the property update call.
    #[must_use]
    pub fn with_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Returns the call journal.
    #[must_use]
    pub fn journal(&self) -> Vec<ProfileCall> {
        lock(&self.journal).clone()
    }

    /// Returns every property update received.
    #[must_use]
    pub fn updates(&self) -> Vec<PropertyUpdate> {
        lock(&self.updates).clone()
    }

    /// Returns every uploaded body.
    #[must_use]
    pub fn uploads(&self) -> Vec<Vec<u8>> {
        lock(&self.uploads).clone()
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for RecordingProfileWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileWriter for RecordingProfileWriter {
    async fn update_property(&self, update: &PropertyUpdate) -> anyhow::Result<()> {
        lock(&self.journal).push(ProfileCall::Started(CommitStep::PropertyUpdate));
        if let Some(hook) = &self.hook {
            hook();
        }
        self.pause().await;
        lock(&self.updates).push(update.clone());
        lock(&self.journal).push(ProfileCall::Finished(CommitStep::PropertyUpdate));
        if self.fail_property {
            anyhow::bail!("property update rejected");
        }
        Ok(())
    }

    async fn upload_picture(&self, image: &[u8]) -> anyhow::Result<()> {
        lock(&self.journal).push(ProfileCall::Started(CommitStep::PictureUpload));
        self.pause().await;
        lock(&self.uploads).push(image.to_vec());
        lock(&self.journal).push(ProfileCall::Finished(CommitStep::PictureUpload));
        if self.fail_upload {
            anyhow::bail!("upload rejected");
        }
        Ok(())
    }
}

/// Mock implementation of `SubmissionObserver` for testing.
///
/// Captures events for later assertions.
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<SubmissionEvent>>>,
}

impl RecordingObserver {
    /// Creates a new recording observer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<SubmissionEvent> {
        lock(&self.events).clone()
    }

    /// Returns the names of the states entered, in order.
    #[must_use]
    pub fn state_names(&self) -> Vec<&'static str> {
        self.events()
            .iter()
            .filter_map(|e| match e {
                SubmissionEvent::StateChanged(state) => Some(state.name()),
                SubmissionEvent::CommitStepFinished { .. } => None,
            })
            .collect()
    }

    /// Returns the commit step outcomes, in order.
    #[must_use]
    pub fn commit_steps(&self) -> Vec<(CommitStep, bool)> {
        self.events()
            .iter()
            .filter_map(|e| match e {
                SubmissionEvent::CommitStepFinished { step, succeeded } => {
                    Some((*step, *succeeded))
                }
                SubmissionEvent::StateChanged(_) => None,
            })
            .collect()
    }
}

impl Default for RecordingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionObserver for RecordingObserver {
    fn on_event(&self, event: SubmissionEvent) {
        lock(&self.events).push(event);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_config_provider() {
        let provider = MockConfigProvider::complete();
        assert_eq!(
            provider.resolve(API_KEY_ENTITY).await.unwrap().as_deref(),
            Some("test-key")
        );
        assert!(provider.resolve("other").await.unwrap().is_none());
        assert_eq!(provider.lookups(), vec![API_KEY_ENTITY, "other"]);
    }

    #[tokio::test]
    async fn test_failing_config_provider() {
        let provider = MockConfigProvider::failing();
        assert!(provider.resolve(API_KEY_ENTITY).await.is_err());
    }

    #[tokio::test]
    async fn test_scripted_provider_counts_calls() {
        let provider = ScriptedAnalysisProvider::returning(AnalysisResult::default());
        let credentials = Credentials::new("k", "https://e/");
        provider.analyze(&[1, 2, 3], &credentials).await.unwrap();
        provider.analyze(&[1, 2, 3], &credentials).await.unwrap();
        assert_eq!(provider.calls(), 2);
        assert_eq!(provider.api_keys(), vec!["k", "k"]);
    }

    #[tokio::test]
    async fn test_recording_writer_journal() {
        let writer = RecordingProfileWriter::new().failing_upload();
        writer
            .update_property(&PropertyUpdate::default())
            .await
            .unwrap();
        assert!(writer.upload_picture(&[9]).await.is_err());

        assert_eq!(
            writer.journal(),
            vec![
                ProfileCall::Started(CommitStep::PropertyUpdate),
                ProfileCall::Finished(CommitStep::PropertyUpdate),
                ProfileCall::Started(CommitStep::PictureUpload),
                ProfileCall::Finished(CommitStep::PictureUpload),
            ]
        );
        assert_eq!(writer.uploads(), vec![vec![9]]);
    }
}
