//! Image analysis port.

use async_trait::async_trait;

use crate::domain::{AnalysisResult, Credentials};

/// Port for analyzing image bytes with a vision backend.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Returns the name of this provider, for logging.
    fn name(&self) -> &'static str;

    /// Analyzes an encoded image.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or answers with a
    /// failure or an unreadable response.
    async fn analyze(
        &self,
        image: &[u8],
        credentials: &Credentials,
    ) -> anyhow::Result<AnalysisResult>;
}
