//! Image analysis clients.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use profile_photo_core::domain::{
    AnalysisResult, Caption, Category, Description, Face, Tag, PORTRAIT_CATEGORY,
};
use profile_photo_core::{AnalysisProvider, Credentials};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use crate::site::REQUEST_TIMEOUT;

/// Vision API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "v3.2";

/// Features requested from the analysis backend.
pub const VISUAL_FEATURES: &str =
    "Categories,Adult,Tags,Description,Faces,Color,ImageType,Objects";

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Live client for the vision analysis endpoint.
#[derive(Debug, Clone)]
pub struct VisionClient {
    client: Client,
    api_version: String,
}

impl VisionClient {
    /// Creates a client for the given API version.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_version: &str) -> Result<Self> {
        Self::with_timeout(api_version, REQUEST_TIMEOUT)
    }

    /// Creates a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_timeout(api_version: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            api_version: api_version.to_string(),
        })
    }

    fn analyze_url(&self, endpoint: &str) -> String {
        format!(
            "{}/vision/{}/analyze?visualFeatures={VISUAL_FEATURES}",
            endpoint.trim_end_matches('/'),
            self.api_version
        )
    }
}

#[async_trait]
impl AnalysisProvider for VisionClient {
    fn name(&self) -> &'static str {
        "vision"
    }

    async fn analyze(&self, image: &[u8], credentials: &Credentials) -> Result<AnalysisResult> {
        let url = self.analyze_url(credentials.endpoint());
        debug!("Posting {} bytes for analysis", image.len());

        let response = self
            .client
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, credentials.api_key())
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Vision request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("vision backend returned {status}: {body}");
        }

        // Request URLs embed the endpoint, which is a credential.
        response
            .json::<AnalysisResult>()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Vision backend returned an unreadable analysis")
    }
}

/// Returns a fixed, acceptable portrait analysis without any I/O.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockVisionClient;

impl MockVisionClient {
    /// The analysis every call returns.
    #[must_use]
    pub fn canned_analysis() -> AnalysisResult {
        AnalysisResult {
            categories: vec![Category {
                name: PORTRAIT_CATEGORY.to_string(),
                score: 0.98,
            }],
            faces: vec![Face {
                age: 30,
                gender: "Female".to_string(),
                face_rectangle: None,
            }],
            tags: ["person", "smile", "indoor"]
                .iter()
                .map(|name| Tag {
                    name: (*name).to_string(),
                    confidence: 0.99,
                })
                .collect(),
            description: Some(Description {
                tags: vec!["person".to_string(), "smile".to_string()],
                captions: vec![Caption {
                    text: "a woman smiling at the camera".to_string(),
                    confidence: 0.92,
                }],
            }),
            request_id: Some("mock".to_string()),
            ..AnalysisResult::default()
        }
    }
}

#[async_trait]
impl AnalysisProvider for MockVisionClient {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn analyze(&self, image: &[u8], _credentials: &Credentials) -> Result<AnalysisResult> {
        debug!("Mock analysis of {} bytes", image.len());
        Ok(Self::canned_analysis())
    }
}
