//! Configuration stores backed by site storage entities.

use anyhow::{Context, Result};
use async_trait::async_trait;
use profile_photo_core::domain::{API_KEY_ENTITY, ENDPOINT_ENTITY};
use profile_photo_core::ConfigProvider;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::site::{SiteClient, ODATA_NOMETADATA};

/// Value returned by the mock store for the API key.
pub const MOCK_API_KEY: &str = "mock-api-key";

/// Value returned by the mock store for the endpoint.
pub const MOCK_ENDPOINT: &str = "https://mock.vision.local/";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StorageEntity {
    #[serde(rename = "Value")]
    value: Option<String>,
}

/// Reads tenant storage entities through the site REST API.
#[derive(Debug, Clone)]
pub struct StorageEntityStore {
    site: SiteClient,
}

impl StorageEntityStore {
    /// Creates a store reading from `site`.
    #[must_use]
    pub const fn new(site: SiteClient) -> Self {
        Self { site }
    }
}

#[async_trait]
impl ConfigProvider for StorageEntityStore {
    async fn resolve(&self, key: &str) -> Result<Option<String>> {
        debug!("Reading storage entity '{key}'");
        let response = self
            .site
            .get(&format!("web/GetStorageEntity('{key}')"))
            .header(ACCEPT, ODATA_NOMETADATA)
            .send()
            .await
            .with_context(|| format!("Failed to read storage entity '{key}'"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response
            .error_for_status()
            .with_context(|| format!("Storage entity '{key}' lookup rejected"))?;

        let entity: StorageEntity = response
            .json()
            .await
            .with_context(|| format!("Storage entity '{key}' returned invalid JSON"))?;

        Ok(entity.value.filter(|v| !v.is_empty()))
    }
}

/// Fixed configuration for local and test environments.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockConfigStore;

#[async_trait]
impl ConfigProvider for MockConfigStore {
    async fn resolve(&self, key: &str) -> Result<Option<String>> {
        Ok(match key {
            API_KEY_ENTITY => Some(MOCK_API_KEY.to_string()),
            ENDPOINT_ENTITY => Some(MOCK_ENDPOINT.to_string()),
            _ => None,
        })
    }
}
