//! Execution environment and adapter selection.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use profile_photo_core::{AnalysisProvider, ConfigProvider, ProfileWriter, SessionContext};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::profile::{MockProfileWriter, SiteProfileWriter};
use crate::site::SiteClient;
use crate::storage_entity::{MockConfigStore, StorageEntityStore};
use crate::vision::{MockVisionClient, VisionClient};

/// Where the workflow is running.
///
/// Local and test environments get mock adapters; production gets live ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionEnvironment {
    /// Developer workstation.
    #[default]
    Local,
    /// Automated or manual testing.
    Test,
    /// The real host site.
    Production,
}

impl ExecutionEnvironment {
    /// Returns true if this environment uses mock adapters.
    #[must_use]
    pub const fn is_mock(self) -> bool {
        matches!(self, Self::Local | Self::Test)
    }
}

impl fmt::Display for ExecutionEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Local => "local",
            Self::Test => "test",
            Self::Production => "production",
        })
    }
}

impl FromStr for ExecutionEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!(
                "unknown environment '{other}' (expected local, test or production)"
            )),
        }
    }
}

/// Connection settings for the live host site.
#[derive(Debug, Default, Clone)]
pub struct SiteSettings {
    /// Site URL.
    pub url: Option<String>,
    /// Login name of the profile owner.
    pub account: Option<String>,
    /// Bearer token.
    pub access_token: Option<SecretString>,
}

/// The three ports a session needs.
pub struct Adapters {
    /// Configuration store.
    pub config: Arc<dyn ConfigProvider>,
    /// Analysis client.
    pub analysis: Arc<dyn AnalysisProvider>,
    /// Profile writer.
    pub profile: Arc<dyn ProfileWriter>,
}

impl Adapters {
    /// Mock adapters; no network access.
    #[must_use]
    pub fn mock() -> Self {
        Self {
            config: Arc::new(MockConfigStore),
            analysis: Arc::new(MockVisionClient),
            profile: Arc::new(MockProfileWriter),
        }
    }

    /// Live adapters talking to `site` and the vision backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the site URL or account is missing or the HTTP
    /// clients cannot be built.
    pub fn live(site: &SiteSettings, api_version: &str) -> Result<Self> {
        let url = site
            .url
            .as_deref()
            .context("site URL is required in production (set [site] url or --site-url)")?;
        let account = site
            .account
            .as_deref()
            .context("account is required in production (set [site] account or --account)")?;

        let client = SiteClient::new(url, site.access_token.clone())?;
        Ok(Self {
            config: Arc::new(StorageEntityStore::new(client.clone())),
            analysis: Arc::new(VisionClient::new(api_version)?),
            profile: Arc::new(SiteProfileWriter::new(client, account)),
        })
    }

    /// Chooses mock or live adapters for `environment`.
    ///
    /// # Errors
    ///
    /// Returns an error if live adapters are required and cannot be built.
    pub fn for_environment(
        environment: ExecutionEnvironment,
        site: &SiteSettings,
        api_version: &str,
    ) -> Result<Self> {
        info!("Using {environment} environment");
        if environment.is_mock() {
            Ok(Self::mock())
        } else {
            Self::live(site, api_version)
        }
    }

    /// Wraps the adapters in a fresh session.
    #[must_use]
    pub fn into_session(self) -> SessionContext {
        SessionContext::new(self.config, self.analysis, self.profile)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!(
            "Production".parse::<ExecutionEnvironment>().unwrap(),
            ExecutionEnvironment::Production
        );
        assert_eq!(
            "local".parse::<ExecutionEnvironment>().unwrap(),
            ExecutionEnvironment::Local
        );
        assert!("staging".parse::<ExecutionEnvironment>().is_err());
    }

    #[test]
    fn test_mock_environments() {
        assert!(ExecutionEnvironment::Local.is_mock());
        assert!(ExecutionEnvironment::Test.is_mock());
        assert!(!ExecutionEnvironment::Production.is_mock());
    }

    #[test]
    fn test_live_requires_site() {
        let err = Adapters::for_environment(
            ExecutionEnvironment::Production,
            &SiteSettings::default(),
            "v3.2",
        )
        .err()
        .unwrap();
        assert!(err.to_string().contains("site URL"));
    }

    #[test]
    fn test_live_requires_account() {
        let site = SiteSettings {
            url: Some("https://contoso.example".to_string()),
            ..SiteSettings::default()
        };
        let err = Adapters::live(&site, "v3.2").err().unwrap();
        assert!(err.to_string().contains("account"));
    }

    #[test]
    fn test_mock_selected_without_site() {
        let adapters = Adapters::for_environment(
            ExecutionEnvironment::Test,
            &SiteSettings::default(),
            "v3.2",
        )
        .unwrap();
        assert_eq!(adapters.analysis.name(), "mock");
    }
}
