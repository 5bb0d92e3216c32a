//! Authenticated HTTP access to the host site.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};

/// Accept header value for compact OData JSON.
pub const ODATA_NOMETADATA: &str = "application/json;odata=nometadata";

/// Bound on every request to the site and the vision backend.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client bound to one site and one access token.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct SiteClient {
    base: String,
    token: Option<SecretString>,
    client: Client,
}

impl SiteClient {
    /// Creates a client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is empty or the HTTP client cannot be built.
    pub fn new(base_url: &str, token: Option<SecretString>) -> Result<Self> {
        Self::with_timeout(base_url, token, REQUEST_TIMEOUT)
    }

    /// Creates a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is empty or the HTTP client cannot be built.
    pub fn with_timeout(
        base_url: &str,
        token: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self> {
        let base = base_url.trim().trim_end_matches('/').to_string();
        if base.is_empty() {
            anyhow::bail!("site URL is empty");
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base,
            token,
            client,
        })
    }

    /// Site base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Starts a GET request to `path` under the site's `_api`.
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.get(self.api_url(path)))
    }

    /// Starts a POST request to `path` under the site's `_api`.
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.post(self.api_url(path)))
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/_api/{}", self.base, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }
}

impl std::fmt::Debug for SiteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteClient")
            .field("base", &self.base)
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = SiteClient::new("https://contoso.example/sites/hr/", None).unwrap();
        assert_eq!(client.base_url(), "https://contoso.example/sites/hr");
        assert_eq!(
            client.api_url("/web/GetStorageEntity('k')"),
            "https://contoso.example/sites/hr/_api/web/GetStorageEntity('k')"
        );
    }

    #[test]
    fn test_empty_url_rejected() {
        assert!(SiteClient::new("  ", None).is_err());
    }

    #[test]
    fn test_debug_hides_token() {
        let client = SiteClient::new(
            "https://contoso.example",
            Some(SecretString::from("tok-123".to_string())),
        )
        .unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("tok-123"));
        assert!(debug.contains("authenticated: true"));
    }
}
