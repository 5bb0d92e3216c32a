//! Vision backend credentials.

use secrecy::{ExposeSecret, SecretString};

/// Storage key holding the vision API key.
pub const API_KEY_ENTITY: &str = "azurekey";

/// Storage key holding the vision endpoint URL.
pub const ENDPOINT_ENTITY: &str = "azureendpoint";

/// API key and endpoint for the vision backend.
///
/// Held in memory for one editing session only. Both values are secrets:
/// `Debug` output is redacted and the values zeroize on drop.
#[derive(Debug)]
pub struct Credentials {
    api_key: SecretString,
    endpoint: SecretString,
}

impl Credentials {
    /// Creates credentials from resolved values.
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            endpoint: SecretString::from(endpoint.into()),
        }
    }

    /// Returns the API key in cleartext. Never log the result.
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Returns the endpoint URL in cleartext. Never log the result.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint.expose_secret()
    }
}
