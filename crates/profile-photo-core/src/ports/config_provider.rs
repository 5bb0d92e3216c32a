//! Configuration lookup port.

use async_trait::async_trait;

/// Port for resolving opaque configuration values by key.
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Resolves a key.
    ///
    /// A key that does not exist resolves to `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store could not be reached.
    async fn resolve(&self, key: &str) -> anyhow::Result<Option<String>>;
}
