//! Profile API port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Placeholder replaced with the commit time in property values.
pub const TIMESTAMP_PLACEHOLDER: &str = "{timestamp}";

/// A single-value profile property write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyUpdate {
    /// Profile property name.
    pub property_name: String,
    /// Property value. May contain [`TIMESTAMP_PLACEHOLDER`].
    pub property_value: String,
}

impl PropertyUpdate {
    /// Creates a property update.
    pub fn new(property_name: impl Into<String>, property_value: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            property_value: property_value.into(),
        }
    }

    /// Returns the value with the timestamp placeholder substituted.
    #[must_use]
    pub fn render_value(&self, timestamp: &str) -> String {
        self.property_value.replace(TIMESTAMP_PLACEHOLDER, timestamp)
    }
}

impl Default for PropertyUpdate {
    fn default() -> Self {
        Self::new("AboutMe", "About Me {timestamp}")
    }
}

/// Port for writing the current user's profile.
///
/// The two calls are independent and non-transactional.
#[async_trait]
pub trait ProfileWriter: Send + Sync {
    /// Sets a single-value profile property.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile backend rejects or fails the call.
    async fn update_property(&self, update: &PropertyUpdate) -> anyhow::Result<()>;

    /// Uploads the profile picture as one unbroken binary body.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile backend rejects or fails the upload.
    async fn upload_picture(&self, image: &[u8]) -> anyhow::Result<()>;
}
