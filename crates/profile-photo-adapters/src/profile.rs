//! Profile writers.
//!
//! [`SiteProfileWriter`] talks to the people manager REST API of the host
//! site. [`MockProfileWriter`] only logs and is used outside production.

use anyhow::{Context, Result};
use async_trait::async_trait;
use profile_photo_core::{ProfileWriter, PropertyUpdate};
use reqwest::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::site::{SiteClient, ODATA_NOMETADATA};

const PEOPLE_MANAGER: &str = "SP.UserProfiles.PeopleManager";
const ODATA_VERBOSE: &str = "application/json;odata=verbose";

/// Claims prefix of a membership account name.
pub const ACCOUNT_CLAIMS_PREFIX: &str = "i:0#.f|membership|";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SingleValueProperty<'a> {
    account_name: String,
    property_name: &'a str,
    property_value: String,
}

/// Writes the profile of one account through the host site.
#[derive(Debug, Clone)]
pub struct SiteProfileWriter {
    site: SiteClient,
    account: String,
}

impl SiteProfileWriter {
    /// Creates a writer for `account` (login name, without claims prefix).
    pub fn new(site: SiteClient, account: impl Into<String>) -> Self {
        Self {
            site,
            account: account.into(),
        }
    }

    fn account_name(&self) -> String {
        if self.account.starts_with(ACCOUNT_CLAIMS_PREFIX) {
            self.account.clone()
        } else {
            format!("{ACCOUNT_CLAIMS_PREFIX}{}", self.account)
        }
    }
}

/// Current UTC time in RFC 3339.
fn timestamp() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("Failed to format timestamp")
}

#[async_trait]
impl ProfileWriter for SiteProfileWriter {
    async fn update_property(&self, update: &PropertyUpdate) -> Result<()> {
        let body = SingleValueProperty {
            account_name: self.account_name(),
            property_name: &update.property_name,
            property_value: update.render_value(&timestamp()?),
        };
        debug!("Setting profile property {}", update.property_name);

        self.site
            .post(&format!("{PEOPLE_MANAGER}/SetSingleValueProfileProperty"))
            .header(ACCEPT, ODATA_NOMETADATA)
            .header(CONTENT_TYPE, ODATA_VERBOSE)
            .body(serde_json::to_vec(&body)?)
            .send()
            .await
            .context("Profile property request failed")?
            .error_for_status()
            .context("Profile property update rejected")?;
        Ok(())
    }

    async fn upload_picture(&self, image: &[u8]) -> Result<()> {
        debug!("Uploading {} byte profile picture", image.len());

        self.site
            .post(&format!("{PEOPLE_MANAGER}/SetMyProfilePicture"))
            .header(ACCEPT, ODATA_NOMETADATA)
            .header(CONTENT_LENGTH, image.len())
            .body(image.to_vec())
            .send()
            .await
            .context("Profile picture request failed")?
            .error_for_status()
            .context("Profile picture upload rejected")?;
        Ok(())
    }
}

/// Profile writer that performs no I/O.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockProfileWriter;

#[async_trait]
impl ProfileWriter for MockProfileWriter {
    async fn update_property(&self, update: &PropertyUpdate) -> Result<()> {
        info!(
            "[mock] set {} = {}",
            update.property_name,
            update.render_value(&timestamp()?)
        );
        Ok(())
    }

    async fn upload_picture(&self, image: &[u8]) -> Result<()> {
        info!("[mock] uploaded {} byte profile picture", image.len());
        Ok(())
    }
}
