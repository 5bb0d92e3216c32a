//! Profile Photo Adapters - External adapters for profile-photo.
//!
//! This crate provides live and mock implementations of the core ports:
//! - Configuration store (site storage entities)
//! - Vision analysis client
//! - Profile writer (property update and picture upload)
//!
//! plus image input loading and the environment-driven choice between them.

pub mod environment;
pub mod image_input;
pub mod profile;
pub mod site;
pub mod storage_entity;
pub mod vision;

pub use environment::{Adapters, ExecutionEnvironment, SiteSettings};
pub use image_input::{load_image, CropRegion, ImageSource, MAX_IMAGE_BYTES};
pub use profile::{MockProfileWriter, SiteProfileWriter};
pub use site::{SiteClient, REQUEST_TIMEOUT};
pub use storage_entity::{MockConfigStore, StorageEntityStore};
pub use vision::{MockVisionClient, VisionClient, DEFAULT_API_VERSION};
