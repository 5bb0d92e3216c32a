//! Test support utilities for profile-photo.
//!
//! Provides mocks of every port, analysis builders and synthetic image
//! bytes for testing the submission workflow.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use profile_photo_core::SessionContext;
//! use profile_photo_test_support::{
//!     AnalysisBuilder, MockConfigProvider, RecordingProfileWriter, ScriptedAnalysisProvider,
//! };
//!
//! let analysis = AnalysisBuilder::portrait().tag("smile").build();
//! let session = SessionContext::new(
//!     Arc::new(MockConfigProvider::complete()),
//!     Arc::new(ScriptedAnalysisProvider::returning(analysis)),
//!     Arc::new(RecordingProfileWriter::new()),
//! );
//! assert!(!session.has_credentials());
//! ```

mod builders;
mod mocks;

pub use builders::{AnalysisBuilder, SyntheticImageBuilder};
pub use mocks::{
    MockConfigProvider, ProfileCall, RecordingObserver, RecordingProfileWriter,
    ScriptedAnalysisProvider,
};
