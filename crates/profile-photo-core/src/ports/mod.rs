//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the submission workflow and
//! external adapters. Live and mock implementations are interchangeable and
//! chosen by the caller when the session is built.

mod analysis_provider;
mod config_provider;
mod observer;
mod profile_writer;

pub use analysis_provider::AnalysisProvider;
pub use config_provider::ConfigProvider;
pub use observer::{NoopObserver, SubmissionEvent, SubmissionObserver};
pub use profile_writer::{ProfileWriter, PropertyUpdate};
