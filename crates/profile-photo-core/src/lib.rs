//! Profile Photo Core - Domain logic and the submission workflow
//!
//! This crate contains the domain types, the pure policy evaluator, the port
//! traits adapters implement, and the state machine that gates a profile
//! picture commit behind a successful analysis.

pub mod domain;
pub mod error;
pub mod evaluator;
pub mod orchestrator;
pub mod ports;
pub mod report;

pub use domain::{
    parse_forbidden_keywords, AnalysisResult, Credentials, Criterion, Policy, SubmittedImage,
    Verdict,
};
pub use error::SubmissionError;
pub use evaluator::evaluate;
pub use orchestrator::{
    CommitStep, DismissHandle, Evaluation, SessionContext, SubmissionOrchestrator,
    SubmissionState, DEFAULT_ANALYSIS_TIMEOUT, DEFAULT_COMMIT_TIMEOUT, DEFAULT_CONFIG_TIMEOUT,
};
pub use ports::{
    AnalysisProvider, ConfigProvider, ProfileWriter, PropertyUpdate, SubmissionEvent,
    SubmissionObserver,
};
pub use report::{ChecklistItem, VerdictReport};
