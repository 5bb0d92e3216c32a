//! Core domain types for profile photo submission.

mod analysis;
mod credentials;
mod image;
mod policy;
mod verdict;

pub use analysis::{
    AdultInfo, AnalysisResult, Caption, Category, ColorInfo, Description, DetectedObject, Face,
    FaceRectangle, ImageType, ObjectRectangle, Tag, PORTRAIT_CATEGORY,
};
pub use credentials::{Credentials, API_KEY_ENTITY, ENDPOINT_ENTITY};
pub use image::SubmittedImage;
pub use policy::{parse_forbidden_keywords, Policy, KEYWORD_SEPARATOR};
pub use verdict::{Criterion, Verdict};
