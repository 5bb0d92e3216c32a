//! Per-criterion outcome of evaluating an analysis against a policy.

use serde::{Deserialize, Serialize};

/// An individual acceptance rule.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    /// Portrait requirement.
    Portrait,
    /// Exactly one face.
    OnlyOnePerson,
    /// Clip-art restriction.
    Clipart,
    /// Line-drawing restriction.
    Linedrawing,
    /// Racy content restriction.
    Racy,
    /// Adult content restriction.
    Adult,
    /// Gory content restriction.
    Gory,
    /// Forbidden keywords.
    Keywords,
}

impl Criterion {
    /// All criteria in report order.
    pub const ALL: [Self; 8] = [
        Self::Portrait,
        Self::OnlyOnePerson,
        Self::Clipart,
        Self::Linedrawing,
        Self::Racy,
        Self::Adult,
        Self::Gory,
        Self::Keywords,
    ];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Portrait => "Portrait",
            Self::OnlyOnePerson => "Number of faces detected",
            Self::Clipart => "Clip art",
            Self::Linedrawing => "Line drawing",
            Self::Racy => "Racy",
            Self::Adult => "Adult",
            Self::Gory => "Gory",
            Self::Keywords => "Forbidden keywords",
        }
    }
}

/// Outcome of policy evaluation.
///
/// Derived, never persisted. `is_valid` is the conjunction of every
/// `*_valid` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Verdict {
    /// Photo was categorized as a portrait.
    pub is_portrait: bool,
    /// Portrait rule passed.
    pub is_portrait_valid: bool,
    /// Exactly one face was detected.
    pub only_one_person_valid: bool,
    /// Clip-art rule passed.
    pub is_clipart_valid: bool,
    /// Line-drawing rule passed.
    pub is_linedrawing_valid: bool,
    /// Adult rule passed.
    pub is_adult_valid: bool,
    /// Racy rule passed.
    pub is_racy_valid: bool,
    /// Gory rule passed.
    pub is_gory_valid: bool,
    /// No forbidden keyword matched.
    pub keywords_valid: bool,
    /// Forbidden keywords that matched a tag, in policy order.
    pub invalid_keywords: Vec<String>,
    /// Every rule passed.
    pub is_valid: bool,
}

impl Verdict {
    /// Returns whether the given criterion passed.
    #[must_use]
    pub const fn passed(&self, criterion: Criterion) -> bool {
        match criterion {
            Criterion::Portrait => self.is_portrait_valid,
            Criterion::OnlyOnePerson => self.only_one_person_valid,
            Criterion::Clipart => self.is_clipart_valid,
            Criterion::Linedrawing => self.is_linedrawing_valid,
            Criterion::Racy => self.is_racy_valid,
            Criterion::Adult => self.is_adult_valid,
            Criterion::Gory => self.is_gory_valid,
            Criterion::Keywords => self.keywords_valid,
        }
    }

    /// Returns the criteria that failed, in report order.
    #[must_use]
    pub fn failed_criteria(&self) -> Vec<Criterion> {
        Criterion::ALL
            .into_iter()
            .filter(|c| !self.passed(*c))
            .collect()
    }
}
