//! Photo acceptance policy.

use serde::{Deserialize, Serialize};

/// Separator between forbidden keywords in the raw configuration string.
pub const KEYWORD_SEPARATOR: char = ';';

/// Requirements a photo must meet before it may become a profile picture.
///
/// Created once per submission from static configuration and never mutated
/// while a submission is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Policy {
    /// Photo must be categorized as a portrait.
    pub require_portrait: bool,
    /// Clip art is acceptable.
    pub allow_clipart: bool,
    /// Line drawings are acceptable.
    pub allow_linedrawing: bool,
    /// Racy content is acceptable.
    pub allow_racy: bool,
    /// Adult content is acceptable.
    pub allow_adult: bool,
    /// Gory content is acceptable.
    pub allow_gory: bool,
    /// Tags that must not appear on the photo, matched case-insensitively.
    pub forbidden_keywords: Vec<String>,
}

impl Policy {
    /// A policy that allows every content class and forbids no keywords.
    ///
    /// Only the single-face rule still applies.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            require_portrait: false,
            allow_clipart: true,
            allow_linedrawing: true,
            allow_racy: true,
            allow_adult: true,
            allow_gory: true,
            forbidden_keywords: Vec::new(),
        }
    }

    /// The strictest policy: portrait required, nothing else allowed.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            require_portrait: true,
            ..Self::default()
        }
    }

    /// Replaces the forbidden keywords with those parsed from `raw`.
    #[must_use]
    pub fn with_forbidden_keywords(mut self, raw: &str) -> Self {
        self.forbidden_keywords = parse_forbidden_keywords(raw);
        self
    }
}

/// Parses a semicolon-delimited keyword list.
///
/// Entries are trimmed, empty entries (stray separators) are dropped and
/// case-insensitive duplicates keep their first spelling.
#[must_use]
pub fn parse_forbidden_keywords(raw: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for entry in raw.split(KEYWORD_SEPARATOR).map(str::trim) {
        if entry.is_empty() {
            continue;
        }
        let lowered = entry.to_lowercase();
        if keywords.iter().any(|k| k.to_lowercase() == lowered) {
            continue;
        }
        keywords.push(entry.to_string());
    }
    keywords
}
