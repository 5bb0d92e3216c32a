//! Policy evaluation.
//!
//! Pure and deterministic: the same analysis and policy always produce the
//! same verdict.

use crate::domain::{AnalysisResult, Policy, Verdict};

/// Evaluates an analysis result against a policy.
///
/// Every rule is independent and the aggregate `is_valid` is their
/// conjunction. The single-face rule is not policy-configurable.
#[must_use]
pub fn evaluate(analysis: &AnalysisResult, policy: &Policy) -> Verdict {
    let is_portrait = analysis.is_portrait();
    let is_portrait_valid = !policy.require_portrait || is_portrait;
    let only_one_person_valid = analysis.faces.len() == 1;
    let is_clipart_valid = policy.allow_clipart || analysis.image_type.clip_art_type == 0;
    let is_linedrawing_valid =
        policy.allow_linedrawing || analysis.image_type.line_drawing_type == 0;
    let is_adult_valid = policy.allow_adult || !analysis.adult.is_adult_content;
    let is_racy_valid = policy.allow_racy || !analysis.adult.is_racy_content;
    let is_gory_valid = policy.allow_gory || !analysis.adult.is_gory_content;

    let invalid_keywords = matching_keywords(analysis, &policy.forbidden_keywords);
    let keywords_valid = invalid_keywords.is_empty();

    let is_valid = is_portrait_valid
        && only_one_person_valid
        && is_clipart_valid
        && is_linedrawing_valid
        && is_adult_valid
        && is_racy_valid
        && is_gory_valid
        && keywords_valid;

    Verdict {
        is_portrait,
        is_portrait_valid,
        only_one_person_valid,
        is_clipart_valid,
        is_linedrawing_valid,
        is_adult_valid,
        is_racy_valid,
        is_gory_valid,
        keywords_valid,
        invalid_keywords,
        is_valid,
    }
}

/// Returns the forbidden keywords that equal some tag name, ignoring case.
fn matching_keywords(analysis: &AnalysisResult, forbidden: &[String]) -> Vec<String> {
    if forbidden.is_empty() {
        return Vec::new();
    }

    let tags: Vec<String> = analysis.tags.iter().map(|t| t.name.to_lowercase()).collect();
    let mut matched: Vec<String> = Vec::new();

    for keyword in forbidden {
        let lowered = keyword.to_lowercase();
        let already = matched.iter().any(|m| m.to_lowercase() == lowered);
        if !already && tags.contains(&lowered) {
            matched.push(keyword.clone());
        }
    }

    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AdultInfo, Category, Face, ImageType, Tag};

    fn portrait_analysis() -> AnalysisResult {
        AnalysisResult {
            categories: vec![Category {
                name: "people_portrait".into(),
                score: 0.9,
            }],
            faces: vec![Face {
                age: 30,
                gender: "female".into(),
                face_rectangle: None,
            }],
            ..AnalysisResult::default()
        }
    }

    fn tag(name: &str) -> Tag {
        Tag {
            name: name.into(),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_strict_policy_accepts_clean_portrait() {
        let verdict = evaluate(&portrait_analysis(), &Policy::strict());
        assert!(verdict.is_valid);
        assert!(verdict.is_portrait);
        assert!(verdict.only_one_person_valid);
        assert!(verdict.keywords_valid);
    }

    #[test]
    fn test_no_faces_fails_regardless_of_policy() {
        let mut analysis = portrait_analysis();
        analysis.faces.clear();

        for policy in [Policy::strict(), Policy::permissive()] {
            let verdict = evaluate(&analysis, &policy);
            assert!(!verdict.only_one_person_valid);
            assert!(!verdict.is_valid);
        }
    }

    #[test]
    fn test_two_faces_fail() {
        let mut analysis = portrait_analysis();
        analysis.faces.push(Face::default());
        let verdict = evaluate(&analysis, &Policy::permissive());
        assert!(!verdict.only_one_person_valid);
        assert!(!verdict.is_valid);
    }

    #[test]
    fn test_portrait_only_checked_when_required() {
        let mut analysis = portrait_analysis();
        analysis.categories = vec![Category {
            name: "outdoor_".into(),
            score: 0.5,
        }];

        let required = evaluate(&analysis, &Policy::strict());
        assert!(!required.is_portrait);
        assert!(!required.is_portrait_valid);
        assert!(!required.is_valid);

        let optional = evaluate(&analysis, &Policy::default());
        assert!(!optional.is_portrait);
        assert!(optional.is_portrait_valid);
        assert!(optional.is_valid);
    }

    #[test]
    fn test_portrait_category_must_match_exactly() {
        let mut analysis = portrait_analysis();
        analysis.categories = vec![Category {
            name: "people_".into(),
            score: 0.9,
        }];
        assert!(!evaluate(&analysis, &Policy::strict()).is_portrait);
    }

    #[test]
    fn test_clipart_and_linedrawing_ordinals() {
        let mut analysis = portrait_analysis();
        analysis.image_type = ImageType {
            clip_art_type: 2,
            line_drawing_type: 1,
        };

        let strict = evaluate(&analysis, &Policy::strict());
        assert!(!strict.is_clipart_valid);
        assert!(!strict.is_linedrawing_valid);
        assert!(!strict.is_valid);

        let permissive = evaluate(&analysis, &Policy::permissive());
        assert!(permissive.is_clipart_valid);
        assert!(permissive.is_linedrawing_valid);
        assert!(permissive.is_valid);
    }

    #[test]
    fn test_content_flags_each_gate_independently() {
        let mut analysis = portrait_analysis();
        analysis.adult = AdultInfo {
            is_racy_content: true,
            ..AdultInfo::default()
        };

        let verdict = evaluate(&analysis, &Policy::strict());
        assert!(verdict.is_adult_valid);
        assert!(!verdict.is_racy_valid);
        assert!(verdict.is_gory_valid);
        assert!(!verdict.is_valid);

        let policy = Policy {
            allow_racy: true,
            ..Policy::strict()
        };
        assert!(evaluate(&analysis, &policy).is_valid);
    }

    #[test]
    fn test_forbidden_keyword_match() {
        let mut analysis = portrait_analysis();
        analysis.tags = vec![tag("sunset")];
        let policy = Policy::strict().with_forbidden_keywords("sunset");

        let verdict = evaluate(&analysis, &policy);
        assert_eq!(verdict.invalid_keywords, vec!["sunset"]);
        assert!(!verdict.keywords_valid);
        assert!(!verdict.is_valid);
    }

    #[test]
    fn test_keyword_match_ignores_case_on_both_sides() {
        let mut analysis = portrait_analysis();
        analysis.tags = vec![tag("beach"), tag("Dog")];
        let policy = Policy::strict().with_forbidden_keywords("Beach;dog;cat");

        let verdict = evaluate(&analysis, &policy);
        assert_eq!(verdict.invalid_keywords, vec!["Beach", "dog"]);
    }

    #[test]
    fn test_keyword_must_match_whole_tag() {
        let mut analysis = portrait_analysis();
        analysis.tags = vec![tag("beach ball")];
        let policy = Policy::strict().with_forbidden_keywords("beach");
        assert!(evaluate(&analysis, &policy).keywords_valid);
    }

    #[test]
    fn test_empty_keywords_always_valid() {
        let mut analysis = portrait_analysis();
        analysis.tags = vec![tag("anything")];
        let verdict = evaluate(&analysis, &Policy::strict());
        assert!(verdict.keywords_valid);
        assert!(verdict.invalid_keywords.is_empty());
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let mut analysis = portrait_analysis();
        analysis.tags = vec![tag("sunset"), tag("person")];
        analysis.adult.is_gory_content = true;
        let policy = Policy::strict().with_forbidden_keywords("sunset;person");

        assert_eq!(evaluate(&analysis, &policy), evaluate(&analysis, &policy));
    }
}
