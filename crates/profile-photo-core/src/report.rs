//! Per-criterion breakdown shown to the user after evaluation.

use serde::Serialize;

use crate::domain::{AnalysisResult, Criterion, Verdict};

/// One row of the verdict checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    /// The rule.
    pub criterion: Criterion,
    /// Human-readable rule name.
    pub label: &'static str,
    /// What the analysis observed.
    pub value: String,
    /// Whether the rule passed.
    pub passed: bool,
}

/// Verdict breakdown with the analysis details worth showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerdictReport {
    /// Every rule passed.
    pub valid: bool,
    /// Generated caption.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Estimated age of the first face.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_age: Option<u32>,
    /// Estimated gender of the first face.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Rule-by-rule results.
    pub checklist: Vec<ChecklistItem>,
    /// Forbidden keywords that matched.
    pub invalid_keywords: Vec<String>,
}

impl VerdictReport {
    /// Builds the report for an analysis and its verdict.
    #[must_use]
    pub fn new(analysis: &AnalysisResult, verdict: &Verdict) -> Self {
        let checklist = Criterion::ALL
            .into_iter()
            .map(|criterion| ChecklistItem {
                criterion,
                label: criterion.label(),
                value: observed_value(criterion, analysis, verdict),
                passed: verdict.passed(criterion),
            })
            .collect();

        let face = analysis.first_face();
        Self {
            valid: verdict.is_valid,
            caption: analysis.caption().map(str::to_string),
            estimated_age: face.map(|f| f.age),
            gender: face.map(|f| f.gender.clone()).filter(|g| !g.is_empty()),
            checklist,
            invalid_keywords: verdict.invalid_keywords.clone(),
        }
    }

    /// Returns the checklist rows that failed.
    pub fn failures(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.checklist.iter().filter(|item| !item.passed)
    }
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "Yes" } else { "No" };
    text.to_string()
}

fn observed_value(criterion: Criterion, analysis: &AnalysisResult, verdict: &Verdict) -> String {
    match criterion {
        Criterion::Portrait => yes_no(verdict.is_portrait),
        Criterion::OnlyOnePerson => analysis.faces.len().to_string(),
        Criterion::Clipart => yes_no(analysis.image_type.clip_art_type > 0),
        Criterion::Linedrawing => yes_no(analysis.image_type.line_drawing_type > 0),
        Criterion::Racy => yes_no(analysis.adult.is_racy_content),
        Criterion::Adult => yes_no(analysis.adult.is_adult_content),
        Criterion::Gory => yes_no(analysis.adult.is_gory_content),
        Criterion::Keywords => {
            if verdict.invalid_keywords.is_empty() {
                "None".to_string()
            } else {
                verdict.invalid_keywords.join(", ")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Caption, Description, Face, Policy, Tag};
    use crate::evaluator::evaluate;

    fn analysis() -> AnalysisResult {
        AnalysisResult {
            faces: vec![Face {
                age: 41,
                gender: "Male".into(),
                face_rectangle: None,
            }],
            tags: vec![Tag {
                name: "beach".into(),
                confidence: 0.8,
            }],
            description: Some(Description {
                tags: vec![],
                captions: vec![Caption {
                    text: "a man on a beach".into(),
                    confidence: 0.7,
                }],
            }),
            ..AnalysisResult::default()
        }
    }

    #[test]
    fn test_report_rows_follow_criteria_order() {
        let analysis = analysis();
        let verdict = evaluate(&analysis, &Policy::default());
        let report = VerdictReport::new(&analysis, &verdict);

        let labels: Vec<_> = report.checklist.iter().map(|i| i.label).collect();
        assert_eq!(labels.len(), 8);
        assert_eq!(labels[0], "Portrait");
        assert_eq!(labels[7], "Forbidden keywords");
    }

    #[test]
    fn test_report_details() {
        let analysis = analysis();
        let policy = Policy::strict().with_forbidden_keywords("Beach");
        let verdict = evaluate(&analysis, &policy);
        let report = VerdictReport::new(&analysis, &verdict);

        assert!(!report.valid);
        assert_eq!(report.caption.as_deref(), Some("a man on a beach"));
        assert_eq!(report.estimated_age, Some(41));
        assert_eq!(report.gender.as_deref(), Some("Male"));

        let failed: Vec<_> = report.failures().map(|i| i.criterion).collect();
        assert_eq!(failed, vec![Criterion::Portrait, Criterion::Keywords]);

        let keywords = &report.checklist[7];
        assert_eq!(keywords.value, "Beach");
        let faces = &report.checklist[1];
        assert_eq!(faces.value, "1");
        assert!(faces.passed);
    }

    #[test]
    fn test_report_without_faces() {
        let analysis = AnalysisResult::default();
        let verdict = evaluate(&analysis, &Policy::permissive());
        let report = VerdictReport::new(&analysis, &verdict);
        assert!(report.estimated_age.is_none());
        assert!(report.gender.is_none());
        assert_eq!(report.checklist[7].value, "None");
    }
}
