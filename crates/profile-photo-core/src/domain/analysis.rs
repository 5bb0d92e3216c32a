//! Structured response of the image-analysis backend.
//!
//! Field names follow the backend's camelCase JSON. Every section defaults
//! when the backend omits it, so a response without a `faces` array reads as
//! "no faces detected" rather than failing to deserialize.

use serde::{Deserialize, Serialize};

/// Category the backend assigns to head-and-shoulders portraits.
pub const PORTRAIT_CATEGORY: &str = "people_portrait";

/// Complete analysis of a single image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    /// Scene categories, e.g. `people_portrait`.
    pub categories: Vec<Category>,
    /// Detected faces.
    pub faces: Vec<Face>,
    /// Clip-art and line-drawing classification.
    pub image_type: ImageType,
    /// Adult, racy and gory content flags.
    pub adult: AdultInfo,
    /// Content tags.
    pub tags: Vec<Tag>,
    /// Generated caption, if the backend produced one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    /// Dominant color information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorInfo>,
    /// Detected objects.
    pub objects: Vec<DetectedObject>,
    /// Backend request identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl AnalysisResult {
    /// Returns true if any category is exactly [`PORTRAIT_CATEGORY`].
    #[must_use]
    pub fn is_portrait(&self) -> bool {
        self.categories.iter().any(|c| c.name == PORTRAIT_CATEGORY)
    }

    /// Returns the first caption text, if any.
    #[must_use]
    pub fn caption(&self) -> Option<&str> {
        self.description
            .as_ref()
            .and_then(|d| d.captions.first())
            .map(|c| c.text.as_str())
    }

    /// Returns the first detected face, if any.
    #[must_use]
    pub fn first_face(&self) -> Option<&Face> {
        self.faces.first()
    }
}

/// A scene category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    /// Category name.
    pub name: String,
    /// Confidence score (0.0 to 1.0).
    pub score: f64,
}

/// A detected face.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Face {
    /// Estimated age in years.
    pub age: u32,
    /// Estimated gender as reported by the backend.
    pub gender: String,
    /// Face location in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_rectangle: Option<FaceRectangle>,
}

/// Face location in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceRectangle {
    /// Left edge.
    pub left: u32,
    /// Top edge.
    pub top: u32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

/// Image type classification.
///
/// Both values are ordinals where 0 means "not this kind of image".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageType {
    /// Clip-art likelihood, 0 (non clip art) to 3 (good clip art).
    pub clip_art_type: u8,
    /// Line-drawing flag, 0 or 1.
    pub line_drawing_type: u8,
}

/// Adult content classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdultInfo {
    /// Image contains adult content.
    pub is_adult_content: bool,
    /// Image contains racy content.
    pub is_racy_content: bool,
    /// Image contains gory content.
    pub is_gory_content: bool,
    /// Adult score (0.0 to 1.0).
    pub adult_score: f64,
    /// Racy score (0.0 to 1.0).
    pub racy_score: f64,
    /// Gore score (0.0 to 1.0).
    pub gore_score: f64,
}

/// A content tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    /// Tag name, lower case as returned by the backend.
    pub name: String,
    /// Confidence (0.0 to 1.0).
    pub confidence: f64,
}

/// Generated description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Description {
    /// Description keywords.
    pub tags: Vec<String>,
    /// Candidate captions, best first.
    pub captions: Vec<Caption>,
}

/// A caption candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Caption {
    /// Caption text.
    pub text: String,
    /// Confidence (0.0 to 1.0).
    pub confidence: f64,
}

/// Dominant color information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorInfo {
    /// Dominant foreground color name.
    pub dominant_color_foreground: String,
    /// Dominant background color name.
    pub dominant_color_background: String,
    /// All dominant color names.
    pub dominant_colors: Vec<String>,
    /// Accent color as a hex string.
    pub accent_color: String,
    /// Image is black and white.
    #[serde(rename = "isBWImg")]
    pub is_bw_img: bool,
}

/// A detected object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectedObject {
    /// Object name.
    pub object: String,
    /// Confidence (0.0 to 1.0).
    pub confidence: f64,
    /// Object location in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rectangle: Option<ObjectRectangle>,
}

/// Object location in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectRectangle {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_default() {
        let analysis: AnalysisResult = serde_json::from_str(r#"{"tags":[]}"#).unwrap();
        assert!(analysis.faces.is_empty());
        assert!(!analysis.is_portrait());
        assert_eq!(analysis.image_type.clip_art_type, 0);
        assert!(analysis.caption().is_none());
    }

    #[test]
    fn test_backend_field_names() {
        let analysis: AnalysisResult = serde_json::from_str(
            r#"{
                "categories": [{"name": "people_portrait", "score": 0.8}],
                "faces": [{"age": 30, "gender": "Female",
                           "faceRectangle": {"left": 4, "top": 5, "width": 6, "height": 7}}],
                "imageType": {"clipArtType": 1, "lineDrawingType": 1},
                "adult": {"isAdultContent": true, "racyScore": 0.4},
                "color": {"accentColor": "A1B2C3", "isBWImg": true},
                "objects": [{"object": "person", "confidence": 0.9,
                             "rectangle": {"x": 1, "y": 2, "w": 3, "h": 4}}]
            }"#,
        )
        .unwrap();

        assert!(analysis.is_portrait());
        assert_eq!(analysis.first_face().unwrap().face_rectangle.unwrap().width, 6);
        assert_eq!(analysis.image_type.line_drawing_type, 1);
        assert!(analysis.adult.is_adult_content);
        assert!(analysis.color.unwrap().is_bw_img);
        assert_eq!(analysis.objects[0].rectangle.unwrap().h, 4);
    }

    #[test]
    fn test_portrait_needs_exact_category() {
        let analysis = AnalysisResult {
            categories: vec![Category {
                name: "people_".into(),
                score: 0.5,
            }],
            ..AnalysisResult::default()
        };
        assert!(!analysis.is_portrait());
    }
}
