//! Analysis and synthetic image builders for testing.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use profile_photo_core::domain::{
    AnalysisResult, Caption, Category, Description, Face, SubmittedImage, Tag, PORTRAIT_CATEGORY,
};

/// Builder for analysis results.
///
/// Starts from an empty analysis (no categories, no faces, nothing flagged)
/// and adds one trait at a time.
#[derive(Debug, Clone, Default)]
pub struct AnalysisBuilder {
    analysis: AnalysisResult,
}

impl AnalysisBuilder {
    /// Creates an empty analysis.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A clean single-face portrait.
    #[must_use]
    pub fn portrait() -> Self {
        Self::new()
            .category(PORTRAIT_CATEGORY)
            .face(30, "Female")
            .caption("a person smiling at the camera")
    }

    /// Adds a scene category with full confidence.
    #[must_use]
    pub fn category(mut self, name: &str) -> Self {
        self.analysis.categories.push(Category {
            name: name.to_string(),
            score: 1.0,
        });
        self
    }

    /// Adds one face.
    #[must_use]
    pub fn face(mut self, age: u32, gender: &str) -> Self {
        self.analysis.faces.push(Face {
            age,
            gender: gender.to_string(),
            face_rectangle: None,
        });
        self
    }

    /// Replaces the faces with `count` anonymous ones.
    #[must_use]
    pub fn faces(mut self, count: usize) -> Self {
        self.analysis.faces = (0..count)
            .map(|_| Face {
                age: 40,
                gender: "Male".to_string(),
                face_rectangle: None,
            })
            .collect();
        self
    }

    /// Sets the clip-art ordinal.
    #[must_use]
    pub fn clip_art(mut self, level: u8) -> Self {
        self.analysis.image_type.clip_art_type = level;
        self
    }

    /// Sets the line-drawing ordinal.
    #[must_use]
    pub fn line_drawing(mut self, level: u8) -> Self {
        self.analysis.image_type.line_drawing_type = level;
        self
    }

    /// Flags adult content.
    #[must_use]
    pub fn adult(mut self) -> Self {
        self.analysis.adult.is_adult_content = true;
        self.analysis.adult.adult_score = 0.9;
        self
    }

    /// Flags racy content.
    #[must_use]
    pub fn racy(mut self) -> Self {
        self.analysis.adult.is_racy_content = true;
        self.analysis.adult.racy_score = 0.9;
        self
    }

    /// Flags gory content.
    #[must_use]
    pub fn gory(mut self) -> Self {
        self.analysis.adult.is_gory_content = true;
        self.analysis.adult.gore_score = 0.9;
        self
    }

    /// Adds a content tag.
    #[must_use]
    pub fn tag(mut self, name: &str) -> Self {
        self.analysis.tags.push(Tag {
            name: name.to_string(),
            confidence: 0.95,
        });
        self
    }

    /// Sets the caption.
    #[must_use]
    pub fn caption(mut self, text: &str) -> Self {
        self.analysis.description = Some(Description {
            tags: Vec::new(),
            captions: vec![Caption {
                text: text.to_string(),
                confidence: 0.8,
            }],
        });
        self
    }

    /// Returns the analysis.
    #[must_use]
    pub fn build(self) -> AnalysisResult {
        self.analysis
    }
}

/// Builder for encoded test images.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    /// A gradient image of the given size.
    #[must_use]
    pub fn gradient(width: u32, height: u32) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        DynamicImage::ImageRgb8(img)
    }

    /// PNG bytes of a `width` x `height` gradient.
    ///
    /// # Panics
    ///
    /// Panics if encoding fails, which only happens for zero-sized images.
    #[must_use]
    pub fn png(width: u32, height: u32) -> Vec<u8> {
        Self::encode(&Self::gradient(width, height), ImageFormat::Png)
    }

    /// JPEG bytes of a `width` x `height` gradient.
    ///
    /// # Panics
    ///
    /// Panics if encoding fails, which only happens for zero-sized images.
    #[must_use]
    pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
        Self::encode(&Self::gradient(width, height), ImageFormat::Jpeg)
    }

    /// A `data:image/png;base64,` URL of a gradient.
    #[must_use]
    pub fn png_data_url(width: u32, height: u32) -> String {
        format!(
            "data:image/png;base64,{}",
            STANDARD.encode(Self::png(width, height))
        )
    }

    /// A submitted PNG image.
    #[must_use]
    pub fn submitted(width: u32, height: u32) -> SubmittedImage {
        SubmittedImage::new("synthetic://gradient", Self::png(width, height))
    }

    #[allow(clippy::expect_used)]
    fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image
            .write_to(&mut out, format)
            .expect("synthetic image should encode");
        out.into_inner()
    }
}
