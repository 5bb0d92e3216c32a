//! Image handed to the submission workflow.

/// An encoded, already-cropped image ready for analysis and upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedImage {
    /// Where the image came from (file path or `data:` URL marker).
    pub source: String,
    /// Encoded image bytes, sent unchanged to analysis and upload.
    pub bytes: Vec<u8>,
}

impl SubmittedImage {
    /// Creates a submitted image.
    pub fn new(source: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            source: source.into(),
            bytes,
        }
    }

    /// Encoded size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if there are no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
