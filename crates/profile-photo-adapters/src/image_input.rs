//! Image input: loading, validation, square cropping and PNG encoding.
//!
//! The bytes produced here are sent unchanged to both analysis and upload,
//! so the backend judges exactly the picture the profile receives.

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{DynamicImage, GenericImageView, ImageFormat};
use profile_photo_core::SubmittedImage;
use tracing::debug;

/// Largest accepted encoded input.
pub const MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;

/// Longest base64 payload that can decode to at most [`MAX_IMAGE_BYTES`].
const MAX_BASE64_LEN: usize = MAX_IMAGE_BYTES.div_ceil(3) * 4;

/// Accepted file extensions.
const EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Accepted data URL media types.
const MEDIA_TYPES: &[&str] = &["image/png", "image/jpg", "image/jpeg"];

/// Where an image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A file on disk.
    File(PathBuf),
    /// A `data:image/...;base64,` URL.
    DataUrl(String),
}

impl ImageSource {
    /// Interprets `input` as a data URL when it starts with `data:`, otherwise
    /// as a path.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        if input.starts_with("data:") {
            Self::DataUrl(input.to_string())
        } else {
            Self::File(PathBuf::from(input))
        }
    }

    fn label(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::DataUrl(url) => {
                let media = url
                    .strip_prefix("data:")
                    .and_then(|rest| rest.split(';').next())
                    .unwrap_or("unknown");
                format!("data URL ({media})")
            }
        }
    }

    fn read(&self) -> Result<Vec<u8>> {
        match self {
            Self::File(path) => read_file(path),
            Self::DataUrl(url) => decode_data_url(url),
        }
    }
}

/// Square crop rectangle in source pixels, written `x,y,w,h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl CropRegion {
    /// The largest square centered in a `width` x `height` image.
    #[must_use]
    pub fn centered_square(width: u32, height: u32) -> Self {
        let side = width.min(height);
        Self {
            x: (width - side) / 2,
            y: (height - side) / 2,
            width: side,
            height: side,
        }
    }

    fn validate(self, width: u32, height: u32) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            anyhow::bail!("crop region {self} is empty");
        }
        if self.width != self.height {
            anyhow::bail!("crop region {self} is not square");
        }
        let right = u64::from(self.x) + u64::from(self.width);
        let bottom = u64::from(self.y) + u64::from(self.height);
        if right > u64::from(width) || bottom > u64::from(height) {
            anyhow::bail!("crop region {self} exceeds the {width}x{height} image");
        }
        Ok(())
    }
}

impl fmt::Display for CropRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

impl FromStr for CropRegion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<u32> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<u32>()
                    .map_err(|_| format!("'{p}' is not a pixel offset"))
            })
            .collect::<Result<_, _>>()?;
        match parts.as_slice() {
            [x, y, width, height] => Ok(Self {
                x: *x,
                y: *y,
                width: *width,
                height: *height,
            }),
            _ => Err(format!("expected X,Y,W,H but got '{s}'")),
        }
    }
}

/// Loads, crops and re-encodes an image for submission.
///
/// Without `crop`, the centered largest square is used.
///
/// # Errors
///
/// Returns an error if the source cannot be read, has an unsupported type,
/// exceeds [`MAX_IMAGE_BYTES`], cannot be decoded, or the crop region is not
/// a non-empty square inside the image.
pub fn load_image(source: &ImageSource, crop: Option<CropRegion>) -> Result<SubmittedImage> {
    let label = source.label();
    let encoded = source.read()?;
    ensure_within_limit(&label, encoded.len() as u64)?;

    let decoded =
        image::load_from_memory(&encoded).with_context(|| format!("Failed to decode {label}"))?;
    let (width, height) = decoded.dimensions();

    let region = crop.unwrap_or_else(|| CropRegion::centered_square(width, height));
    region.validate(width, height)?;
    debug!("Cropping {label} ({width}x{height}) to {region}");

    let cropped = decoded.crop_imm(region.x, region.y, region.width, region.height);
    let bytes = encode_png(&cropped)?;
    Ok(SubmittedImage::new(label, bytes))
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !EXTENSIONS.contains(&ext.as_str()) {
        anyhow::bail!(
            "{} is not a supported image (expected {})",
            path.display(),
            EXTENSIONS.join(", ")
        );
    }
    let size = std::fs::metadata(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .len();
    ensure_within_limit(&path.display().to_string(), size)?;
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .context("data URL must start with 'data:'")?;
    let (header, payload) = rest
        .split_once(',')
        .context("data URL has no ',' separator")?;
    let media = header
        .strip_suffix(";base64")
        .context("data URL must be base64 encoded")?
        .to_lowercase();
    if !MEDIA_TYPES.contains(&media.as_str()) {
        anyhow::bail!(
            "data URL media type '{media}' is not supported (expected {})",
            MEDIA_TYPES.join(", ")
        );
    }
    let payload = payload.trim();
    if payload.len() > MAX_BASE64_LEN {
        anyhow::bail!("data URL ({media}) payload is larger than the {MAX_IMAGE_BYTES} byte limit");
    }
    STANDARD
        .decode(payload)
        .context("data URL payload is not valid base64")
}

fn ensure_within_limit(label: &str, size: u64) -> Result<()> {
    if size > MAX_IMAGE_BYTES as u64 {
        anyhow::bail!("{label} is {size} bytes, larger than the {MAX_IMAGE_BYTES} byte limit");
    }
    Ok(())
}

fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .context("Failed to encode PNG")?;
    Ok(out.into_inner())
}
