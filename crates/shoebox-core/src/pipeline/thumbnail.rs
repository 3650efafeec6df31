//! Fixed-height thumbnail generation with PNG output.

use image::error::{ImageError, ParameterError, ParameterErrorKind};
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

use crate::config::ThumbnailConfig;

/// Tallest thumbnail the generator will produce.
pub const MAX_THUMBNAIL_HEIGHT: u32 = 4096;

/// Widest thumbnail the generator will produce, for panoramas.
pub const MAX_THUMBNAIL_WIDTH: u32 = 16384;

/// Generates thumbnails from decoded images.
pub struct ThumbnailGenerator {
    filter: FilterType,
}

/// An encoded thumbnail.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    /// PNG bytes
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ThumbnailGenerator {
    /// Create a new thumbnail generator with the given configuration.
    pub fn new(config: &ThumbnailConfig) -> Self {
        Self {
            filter: config.filter.into(),
        }
    }

    /// Width that keeps the aspect ratio at `desired_height`, rounded to the
    /// nearest pixel and never zero.
    pub fn thumbnail_width(width: u32, height: u32, desired_height: u32) -> u32 {
        let scaled = f64::from(width) * f64::from(desired_height) / f64::from(height);
        (scaled.round() as u32).max(1)
    }

    /// Resize `image` to exactly `desired_height` pixels tall and encode it as PNG.
    ///
    /// Height is uniform across thumbnails; width follows the source aspect.
    pub fn make_thumbnail(
        &self,
        image: &DynamicImage,
        desired_height: u32,
    ) -> Result<Thumbnail, ImageError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 || desired_height == 0 || desired_height > MAX_THUMBNAIL_HEIGHT
        {
            return Err(ImageError::Parameter(ParameterError::from_kind(
                ParameterErrorKind::DimensionMismatch,
            )));
        }

        let new_width = Self::thumbnail_width(width, height, desired_height);
        if new_width > MAX_THUMBNAIL_WIDTH {
            return Err(ImageError::Parameter(ParameterError::from_kind(
                ParameterErrorKind::DimensionMismatch,
            )));
        }
        let mut resized = image.resize_exact(new_width, desired_height, self.filter);

        // PNG has no float encodings
        if matches!(resized.color(), ColorType::Rgb32F | ColorType::Rgba32F) {
            resized = DynamicImage::ImageRgba8(resized.to_rgba8());
        }

        let mut buffer = Cursor::new(Vec::new());
        resized.write_to(&mut buffer, ImageFormat::Png)?;

        Ok(Thumbnail {
            bytes: buffer.into_inner(),
            width: new_width,
            height: desired_height,
        })
    }
}
