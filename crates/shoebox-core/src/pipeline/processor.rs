//! Per-file processing: capture timestamp first, then the thumbnail.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use image::DynamicImage;

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::types::{CaptureTimestamp, MediaFile, MediaKind, ThumbnailRecord};

use super::decode::ImageDecoder;
use super::frame::FrameGrabber;
use super::metadata::{MetadataExtractor, VideoTimestamp};
use super::probe::MediaProbe;
use super::thumbnail::ThumbnailGenerator;
use super::validate::Validator;

/// Turns one classified file into one [`ThumbnailRecord`].
pub struct MediaProcessor {
    validator: Validator,
    decoder: ImageDecoder,
    metadata: MetadataExtractor,
    frames: Arc<dyn FrameGrabber>,
    thumbnail_gen: ThumbnailGenerator,
}

impl MediaProcessor {
    /// Create a processor using the given probe and frame grabber for videos.
    pub fn new(
        config: &Config,
        probe: Arc<dyn MediaProbe>,
        frames: Arc<dyn FrameGrabber>,
    ) -> Self {
        Self {
            validator: Validator::new(config.limits.clone()),
            decoder: ImageDecoder::new(config.limits.clone()),
            metadata: MetadataExtractor::new(probe, &config.tools.missing_index_patterns),
            frames,
            thumbnail_gen: ThumbnailGenerator::new(&config.thumbnail),
        }
    }

    /// Check the media probe can be launched before any video is attempted.
    pub fn ensure_probe_available(&self) -> PipelineResult<()> {
        self.metadata.ensure_probe_available()?;
        Ok(())
    }

    /// Process a single file.
    ///
    /// Every error is per file except `PipelineError::ProbeNotFound`; check
    /// [`PipelineError::is_fatal`] before skipping.
    pub fn process(&self, file: &MediaFile, desired_height: u32) -> PipelineResult<ThumbnailRecord> {
        let start = Instant::now();
        let path = file.path.as_path();

        let (captured_at, image) = match file.kind {
            MediaKind::Image => {
                self.validator.validate(file)?;
                self.load_image(path)?
            }
            MediaKind::Video => {
                self.validator.validate(file)?;
                self.load_video(path)?
            }
            MediaKind::Unsupported => {
                return Err(PipelineError::UnsupportedFormat {
                    path: file.path.clone(),
                    format: path
                        .extension()
                        .and_then(|e| e.to_str())
                        .unwrap_or("unknown")
                        .to_lowercase(),
                })
            }
        };
        let load_time = start.elapsed();

        let thumb = self
            .thumbnail_gen
            .make_thumbnail(&image, desired_height)
            .map_err(|e| PipelineError::Thumbnail {
                path: file.path.clone(),
                message: e.to_string(),
            })?;

        tracing::debug!(
            "Processed {:?} in {:?} (load {:?}, {}x{}, captured {})",
            path.file_name().unwrap_or_default(),
            start.elapsed(),
            load_time,
            thumb.width,
            thumb.height,
            captured_at
        );

        Ok(ThumbnailRecord {
            image_bytes: thumb.bytes,
            source_path: file.path.clone(),
            captured_at,
            kind: file.kind,
            width: thumb.width,
            height: thumb.height,
        })
    }

    fn load_image(&self, path: &Path) -> PipelineResult<(CaptureTimestamp, DynamicImage)> {
        let captured_at = MetadataExtractor::extract_image_timestamp(path);
        let decoded = self.decoder.decode(path)?;
        Ok((captured_at, decoded.image))
    }

    fn load_video(&self, path: &Path) -> PipelineResult<(CaptureTimestamp, DynamicImage)> {
        let captured_at = match self.metadata.extract_video_timestamp(path)? {
            VideoTimestamp::Captured(ts) => ts,
            VideoTimestamp::MissingIndex => {
                return Err(PipelineError::MissingIndex(path.to_path_buf()))
            }
        };
        let frame = self.frames.first_frame(path)?;
        self.decoder.check_dimensions(path, &frame)?;
        Ok((captured_at, frame))
    }
}
