//! Cheap per-file checks before any decoding or probing.

use crate::config::LimitsConfig;
use crate::error::PipelineError;
use crate::types::{MediaFile, MediaKind};

/// Validates files before processing.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Perform quick validation before full processing.
    ///
    /// Checks:
    /// - File still exists (it may vanish between scan and processing)
    /// - Still images are within the size limit
    pub fn validate(&self, file: &MediaFile) -> Result<(), PipelineError> {
        let metadata = std::fs::metadata(&file.path)
            .map_err(|_| PipelineError::FileNotFound(file.path.clone()))?;

        if file.kind == MediaKind::Image {
            let max_bytes = self.limits.max_file_size_mb * 1024 * 1024;
            if metadata.len() > max_bytes {
                return Err(PipelineError::FileTooLarge {
                    path: file.path.clone(),
                    size_mb: metadata.len() / (1024 * 1024),
                    max_mb: self.limits.max_file_size_mb,
                });
            }
        }

        Ok(())
    }
}
