//! Configuration validation with range checks.

use std::collections::HashSet;

use crate::error::ConfigError;
use crate::pipeline::thumbnail::MAX_THUMBNAIL_HEIGHT;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let lists = [
            ("scan.image_extensions", &self.scan.image_extensions),
            ("scan.video_extensions", &self.scan.video_extensions),
            ("scan.unsupported_extensions", &self.scan.unsupported_extensions),
        ];

        let mut seen = HashSet::new();
        for (name, list) in lists {
            // The unsupported list may legitimately be emptied.
            if list.is_empty() && name != "scan.unsupported_extensions" {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must not be empty"
                )));
            }
            for ext in list {
                let ext = ext.trim_start_matches('.').to_lowercase();
                if ext.is_empty() {
                    return Err(ConfigError::ValidationError(format!(
                        "{name} contains an empty extension"
                    )));
                }
                if !seen.insert(ext.clone()) {
                    return Err(ConfigError::ValidationError(format!(
                        "extension \"{ext}\" appears in more than one scan list"
                    )));
                }
            }
        }

        if self.tools.ffprobe.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "tools.ffprobe must not be empty".into(),
            ));
        }
        if self.tools.ffmpeg.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "tools.ffmpeg must not be empty".into(),
            ));
        }
        if self.tools.missing_index_patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "tools.missing_index_patterns contains an empty pattern".into(),
            ));
        }
        if self.thumbnail.height == 0 {
            return Err(ConfigError::ValidationError(
                "thumbnail.height must be > 0".into(),
            ));
        }
        if self.thumbnail.height > MAX_THUMBNAIL_HEIGHT {
            return Err(ConfigError::ValidationError(format!(
                "thumbnail.height must be <= {MAX_THUMBNAIL_HEIGHT}"
            )));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.pipeline.buffer_size == 0 {
            return Err(ConfigError::ValidationError(
                "pipeline.buffer_size must be > 0".into(),
            ));
        }
        Ok(())
    }
}
