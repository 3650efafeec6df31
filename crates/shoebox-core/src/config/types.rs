//! Sub-configuration structs with their defaults.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File classification settings.
///
/// The three lists are matched case-insensitively against the extension.
/// Anything on none of them is invisible to the importer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Still image extensions (decoded directly)
    pub image_extensions: Vec<String>,

    /// Video extensions (first frame + probe timestamp)
    pub video_extensions: Vec<String>,

    /// Recognized but unsupported extensions (counted, then skipped)
    pub unsupported_extensions: Vec<String>,

    /// Follow symlinks while counting eligible files
    pub follow_links: bool,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            image_extensions: strings(&["bmp", "jfif", "jpe", "jpeg", "jpg", "png"]),
            video_extensions: strings(&[
                "avi", "flv", "gif", "h264", "m4v", "mp4", "mov", "mpeg", "webm", "3gp",
            ]),
            unsupported_extensions: strings(&["swf"]),
            follow_links: false,
        }
    }
}

/// External media tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Media probe executable (name on PATH or absolute path)
    pub ffprobe: PathBuf,

    /// Frame extraction executable
    pub ffmpeg: PathBuf,

    /// Probe diagnostics meaning the container index is missing or corrupt
    pub missing_index_patterns: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffprobe: PathBuf::from("ffprobe"),
            ffmpeg: PathBuf::from("ffmpeg"),
            missing_index_patterns: strings(&["moov atom not found"]),
        }
    }
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Default thumbnail height in pixels (width follows the aspect ratio)
    pub height: u32,

    /// Resampling filter
    pub filter: ResizeFilter,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            height: 200,
            filter: ResizeFilter::Triangle,
        }
    }
}

/// Resampling filters exposed in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum still image file size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum decoded image dimension (width or height)
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 200,
            max_image_dimension: 20000,
        }
    }
}

/// Worker-to-consumer channel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Max events buffered before the worker waits for the consumer
    pub buffer_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { buffer_size: 256 }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
