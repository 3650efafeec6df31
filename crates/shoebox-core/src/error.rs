//! Error types for the Shoebox import pipeline.
//!
//! Errors are split by blast radius: [`ImportError`] aborts a whole job,
//! [`PipelineError`] only costs the file it was raised for. Both carry the
//! offending path so the log line alone is actionable.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors that abort an entire import job.
///
/// Exactly one of these reaches the consumer as `ImportEvent::Failed`, and
/// no timeline is delivered afterwards.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The folder could not be opened or listed
    #[error("Cannot read folder {path}: {source}")]
    FolderUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The media probe executable could not be located
    #[error("Media probe executable not found: {program} (install ffprobe or set tools.ffprobe)")]
    ProbeNotFound { program: PathBuf },

    /// The worker stopped without emitting a terminal event
    #[error("Import worker stopped unexpectedly: {0}")]
    Worker(String),
}

/// Failures of the external media probe.
///
/// "Not found" and "ran but failed" are deliberately distinct: the first
/// means no video can ever be dated and is fatal, the second is per file.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The probe executable does not exist or is not on `PATH`
    #[error("Probe executable not found: {program}")]
    NotFound { program: PathBuf },

    /// The probe was located but could not be run against the file
    #[error("Probe failed for {path}: {message}")]
    Failed { path: PathBuf, message: String },
}

/// Per-file processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// No frame could be extracted from a video
    #[error("Frame extraction failed for {path}: {message}")]
    FrameExtract { path: PathBuf, message: String },

    /// The container index (moov atom) is missing or corrupt
    #[error("Container index missing for {0} (partial or corrupt video)")]
    MissingIndex(PathBuf),

    /// The media probe ran but could not inspect the file
    #[error("Probe failed for {path}: {message}")]
    Probe { path: PathBuf, message: String },

    /// The media probe executable is missing
    #[error("Media probe executable not found: {program}")]
    ProbeNotFound { program: PathBuf },

    /// Thumbnail encoding failed
    #[error("Thumbnail failed for {path}: {message}")]
    Thumbnail { path: PathBuf, message: String },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// The file's extension is on the unsupported list
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

impl PipelineError {
    /// Whether this error must abort the whole job instead of skipping a file.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PipelineError::ProbeNotFound { .. })
    }

    /// Escalate a fatal error to the job-level error it implies, or hand a
    /// recoverable one back unchanged.
    pub fn escalate(self) -> std::result::Result<PipelineError, ImportError> {
        match self {
            PipelineError::ProbeNotFound { program } => Err(ImportError::ProbeNotFound { program }),
            other => Ok(other),
        }
    }
}

impl From<ProbeError> for PipelineError {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::NotFound { program } => PipelineError::ProbeNotFound { program },
            ProbeError::Failed { path, message } => PipelineError::Probe { path, message },
        }
    }
}

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
