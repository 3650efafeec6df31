//! Shoebox Core - media import pipeline for photo/video timelines.
//!
//! Shoebox takes a folder of mixed media and produces a timeline: one
//! fixed-height PNG thumbnail per importable file, newest first, grouped
//! under a date section per capture day.
//!
//! # Architecture
//!
//! Each import runs on its own blocking worker and reports through a
//! bounded event channel:
//!
//! ```text
//! Folder → Count/List → (EXIF | ffprobe) timestamp → Decode/Frame → Thumbnail → Order → Delivered
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use shoebox_core::{Config, ImportEvent, Importer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let importer = Importer::new(&config);
//!
//!     let mut handle = importer.start("./DCIM", 200);
//!     while let Some(event) = handle.next_event().await {
//!         if let ImportEvent::Delivered(entries) = event {
//!             println!("{} timeline entries", entries.len());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, ImportError, PipelineError, PipelineResult, ProbeError};
pub use output::{OutputFormat, OutputWriter, TimelineSummary};
pub use pipeline::timeline::is_well_formed;
pub use pipeline::{
    EventSink, FrameGrabber, ImportEvent, ImportHandle, ImportJob, Importer, JobState,
    MediaProbe,
};
pub use types::{
    CaptureDate, CaptureTime, CaptureTimestamp, DateSection, ImportStats, MediaFile, MediaKind,
    ThumbnailRecord, TimelineEntry,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
