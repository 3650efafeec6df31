//! Import pipeline stages.
//!
//! - **discovery**: Count and list media files, classify by extension
//! - **validate**: Cheap pre-flight checks per file
//! - **decode**: Load still images
//! - **probe** / **frame**: External tools for videos
//! - **metadata**: Capture timestamps from EXIF or probe reports
//! - **thumbnail**: Fixed-height PNG thumbnails
//! - **processor**: One file in, one record out
//! - **timeline**: Newest-first ordering with date sections
//! - **channel**: Worker-to-consumer events
//! - **import**: Job orchestration

pub mod channel;
pub mod decode;
pub mod discovery;
pub mod frame;
pub mod import;
pub mod metadata;
pub mod probe;
pub mod processor;
pub mod thumbnail;
pub mod timeline;
pub mod validate;

pub use channel::{EventSink, ImportEvent, ImportHandle};
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::FileScanner;
pub use frame::{FfmpegFrameGrabber, FrameGrabber};
pub use import::{ImportJob, Importer, JobState, PROGRESS_LABEL};
pub use metadata::{MetadataExtractor, VideoTimestamp};
pub use probe::{FfprobeCommand, MediaProbe};
pub use processor::MediaProcessor;
pub use thumbnail::{Thumbnail, ThumbnailGenerator, MAX_THUMBNAIL_HEIGHT};
pub use validate::Validator;
