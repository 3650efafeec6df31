//! Import job orchestration.
//!
//! One job runs on one blocking worker: count, list, process each file in
//! turn, order, deliver. The consumer only ever sees [`ImportEvent`]s.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::config::{Config, PipelineConfig};
use crate::error::ImportError;
use crate::types::{ImportStats, MediaKind, TimelineEntry};

use super::channel::{bounded_channel, EventSink, ImportEvent, ImportHandle};
use super::discovery::FileScanner;
use super::frame::{FfmpegFrameGrabber, FrameGrabber};
use super::probe::{FfprobeCommand, MediaProbe};
use super::processor::MediaProcessor;
use super::timeline;

/// Progress label sent at the start of every job.
pub const PROGRESS_LABEL: &str = "{pos}/{len} files imported";

/// Lifecycle of an import job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Scanning,
    Processing,
    Ordering,
    Delivering,
    Done,
    FatalAborted,
}

/// Bookkeeping for a single import run.
#[derive(Debug)]
pub struct ImportJob {
    folder: PathBuf,
    thumbnail_height: u32,
    total_eligible: usize,
    processed: usize,
    produced: usize,
    skipped: usize,
    state: JobState,
    started: Instant,
}

impl ImportJob {
    fn new(folder: &Path, thumbnail_height: u32) -> Self {
        Self {
            folder: folder.to_path_buf(),
            thumbnail_height,
            total_eligible: 0,
            processed: 0,
            produced: 0,
            skipped: 0,
            state: JobState::Idle,
            started: Instant::now(),
        }
    }

    fn transition(&mut self, next: JobState) {
        tracing::debug!("Import {:?}: {:?} -> {:?}", self.folder, self.state, next);
        self.state = next;
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Eligible files counted below the folder, subdirectories included.
    pub fn total_eligible(&self) -> usize {
        self.total_eligible
    }

    /// Top-level files attempted so far.
    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn stats(&self) -> ImportStats {
        ImportStats {
            eligible: self.total_eligible,
            attempted: self.processed,
            produced: self.produced,
            skipped: self.skipped,
            elapsed_seconds: self.started.elapsed().as_secs_f64(),
        }
    }
}

/// Runs import jobs against a fixed configuration and toolset.
///
/// Cheap to clone; clones share the scanner and processor.
#[derive(Clone)]
pub struct Importer {
    scanner: Arc<FileScanner>,
    processor: Arc<MediaProcessor>,
    pipeline: PipelineConfig,
    default_height: u32,
}

impl Importer {
    /// Create an importer that shells out to the configured ffprobe/ffmpeg.
    pub fn new(config: &Config) -> Self {
        Self::with_tools(
            config,
            Arc::new(FfprobeCommand::new(config.ffprobe_path())),
            Arc::new(FfmpegFrameGrabber::new(config.ffmpeg_path())),
        )
    }

    /// Create an importer with explicit video tooling.
    pub fn with_tools(
        config: &Config,
        probe: Arc<dyn MediaProbe>,
        frames: Arc<dyn FrameGrabber>,
    ) -> Self {
        Self {
            scanner: Arc::new(FileScanner::new(&config.scan)),
            processor: Arc::new(MediaProcessor::new(config, probe, frames)),
            pipeline: config.pipeline.clone(),
            default_height: config.thumbnail.height,
        }
    }

    /// Thumbnail height from the configuration.
    pub fn default_height(&self) -> u32 {
        self.default_height
    }

    /// Start importing `folder` on a blocking worker and return the event stream.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start(&self, folder: impl Into<PathBuf>, thumbnail_height: u32) -> ImportHandle {
        let (tx, rx) = bounded_channel(&self.pipeline);
        let importer = self.clone();
        let folder = folder.into();

        let worker = tokio::task::spawn_blocking(move || {
            let sink = EventSink::new(tx);
            importer.run(&folder, thumbnail_height, &sink).stats()
        });

        ImportHandle::new(rx, worker)
    }

    /// Run a whole job on the current thread, reporting through `sink`.
    ///
    /// Always ends with exactly one terminal event. The returned job is in
    /// `Done` or `FatalAborted`.
    pub fn run(&self, folder: &Path, thumbnail_height: u32, sink: &EventSink) -> ImportJob {
        let mut job = ImportJob::new(folder, thumbnail_height);

        match self.execute(&mut job, sink) {
            Ok(entries) => {
                job.transition(JobState::Delivering);
                let stats = job.stats();
                tracing::info!(
                    "Imported {:?}: {} thumbnails, {} skipped, {} eligible in {:.2}s",
                    job.folder,
                    stats.produced,
                    stats.skipped,
                    stats.eligible,
                    stats.elapsed_seconds
                );
                sink.emit(ImportEvent::Delivered(entries));
                job.transition(JobState::Done);
            }
            Err(err) => {
                tracing::error!("Import of {:?} aborted: {}", job.folder, err);
                job.transition(JobState::FatalAborted);
                sink.emit(ImportEvent::Failed(err));
            }
        }

        job
    }

    fn execute(&self, job: &mut ImportJob, sink: &EventSink) -> Result<Vec<TimelineEntry>, ImportError> {
        job.transition(JobState::Scanning);
        job.total_eligible = self.scanner.count_eligible(&job.folder)?;
        sink.emit(ImportEvent::ProgressLabel(PROGRESS_LABEL.to_string()));
        sink.emit(ImportEvent::ProgressMax(job.total_eligible));

        let files = self.scanner.list_top_level(&job.folder)?;
        tracing::info!(
            "Importing {:?}: {} eligible, {} at top level",
            job.folder,
            job.total_eligible,
            files.len()
        );

        if files.iter().any(|f| f.kind == MediaKind::Video) {
            if let Err(e) = self.processor.ensure_probe_available() {
                let e = e.escalate()?;
                tracing::warn!("Media probe check failed: {}", e);
            }
        }

        job.transition(JobState::Processing);
        let mut records = Vec::with_capacity(files.len());
        for file in &files {
            match self.processor.process(file, job.thumbnail_height) {
                Ok(record) => {
                    records.push(record);
                    job.produced += 1;
                }
                Err(e) => {
                    let e = e.escalate()?;
                    tracing::warn!("Skipping {:?}: {}", file.path, e);
                    job.skipped += 1;
                }
            }
            job.processed += 1;
            sink.emit(ImportEvent::ProgressIncrement);
        }

        // Files in subdirectories were counted but are never attempted.
        for _ in job.processed..job.total_eligible {
            sink.emit(ImportEvent::ProgressIncrement);
        }

        job.transition(JobState::Ordering);
        Ok(timeline::order(records))
    }
}
