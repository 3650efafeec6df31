//! Timeline output as JSON or JSON Lines.
//!
//! A delivered timeline is written either as one JSON array or as one entry
//! per line. Thumbnail bytes are base64 inside each record.

use serde::Serialize;
use std::io::{self, Write};

use crate::types::{MediaKind, TimelineEntry};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The whole timeline as a single JSON array
    #[default]
    Json,
    /// One timeline entry per line (newline-delimited JSON)
    JsonLines,
}

/// Serializes timeline entries to a writer.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    entries_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` only affects [`OutputFormat::Json`].
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            entries_written: 0,
        }
    }

    /// Write a complete timeline.
    pub fn write_timeline(&mut self, entries: &[TimelineEntry]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                self.write_json(entries)?;
                self.entries_written += entries.len();
            }
            OutputFormat::JsonLines => {
                for entry in entries {
                    self.write_line(entry)?;
                }
            }
        }
        Ok(())
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, value).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, value).map_err(io::Error::other)?;
        }
        writeln!(self.writer)
    }

    fn write_line(&mut self, entry: &TimelineEntry) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, entry).map_err(io::Error::other)?;
        writeln!(self.writer)?;
        self.entries_written += 1;
        Ok(())
    }

    /// Number of timeline entries written, sections included.
    pub fn entries_written(&self) -> usize {
        self.entries_written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Counts over a delivered timeline, for end-of-run summaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimelineSummary {
    pub sections: usize,
    pub images: usize,
    pub videos: usize,
    /// Thumbnails whose capture time could not be determined
    pub unknown_date: usize,
}

impl TimelineSummary {
    pub fn from_entries(entries: &[TimelineEntry]) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            match entry {
                TimelineEntry::Section(_) => summary.sections += 1,
                TimelineEntry::Thumbnail(record) => {
                    match record.kind {
                        MediaKind::Video => summary.videos += 1,
                        _ => summary.images += 1,
                    }
                    if record.captured_at.is_unknown() {
                        summary.unknown_date += 1;
                    }
                }
            }
        }
        summary
    }

    pub fn thumbnails(&self) -> usize {
        self.images + self.videos
    }
}
