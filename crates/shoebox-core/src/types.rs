//! Core data types for the Shoebox import pipeline.
//!
//! These types flow from the scanner through the per-file processor into the
//! ordered timeline handed to the consumer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// How a file is treated, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    /// Recognized and counted, but never produces a thumbnail
    Unsupported,
}

/// A classified file found at the top level of the import folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    pub kind: MediaKind,
}

/// Calendar date of a capture. All-zero means unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CaptureDate {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

/// Wall-clock time of a capture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CaptureTime {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

/// When a photo or video was recorded.
///
/// Ordering is lexicographic on `(date, time)`, so [`CaptureTimestamp::UNKNOWN`]
/// is the smallest possible value and lands last in a newest-first sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CaptureTimestamp {
    pub date: CaptureDate,
    pub time: CaptureTime,
}

impl CaptureDate {
    /// The unknown-date sentinel.
    pub const UNKNOWN: CaptureDate = CaptureDate {
        year: 0,
        month: 0,
        day: 0,
    };

    pub fn new(year: u32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }
}

impl CaptureTime {
    pub fn new(hour: u32, minute: u32, second: u32) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }
}

impl CaptureTimestamp {
    /// The all-zero sentinel used when no capture time can be determined.
    pub const UNKNOWN: CaptureTimestamp = CaptureTimestamp {
        date: CaptureDate::UNKNOWN,
        time: CaptureTime {
            hour: 0,
            minute: 0,
            second: 0,
        },
    };

    pub fn new(date: CaptureDate, time: CaptureTime) -> Self {
        Self { date, time }
    }

    /// Whether the date is the unknown sentinel.
    pub fn is_unknown(&self) -> bool {
        self.date.is_unknown()
    }
}

impl fmt::Display for CaptureDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl fmt::Display for CaptureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

impl fmt::Display for CaptureTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            f.write_str("unknown")
        } else {
            write!(f, "{} {}", self.date, self.time)
        }
    }
}

/// A generated thumbnail and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailRecord {
    /// PNG-encoded thumbnail (base64 when serialized)
    #[serde(with = "base64_bytes")]
    pub image_bytes: Vec<u8>,

    /// Path of the source file
    pub source_path: PathBuf,

    /// Capture timestamp, or the unknown sentinel
    pub captured_at: CaptureTimestamp,

    /// Kind of the source file
    pub kind: MediaKind,

    /// Thumbnail width in pixels
    pub width: u32,

    /// Thumbnail height in pixels
    pub height: u32,
}

/// Boundary inserted before the first thumbnail of each distinct date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSection {
    pub date: CaptureDate,
}

impl DateSection {
    pub fn new(date: CaptureDate) -> Self {
        Self { date }
    }

    /// Human-readable heading: "Unknown Date" or `YYYY-MM-DD`.
    pub fn label(&self) -> String {
        if self.date.is_unknown() {
            "Unknown Date".to_string()
        } else {
            self.date.to_string()
        }
    }
}

/// One entry of the delivered timeline.
///
/// Internally tagged: `{"type":"section",...}` or `{"type":"thumbnail",...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TimelineEntry {
    Section(DateSection),
    Thumbnail(ThumbnailRecord),
}

impl TimelineEntry {
    pub fn is_section(&self) -> bool {
        matches!(self, TimelineEntry::Section(_))
    }

    pub fn as_thumbnail(&self) -> Option<&ThumbnailRecord> {
        match self {
            TimelineEntry::Thumbnail(record) => Some(record),
            TimelineEntry::Section(_) => None,
        }
    }
}

/// Statistics for one import run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImportStats {
    /// Eligible files counted before processing (recursive)
    pub eligible: usize,

    /// Files attempted (top level only)
    pub attempted: usize,

    /// Thumbnails produced
    pub produced: usize,

    /// Files skipped after a recoverable error
    pub skipped: usize,

    /// Wall-clock duration of the job in seconds
    pub elapsed_seconds: f64,
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: u32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> CaptureTimestamp {
        CaptureTimestamp::new(CaptureDate::new(y, mo, d), CaptureTime::new(h, mi, s))
    }

    #[test]
    fn test_unknown_sorts_below_any_date() {
        assert!(CaptureTimestamp::UNKNOWN < ts(1970, 1, 1, 0, 0, 0));
        assert!(CaptureTimestamp::UNKNOWN.is_unknown());
        assert_eq!(CaptureTimestamp::default(), CaptureTimestamp::UNKNOWN);
    }

    #[test]
    fn test_date_dominates_time() {
        assert!(ts(2021, 5, 4, 0, 0, 0) > ts(2021, 5, 3, 23, 59, 59));
        assert!(ts(2021, 5, 3, 10, 0, 1) > ts(2021, 5, 3, 10, 0, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(ts(2021, 5, 3, 10, 0, 0).to_string(), "2021-05-03 10:00:00");
        assert_eq!(CaptureTimestamp::UNKNOWN.to_string(), "unknown");
    }

    #[test]
    fn test_section_label() {
        assert_eq!(DateSection::new(CaptureDate::new(2021, 5, 3)).label(), "2021-05-03");
        assert_eq!(DateSection::new(CaptureDate::UNKNOWN).label(), "Unknown Date");
    }

    #[test]
    fn test_timeline_entry_serde_tags() {
        let record = ThumbnailRecord {
            image_bytes: vec![0x89, b'P', b'N', b'G'],
            source_path: PathBuf::from("/photos/beach.jpg"),
            captured_at: ts(2021, 5, 3, 10, 0, 0),
            kind: MediaKind::Image,
            width: 300,
            height: 200,
        };
        let entries = vec![
            TimelineEntry::Section(DateSection::new(CaptureDate::new(2021, 5, 3))),
            TimelineEntry::Thumbnail(record.clone()),
        ];
        let json = serde_json::to_string(&entries).unwrap();

        assert!(json.contains("\"type\":\"section\""));
        assert!(json.contains("\"type\":\"thumbnail\""));
        assert!(json.contains("\"kind\":\"image\""));
        // PNG magic, base64 encoded
        assert!(json.contains("\"image_bytes\":\"iVBORw==\""));

        let parsed: Vec<TimelineEntry> = serde_json::from_str(&json).unwrap();
        assert!(parsed[0].is_section());
        assert_eq!(parsed[1].as_thumbnail(), Some(&record));
    }
}
