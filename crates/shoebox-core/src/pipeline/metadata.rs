//! Capture timestamp extraction for images (EXIF) and videos (probe report).
//!
//! Missing metadata is never an error here: anything that cannot be read
//! degrades to [`CaptureTimestamp::UNKNOWN`]. The only failures surfaced are
//! the probe's own launch errors and the missing-index verdict for videos.

use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use crate::error::ProbeError;
use crate::types::{CaptureDate, CaptureTime, CaptureTimestamp};

use super::probe::MediaProbe;

/// Outcome of probing a video for its capture time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoTimestamp {
    /// The container is readable; the timestamp may still be unknown
    Captured(CaptureTimestamp),
    /// The container index is missing or corrupt; skip the file
    MissingIndex,
}

/// Extracts capture timestamps from media files.
pub struct MetadataExtractor {
    probe: Arc<dyn MediaProbe>,
    missing_index_patterns: Vec<String>,
}

impl MetadataExtractor {
    /// Create an extractor that probes videos with `probe`.
    pub fn new(probe: Arc<dyn MediaProbe>, missing_index_patterns: &[String]) -> Self {
        Self {
            probe,
            missing_index_patterns: missing_index_patterns
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
        }
    }

    /// Read `DateTimeOriginal` from the image's EXIF store.
    ///
    /// Returns the unknown sentinel if the file has no EXIF store, the tag is
    /// absent, or its value cannot be parsed.
    pub fn extract_image_timestamp(path: &Path) -> CaptureTimestamp {
        match Self::read_original_datetime(path) {
            Some(raw) => parse_timestamp(&raw).unwrap_or_else(|| {
                tracing::debug!("Unparsable DateTimeOriginal {:?} in {:?}", raw, path);
                CaptureTimestamp::UNKNOWN
            }),
            None => CaptureTimestamp::UNKNOWN,
        }
    }

    fn read_original_datetime(path: &Path) -> Option<String> {
        let file = File::open(path).ok()?;
        let mut reader = BufReader::new(file);
        let exif = Reader::new().read_from_container(&mut reader).ok()?;
        let field = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY)?;
        match &field.value {
            Value::Ascii(values) => values
                .first()
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned()),
            _ => {
                let s = field.display_value().to_string();
                Some(s.trim_matches('"').to_string())
            }
        }
    }

    /// Probe a video and read its `creation_time`.
    ///
    /// `ProbeError::NotFound` means the probe executable is missing and must
    /// abort the job; every other outcome concerns this file only.
    pub fn extract_video_timestamp(&self, path: &Path) -> Result<VideoTimestamp, ProbeError> {
        let report = self.probe.probe(path)?;
        let outcome = parse_probe_report(&report, &self.missing_index_patterns);
        if let VideoTimestamp::Captured(ts) = outcome {
            if ts.is_unknown() {
                tracing::debug!("No creation_time for {:?}", path);
            }
        }
        Ok(outcome)
    }

    /// Check that the probe executable can be launched.
    pub fn ensure_probe_available(&self) -> Result<(), ProbeError> {
        self.probe.ensure_available()
    }
}

/// Interpret a probe report.
///
/// `patterns` must already be lowercase. A missing-index diagnostic wins over
/// any timestamp that might also be present.
pub fn parse_probe_report(report: &str, patterns: &[String]) -> VideoTimestamp {
    let lowered = report.to_lowercase();
    if patterns.iter().any(|p| lowered.contains(p.as_str())) {
        return VideoTimestamp::MissingIndex;
    }

    let ts = report
        .lines()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            (key.trim() == "creation_time").then(|| value.trim())
        })
        .find_map(parse_timestamp)
        .unwrap_or(CaptureTimestamp::UNKNOWN);
    VideoTimestamp::Captured(ts)
}

/// Parse a loosely formatted date/time such as `2021:05:03 10:00:00` or
/// `2021-05-03T10:00:00.000000Z`.
///
/// The value is split into a date half and a time half on whitespace (or
/// `T`), and any run of non-digits inside a half is a separator. Extra
/// numeric groups after the third (fractional seconds) are ignored. Returns
/// `None` for malformed or out-of-range values; an all-zero value parses to
/// the unknown sentinel.
pub fn parse_timestamp(raw: &str) -> Option<CaptureTimestamp> {
    let raw = raw.trim().trim_matches(|c| c == '"' || c == '\0');
    let (date_half, time_half) = match raw.split_once(char::is_whitespace) {
        Some((date, time)) => (date, time.trim()),
        None => raw.split_once('T')?,
    };

    let [year, month, day] = numeric_triple(date_half)?;
    let [hour, minute, second] = numeric_triple(time_half)?;

    if year == 0 && month == 0 && day == 0 {
        return Some(CaptureTimestamp::UNKNOWN);
    }
    let in_range = (1..=12).contains(&month)
        && (1..=31).contains(&day)
        && hour <= 23
        && minute <= 59
        && second <= 60;
    if !in_range {
        return None;
    }

    Some(CaptureTimestamp::new(
        CaptureDate::new(year, month, day),
        CaptureTime::new(hour, minute, second),
    ))
}

fn numeric_triple(half: &str) -> Option<[u32; 3]> {
    let mut groups = half
        .split(|c: char| !c.is_ascii_digit())
        .filter(|g| !g.is_empty())
        .map(|g| g.parse::<u32>().ok());
    let a = groups.next()??;
    let b = groups.next()??;
    let c = groups.next()??;
    Some([a, b, c])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn ts(y: u32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> CaptureTimestamp {
        CaptureTimestamp::new(CaptureDate::new(y, mo, d), CaptureTime::new(h, mi, s))
    }

    fn patterns() -> Vec<String> {
        vec!["moov atom not found".to_string()]
    }

    struct CannedProbe(&'static str);

    impl MediaProbe for CannedProbe {
        fn probe(&self, _path: &Path) -> Result<String, ProbeError> {
            Ok(self.0.to_string())
        }
    }

    struct MissingProbe;

    impl MediaProbe for MissingProbe {
        fn probe(&self, _path: &Path) -> Result<String, ProbeError> {
            Err(ProbeError::NotFound {
                program: PathBuf::from("ffprobe"),
            })
        }
    }

    const REPORT: &str = "\
Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'clip.mp4':
  Metadata:
    major_brand     : isom
    creation_time   : 2021-05-03T10:00:00.000000Z
  Duration: 00:00:04.02, start: 0.000000, bitrate: 1205 kb/s
  Stream #0:0[0x1](und): Video: h264 (High), yuv420p, 1920x1080
    Metadata:
      creation_time   : 2021-05-03T10:00:01.000000Z
";

    #[test]
    fn test_parse_exif_style() {
        assert_eq!(parse_timestamp("2021:05:03 10:00:00"), Some(ts(2021, 5, 3, 10, 0, 0)));
    }

    #[test]
    fn test_parse_normalizes_any_separator() {
        assert_eq!(parse_timestamp("2021/05/03  10.00.00"), Some(ts(2021, 5, 3, 10, 0, 0)));
        assert_eq!(parse_timestamp("\"2021-05-03 10:00:00\""), Some(ts(2021, 5, 3, 10, 0, 0)));
    }

    #[test]
    fn test_parse_iso_with_fraction_and_zone() {
        assert_eq!(
            parse_timestamp("2019-07-14T08:30:59.123456Z"),
            Some(ts(2019, 7, 14, 8, 30, 59))
        );
    }

    #[test]
    fn test_parse_zero_exif_is_unknown() {
        assert_eq!(
            parse_timestamp("0000:00:00 00:00:00"),
            Some(CaptureTimestamp::UNKNOWN)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2021:05:03"), None);
        assert_eq!(parse_timestamp("    :  :     :  :  "), None);
        assert_eq!(parse_timestamp("2021:13:03 10:00:00"), None);
        assert_eq!(parse_timestamp("2021:05:03 25:00:00"), None);
    }

    #[test]
    fn test_report_uses_first_creation_time() {
        assert_eq!(
            parse_probe_report(REPORT, &patterns()),
            VideoTimestamp::Captured(ts(2021, 5, 3, 10, 0, 0))
        );
    }

    #[test]
    fn test_report_without_creation_time_is_unknown() {
        let report = "Input #0, avi, from 'old.avi':\n  Duration: 00:00:10.00\n";
        assert_eq!(
            parse_probe_report(report, &patterns()),
            VideoTimestamp::Captured(CaptureTimestamp::UNKNOWN)
        );
    }

    #[test]
    fn test_report_missing_index_wins() {
        let report = "[mov,mp4,m4a,3gp,3g2,mj2 @ 0x5581] Moov atom not found\n\
                      partial.mp4: Invalid data found when processing input\n";
        assert_eq!(
            parse_probe_report(report, &patterns()),
            VideoTimestamp::MissingIndex
        );
    }

    #[test]
    fn test_extract_video_with_canned_probe() {
        let extractor = MetadataExtractor::new(Arc::new(CannedProbe(REPORT)), &patterns());
        let outcome = extractor
            .extract_video_timestamp(Path::new("clip.mp4"))
            .unwrap();
        assert_eq!(outcome, VideoTimestamp::Captured(ts(2021, 5, 3, 10, 0, 0)));
    }

    #[test]
    fn test_patterns_are_case_insensitive() {
        let upper = vec!["MOOV ATOM NOT FOUND".to_string()];
        let extractor = MetadataExtractor::new(
            Arc::new(CannedProbe("moov atom not found")),
            &upper,
        );
        let outcome = extractor
            .extract_video_timestamp(Path::new("partial.mp4"))
            .unwrap();
        assert_eq!(outcome, VideoTimestamp::MissingIndex);
    }

    #[test]
    fn test_missing_probe_propagates() {
        let extractor = MetadataExtractor::new(Arc::new(MissingProbe), &patterns());
        assert!(matches!(
            extractor.extract_video_timestamp(Path::new("clip.mp4")),
            Err(ProbeError::NotFound { .. })
        ));
    }

    #[test]
    fn test_image_without_exif_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.png");
        image::DynamicImage::new_rgb8(4, 4).save(&path).unwrap();

        assert_eq!(
            MetadataExtractor::extract_image_timestamp(&path),
            CaptureTimestamp::UNKNOWN
        );
    }

    #[test]
    fn test_missing_image_is_unknown() {
        assert_eq!(
            MetadataExtractor::extract_image_timestamp(Path::new("/nonexistent/file.jpg")),
            CaptureTimestamp::UNKNOWN
        );
    }
}
