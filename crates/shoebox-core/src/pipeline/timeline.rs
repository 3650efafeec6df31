//! Newest-first ordering and date grouping of thumbnail records.

use crate::types::{CaptureDate, DateSection, ThumbnailRecord, TimelineEntry};

/// Sort records newest first and insert a [`DateSection`] before each date run.
pub fn order(records: Vec<ThumbnailRecord>) -> Vec<TimelineEntry> {
    group_by_date(sort_records(records))
}

/// Sort records by capture time, newest first.
///
/// The sort is stable: records with equal timestamps keep their discovery
/// order. Unknown timestamps are the smallest value and so end up last.
pub fn sort_records(mut records: Vec<ThumbnailRecord>) -> Vec<ThumbnailRecord> {
    records.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
    records
}

/// Walk sorted records, emitting a section whenever the date changes.
pub fn group_by_date(records: Vec<ThumbnailRecord>) -> Vec<TimelineEntry> {
    let mut entries = Vec::with_capacity(records.len() * 2);
    let mut previous: Option<CaptureDate> = None;

    for record in records {
        let date = record.captured_at.date;
        if previous != Some(date) {
            entries.push(TimelineEntry::Section(DateSection::new(date)));
            previous = Some(date);
        }
        entries.push(TimelineEntry::Thumbnail(record));
    }

    entries
}

/// Check the structural invariants of a timeline.
///
/// - every thumbnail is preceded (somewhere) by a section for its date
/// - no two sections are adjacent, and none is trailing
/// - each date gets exactly one section, and dates strictly decrease
/// - thumbnails are non-increasing in capture time
pub fn is_well_formed(entries: &[TimelineEntry]) -> bool {
    let mut current: Option<CaptureDate> = None;
    let mut last_section: Option<CaptureDate> = None;
    let mut last_thumb = None;
    let mut previous_was_section = false;

    for entry in entries {
        match entry {
            TimelineEntry::Section(section) => {
                if previous_was_section {
                    return false;
                }
                if let Some(prev) = last_section {
                    if section.date >= prev {
                        return false;
                    }
                }
                last_section = Some(section.date);
                current = Some(section.date);
                previous_was_section = true;
            }
            TimelineEntry::Thumbnail(record) => {
                if current != Some(record.captured_at.date) {
                    return false;
                }
                if let Some(prev) = last_thumb {
                    if record.captured_at > prev {
                        return false;
                    }
                }
                last_thumb = Some(record.captured_at);
                previous_was_section = false;
            }
        }
    }

    !previous_was_section
}
