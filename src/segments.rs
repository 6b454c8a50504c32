//! Splitting an observation into segments, i.e. maximal runs of consecutive
//! scans on the same source.

use std::ops::Range;

use hifitime::Epoch;

use crate::ScanRecord;

/// A contiguous stretch of an observation spent on one source.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub source: String,

    /// The time of the first record in the segment.
    pub start: Epoch,

    /// The time of the last record in the segment. This is the same as `start`
    /// if the segment has only one record.
    pub end: Epoch,

    /// The indices of the records that make up this segment.
    ///
    /// We can use a range because the records of a segment are always
    /// contiguous.
    pub records: Range<usize>,
}

/// Split chronologically-ordered scan records into segments. A new segment
/// starts whenever the source differs from the previous record's source, so a
/// source observed, left and then revisited gets two segments.
pub fn segment_observation(records: &[ScanRecord]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = vec![];
    for (i, record) in records.iter().enumerate() {
        match segments.last_mut() {
            Some(current) if current.source == record.source => {
                current.end = record.time;
                current.records.end = i + 1;
            }
            _ => segments.push(Segment {
                source: record.source.clone(),
                start: record.time,
                end: record.time,
                records: i..i + 1,
            }),
        }
    }
    segments
}
