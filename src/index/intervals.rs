//! Recording-interval and gap derivation.
//!
//! The station-availability view needs the maximal contiguous spans covered
//! by a station's segments, and the gaps between them. Segments arrive
//! unordered and may overlap or touch; a single sort plus left-to-right
//! sweep merges them in O(n log n).

use serde::{Deserialize, Serialize};

use crate::catalog::SegmentRecord;

/// A maximal contiguous time span covered by one or more segments, or the
/// uncovered span between two such intervals when derived as a gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordingInterval {
    /// Interval start, seconds since the Unix epoch.
    pub start: f64,
    /// Interval end, seconds since the Unix epoch; always after `start`.
    pub end: f64,
}

impl RecordingInterval {
    /// Interval length in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `t` falls inside the interval (closed on both ends).
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }
}

/// Merge segment records into maximal contiguous intervals.
///
/// Sorts by `(start_time, end_time, key)` so the sweep is deterministic
/// even for identical time ranges, then merges every record whose start
/// does not exceed the current interval's end. Touching segments
/// (`next.start == current.end`) merge; the output never contains two
/// intervals that overlap or touch.
pub(crate) fn merge_records(mut records: Vec<&SegmentRecord>) -> Vec<RecordingInterval> {
    records.sort_by(|a, b| {
        a.start_time
            .total_cmp(&b.start_time)
            .then(a.end_time.total_cmp(&b.end_time))
            .then_with(|| a.key.cmp(&b.key))
    });

    let mut intervals = Vec::new();
    let mut iter = records.into_iter();
    let Some(first) = iter.next() else {
        return intervals;
    };

    let mut current = RecordingInterval {
        start: first.start_time,
        end: first.end_time,
    };
    for record in iter {
        if record.start_time <= current.end {
            if record.end_time > current.end {
                current.end = record.end_time;
            }
        } else {
            intervals.push(current);
            current = RecordingInterval {
                start: record.start_time,
                end: record.end_time,
            };
        }
    }
    intervals.push(current);

    intervals
}

/// The gaps between consecutive intervals of a sorted, non-overlapping
/// sequence, as produced by [`merge_records`]. Fewer than two intervals
/// means no gaps.
pub(crate) fn gaps_between(intervals: &[RecordingInterval]) -> Vec<RecordingInterval> {
    intervals
        .windows(2)
        .map(|pair| RecordingInterval {
            start: pair[0].end,
            end: pair[1].start,
        })
        .collect()
}
