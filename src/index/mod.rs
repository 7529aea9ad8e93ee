//! # Waveform Index
//!
//! In-memory query layer over one archive's segment catalog. Answers the
//! questions the browser asks while the user navigates an archive:
//!
//! - **Time queries**: which segments exist for these stations/channels/tags
//!   and overlap this window? ([`WaveformIndex::query_by_time`])
//! - **Availability**: the maximal contiguous recording intervals, and the
//!   gaps between them, for one station/channel/tag
//!   ([`WaveformIndex::recording_intervals`],
//!   [`WaveformIndex::recording_gaps`])
//! - **Vocabulary**: the distinct channel codes and tags in the catalog, to
//!   populate selection dialogs ([`WaveformIndex::unique_information`])
//! - **Exact lookup**: the full record behind a previously returned key
//!   ([`WaveformIndex::entry`])
//!
//! Every operation is read-only and synchronous; the index holds no
//! interior mutability, so shared references may be used from multiple
//! threads freely.
//!
//! ## Example
//!
//! ```
//! use seisdb::{Filter, TimeQuery, WaveformIndex};
//!
//! let entries = [(
//!     "AU.XYZ..BHZ__2020-01-01T00:00:00__2020-01-01T01:00:00__raw_recording",
//!     "raw_recording",
//! )];
//! let (index, report) = WaveformIndex::from_entries(entries);
//! assert!(report.skipped.is_empty());
//!
//! let query = TimeQuery::window(1_577_838_600.0, 1_577_844_000.0)
//!     .stations(Filter::exactly("XYZ"))
//!     .channels(Filter::exactly("BHZ"));
//! let hits = index.query_by_time(&query);
//! assert_eq!(hits.len(), 1);
//! ```

mod error;
mod filter;
mod intervals;

#[cfg(test)]
mod tests;

pub use error::IndexError;
pub use filter::{Filter, TimeQuery};
pub use intervals::RecordingInterval;

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::catalog::{BuildReport, Catalog, CatalogBuilder, SegmentRecord};

/// One hit from [`WaveformIndex::query_by_time`].
///
/// The `new_*` fields start out equal to the record's own codes; they exist
/// so downstream consumers can remap identifiers, e.g. when merging a
/// temporary deployment with reference-network data under a different
/// station code, without losing the original key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryMatch {
    /// Archive key addressing the segment in the waveform group.
    pub key: String,
    pub new_network: String,
    pub new_station: String,
    pub new_channel: String,
    pub new_location: String,
}

impl QueryMatch {
    fn from_record(record: &SegmentRecord) -> Self {
        Self {
            key: record.key.clone(),
            new_network: record.network.clone(),
            new_station: record.station.clone(),
            new_channel: record.channel.clone(),
            new_location: record.location.clone(),
        }
    }
}

/// Distinct channel codes and tags present in a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueInformation {
    pub channels: BTreeSet<String>,
    pub tags: BTreeSet<String>,
}

/// In-memory index over one archive's waveform segments.
///
/// One index owns exactly one [`Catalog`]; an application with several open
/// archives holds one independent index per archive. There is no global
/// registry.
#[derive(Debug, Clone)]
pub struct WaveformIndex {
    catalog: Catalog,
}

impl WaveformIndex {
    /// Index an already-built catalog.
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Build a catalog from `(archive_entry_id, label)` pairs and index it.
    ///
    /// Malformed entries are skipped, not fatal; the [`BuildReport`] lists
    /// them.
    pub fn from_entries<I, S, T>(entries: I) -> (Self, BuildReport)
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut builder = CatalogBuilder::new();
        for (entry_id, label) in entries {
            builder.add_entry(entry_id.as_ref(), label.as_ref());
        }
        let (catalog, report) = builder.finish();
        (Self::new(catalog), report)
    }

    /// The underlying catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// All segments matching the query's filters whose time range strictly
    /// overlaps its window, keyed by archive key.
    ///
    /// An empty result is not an error. Shrinking the window of a query can
    /// only shrink its result set, which is what the browser's
    /// previous/next-interval paging relies on.
    pub fn query_by_time(&self, query: &TimeQuery) -> BTreeMap<String, QueryMatch> {
        let hits: BTreeMap<String, QueryMatch> = self
            .catalog
            .records()
            .filter(|record| query.matches(record))
            .map(|record| (record.key.clone(), QueryMatch::from_record(record)))
            .collect();
        debug!(
            "query [{}, {}] matched {} of {} segments",
            query.start_time,
            query.end_time,
            hits.len(),
            self.catalog.len()
        );
        hits
    }

    /// Maximal contiguous recording intervals for one station/channel/tag,
    /// sorted by start time.
    ///
    /// The caller must already have narrowed to a single channel and tag;
    /// overlapping or touching segments merge into one interval, and no
    /// two returned intervals overlap or touch. Zero matching records
    /// yields an empty sequence.
    pub fn recording_intervals(
        &self,
        network: &str,
        station: &str,
        channel: &str,
        tag: &str,
    ) -> Vec<RecordingInterval> {
        let records: Vec<&SegmentRecord> = self
            .catalog
            .records()
            .filter(|record| {
                record.network == network
                    && record.station == station
                    && record.channel == channel
                    && record.tag == tag
            })
            .collect();
        intervals::merge_records(records)
    }

    /// The gaps between consecutive recording intervals of one
    /// station/channel/tag, within its overall recorded span. Empty when
    /// the group has fewer than two intervals.
    pub fn recording_gaps(
        &self,
        network: &str,
        station: &str,
        channel: &str,
        tag: &str,
    ) -> Vec<RecordingInterval> {
        let intervals = self.recording_intervals(network, station, channel, tag);
        intervals::gaps_between(&intervals)
    }

    /// Distinct channel codes and tags across the full catalog, regardless
    /// of any filtering. Used to populate selection-dialog checklists.
    pub fn unique_information(&self) -> UniqueInformation {
        let mut info = UniqueInformation::default();
        for record in self.catalog.records() {
            info.channels.insert(record.channel.clone());
            info.tags.insert(record.tag.clone());
        }
        info
    }

    /// Distinct `NET.STA` identifiers in the catalog, for tree grouping.
    pub fn net_sta_codes(&self) -> BTreeSet<String> {
        self.catalog.records().map(SegmentRecord::net_sta).collect()
    }

    /// The full record behind an archive key.
    ///
    /// Unlike the range queries, a miss here is a hard error: callers only
    /// pass keys they obtained from this same index.
    pub fn entry(&self, key: &str) -> Result<&SegmentRecord, IndexError> {
        self.catalog
            .get(key)
            .ok_or_else(|| IndexError::UnknownKey(key.to_string()))
    }
}
