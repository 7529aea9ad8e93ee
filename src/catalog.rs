//! Segment records and catalog ingestion.
//!
//! A [`Catalog`] is the full set of [`SegmentRecord`]s for one open archive.
//! It is populated once, from the archive's waveform entry listing, and is
//! immutable afterwards; the application opens a fresh catalog per file
//! rather than updating one in place.
//!
//! Ingestion is tolerant: an entry whose key cannot be parsed is skipped
//! with a warning and recorded in the [`BuildReport`], so one corrupt entry
//! never makes the rest of the archive unusable.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::key::{KeyError, SegmentKey};

/// One physical waveform recording stored in the archive.
///
/// Records are created during ingestion and never mutated. A re-processed
/// segment shows up as a second record with its own key; the catalog keeps
/// every version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    /// Network code, e.g. `AU`.
    pub network: String,
    /// Station code, e.g. `XYZ`.
    pub station: String,
    /// Location code; may be empty.
    pub location: String,
    /// Channel code, e.g. `BHZ`.
    pub channel: String,
    /// Waveform tag naming the processing stage, e.g. `raw_recording`.
    pub tag: String,
    /// Segment start, seconds since the Unix epoch.
    pub start_time: f64,
    /// Segment end, seconds since the Unix epoch; always after `start_time`.
    pub end_time: f64,
    /// Archive key addressing this segment in the waveform group.
    pub key: String,
}

impl SegmentRecord {
    /// `NET.STA` composite identifier used for grouping.
    pub fn net_sta(&self) -> String {
        format!("{}.{}", self.network, self.station)
    }

    /// Segment duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

impl From<SegmentKey> for SegmentRecord {
    fn from(key: SegmentKey) -> Self {
        let encoded = key.to_string();
        Self {
            start_time: key.start_timestamp(),
            end_time: key.end_timestamp(),
            network: key.network,
            station: key.station,
            location: key.location,
            channel: key.channel,
            tag: key.tag,
            key: encoded,
        }
    }
}

/// Why an entry was left out of the catalog.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IngestError {
    /// The entry id does not match the archive-key encoding.
    #[error(transparent)]
    MalformedKey(#[from] KeyError),

    /// The listing label disagrees with the tag encoded in the entry id.
    #[error("label '{label}' does not match tag '{tag}' encoded in the entry id")]
    LabelMismatch { label: String, tag: String },

    /// A pre-parsed record's end time is not after its start time.
    ///
    /// Key-parsed entries cannot reach this state, but records arriving
    /// through [`Catalog::from_records`] or a JSON dump can.
    #[error("record '{key}' has non-positive duration")]
    NonPositiveDuration { key: String },
}

/// One skipped ingestion entry, kept for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEntry {
    /// The raw entry id as listed by the archive.
    pub entry_id: String,
    /// Why it was skipped.
    pub error: IngestError,
}

/// Diagnostics from one catalog build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    /// Entries parsed into records.
    pub parsed: usize,
    /// Entries that overwrote an earlier record with the same key.
    pub duplicates: usize,
    /// Entries skipped as malformed or invalid.
    pub skipped: Vec<SkippedEntry>,
}

/// Incremental builder for a [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    records: BTreeMap<String, SegmentRecord>,
    report: BuildReport,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one `(archive_entry_id, label)` pair from the archive's
    /// waveform listing. Malformed entries are skipped with a warning and
    /// recorded in the build report; duplicate keys overwrite (last wins).
    pub fn add_entry(&mut self, entry_id: &str, label: &str) {
        let key = match SegmentKey::parse(entry_id) {
            Ok(key) => key,
            Err(err) => {
                warn!("skipping malformed waveform entry '{entry_id}': {err}");
                self.skip(entry_id, err.into());
                return;
            }
        };

        if key.tag != label {
            let err = IngestError::LabelMismatch {
                label: label.to_string(),
                tag: key.tag.clone(),
            };
            warn!("skipping waveform entry '{entry_id}': {err}");
            self.skip(entry_id, err);
            return;
        }

        self.add_record(SegmentRecord::from(key));
    }

    /// Add an already-parsed record. Duplicate keys overwrite (last wins).
    ///
    /// A record whose end time is not after its start time is skipped like
    /// a malformed entry, so every record in a finished catalog satisfies
    /// `end_time > start_time` no matter how it arrived.
    pub fn add_record(&mut self, record: SegmentRecord) {
        if record.end_time <= record.start_time {
            let err = IngestError::NonPositiveDuration {
                key: record.key.clone(),
            };
            warn!("skipping record '{}': {err}", record.key);
            let entry_id = record.key;
            self.skip(&entry_id, err);
            return;
        }
        self.report.parsed += 1;
        if let Some(previous) = self.records.insert(record.key.clone(), record) {
            warn!("duplicate archive key '{}': keeping latest record", previous.key);
            self.report.duplicates += 1;
        }
    }

    /// Finalize into an immutable [`Catalog`] plus build diagnostics.
    pub fn finish(self) -> (Catalog, BuildReport) {
        (
            Catalog {
                records: self.records,
            },
            self.report,
        )
    }

    fn skip(&mut self, entry_id: &str, error: IngestError) {
        self.report.skipped.push(SkippedEntry {
            entry_id: entry_id.to_string(),
            error,
        });
    }
}

/// The full set of segment records for one archive.
///
/// Immutable after construction; ordered by archive key for deterministic
/// iteration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    records: BTreeMap<String, SegmentRecord>,
}

impl Catalog {
    /// Build a catalog from pre-parsed records (last wins on duplicate
    /// keys; non-positive-duration records are skipped with a warning).
    pub fn from_records(records: impl IntoIterator<Item = SegmentRecord>) -> Self {
        let mut builder = CatalogBuilder::new();
        for record in records {
            builder.add_record(record);
        }
        builder.finish().0
    }

    /// Number of records in the catalog.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by its archive key.
    pub fn get(&self, key: &str) -> Option<&SegmentRecord> {
        self.records.get(key)
    }

    /// Iterate over all records in archive-key order.
    pub fn records(&self) -> impl Iterator<Item = &SegmentRecord> {
        self.records.values()
    }

    /// Deserialize a catalog from a JSON array of records, as produced by
    /// [`Catalog::to_json_string`]. The caller owns any file handling; the
    /// catalog itself never touches the filesystem.
    ///
    /// A hand-edited or stale dump may carry records that violate the
    /// segment invariants; any record whose end time is not after its
    /// start time is dropped with a warning rather than indexed.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let records: Vec<SegmentRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    /// Serialize the catalog as a JSON array of records, in key order.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.records.values().collect::<Vec<_>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "AU.XYZ..BHZ__2020-01-01T00:00:00__2020-01-01T01:00:00__raw_recording";

    #[test]
    fn test_build_from_entries() {
        let mut builder = CatalogBuilder::new();
        builder.add_entry(VALID, "raw_recording");
        let (catalog, report) = builder.finish();

        assert_eq!(catalog.len(), 1);
        assert_eq!(report.parsed, 1);
        assert!(report.skipped.is_empty());

        let record = catalog.get(VALID).unwrap();
        assert_eq!(record.network, "AU");
        assert_eq!(record.net_sta(), "AU.XYZ");
        assert_eq!(record.duration(), 3600.0);
    }

    #[test]
    fn test_malformed_entry_is_skipped_not_fatal() {
        let mut builder = CatalogBuilder::new();
        builder.add_entry("garbage_no_delimiters", "raw_recording");
        builder.add_entry(VALID, "raw_recording");
        let (catalog, report) = builder.finish();

        assert_eq!(catalog.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].entry_id, "garbage_no_delimiters");
        assert!(matches!(
            report.skipped[0].error,
            IngestError::MalformedKey(_)
        ));
    }

    #[test]
    fn test_label_mismatch_is_skipped() {
        let mut builder = CatalogBuilder::new();
        builder.add_entry(VALID, "earthquake");
        let (catalog, report) = builder.finish();

        assert!(catalog.is_empty());
        assert!(matches!(
            report.skipped[0].error,
            IngestError::LabelMismatch { .. }
        ));
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let mut builder = CatalogBuilder::new();
        builder.add_entry(VALID, "raw_recording");
        builder.add_entry(VALID, "raw_recording");
        let (catalog, report) = builder.finish();

        assert_eq!(catalog.len(), 1);
        assert_eq!(report.parsed, 2);
        assert_eq!(report.duplicates, 1);
    }

    #[test]
    fn test_non_positive_duration_record_is_skipped() {
        let mut builder = CatalogBuilder::new();
        builder.add_record(SegmentRecord {
            network: "AU".to_string(),
            station: "XYZ".to_string(),
            location: String::new(),
            channel: "BHZ".to_string(),
            tag: "raw_recording".to_string(),
            start_time: 100.0,
            end_time: 50.0,
            key: "AU.XYZ..BHZ__100__50__raw_recording".to_string(),
        });
        let (catalog, report) = builder.finish();

        assert!(catalog.is_empty());
        assert_eq!(report.parsed, 0);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].entry_id, "AU.XYZ..BHZ__100__50__raw_recording");
        assert!(matches!(
            report.skipped[0].error,
            IngestError::NonPositiveDuration { .. }
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let mut builder = CatalogBuilder::new();
        builder.add_entry(VALID, "raw_recording");
        let (catalog, _) = builder.finish();

        let json = catalog.to_json_string().unwrap();
        let restored = Catalog::from_json_str(&json).unwrap();
        assert_eq!(restored, catalog);
    }
}
