//! # seisdb - Time-Indexed Waveform Segment Catalog
//!
//! `seisdb` answers the availability questions a seismology waveform browser
//! asks against an ASDF archive: which recorded segments exist for a set of
//! network/station/channel/tag codes within a time window, what are the
//! maximal contiguous recording intervals (and gaps) for a station, and
//! which channel codes and tags occur in the archive at all.
//!
//! The crate never touches sample data or the archive file itself. It is
//! built once per open archive from the archive's waveform entry listing,
//! where every entry id follows the fixed encoding
//! `NET.STA.LOC.CHA__START__END__TAG`, and afterwards serves read-only,
//! in-memory queries that return archive keys and metadata. The caller
//! fetches actual waveforms from the archive by key.
//!
//! ## Quick Start
//!
//! ```
//! use seisdb::{Filter, TimeQuery, WaveformIndex};
//!
//! // Entry ids and labels as listed by the archive, one pair per segment.
//! let entries = [
//!     (
//!         "AU.XYZ..BHZ__2020-01-01T00:00:00__2020-01-01T01:00:00__raw_recording",
//!         "raw_recording",
//!     ),
//!     (
//!         "AU.XYZ..BHZ__2020-01-01T01:00:00__2020-01-01T02:00:00__raw_recording",
//!         "raw_recording",
//!     ),
//! ];
//!
//! let (index, report) = WaveformIndex::from_entries(entries);
//! assert!(report.skipped.is_empty());
//!
//! // Which segments overlap 00:30..01:30 on that day?
//! let query = TimeQuery::window(1_577_838_600.0, 1_577_842_200.0)
//!     .stations(Filter::exactly("XYZ"))
//!     .channels(Filter::exactly("BHZ"));
//! assert_eq!(index.query_by_time(&query).len(), 2);
//!
//! // Touching segments merge into one recording interval.
//! let intervals = index.recording_intervals("AU", "XYZ", "BHZ", "raw_recording");
//! assert_eq!(intervals.len(), 1);
//! assert_eq!(intervals[0].duration(), 7200.0);
//! ```
//!
//! ## Design Notes
//!
//! - **Explicit wildcards**: [`Filter`] is either `Any` or `OneOf(set)`;
//!   an empty set matches nothing, so "match all" can never be spelled as
//!   an empty collection by accident.
//! - **Tolerant ingestion**: a malformed entry id is skipped with a
//!   warning and listed in the [`BuildReport`]; one corrupt entry never
//!   takes the archive's remaining data with it.
//! - **One index per archive**: an application with several open archives
//!   holds several independent [`WaveformIndex`] instances; nothing is
//!   shared between them and there is no global registry.
//! - **Read-only after build**: every query takes `&self`, so an index can
//!   be shared across threads without locking.

pub mod catalog;
pub mod index;
pub mod key;

pub use catalog::{BuildReport, Catalog, CatalogBuilder, IngestError, SegmentRecord, SkippedEntry};
pub use index::{
    Filter, IndexError, QueryMatch, RecordingInterval, TimeQuery, UniqueInformation, WaveformIndex,
};
pub use key::{KeyError, SegmentKey, KEY_TIME_FORMAT};
