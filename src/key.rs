//! Archive-key codec for ASDF waveform entries.
//!
//! Every waveform segment in an ASDF archive is addressed by a textual key of
//! the form:
//!
//! ```text
//! NET.STA.LOC.CHA__2020-01-01T00:00:00__2020-01-01T01:00:00__raw_recording
//! ```
//!
//! Four double-underscore delimited fields: a `NET.STA.LOC.CHA` trace
//! identifier (location code may be empty), the segment start and end times
//! in `%Y-%m-%dT%H:%M:%S` form, and the waveform tag naming the processing
//! stage. The encoding is dictated by the archive format; this module only
//! parses and re-emits it.
//!
//! [`SegmentKey::parse`] and the [`Display`](std::fmt::Display) impl are
//! exact inverses for any key this module accepts.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp layout used inside archive keys.
pub const KEY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Errors raised when an archive entry key does not match the expected
/// encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// The key does not split into exactly four `__`-delimited fields.
    #[error("expected 4 '__'-delimited fields, found {found} in '{key}'")]
    FieldCount { key: String, found: usize },

    /// The first field is not a `NET.STA.LOC.CHA` trace identifier.
    #[error("expected NET.STA.LOC.CHA trace identifier, got '{trace_id}'")]
    TraceId { trace_id: String },

    /// A start or end timestamp could not be parsed.
    #[error("invalid timestamp '{value}' in '{key}'")]
    Timestamp { key: String, value: String },

    /// The encoded end time is not after the start time.
    #[error("segment '{key}' has non-positive duration")]
    NonPositiveDuration { key: String },

    /// A component passed to [`SegmentKey::new`] would corrupt the encoding.
    #[error("{field} '{value}' must be non-empty and free of '.' and '__'")]
    Component { field: &'static str, value: String },
}

/// Parsed form of an archive entry key.
///
/// Timestamps are kept as [`NaiveDateTime`] (the key format carries no zone;
/// archive convention is UTC) so that re-encoding is infallible and
/// round-trip exact at whole-second resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentKey {
    /// Network code, e.g. `AU`.
    pub network: String,
    /// Station code, e.g. `XYZ`.
    pub station: String,
    /// Location code; empty for most permanent deployments.
    pub location: String,
    /// Channel code, e.g. `BHZ`.
    pub channel: String,
    /// Segment start time (UTC).
    pub start: NaiveDateTime,
    /// Segment end time (UTC), strictly after `start`.
    pub end: NaiveDateTime,
    /// Waveform tag naming the processing stage, e.g. `raw_recording`.
    pub tag: String,
}

impl SegmentKey {
    /// Build a key from its components, validating that each one survives
    /// the textual encoding unambiguously.
    pub fn new(
        network: impl Into<String>,
        station: impl Into<String>,
        location: impl Into<String>,
        channel: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        tag: impl Into<String>,
    ) -> Result<Self, KeyError> {
        let key = Self {
            network: network.into(),
            station: station.into(),
            location: location.into(),
            channel: channel.into(),
            start,
            end,
            tag: tag.into(),
        };

        Self::check_component("network", &key.network, false)?;
        Self::check_component("station", &key.station, false)?;
        Self::check_component("location", &key.location, true)?;
        Self::check_component("channel", &key.channel, false)?;
        if key.tag.is_empty() || key.tag.contains("__") {
            return Err(KeyError::Component {
                field: "tag",
                value: key.tag,
            });
        }
        if key.end <= key.start {
            return Err(KeyError::NonPositiveDuration {
                key: key.to_string(),
            });
        }

        Ok(key)
    }

    /// Parse an archive entry key.
    ///
    /// ```
    /// use seisdb::SegmentKey;
    ///
    /// let key = SegmentKey::parse(
    ///     "AU.XYZ..BHZ__2020-01-01T00:00:00__2020-01-01T01:00:00__raw_recording",
    /// )?;
    /// assert_eq!(key.network, "AU");
    /// assert_eq!(key.location, "");
    /// assert_eq!(key.tag, "raw_recording");
    /// # Ok::<(), seisdb::KeyError>(())
    /// ```
    pub fn parse(key: &str) -> Result<Self, KeyError> {
        let fields: Vec<&str> = key.split("__").collect();
        if fields.len() != 4 {
            return Err(KeyError::FieldCount {
                key: key.to_string(),
                found: fields.len(),
            });
        }

        let ids: Vec<&str> = fields[0].split('.').collect();
        if ids.len() != 4 || ids[0].is_empty() || ids[1].is_empty() || ids[3].is_empty() {
            return Err(KeyError::TraceId {
                trace_id: fields[0].to_string(),
            });
        }

        let start = Self::parse_time(key, fields[1])?;
        let end = Self::parse_time(key, fields[2])?;
        if end <= start {
            return Err(KeyError::NonPositiveDuration {
                key: key.to_string(),
            });
        }
        if fields[3].is_empty() {
            return Err(KeyError::Component {
                field: "tag",
                value: fields[3].to_string(),
            });
        }

        Ok(Self {
            network: ids[0].to_string(),
            station: ids[1].to_string(),
            location: ids[2].to_string(),
            channel: ids[3].to_string(),
            start,
            end,
            tag: fields[3].to_string(),
        })
    }

    /// `NET.STA` composite identifier used for grouping.
    pub fn net_sta(&self) -> String {
        format!("{}.{}", self.network, self.station)
    }

    /// Segment start as seconds since the Unix epoch.
    pub fn start_timestamp(&self) -> f64 {
        self.start.and_utc().timestamp() as f64
    }

    /// Segment end as seconds since the Unix epoch.
    pub fn end_timestamp(&self) -> f64 {
        self.end.and_utc().timestamp() as f64
    }

    fn parse_time(key: &str, value: &str) -> Result<NaiveDateTime, KeyError> {
        NaiveDateTime::parse_from_str(value, KEY_TIME_FORMAT).map_err(|_| KeyError::Timestamp {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    fn check_component(
        field: &'static str,
        value: &str,
        may_be_empty: bool,
    ) -> Result<(), KeyError> {
        let empty_ok = may_be_empty || !value.is_empty();
        if empty_ok && !value.contains('.') && !value.contains("__") {
            Ok(())
        } else {
            Err(KeyError::Component {
                field,
                value: value.to_string(),
            })
        }
    }
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}__{}__{}__{}",
            self.network,
            self.station,
            self.location,
            self.channel,
            self.start.format(KEY_TIME_FORMAT),
            self.end.format(KEY_TIME_FORMAT),
            self.tag
        )
    }
}
