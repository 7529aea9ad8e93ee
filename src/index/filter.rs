//! Query filters and the time-window query value object.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::SegmentRecord;

/// Filter over one identifier dimension (network, station, channel or tag).
///
/// Wildcarding is explicit: [`Filter::Any`] matches every code, while
/// `OneOf` with an empty set matches nothing. There is no
/// empty-collection-means-everything overloading, so "match all" and
/// "match none" can never be confused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    /// Match any code.
    Any,
    /// Match exactly the listed codes.
    OneOf(BTreeSet<String>),
}

impl Filter {
    /// Wildcard filter.
    pub fn any() -> Self {
        Self::Any
    }

    /// Filter matching any of the given codes.
    pub fn one_of<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf(codes.into_iter().map(Into::into).collect())
    }

    /// Filter matching a single code.
    pub fn exactly(code: impl Into<String>) -> Self {
        Self::OneOf(BTreeSet::from([code.into()]))
    }

    /// Whether this filter accepts `code`.
    pub fn matches(&self, code: &str) -> bool {
        match self {
            Self::Any => true,
            Self::OneOf(codes) => codes.contains(code),
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::Any
    }
}

/// An ephemeral time-window query against a
/// [`WaveformIndex`](crate::WaveformIndex).
///
/// A record matches when every filter accepts its code and its time range
/// strictly overlaps the window: `start_time < window end` and
/// `end_time > window start`. A segment that merely touches the window
/// boundary does not match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeQuery {
    pub networks: Filter,
    pub stations: Filter,
    pub channels: Filter,
    pub tags: Filter,
    /// Window start, seconds since the Unix epoch.
    pub start_time: f64,
    /// Window end, seconds since the Unix epoch.
    pub end_time: f64,
}

impl TimeQuery {
    /// Query over the given window with every dimension wildcarded.
    pub fn window(start_time: f64, end_time: f64) -> Self {
        Self {
            networks: Filter::Any,
            stations: Filter::Any,
            channels: Filter::Any,
            tags: Filter::Any,
            start_time,
            end_time,
        }
    }

    pub fn networks(mut self, filter: Filter) -> Self {
        self.networks = filter;
        self
    }

    pub fn stations(mut self, filter: Filter) -> Self {
        self.stations = filter;
        self
    }

    pub fn channels(mut self, filter: Filter) -> Self {
        self.channels = filter;
        self
    }

    pub fn tags(mut self, filter: Filter) -> Self {
        self.tags = filter;
        self
    }

    pub(crate) fn matches(&self, record: &SegmentRecord) -> bool {
        self.networks.matches(&record.network)
            && self.stations.matches(&record.station)
            && self.channels.matches(&record.channel)
            && self.tags.matches(&record.tag)
            && record.start_time < self.end_time
            && record.end_time > self.start_time
    }
}
