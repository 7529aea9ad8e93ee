/// Errors returned by [`WaveformIndex`](crate::WaveformIndex) lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// Exact-key lookup with a key that is not in the catalog.
    ///
    /// Range queries return empty collections when nothing matches; an
    /// unknown key on an exact lookup is a hard failure because callers
    /// only pass keys obtained from this same index.
    #[error("unknown archive key: {0}")]
    UnknownKey(String),
}
