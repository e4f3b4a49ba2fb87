use thiserror::Error;

/// Reasons a `resize_table` request is turned down.
///
/// A rejected request leaves the table exactly as it was.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeError {
    /// Open addressing stores one entry per slot, so it can't shrink below its entry count
    #[error("cannot resize to {requested} buckets while {live} entries are stored")]
    BelowLiveCount {
        /// Capacity asked for
        requested: usize,
        /// Live entries at the time of the request
        live: usize,
    },
    /// A chained table needs at least one bucket
    #[error("a table needs at least one bucket")]
    ZeroCapacity,
}
