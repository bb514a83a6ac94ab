use thiserror::Error;

use crate::histogram::HistogramKind;

/// Failures of [`parse_stats`](crate::parse_stats). Either one means no
/// snapshot was produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    /// The bins for a histogram could not be allocated.
    #[error("cannot allocate {len} bins for the {histogram} histogram")]
    HistogramAllocation {
        /// Which histogram.
        histogram: HistogramKind,
        /// Requested bin count, saturated at `usize::MAX`.
        len: usize,
    },

    /// A value fell outside its histogram under
    /// [`OverflowPolicy::Strict`](crate::OverflowPolicy::Strict).
    #[error("value {value} does not fit the {histogram} histogram ({len} bins)")]
    HistogramOverflow {
        /// Which histogram.
        histogram: HistogramKind,
        /// The rejected value.
        value: usize,
        /// The histogram's length.
        len: usize,
    },
}
