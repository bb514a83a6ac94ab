//! Statistics for one parsed HTML document.
//!
//! [`parse_stats`] parses a document with an instrumented allocator, then
//! walks the tree twice: the first pass finds the largest value of each
//! binned metric, the second fills histograms sized from those maxima and
//! counts nodes by variant and by parser-behavior flag. [`CorpusStats`]
//! aggregates snapshots across many documents.
//!
//! ```
//! use treestat_core::{StatsConfig, parse_stats};
//!
//! let stats = parse_stats("<html><body>Hi</body></html>", &StatsConfig::default())?;
//! assert_eq!(stats.nodes.elements, 2);
//! assert_eq!(stats.nodes.text, 1);
//! # Ok::<(), treestat_core::StatsError>(())
//! ```

mod alloc;
mod bounds;
mod collect;
mod corpus;
mod driver;
mod error;
mod histogram;
mod snapshot;
mod timing;

pub use alloc::{AllocationStats, StatCollectingAllocator};
pub use bounds::{MaxBounds, find_max};
pub use collect::{Collector, FlagCounts, NodeCounts};
pub use corpus::{CorpusStats, DocumentFigures, Metric, Summary};
pub use driver::{OverflowPolicy, StatsConfig, destroy_stats, parse_stats, parse_stats_bytes};
pub use error::StatsError;
pub use histogram::{Histogram, HistogramKind, Histograms};
pub use snapshot::StatsSnapshot;
pub use timing::timed;
