//! Sequencing of one statistics run.

use tracing::debug;
use treestat_html::{Output, ParseOptions, destroy_output, parse_with_options};

use crate::alloc::StatCollectingAllocator;
use crate::bounds::find_max;
use crate::collect::Collector;
use crate::error::StatsError;
use crate::histogram::Histograms;
use crate::snapshot::StatsSnapshot;
use crate::timing::timed;

/// What to do with a value that does not fit its histogram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Log it, count it in [`Histogram::dropped`](crate::Histogram::dropped)
    /// and carry on.
    #[default]
    Drop,
    /// Fail the run with [`StatsError::HistogramOverflow`].
    Strict,
}

/// Settings for [`parse_stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsConfig {
    /// Out-of-range histogram values.
    pub overflow_policy: OverflowPolicy,
    /// Passed to the engine: keep at most this many parse errors.
    pub max_errors: Option<usize>,
}

/// Parse `input` and measure it.
///
/// The parse runs with a fresh [`StatCollectingAllocator`]. The tree is
/// walked twice: once to size the histograms and once to fill them. It is then
/// destroyed through the same allocator, whether or not the run succeeded.
///
/// # Errors
///
/// [`StatsError::HistogramAllocation`] if a histogram cannot be allocated,
/// or [`StatsError::HistogramOverflow`] under [`OverflowPolicy::Strict`].
pub fn parse_stats(input: &str, config: &StatsConfig) -> Result<StatsSnapshot, StatsError> {
    run(input, input.len(), config)
}

/// [`parse_stats`] for raw file contents.
///
/// Invalid UTF-8 is replaced with U+FFFD before parsing, but
/// [`StatsSnapshot::input_len`] stays the length of `bytes`.
///
/// # Errors
///
/// As for [`parse_stats`].
pub fn parse_stats_bytes(
    bytes: &[u8],
    config: &StatsConfig,
) -> Result<StatsSnapshot, StatsError> {
    let input = String::from_utf8_lossy(bytes);
    if input.len() != bytes.len() {
        debug!(raw = bytes.len(), decoded = input.len(), "invalid UTF-8 replaced");
    }
    run(&input, bytes.len(), config)
}

fn run(
    input: &str,
    input_len: usize,
    config: &StatsConfig,
) -> Result<StatsSnapshot, StatsError> {
    let allocator = StatCollectingAllocator::new();
    let options = ParseOptions {
        allocator: &allocator,
        max_errors: config.max_errors,
    };

    let mut snapshot = StatsSnapshot {
        input_len,
        ..StatsSnapshot::default()
    };

    let (output, parse_time_us) = timed(|| parse_with_options(&options, input));
    snapshot.parse_time_us = parse_time_us;
    snapshot.bytes_freed_during_parsing = allocator.stats().bytes_freed;
    snapshot.parse_errors = output.errors.len();
    debug!(
        parse_time_us,
        errors = snapshot.parse_errors,
        "parsed {} bytes",
        input.len()
    );

    let measured = measure(&output, config.overflow_policy, &mut snapshot);

    snapshot.memory = allocator.stats();
    destroy_output(&options, output);
    snapshot.bytes_freed_on_destroy = allocator
        .stats()
        .bytes_freed
        .saturating_sub(snapshot.memory.bytes_freed);
    debug!(
        live_bytes = snapshot.live_bytes(),
        freed_on_destroy = snapshot.bytes_freed_on_destroy,
        "parse result destroyed"
    );

    measured.map(|()| snapshot)
}

/// Both traversals, over a tree that is still alive.
fn measure(
    output: &Output,
    policy: OverflowPolicy,
    snapshot: &mut StatsSnapshot,
) -> Result<(), StatsError> {
    let (bounds, traversal_time_us) = timed(|| find_max(&output.document));
    snapshot.traversal_time_us = traversal_time_us;
    debug!(?bounds, traversal_time_us, "bounds found");

    let mut histograms = Histograms::from_bounds(&bounds)?;
    let mut collector = Collector::new(&mut histograms, policy);
    collector.collect(&output.document)?;
    snapshot.nodes = collector.nodes;
    snapshot.flags = collector.flags;
    snapshot.histograms = histograms;
    debug!(
        nodes = snapshot.nodes.nodes,
        dropped = snapshot.histograms.dropped(),
        "counts collected"
    );
    Ok(())
}

/// Release everything `snapshot` owns.
pub fn destroy_stats(mut snapshot: StatsSnapshot) {
    snapshot.release_histograms();
    drop(snapshot);
}
