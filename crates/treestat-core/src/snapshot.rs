//! The result of one statistics run and its text report.

use std::fmt;

use serde::Serialize;
use strum::IntoEnumIterator;

use crate::alloc::AllocationStats;
use crate::collect::{FlagCounts, NodeCounts};
use crate::histogram::{HistogramKind, Histograms};

/// Bins shown per histogram in the text report.
const REPORT_BINS: usize = 12;

/// Everything measured for one document.
///
/// Scalars are flattened in the JSON form, so a serialized snapshot reads
/// `{"input_len": .., "allocations": .., "elements": .., ..., "histograms": {..}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Input size in bytes.
    pub input_len: usize,
    /// Wall time of the parse call.
    pub parse_time_us: u64,
    /// Wall time of the bound-finding pass.
    pub traversal_time_us: u64,
    /// Parse errors the engine recorded.
    pub parse_errors: usize,

    /// Allocator figures taken while the parse result was still alive.
    #[serde(flatten)]
    pub memory: AllocationStats,
    /// Bytes freed before the parse call returned.
    pub bytes_freed_during_parsing: u64,
    /// Bytes released when the parse result was destroyed.
    pub bytes_freed_on_destroy: u64,

    /// Counts by node variant.
    #[serde(flatten)]
    pub nodes: NodeCounts,
    /// Counts by parser-behavior flag.
    #[serde(flatten)]
    pub flags: FlagCounts,

    /// The five shape histograms. Empty after [`Self::release_histograms`].
    pub histograms: Histograms,
}

impl StatsSnapshot {
    /// Release histogram storage. Calling it again does nothing.
    pub fn release_histograms(&mut self) {
        self.histograms.release();
    }

    /// Bytes the parse result held when the snapshot was taken.
    #[must_use]
    pub const fn live_bytes(&self) -> u64 {
        self.memory.live_bytes()
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Text length = {}", self.input_len)?;
        writeln!(f, "parse_time_us = {}", self.parse_time_us)?;
        writeln!(f, "traversal_time_us = {}", self.traversal_time_us)?;
        writeln!(f, "parse_errors = {}", self.parse_errors)?;
        writeln!(f)?;

        let memory = &self.memory;
        writeln!(f, "allocations = {}", memory.allocations)?;
        writeln!(f, "frees = {}", memory.frees)?;
        writeln!(f, "bytes_allocated = {}", memory.bytes_allocated)?;
        writeln!(f, "bytes_freed = {}", memory.bytes_freed)?;
        writeln!(f, "high_water_mark = {}", memory.high_water_mark)?;
        writeln!(
            f,
            "bytes_freed_during_parsing = {}",
            self.bytes_freed_during_parsing
        )?;
        writeln!(f, "bytes_freed_on_destroy = {}", self.bytes_freed_on_destroy)?;
        writeln!(f)?;

        let nodes = &self.nodes;
        writeln!(f, "nodes = {}", nodes.nodes)?;
        writeln!(f, "elements = {}", nodes.elements)?;
        writeln!(f, "text = {}", nodes.text)?;
        writeln!(f, "whitespace = {}", nodes.whitespace)?;
        writeln!(f, "cdata = {}", nodes.cdata)?;
        writeln!(f, "comments = {}", nodes.comments)?;
        writeln!(f)?;

        let flags = &self.flags;
        writeln!(f, "parser_inserted = {}", flags.parser_inserted)?;
        writeln!(
            f,
            "reconstructed_formatting_element = {}",
            flags.reconstructed_formatting_element
        )?;
        writeln!(f, "adoption_agency_cloned = {}", flags.adoption_agency_cloned)?;
        writeln!(f, "adoption_agency_moved = {}", flags.adoption_agency_moved)?;
        writeln!(f, "foster_parented = {}", flags.foster_parented)?;
        writeln!(f)?;

        for kind in HistogramKind::iter() {
            let histogram = self.histograms.get(kind);
            let shown = &histogram.bins()[..histogram.len().min(REPORT_BINS)];
            let bins = shown
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            match histogram.max() {
                Some(max) => writeln!(f, "Max {kind} = {max}.  |{bins}|")?,
                None => writeln!(f, "Max {kind} = none.  ||")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::MaxBounds;

    fn sample() -> StatsSnapshot {
        let mut histograms = Histograms::from_bounds(&MaxBounds {
            children: 14,
            text: 2,
            ..MaxBounds::default()
        })
        .unwrap();
        for value in [0, 0, 1, 13, 14] {
            let _ = histograms.child.increment(value);
        }
        let _ = histograms.text.increment(2);

        StatsSnapshot {
            input_len: 42,
            nodes: NodeCounts {
                nodes: 5,
                documents: 1,
                elements: 4,
                ..NodeCounts::default()
            },
            histograms,
            ..StatsSnapshot::default()
        }
    }

    #[test]
    fn test_report_lines() {
        let report = sample().to_string();
        assert!(report.starts_with("Text length = 42\n"));
        assert!(report.contains("\nelements = 4\n"));
        assert!(report.contains("\nMax child = 14.  |2 1 0 0 0 0 0 0 0 0 0 0|\n"));
        assert!(report.contains("\nMax text = 2.  |0 0 1|\n"));
        assert!(report.contains("\nMax attribute = 0.  |0|\n"));
    }

    #[test]
    fn test_report_after_release() {
        let mut snapshot = sample();
        snapshot.release_histograms();
        snapshot.release_histograms();
        assert!(snapshot.histograms.child.is_empty());
        assert!(
            snapshot
                .to_string()
                .contains("\nMax attribute_value = none.  ||\n")
        );
    }

    #[test]
    fn test_json_is_flat() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["input_len"], 42);
        assert_eq!(value["elements"], 4);
        assert_eq!(value["allocations"], 0);
        assert_eq!(value["foster_parented"], 0);
        assert_eq!(value["histograms"]["text"]["bins"], serde_json::json!([0, 0, 1]));
        assert_eq!(value["histograms"]["child"]["dropped"], 0);
    }
}
