//! Figures aggregated over many documents.
//!
//! [`CorpusStats`] takes one snapshot at a time. It keeps the per-document
//! figures needed for mean, median, 95th percentile and max, and merges every
//! document's histograms into one set.

use std::fmt;

use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::error::StatsError;
use crate::histogram::{Histogram, HistogramKind, Histograms};
use crate::snapshot::StatsSnapshot;

/// Bins listed per merged histogram in the summary.
const SUMMARY_BINS: usize = 16;

/// Per-document ratios in the summary, as `(numerator, denominator)`.
const RATIOS: [(Metric, Metric); 6] = [
    (Metric::Nodes, Metric::InputKb),
    (Metric::ParseTimeUs, Metric::InputKb),
    (Metric::TraversalTimeUs, Metric::Nodes),
    (Metric::BytesAllocated, Metric::HighWaterMark),
    (Metric::HighWaterMark, Metric::InputKb),
    (Metric::BytesAllocated, Metric::InputKb),
];

/// A per-document figure [`CorpusStats`] can summarize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
    /// [`StatsSnapshot::parse_time_us`].
    ParseTimeUs,
    /// [`StatsSnapshot::traversal_time_us`].
    TraversalTimeUs,
    /// Allocations made by the parse.
    Allocations,
    /// Bytes requested by the parse.
    BytesAllocated,
    /// Peak live bytes during the parse.
    HighWaterMark,
    /// Attached nodes.
    Nodes,
    /// Input size in kilobytes of 1000 bytes.
    InputKb,
}

/// The figures kept from one recorded snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentFigures {
    /// Input size in bytes.
    pub input_len: usize,
    /// Wall time of the parse call.
    pub parse_time_us: u64,
    /// Wall time of the bound-finding pass.
    pub traversal_time_us: u64,
    /// Allocations made by the parse.
    pub allocations: u64,
    /// Bytes requested by the parse.
    pub bytes_allocated: u64,
    /// Peak live bytes during the parse.
    pub high_water_mark: u64,
    /// Attached nodes.
    pub nodes: u64,
}

impl From<&StatsSnapshot> for DocumentFigures {
    fn from(snapshot: &StatsSnapshot) -> Self {
        Self {
            input_len: snapshot.input_len,
            parse_time_us: snapshot.parse_time_us,
            traversal_time_us: snapshot.traversal_time_us,
            allocations: snapshot.memory.allocations,
            bytes_allocated: snapshot.memory.bytes_allocated,
            high_water_mark: snapshot.memory.high_water_mark,
            nodes: snapshot.nodes.nodes,
        }
    }
}

impl DocumentFigures {
    /// The value of `metric` for this document.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::ParseTimeUs => self.parse_time_us as f64,
            Metric::TraversalTimeUs => self.traversal_time_us as f64,
            Metric::Allocations => self.allocations as f64,
            Metric::BytesAllocated => self.bytes_allocated as f64,
            Metric::HighWaterMark => self.high_water_mark as f64,
            Metric::Nodes => self.nodes as f64,
            Metric::InputKb => self.input_len as f64 / 1000.0,
        }
    }
}

/// Distribution of one metric across documents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    /// Arithmetic mean.
    pub mean: f64,
    /// 50th percentile.
    pub median: f64,
    /// 95th percentile.
    pub p95: f64,
    /// Largest value.
    pub max: f64,
}

impl Summary {
    /// Summarize `values`, or `None` if there are none. Percentiles
    /// interpolate linearly between the two nearest ranks.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn of(values: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let max = *sorted.last()?;
        let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
        Some(Self {
            mean,
            median: percentile(&sorted, 50.0),
            p95: percentile(&sorted, 95.0),
            max,
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mean={:.2}, median={:.2}, 95th%={:.2}, max={:.2}",
            self.mean, self.median, self.p95, self.max
        )
    }
}

/// `sorted` is ascending and non-empty.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percentile(sorted: &[f64], percent: f64) -> f64 {
    let rank = percent / 100.0 * (sorted.len() - 1) as f64;
    let below = rank.floor();
    let lower = sorted[below as usize];
    let upper = sorted[rank.ceil() as usize];
    (upper - lower).mul_add(rank - below, lower)
}

/// Running aggregate over many statistics runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusStats {
    documents: Vec<DocumentFigures>,
    out_of_memory: u64,
    failed: u64,
    histograms: Histograms,
}

impl CorpusStats {
    /// Add one document. Record a snapshot before releasing its histograms,
    /// or they contribute nothing.
    pub fn record(&mut self, snapshot: &StatsSnapshot) {
        self.documents.push(DocumentFigures::from(snapshot));
        self.histograms.merge(&snapshot.histograms);
    }

    /// Count a run that produced no snapshot.
    pub fn record_error(&mut self, err: &StatsError) {
        match err {
            StatsError::HistogramAllocation { .. } => self.out_of_memory += 1,
            StatsError::HistogramOverflow { .. } => self.failed += 1,
        }
    }

    /// Figures of every recorded document, in recording order.
    #[must_use]
    pub fn documents(&self) -> &[DocumentFigures] {
        &self.documents
    }

    /// Runs that could not allocate their histograms.
    #[must_use]
    pub const fn out_of_memory(&self) -> u64 {
        self.out_of_memory
    }

    /// Runs that failed for any other reason.
    #[must_use]
    pub const fn failed(&self) -> u64 {
        self.failed
    }

    /// Histograms of every recorded document, merged.
    #[must_use]
    pub const fn histograms(&self) -> &Histograms {
        &self.histograms
    }

    /// Distribution of `metric` over the recorded documents.
    #[must_use]
    pub fn summary(&self, metric: Metric) -> Option<Summary> {
        let values: Vec<f64> = self.documents.iter().map(|doc| doc.get(metric)).collect();
        Summary::of(&values)
    }

    /// Distribution of `numerator / denominator` per document. Documents
    /// where the denominator is zero are left out.
    #[must_use]
    pub fn ratio(&self, numerator: Metric, denominator: Metric) -> Option<Summary> {
        let values: Vec<f64> = self
            .documents
            .iter()
            .filter_map(|doc| {
                let below = doc.get(denominator);
                (below > 0.0).then(|| doc.get(numerator) / below)
            })
            .collect();
        Summary::of(&values)
    }
}

impl fmt::Display for CorpusStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Documents = {}", self.documents.len())?;
        writeln!(f, "out_of_memory = {}", self.out_of_memory)?;
        writeln!(f, "failed = {}", self.failed)?;
        writeln!(f)?;

        for metric in Metric::iter() {
            write_summary(f, &metric.to_string(), self.summary(metric))?;
        }
        writeln!(f)?;
        for (numerator, denominator) in RATIOS {
            write_summary(
                f,
                &format!("{numerator} / {denominator}"),
                self.ratio(numerator, denominator),
            )?;
        }

        for kind in HistogramKind::iter() {
            let histogram = self.histograms.get(kind);
            let shown = &histogram.bins()[..histogram.len().min(SUMMARY_BINS)];
            writeln!(f)?;
            writeln!(
                f,
                "{kind}: total={}, bins={}",
                histogram.total(),
                histogram.len()
            )?;
            writeln!(f, "{}", join(shown))?;
            writeln!(f, "{}", join(&decile_bins(histogram)))?;
        }
        Ok(())
    }
}

fn write_summary(f: &mut fmt::Formatter<'_>, label: &str, summary: Option<Summary>) -> fmt::Result {
    match summary {
        Some(summary) => writeln!(f, "{label}: {summary}"),
        None => writeln!(f, "{label}: no documents"),
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// For each tenth of the total count, the first bin whose running sum
/// passes it.
fn decile_bins(histogram: &Histogram) -> Vec<usize> {
    let total = histogram.total();
    let step = usize::try_from((total / 10).max(1)).unwrap_or(usize::MAX);
    let cumulative: Vec<u64> = histogram
        .bins()
        .iter()
        .scan(0u64, |sum, &count| {
            *sum += count;
            Some(*sum)
        })
        .collect();
    (1..total)
        .step_by(step)
        .map(|threshold| cumulative.partition_point(|&sum| sum <= threshold))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{StatsConfig, parse_stats};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn stats(html: &str) -> StatsSnapshot {
        parse_stats(html, &StatsConfig::default()).unwrap()
    }

    #[test]
    fn test_summary_of_series() {
        let summary = Summary::of(&[4.0, 100.0, 1.0, 3.0, 2.0]).unwrap();
        assert!(close(summary.mean, 22.0));
        assert!(close(summary.median, 3.0));
        // Rank 3.8 lies between 4 and 100.
        assert!(close(summary.p95, 80.8));
        assert!(close(summary.max, 100.0));
        assert_eq!(
            summary.to_string(),
            "mean=22.00, median=3.00, 95th%=80.80, max=100.00"
        );
    }

    #[test]
    fn test_summary_of_nothing() {
        assert_eq!(Summary::of(&[]), None);
        assert_eq!(CorpusStats::default().summary(Metric::Nodes), None);
    }

    #[test]
    fn test_record_merges_histograms() {
        let small = stats("<p>x</p>");
        let large = stats("<ul><li>a<li>b<li>c</ul>");

        let mut corpus = CorpusStats::default();
        corpus.record(&small);
        corpus.record(&large);

        assert_eq!(corpus.documents().len(), 2);
        assert_eq!(corpus.documents()[1].nodes, large.nodes.nodes);
        let child = &corpus.histograms().child;
        assert_eq!(
            child.total(),
            small.histograms.child.total() + large.histograms.child.total()
        );
        assert_eq!(child.len(), large.histograms.child.len());

        #[allow(clippy::cast_precision_loss)]
        let most = large.nodes.nodes as f64;
        assert!(close(corpus.summary(Metric::Nodes).unwrap().max, most));
    }

    #[test]
    fn test_ratio_skips_zero_denominators() {
        let mut corpus = CorpusStats::default();
        corpus.record(&stats(""));
        corpus.record(&stats("<p>x</p>"));

        let per_kb = corpus.ratio(Metric::Nodes, Metric::InputKb).unwrap();
        // Only the second document has a length: 5 nodes over 0.008 kB.
        assert!((per_kb.mean - 625.0).abs() < 1e-6);
        assert!(close(per_kb.max, per_kb.mean));
    }

    #[test]
    fn test_record_error() {
        let mut corpus = CorpusStats::default();
        corpus.record_error(&StatsError::HistogramAllocation {
            histogram: HistogramKind::Text,
            len: usize::MAX,
        });
        corpus.record_error(&StatsError::HistogramOverflow {
            histogram: HistogramKind::Child,
            value: 3,
            len: 1,
        });
        corpus.record_error(&StatsError::HistogramAllocation {
            histogram: HistogramKind::Child,
            len: usize::MAX,
        });
        assert_eq!(corpus.out_of_memory(), 2);
        assert_eq!(corpus.failed(), 1);
        assert!(corpus.documents().is_empty());
    }

    #[test]
    fn test_decile_bins() {
        let mut histogram = Histogram::with_max(HistogramKind::Text, 1).unwrap();
        for value in [0, 0, 0, 0, 0, 1, 1, 1, 1, 1] {
            assert!(histogram.increment(value));
        }
        assert_eq!(decile_bins(&histogram), vec![0, 0, 0, 0, 1, 1, 1, 1, 1]);
        assert!(decile_bins(&Histogram::default()).is_empty());
    }

    #[test]
    fn test_summary_report() {
        let mut corpus = CorpusStats::default();
        corpus.record(&stats("<html><body>Hi</body></html>"));
        corpus.record(&stats("<p class=a>x</p>"));

        let report = corpus.to_string();
        assert!(report.starts_with("Documents = 2\nout_of_memory = 0\nfailed = 0\n"));
        assert!(report.contains("\nparse_time_us: mean="));
        assert!(report.contains("\nnodes: mean="));
        assert!(report.contains("\nnodes / input_kb: mean="));
        assert!(report.contains("\nbytes_allocated / high_water_mark: mean="));
        assert!(report.contains("\nattribute_value: total=1, bins=2\n0 1\n"));
    }
}
