//! Bounded count arrays, sized once from an observed maximum.

use serde::Serialize;
use strum_macros::{Display, EnumIter};

use crate::bounds::MaxBounds;
use crate::error::StatsError;

/// The five structural metrics the collector bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum HistogramKind {
    /// Child-list length of documents and elements.
    Child,
    /// Byte length of text payloads and document identifiers.
    Text,
    /// Attribute-list length of elements.
    Attribute,
    /// Byte length of attribute names.
    AttributeName,
    /// Byte length of attribute values.
    AttributeValue,
}

/// Counts indexed `0..=max`.
///
/// The length is fixed when the histogram is built. Values past the end are
/// refused and tallied in [`Histogram::dropped`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Histogram {
    bins: Vec<u64>,
    dropped: u64,
}

impl Histogram {
    /// A zero-filled histogram able to count every value in `0..=max`.
    ///
    /// # Errors
    ///
    /// [`StatsError::HistogramAllocation`] if `max + 1` bins cannot be
    /// allocated.
    pub fn with_max(kind: HistogramKind, max: usize) -> Result<Self, StatsError> {
        let Some(len) = max.checked_add(1) else {
            return Err(StatsError::HistogramAllocation {
                histogram: kind,
                len: usize::MAX,
            });
        };
        let mut bins = Vec::new();
        bins.try_reserve_exact(len)
            .map_err(|_| StatsError::HistogramAllocation {
                histogram: kind,
                len,
            })?;
        bins.resize(len, 0);
        Ok(Self { bins, dropped: 0 })
    }

    /// Count one occurrence of `value`. Returns `false`, and counts a drop,
    /// when `value` is out of range.
    pub fn increment(&mut self, value: usize) -> bool {
        if let Some(bin) = self.bins.get_mut(value) {
            *bin += 1;
            true
        } else {
            self.dropped += 1;
            false
        }
    }

    /// Number of bins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Whether the histogram has no bins (never built, or released).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Largest countable value.
    #[must_use]
    pub fn max(&self) -> Option<usize> {
        self.bins.len().checked_sub(1)
    }

    /// All bins, index 0 first.
    #[must_use]
    pub fn bins(&self) -> &[u64] {
        &self.bins
    }

    /// Count at `value`, or `None` past the end.
    #[must_use]
    pub fn get(&self, value: usize) -> Option<u64> {
        self.bins.get(value).copied()
    }

    /// Increments refused for being out of range.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Sum over all bins.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.bins.iter().sum()
    }

    /// Add `other` bin by bin, growing to its length if it is longer.
    /// Drops are added too.
    pub fn merge(&mut self, other: &Self) {
        if self.bins.len() < other.bins.len() {
            self.bins.resize(other.bins.len(), 0);
        }
        for (bin, count) in self.bins.iter_mut().zip(&other.bins) {
            *bin += count;
        }
        self.dropped += other.dropped;
    }

    /// Give the bin storage back to the heap. The histogram is empty
    /// afterwards.
    pub fn release(&mut self) {
        self.bins = Vec::new();
    }
}

/// The five histograms of one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Histograms {
    /// See [`HistogramKind::Child`].
    pub child: Histogram,
    /// See [`HistogramKind::Text`].
    pub text: Histogram,
    /// See [`HistogramKind::Attribute`].
    pub attribute: Histogram,
    /// See [`HistogramKind::AttributeName`].
    pub attribute_name: Histogram,
    /// See [`HistogramKind::AttributeValue`].
    pub attribute_value: Histogram,
}

impl Histograms {
    /// Size every histogram from its maximum.
    ///
    /// # Errors
    ///
    /// The first [`StatsError::HistogramAllocation`]; nothing is kept.
    pub fn from_bounds(bounds: &MaxBounds) -> Result<Self, StatsError> {
        Ok(Self {
            child: Histogram::with_max(HistogramKind::Child, bounds.children)?,
            text: Histogram::with_max(HistogramKind::Text, bounds.text)?,
            attribute: Histogram::with_max(HistogramKind::Attribute, bounds.attributes)?,
            attribute_name: Histogram::with_max(
                HistogramKind::AttributeName,
                bounds.attribute_name,
            )?,
            attribute_value: Histogram::with_max(
                HistogramKind::AttributeValue,
                bounds.attribute_value,
            )?,
        })
    }

    /// The histogram for `kind`.
    #[must_use]
    pub const fn get(&self, kind: HistogramKind) -> &Histogram {
        match kind {
            HistogramKind::Child => &self.child,
            HistogramKind::Text => &self.text,
            HistogramKind::Attribute => &self.attribute,
            HistogramKind::AttributeName => &self.attribute_name,
            HistogramKind::AttributeValue => &self.attribute_value,
        }
    }

    /// Mutable access to the histogram for `kind`.
    pub const fn get_mut(&mut self, kind: HistogramKind) -> &mut Histogram {
        match kind {
            HistogramKind::Child => &mut self.child,
            HistogramKind::Text => &mut self.text,
            HistogramKind::Attribute => &mut self.attribute,
            HistogramKind::AttributeName => &mut self.attribute_name,
            HistogramKind::AttributeValue => &mut self.attribute_value,
        }
    }

    /// Merge each of `other`'s histograms into the matching one here.
    pub fn merge(&mut self, other: &Self) {
        self.child.merge(&other.child);
        self.text.merge(&other.text);
        self.attribute.merge(&other.attribute);
        self.attribute_name.merge(&other.attribute_name);
        self.attribute_value.merge(&other.attribute_value);
    }

    /// Release all five.
    pub fn release(&mut self) {
        self.child.release();
        self.text.release();
        self.attribute.release();
        self.attribute_name.release();
        self.attribute_value.release();
    }

    /// Total drops across all five.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.child.dropped
            + self.text.dropped
            + self.attribute.dropped
            + self.attribute_name.dropped
            + self.attribute_value.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_max_is_zero_filled() {
        let histogram = Histogram::with_max(HistogramKind::Child, 4).unwrap();
        assert_eq!(histogram.len(), 5);
        assert_eq!(histogram.max(), Some(4));
        assert_eq!(histogram.bins(), &[0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_increment_in_and_out_of_range() {
        let mut histogram = Histogram::with_max(HistogramKind::Text, 2).unwrap();
        assert!(histogram.increment(0));
        assert!(histogram.increment(2));
        assert!(histogram.increment(2));
        assert!(!histogram.increment(3));
        assert!(!histogram.increment(100));

        assert_eq!(histogram.bins(), &[1, 0, 2]);
        assert_eq!(histogram.len(), 3);
        assert_eq!(histogram.dropped(), 2);
        assert_eq!(histogram.total(), 3);
    }

    #[test]
    fn test_max_overflow_is_an_allocation_error() {
        let err = Histogram::with_max(HistogramKind::AttributeName, usize::MAX).unwrap_err();
        assert!(matches!(
            err,
            StatsError::HistogramAllocation {
                histogram: HistogramKind::AttributeName,
                ..
            }
        ));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut histograms = Histograms::from_bounds(&MaxBounds {
            children: 3,
            text: 10,
            attributes: 1,
            attribute_name: 4,
            attribute_value: 8,
        })
        .unwrap();
        assert_eq!(histograms.get(HistogramKind::Text).len(), 11);

        histograms.release();
        histograms.release();
        assert!(histograms.child.is_empty());
        assert!(histograms.attribute_value.is_empty());
        assert_eq!(histograms.text.max(), None);
    }

    #[test]
    fn test_merge_grows_to_the_longer_histogram() {
        let mut merged = Histogram::default();
        let mut short = Histogram::with_max(HistogramKind::Child, 1).unwrap();
        assert!(short.increment(1));
        assert!(!short.increment(5));
        let mut long = Histogram::with_max(HistogramKind::Child, 3).unwrap();
        assert!(long.increment(1));
        assert!(long.increment(3));

        merged.merge(&short);
        assert_eq!(merged.bins(), &[0, 1]);
        merged.merge(&long);
        assert_eq!(merged.bins(), &[0, 2, 0, 1]);
        merged.merge(&short);
        assert_eq!(merged.bins(), &[0, 3, 0, 1]);
        assert_eq!(merged.dropped(), 2);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(HistogramKind::Child.to_string(), "child");
        assert_eq!(HistogramKind::AttributeValue.to_string(), "attribute_value");
    }
}
