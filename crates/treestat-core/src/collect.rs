//! Second pass: node, flag and histogram counts.

use serde::Serialize;
use tracing::warn;
use treestat_dom::{DomTree, NodeType, ParseFlag, ParseFlags};

use crate::driver::OverflowPolicy;
use crate::error::StatsError;
use crate::histogram::{HistogramKind, Histograms};

/// Nodes by variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NodeCounts {
    /// Every attached node.
    pub nodes: u64,
    /// Document nodes; one per tree.
    pub documents: u64,
    /// Elements.
    pub elements: u64,
    /// Text runs with at least one non-whitespace character.
    pub text: u64,
    /// Whitespace-only text runs.
    pub whitespace: u64,
    /// CDATA sections.
    pub cdata: u64,
    /// Comments.
    pub comments: u64,
}

/// Nodes carrying each parser-behavior flag. A node with several flags is
/// counted once under each.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlagCounts {
    /// Created without a start tag in the source.
    pub parser_inserted: u64,
    /// Recreated from the list of active formatting elements.
    pub reconstructed_formatting_element: u64,
    /// Cloned by the adoption agency algorithm.
    pub adoption_agency_cloned: u64,
    /// Re-parented by the adoption agency algorithm.
    pub adoption_agency_moved: u64,
    /// Inserted at a foster-parent location.
    pub foster_parented: u64,
}

impl FlagCounts {
    /// The counter for `flag`.
    #[must_use]
    pub const fn get(&self, flag: ParseFlag) -> u64 {
        match flag {
            ParseFlag::ParserInserted => self.parser_inserted,
            ParseFlag::ReconstructedFormattingElement => self.reconstructed_formatting_element,
            ParseFlag::AdoptionAgencyCloned => self.adoption_agency_cloned,
            ParseFlag::AdoptionAgencyMoved => self.adoption_agency_moved,
            ParseFlag::FosterParented => self.foster_parented,
        }
    }

    const fn get_mut(&mut self, flag: ParseFlag) -> &mut u64 {
        match flag {
            ParseFlag::ParserInserted => &mut self.parser_inserted,
            ParseFlag::ReconstructedFormattingElement => &mut self.reconstructed_formatting_element,
            ParseFlag::AdoptionAgencyCloned => &mut self.adoption_agency_cloned,
            ParseFlag::AdoptionAgencyMoved => &mut self.adoption_agency_moved,
            ParseFlag::FosterParented => &mut self.foster_parented,
        }
    }

    fn record(&mut self, flags: ParseFlags) {
        for flag in flags.iter() {
            *self.get_mut(flag) += 1;
        }
    }
}

/// Walks a tree once, parents before children, filling counters and
/// pre-sized histograms.
pub struct Collector<'a> {
    /// Counts by node variant.
    pub nodes: NodeCounts,
    /// Counts by flag.
    pub flags: FlagCounts,
    histograms: &'a mut Histograms,
    policy: OverflowPolicy,
}

impl<'a> Collector<'a> {
    /// A collector writing into `histograms`, which must already be sized.
    pub fn new(histograms: &'a mut Histograms, policy: OverflowPolicy) -> Self {
        Self {
            nodes: NodeCounts::default(),
            flags: FlagCounts::default(),
            histograms,
            policy,
        }
    }

    /// Count every attached node of `tree`.
    ///
    /// # Errors
    ///
    /// Only under [`OverflowPolicy::Strict`]: the first value that does not
    /// fit its histogram.
    pub fn collect(&mut self, tree: &DomTree) -> Result<(), StatsError> {
        for (_, node) in tree.descendants() {
            self.nodes.nodes += 1;
            self.flags.record(node.flags);

            match &node.node_type {
                NodeType::Document(document) => {
                    self.nodes.documents += 1;
                    self.bin(HistogramKind::Child, node.children.len())?;
                    self.bin(HistogramKind::Text, document.name.len())?;
                    self.bin(HistogramKind::Text, document.public_identifier.len())?;
                    self.bin(HistogramKind::Text, document.system_identifier.len())?;
                }
                NodeType::Element(element) => {
                    self.nodes.elements += 1;
                    self.bin(HistogramKind::Child, node.children.len())?;
                    self.bin(HistogramKind::Attribute, element.attrs.len())?;
                    for attr in &element.attrs {
                        self.bin(HistogramKind::AttributeName, attr.name.len())?;
                        self.bin(HistogramKind::AttributeValue, attr.value.len())?;
                    }
                }
                NodeType::Text(text) => {
                    self.nodes.text += 1;
                    self.bin(HistogramKind::Text, text.len())?;
                }
                NodeType::Whitespace(text) => {
                    self.nodes.whitespace += 1;
                    self.bin(HistogramKind::Text, text.len())?;
                }
                NodeType::Comment(text) => {
                    self.nodes.comments += 1;
                    self.bin(HistogramKind::Text, text.len())?;
                }
                NodeType::CData(text) => {
                    self.nodes.cdata += 1;
                    self.bin(HistogramKind::Text, text.len())?;
                }
            }
        }
        Ok(())
    }

    fn bin(&mut self, kind: HistogramKind, value: usize) -> Result<(), StatsError> {
        let histogram = self.histograms.get_mut(kind);
        if histogram.increment(value) {
            return Ok(());
        }
        let len = histogram.len();
        match self.policy {
            OverflowPolicy::Drop => {
                warn!(histogram = %kind, value, len, "value out of histogram range, dropped");
                Ok(())
            }
            OverflowPolicy::Strict => Err(StatsError::HistogramOverflow {
                histogram: kind,
                value,
                len,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::{MaxBounds, find_max};

    fn collect(html: &str, policy: OverflowPolicy) -> (NodeCounts, FlagCounts, Histograms) {
        let output = treestat_html::parse(html);
        let mut histograms = Histograms::from_bounds(&find_max(&output.document)).unwrap();
        let mut collector = Collector::new(&mut histograms, policy);
        collector.collect(&output.document).unwrap();
        let (nodes, flags) = (collector.nodes, collector.flags);
        (nodes, flags, histograms)
    }

    #[test]
    fn test_minimal_document() {
        let (nodes, flags, histograms) =
            collect("<html><body>Hi</body></html>", OverflowPolicy::Strict);
        assert_eq!(nodes.nodes, 4);
        assert_eq!(nodes.documents, 1);
        assert_eq!(nodes.elements, 2);
        assert_eq!(nodes.text, 1);
        assert_eq!(flags, FlagCounts::default());

        // Document, html and body each have one child.
        assert_eq!(histograms.child.bins(), &[0, 3]);
        // "Hi" plus three empty document identifiers.
        assert_eq!(histograms.text.get(0), Some(3));
        assert_eq!(histograms.text.get(2), Some(1));
    }

    #[test]
    fn test_node_with_two_flags_counts_under_each() {
        let mut flags = ParseFlags::only(ParseFlag::AdoptionAgencyCloned);
        flags.insert(ParseFlag::FosterParented);

        let mut counts = FlagCounts::default();
        counts.record(flags);
        counts.record(ParseFlags::only(ParseFlag::FosterParented));
        counts.record(ParseFlags::NONE);

        assert_eq!(counts.get(ParseFlag::AdoptionAgencyCloned), 1);
        assert_eq!(counts.get(ParseFlag::FosterParented), 2);
        assert_eq!(counts.foster_parented, 2);
        assert_eq!(counts.get(ParseFlag::ParserInserted), 0);
    }

    #[test]
    fn test_undersized_histograms_drop() {
        let output = treestat_html::parse("<p a=1 b=22>xyz</p>");
        let mut histograms = Histograms::from_bounds(&MaxBounds::default()).unwrap();
        let mut collector = Collector::new(&mut histograms, OverflowPolicy::Drop);
        collector.collect(&output.document).unwrap();
        let nodes = collector.nodes;

        assert_eq!(nodes.elements, 3);
        // Every parent here has exactly one child.
        assert_eq!(histograms.child.get(0), Some(0));
        assert_eq!(histograms.child.dropped(), 4);
        // Three empty identifiers fit; "xyz" does not.
        assert_eq!(histograms.text.get(0), Some(3));
        assert_eq!(histograms.text.dropped(), 1);
        assert_eq!(histograms.attribute.get(0), Some(2));
        assert_eq!(histograms.attribute.dropped(), 1);
        assert_eq!(histograms.attribute_name.dropped(), 2);
        assert_eq!(histograms.attribute_value.dropped(), 2);
    }

    #[test]
    fn test_undersized_histograms_fail_when_strict() {
        let output = treestat_html::parse("<p>x</p>");
        let mut histograms = Histograms::from_bounds(&MaxBounds::default()).unwrap();
        let mut collector = Collector::new(&mut histograms, OverflowPolicy::Strict);
        let err = collector.collect(&output.document).unwrap_err();
        assert!(matches!(
            err,
            StatsError::HistogramOverflow {
                histogram: HistogramKind::Child,
                value: 1,
                len: 1,
            }
        ));
    }
}
