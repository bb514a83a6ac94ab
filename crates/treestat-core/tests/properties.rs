//! Property tests over generated markup.

use quickcheck_macros::quickcheck;
use treestat_core::{
    Collector, Histograms, MaxBounds, OverflowPolicy, StatsConfig, StatsSnapshot, find_max,
    parse_stats,
};

/// Pieces that exercise the tree builder's recovery paths when shuffled.
const FRAGMENTS: &[&str] = &[
    "<p>",
    "</p>",
    "<b>",
    "</b>",
    "<i>",
    "</i>",
    "<div class=x>",
    "</div>",
    "<table>",
    "</table>",
    "<tr>",
    "<td>",
    "</td>",
    "<li>",
    "<ul>",
    "</ul>",
    "<span title='a b'>",
    "</span>",
    "<svg>",
    "</svg>",
    "<![CDATA[cd]]>",
    "<!-- note -->",
    "<br>",
    "<img src=a alt=\"\">",
    "<title>t</title>",
    "<script>a<b</script>",
    "text",
    " ",
    "\n",
    "&amp;",
    "&#x41;",
    "<!DOCTYPE html>",
];

fn markup(picks: &[u8]) -> String {
    picks
        .iter()
        .map(|&pick| FRAGMENTS[usize::from(pick) % FRAGMENTS.len()])
        .collect()
}

fn stats(picks: &[u8], policy: OverflowPolicy) -> StatsSnapshot {
    let config = StatsConfig {
        overflow_policy: policy,
        ..StatsConfig::default()
    };
    parse_stats(&markup(picks), &config).expect("stats")
}

#[quickcheck]
fn node_counts_sum_to_total(picks: Vec<u8>) -> bool {
    let nodes = stats(&picks, OverflowPolicy::Drop).nodes;
    nodes.nodes
        == nodes.documents
            + nodes.elements
            + nodes.text
            + nodes.whitespace
            + nodes.cdata
            + nodes.comments
}

#[quickcheck]
fn child_histogram_counts_every_parent(picks: Vec<u8>) -> bool {
    let stats = stats(&picks, OverflowPolicy::Drop);
    stats.histograms.child.total() == stats.nodes.documents + stats.nodes.elements
}

#[quickcheck]
fn bounds_cover_every_value(picks: Vec<u8>) -> bool {
    let stats = stats(&picks, OverflowPolicy::Strict);
    stats.histograms.dropped() == 0
}

#[quickcheck]
fn high_water_mark_covers_live_bytes(picks: Vec<u8>) -> bool {
    let stats = stats(&picks, OverflowPolicy::Drop);
    stats.memory.high_water_mark >= stats.live_bytes()
        && stats.memory.frees <= stats.memory.allocations
}

#[quickcheck]
fn undersized_bounds_drop_exactly_the_overflow(picks: Vec<u8>, cap: u8) -> bool {
    let output = treestat_html::parse(&markup(&picks));
    let cap = usize::from(cap % 8);
    let full = find_max(&output.document);
    let bounds = MaxBounds {
        children: full.children.min(cap),
        text: full.text.min(cap),
        ..full
    };

    let mut histograms = Histograms::from_bounds(&bounds).expect("histograms");
    let mut collector = Collector::new(&mut histograms, OverflowPolicy::Drop);
    if collector.collect(&output.document).is_err() {
        return false;
    }
    let nodes = collector.nodes;

    let parents = nodes.documents + nodes.elements;
    let child = &histograms.child;
    let attribute = &histograms.attribute;
    child.total() + child.dropped() == parents
        && attribute.dropped() == 0
        && attribute.total() == nodes.elements
}
