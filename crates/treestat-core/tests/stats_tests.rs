//! End-to-end tests for `parse_stats`.

use treestat_core::{
    OverflowPolicy, StatCollectingAllocator, StatsConfig, StatsSnapshot, destroy_stats,
    parse_stats, parse_stats_bytes,
};
use treestat_html::{ParseOptions, destroy_output, parse_with_options};

fn stats(html: &str) -> StatsSnapshot {
    parse_stats(html, &StatsConfig::default()).expect("stats")
}

#[test]
fn test_minimal_document() {
    let stats = stats("<html><body>Hi</body></html>");
    assert_eq!(stats.nodes.elements, 2);
    assert_eq!(stats.nodes.text, 1);
    assert_eq!(stats.nodes.nodes, 4);
    assert_eq!(stats.nodes.documents, 1);
    assert_eq!(stats.flags.parser_inserted, 0);
    assert_eq!(stats.input_len, 28);
}

#[test]
fn test_empty_input() {
    let stats = stats("");
    assert_eq!(stats.nodes.elements, 2);
    assert_eq!(stats.nodes.nodes, 3);
    assert_eq!(stats.flags.parser_inserted, 2);
}

#[test]
fn test_node_variants() {
    let stats = stats("<!--a--><div> </div><svg><![CDATA[x]]></svg>");
    assert_eq!(stats.nodes.comments, 1);
    assert_eq!(stats.nodes.whitespace, 1);
    assert_eq!(stats.nodes.cdata, 1);
    assert_eq!(stats.nodes.text, 0);
}

#[test]
fn test_stray_end_p_is_parser_inserted() {
    let stats = stats("<div></p></div>");
    // html, body and the p.
    assert_eq!(stats.flags.parser_inserted, 3);
}

#[test]
fn test_adoption_agency_counts() {
    let stats = stats("<b><p>x</b>y");
    assert_eq!(stats.flags.adoption_agency_cloned, 1);
    assert_eq!(stats.flags.adoption_agency_moved, 2);
    assert_eq!(stats.flags.reconstructed_formatting_element, 0);
}

#[test]
fn test_foster_parenting_counts() {
    let stats = stats("<table>x<tr><td>y</td></tr></table>");
    assert_eq!(stats.flags.foster_parented, 1);
    // html, body and tbody.
    assert_eq!(stats.flags.parser_inserted, 3);
}

#[test]
fn test_reconstruction_counts() {
    let stats = stats("<p><b>x<p>y");
    assert_eq!(stats.flags.reconstructed_formatting_element, 1);
}

#[test]
fn test_doctype_name_is_binned_as_text() {
    let stats = stats("<!DOCTYPE html><p>x</p>");
    assert_eq!(stats.histograms.text.get(4), Some(1));
    assert_eq!(stats.parse_errors, 0);
}

#[test]
fn test_histograms_sized_from_document() {
    let stats = stats(r#"<p class="intro" id=a>one</p><p>three</p>"#);
    assert_eq!(stats.histograms.attribute.max(), Some(2));
    assert_eq!(stats.histograms.attribute_name.max(), Some(5));
    assert_eq!(stats.histograms.attribute_value.max(), Some(5));
    assert_eq!(stats.histograms.dropped(), 0);

    let child_total = stats.histograms.child.total();
    assert_eq!(child_total, stats.nodes.documents + stats.nodes.elements);
}

#[test]
fn test_memory_figures() {
    let stats = stats("<ul><li>one<li>two<li>three</ul>");
    let memory = stats.memory;

    assert!(memory.allocations > 0);
    assert!(memory.frees <= memory.allocations);
    assert!(stats.live_bytes() > 0);
    assert!(memory.high_water_mark >= stats.live_bytes());
    assert!(stats.bytes_freed_during_parsing <= memory.bytes_freed);
    assert!(stats.bytes_freed_on_destroy > 0);
}

#[test]
fn test_histogram_memory_is_not_measured() {
    let mut html = "<div><p class=abcdefghij>".repeat(50);
    html.push_str(&"x".repeat(5000));

    let allocator = StatCollectingAllocator::new();
    let options = ParseOptions {
        allocator: &allocator,
        max_errors: None,
    };
    let output = parse_with_options(&options, &html);
    let engine_only = allocator.stats();
    destroy_output(&options, output);

    let stats = stats(&html);
    assert_eq!(stats.histograms.text.max(), Some(5000));
    assert_eq!(stats.memory.allocations, engine_only.allocations);
    assert_eq!(stats.memory.bytes_allocated, engine_only.bytes_allocated);
    assert_eq!(stats.memory.high_water_mark, engine_only.high_water_mark);
}

#[test]
fn test_input_len_counts_raw_bytes() {
    // Each invalid byte decodes to a three-byte U+FFFD.
    let bytes = b"<p>\xff\xfe</p>";
    let raw = parse_stats_bytes(bytes, &StatsConfig::default()).unwrap();
    assert_eq!(raw.input_len, 9);
    assert_eq!(raw.nodes.text, 1);
    assert_eq!(raw.histograms.text.max(), Some(6));

    let decoded = String::from_utf8_lossy(bytes);
    assert_eq!(stats(&decoded).input_len, 13);
}

#[test]
fn test_destroy_releases_every_block() {
    let allocator = StatCollectingAllocator::new();
    let options = ParseOptions {
        allocator: &allocator,
        max_errors: None,
    };

    let output = parse_with_options(&options, "<table><tr><td><b>x</table><i>y");
    let parsed = allocator.stats();
    assert!(parsed.frees < parsed.allocations);

    destroy_output(&options, output);
    let destroyed = allocator.stats();
    assert_eq!(destroyed.frees, destroyed.allocations);
    assert_eq!(destroyed.allocations, parsed.allocations);
    assert!(destroyed.bytes_freed >= destroyed.bytes_allocated);
}

#[test]
fn test_error_cap_is_passed_to_engine() {
    let config = StatsConfig {
        max_errors: Some(0),
        ..StatsConfig::default()
    };
    let capped = parse_stats("<p>x</div>", &config).unwrap();
    assert_eq!(capped.parse_errors, 0);

    let uncapped = stats("<p>x</div>");
    assert!(uncapped.parse_errors >= 2);
}

#[test]
fn test_strict_policy_succeeds_on_real_documents() {
    let config = StatsConfig {
        overflow_policy: OverflowPolicy::Strict,
        ..StatsConfig::default()
    };
    let stats = parse_stats("<div><a href=x>1</a><a>2</a></div>", &config).unwrap();
    assert_eq!(stats.nodes.elements, 5);
}

#[test]
fn test_destroy_stats() {
    let mut stats = stats("<p>x</p>");
    assert!(!stats.histograms.child.is_empty());
    stats.release_histograms();
    assert!(stats.histograms.text.is_empty());
    destroy_stats(stats);
}
