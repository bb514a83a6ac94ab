//! Integration tests for tree construction and the parse flags it records.

use treestat_dom::{DomTree, Namespace, NodeId, NodeType};
use treestat_html::{ParseErrorKind, ParseOptions, parse, parse_with_options};

/// Helper to parse and keep only the document.
fn parse_tree(html: &str) -> DomTree {
    parse(html).document
}

/// Helper to find the first element with a tag name, in document order.
fn find_element(tree: &DomTree, tag: &str) -> Option<NodeId> {
    tree.descendants()
        .find(|(id, _)| tree.tag_name(*id) == Some(tag))
        .map(|(id, _)| id)
}

/// Helper to find every element with a tag name, in document order.
fn find_all(tree: &DomTree, tag: &str) -> Vec<NodeId> {
    tree.descendants()
        .filter(|(id, _)| tree.tag_name(*id) == Some(tag))
        .map(|(id, _)| id)
        .collect()
}

fn body(tree: &DomTree) -> NodeId {
    tree.body().expect("body")
}

fn node_type(tree: &DomTree, id: NodeId) -> &NodeType {
    &tree.get(id).expect("node").node_type
}

#[test]
fn test_empty_input_synthesizes_html_and_body() {
    let tree = parse_tree("");
    assert_eq!(tree.descendants().count(), 3);

    let html = tree.document_element().expect("html");
    assert!(tree.get(html).unwrap().flags.parser_inserted);
    assert!(tree.get(body(&tree)).unwrap().flags.parser_inserted);
    assert!(tree.html_child("head").is_none());
}

#[test]
fn test_explicit_document_has_no_flags() {
    let tree = parse_tree("<html><body>Hi</body></html>");
    assert_eq!(tree.descendants().count(), 4);

    let body = body(&tree);
    let text = tree.children(body)[0];
    assert_eq!(tree.as_text(text), Some("Hi"));
    assert!(tree.descendants().all(|(_, node)| node.flags.is_empty()));
}

#[test]
fn test_doctype_is_recorded_on_document() {
    let output = parse("<!DOCTYPE html><p>x");
    let document = output.document.document();
    assert!(document.has_doctype);
    assert_eq!(document.name, "html");
    assert!(
        !output
            .errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::MissingDoctype)
    );
}

#[test]
fn test_missing_doctype_is_an_error() {
    let output = parse("<p>x</p>");
    assert!(!output.document.document().has_doctype);
    assert_eq!(output.errors[0].kind, ParseErrorKind::MissingDoctype);
}

#[test]
fn test_head_synthesized_for_head_content() {
    let tree = parse_tree("<title>T</title><p>x</p>");
    let head = tree.html_child("head").expect("head");
    assert!(tree.get(head).unwrap().flags.parser_inserted);

    let title = find_element(&tree, "title").expect("title");
    assert_eq!(tree.parent(title), Some(head));
    assert_eq!(tree.as_text(tree.children(title)[0]), Some("T"));
}

#[test]
fn test_no_head_without_head_content() {
    let tree = parse_tree("<p>x</p>");
    assert!(tree.html_child("head").is_none());
    assert!(find_element(&tree, "p").is_some());
}

#[test]
fn test_stray_end_p_inserts_empty_paragraph() {
    let output = parse("<div></p></div>");
    let tree = &output.document;
    let div = find_element(tree, "div").expect("div");
    let p = find_element(tree, "p").expect("p");

    assert_eq!(tree.parent(p), Some(div));
    assert!(tree.get(p).unwrap().flags.parser_inserted);
    assert!(tree.children(p).is_empty());
    assert!(
        output
            .errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::UnexpectedEndTag)
    );
}

#[test]
fn test_implied_tbody() {
    let tree = parse_tree("<table><tr><td>x</td></tr></table>");
    let table = find_element(&tree, "table").expect("table");
    let tbody = find_element(&tree, "tbody").expect("tbody");
    let tr = find_element(&tree, "tr").expect("tr");

    assert_eq!(tree.parent(tbody), Some(table));
    assert_eq!(tree.parent(tr), Some(tbody));
    assert!(tree.get(tbody).unwrap().flags.parser_inserted);
    assert!(!tree.get(tr).unwrap().flags.parser_inserted);
}

#[test]
fn test_implied_colgroup() {
    let tree = parse_tree("<table><col></table>");
    let colgroup = find_element(&tree, "colgroup").expect("colgroup");
    let col = find_element(&tree, "col").expect("col");

    assert_eq!(tree.parent(col), Some(colgroup));
    assert!(tree.get(colgroup).unwrap().flags.parser_inserted);
}

#[test]
fn test_text_in_table_is_foster_parented() {
    let output = parse("<table>x<tr><td>y</td></tr></table>");
    let tree = &output.document;
    let body = body(tree);
    let children = tree.children(body);

    assert_eq!(children.len(), 2);
    assert_eq!(tree.as_text(children[0]), Some("x"));
    assert!(tree.get(children[0]).unwrap().flags.foster_parented);
    assert_eq!(tree.tag_name(children[1]), Some("table"));

    let td = find_element(tree, "td").expect("td");
    assert_eq!(tree.as_text(tree.children(td)[0]), Some("y"));
    assert!(
        output
            .errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::UnexpectedTextInTable)
    );
}

#[test]
fn test_adoption_agency_clones_and_moves() {
    let output = parse("<b><p>x</b>y");
    let tree = &output.document;
    let body = body(tree);

    let children = tree.children(body);
    assert_eq!(children.len(), 2);
    assert_eq!(tree.tag_name(children[0]), Some("b"));
    assert_eq!(tree.tag_name(children[1]), Some("p"));
    assert!(tree.children(children[0]).is_empty());

    let p = children[1];
    assert!(tree.get(p).unwrap().flags.adoption_agency_moved);

    let p_children = tree.children(p);
    assert_eq!(p_children.len(), 2);
    let clone = p_children[0];
    assert_eq!(tree.tag_name(clone), Some("b"));
    assert!(tree.get(clone).unwrap().flags.adoption_agency_cloned);
    assert_eq!(tree.as_text(p_children[1]), Some("y"));

    let moved_text = tree.children(clone)[0];
    assert_eq!(tree.as_text(moved_text), Some("x"));
    assert!(tree.get(moved_text).unwrap().flags.adoption_agency_moved);

    assert!(
        output
            .errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::MisnestedFormattingElement)
    );
}

#[test]
fn test_formatting_elements_are_reconstructed() {
    let tree = parse_tree("<p><b>x<p>y");
    let paragraphs = find_all(&tree, "p");
    assert_eq!(paragraphs.len(), 2);

    let first_b = tree.children(paragraphs[0])[0];
    assert!(!tree.get(first_b).unwrap().flags.reconstructed_formatting_element);

    let second_b = tree.children(paragraphs[1])[0];
    assert_eq!(tree.tag_name(second_b), Some("b"));
    assert!(tree.get(second_b).unwrap().flags.reconstructed_formatting_element);
    assert_eq!(tree.as_text(tree.children(second_b)[0]), Some("y"));
}

#[test]
fn test_whitespace_and_text_runs() {
    let tree = parse_tree("<div> </div><div> a</div>");
    let divs = find_all(&tree, "div");

    let first = tree.children(divs[0])[0];
    assert_eq!(
        node_type(&tree, first),
        &NodeType::Whitespace(" ".to_string())
    );

    let second = tree.children(divs[1]);
    assert_eq!(second.len(), 1);
    assert_eq!(
        node_type(&tree, second[0]),
        &NodeType::Text(" a".to_string())
    );
}

#[test]
fn test_leading_comment_belongs_to_document() {
    let tree = parse_tree("<!-- hi --><p>");
    let first = tree.children(NodeId::ROOT)[0];
    assert_eq!(
        node_type(&tree, first),
        &NodeType::Comment(" hi ".to_string())
    );
}

#[test]
fn test_comment_after_body_goes_to_html() {
    let tree = parse_tree("<body></body><!--c-->");
    let html = tree.document_element().expect("html");
    let last = tree.last_child(html).expect("child");
    assert_eq!(node_type(&tree, last), &NodeType::Comment("c".to_string()));
}

#[test]
fn test_svg_cdata_section() {
    let tree = parse_tree("<svg><![CDATA[a<b]]></svg>");
    let svg = find_element(&tree, "svg").expect("svg");
    assert_eq!(tree.as_element(svg).unwrap().namespace, Namespace::Svg);

    let child = tree.children(svg)[0];
    assert_eq!(node_type(&tree, child), &NodeType::CData("a<b".to_string()));
}

#[test]
fn test_html_tag_breaks_out_of_svg() {
    let tree = parse_tree("<svg><p>x</p></svg>");
    let body = body(&tree);
    let children = tree.children(body);

    assert_eq!(children.len(), 2);
    assert_eq!(tree.tag_name(children[0]), Some("svg"));
    assert_eq!(tree.tag_name(children[1]), Some("p"));
    assert_eq!(
        tree.as_element(children[1]).unwrap().namespace,
        Namespace::Html
    );
}

#[test]
fn test_leading_newline_in_pre_is_dropped() {
    let tree = parse_tree("<pre>\nfoo</pre>");
    let pre = find_element(&tree, "pre").expect("pre");
    assert_eq!(tree.as_text(tree.children(pre)[0]), Some("foo"));
}

#[test]
fn test_script_content_is_raw_text() {
    let tree = parse_tree("<script>if (a<b) x();</script>");
    let head = tree.html_child("head").expect("head");
    let script = find_element(&tree, "script").expect("script");

    assert_eq!(tree.parent(script), Some(head));
    assert_eq!(tree.as_text(tree.children(script)[0]), Some("if (a<b) x();"));
}

#[test]
fn test_well_formed_document_has_no_errors() {
    let output = parse(
        "<!DOCTYPE html><html><head><title>T</title></head>\
         <body><p>x</p></body></html>",
    );
    assert!(output.errors.is_empty(), "{:?}", output.errors);
}

#[test]
fn test_error_cap_is_respected() {
    let options = ParseOptions {
        max_errors: Some(1),
        ..ParseOptions::default()
    };
    let output = parse_with_options(&options, "<p a=1 a=2 a=3></div></span>");
    assert_eq!(output.errors.len(), 1);
}
