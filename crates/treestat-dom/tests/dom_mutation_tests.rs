//! Tests for tree mutation methods: `remove_child`, `insert_before`, `move_children`.

use treestat_dom::{DomTree, ElementData, NodeId, NodeType, ParseFlag, ParseFlags};

/// Helper to create an element node and return its `NodeId`.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag)), ParseFlags::NONE)
}

/// Helper to build `root > div > [a, b, c]` and return the ids.
fn div_with_three(tree: &mut DomTree) -> (NodeId, NodeId, NodeId, NodeId) {
    let parent = alloc_element(tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let a = alloc_element(tree, "a");
    let b = alloc_element(tree, "b");
    let c = alloc_element(tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);
    (parent, a, b, c)
}

// ========== remove_child ==========

#[test]
fn test_remove_child_single_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let child = alloc_element(&mut tree, "p");
    tree.append_child(parent, child);
    assert_eq!(tree.children(parent).len(), 1);

    tree.remove_child(parent, child);

    assert!(tree.children(parent).is_empty());
    assert_eq!(tree.parent(child), None);
    // Detached nodes stay allocated.
    assert_eq!(tree.tag_name(child), Some("p"));
}

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = div_with_three(&mut tree);

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.prev_sibling(c), Some(a));
}

#[test]
fn test_remove_child_not_a_child_is_noop() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = div_with_three(&mut tree);
    let stranger = alloc_element(&mut tree, "span");

    tree.remove_child(parent, stranger);

    assert_eq!(tree.children(parent), &[a, b, c]);
}

// ========== insert_before ==========

#[test]
fn test_insert_before_first() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = div_with_three(&mut tree);
    let x = alloc_element(&mut tree, "x");

    tree.insert_before(parent, x, a);

    assert_eq!(tree.children(parent), &[x, a, b, c]);
    assert_eq!(tree.parent(x), Some(parent));
    assert_eq!(tree.prev_sibling(x), None);
}

#[test]
fn test_insert_before_missing_reference_appends() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = div_with_three(&mut tree);
    let x = alloc_element(&mut tree, "x");
    let stranger = alloc_element(&mut tree, "span");

    tree.insert_before(parent, x, stranger);

    assert_eq!(tree.children(parent), &[a, b, c, x]);
}

// ========== move_children ==========

#[test]
fn test_move_children_preserves_order() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = div_with_three(&mut tree);
    let target = alloc_element(&mut tree, "section");
    let existing = alloc_element(&mut tree, "h1");
    tree.append_child(NodeId::ROOT, target);
    tree.append_child(target, existing);

    tree.move_children(parent, target);

    assert!(tree.children(parent).is_empty());
    assert_eq!(tree.children(target), &[existing, a, b, c]);
    for id in [a, b, c] {
        assert_eq!(tree.parent(id), Some(target));
    }
}

// ========== document & traversal ==========

#[test]
fn test_new_tree_has_empty_document() {
    let tree = DomTree::new();
    assert_eq!(tree.len(), 1);
    assert!(!tree.document().has_doctype);
    assert!(tree.document().name.is_empty());
    assert_eq!(tree.document_element(), None);
}

#[test]
fn test_descendants_is_preorder() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = div_with_three(&mut tree);
    let inner = tree.alloc(NodeType::Text("hi".to_string()), ParseFlags::NONE);
    tree.append_child(a, inner);

    let order: Vec<NodeId> = tree.descendants().map(|(id, _)| id).collect();

    assert_eq!(order, vec![NodeId::ROOT, parent, a, inner, b, c]);
}

#[test]
fn test_descendants_skips_detached_nodes() {
    let mut tree = DomTree::new();
    let (parent, _, b, _) = div_with_three(&mut tree);
    tree.remove_child(parent, b);

    assert_eq!(tree.descendants().count(), 4);
}

#[test]
fn test_set_flag_accumulates() {
    let mut tree = DomTree::new();
    let p = alloc_element(&mut tree, "p");
    tree.set_flag(p, ParseFlag::AdoptionAgencyCloned);
    tree.set_flag(p, ParseFlag::FosterParented);

    let flags = tree.get(p).map(|n| n.flags).unwrap_or_default();
    assert!(flags.adoption_agency_cloned);
    assert!(flags.foster_parented);
    assert!(!flags.parser_inserted);
}

#[test]
fn test_text_payload_accessor() {
    assert_eq!(NodeType::Whitespace("  ".to_string()).text(), Some("  "));
    assert_eq!(NodeType::CData("x".to_string()).text(), Some("x"));
    assert_eq!(NodeType::Element(ElementData::new("p")).text(), None);
}
