//! First pass: the largest value of each binned metric.

use treestat_dom::{DomTree, NodeType};

/// Per-metric maxima over a whole tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaxBounds {
    /// Longest child list of a document or element.
    pub children: usize,
    /// Longest text payload or document identifier, in bytes.
    pub text: usize,
    /// Most attributes on one element.
    pub attributes: usize,
    /// Longest attribute name, in bytes.
    pub attribute_name: usize,
    /// Longest attribute value, in bytes.
    pub attribute_value: usize,
}

impl MaxBounds {
    fn observe(current: &mut usize, value: usize) {
        *current = (*current).max(value);
    }
}

/// Visit every attached node once and record the maxima. Read-only.
#[must_use]
pub fn find_max(tree: &DomTree) -> MaxBounds {
    let mut max = MaxBounds::default();
    for (_, node) in tree.descendants() {
        match &node.node_type {
            NodeType::Document(document) => {
                MaxBounds::observe(&mut max.children, node.children.len());
                MaxBounds::observe(&mut max.text, document.name.len());
                MaxBounds::observe(&mut max.text, document.public_identifier.len());
                MaxBounds::observe(&mut max.text, document.system_identifier.len());
            }
            NodeType::Element(element) => {
                MaxBounds::observe(&mut max.children, node.children.len());
                MaxBounds::observe(&mut max.attributes, element.attrs.len());
                for attr in &element.attrs {
                    MaxBounds::observe(&mut max.attribute_name, attr.name.len());
                    MaxBounds::observe(&mut max.attribute_value, attr.value.len());
                }
            }
            NodeType::Text(text)
            | NodeType::Whitespace(text)
            | NodeType::Comment(text)
            | NodeType::CData(text) => MaxBounds::observe(&mut max.text, text.len()),
        }
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let tree = DomTree::new();
        assert_eq!(find_max(&tree), MaxBounds::default());
    }

    #[test]
    fn test_parsed_document() {
        let output = treestat_html::parse(
            r#"<!DOCTYPE html><ul data-items="three"><li>a<li>bb<li>cccc</ul>"#,
        );
        let max = find_max(&output.document);

        assert_eq!(max.children, 3);
        assert_eq!(max.text, 4);
        assert_eq!(max.attributes, 1);
        assert_eq!(max.attribute_name, "data-items".len());
        assert_eq!(max.attribute_value, "three".len());
    }
}
