//! Node tree produced by the treestat HTML engine.
//!
//! This crate provides an arena-based tree following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/) closely enough for
//! structural statistics: six node variants, ordered attribute lists, and a
//! parser-behavior flag set on every node.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Nodes are
//! never freed individually; detaching a node only unlinks it.

mod flags;

pub use flags::{ParseFlag, ParseFlags};

/// A type-safe index into the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    ///
    /// Always empty for the four character-data variants.
    pub children: Vec<NodeId>,

    /// Error-recovery rules the parser applied to this node.
    pub flags: ParseFlags,
}

/// The six node variants.
///
/// Whitespace and CDATA are split out from text so the statistics can tell
/// them apart; a DOM would fold all three into `Text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document(DocumentData),
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    /// "Element nodes are simply known as elements."
    Element(ElementData),
    /// A run of character data containing at least one non-whitespace character.
    Text(String),
    /// A run of character data made only of ASCII whitespace.
    Whitespace(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    /// "Comment nodes are known as comments."
    Comment(String),
    /// The contents of a `<![CDATA[ ... ]]>` section in foreign content.
    CData(String),
}

impl NodeType {
    /// The payload of a character-data node, `None` for documents and
    /// elements.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Whitespace(s) | Self::Comment(s) | Self::CData(s) => Some(s),
            Self::Document(_) | Self::Element(_) => None,
        }
    }
}

/// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
///
/// "Doctypes have an associated name, public ID, and system ID."
///
/// Stored on the document itself; all three are empty when the input had no
/// DOCTYPE.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentData {
    /// "name"
    pub name: String,
    /// "public ID"
    pub public_identifier: String,
    /// "system ID"
    pub system_identifier: String,
    /// Whether a DOCTYPE token was seen at all.
    pub has_doctype: bool,
}

/// [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// "local name"
    pub name: String,
    /// "value"
    pub value: String,
}

/// [§ 2.1.3 Namespaces](https://infra.spec.whatwg.org/#namespaces)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Namespace {
    /// "The HTML namespace is "http://www.w3.org/1999/xhtml"."
    #[default]
    Html,
    /// "The SVG namespace is "http://www.w3.org/2000/svg"."
    Svg,
    /// "The MathML namespace is "http://www.w3.org/1998/Math/MathML"."
    MathMl,
}

/// Element-specific data.
///
/// "Elements have an associated namespace, namespace prefix, local name..."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// "An element's local name"
    pub tag_name: String,
    /// "An element's namespace"
    pub namespace: Namespace,
    /// "An element has an associated attribute list", in source order.
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    /// An HTML element without attributes.
    #[must_use]
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            namespace: Namespace::Html,
            attrs: Vec::new(),
        }
    }

    /// Value of the first attribute named `name`.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }
}

/// Arena-based tree with O(1) node access.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree. A tree is a finite hierarchical
/// tree structure."
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The Document node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                node_type: NodeType::Document(DocumentData::default()),
                parent: None,
                children: Vec::new(),
                flags: ParseFlags::NONE,
            }],
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of allocated nodes, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType, flags: ParseFlags) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            flags,
        });
        id
    }

    /// The document's DOCTYPE data.
    #[must_use]
    pub fn document(&self) -> &DocumentData {
        match &self.nodes[NodeId::ROOT.0].node_type {
            NodeType::Document(data) => data,
            _ => unreachable!("the root node is always the document"),
        }
    }

    /// Mutable access to the document's DOCTYPE data.
    pub fn document_mut(&mut self) -> &mut DocumentData {
        match &mut self.nodes[NodeId::ROOT.0].node_type {
            NodeType::Document(data) => data,
            _ => unreachable!("the root node is always the document"),
        }
    }

    /// Add `flag` to a node's flag set.
    pub fn set_flag(&mut self, id: NodeId, flag: ParseFlag) {
        if let Some(node) = self.get_mut(id) {
            node.flags.insert(flag);
        }
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// [§ 4.2.2 Pre-insert](https://dom.spec.whatwg.org/#concept-node-pre-insert)
    ///
    /// Inserts `child` into `parent` immediately before `reference`. Falls
    /// back to appending when `reference` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        let position = self.nodes[parent.0]
            .children
            .iter()
            .position(|&id| id == reference);
        match position {
            Some(index) => {
                self.nodes[parent.0].children.insert(index, child);
                self.nodes[child.0].parent = Some(parent);
            }
            None => self.append_child(parent, child),
        }
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Detaches `child` from `parent`. The node stays in the arena.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let children = &mut self.nodes[parent.0].children;
        if let Some(index) = children.iter().position(|&id| id == child) {
            let _ = children.remove(index);
            self.nodes[child.0].parent = None;
        }
    }

    /// Detach `id` from whatever parent it has.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.parent(id) {
            self.remove_child(parent, id);
        }
    }

    /// Move every child of `from` to the end of `to`, preserving order.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        let moved = std::mem::take(&mut self.nodes[from.0].children);
        for &child in &moved {
            self.nodes[child.0].parent = Some(to);
        }
        self.nodes[to.0].children.extend(moved);
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// The child of `id`'s parent immediately before `id`.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let index = siblings.iter().position(|&s| s == id)?;
        index.checked_sub(1).map(|prev| siblings[prev])
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Tag name if this node is an element.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(|e| e.tag_name.as_str())
    }

    /// Payload of a character-data node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| n.node_type.text())
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }

    /// The first child of the document element with the given tag name.
    #[must_use]
    pub fn html_child(&self, tag: &str) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html)
            .iter()
            .find(|&&id| self.tag_name(id) == Some(tag))
            .copied()
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        self.html_child("body")
    }

    /// Iterate over every node reachable from the root, parents before
    /// children, children in order.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![NodeId::ROOT],
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order iterator over attached nodes. See [`DomTree::descendants`].
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.get(id)?;
        self.stack.extend(node.children.iter().rev().copied());
        Some((id, node))
    }
}
