use strum_macros::Display;

use treestat_dom::{
    Attribute, DomTree, ElementData, Namespace, NodeId, NodeType, ParseFlag, ParseFlags,
};

use super::elements::{
    FOSTER_TARGETS, IMPLIED_END_TAGS, Scope, is_html_integration_point,
    is_mathml_text_integration_point, is_scope_boundary,
};
use crate::error::{ParseError, ParseErrorKind};
use crate::tokenizer::{Token, Tokenizer, TokenizerState};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
///
/// Select, template and frameset content are parsed with the "in body" rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    InCell,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
}

/// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
///
/// "The list of active formatting elements... is used to handle mis-nested
/// formatting element tags."
#[derive(Debug, Clone)]
pub(super) enum ActiveFormattingElement {
    /// A formatting element, with the start tag it was created from so it can
    /// be recreated by reconstruction or the adoption agency.
    Element { node_id: NodeId, token: Token },
    /// "A marker is an entry in the list of active formatting elements that is
    /// distinct from any element."
    Marker,
}

/// [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
///
/// Where the next node goes: inside `parent`, before `before` when set,
/// otherwise after the last child.
#[derive(Debug, Clone, Copy)]
pub(super) struct InsertionPoint {
    pub parent: NodeId,
    pub before: Option<NodeId>,
    /// The location came from foster parenting.
    pub fostered: bool,
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// Pulls tokens from the tokenizer one at a time and builds a [`DomTree`].
/// Recoverable problems are recorded as parse errors on the tokenizer; the
/// builder itself never fails.
pub struct TreeBuilder<'a> {
    pub(super) tokenizer: Tokenizer<'a>,
    pub(super) tree: DomTree,

    pub(super) insertion_mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    /// "the original insertion mode" used by "text" and "in table text".
    pub(super) original_insertion_mode: InsertionMode,

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    pub(super) stack_of_open_elements: Vec<NodeId>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    pub(super) head_element_pointer: Option<NodeId>,
    pub(super) form_element_pointer: Option<NodeId>,

    pub(super) active_formatting_elements: Vec<ActiveFormattingElement>,

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    /// Set while "in table" processes misplaced content with the "in body" rules.
    pub(super) foster_parenting: bool,

    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    /// "pending table character tokens"
    pub(super) pending_table_characters: String,

    /// After `<pre>`, `<listing>` and `<textarea>` a leading newline is dropped.
    pub(super) skip_next_newline: bool,

    stopped: bool,
}

impl<'a> TreeBuilder<'a> {
    /// Create a builder over `input`, keeping at most `max_errors` parse errors.
    #[must_use]
    pub fn new(input: &'a str, max_errors: Option<usize>) -> Self {
        Self {
            tokenizer: Tokenizer::new(input).with_max_errors(max_errors),
            tree: DomTree::new(),
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: InsertionMode::Initial,
            stack_of_open_elements: Vec::new(),
            head_element_pointer: None,
            form_element_pointer: None,
            active_formatting_elements: Vec::new(),
            foster_parenting: false,
            pending_table_characters: String::new(),
            skip_next_newline: false,
            stopped: false,
        }
    }

    /// Consume the whole input and return the document with its parse errors.
    #[must_use]
    pub fn run(mut self) -> (DomTree, Vec<ParseError>) {
        while !self.stopped {
            let cdata = self
                .adjusted_current_element()
                .is_some_and(|element| element.namespace != Namespace::Html);
            self.tokenizer.set_allow_cdata(cdata);

            let token = self.tokenizer.next_token();
            self.process_token(&token);
        }
        (self.tree, self.tokenizer.take_errors())
    }

    pub(super) fn parse_error(&mut self, kind: ParseErrorKind) {
        self.tokenizer.parse_error(kind);
    }

    /// [§ 13.2.8.1 Stop parsing](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
    ///
    /// "Pop all the nodes off the stack of open elements."
    pub(super) fn stop_parsing(&mut self) {
        self.stack_of_open_elements.clear();
        self.active_formatting_elements.clear();
        self.stopped = true;
    }

    /// [§ 13.2.6 Tree construction dispatcher](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    pub(super) fn process_token(&mut self, token: &Token) {
        if self.skip_next_newline {
            self.skip_next_newline = false;
            if matches!(token, Token::Character { data: '\n' }) {
                return;
            }
        }

        if self.uses_insertion_mode(token) {
            self.process_using_mode(self.insertion_mode, token);
        } else {
            self.process_foreign_content(token);
        }
    }

    /// "As each token is emitted from the tokenizer, the user agent must
    /// follow the appropriate steps from the following list"
    fn uses_insertion_mode(&self, token: &Token) -> bool {
        let Some(element) = self.adjusted_current_element() else {
            return true;
        };
        if element.namespace == Namespace::Html || matches!(token, Token::EndOfFile) {
            return true;
        }
        match token {
            Token::StartTag { name, .. } => {
                (is_mathml_text_integration_point(element)
                    && name != "mglyph"
                    && name != "malignmark")
                    || (element.namespace == Namespace::MathMl
                        && element.tag_name == "annotation-xml"
                        && name == "svg")
                    || is_html_integration_point(element)
            }
            Token::Character { .. } => {
                is_mathml_text_integration_point(element) || is_html_integration_point(element)
            }
            _ => false,
        }
    }

    /// Process `token` using the rules for `mode`, without switching to it.
    pub(super) fn process_using_mode(&mut self, mode: InsertionMode, token: &Token) {
        match mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),
            InsertionMode::InCaption => self.handle_in_caption_mode(token),
            InsertionMode::InColumnGroup => self.handle_in_column_group_mode(token),
            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
        }
    }

    /// Switch to `mode` and reprocess the token there.
    pub(super) fn reprocess_in(&mut self, mode: InsertionMode, token: &Token) {
        self.insertion_mode = mode;
        self.process_token(token);
    }

    // ===== Stack of open elements =====

    pub(super) fn current_node(&self) -> Option<NodeId> {
        self.stack_of_open_elements.last().copied()
    }

    /// No fragment parsing, so the adjusted current node is the current node.
    pub(super) fn adjusted_current_element(&self) -> Option<&ElementData> {
        self.current_node().and_then(|id| self.tree.as_element(id))
    }

    /// Whether `id` is an HTML element named `tag`.
    pub(super) fn is_html_element(&self, id: NodeId, tag: &str) -> bool {
        self.tree
            .as_element(id)
            .is_some_and(|e| e.namespace == Namespace::Html && e.tag_name == tag)
    }

    /// Whether `id` is an HTML element named any of `tags`.
    pub(super) fn is_html_element_in(&self, id: NodeId, tags: &[&str]) -> bool {
        self.tree.as_element(id).is_some_and(|e| {
            e.namespace == Namespace::Html && tags.contains(&e.tag_name.as_str())
        })
    }

    pub(super) fn current_node_is(&self, tag: &str) -> bool {
        self.current_node()
            .is_some_and(|id| self.is_html_element(id, tag))
    }

    pub(super) fn current_node_is_one_of(&self, tags: &[&str]) -> bool {
        self.current_node()
            .is_some_and(|id| self.is_html_element_in(id, tags))
    }

    pub(super) fn pop(&mut self) -> Option<NodeId> {
        self.stack_of_open_elements.pop()
    }

    /// "Pop elements from the stack of open elements until an HTML element
    /// with the same tag name has been popped from the stack."
    pub(super) fn pop_until(&mut self, tag: &str) {
        self.pop_until_one_of(&[tag]);
    }

    pub(super) fn pop_until_one_of(&mut self, tags: &[&str]) {
        while let Some(id) = self.pop() {
            if self.is_html_element_in(id, tags) {
                break;
            }
        }
    }

    pub(super) fn remove_from_stack(&mut self, id: NodeId) {
        if let Some(index) = self.stack_of_open_elements.iter().position(|&n| n == id) {
            let _ = self.stack_of_open_elements.remove(index);
        }
    }

    pub(super) fn stack_contains_tag(&self, tag: &str) -> bool {
        self.stack_of_open_elements
            .iter()
            .any(|&id| self.is_html_element(id, tag))
    }

    /// [§ 13.2.4.2 has an element in the specific scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    pub(super) fn has_element_in_scope(&self, tag: &str, scope: Scope) -> bool {
        self.has_any_in_scope(&[tag], scope)
    }

    pub(super) fn has_any_in_scope(&self, tags: &[&str], scope: Scope) -> bool {
        for &id in self.stack_of_open_elements.iter().rev() {
            let Some(element) = self.tree.as_element(id) else {
                continue;
            };
            if element.namespace == Namespace::Html && tags.contains(&element.tag_name.as_str()) {
                return true;
            }
            if is_scope_boundary(element, scope) {
                return false;
            }
        }
        false
    }

    /// Whether the specific node `target` is in scope.
    pub(super) fn has_node_in_scope(&self, target: NodeId, scope: Scope) -> bool {
        for &id in self.stack_of_open_elements.iter().rev() {
            if id == target {
                return true;
            }
            if self
                .tree
                .as_element(id)
                .is_some_and(|element| is_scope_boundary(element, scope))
            {
                return false;
            }
        }
        false
    }

    /// [§ 13.2.6.3 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "while the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element, an
    /// rp element, an rt element, or an rtc element, the UA must pop the
    /// current node off the stack of open elements." `except` names a tag to
    /// leave in place.
    pub(super) fn generate_implied_end_tags(&mut self, except: Option<&str>) {
        while let Some(id) = self.current_node() {
            let implied = self.tree.as_element(id).is_some_and(|e| {
                e.namespace == Namespace::Html
                    && IMPLIED_END_TAGS.contains(&e.tag_name.as_str())
                    && except != Some(e.tag_name.as_str())
            });
            if !implied {
                break;
            }
            let _ = self.pop();
        }
    }

    /// [§ 13.2.6.4.7 close a p element](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    pub(super) fn close_p_element(&mut self) {
        self.generate_implied_end_tags(Some("p"));
        if !self.current_node_is("p") {
            self.parse_error(ParseErrorKind::UnexpectedEndTag);
        }
        self.pop_until("p");
    }

    /// "If the stack of open elements has a p element in button scope, then
    /// close a p element."
    pub(super) fn close_p_if_in_button_scope(&mut self) {
        if self.has_element_in_scope("p", Scope::Button) {
            self.close_p_element();
        }
    }

    /// "generate implied end tags, then pop until `tag` has been popped",
    /// reporting an error when `tag` was not the current node.
    pub(super) fn close_element(&mut self, tag: &str) {
        self.generate_implied_end_tags(None);
        if !self.current_node_is(tag) {
            self.parse_error(ParseErrorKind::UnexpectedEndTag);
        }
        self.pop_until(tag);
    }

    /// [§ 13.2.6.4.9 clear the stack back to a table context](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    /// and its table body and row counterparts: pop until the current node is
    /// one of `tags`.
    pub(super) fn clear_stack_back_to(&mut self, tags: &[&str]) {
        while let Some(id) = self.current_node() {
            if self.is_html_element_in(id, tags) || self.is_html_element(id, "html") {
                break;
            }
            let _ = self.pop();
        }
    }

    /// [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    pub(super) fn reset_insertion_mode_appropriately(&mut self) {
        for (index, &id) in self.stack_of_open_elements.iter().enumerate().rev() {
            let last = index == 0;
            let Some(element) = self.tree.as_element(id) else {
                continue;
            };
            if element.namespace != Namespace::Html {
                if last {
                    self.insertion_mode = InsertionMode::InBody;
                    return;
                }
                continue;
            }
            let mode = match element.tag_name.as_str() {
                "td" | "th" if !last => InsertionMode::InCell,
                "tr" => InsertionMode::InRow,
                "tbody" | "thead" | "tfoot" => InsertionMode::InTableBody,
                "caption" => InsertionMode::InCaption,
                "colgroup" => InsertionMode::InColumnGroup,
                "table" => InsertionMode::InTable,
                "head" if !last => InsertionMode::InHead,
                "html" if self.head_element_pointer.is_none() => InsertionMode::BeforeHead,
                "html" => InsertionMode::AfterHead,
                "select" | "template" | "body" | "frameset" => InsertionMode::InBody,
                _ if last => InsertionMode::InBody,
                _ => continue,
            };
            self.insertion_mode = mode;
            return;
        }
        self.insertion_mode = InsertionMode::InBody;
    }

    // ===== Creating and inserting nodes =====

    /// [§ 13.2.6.1 appropriate place for inserting a node](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    pub(super) fn adjusted_insertion_location(&self) -> InsertionPoint {
        let target = self.current_node().unwrap_or(NodeId::ROOT);
        self.insertion_location_for(target)
    }

    /// The appropriate place with `target` as the override target.
    pub(super) fn insertion_location_for(&self, target: NodeId) -> InsertionPoint {
        if self.foster_parenting && self.is_html_element_in(target, FOSTER_TARGETS) {
            return self.foster_parent_location();
        }
        InsertionPoint {
            parent: target,
            before: None,
            fostered: false,
        }
    }

    /// [§ 13.2.6.1 foster parenting](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    fn foster_parent_location(&self) -> InsertionPoint {
        let last_table = self
            .stack_of_open_elements
            .iter()
            .rposition(|&id| self.is_html_element(id, "table"));

        let Some(table_index) = last_table else {
            // "If there is no last table, then let adjusted insertion location
            // be inside the first element in the stack of open elements (the
            // html element), after its last child (if any)"
            let html = self
                .stack_of_open_elements
                .first()
                .copied()
                .unwrap_or(NodeId::ROOT);
            return InsertionPoint {
                parent: html,
                before: None,
                fostered: true,
            };
        };

        let table = self.stack_of_open_elements[table_index];
        // "If last table has a parent node, then let adjusted insertion location
        // be inside last table's parent node, immediately before last table"
        if let Some(parent) = self.tree.parent(table) {
            return InsertionPoint {
                parent,
                before: Some(table),
                fostered: true,
            };
        }
        // "Let previous element be the element immediately above last table in
        // the stack of open elements." Insert after its last child.
        let previous = table_index
            .checked_sub(1)
            .map_or(NodeId::ROOT, |i| self.stack_of_open_elements[i]);
        InsertionPoint {
            parent: previous,
            before: None,
            fostered: true,
        }
    }

    pub(super) fn insert_at(&mut self, point: InsertionPoint, node: NodeId) {
        if point.fostered {
            self.tree.set_flag(node, ParseFlag::FosterParented);
        }
        match point.before {
            Some(reference) => self.tree.insert_before(point.parent, node, reference),
            None => self.tree.append_child(point.parent, node),
        }
    }

    /// [§ 13.2.6.1 Create an element for a token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    pub(super) fn create_element(
        &mut self,
        name: &str,
        attributes: &[Attribute],
        namespace: Namespace,
        flags: ParseFlags,
    ) -> NodeId {
        let data = ElementData {
            tag_name: name.to_string(),
            namespace,
            attrs: attributes.to_vec(),
        };
        self.tree.alloc(NodeType::Element(data), flags)
    }

    pub(super) fn create_element_for_token(
        &mut self,
        token: &Token,
        namespace: Namespace,
        flags: ParseFlags,
    ) -> NodeId {
        match token {
            Token::StartTag {
                name, attributes, ..
            } => self.create_element(name, attributes, namespace, flags),
            _ => self.create_element(token.tag_name().unwrap_or_default(), &[], namespace, flags),
        }
    }

    /// [§ 13.2.6.1 Insert a foreign element](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    pub(super) fn insert_element(
        &mut self,
        token: &Token,
        namespace: Namespace,
        flags: ParseFlags,
    ) -> NodeId {
        let point = self.adjusted_insertion_location();
        let id = self.create_element_for_token(token, namespace, flags);
        self.insert_at(point, id);
        self.stack_of_open_elements.push(id);
        id
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    pub(super) fn insert_html_element(&mut self, token: &Token) -> NodeId {
        self.insert_element(token, Namespace::Html, ParseFlags::NONE)
    }

    /// Insert an element the markup never named, such as an implied `html`,
    /// `head`, `body` or `tbody`.
    pub(super) fn insert_implied_element(&mut self, tag: &str) -> NodeId {
        self.insert_element(
            &Token::start_tag(tag),
            Namespace::Html,
            ParseFlags::only(ParseFlag::ParserInserted),
        )
    }

    /// Insert an HTML element and pop it straight away.
    pub(super) fn insert_void_element(&mut self, token: &Token) {
        let _ = self.insert_html_element(token);
        let _ = self.pop();
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// Runs of whitespace become a whitespace node, which turns into a text
    /// node once anything else is appended to it.
    pub(super) fn insert_character(&mut self, c: char) {
        let point = self.adjusted_insertion_location();

        // "If the adjusted insertion location is in a Document node, then
        // return."
        if point.parent == NodeId::ROOT {
            return;
        }

        // "If there is a Text node immediately before the adjusted insertion
        // location, then append data to that Text node's data."
        let previous = match point.before {
            Some(reference) => self.tree.prev_sibling(reference),
            None => self.tree.last_child(point.parent),
        };
        if let Some(previous) = previous
            && let Some(node) = self.tree.get_mut(previous)
        {
            let promote = match &mut node.node_type {
                NodeType::Text(data) => {
                    data.push(c);
                    return;
                }
                NodeType::Whitespace(data) => {
                    data.push(c);
                    !is_whitespace(c)
                }
                _ => false,
            };
            if promote {
                let placeholder = NodeType::Text(String::new());
                node.node_type = match std::mem::replace(&mut node.node_type, placeholder) {
                    NodeType::Whitespace(data) => NodeType::Text(data),
                    other => other,
                };
            }
            if matches!(node.node_type, NodeType::Text(_) | NodeType::Whitespace(_)) {
                return;
            }
        }

        let data = c.to_string();
        let node_type = if is_whitespace(c) {
            NodeType::Whitespace(data)
        } else {
            NodeType::Text(data)
        };
        let id = self.tree.alloc(node_type, ParseFlags::NONE);
        self.insert_at(point, id);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    pub(super) fn insert_comment(&mut self, data: &str) {
        let point = self.adjusted_insertion_location();
        let id = self
            .tree
            .alloc(NodeType::Comment(data.to_string()), ParseFlags::NONE);
        self.insert_at(point, id);
    }

    /// Insert a comment as the last child of `parent`.
    pub(super) fn insert_comment_in(&mut self, parent: NodeId, data: &str) {
        let id = self
            .tree
            .alloc(NodeType::Comment(data.to_string()), ParseFlags::NONE);
        self.tree.append_child(parent, id);
    }

    /// Insert the contents of a CDATA section at the current location.
    pub(super) fn insert_cdata(&mut self, data: &str) {
        let point = self.adjusted_insertion_location();
        let id = self
            .tree
            .alloc(NodeType::CData(data.to_string()), ParseFlags::NONE);
        self.insert_at(point, id);
    }

    /// [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    ///
    /// "Insert an HTML element for the token. If the algorithm that was
    /// invoked is the generic raw text element parsing algorithm, switch the
    /// tokenizer to the RAWTEXT state; otherwise ... RCDATA state. Set the
    /// original insertion mode to the current insertion mode. Then, switch
    /// the insertion mode to "text"."
    pub(super) fn parse_text_element(&mut self, token: &Token, state: TokenizerState) {
        let _ = self.insert_html_element(token);
        self.tokenizer.set_state(state);
        self.original_insertion_mode = self.insertion_mode;
        self.insertion_mode = InsertionMode::Text;
    }
}

/// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
pub(super) const fn is_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}
