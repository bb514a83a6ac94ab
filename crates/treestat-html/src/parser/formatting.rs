//! The list of active formatting elements and the adoption agency algorithm.

use treestat_dom::{Namespace, NodeId, ParseFlag, ParseFlags};

use super::core::{ActiveFormattingElement, TreeBuilder};
use super::elements::{FOSTER_TARGETS, Scope, is_special};
use crate::error::ParseErrorKind;
use crate::tokenizer::Token;

/// Same tag name and the same attributes in any order.
fn same_start_tag(a: &Token, b: &Token) -> bool {
    match (a, b) {
        (
            Token::StartTag {
                name: a_name,
                attributes: a_attrs,
                ..
            },
            Token::StartTag {
                name: b_name,
                attributes: b_attrs,
                ..
            },
        ) => {
            a_name == b_name
                && a_attrs.len() == b_attrs.len()
                && a_attrs.iter().all(|attr| b_attrs.contains(attr))
        }
        _ => false,
    }
}

impl TreeBuilder<'_> {
    fn formatting_index_of(&self, id: NodeId) -> Option<usize> {
        self.active_formatting_elements.iter().position(
            |entry| matches!(entry, ActiveFormattingElement::Element { node_id, .. } if *node_id == id),
        )
    }

    fn formatting_token_at(&self, index: usize) -> Option<Token> {
        match self.active_formatting_elements.get(index) {
            Some(ActiveFormattingElement::Element { token, .. }) => Some(token.clone()),
            _ => None,
        }
    }

    /// [§ 13.2.4.3 Push onto the list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// Includes the Noah's Ark clause: "If there are already three elements
    /// in the list of active formatting elements after the last marker, if
    /// any, or anywhere in the list if there are no markers, that have the
    /// same tag name, namespace, and attributes as element, then remove the
    /// earliest such element from the list."
    pub(super) fn push_active_formatting_element(&mut self, node_id: NodeId, token: &Token) {
        let mut count = 0;
        let mut earliest = None;
        for (index, entry) in self.active_formatting_elements.iter().enumerate().rev() {
            match entry {
                ActiveFormattingElement::Marker => break,
                ActiveFormattingElement::Element { token: existing, .. } => {
                    if same_start_tag(existing, token) {
                        count += 1;
                        earliest = Some(index);
                    }
                }
            }
        }
        if count >= 3
            && let Some(index) = earliest
        {
            let _ = self.active_formatting_elements.remove(index);
        }

        self.active_formatting_elements
            .push(ActiveFormattingElement::Element {
                node_id,
                token: token.clone(),
            });
    }

    pub(super) fn push_formatting_marker(&mut self) {
        self.active_formatting_elements
            .push(ActiveFormattingElement::Marker);
    }

    /// [§ 13.2.4.3 Clear the list of active formatting elements up to the last marker](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    pub(super) fn clear_active_formatting_elements_to_last_marker(&mut self) {
        while let Some(entry) = self.active_formatting_elements.pop() {
            if matches!(entry, ActiveFormattingElement::Marker) {
                break;
            }
        }
    }

    /// [§ 13.2.4.3 Reconstruct the active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    ///
    /// Recreated elements are flagged
    /// [`ParseFlag::ReconstructedFormattingElement`].
    pub(super) fn reconstruct_active_formatting_elements(&mut self) {
        // STEP 1-2: "If there are no entries... or if the last entry is a
        //            marker, or an element that is in the stack of open
        //            elements, then there is nothing to reconstruct"
        let Some(last) = self.active_formatting_elements.last() else {
            return;
        };
        match last {
            ActiveFormattingElement::Marker => return,
            ActiveFormattingElement::Element { node_id, .. } => {
                if self.stack_of_open_elements.contains(node_id) {
                    return;
                }
            }
        }

        // STEP 3-6: Rewind to the entry after the last marker or open element.
        let mut index = self.active_formatting_elements.len() - 1;
        while index > 0 {
            let open_or_marker = match &self.active_formatting_elements[index - 1] {
                ActiveFormattingElement::Marker => true,
                ActiveFormattingElement::Element { node_id, .. } => {
                    self.stack_of_open_elements.contains(node_id)
                }
            };
            if open_or_marker {
                break;
            }
            index -= 1;
        }

        // STEP 7-10: Advance and create.
        for entry in index..self.active_formatting_elements.len() {
            let Some(token) = self.formatting_token_at(entry) else {
                continue;
            };
            let node_id = self.insert_element(
                &token,
                Namespace::Html,
                ParseFlags::only(ParseFlag::ReconstructedFormattingElement),
            );
            self.active_formatting_elements[entry] =
                ActiveFormattingElement::Element { node_id, token };
        }
    }

    /// [§ 13.2.6.4.7 "in body" - Any other end tag](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(super) fn any_other_end_tag(&mut self, name: &str) {
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let node = self.stack_of_open_elements[index];

            // "If node is an HTML element with the same tag name as the token"
            if self.is_html_element(node, name) {
                self.generate_implied_end_tags(Some(name));
                if self.current_node() != Some(node) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                }
                self.stack_of_open_elements.truncate(index);
                return;
            }

            // "Otherwise, if node is in the special category, then this is a
            // parse error; ignore the token, and return."
            if self.tree.as_element(node).is_some_and(is_special) {
                self.parse_error(ParseErrorKind::UnexpectedEndTag);
                return;
            }
        }
    }

    /// Detach `node` and append it to `parent`, marking it as moved.
    fn adopt_into(&mut self, parent: NodeId, node: NodeId) {
        self.tree.detach(node);
        self.tree.append_child(parent, node);
        self.tree.set_flag(node, ParseFlag::AdoptionAgencyMoved);
    }

    /// [§ 13.2.6.4.7 Adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
    ///
    /// Elements the algorithm creates are flagged
    /// [`ParseFlag::AdoptionAgencyCloned`]; nodes it re-parents are flagged
    /// [`ParseFlag::AdoptionAgencyMoved`].
    pub(super) fn run_adoption_agency(&mut self, subject: &str) {
        // STEP 2: "If the current node is an HTML element whose tag name is
        //          subject, and the current node is not in the list of active
        //          formatting elements, then pop the current node off the stack
        //          of open elements and return."
        if let Some(current) = self.current_node()
            && self.is_html_element(current, subject)
            && self.formatting_index_of(current).is_none()
        {
            let _ = self.pop();
            return;
        }

        // STEP 3-6: Outer loop, at most 8 times.
        for _ in 0..8 {
            // STEP 7: "Let formatting element be the last element in the list
            //          of active formatting elements that is between the end of
            //          the list and the last marker in the list, if any, or the
            //          start of the list otherwise, and has the tag name subject."
            let mut found = None;
            for entry in self.active_formatting_elements.iter().rev() {
                match entry {
                    ActiveFormattingElement::Marker => break,
                    ActiveFormattingElement::Element { node_id, token } => {
                        if token.tag_name() == Some(subject) {
                            found = Some(*node_id);
                            break;
                        }
                    }
                }
            }

            // STEP 8: "If there is no such element, then return and instead act
            //          as described in the 'any other end tag' entry above."
            let Some(formatting_element) = found else {
                self.any_other_end_tag(subject);
                return;
            };

            // STEP 9: "If formatting element is not in the stack of open
            //          elements, then this is a parse error; remove the element
            //          from the list, and return."
            let Some(formatting_stack_index) = self
                .stack_of_open_elements
                .iter()
                .position(|&id| id == formatting_element)
            else {
                self.parse_error(ParseErrorKind::MisnestedFormattingElement);
                if let Some(index) = self.formatting_index_of(formatting_element) {
                    let _ = self.active_formatting_elements.remove(index);
                }
                return;
            };

            // STEP 10: "If formatting element is in the stack of open elements,
            //           but the element is not in scope, then this is a parse
            //           error; return."
            if !self.has_node_in_scope(formatting_element, Scope::Default) {
                self.parse_error(ParseErrorKind::MisnestedFormattingElement);
                return;
            }

            // STEP 11: "If formatting element is not the current node, this is
            //           a parse error."
            if self.current_node() != Some(formatting_element) {
                self.parse_error(ParseErrorKind::MisnestedFormattingElement);
            }

            // STEP 12: "Let furthest block be the topmost node in the stack of
            //           open elements that is lower in the stack than formatting
            //           element, and is an element in the special category."
            let furthest_block = self.stack_of_open_elements[formatting_stack_index + 1..]
                .iter()
                .copied()
                .find(|&id| self.tree.as_element(id).is_some_and(is_special));

            // STEP 13: "If there is no furthest block, then the UA must first
            //           pop all the nodes from the bottom of the stack of open
            //           elements, from the current node up to and including
            //           formatting element, then remove formatting element from
            //           the list of active formatting elements, and finally
            //           return."
            let Some(furthest_block) = furthest_block else {
                self.stack_of_open_elements.truncate(formatting_stack_index);
                if let Some(index) = self.formatting_index_of(formatting_element) {
                    let _ = self.active_formatting_elements.remove(index);
                }
                return;
            };

            // STEP 14: "Let common ancestor be the element immediately above
            //           formatting element in the stack of open elements."
            let Some(common_ancestor) = formatting_stack_index
                .checked_sub(1)
                .map(|i| self.stack_of_open_elements[i])
            else {
                return;
            };

            // STEP 15: "Let a bookmark note the position of formatting element
            //           in the list of active formatting elements relative to
            //           the elements on either side of it in the list."
            let Some(mut bookmark) = self.formatting_index_of(formatting_element) else {
                return;
            };

            // STEP 16: "Let node and last node be furthest block."
            let Some(mut node_index) = self
                .stack_of_open_elements
                .iter()
                .position(|&id| id == furthest_block)
            else {
                return;
            };
            let mut last_node = furthest_block;

            // STEP 17-18: Inner loop.
            let mut inner_loop_counter = 0;
            loop {
                inner_loop_counter += 1;

                // STEP 18.2: "Let node be the element immediately above node in
                //             the stack of open elements, or if node is no
                //             longer in the stack of open elements, the element
                //             that was immediately above node before it was
                //             removed."
                node_index -= 1;
                let node = self.stack_of_open_elements[node_index];

                // STEP 18.3: "If node is formatting element, then break."
                if node == formatting_element {
                    break;
                }

                // STEP 18.4: "If inner loop counter is greater than 3 and node
                //             is in the list of active formatting elements, then
                //             remove node from the list."
                if inner_loop_counter > 3
                    && let Some(index) = self.formatting_index_of(node)
                {
                    let _ = self.active_formatting_elements.remove(index);
                    if bookmark > index {
                        bookmark -= 1;
                    }
                }

                // STEP 18.5: "If node is not in the list of active formatting
                //             elements, then remove node from the stack of open
                //             elements and continue."
                let Some(node_formatting_index) = self.formatting_index_of(node) else {
                    let _ = self.stack_of_open_elements.remove(node_index);
                    continue;
                };

                // STEP 18.6: "Create an element for the token for which the
                //             element node was created, in the HTML namespace,
                //             with common ancestor as the intended parent;
                //             replace the entry for node in the list of active
                //             formatting elements with an entry for the new
                //             element, replace the entry for node in the stack
                //             of open elements with an entry for the new
                //             element, and let node be the new element."
                let Some(token) = self.formatting_token_at(node_formatting_index) else {
                    return;
                };
                let clone = self.create_element_for_token(
                    &token,
                    Namespace::Html,
                    ParseFlags::only(ParseFlag::AdoptionAgencyCloned),
                );
                self.active_formatting_elements[node_formatting_index] =
                    ActiveFormattingElement::Element {
                        node_id: clone,
                        token,
                    };
                self.stack_of_open_elements[node_index] = clone;

                // STEP 18.7: "If last node is furthest block, then move the
                //             aforementioned bookmark to be immediately after
                //             the new node in the list of active formatting
                //             elements."
                if last_node == furthest_block {
                    bookmark = node_formatting_index + 1;
                }

                // STEP 18.8: "Append last node to node."
                self.adopt_into(clone, last_node);

                // STEP 18.9: "Set last node to node."
                last_node = clone;
            }

            // STEP 19: "Insert whatever last node ended up being in the previous
            //           step at the appropriate place for inserting a node, but
            //           using common ancestor as the override target."
            if self.foster_parenting && self.is_html_element_in(common_ancestor, FOSTER_TARGETS) {
                let point = self.insertion_location_for(common_ancestor);
                self.tree.detach(last_node);
                self.insert_at(point, last_node);
                self.tree.set_flag(last_node, ParseFlag::AdoptionAgencyMoved);
            } else {
                self.adopt_into(common_ancestor, last_node);
            }

            // STEP 20: "Create an element for the token for which formatting
            //           element was created, in the HTML namespace, with furthest
            //           block as the intended parent."
            let Some(formatting_index) = self.formatting_index_of(formatting_element) else {
                return;
            };
            let Some(token) = self.formatting_token_at(formatting_index) else {
                return;
            };
            let new_element = self.create_element_for_token(
                &token,
                Namespace::Html,
                ParseFlags::only(ParseFlag::AdoptionAgencyCloned),
            );

            // STEP 21: "Take all of the child nodes of furthest block and append
            //           them to the element created in the last step."
            let moved = self.tree.children(furthest_block).to_vec();
            self.tree.move_children(furthest_block, new_element);
            for child in moved {
                self.tree.set_flag(child, ParseFlag::AdoptionAgencyMoved);
            }

            // STEP 22: "Append that new element to furthest block."
            self.tree.append_child(furthest_block, new_element);

            // STEP 23: "Remove formatting element from the list of active
            //           formatting elements, and insert the new element into
            //           the list of active formatting elements at the position
            //           of the aforementioned bookmark."
            let _ = self.active_formatting_elements.remove(formatting_index);
            if bookmark > formatting_index {
                bookmark -= 1;
            }
            let bookmark = bookmark.min(self.active_formatting_elements.len());
            self.active_formatting_elements.insert(
                bookmark,
                ActiveFormattingElement::Element {
                    node_id: new_element,
                    token,
                },
            );

            // STEP 24: "Remove formatting element from the stack of open
            //           elements, and insert the new element into the stack of
            //           open elements immediately below the position of furthest
            //           block in that stack."
            self.remove_from_stack(formatting_element);
            if let Some(position) = self
                .stack_of_open_elements
                .iter()
                .position(|&id| id == furthest_block)
            {
                self.stack_of_open_elements.insert(position + 1, new_element);
            }
        }
    }
}
