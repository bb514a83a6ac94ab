//! Table insertion modes.
//!
//! Content that is not allowed directly inside table structure is moved out
//! in front of the table ("foster parented").

use super::core::{InsertionMode, TreeBuilder, is_whitespace};
use super::elements::{Scope, TABLE_SECTIONS, TABLE_TEXT_CONTEXT};
use crate::error::ParseErrorKind;
use crate::tokenizer::Token;

const TABLE_CONTEXT: &[&str] = &["table", "template"];
const TABLE_BODY_CONTEXT: &[&str] = &["tbody", "tfoot", "thead", "template"];
const TABLE_ROW_CONTEXT: &[&str] = &["tr", "template"];

const TABLE_STRUCTURE: &[&str] = &[
    "caption", "col", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr",
];

impl TreeBuilder<'_> {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(super) fn handle_in_table_mode(&mut self, token: &Token) {
        match token {
            // "A character token, if the current node is table, tbody,
            // template, tfoot, thead, or tr element"
            // "Let the pending table character tokens be an empty list of
            // tokens. Let the original insertion mode be the current insertion
            // mode. Switch the insertion mode to "in table text" and reprocess
            // the token."
            Token::Character { .. } if self.current_node_is_one_of(TABLE_TEXT_CONTEXT) => {
                self.pending_table_characters.clear();
                self.original_insertion_mode = self.insertion_mode;
                self.reprocess_in(InsertionMode::InTableText, token);
            }

            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),

            // "Clear the stack back to a table context. Insert a marker at the
            // end of the list of active formatting elements. Insert an HTML
            // element for the token, then switch the insertion mode to "in
            // caption"."
            Token::StartTag { name, .. } if name == "caption" => {
                self.clear_stack_back_to(TABLE_CONTEXT);
                self.push_formatting_marker();
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InCaption;
            }

            Token::StartTag { name, .. } if name == "colgroup" => {
                self.clear_stack_back_to(TABLE_CONTEXT);
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InColumnGroup;
            }

            // "Insert an HTML element for a "colgroup" start tag token with no
            // attributes, then switch the insertion mode to "in column group".
            // Reprocess the current token."
            Token::StartTag { name, .. } if name == "col" => {
                self.clear_stack_back_to(TABLE_CONTEXT);
                let _ = self.insert_implied_element("colgroup");
                self.reprocess_in(InsertionMode::InColumnGroup, token);
            }

            _ if token.is_start_tag_one_of(TABLE_SECTIONS) => {
                self.clear_stack_back_to(TABLE_CONTEXT);
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InTableBody;
            }

            // "Insert an HTML element for a "tbody" start tag token with no
            // attributes, then switch the insertion mode to "in table body".
            // Reprocess the current token."
            _ if token.is_start_tag_one_of(&["td", "th", "tr"]) => {
                self.clear_stack_back_to(TABLE_CONTEXT);
                let _ = self.insert_implied_element("tbody");
                self.reprocess_in(InsertionMode::InTableBody, token);
            }

            // "A start tag whose tag name is "table""
            // "Parse error. If the stack of open elements does not have a table
            // element in table scope, ignore the token. Otherwise: Pop elements
            // from this stack until a table element has been popped from the
            // stack. Reset the insertion mode appropriately. Reprocess the
            // token."
            Token::StartTag { name, .. } if name == "table" => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
                if self.has_element_in_scope("table", Scope::Table) {
                    self.pop_until("table");
                    self.reset_insertion_mode_appropriately();
                    self.process_token(token);
                }
            }

            Token::EndTag { name } if name == "table" => {
                if !self.has_element_in_scope("table", Scope::Table) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                self.pop_until("table");
                self.reset_insertion_mode_appropriately();
            }

            _ if token.is_end_tag_one_of(TABLE_STRUCTURE)
                || token.is_end_tag_one_of(&["body", "html"]) =>
            {
                self.parse_error(ParseErrorKind::UnexpectedEndTag);
            }

            _ if token.is_start_tag_one_of(&["style", "script", "template"])
                || token.is_end_tag_one_of(&["template"]) =>
            {
                self.process_using_mode(InsertionMode::InHead, token);
            }

            // "A start tag whose tag name is "input""
            // "If the token does not have an attribute with the name "type", or
            // if it does, but that attribute's value is not an ASCII
            // case-insensitive match for the string "hidden", then: act as
            // described in the "anything else" entry below."
            Token::StartTag {
                name, attributes, ..
            } if name == "input"
                && attributes
                    .iter()
                    .any(|a| a.name == "type" && a.value.eq_ignore_ascii_case("hidden")) =>
            {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
                self.insert_void_element(token);
            }

            // "If there is a template element on the stack of open elements, or
            // if the form element pointer is not null, ignore the token.
            // Otherwise: Insert an HTML element for the token, and set the form
            // element pointer to point to the element created. Pop that form
            // element off the stack of open elements."
            Token::StartTag { name, .. } if name == "form" => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
                if self.form_element_pointer.is_some() || self.stack_contains_tag("template") {
                    return;
                }
                let form = self.insert_html_element(token);
                self.form_element_pointer = Some(form);
                let _ = self.pop();
            }

            Token::EndOfFile => self.process_using_mode(InsertionMode::InBody, token),

            _ => self.handle_in_table_anything_else(token),
        }
    }

    /// "Parse error. Enable foster parenting, process the token using the
    /// rules for the "in body" insertion mode, and then disable foster
    /// parenting."
    fn handle_in_table_anything_else(&mut self, token: &Token) {
        if matches!(token, Token::Character { .. }) {
            self.parse_error(ParseErrorKind::UnexpectedTextInTable);
        } else {
            self.parse_error(ParseErrorKind::UnexpectedStartTag);
        }
        self.foster_parenting = true;
        self.process_using_mode(InsertionMode::InBody, token);
        self.foster_parenting = false;
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(super) fn handle_in_table_text_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data: '\0' } => {
                self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
            }
            Token::Character { data } => self.pending_table_characters.push(*data),

            // "Anything else"
            // "If any of the tokens in the pending table character tokens list
            // are character tokens that are not ASCII whitespace, then this is a
            // parse error: reprocess the character tokens in the pending table
            // character tokens list using the rules given in the "anything else"
            // entry in the "in table" insertion mode. Otherwise, insert the
            // characters given by the pending table character tokens list."
            // "Switch the insertion mode to the original insertion mode and
            // reprocess the token."
            _ => {
                let pending = std::mem::take(&mut self.pending_table_characters);
                if pending.chars().all(is_whitespace) {
                    for c in pending.chars() {
                        self.insert_character(c);
                    }
                } else {
                    self.parse_error(ParseErrorKind::UnexpectedTextInTable);
                    self.foster_parenting = true;
                    for c in pending.chars() {
                        self.process_using_mode(
                            InsertionMode::InBody,
                            &Token::Character { data: c },
                        );
                    }
                    self.foster_parenting = false;
                }
                self.reprocess_in(self.original_insertion_mode, token);
            }
        }
    }

    /// Shared by "in caption": close the caption if one is in table scope.
    /// Returns whether it was closed.
    fn close_caption(&mut self) -> bool {
        if !self.has_element_in_scope("caption", Scope::Table) {
            self.parse_error(ParseErrorKind::UnexpectedEndTag);
            return false;
        }
        self.close_element("caption");
        self.clear_active_formatting_elements_to_last_marker();
        self.insertion_mode = InsertionMode::InTable;
        true
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(super) fn handle_in_caption_mode(&mut self, token: &Token) {
        match token {
            Token::EndTag { name } if name == "caption" => {
                let _ = self.close_caption();
            }
            _ if token.is_start_tag_one_of(TABLE_STRUCTURE)
                || token.is_end_tag_one_of(&["table"]) =>
            {
                if self.close_caption() {
                    self.process_token(token);
                }
            }
            _ if token.is_end_tag_one_of(&[
                "body", "col", "colgroup", "html", "tbody", "td", "tfoot", "th", "thead", "tr",
            ]) =>
            {
                self.parse_error(ParseErrorKind::UnexpectedEndTag);
            }
            _ => self.process_using_mode(InsertionMode::InBody, token),
        }
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    pub(super) fn handle_in_column_group_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if token.is_whitespace_character() => {
                self.insert_character(*data);
            }
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_mode(InsertionMode::InBody, token);
            }
            Token::StartTag { name, .. } if name == "col" => self.insert_void_element(token),
            Token::EndTag { name } if name == "colgroup" => {
                if !self.current_node_is("colgroup") {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                let _ = self.pop();
                self.insertion_mode = InsertionMode::InTable;
            }
            Token::EndTag { name } if name == "col" => {
                self.parse_error(ParseErrorKind::UnexpectedEndTag);
            }
            _ if token.is_start_tag_one_of(&["template"]) || token.is_end_tag_one_of(&["template"]) => {
                self.process_using_mode(InsertionMode::InHead, token);
            }
            Token::EndOfFile => self.process_using_mode(InsertionMode::InBody, token),

            // "Anything else"
            // "If the current node is not a colgroup element, then this is a
            // parse error; ignore the token. Otherwise, pop the current node
            // from the stack of open elements. Switch the insertion mode to "in
            // table". Reprocess the token."
            _ => {
                if !self.current_node_is("colgroup") {
                    self.parse_error(ParseErrorKind::UnexpectedStartTag);
                    return;
                }
                let _ = self.pop();
                self.reprocess_in(InsertionMode::InTable, token);
            }
        }
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    pub(super) fn handle_in_table_body_mode(&mut self, token: &Token) {
        match token {
            Token::StartTag { name, .. } if name == "tr" => {
                self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InRow;
            }

            // "Parse error. Clear the stack back to a table body context.
            // Insert an HTML element for a "tr" start tag token with no
            // attributes, then switch the insertion mode to "in row".
            // Reprocess the current token."
            _ if token.is_start_tag_one_of(&["td", "th"]) => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
                self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                let _ = self.insert_implied_element("tr");
                self.reprocess_in(InsertionMode::InRow, token);
            }

            Token::EndTag { name } if TABLE_SECTIONS.contains(&name.as_str()) => {
                if !self.has_element_in_scope(name, Scope::Table) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                let _ = self.pop();
                self.insertion_mode = InsertionMode::InTable;
            }

            _ if token.is_start_tag_one_of(&["caption", "col", "colgroup", "tbody", "tfoot", "thead"])
                || token.is_end_tag_one_of(&["table"]) =>
            {
                if !self.has_any_in_scope(TABLE_SECTIONS, Scope::Table) {
                    self.parse_error(ParseErrorKind::UnexpectedStartTag);
                    return;
                }
                self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                let _ = self.pop();
                self.reprocess_in(InsertionMode::InTable, token);
            }

            _ if token.is_end_tag_one_of(&[
                "body", "caption", "col", "colgroup", "html", "td", "th", "tr",
            ]) =>
            {
                self.parse_error(ParseErrorKind::UnexpectedEndTag);
            }

            _ => self.handle_in_table_mode(token),
        }
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    pub(super) fn handle_in_row_mode(&mut self, token: &Token) {
        match token {
            // "Clear the stack back to a table row context. Insert an HTML
            // element for the token, then switch the insertion mode to "in
            // cell". Insert a marker at the end of the list of active
            // formatting elements."
            _ if token.is_start_tag_one_of(&["td", "th"]) => {
                self.clear_stack_back_to(TABLE_ROW_CONTEXT);
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InCell;
                self.push_formatting_marker();
            }

            Token::EndTag { name } if name == "tr" => {
                let _ = self.close_row();
            }

            _ if token.is_start_tag_one_of(&[
                "caption", "col", "colgroup", "tbody", "tfoot", "thead", "tr",
            ]) || token.is_end_tag_one_of(&["table"]) =>
            {
                if self.close_row() {
                    self.process_token(token);
                }
            }

            Token::EndTag { name } if TABLE_SECTIONS.contains(&name.as_str()) => {
                if !self.has_element_in_scope(name, Scope::Table) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                if self.close_row() {
                    self.process_token(token);
                }
            }

            _ if token.is_end_tag_one_of(&["body", "caption", "col", "colgroup", "html", "td", "th"]) => {
                self.parse_error(ParseErrorKind::UnexpectedEndTag);
            }

            _ => self.handle_in_table_mode(token),
        }
    }

    /// The `</tr>` entry of "in row". Returns whether a row was closed.
    fn close_row(&mut self) -> bool {
        if !self.has_element_in_scope("tr", Scope::Table) {
            self.parse_error(ParseErrorKind::UnexpectedEndTag);
            return false;
        }
        self.clear_stack_back_to(TABLE_ROW_CONTEXT);
        let _ = self.pop();
        self.insertion_mode = InsertionMode::InTableBody;
        true
    }

    /// [§ 13.2.6.4.15 close the cell](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    fn close_the_cell(&mut self) {
        self.generate_implied_end_tags(None);
        if !self.current_node_is_one_of(&["td", "th"]) {
            self.parse_error(ParseErrorKind::UnexpectedEndTag);
        }
        self.pop_until_one_of(&["td", "th"]);
        self.clear_active_formatting_elements_to_last_marker();
        self.insertion_mode = InsertionMode::InRow;
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    pub(super) fn handle_in_cell_mode(&mut self, token: &Token) {
        match token {
            Token::EndTag { name } if name == "td" || name == "th" => {
                if !self.has_element_in_scope(name, Scope::Table) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                self.close_element(name);
                self.clear_active_formatting_elements_to_last_marker();
                self.insertion_mode = InsertionMode::InRow;
            }

            _ if token.is_start_tag_one_of(TABLE_STRUCTURE) => {
                if !self.has_any_in_scope(&["td", "th"], Scope::Table) {
                    self.parse_error(ParseErrorKind::UnexpectedStartTag);
                    return;
                }
                self.close_the_cell();
                self.process_token(token);
            }

            _ if token.is_end_tag_one_of(&["body", "caption", "col", "colgroup", "html"]) => {
                self.parse_error(ParseErrorKind::UnexpectedEndTag);
            }

            Token::EndTag { name }
                if matches!(name.as_str(), "table" | "tbody" | "tfoot" | "thead" | "tr") =>
            {
                if !self.has_element_in_scope(name, Scope::Table) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                self.close_the_cell();
                self.process_token(token);
            }

            _ => self.process_using_mode(InsertionMode::InBody, token),
        }
    }
}
