use treestat_dom::{Namespace, NodeId, ParseFlags};

use super::core::{ActiveFormattingElement, InsertionMode, TreeBuilder};
use super::elements::{
    BLOCK_END, CLOSES_P, FORMATTING, HEAD_CONTENT, HEADINGS, OPEN_AT_EOF, Scope, VOID_IN_BODY,
    is_special,
};
use crate::error::ParseErrorKind;
use crate::tokenizer::{Token, TokenizerState};

impl TreeBuilder<'_> {
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(super) fn handle_in_body_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => {
                self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
            }

            // "Reconstruct the active formatting elements, if any. Insert the
            // token's character."
            Token::Character { data } => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
            }

            Token::Comment { data } => self.insert_comment(data),

            // Only reachable from foreign content.
            Token::CData { data } => self.insert_cdata(data),

            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),

            Token::StartTag { .. } => self.handle_in_body_start_tag(token),
            Token::EndTag { name } => self.handle_in_body_end_tag(name, token),

            // "An end-of-file token"
            // "If there is a node in the stack of open elements that is not
            // either a dd element, a dt element, an li element, ... the body
            // element, or the html element, then this is a parse error."
            // "Stop parsing."
            Token::EndOfFile => {
                let unclosed = self
                    .stack_of_open_elements
                    .iter()
                    .any(|&id| !self.is_html_element_in(id, OPEN_AT_EOF));
                if unclosed {
                    self.parse_error(ParseErrorKind::EofWithOpenElements);
                }
                self.stop_parsing();
            }
        }
    }

    fn handle_in_body_start_tag(&mut self, token: &Token) {
        let Token::StartTag {
            name, self_closing, ..
        } = token
        else {
            return;
        };

        match name.as_str() {
            // "A start tag whose tag name is "html""
            "html" => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
                if !self.stack_contains_tag("template")
                    && let Some(&html) = self.stack_of_open_elements.first()
                {
                    self.merge_attributes_into(html, token);
                }
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title""
            // "Process the token using the rules for the "in head" insertion
            // mode."
            tag if HEAD_CONTENT.contains(&tag) => {
                self.process_using_mode(InsertionMode::InHead, token);
            }

            // "A start tag whose tag name is "body""
            // "If the second element on the stack of open elements is not a
            // body element ... ignore the token. Otherwise ... for each
            // attribute on the token, check to see if the attribute is already
            // present on the body element"
            "body" => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
                if let Some(&body) = self.stack_of_open_elements.get(1)
                    && self.is_html_element(body, "body")
                {
                    self.merge_attributes_into(body, token);
                }
            }

            "frameset" => self.parse_error(ParseErrorKind::UnexpectedStartTag),

            tag if CLOSES_P.contains(&tag) => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(token);
            }

            // "If the current node is an HTML element whose tag name is one of
            // "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse error;
            // pop the current node off the stack of open elements."
            tag if HEADINGS.contains(&tag) => {
                self.close_p_if_in_button_scope();
                if self.current_node_is_one_of(HEADINGS) {
                    self.parse_error(ParseErrorKind::UnexpectedStartTag);
                    let _ = self.pop();
                }
                let _ = self.insert_html_element(token);
            }

            // "If the next token is a U+000A LINE FEED (LF) character token,
            // then ignore that token and move on to the next one."
            "pre" | "listing" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(token);
                self.skip_next_newline = true;
            }

            // "If the form element pointer is not null, and there is no
            // template element on the stack of open elements, then this is a
            // parse error; ignore the token."
            "form" => {
                if self.form_element_pointer.is_some() && !self.stack_contains_tag("template") {
                    self.parse_error(ParseErrorKind::UnexpectedStartTag);
                    return;
                }
                self.close_p_if_in_button_scope();
                let form = self.insert_html_element(token);
                if !self.stack_contains_tag("template") {
                    self.form_element_pointer = Some(form);
                }
            }

            "li" => {
                self.close_list_item(&["li"]);
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(token);
            }

            "dd" | "dt" => {
                self.close_list_item(&["dd", "dt"]);
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(token);
            }

            "plaintext" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(token);
                self.tokenizer.set_state(TokenizerState::PLAINTEXT);
            }

            "button" => {
                if self.has_element_in_scope("button", Scope::Default) {
                    self.parse_error(ParseErrorKind::UnexpectedStartTag);
                    self.generate_implied_end_tags(None);
                    self.pop_until("button");
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }

            // "If the list of active formatting elements contains an a element
            // between the end of the list and the last marker on the list (or
            // the start of the list if there is no marker on the list), then
            // this is a parse error; run the adoption agency algorithm for the
            // token, then remove that element from the list of active
            // formatting elements and the stack of open elements if the
            // adoption agency algorithm didn't already remove it"
            "a" => {
                if let Some(existing) = self.formatting_element_after_last_marker("a") {
                    self.parse_error(ParseErrorKind::MisnestedFormattingElement);
                    self.run_adoption_agency("a");
                    self.remove_formatting_entry(existing);
                    self.remove_from_stack(existing);
                }
                self.reconstruct_active_formatting_elements();
                let id = self.insert_html_element(token);
                self.push_active_formatting_element(id, token);
            }

            "nobr" => {
                self.reconstruct_active_formatting_elements();
                if self.has_element_in_scope("nobr", Scope::Default) {
                    self.parse_error(ParseErrorKind::MisnestedFormattingElement);
                    self.run_adoption_agency("nobr");
                    self.reconstruct_active_formatting_elements();
                }
                let id = self.insert_html_element(token);
                self.push_active_formatting_element(id, token);
            }

            tag if FORMATTING.contains(&tag) => {
                self.reconstruct_active_formatting_elements();
                let id = self.insert_html_element(token);
                self.push_active_formatting_element(id, token);
            }

            "applet" | "marquee" | "object" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.push_formatting_marker();
            }

            "table" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InTable;
            }

            tag if VOID_IN_BODY.contains(&tag) => {
                self.reconstruct_active_formatting_elements();
                self.insert_void_element(token);
            }

            "param" | "source" | "track" => self.insert_void_element(token),

            "hr" => {
                self.close_p_if_in_button_scope();
                self.insert_void_element(token);
            }

            // "Parse error. Change the token's tag name to "img" and reprocess
            // it. (Don't ask.)"
            "image" => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
                let Token::StartTag {
                    self_closing,
                    attributes,
                    ..
                } = token.clone()
                else {
                    return;
                };
                let img = Token::StartTag {
                    name: "img".to_string(),
                    self_closing,
                    attributes,
                };
                self.process_token(&img);
            }

            "textarea" => {
                self.parse_text_element(token, TokenizerState::RCDATA);
                self.skip_next_newline = true;
            }

            "xmp" => {
                self.close_p_if_in_button_scope();
                self.reconstruct_active_formatting_elements();
                self.parse_text_element(token, TokenizerState::RAWTEXT);
            }

            "iframe" | "noembed" | "noscript" => {
                self.parse_text_element(token, TokenizerState::RAWTEXT);
            }

            "optgroup" | "option" | "select" => {
                if self.current_node_is("option") {
                    let _ = self.pop();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }

            "rb" | "rtc" => {
                if self.has_element_in_scope("ruby", Scope::Default) {
                    self.generate_implied_end_tags(None);
                }
                let _ = self.insert_html_element(token);
            }

            "rp" | "rt" => {
                if self.has_element_in_scope("ruby", Scope::Default) {
                    self.generate_implied_end_tags(Some("rtc"));
                }
                let _ = self.insert_html_element(token);
            }

            // "Insert a foreign element for the token, with MathML namespace /
            // SVG namespace ... If the token has its self-closing flag set, pop
            // the current node off the stack of open elements"
            "math" | "svg" => {
                self.reconstruct_active_formatting_elements();
                let namespace = if name == "math" {
                    Namespace::MathMl
                } else {
                    Namespace::Svg
                };
                let _ = self.insert_element(token, namespace, ParseFlags::NONE);
                if *self_closing {
                    let _ = self.pop();
                }
            }

            "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td" | "tfoot"
            | "th" | "thead" | "tr" => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
            }

            // "Any other start tag"
            // "Reconstruct the active formatting elements, if any. Insert an
            // HTML element for the token."
            _ => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }
        }
    }

    fn handle_in_body_end_tag(&mut self, name: &str, token: &Token) {
        match name {
            "template" => self.process_using_mode(InsertionMode::InHead, token),

            // "If the stack of open elements does not have a body element in
            // scope, this is a parse error; ignore the token."
            // "Switch the insertion mode to "after body"."
            "body" | "html" => {
                if !self.has_element_in_scope("body", Scope::Default) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                if name == "html" {
                    self.reprocess_in(InsertionMode::AfterBody, token);
                } else {
                    self.insertion_mode = InsertionMode::AfterBody;
                }
            }

            tag if BLOCK_END.contains(&tag) => {
                if !self.has_element_in_scope(tag, Scope::Default) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                self.close_element(tag);
            }

            "form" => {
                let form = self.form_element_pointer.take();
                match form {
                    Some(form) if self.has_node_in_scope(form, Scope::Default) => {
                        self.generate_implied_end_tags(None);
                        if self.current_node() != Some(form) {
                            self.parse_error(ParseErrorKind::UnexpectedEndTag);
                        }
                        self.remove_from_stack(form);
                    }
                    _ => self.parse_error(ParseErrorKind::UnexpectedEndTag),
                }
            }

            // "If the stack of open elements does not have a p element in
            // button scope, then this is a parse error; insert an HTML element
            // for a "p" start tag token with no attributes."
            // "Close a p element."
            "p" => {
                if !self.has_element_in_scope("p", Scope::Button) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    let _ = self.insert_implied_element("p");
                }
                self.close_p_element();
            }

            "li" => {
                if !self.has_element_in_scope("li", Scope::ListItem) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                self.generate_implied_end_tags(Some("li"));
                if !self.current_node_is("li") {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                }
                self.pop_until("li");
            }

            "dd" | "dt" => {
                if !self.has_element_in_scope(name, Scope::Default) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                self.generate_implied_end_tags(Some(name));
                if !self.current_node_is(name) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                }
                self.pop_until(name);
            }

            tag if HEADINGS.contains(&tag) => {
                if !self.has_any_in_scope(HEADINGS, Scope::Default) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                self.generate_implied_end_tags(None);
                if !self.current_node_is(tag) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                }
                self.pop_until_one_of(HEADINGS);
            }

            tag if FORMATTING.contains(&tag) => self.run_adoption_agency(tag),

            "applet" | "marquee" | "object" => {
                if !self.has_element_in_scope(name, Scope::Default) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                self.close_element(name);
                self.clear_active_formatting_elements_to_last_marker();
            }

            // "Parse error. Drop the attributes from the token, and act as
            // described in the next entry; i.e. act as if this was a "br" start
            // tag token with no attributes"
            "br" => {
                self.parse_error(ParseErrorKind::UnexpectedEndTag);
                self.reconstruct_active_formatting_elements();
                self.insert_void_element(&Token::start_tag("br"));
            }

            _ => self.any_other_end_tag(name),
        }
    }

    /// The shared loop of the "li", "dd" and "dt" start tag entries: close
    /// the nearest open list item, stopping at special elements other than
    /// address, div and p.
    fn close_list_item(&mut self, items: &[&str]) {
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let node = self.stack_of_open_elements[index];
            let Some(element) = self.tree.as_element(node) else {
                continue;
            };
            if element.namespace == Namespace::Html && items.contains(&element.tag_name.as_str()) {
                let tag = element.tag_name.clone();
                self.generate_implied_end_tags(Some(&tag));
                if !self.current_node_is(&tag) {
                    self.parse_error(ParseErrorKind::UnexpectedStartTag);
                }
                self.pop_until(&tag);
                return;
            }
            let exempt = element.namespace == Namespace::Html
                && matches!(element.tag_name.as_str(), "address" | "div" | "p");
            if is_special(element) && !exempt {
                return;
            }
        }
    }

    fn formatting_element_after_last_marker(&self, tag: &str) -> Option<NodeId> {
        for entry in self.active_formatting_elements.iter().rev() {
            match entry {
                ActiveFormattingElement::Marker => return None,
                ActiveFormattingElement::Element { node_id, token } => {
                    if token.tag_name() == Some(tag) {
                        return Some(*node_id);
                    }
                }
            }
        }
        None
    }

    fn remove_formatting_entry(&mut self, id: NodeId) {
        self.active_formatting_elements.retain(
            |entry| !matches!(entry, ActiveFormattingElement::Element { node_id, .. } if *node_id == id),
        );
    }
}
