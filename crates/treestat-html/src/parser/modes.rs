//! Insertion modes around the body: everything before `<body>`, the "text"
//! mode, and the modes after `</body>`.

use treestat_dom::{NodeId, NodeType};

use super::core::{InsertionMode, TreeBuilder};
use super::elements::HEAD_ONLY;
use crate::error::ParseErrorKind;
use crate::tokenizer::{Token, TokenizerState};

impl TreeBuilder<'_> {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(super) fn handle_initial_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A
            // LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or
            // U+0020 SPACE"
            // "Ignore the token."
            _ if token.is_whitespace_character() => {}

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => self.insert_comment_in(NodeId::ROOT, data),

            // "A DOCTYPE token"
            // "Append a DocumentType node to the Document node, with its name set
            // to the name given in the DOCTYPE token, or the empty string if the
            // name was missing; its public ID set to the public identifier given
            // in the DOCTYPE token, or the empty string if the public identifier
            // was missing; and its system ID set to the system identifier given in
            // the DOCTYPE token, or the empty string if the system identifier was
            // missing."
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                ..
            } => {
                let document = self.tree.document_mut();
                document.has_doctype = true;
                document.name = name.clone().unwrap_or_default();
                document.public_identifier = public_identifier.clone().unwrap_or_default();
                document.system_identifier = system_identifier.clone().unwrap_or_default();
                self.insertion_mode = InsertionMode::BeforeHtml;
            }

            // "Anything else"
            // "If the document is not an iframe srcdoc document, then this is a
            // parse error ... In any case, switch the insertion mode to "before
            // html", then reprocess the token."
            _ => {
                self.parse_error(ParseErrorKind::MissingDoctype);
                self.reprocess_in(InsertionMode::BeforeHtml, token);
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(super) fn handle_before_html_mode(&mut self, token: &Token) {
        match token {
            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),
            Token::Comment { data } => self.insert_comment_in(NodeId::ROOT, data),
            _ if token.is_whitespace_character() => {}

            // "A start tag whose tag name is "html""
            // "Create an element for the token in the HTML namespace, with the
            // Document as the intended parent. Append it to the Document object.
            // Put this element in the stack of open elements."
            Token::StartTag { name, .. } if name == "html" => {
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::BeforeHead;
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } if !token.is_end_tag_one_of(&["head", "body", "html", "br"]) => {
                self.parse_error(ParseErrorKind::UnexpectedEndTag);
            }

            // "Anything else"
            // "Create an html element whose node document is the Document object.
            // Append it to the Document object. Put this element in the stack of
            // open elements. Switch the insertion mode to "before head", then
            // reprocess the token."
            _ => {
                let _ = self.insert_implied_element("html");
                self.reprocess_in(InsertionMode::BeforeHead, token);
            }
        }
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    ///
    /// A head element is only synthesized when head-only content arrives;
    /// anything else moves on to "after head" without one.
    pub(super) fn handle_before_head_mode(&mut self, token: &Token) {
        match token {
            _ if token.is_whitespace_character() => {}
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_mode(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "head""
            // "Insert an HTML element for the token. Set the head element pointer
            // to the newly created head element. Switch the insertion mode to
            // "in head"."
            Token::StartTag { name, .. } if name == "head" => {
                let head = self.insert_html_element(token);
                self.head_element_pointer = Some(head);
                self.insertion_mode = InsertionMode::InHead;
            }

            _ if token.is_start_tag_one_of(HEAD_ONLY) => {
                let head = self.insert_implied_element("head");
                self.head_element_pointer = Some(head);
                self.reprocess_in(InsertionMode::InHead, token);
            }

            Token::EndTag { .. } if !token.is_end_tag_one_of(&["head", "body", "html", "br"]) => {
                self.parse_error(ParseErrorKind::UnexpectedEndTag);
            }

            _ => self.reprocess_in(InsertionMode::AfterHead, token),
        }
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(super) fn handle_in_head_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if token.is_whitespace_character() => {
                self.insert_character(*data);
            }
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_mode(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link""
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            _ if token.is_start_tag_one_of(&["base", "basefont", "bgsound", "link", "meta"]) => {
                self.insert_void_element(token);
            }

            // "A start tag whose tag name is "title""
            // "Follow the generic RCDATA element parsing algorithm."
            Token::StartTag { name, .. } if name == "title" => {
                self.parse_text_element(token, TokenizerState::RCDATA);
            }

            // "A start tag whose tag name is "noscript", if the scripting flag
            // is enabled" / "A start tag whose tag name is one of: "noframes",
            // "style""
            // "Follow the generic raw text element parsing algorithm."
            _ if token.is_start_tag_one_of(&["noscript", "noframes", "style"]) => {
                self.parse_text_element(token, TokenizerState::RAWTEXT);
            }

            // "A start tag whose tag name is "script""
            Token::StartTag { name, .. } if name == "script" => {
                self.parse_text_element(token, TokenizerState::ScriptData);
            }

            // "An end tag whose tag name is "head""
            // "Pop the current node (which will be the head element) off the
            // stack of open elements. Switch the insertion mode to "after head"."
            Token::EndTag { name } if name == "head" => {
                let _ = self.pop();
                self.insertion_mode = InsertionMode::AfterHead;
            }

            Token::StartTag { name, .. } if name == "template" => {
                self.insert_template(token);
            }
            Token::EndTag { name } if name == "template" => self.close_template(),

            Token::StartTag { name, .. } if name == "head" => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
            }
            Token::EndTag { .. } if !token.is_end_tag_one_of(&["body", "html", "br"]) => {
                self.parse_error(ParseErrorKind::UnexpectedEndTag);
            }

            // "Anything else"
            // "Pop the current node (which will be the head element) off the
            // stack of open elements. Switch the insertion mode to "after head".
            // Reprocess the token."
            _ => {
                let _ = self.pop();
                self.reprocess_in(InsertionMode::AfterHead, token);
            }
        }
    }

    /// A `template` start tag. Template contents are parsed as ordinary
    /// children with the "in body" rules.
    pub(super) fn insert_template(&mut self, token: &Token) {
        let _ = self.insert_html_element(token);
        self.push_formatting_marker();
        self.insertion_mode = InsertionMode::InBody;
    }

    /// A `template` end tag.
    pub(super) fn close_template(&mut self) {
        if !self.stack_contains_tag("template") {
            self.parse_error(ParseErrorKind::UnexpectedEndTag);
            return;
        }
        self.close_element("template");
        self.clear_active_formatting_elements_to_last_marker();
        self.reset_insertion_mode_appropriately();
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(super) fn handle_after_head_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if token.is_whitespace_character() => {
                self.insert_character(*data);
            }
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_mode(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "body""
            // "Insert an HTML element for the token. Set the frameset-ok flag to
            // "not ok". Switch the insertion mode to "in body"."
            Token::StartTag { name, .. } if name == "body" => {
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InBody;
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title""
            // "Push the node pointed to by the head element pointer onto the
            // stack of open elements. Process the token using the rules for the
            // "in head" insertion mode. Remove the node pointed to by the head
            // element pointer from the stack of open elements."
            _ if token.is_start_tag_one_of(HEAD_ONLY) => {
                let head = match self.head_element_pointer {
                    Some(head) => {
                        self.parse_error(ParseErrorKind::UnexpectedStartTag);
                        self.stack_of_open_elements.push(head);
                        head
                    }
                    None => {
                        let head = self.insert_implied_element("head");
                        self.head_element_pointer = Some(head);
                        head
                    }
                };
                self.process_using_mode(InsertionMode::InHead, token);
                self.remove_from_stack(head);
            }

            Token::EndTag { name } if name == "template" => {
                self.process_using_mode(InsertionMode::InHead, token);
            }
            Token::StartTag { name, .. } if name == "head" => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
            }
            Token::EndTag { .. } if !token.is_end_tag_one_of(&["body", "html", "br"]) => {
                self.parse_error(ParseErrorKind::UnexpectedEndTag);
            }

            // "Anything else"
            // "Insert an HTML element for a "body" start tag token with no
            // attributes. Switch the insertion mode to "in body". Reprocess the
            // current token."
            _ => {
                let _ = self.insert_implied_element("body");
                self.reprocess_in(InsertionMode::InBody, token);
            }
        }
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(super) fn handle_text_mode(&mut self, token: &Token) {
        match token {
            // "A character token"
            // "Insert the token's character."
            Token::Character { data } => self.insert_character(*data),

            // "An end-of-file token"
            // "Parse error. ... Pop the current node off the stack of open
            // elements. Switch the insertion mode to the original insertion mode
            // and reprocess the token."
            Token::EndOfFile => {
                self.parse_error(ParseErrorKind::EofWithOpenElements);
                let _ = self.pop();
                self.reprocess_in(self.original_insertion_mode, token);
            }

            // "Any other end tag"
            // "Pop the current node off the stack of open elements. Switch the
            // insertion mode to the original insertion mode."
            Token::EndTag { .. } => {
                let _ = self.pop();
                self.insertion_mode = self.original_insertion_mode;
            }

            _ => {}
        }
    }

    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    pub(super) fn handle_after_body_mode(&mut self, token: &Token) {
        match token {
            _ if token.is_whitespace_character() => {
                self.process_using_mode(InsertionMode::InBody, token);
            }

            // "A comment token"
            // "Insert a comment as the last child of the first element in the
            // stack of open elements (the html element)."
            Token::Comment { data } => {
                let html = self
                    .stack_of_open_elements
                    .first()
                    .copied()
                    .unwrap_or(NodeId::ROOT);
                self.insert_comment_in(html, data);
            }

            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_mode(InsertionMode::InBody, token);
            }

            // "An end tag whose tag name is "html""
            // "Switch the insertion mode to "after after body"."
            Token::EndTag { name } if name == "html" => {
                self.insertion_mode = InsertionMode::AfterAfterBody;
            }

            Token::EndOfFile => self.stop_parsing(),

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and reprocess
            // the token."
            _ => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
                self.reprocess_in(InsertionMode::InBody, token);
            }
        }
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    pub(super) fn handle_after_after_body_mode(&mut self, token: &Token) {
        match token {
            Token::Comment { data } => self.insert_comment_in(NodeId::ROOT, data),
            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),
            _ if token.is_whitespace_character() || token.is_start_tag_one_of(&["html"]) => {
                self.process_using_mode(InsertionMode::InBody, token);
            }
            Token::EndOfFile => self.stop_parsing(),
            _ => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
                self.reprocess_in(InsertionMode::InBody, token);
            }
        }
    }

    /// [§ 13.2.6.4.7 "in body" - A start tag whose tag name is "html"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "for each attribute on the token, check to see if the attribute is
    /// already present on the top element of the stack of open elements. If it
    /// is not, add the attribute and its corresponding value to that element."
    pub(super) fn merge_attributes_into(&mut self, target: NodeId, token: &Token) {
        let Token::StartTag { attributes, .. } = token else {
            return;
        };
        let Some(node) = self.tree.get_mut(target) else {
            return;
        };
        if let NodeType::Element(element) = &mut node.node_type {
            for attribute in attributes {
                if element.get_attribute(&attribute.name).is_none() {
                    element.attrs.push(attribute.clone());
                }
            }
        }
    }
}
