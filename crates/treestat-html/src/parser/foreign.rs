use treestat_dom::{Namespace, ParseFlags};

use super::core::TreeBuilder;
use super::elements::{FOREIGN_BREAKOUT, is_html_integration_point, is_mathml_text_integration_point};
use crate::error::ParseErrorKind;
use crate::tokenizer::Token;

impl TreeBuilder<'_> {
    /// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
    pub(super) fn process_foreign_content(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Insert a U+FFFD REPLACEMENT CHARACTER character."
            Token::Character { data: '\0' } => {
                self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
                self.insert_character('\u{FFFD}');
            }
            Token::Character { data } => self.insert_character(*data),
            Token::Comment { data } => self.insert_comment(data),
            Token::CData { data } => self.insert_cdata(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),

            // "A start tag whose tag name is one of: "b", "big", ... "var""
            // "A start tag whose tag name is "font", if the token has any
            // attributes named "color", "face", or "size""
            // "Parse error. While the current node is not a MathML text
            // integration point, an HTML integration point, or an element in the
            // HTML namespace, pop elements from the stack of open elements.
            // Reprocess the token according to the rules given in the section
            // corresponding to the current insertion mode in HTML content."
            Token::StartTag {
                name, attributes, ..
            } if FOREIGN_BREAKOUT.contains(&name.as_str())
                || (name == "font"
                    && attributes
                        .iter()
                        .any(|a| matches!(a.name.as_str(), "color" | "face" | "size"))) =>
            {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
                while let Some(element) = self.adjusted_current_element() {
                    if element.namespace == Namespace::Html
                        || is_mathml_text_integration_point(element)
                        || is_html_integration_point(element)
                    {
                        break;
                    }
                    let _ = self.pop();
                }
                self.process_using_mode(self.insertion_mode, token);
            }

            // "Any other start tag"
            // "Insert a foreign element for the token, with adjusted current
            // node's namespace ... If the token has its self-closing flag set,
            // pop the current node off the stack of open elements"
            Token::StartTag { self_closing, .. } => {
                let namespace = self
                    .adjusted_current_element()
                    .map_or(Namespace::Html, |element| element.namespace);
                let _ = self.insert_element(token, namespace, ParseFlags::NONE);
                if *self_closing {
                    let _ = self.pop();
                }
            }

            // "Any other end tag"
            // "Initialize node to be the current node (the bottommost node of
            // the stack). If node's tag name, converted to ASCII lowercase, is
            // not the same as the tag name of the token, then this is a parse
            // error. Loop: If node is the topmost element in the stack of open
            // elements, then return. If node's tag name, converted to ASCII
            // lowercase, is the same as the tag name of the token, pop elements
            // from the stack of open elements until node has been popped from
            // the stack, and then return. Set node to the previous entry in the
            // stack of open elements. If node is not an element in the HTML
            // namespace, return to the step labeled loop. Otherwise, process the
            // token according to the rules given in the section corresponding
            // to the current insertion mode in HTML content."
            Token::EndTag { name } => {
                let top = self.stack_of_open_elements.len();
                for index in (0..top).rev() {
                    let node = self.stack_of_open_elements[index];
                    let Some(element) = self.tree.as_element(node) else {
                        continue;
                    };
                    if index + 1 < top && element.namespace == Namespace::Html {
                        self.process_using_mode(self.insertion_mode, token);
                        return;
                    }
                    if element.tag_name.eq_ignore_ascii_case(name) {
                        self.stack_of_open_elements.truncate(index);
                        return;
                    }
                    if index + 1 == top {
                        self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    }
                }
            }

            Token::EndOfFile => self.process_using_mode(self.insertion_mode, token),
        }
    }
}
