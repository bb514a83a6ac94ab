use std::collections::VecDeque;

use strum_macros::Display;
use treestat_dom::Attribute;

use crate::error::{ParseError, ParseErrorKind};

use super::token::Token;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer state machine. The three "less-than sign / end tag open /
/// end tag name" families of RCDATA, RAWTEXT and script data share one set of
/// states; `Tokenizer::text_state` remembers which text state to fall back to.
/// Character references are consumed inline rather than through states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    RCDATA,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    RAWTEXT,
    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    ScriptData,
    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    PLAINTEXT,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// § 13.2.5.9, § 13.2.5.12 and § 13.2.5.15: text less-than sign states.
    TextLessThanSign,
    /// § 13.2.5.10, § 13.2.5.13 and § 13.2.5.16: text end tag open states.
    TextEndTagOpen,
    /// § 13.2.5.11, § 13.2.5.14 and § 13.2.5.17: text end tag name states.
    TextEndTagName,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// § 13.2.5.36 and § 13.2.5.37: attribute value (quoted) states; holds the quote.
    AttributeValueQuoted(char),
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    BogusComment,
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    MarkupDeclarationOpen,
    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    CommentStart,
    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    CommentStartDash,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    Comment,
    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    CommentEndDash,
    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    CommentEnd,
    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    CommentEndBang,
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    DOCTYPE,
    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    BeforeDOCTYPEName,
    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    DOCTYPEName,
    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    AfterDOCTYPEName,
    /// § 13.2.5.57 and § 13.2.5.58: after the PUBLIC keyword, before the identifier.
    BeforeDOCTYPEPublicIdentifier,
    /// § 13.2.5.59 and § 13.2.5.60: public identifier (quoted); holds the quote.
    DOCTYPEPublicIdentifierQuoted(char),
    /// § 13.2.5.61 and § 13.2.5.62: after the public identifier.
    AfterDOCTYPEPublicIdentifier,
    /// § 13.2.5.63 and § 13.2.5.64: after the SYSTEM keyword, before the identifier.
    BeforeDOCTYPESystemIdentifier,
    /// § 13.2.5.65 and § 13.2.5.66: system identifier (quoted); holds the quote.
    DOCTYPESystemIdentifierQuoted(char),
    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    AfterDOCTYPESystemIdentifier,
    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    BogusDOCTYPE,
    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    CDATASection,
}

/// A start or end tag under construction.
#[derive(Debug, Default)]
struct TagBuilder {
    name: String,
    is_end: bool,
    self_closing: bool,
    attributes: Vec<Attribute>,
    attribute_name: String,
    attribute_value: String,
    has_pending_attribute: bool,
}

/// A DOCTYPE under construction.
#[derive(Debug, Default)]
struct DoctypeBuilder {
    name: Option<String>,
    public_identifier: Option<String>,
    system_identifier: Option<String>,
    force_quirks: bool,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "Implementations must act as if they used the following state machine to tokenize HTML."
///
/// Pull-based: the tree builder asks for one token at a time with
/// [`Tokenizer::next_token`] and may switch the state in between, as
/// § 13.2.6 requires for `title`, `textarea`, `style`, `script` and friends.
pub struct Tokenizer<'a> {
    pub(super) state: TokenizerState,
    pub(super) input: &'a str,
    pub(super) pos: usize,
    current_input_character: Option<char>,
    // "Reconsume in the X state" sets this flag.
    reconsume: bool,
    pending: VecDeque<Token>,
    tag: TagBuilder,
    comment: String,
    doctype: DoctypeBuilder,

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#temporary-buffer)
    temporary_buffer: String,

    /// "The last start tag token emitted is used as part of the tree construction stage
    /// and in the RCDATA, RAWTEXT, and script data states."
    last_start_tag_name: Option<String>,

    /// The text state the shared end-tag states return to.
    text_state: TokenizerState,

    /// Set by the tree builder when "the adjusted current node is not an
    /// element in the HTML namespace", which is the only place `<![CDATA[`
    /// opens a CDATA section.
    allow_cdata: bool,

    errors: Vec<ParseError>,
    max_errors: Option<usize>,
    emitted_eof: bool,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer over `input`.
    ///
    /// "The initial state is the data state."
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            state: TokenizerState::Data,
            input,
            pos: 0,
            current_input_character: None,
            reconsume: false,
            pending: VecDeque::new(),
            tag: TagBuilder::default(),
            comment: String::new(),
            doctype: DoctypeBuilder::default(),
            temporary_buffer: String::new(),
            last_start_tag_name: None,
            text_state: TokenizerState::Data,
            allow_cdata: false,
            errors: Vec::new(),
            max_errors: None,
            emitted_eof: false,
        }
    }

    /// Stop recording errors after `max` of them.
    #[must_use]
    pub const fn with_max_errors(mut self, max: Option<usize>) -> Self {
        self.max_errors = max;
        self
    }

    /// Switch to a text state from outside, as the tree builder does after
    /// inserting an RCDATA, RAWTEXT, script or plaintext element.
    pub const fn set_state(&mut self, state: TokenizerState) {
        self.state = state;
    }

    /// See the `allow_cdata` field.
    pub const fn set_allow_cdata(&mut self, allow: bool) {
        self.allow_cdata = allow;
    }

    /// Current byte offset into the input.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.pos
    }

    /// Errors recorded so far, tokenizer and tree builder alike.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Take the recorded errors, leaving none behind.
    pub fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }

    /// Record a parse error at the current offset, unless the cap is reached.
    pub fn parse_error(&mut self, kind: ParseErrorKind) {
        if self.max_errors.is_some_and(|max| self.errors.len() >= max) {
            return;
        }
        self.errors.push(ParseError {
            kind,
            offset: self.pos,
        });
    }

    /// Run the state machine until a token is available. After the
    /// end-of-file token has been produced every call returns `EndOfFile`.
    pub fn next_token(&mut self) -> Token {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return token;
            }
            if self.emitted_eof {
                return Token::EndOfFile;
            }
            self.step();
        }
    }

    /// Consume one character (or reconsume the current one) and dispatch on
    /// the current state.
    fn step(&mut self) {
        if self.reconsume {
            self.reconsume = false;
        } else {
            self.current_input_character = self.consume();
        }

        match self.state {
            TokenizerState::Data => self.handle_data_state(),
            TokenizerState::RCDATA => self.handle_text_state(true),
            TokenizerState::RAWTEXT | TokenizerState::ScriptData => self.handle_text_state(false),
            TokenizerState::PLAINTEXT => self.handle_plaintext_state(),
            TokenizerState::TagOpen => self.handle_tag_open_state(),
            TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
            TokenizerState::TagName => self.handle_tag_name_state(),
            TokenizerState::TextLessThanSign => self.handle_text_less_than_sign_state(),
            TokenizerState::TextEndTagOpen => self.handle_text_end_tag_open_state(),
            TokenizerState::TextEndTagName => self.handle_text_end_tag_name_state(),
            TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
            TokenizerState::AttributeName => self.handle_attribute_name_state(),
            TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
            TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
            TokenizerState::AttributeValueQuoted(quote) => {
                self.handle_attribute_value_quoted_state(quote);
            }
            TokenizerState::AttributeValueUnquoted => self.handle_attribute_value_unquoted_state(),
            TokenizerState::AfterAttributeValueQuoted => {
                self.handle_after_attribute_value_quoted_state();
            }
            TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
            TokenizerState::BogusComment => self.handle_bogus_comment_state(),
            TokenizerState::MarkupDeclarationOpen => self.handle_markup_declaration_open_state(),
            TokenizerState::CommentStart => self.handle_comment_start_state(),
            TokenizerState::CommentStartDash => self.handle_comment_start_dash_state(),
            TokenizerState::Comment => self.handle_comment_state(),
            TokenizerState::CommentEndDash => self.handle_comment_end_dash_state(),
            TokenizerState::CommentEnd => self.handle_comment_end_state(),
            TokenizerState::CommentEndBang => self.handle_comment_end_bang_state(),
            TokenizerState::DOCTYPE => self.handle_doctype_state(),
            TokenizerState::BeforeDOCTYPEName => self.handle_before_doctype_name_state(),
            TokenizerState::DOCTYPEName => self.handle_doctype_name_state(),
            TokenizerState::AfterDOCTYPEName => self.handle_after_doctype_name_state(),
            TokenizerState::BeforeDOCTYPEPublicIdentifier => {
                self.handle_before_doctype_identifier_state(true);
            }
            TokenizerState::DOCTYPEPublicIdentifierQuoted(quote) => {
                self.handle_doctype_identifier_quoted_state(quote, true);
            }
            TokenizerState::AfterDOCTYPEPublicIdentifier => {
                self.handle_after_doctype_public_identifier_state();
            }
            TokenizerState::BeforeDOCTYPESystemIdentifier => {
                self.handle_before_doctype_identifier_state(false);
            }
            TokenizerState::DOCTYPESystemIdentifierQuoted(quote) => {
                self.handle_doctype_identifier_quoted_state(quote, false);
            }
            TokenizerState::AfterDOCTYPESystemIdentifier => {
                self.handle_after_doctype_system_identifier_state();
            }
            TokenizerState::BogusDOCTYPE => self.handle_bogus_doctype_state(),
            TokenizerState::CDATASection => self.handle_cdata_section_state(),
        }
    }

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn handle_data_state(&mut self) {
        match self.current_input_character {
            // "U+0026 AMPERSAND (&)"
            Some('&') => self.emit_character_reference(),
            // "U+003C LESS-THAN SIGN (<) - Switch to the tag open state."
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            // "U+0000 NULL - This is an unexpected-null-character parse error.
            // Emit the current input character as a character token."
            Some('\0') => {
                self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
                self.emit_character('\0');
            }
            // "EOF - Emit an end-of-file token."
            None => self.emit_eof(),
            // "Anything else - Emit the current input character as a character token."
            Some(c) => self.emit_character(c),
        }
    }

    /// RCDATA, RAWTEXT and script data differ only in whether '&' starts a
    /// character reference.
    fn handle_text_state(&mut self, rcdata: bool) {
        match self.current_input_character {
            Some('&') if rcdata => self.emit_character_reference(),
            Some('<') => {
                self.text_state = self.state;
                self.switch_to(TokenizerState::TextLessThanSign);
            }
            Some('\0') => {
                self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
                self.emit_character('\u{FFFD}');
            }
            None => self.emit_eof(),
            Some(c) => self.emit_character(c),
        }
    }

    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    fn handle_plaintext_state(&mut self) {
        match self.current_input_character {
            Some('\0') => {
                self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
                self.emit_character('\u{FFFD}');
            }
            None => self.emit_eof(),
            Some(c) => self.emit_character(c),
        }
    }

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open_state(&mut self) {
        match self.current_input_character {
            // "U+0021 EXCLAMATION MARK (!) - Switch to the markup declaration open state."
            Some('!') => self.switch_to(TokenizerState::MarkupDeclarationOpen),
            // "U+002F SOLIDUS (/) - Switch to the end tag open state."
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            // "ASCII alpha - Create a new start tag token, set its tag name to the
            // empty string. Reconsume in the tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.tag = TagBuilder::default();
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003F QUESTION MARK (?) - This is an
            // unexpected-question-mark-instead-of-tag-name parse error. Create a
            // comment token whose data is the empty string. Reconsume in the bogus
            // comment state."
            Some('?') => {
                self.parse_error(ParseErrorKind::UnexpectedQuestionMarkInsteadOfTagName);
                self.comment.clear();
                self.reconsume_in(TokenizerState::BogusComment);
            }
            // "EOF - This is an eof-before-tag-name parse error. Emit a U+003C
            // LESS-THAN SIGN character token and an end-of-file token."
            None => {
                self.parse_error(ParseErrorKind::EofBeforeTagName);
                self.emit_character('<');
                self.emit_eof();
            }
            // "Anything else - This is an invalid-first-character-of-tag-name parse
            // error. Emit a U+003C LESS-THAN SIGN character token. Reconsume in the
            // data state."
            Some(_) => {
                self.parse_error(ParseErrorKind::InvalidFirstCharacterOfTagName);
                self.emit_character('<');
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.tag = TagBuilder {
                    is_end: true,
                    ..TagBuilder::default()
                };
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-end-tag-name parse
            // error. Switch to the data state."
            Some('>') => {
                self.parse_error(ParseErrorKind::MissingEndTagName);
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.parse_error(ParseErrorKind::EofBeforeTagName);
                self.emit_character('<');
                self.emit_character('/');
                self.emit_eof();
            }
            Some(_) => {
                self.parse_error(ParseErrorKind::InvalidFirstCharacterOfTagName);
                self.comment.clear();
                self.reconsume_in(TokenizerState::BogusComment);
            }
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_tag_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace(c) => self.switch_to(TokenizerState::BeforeAttributeName),
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_tag();
            }
            Some('\0') => {
                self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
                self.tag.name.push('\u{FFFD}');
            }
            None => {
                self.parse_error(ParseErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(c) => self.tag.name.push(c.to_ascii_lowercase()),
        }
    }

    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    /// and its RAWTEXT and script data twins.
    fn handle_text_less_than_sign_state(&mut self) {
        if self.current_input_character == Some('/') {
            self.temporary_buffer.clear();
            self.switch_to(TokenizerState::TextEndTagOpen);
        } else {
            self.emit_character('<');
            self.reconsume_in(self.text_state);
        }
    }

    /// [§ 13.2.5.10 RCDATA end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    fn handle_text_end_tag_open_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.tag = TagBuilder {
                    is_end: true,
                    ..TagBuilder::default()
                };
                self.reconsume_in(TokenizerState::TextEndTagName);
            }
            _ => {
                self.emit_character('<');
                self.emit_character('/');
                self.reconsume_in(self.text_state);
            }
        }
    }

    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    fn handle_text_end_tag_name_state(&mut self) {
        let appropriate = self.is_appropriate_end_tag();
        match self.current_input_character {
            Some(c) if is_whitespace(c) && appropriate => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') if appropriate => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') if appropriate => {
                self.switch_to(TokenizerState::Data);
                self.emit_tag();
            }
            Some(c) if c.is_ascii_alphabetic() => {
                self.tag.name.push(c.to_ascii_lowercase());
                self.temporary_buffer.push(c);
            }
            // "Anything else - Emit a U+003C LESS-THAN SIGN character token, a
            // U+002F SOLIDUS character token, and a character token for each of the
            // characters in the temporary buffer. Reconsume in the RCDATA state."
            _ => {
                self.emit_character('<');
                self.emit_character('/');
                let buffer = std::mem::take(&mut self.temporary_buffer);
                for c in buffer.chars() {
                    self.emit_character(c);
                }
                self.temporary_buffer = buffer;
                self.reconsume_in(self.text_state);
            }
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace(c) => {}
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            // "U+003D EQUALS SIGN (=) - This is an
            // unexpected-equals-sign-before-attribute-name parse error. Start a new
            // attribute in the current tag token. Set that attribute's name to the
            // current input character, and its value to the empty string. Switch to
            // the attribute name state."
            Some('=') => {
                self.parse_error(ParseErrorKind::UnexpectedEqualsSignBeforeAttributeName);
                self.start_attribute();
                self.tag.attribute_name.push('=');
                self.switch_to(TokenizerState::AttributeName);
            }
            Some(_) => {
                self.start_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn handle_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace(c) => self.reconsume_in(TokenizerState::AfterAttributeName),
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('\0') => {
                self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
                self.tag.attribute_name.push('\u{FFFD}');
            }
            Some(c) => {
                if matches!(c, '"' | '\'' | '<') {
                    self.parse_error(ParseErrorKind::UnexpectedCharacterInAttributeName);
                }
                self.tag.attribute_name.push(c.to_ascii_lowercase());
            }
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn handle_after_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace(c) => {}
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_tag();
            }
            None => {
                self.parse_error(ParseErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(_) => {
                self.start_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn handle_before_attribute_value_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace(c) => {}
            Some(quote @ ('"' | '\'')) => {
                self.switch_to(TokenizerState::AttributeValueQuoted(quote));
            }
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-attribute-value
            // parse error. Switch to the data state. Emit the current tag token."
            Some('>') => {
                self.parse_error(ParseErrorKind::MissingAttributeValue);
                self.switch_to(TokenizerState::Data);
                self.emit_tag();
            }
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    fn handle_attribute_value_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            Some('&') => self.append_attribute_character_reference(),
            Some('\0') => {
                self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
                self.tag.attribute_value.push('\u{FFFD}');
            }
            None => {
                self.parse_error(ParseErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(c) => self.tag.attribute_value.push(c),
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn handle_attribute_value_unquoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace(c) => self.switch_to(TokenizerState::BeforeAttributeName),
            Some('&') => self.append_attribute_character_reference(),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_tag();
            }
            Some('\0') => {
                self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
                self.tag.attribute_value.push('\u{FFFD}');
            }
            None => {
                self.parse_error(ParseErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(c) => {
                if matches!(c, '"' | '\'' | '<' | '=' | '`') {
                    self.parse_error(ParseErrorKind::UnexpectedCharacterInUnquotedAttributeValue);
                }
                self.tag.attribute_value.push(c);
            }
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn handle_after_attribute_value_quoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace(c) => self.switch_to(TokenizerState::BeforeAttributeName),
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_tag();
            }
            None => {
                self.parse_error(ParseErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(_) => {
                self.parse_error(ParseErrorKind::MissingWhitespaceBetweenAttributes);
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn handle_self_closing_start_tag_state(&mut self) {
        match self.current_input_character {
            // "U+003E GREATER-THAN SIGN (>) - Set the self-closing flag of the
            // current tag token. Switch to the data state. Emit the current tag token."
            Some('>') => {
                self.tag.self_closing = true;
                self.switch_to(TokenizerState::Data);
                self.emit_tag();
            }
            None => {
                self.parse_error(ParseErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(_) => {
                self.parse_error(ParseErrorKind::UnexpectedSolidusInTag);
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    fn handle_bogus_comment_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_comment();
            }
            None => {
                self.emit_comment();
                self.emit_eof();
            }
            Some('\0') => {
                self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
                self.comment.push('\u{FFFD}');
            }
            Some(c) => self.comment.push(c),
        }
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// The character that brought us here has already been consumed, so the
    /// lookahead starts one character back.
    fn handle_markup_declaration_open_state(&mut self) {
        let input = self.input;
        let start = self.pos - self.current_input_character.map_or(0, char::len_utf8);
        let rest = &input[start..];

        // "Two U+002D HYPHEN-MINUS characters (-) - Consume those two characters,
        // create a comment token whose data is the empty string, and switch to
        // the comment start state."
        if rest.starts_with("--") {
            self.pos = start + 2;
            self.comment.clear();
            self.switch_to(TokenizerState::CommentStart);
        }
        // "ASCII case-insensitive match for the word "DOCTYPE""
        else if rest.get(..7).is_some_and(|word| word.eq_ignore_ascii_case("doctype")) {
            self.pos = start + 7;
            self.switch_to(TokenizerState::DOCTYPE);
        }
        // "The string "[CDATA[" (the five uppercase letters "CDATA" with a U+005B
        // LEFT SQUARE BRACKET character before and after)"
        else if rest.starts_with("[CDATA[") {
            self.pos = start + 7;
            if self.allow_cdata {
                self.comment.clear();
                self.switch_to(TokenizerState::CDATASection);
            } else {
                // "Otherwise, this is a cdata-in-html-content parse error. Create a
                // comment token whose data is the "[CDATA[" string. Switch to the
                // bogus comment state."
                self.parse_error(ParseErrorKind::CdataInHtmlContent);
                self.comment.clear();
                self.comment.push_str("[CDATA[");
                self.switch_to(TokenizerState::BogusComment);
            }
        }
        // "Anything else - This is an incorrectly-opened-comment parse error.
        // Create a comment token whose data is the empty string. Switch to the
        // bogus comment state (don't consume anything in the current state)."
        else {
            self.parse_error(ParseErrorKind::IncorrectlyOpenedComment);
            self.comment.clear();
            self.reconsume_in(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    fn handle_comment_start_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentStartDash),
            Some('>') => {
                self.parse_error(ParseErrorKind::AbruptClosingOfEmptyComment);
                self.switch_to(TokenizerState::Data);
                self.emit_comment();
            }
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    fn handle_comment_start_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            Some('>') => {
                self.parse_error(ParseErrorKind::AbruptClosingOfEmptyComment);
                self.switch_to(TokenizerState::Data);
                self.emit_comment();
            }
            None => {
                self.parse_error(ParseErrorKind::EofInComment);
                self.emit_comment();
                self.emit_eof();
            }
            Some(_) => {
                self.comment.push('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    fn handle_comment_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEndDash),
            Some('\0') => {
                self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
                self.comment.push('\u{FFFD}');
            }
            None => {
                self.parse_error(ParseErrorKind::EofInComment);
                self.emit_comment();
                self.emit_eof();
            }
            Some(c) => self.comment.push(c),
        }
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    fn handle_comment_end_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            None => {
                self.parse_error(ParseErrorKind::EofInComment);
                self.emit_comment();
                self.emit_eof();
            }
            Some(_) => {
                self.comment.push('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    fn handle_comment_end_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_comment();
            }
            Some('!') => self.switch_to(TokenizerState::CommentEndBang),
            Some('-') => self.comment.push('-'),
            None => {
                self.parse_error(ParseErrorKind::EofInComment);
                self.emit_comment();
                self.emit_eof();
            }
            Some(_) => {
                self.comment.push_str("--");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    fn handle_comment_end_bang_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.comment.push_str("--!");
                self.switch_to(TokenizerState::CommentEndDash);
            }
            Some('>') => {
                self.parse_error(ParseErrorKind::IncorrectlyClosedComment);
                self.switch_to(TokenizerState::Data);
                self.emit_comment();
            }
            None => {
                self.parse_error(ParseErrorKind::EofInComment);
                self.emit_comment();
                self.emit_eof();
            }
            Some(_) => {
                self.comment.push_str("--!");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    fn handle_doctype_state(&mut self) {
        self.doctype = DoctypeBuilder::default();
        match self.current_input_character {
            Some(c) if is_whitespace(c) => self.switch_to(TokenizerState::BeforeDOCTYPEName),
            Some('>') => self.reconsume_in(TokenizerState::BeforeDOCTYPEName),
            None => {
                self.parse_error(ParseErrorKind::EofInDoctype);
                self.doctype.force_quirks = true;
                self.emit_doctype();
                self.emit_eof();
            }
            Some(_) => self.reconsume_in(TokenizerState::BeforeDOCTYPEName),
        }
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    fn handle_before_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace(c) => {}
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-doctype-name parse
            // error. Create a new DOCTYPE token. Set its force-quirks flag to on.
            // Switch to the data state. Emit the current token."
            Some('>') => {
                self.parse_error(ParseErrorKind::MissingDoctypeName);
                self.doctype.force_quirks = true;
                self.switch_to(TokenizerState::Data);
                self.emit_doctype();
            }
            None => {
                self.parse_error(ParseErrorKind::EofInDoctype);
                self.doctype.force_quirks = true;
                self.emit_doctype();
                self.emit_eof();
            }
            Some(c) => {
                let c = if c == '\0' { '\u{FFFD}' } else { c.to_ascii_lowercase() };
                self.doctype.name = Some(c.to_string());
                self.switch_to(TokenizerState::DOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    fn handle_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace(c) => self.switch_to(TokenizerState::AfterDOCTYPEName),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_doctype();
            }
            None => {
                self.parse_error(ParseErrorKind::EofInDoctype);
                self.doctype.force_quirks = true;
                self.emit_doctype();
                self.emit_eof();
            }
            Some(c) => {
                let c = if c == '\0' { '\u{FFFD}' } else { c.to_ascii_lowercase() };
                self.doctype.name.get_or_insert_with(String::new).push(c);
            }
        }
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    fn handle_after_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_doctype();
            }
            None => {
                self.parse_error(ParseErrorKind::EofInDoctype);
                self.doctype.force_quirks = true;
                self.emit_doctype();
                self.emit_eof();
            }
            Some(c) => {
                // "If the six characters starting from the current input character
                // are an ASCII case-insensitive match for the word "PUBLIC"..."
                let input = self.input;
                let start = self.pos - c.len_utf8();
                let keyword = input.get(start..start + 6);
                if keyword.is_some_and(|k| k.eq_ignore_ascii_case("public")) {
                    self.pos = start + 6;
                    self.switch_to(TokenizerState::BeforeDOCTYPEPublicIdentifier);
                } else if keyword.is_some_and(|k| k.eq_ignore_ascii_case("system")) {
                    self.pos = start + 6;
                    self.switch_to(TokenizerState::BeforeDOCTYPESystemIdentifier);
                } else {
                    self.parse_error(ParseErrorKind::InvalidCharacterSequenceAfterDoctypeName);
                    self.doctype.force_quirks = true;
                    self.reconsume_in(TokenizerState::BogusDOCTYPE);
                }
            }
        }
    }

    /// § 13.2.5.57/58 (public) and § 13.2.5.63/64 (system): whitespace, then a
    /// quoted identifier.
    fn handle_before_doctype_identifier_state(&mut self, public: bool) {
        match self.current_input_character {
            Some(c) if is_whitespace(c) => {}
            Some(quote @ ('"' | '\'')) => {
                if public {
                    self.doctype.public_identifier = Some(String::new());
                    self.switch_to(TokenizerState::DOCTYPEPublicIdentifierQuoted(quote));
                } else {
                    self.doctype.system_identifier = Some(String::new());
                    self.switch_to(TokenizerState::DOCTYPESystemIdentifierQuoted(quote));
                }
            }
            Some('>') => {
                self.parse_error(ParseErrorKind::MissingQuoteBeforeDoctypeIdentifier);
                self.doctype.force_quirks = true;
                self.switch_to(TokenizerState::Data);
                self.emit_doctype();
            }
            None => {
                self.parse_error(ParseErrorKind::EofInDoctype);
                self.doctype.force_quirks = true;
                self.emit_doctype();
                self.emit_eof();
            }
            Some(_) => {
                self.parse_error(ParseErrorKind::MissingQuoteBeforeDoctypeIdentifier);
                self.doctype.force_quirks = true;
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// § 13.2.5.59/60 (public) and § 13.2.5.65/66 (system).
    fn handle_doctype_identifier_quoted_state(&mut self, quote: char, public: bool) {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(if public {
                TokenizerState::AfterDOCTYPEPublicIdentifier
            } else {
                TokenizerState::AfterDOCTYPESystemIdentifier
            }),
            // "U+003E GREATER-THAN SIGN (>) - This is an abrupt-doctype-public-identifier
            // parse error. Set the current DOCTYPE token's force-quirks flag to on.
            // Switch to the data state. Emit the current DOCTYPE token."
            Some('>') => {
                self.parse_error(ParseErrorKind::AbruptDoctypeIdentifier);
                self.doctype.force_quirks = true;
                self.switch_to(TokenizerState::Data);
                self.emit_doctype();
            }
            None => {
                self.parse_error(ParseErrorKind::EofInDoctype);
                self.doctype.force_quirks = true;
                self.emit_doctype();
                self.emit_eof();
            }
            Some(c) => {
                let c = if c == '\0' { '\u{FFFD}' } else { c };
                let identifier = if public {
                    &mut self.doctype.public_identifier
                } else {
                    &mut self.doctype.system_identifier
                };
                identifier.get_or_insert_with(String::new).push(c);
            }
        }
    }

    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    /// folded together with § 13.2.5.62, the between-identifiers state.
    fn handle_after_doctype_public_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_doctype();
            }
            Some(quote @ ('"' | '\'')) => {
                self.doctype.system_identifier = Some(String::new());
                self.switch_to(TokenizerState::DOCTYPESystemIdentifierQuoted(quote));
            }
            None => {
                self.parse_error(ParseErrorKind::EofInDoctype);
                self.doctype.force_quirks = true;
                self.emit_doctype();
                self.emit_eof();
            }
            Some(_) => {
                self.parse_error(ParseErrorKind::MissingQuoteBeforeDoctypeIdentifier);
                self.doctype.force_quirks = true;
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    fn handle_after_doctype_system_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_doctype();
            }
            None => {
                self.parse_error(ParseErrorKind::EofInDoctype);
                self.doctype.force_quirks = true;
                self.emit_doctype();
                self.emit_eof();
            }
            // "This does not set the current DOCTYPE token's force-quirks flag to on."
            Some(_) => {
                self.parse_error(ParseErrorKind::UnexpectedCharacterAfterDoctypeIdentifier);
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    fn handle_bogus_doctype_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_doctype();
            }
            None => {
                self.emit_doctype();
                self.emit_eof();
            }
            Some(_) => {}
        }
    }

    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    ///
    /// The bracket and end states (§ 13.2.5.70/71) reduce to looking ahead for
    /// "]]>"; the section body is buffered in the comment buffer.
    fn handle_cdata_section_state(&mut self) {
        match self.current_input_character {
            Some(']') if self.input[self.pos..].starts_with("]>") => {
                self.pos += 2;
                self.switch_to(TokenizerState::Data);
                let data = std::mem::take(&mut self.comment);
                self.pending.push_back(Token::CData { data });
            }
            None => {
                self.parse_error(ParseErrorKind::EofInCdata);
                let data = std::mem::take(&mut self.comment);
                self.pending.push_back(Token::CData { data });
                self.emit_eof();
            }
            Some(c) => self.comment.push(c),
        }
    }

    // ===== helpers =====

    /// "Consume the next input character". Newlines are normalized here:
    /// "U+000D CARRIAGE RETURN (CR) characters and U+000A LINE FEED (LF)
    /// characters are treated specially. Any LF character that immediately
    /// follows a CR character must be ignored, and all CR characters must then
    /// be converted to LF characters."
    fn consume(&mut self) -> Option<char> {
        let c = self.input[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        if c == '\r' {
            if self.input[self.pos..].starts_with('\n') {
                self.pos += 1;
            }
            return Some('\n');
        }
        Some(c)
    }

    /// "Switch to the X state"
    const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }

    fn emit_character(&mut self, data: char) {
        self.pending.push_back(Token::Character { data });
    }

    /// "Emit an end-of-file token." Further calls are ignored.
    fn emit_eof(&mut self) {
        if !self.emitted_eof {
            self.emitted_eof = true;
            self.pending.push_back(Token::EndOfFile);
        }
    }

    fn emit_comment(&mut self) {
        let data = std::mem::take(&mut self.comment);
        self.pending.push_back(Token::Comment { data });
    }

    fn emit_doctype(&mut self) {
        let doctype = std::mem::take(&mut self.doctype);
        self.pending.push_back(Token::Doctype {
            name: doctype.name,
            public_identifier: doctype.public_identifier,
            system_identifier: doctype.system_identifier,
            force_quirks: doctype.force_quirks,
        });
    }

    /// Character reference in text content: emit the replacement, or a literal '&'.
    fn emit_character_reference(&mut self) {
        match self.consume_character_reference(false) {
            Some(text) => {
                for c in text.chars() {
                    self.emit_character(c);
                }
            }
            None => self.emit_character('&'),
        }
    }

    fn append_attribute_character_reference(&mut self) {
        match self.consume_character_reference(true) {
            Some(text) => self.tag.attribute_value.push_str(&text),
            None => self.tag.attribute_value.push('&'),
        }
    }

    /// "Start a new attribute in the current tag token."
    fn start_attribute(&mut self) {
        self.finish_attribute();
        self.tag.has_pending_attribute = true;
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "When the user agent leaves the attribute name state ... if there is
    /// already an attribute on the token with the exact same name, then this is
    /// a duplicate-attribute parse error and the new attribute must be removed
    /// from the token."
    fn finish_attribute(&mut self) {
        if !self.tag.has_pending_attribute {
            return;
        }
        self.tag.has_pending_attribute = false;
        let name = std::mem::take(&mut self.tag.attribute_name);
        let value = std::mem::take(&mut self.tag.attribute_value);
        if self.tag.attributes.iter().any(|attr| attr.name == name) {
            self.parse_error(ParseErrorKind::DuplicateAttribute);
        } else {
            self.tag.attributes.push(Attribute { name, value });
        }
    }

    /// "Emit the current tag token."
    fn emit_tag(&mut self) {
        self.finish_attribute();
        let tag = std::mem::take(&mut self.tag);
        let token = if tag.is_end {
            if !tag.attributes.is_empty() {
                self.parse_error(ParseErrorKind::EndTagWithAttributes);
            }
            if tag.self_closing {
                self.parse_error(ParseErrorKind::EndTagWithTrailingSolidus);
            }
            Token::EndTag { name: tag.name }
        } else {
            self.last_start_tag_name = Some(tag.name.clone());
            Token::StartTag {
                name: tag.name,
                self_closing: tag.self_closing,
                attributes: tag.attributes,
            }
        };
        self.pending.push_back(token);
    }

    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any."
    fn is_appropriate_end_tag(&self) -> bool {
        self.last_start_tag_name.as_deref() == Some(self.tag.name.as_str())
    }
}

/// "ASCII whitespace" minus CR, which `consume` never returns.
const fn is_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | ' ')
}
