//! Parse errors.
//!
//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//!
//! "This specification defines the parsing rules for HTML documents, whether
//! they are syntactically correct or not." Errors never stop the parse; they
//! are collected on the output so callers can count or inspect them.

use strum_macros::Display;

/// The kind of a recoverable parse error. Names follow the WHATWG error codes
/// where one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ParseErrorKind {
    /// "unexpected-null-character"
    UnexpectedNullCharacter,
    /// "unexpected-question-mark-instead-of-tag-name"
    UnexpectedQuestionMarkInsteadOfTagName,
    /// "invalid-first-character-of-tag-name"
    InvalidFirstCharacterOfTagName,
    /// "missing-end-tag-name"
    MissingEndTagName,
    /// "eof-before-tag-name"
    EofBeforeTagName,
    /// "eof-in-tag"
    EofInTag,
    /// "unexpected-solidus-in-tag"
    UnexpectedSolidusInTag,
    /// "unexpected-equals-sign-before-attribute-name"
    UnexpectedEqualsSignBeforeAttributeName,
    /// "unexpected-character-in-attribute-name"
    UnexpectedCharacterInAttributeName,
    /// "unexpected-character-in-unquoted-attribute-value"
    UnexpectedCharacterInUnquotedAttributeValue,
    /// "missing-attribute-value"
    MissingAttributeValue,
    /// "missing-whitespace-between-attributes"
    MissingWhitespaceBetweenAttributes,
    /// "duplicate-attribute"
    DuplicateAttribute,
    /// "end-tag-with-attributes"
    EndTagWithAttributes,
    /// "end-tag-with-trailing-solidus"
    EndTagWithTrailingSolidus,
    /// "incorrectly-opened-comment"
    IncorrectlyOpenedComment,
    /// "abrupt-closing-of-empty-comment"
    AbruptClosingOfEmptyComment,
    /// "incorrectly-closed-comment"
    IncorrectlyClosedComment,
    /// "eof-in-comment"
    EofInComment,
    /// "eof-in-doctype"
    EofInDoctype,
    /// "missing-doctype-name"
    MissingDoctypeName,
    /// "invalid-character-sequence-after-doctype-name"
    InvalidCharacterSequenceAfterDoctypeName,
    /// "missing-quote-before-doctype-identifier"
    MissingQuoteBeforeDoctypeIdentifier,
    /// "abrupt-doctype-identifier"
    AbruptDoctypeIdentifier,
    /// "unexpected-character-after-doctype-identifier"
    UnexpectedCharacterAfterDoctypeIdentifier,
    /// "cdata-in-html-content"
    CdataInHtmlContent,
    /// "eof-in-cdata"
    EofInCdata,
    /// "missing-semicolon-after-character-reference"
    MissingSemicolonAfterCharacterReference,
    /// "absence-of-digits-in-numeric-character-reference"
    AbsenceOfDigitsInNumericCharacterReference,
    /// "null-character-reference"
    NullCharacterReference,
    /// "character-reference-outside-unicode-range"
    CharacterReferenceOutsideUnicodeRange,
    /// "surrogate-character-reference"
    SurrogateCharacterReference,
    /// A DOCTYPE token outside the initial insertion mode.
    UnexpectedDoctype,
    /// The first token was not a DOCTYPE.
    MissingDoctype,
    /// A start tag the current insertion mode ignores or recovers from.
    UnexpectedStartTag,
    /// An end tag with no matching open element, or one the mode ignores.
    UnexpectedEndTag,
    /// Non-whitespace text directly inside table structure.
    UnexpectedTextInTable,
    /// A formatting element closed out of order.
    MisnestedFormattingElement,
    /// End of input with elements other than html/body still open.
    EofWithOpenElements,
}

/// A recorded parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Byte offset into the input where the tokenizer was when it was detected.
    pub offset: usize,
}
