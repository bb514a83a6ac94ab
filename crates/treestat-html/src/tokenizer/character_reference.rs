//! Character references.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! The named table is a static slice rather than a lazily built map so that
//! the first lookup never allocates inside a measured parse.

use crate::error::ParseErrorKind;

use super::core::Tokenizer;

/// Entity names (without the leading '&') and their replacement text.
/// Legacy names that may appear without a semicolon are listed twice.
static NAMED_ENTITIES: &[(&str, &str)] = &[
    ("amp;", "&"),
    ("amp", "&"),
    ("lt;", "<"),
    ("lt", "<"),
    ("gt;", ">"),
    ("gt", ">"),
    ("quot;", "\""),
    ("quot", "\""),
    ("apos;", "'"),
    ("nbsp;", "\u{00A0}"),
    ("nbsp", "\u{00A0}"),
    ("copy;", "\u{00A9}"),
    ("copy", "\u{00A9}"),
    ("reg;", "\u{00AE}"),
    ("reg", "\u{00AE}"),
    ("trade;", "\u{2122}"),
    ("mdash;", "\u{2014}"),
    ("ndash;", "\u{2013}"),
    ("hellip;", "\u{2026}"),
    ("bull;", "\u{2022}"),
    ("middot;", "\u{00B7}"),
    ("middot", "\u{00B7}"),
    ("lsquo;", "\u{2018}"),
    ("rsquo;", "\u{2019}"),
    ("ldquo;", "\u{201C}"),
    ("rdquo;", "\u{201D}"),
    ("laquo;", "\u{00AB}"),
    ("laquo", "\u{00AB}"),
    ("raquo;", "\u{00BB}"),
    ("raquo", "\u{00BB}"),
    ("times;", "\u{00D7}"),
    ("times", "\u{00D7}"),
    ("divide;", "\u{00F7}"),
    ("deg;", "\u{00B0}"),
    ("deg", "\u{00B0}"),
    ("plusmn;", "\u{00B1}"),
    ("para;", "\u{00B6}"),
    ("sect;", "\u{00A7}"),
    ("euro;", "\u{20AC}"),
    ("pound;", "\u{00A3}"),
    ("yen;", "\u{00A5}"),
    ("cent;", "\u{00A2}"),
    ("larr;", "\u{2190}"),
    ("rarr;", "\u{2192}"),
    ("uarr;", "\u{2191}"),
    ("darr;", "\u{2193}"),
    ("hearts;", "\u{2665}"),
    ("eacute;", "\u{00E9}"),
    ("eacute", "\u{00E9}"),
    ("egrave;", "\u{00E8}"),
    ("auml;", "\u{00E4}"),
    ("ouml;", "\u{00F6}"),
    ("uuml;", "\u{00FC}"),
    ("szlig;", "\u{00DF}"),
    ("shy;", "\u{00AD}"),
    ("zwj;", "\u{200D}"),
    ("zwnj;", "\u{200C}"),
    ("ensp;", "\u{2002}"),
    ("emsp;", "\u{2003}"),
    ("thinsp;", "\u{2009}"),
];

/// Longest entry of [`NAMED_ENTITIES`] that prefixes `input`.
fn longest_named_match(input: &str) -> Option<(&'static str, &'static str)> {
    NAMED_ENTITIES
        .iter()
        .filter(|(name, _)| input.starts_with(name))
        .max_by_key(|(name, _)| name.len())
        .copied()
}

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
fn numeric_reference_value(code: u32) -> Result<char, ParseErrorKind> {
    match code {
        // "If the number is 0x00, then this is a null-character-reference parse error."
        0 => Err(ParseErrorKind::NullCharacterReference),
        // "If the number is greater than 0x10FFFF..."
        c if c > 0x0010_FFFF => Err(ParseErrorKind::CharacterReferenceOutsideUnicodeRange),
        // "If the number is a surrogate..."
        0xD800..=0xDFFF => Err(ParseErrorKind::SurrogateCharacterReference),
        c => char::from_u32(c).ok_or(ParseErrorKind::CharacterReferenceOutsideUnicodeRange),
    }
}

impl Tokenizer<'_> {
    /// Called with the '&' already consumed. Returns the replacement text, or
    /// `None` when the ampersand should be taken literally. Input is only
    /// consumed when a reference is recognized.
    pub(super) fn consume_character_reference(&mut self, in_attribute: bool) -> Option<String> {
        let input = self.input;
        let rest = &input[self.pos..];
        let first = rest.chars().next()?;

        if first == '#' {
            return self.consume_numeric_character_reference();
        }
        if !first.is_ascii_alphanumeric() {
            return None;
        }

        // [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
        let (name, value) = longest_named_match(rest)?;
        let next = rest[name.len()..].chars().next();
        if !name.ends_with(';') {
            // "If the character reference was consumed as part of an attribute,
            // and the last character matched is not a U+003B SEMICOLON character
            // (;), and the next input character is either a U+003D EQUALS SIGN
            // character (=) or an ASCII alphanumeric, then, for historical
            // reasons, flush code points consumed as a character reference and
            // switch to the return state."
            if in_attribute && next.is_some_and(|c| c == '=' || c.is_ascii_alphanumeric()) {
                return None;
            }
            self.parse_error(ParseErrorKind::MissingSemicolonAfterCharacterReference);
        }
        self.pos += name.len();
        Some(value.to_string())
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    fn consume_numeric_character_reference(&mut self) -> Option<String> {
        let input = self.input;
        let bytes = input.as_bytes();
        let mut cursor = self.pos + 1;

        let hex = matches!(bytes.get(cursor), Some(b'x' | b'X'));
        if hex {
            cursor += 1;
        }
        let radix = if hex { 16 } else { 10 };

        let digits_start = cursor;
        while bytes
            .get(cursor)
            .is_some_and(|b| char::from(*b).is_digit(radix))
        {
            cursor += 1;
        }
        if cursor == digits_start {
            // "This is an absence-of-digits-in-numeric-character-reference parse
            // error. Flush code points consumed as a character reference."
            self.parse_error(ParseErrorKind::AbsenceOfDigitsInNumericCharacterReference);
            return None;
        }

        // Saturate instead of overflowing; anything this large is out of range anyway.
        let code = u32::from_str_radix(&input[digits_start..cursor], radix).unwrap_or(u32::MAX);

        if bytes.get(cursor) == Some(&b';') {
            cursor += 1;
        } else {
            self.parse_error(ParseErrorKind::MissingSemicolonAfterCharacterReference);
        }
        self.pos = cursor;

        let c = numeric_reference_value(code).unwrap_or_else(|kind| {
            self.parse_error(kind);
            '\u{FFFD}'
        });
        Some(c.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_match_prefers_semicolon_form() {
        assert_eq!(longest_named_match("amp;rest"), Some(("amp;", "&")));
        assert_eq!(longest_named_match("ampersand"), Some(("amp", "&")));
        assert_eq!(longest_named_match("zzz"), None);
    }

    #[test]
    fn test_numeric_reference_replacements() {
        assert_eq!(numeric_reference_value(0x41), Ok('A'));
        assert_eq!(
            numeric_reference_value(0),
            Err(ParseErrorKind::NullCharacterReference)
        );
        assert_eq!(
            numeric_reference_value(0xD800),
            Err(ParseErrorKind::SurrogateCharacterReference)
        );
        assert_eq!(
            numeric_reference_value(0x0011_0000),
            Err(ParseErrorKind::CharacterReferenceOutsideUnicodeRange)
        );
    }
}
