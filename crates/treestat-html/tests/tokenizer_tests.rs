//! Integration tests for the HTML tokenizer.

use treestat_dom::Attribute;
use treestat_html::{ParseErrorKind, Token, Tokenizer, TokenizerState};

/// Helper to collect every token up to and including end-of-file.
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token();
        let done = token == Token::EndOfFile;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

/// Helper to concatenate the character tokens.
fn text_of(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|token| match token {
            Token::Character { data } => Some(*data),
            _ => None,
        })
        .collect()
}

fn attr(name: &str, value: &str) -> Attribute {
    Attribute {
        name: name.to_string(),
        value: value.to_string(),
    }
}

#[test]
fn test_start_tag_with_attributes() {
    let tokens = tokenize(r#"<a href="x" id=y>"#);
    assert_eq!(
        tokens[0],
        Token::StartTag {
            name: "a".to_string(),
            self_closing: false,
            attributes: vec![attr("href", "x"), attr("id", "y")],
        }
    );
    assert_eq!(tokens[1], Token::EndOfFile);
}

#[test]
fn test_names_are_lowercased() {
    let tokens = tokenize("<DIV CLASS=Main></DIV>");
    assert_eq!(
        tokens[0],
        Token::StartTag {
            name: "div".to_string(),
            self_closing: false,
            attributes: vec![attr("class", "Main")],
        }
    );
    assert_eq!(
        tokens[1],
        Token::EndTag {
            name: "div".to_string()
        }
    );
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    assert!(matches!(
        &tokens[0],
        Token::StartTag { name, self_closing: true, .. } if name == "br"
    ));
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- note -->");
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: " note ".to_string()
        }
    );
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE HTML>");
    assert_eq!(
        tokens[0],
        Token::Doctype {
            name: Some("html".to_string()),
            public_identifier: None,
            system_identifier: None,
            force_quirks: false,
        }
    );
}

#[test]
fn test_character_references() {
    let tokens = tokenize("&amp;&lt;&#x41;&#66;");
    assert_eq!(text_of(&tokens), "&<AB");
}

#[test]
fn test_unknown_reference_is_literal() {
    let tokens = tokenize("a &zzz; b");
    assert_eq!(text_of(&tokens), "a &zzz; b");
}

#[test]
fn test_reference_in_attribute_value() {
    let tokens = tokenize(r#"<a title="x&amp;y">"#);
    assert!(matches!(
        &tokens[0],
        Token::StartTag { attributes, .. } if attributes == &vec![attr("title", "x&y")]
    ));
}

#[test]
fn test_newlines_are_normalized() {
    let tokens = tokenize("a\r\nb\rc");
    assert_eq!(text_of(&tokens), "a\nb\nc");
}

#[test]
fn test_duplicate_attribute_is_dropped() {
    let mut tokenizer = Tokenizer::new("<p x=1 x=2>");
    let token = tokenizer.next_token();
    assert_eq!(
        token,
        Token::StartTag {
            name: "p".to_string(),
            self_closing: false,
            attributes: vec![attr("x", "1")],
        }
    );
    assert!(
        tokenizer
            .errors()
            .iter()
            .any(|e| e.kind == ParseErrorKind::DuplicateAttribute)
    );
}

#[test]
fn test_end_of_file_repeats() {
    let mut tokenizer = Tokenizer::new("x");
    assert_eq!(tokenizer.next_token(), Token::Character { data: 'x' });
    assert_eq!(tokenizer.next_token(), Token::EndOfFile);
    assert_eq!(tokenizer.next_token(), Token::EndOfFile);
}

#[test]
fn test_cdata_outside_foreign_content_is_bogus_comment() {
    let mut tokenizer = Tokenizer::new("<![CDATA[x]]>");
    assert_eq!(
        tokenizer.next_token(),
        Token::Comment {
            data: "[CDATA[x]]".to_string()
        }
    );
    assert_eq!(tokenizer.errors()[0].kind, ParseErrorKind::CdataInHtmlContent);
}

#[test]
fn test_cdata_section_when_allowed() {
    let mut tokenizer = Tokenizer::new("<![CDATA[a<b]]>");
    tokenizer.set_allow_cdata(true);
    assert_eq!(
        tokenizer.next_token(),
        Token::CData {
            data: "a<b".to_string()
        }
    );
    assert!(tokenizer.errors().is_empty());
}

#[test]
fn test_rawtext_state_ignores_markup() {
    let mut tokenizer = Tokenizer::new("<style>a<b></style>");
    assert!(matches!(
        tokenizer.next_token(),
        Token::StartTag { name, .. } if name == "style"
    ));
    tokenizer.set_state(TokenizerState::RAWTEXT);

    let mut text = String::new();
    loop {
        match tokenizer.next_token() {
            Token::Character { data } => text.push(data),
            Token::EndTag { name } => {
                assert_eq!(name, "style");
                break;
            }
            other => panic!("unexpected token {other:?}"),
        }
    }
    assert_eq!(text, "a<b>");
}

#[test]
fn test_error_cap() {
    let mut tokenizer = Tokenizer::new("<p a=1 a=2 a=3 a=4>").with_max_errors(Some(2));
    let _ = tokenizer.next_token();
    assert_eq!(tokenizer.errors().len(), 2);
}

#[test]
fn test_error_offsets_point_into_input() {
    let input = "ab</>cd";
    let mut tokenizer = Tokenizer::new(input);
    while tokenizer.next_token() != Token::EndOfFile {}
    let error = tokenizer.errors()[0];
    assert_eq!(error.kind, ParseErrorKind::MissingEndTagName);
    assert!(error.offset <= input.len());
}
