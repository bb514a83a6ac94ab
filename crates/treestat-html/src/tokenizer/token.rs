use treestat_dom::Attribute;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "The output of the tokenization step is a series of zero or more of the following
/// tokens: DOCTYPE, start tag, end tag, comment, character, end-of-file."
///
/// CDATA sections are delivered as a single token rather than a run of
/// character tokens so the tree builder can keep them apart from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// "DOCTYPE tokens have a name, a public identifier, a system identifier,
    /// and a force-quirks flag. When a DOCTYPE token is created, its name,
    /// public identifier, and system identifier must be marked as missing
    /// (which is a distinct state from the empty string)..."
    Doctype {
        /// "a name"
        name: Option<String>,
        /// "a public identifier"
        public_identifier: Option<String>,
        /// "a system identifier"
        system_identifier: Option<String>,
        /// "a force-quirks flag"
        force_quirks: bool,
    },

    /// "Start and end tag tokens have a tag name, a self-closing flag, and a
    /// list of attributes, each of which has a name and a value."
    StartTag {
        /// "a tag name"
        name: String,
        /// "a self-closing flag"
        self_closing: bool,
        /// "a list of attributes"
        attributes: Vec<Attribute>,
    },

    /// End tag token. Attributes are parsed and then dropped.
    EndTag {
        /// "a tag name"
        name: String,
    },

    /// "Comment and character tokens have data."
    Comment {
        /// "data"
        data: String,
    },

    /// "Comment and character tokens have data."
    Character {
        /// "data"
        data: char,
    },

    /// The body of a `<![CDATA[ ... ]]>` section.
    CData {
        /// Section contents without the delimiters.
        data: String,
    },

    /// "end-of-file"
    EndOfFile,
}

impl Token {
    /// A start tag with no attributes, as the tree builder synthesizes them.
    #[must_use]
    pub fn start_tag(name: &str) -> Self {
        Self::StartTag {
            name: name.to_string(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// Tag name of a start or end tag.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name } => Some(name),
            _ => None,
        }
    }

    /// Whether this is a start tag named any of `names`.
    #[must_use]
    pub fn is_start_tag_one_of(&self, names: &[&str]) -> bool {
        matches!(self, Self::StartTag { name, .. } if names.contains(&name.as_str()))
    }

    /// Whether this is an end tag named any of `names`.
    #[must_use]
    pub fn is_end_tag_one_of(&self, names: &[&str]) -> bool {
        matches!(self, Self::EndTag { name } if names.contains(&name.as_str()))
    }

    /// "U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF), U+000C FORM FEED (FF),
    /// U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
    #[must_use]
    pub const fn is_whitespace_character(&self) -> bool {
        matches!(
            self,
            Self::Character {
                data: '\t' | '\n' | '\x0C' | '\r' | ' '
            }
        )
    }
}
