//! HTML5 parsing engine for tree statistics.
//!
//! # Scope
//!
//! - **Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, RCDATA, RAWTEXT, script data, PLAINTEXT and CDATA section states
//!   - DOCTYPE, comment, attribute and character reference handling
//!
//! - **Tree builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - Insertion modes from "initial" through the table modes to "after after body"
//!   - Foster parenting, the adoption agency algorithm and reconstruction of
//!     active formatting elements, each recorded on the nodes it touches
//!   - SVG and MathML subtrees
//!
//! - **Allocation routing** ([`alloc`])
//!   - All memory for one parse, and for destroying its result, comes from
//!     the caller's [`Allocator`]
//!
//! # Not Implemented
//!
//! - Fragment parsing, scripting, and the select, template and frameset
//!   insertion modes (their content is parsed with the "in body" rules)

pub mod alloc;
mod error;
/// HTML tree construction.
pub mod parser;
/// HTML tokenizer.
pub mod tokenizer;

use treestat_dom::DomTree;

pub use alloc::{Allocator, RoutingAllocator, SystemAllocator};
pub use error::{ParseError, ParseErrorKind};
pub use parser::{InsertionMode, TreeBuilder};
pub use tokenizer::{Token, Tokenizer, TokenizerState};

use alloc::AllocatorScope;

#[cfg(feature = "global-allocator")]
#[global_allocator]
static GLOBAL: RoutingAllocator = RoutingAllocator;

static SYSTEM: SystemAllocator = SystemAllocator;

/// Options for one parse.
#[derive(Clone, Copy)]
pub struct ParseOptions<'a> {
    /// Memory for the parse and for [`destroy_output`].
    pub allocator: &'a dyn Allocator,
    /// Keep at most this many parse errors; `None` keeps them all.
    pub max_errors: Option<usize>,
}

impl Default for ParseOptions<'_> {
    fn default() -> Self {
        Self {
            allocator: &SYSTEM,
            max_errors: None,
        }
    }
}

impl std::fmt::Debug for ParseOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseOptions")
            .field("max_errors", &self.max_errors)
            .finish_non_exhaustive()
    }
}

/// The result of a parse.
#[derive(Debug)]
pub struct Output {
    /// The document; its root is the Document node.
    pub document: DomTree,
    /// Recoverable errors, in the order they were found.
    pub errors: Vec<ParseError>,
}

/// Parse with default options.
#[must_use]
pub fn parse(input: &str) -> Output {
    parse_with_options(&ParseOptions::default(), input)
}

/// Parse `input`, taking every allocation from `options.allocator`.
///
/// Never fails: malformed markup is repaired and reported in
/// [`Output::errors`].
#[must_use]
pub fn parse_with_options(options: &ParseOptions<'_>, input: &str) -> Output {
    let _scope = AllocatorScope::enter(options.allocator);
    let (document, errors) = TreeBuilder::new(input, options.max_errors).run();
    Output { document, errors }
}

/// Release everything `output` owns through `options.allocator`.
pub fn destroy_output(options: &ParseOptions<'_>, output: Output) {
    let _scope = AllocatorScope::enter(options.allocator);
    drop(output);
}
