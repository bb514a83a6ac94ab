//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)

mod character_reference;
mod core;
mod token;

pub use self::core::{Tokenizer, TokenizerState};
pub use token::Token;
