//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)

mod core;
mod elements;
mod foreign;
mod formatting;
mod in_body;
mod in_table;
mod modes;

pub use self::core::{InsertionMode, TreeBuilder};
