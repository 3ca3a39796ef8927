//! Chat markdown: syntax tree and parser
//!
//! The renderer only consumes [`Node`] trees; [`parse`] is one way to get
//! them. Anything that can build the tree (a different parser, a test) can
//! feed the renderer directly.

mod elements;
mod extensions;
mod parser;

pub use elements::{CustomEmoji, MentionRef, Node, NodeKind, NodeTag};
pub use parser::parse;
