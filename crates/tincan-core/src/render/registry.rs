//! Node handler registry
//!
//! Maps node tags to handler functions. A registry is built once, then only
//! shared by reference, so concurrent renders can read it freely. Adding a
//! new inline construct means registering a handler, not editing the walk.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::handlers;
use super::state::RenderState;
use crate::markdown::{Node, NodeTag};

/// Registry with every built-in handler
pub static DEFAULT_REGISTRY: Lazy<Registry> = Lazy::new(Registry::builtin);

/// What the walk should do after a handler ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStatus {
    Continue,
    /// Do not visit the children; the exit visit still happens
    SkipChildren,
}

/// One visit of a node during the walk
#[derive(Debug, Clone, Copy)]
pub struct Visit<'n> {
    pub node: &'n Node,
    pub entering: bool,
    pub parent: Option<&'n Node>,
    pub next_sibling: Option<&'n Node>,
}

pub type Handler = fn(&mut RenderState<'_>, &Visit<'_>) -> WalkStatus;

#[derive(Default)]
pub struct Registry {
    handlers: HashMap<NodeTag, Handler>,
}

impl Registry {
    /// Registry with no handlers; every node goes to the fallback
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in handler
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register(NodeTag::Document, handlers::document)
            .register(NodeTag::Paragraph, handlers::paragraph)
            .register(NodeTag::Text, handlers::text)
            .register(NodeTag::Heading, handlers::heading)
            .register(NodeTag::Inline, handlers::inline)
            .register(NodeTag::Link, handlers::link)
            .register(NodeTag::Autolink, handlers::autolink)
            .register(NodeTag::Blockquote, handlers::blockquote)
            .register(NodeTag::CodeBlock, handlers::code_block)
            .register(NodeTag::List, handlers::list)
            .register(NodeTag::ListItem, handlers::list_item)
            .register(NodeTag::ThematicBreak, handlers::thematic_break)
            .register(NodeTag::Mention, handlers::mention)
            .register(NodeTag::Emoji, handlers::emoji);
        registry
    }

    /// Register (or replace) the handler for a tag
    pub fn register(&mut self, tag: NodeTag, handler: Handler) -> &mut Self {
        self.handlers.insert(tag, handler);
        self
    }

    pub fn get(&self, tag: NodeTag) -> Option<Handler> {
        self.handlers.get(&tag).copied()
    }

    pub fn contains(&self, tag: NodeTag) -> bool {
        self.handlers.contains_key(&tag)
    }

    pub fn dispatch(&self, state: &mut RenderState<'_>, visit: &Visit<'_>) -> WalkStatus {
        match self.get(visit.node.tag()) {
            Some(handler) => handler(state, visit),
            None => {
                if visit.entering {
                    tracing::trace!(tag = ?visit.node.tag(), "No handler registered, using fallback");
                }
                handlers::fallback(state, visit)
            }
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<_> = self.handlers.keys().collect();
        tags.sort();
        f.debug_struct("Registry").field("handlers", &tags).finish()
    }
}
