//! Rich text renderer
//!
//! Walks a markdown tree and produces a [`RichText`]: the display string plus
//! segments over byte ranges of it. Rendering never fails; anything the
//! renderer cannot resolve is written in its source form.

mod activity;
mod attachment;
mod block;
mod buffer;
mod embed;
pub mod handlers;
mod inline;
mod links;
mod mention;
mod registry;
mod reply;
mod state;
mod tooltip;

use std::collections::HashSet;

pub use attachment::format_size;
use buffer::Buffer;
pub use embed::fit;
pub use registry::{Handler, Registry, Visit, WalkStatus, DEFAULT_REGISTRY};
pub use state::{RenderContext, RenderState};

use crate::config::RenderConfig;
use crate::markdown::{self, Node};
use crate::model::{ChatStore, Message};
use crate::rich::RichText;

/// Entry point for every render call
///
/// Holds only shared, read-only data, so one renderer can serve any number
/// of concurrent renders.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    registry: &'a Registry,
    config: &'a RenderConfig,
}

impl<'a> Renderer<'a> {
    /// Renderer with the built-in handlers
    pub fn new(config: &'a RenderConfig) -> Self {
        Self::with_registry(&DEFAULT_REGISTRY, config)
    }

    pub fn with_registry(registry: &'a Registry, config: &'a RenderConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &'a RenderConfig {
        self.config
    }

    /// Parse and render message markdown
    pub fn render_source(&self, source: &str, ctx: RenderContext<'_>) -> RichText {
        let document = markdown::parse(source);
        self.render_node(&document, ctx)
    }

    /// Render an already parsed tree
    pub fn render_node(&self, node: &Node, ctx: RenderContext<'_>) -> RichText {
        self.compose(ctx, |state| state.render_document(node))
    }

    /// Render a message body followed by its embeds and attachments
    pub fn render_message(&self, message: &Message, store: Option<&dyn ChatStore>) -> RichText {
        let document = markdown::parse(&message.content);
        let ctx = RenderContext::new(Some(message), store);

        self.compose(ctx, |state| {
            state.render_document(&document);
            for embed in &message.embeds {
                state.render_embed(embed);
            }
            state.render_attachments(&message.attachments);
        })
    }

    /// Run `f` against a fresh state and collect the result
    fn compose(&self, ctx: RenderContext<'_>, f: impl FnOnce(&mut RenderState<'_>)) -> RichText {
        let mut buf = Buffer::new();
        let mut requested = HashSet::new();
        let segments = {
            let mut state = RenderState::new(&mut buf, &mut requested, self.registry, self.config, ctx);
            f(&mut state);
            state.finish()
        };
        RichText::new(buf.into_string(), segments)
    }
}
