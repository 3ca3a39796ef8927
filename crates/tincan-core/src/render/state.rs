//! Per-render state shared by all handlers
//!
//! A `RenderState` lives for one render call. Nested states (embed
//! descriptions) borrow the parent's buffer, write into it, and hand back
//! only their segments; they never truncate or finalize the buffer.

use std::collections::HashSet;

use super::block;
use super::buffer::Buffer;
use super::inline::InlineState;
use super::links::LinkStack;
use super::registry::{Registry, Visit, WalkStatus};
use crate::config::RenderConfig;
use crate::markdown::{self, Node};
use crate::model::{ChatStore, FetchRequest, Message};
use crate::rich::{Attribute, Segment, SegmentKind};

/// Optional context for handlers that resolve mentions
#[derive(Clone, Copy, Default)]
pub struct RenderContext<'a> {
    /// The message being rendered, for guild scoping and its mention list
    pub message: Option<&'a Message>,
    pub store: Option<&'a dyn ChatStore>,
}

impl<'a> RenderContext<'a> {
    pub fn new(message: Option<&'a Message>, store: Option<&'a dyn ChatStore>) -> Self {
        Self { message, store }
    }

    pub fn for_message(message: &'a Message, store: &'a dyn ChatStore) -> Self {
        Self::new(Some(message), Some(store))
    }

    pub fn guild_id(&self) -> Option<crate::model::GuildId> {
        self.message.and_then(|m| m.guild_id)
    }
}

struct QuoteFrame {
    start: usize,
    prefix_restore: usize,
}

struct ListFrame {
    /// Next number of an ordered list
    next: Option<u64>,
}

pub struct RenderState<'a> {
    buf: &'a mut Buffer,
    requested: &'a mut HashSet<FetchRequest>,
    segments: Vec<Segment>,
    inline: InlineState,
    links: LinkStack,
    quotes: Vec<QuoteFrame>,
    lists: Vec<ListFrame>,
    registry: &'a Registry,
    config: &'a RenderConfig,
    ctx: RenderContext<'a>,
    depth: usize,
    emoji_size: u32,
}

impl<'a> RenderState<'a> {
    pub(crate) fn new(
        buf: &'a mut Buffer,
        requested: &'a mut HashSet<FetchRequest>,
        registry: &'a Registry,
        config: &'a RenderConfig,
        ctx: RenderContext<'a>,
    ) -> Self {
        let offset = buf.len();
        Self {
            buf,
            requested,
            segments: Vec::new(),
            inline: InlineState::new(offset),
            links: LinkStack::new(),
            quotes: Vec::new(),
            lists: Vec::new(),
            registry,
            config,
            ctx,
            depth: 0,
            emoji_size: config.emoji_size,
        }
    }

    pub fn config(&self) -> &'a RenderConfig {
        self.config
    }

    pub fn ctx(&self) -> RenderContext<'a> {
        self.ctx
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Size of custom emoji in the document being rendered
    pub fn emoji_size(&self) -> u32 {
        self.emoji_size
    }

    pub fn content(&self) -> &str {
        self.buf.as_str()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Offset where the next written text will start
    pub fn cursor(&mut self) -> usize {
        self.flush_prefix();
        self.buf.len()
    }

    pub fn write(&mut self, text: &str) -> (usize, usize) {
        let mut range = None;
        for piece in text.split_inclusive('\n') {
            if piece != "\n" {
                self.flush_prefix();
            }
            let (start, end) = self.buf.write(piece);
            range.get_or_insert((start, end)).1 = end;
        }
        range.unwrap_or_else(|| {
            let end = self.buf.len();
            (end, end)
        })
    }

    /// Write `text` without quote markers, for verbatim blocks
    pub fn write_verbatim(&mut self, text: &str) -> (usize, usize) {
        self.buf.write_raw(text)
    }

    /// Write a pending quote marker outside of the open attribute run
    fn flush_prefix(&mut self) {
        if !self.buf.prefix_pending() {
            return;
        }
        let offset = self.buf.len();
        if let Some(segment) = self.inline.split(offset) {
            self.push_attribute(segment);
        }
        let offset = self.buf.cursor();
        self.inline.reset(offset);
    }

    pub fn in_link(&self) -> bool {
        self.links.depth() > 0
    }

    pub fn ensure_break(&mut self) {
        block::ensure_break(self.buf);
    }

    pub fn start_block(&mut self) {
        block::start_block(self.buf);
    }

    /// Spacing after a block that has a following sibling
    ///
    /// Top-level blocks are separated by a blank line, nested ones by a
    /// line break.
    pub fn separate(&mut self, visit: &Visit<'_>) {
        if visit.next_sibling.is_none() {
            return;
        }
        match visit.parent.map(Node::tag) {
            Some(markdown::NodeTag::Document) | None => self.start_block(),
            Some(_) => self.ensure_break(),
        }
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn emit(&mut self, start: usize, end: usize, kind: SegmentKind) {
        self.push(Segment::new(start, end, kind));
    }

    /// Zero-width segment at the cursor
    pub fn anchor(&mut self, kind: SegmentKind) {
        let offset = self.cursor();
        self.push(Segment::anchor(offset, kind));
    }

    pub fn enter_attribute(&mut self, attribute: Attribute) {
        let offset = self.cursor();
        if let Some(segment) = self.inline.enter(attribute, offset) {
            self.push_attribute(segment);
        }
    }

    pub fn exit_attribute(&mut self, attribute: Attribute) {
        let offset = self.buf.len();
        if let Some(segment) = self.inline.exit(attribute, offset) {
            self.push_attribute(segment);
        }
    }

    /// Write `text` with `attribute` applied on top of the active attributes
    pub fn write_with(&mut self, attribute: Attribute, text: &str) -> (usize, usize) {
        self.enter_attribute(attribute);
        let range = self.write(text);
        self.exit_attribute(attribute);
        range
    }

    /// Adjacent runs with equal attributes are merged into one segment
    fn push_attribute(&mut self, segment: Segment) {
        if let Some(last) = self.segments.last_mut() {
            if last.kind == segment.kind && last.end == segment.start {
                last.end = segment.end;
                return;
            }
        }
        self.push(segment);
    }

    pub fn open_link(&mut self) {
        let offset = self.cursor();
        self.links.push(offset);
    }

    pub fn close_link(&mut self, url: &str) {
        let Some(start) = self.links.pop() else {
            tracing::debug!(url, "Link closed with no open link");
            return;
        };
        let end = self.buf.len();
        if start < end {
            self.emit(
                start,
                end,
                SegmentKind::Link {
                    url: url.to_string(),
                },
            );
        }
    }

    pub(crate) fn open_quote(&mut self) {
        self.start_block();
        let start = self.buf.len();
        let prefix_restore = self.buf.push_prefix(&self.config.quote_prefix);
        self.quotes.push(QuoteFrame {
            start,
            prefix_restore,
        });
    }

    /// Close the innermost quote; trailing whitespace is left out of the
    /// segment, but never so far that an anchor inside the quote falls out
    pub(crate) fn close_quote(&mut self) {
        let Some(frame) = self.quotes.pop() else {
            return;
        };
        self.buf.pop_prefix(frame.prefix_restore);

        let bytes = self.buf.as_str().as_bytes();
        let mut end = bytes.len();
        while end > frame.start && bytes[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
        let last_anchor = self
            .segments
            .iter()
            .filter(|s| s.kind.is_anchor() && s.start >= frame.start)
            .map(|s| s.start)
            .max();
        if let Some(anchor) = last_anchor {
            end = end.max(anchor);
        }

        if end > frame.start {
            self.emit(frame.start, end, SegmentKind::QuoteBlock);
        }
    }

    pub(crate) fn open_list(&mut self, start: Option<u64>) {
        self.lists.push(ListFrame { next: start });
    }

    pub(crate) fn close_list(&mut self) {
        self.lists.pop();
    }

    pub(crate) fn list_depth(&self) -> usize {
        self.lists.len()
    }

    /// Marker for the next item of the innermost list, indented by depth
    pub(crate) fn next_list_marker(&mut self) -> String {
        let indent = "  ".repeat(self.lists.len().saturating_sub(1));
        match self.lists.last_mut() {
            Some(ListFrame { next: Some(n) }) => {
                let marker = format!("{}{}. ", indent, n);
                *n += 1;
                marker
            }
            _ => format!("{}• ", indent),
        }
    }

    /// Queue a fetch for missing data, at most once per entity per render
    pub fn request(&mut self, request: FetchRequest) {
        let Some(store) = self.ctx.store else {
            return;
        };
        if self.requested.insert(request) {
            tracing::debug!(?request, "Requesting missing mention data");
            store.request(request);
        }
    }

    /// Render a whole document node
    pub fn render_document(&mut self, node: &Node) {
        if let Some(count) = node.emoji_only_count() {
            if count > 0 && count <= self.config.large_emoji_limit {
                self.emoji_size = self.config.large_emoji_size;
            }
        }
        self.walk(node);
    }

    /// Parse and render markdown with a nested state sharing this buffer
    ///
    /// Past the configured depth the source is written as plain text.
    pub fn render_nested(&mut self, source: &str) {
        if self.depth + 1 >= self.config.max_depth {
            tracing::debug!(depth = self.depth, "Render depth cap reached, writing plain text");
            self.write(source);
            return;
        }

        let document = markdown::parse(source);

        // Close our open run so the child's text is not covered by it
        let offset = self.cursor();
        if let Some(segment) = self.inline.split(offset) {
            self.push_attribute(segment);
        }

        let segments = {
            let mut child = self.child();
            child.walk(&document);
            child.finish()
        };
        self.segments.extend(segments);

        let offset = self.buf.len();
        self.inline.reset(offset);
    }

    fn child(&mut self) -> RenderState<'_> {
        let offset = self.buf.len();
        RenderState {
            buf: &mut *self.buf,
            requested: &mut *self.requested,
            segments: Vec::new(),
            inline: InlineState::new(offset),
            links: LinkStack::new(),
            quotes: Vec::new(),
            lists: Vec::new(),
            registry: self.registry,
            config: self.config,
            ctx: self.ctx,
            depth: self.depth + 1,
            emoji_size: self.config.emoji_size,
        }
    }

    /// Depth-first walk with enter and exit visits
    pub(crate) fn walk(&mut self, root: &Node) {
        enum Phase {
            Enter,
            Exit,
        }

        let registry = self.registry;
        let mut stack = vec![(root, None, None, Phase::Enter)];

        while let Some((node, parent, next_sibling, phase)) = stack.pop() {
            let entering = matches!(phase, Phase::Enter);
            let visit = Visit {
                node,
                entering,
                parent,
                next_sibling,
            };
            let status = registry.dispatch(self, &visit);

            if entering {
                stack.push((node, parent, next_sibling, Phase::Exit));
                if status == WalkStatus::Continue {
                    for (i, child) in node.children.iter().enumerate().rev() {
                        stack.push((child, Some(node), node.children.get(i + 1), Phase::Enter));
                    }
                }
            }
        }
    }

    /// Close anything left open and return the segments
    pub(crate) fn finish(mut self) -> Vec<Segment> {
        let offset = self.buf.len();
        if let Some(segment) = self.inline.finish(offset) {
            self.push_attribute(segment);
        }
        while !self.quotes.is_empty() {
            self.close_quote();
        }
        if self.links.depth() > 0 {
            tracing::debug!(open = self.links.depth(), "Dropping unclosed links");
        }
        self.segments
    }
}
