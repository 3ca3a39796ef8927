//! Markdown parsing using pulldown-cmark
//!
//! Builds the renderer's syntax tree from pulldown-cmark events, then layers
//! the chat extensions (mentions, custom emoji, spoilers, bare URLs) on top
//! of the text runs.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use super::elements::{Node, NodeKind};
use super::extensions::{tokenize, Token};
use crate::rich::Attribute;

/// Parse message source into a document node
///
/// Never fails: anything the tree builder does not understand is kept as
/// plain text or a plain container.
pub fn parse(text: &str) -> Node {
    let options = Options::ENABLE_STRIKETHROUGH;
    let mut builder = TreeBuilder::new();

    for (event, range) in Parser::new_ext(text, options).into_offset_iter() {
        let source = text.get(range).unwrap_or("");
        builder.event(event, source);
    }

    builder.finish()
}

struct Frame {
    node: Node,
    /// Opened by a `||` delimiter rather than a markdown tag
    spoiler: bool,
}

struct TreeBuilder {
    stack: Vec<Frame>,
    /// Consecutive text events, tokenized together on flush
    pending: String,
    code: Option<CodeBuffer>,
}

struct CodeBuffer {
    language: Option<String>,
    text: String,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame {
                node: Node::new(NodeKind::Document),
                spoiler: false,
            }],
            pending: String::new(),
            code: None,
        }
    }

    fn event(&mut self, event: Event<'_>, source: &str) {
        if let Some(code) = self.code.as_mut() {
            match event {
                Event::Text(text) => code.text.push_str(&text),
                Event::End(TagEnd::CodeBlock) => self.close_code_block(),
                _ => {}
            }
            return;
        }

        match event {
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                self.pending.push_str(&text);
            }
            Event::Code(code) => {
                self.flush_text();
                let node = Node::inline(Attribute::MONOSPACE, vec![Node::text(code.to_string())]);
                self.push_child(node);
            }
            Event::SoftBreak => {
                self.flush_text();
                self.mark_break(false);
            }
            Event::HardBreak => {
                self.flush_text();
                self.mark_break(true);
            }
            Event::Rule => {
                self.flush_text();
                self.push_child(Node::new(NodeKind::ThematicBreak));
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                self.flush_text();
                let language = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                };
                self.code = Some(CodeBuffer {
                    language,
                    text: String::new(),
                });
            }
            Event::Start(tag) => {
                self.flush_text();
                let kind = container_kind(tag, source);
                self.stack.push(Frame {
                    node: Node::new(kind),
                    spoiler: false,
                });
            }
            Event::End(_) => {
                self.flush_text();
                self.unwrap_open_spoilers();
                self.close_frame();
            }
            // Footnotes, task markers and math are not enabled
            _ => {}
        }
    }

    fn finish(mut self) -> Node {
        self.flush_text();
        while self.stack.len() > 1 {
            self.unwrap_open_spoilers();
            if self.stack.len() > 1 {
                self.close_frame();
            }
        }
        self.stack
            .pop()
            .map(|frame| frame.node)
            .unwrap_or_else(|| Node::document(Vec::new()))
    }

    fn push_child(&mut self, node: Node) {
        if let Some(frame) = self.stack.last_mut() {
            frame.node.children.push(node);
        }
    }

    /// Pop the top frame and attach it to its parent
    fn close_frame(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        if let Some(frame) = self.stack.pop() {
            self.push_child(frame.node);
        }
    }

    /// Spoilers still open when their container ends were never closed:
    /// put the `||` back as text and hoist the children
    fn unwrap_open_spoilers(&mut self) {
        while self.stack.last().is_some_and(|frame| frame.spoiler) {
            let Some(frame) = self.stack.pop() else {
                break;
            };
            self.push_child(Node::text("||"));
            for child in frame.node.children {
                self.push_child(child);
            }
        }
    }

    fn close_code_block(&mut self) {
        let Some(code) = self.code.take() else {
            return;
        };
        let body = code.text.strip_suffix('\n').unwrap_or(&code.text);
        let lines = if body.is_empty() {
            Vec::new()
        } else {
            body.split('\n').map(str::to_string).collect()
        };
        self.push_child(Node::new(NodeKind::CodeBlock {
            language: code.language,
            lines,
        }));
    }

    fn mark_break(&mut self, hard: bool) {
        let Some(frame) = self.stack.last_mut() else {
            return;
        };

        if let Some(Node {
            kind:
                NodeKind::Text {
                    soft_break,
                    hard_break,
                    ..
                },
            ..
        }) = frame.node.children.last_mut()
        {
            if !*soft_break && !*hard_break {
                if hard {
                    *hard_break = true;
                } else {
                    *soft_break = true;
                }
                return;
            }
        }

        frame.node.children.push(Node::new(NodeKind::Text {
            text: String::new(),
            soft_break: !hard,
            hard_break: hard,
        }));
    }

    fn flush_text(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending);
        // A link label is never linked again
        let in_link = self
            .stack
            .iter()
            .any(|frame| matches!(frame.node.kind, NodeKind::Link { .. }));

        for token in tokenize(&text) {
            match token {
                Token::Text(run) => self.push_child(Node::text(run)),
                Token::Mention(mention) => self.push_child(Node::new(NodeKind::Mention(mention))),
                Token::Emoji(emoji) => self.push_child(Node::new(NodeKind::Emoji(emoji))),
                Token::Url(url) if in_link => self.push_child(Node::text(url)),
                Token::Url(url) => self.push_child(Node::new(NodeKind::Autolink {
                    url: url.to_string(),
                })),
                Token::Spoiler => self.toggle_spoiler(),
            }
        }
    }

    fn toggle_spoiler(&mut self) {
        if self.stack.last().is_some_and(|frame| frame.spoiler) {
            self.close_frame();
        } else {
            self.stack.push(Frame {
                node: Node::new(NodeKind::Inline(Attribute::SPOILER)),
                spoiler: true,
            });
        }
    }
}

fn container_kind(tag: Tag<'_>, source: &str) -> NodeKind {
    match tag {
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::Heading { level, .. } => NodeKind::Heading { level: level as u8 },
        Tag::BlockQuote(_) => NodeKind::Blockquote,
        Tag::List(start) => NodeKind::List { start },
        Tag::Item => NodeKind::ListItem,
        Tag::Emphasis => NodeKind::Inline(Attribute::ITALIC),
        // `__text__` is underline in chat markdown, `**text**` is bold
        Tag::Strong if source.starts_with("__") => NodeKind::Inline(Attribute::UNDERLINE),
        Tag::Strong => NodeKind::Inline(Attribute::BOLD),
        Tag::Strikethrough => NodeKind::Inline(Attribute::STRIKETHROUGH),
        Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. } => NodeKind::Link {
            url: dest_url.to_string(),
        },
        _ => NodeKind::Paragraph,
    }
}
