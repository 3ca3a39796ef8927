//! Reply header shown above a message that replies to another one

use super::mention;
use super::state::{RenderContext, RenderState};
use super::Renderer;
use crate::markdown::{self, Node, NodeKind};
use crate::model::{ChatStore, Message};
use crate::rich::{Attribute, RichText, SegmentKind};

const REPLY_MARKER: &str = "↪ ";

impl Renderer<'_> {
    /// Render `"↪ @author: first line"` for the message `message` replies to
    ///
    /// `referenced` is None when the replied-to message is not loaded or was
    /// deleted. The whole header is covered by a message reference segment.
    pub fn render_reply(
        &self,
        message: &Message,
        referenced: Option<&Message>,
        store: Option<&dyn ChatStore>,
    ) -> RichText {
        let ctx = RenderContext::new(referenced.or(Some(message)), store);
        self.compose(ctx, |state| {
            state.write(REPLY_MARKER);
            match referenced {
                Some(referenced) => {
                    mention::render_user(state, referenced.author.id, Some(&referenced.author));
                    state.write(": ");
                    write_excerpt(state, referenced);
                }
                None => {
                    state.write_with(Attribute::ITALIC, "Original message was deleted");
                }
            }

            let target = referenced.map(|m| m.id).or(message.reference);
            if let Some(message_id) = target {
                let end = state.len();
                state.emit(0, end, SegmentKind::MessageReference { message_id });
            }
        })
    }
}

/// First non-blank line of the content, or a note about attachments
///
/// Code fences are skipped and block markup is dropped so the header stays
/// on one line.
fn write_excerpt(state: &mut RenderState<'_>, message: &Message) {
    let line = message
        .content
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with("```") && !l.starts_with("~~~"));
    match line {
        Some(line) => {
            let inline = flatten_blocks(markdown::parse(line));
            state.walk(&Node::document(vec![Node::paragraph(inline)]));
        }
        None if !message.attachments.is_empty() || !message.embeds.is_empty() => {
            state.write_with(Attribute::ITALIC, "Click to see attachment");
        }
        None => {}
    }
}

fn flatten_blocks(node: Node) -> Vec<Node> {
    match &node.kind {
        NodeKind::Document
        | NodeKind::Paragraph
        | NodeKind::Heading { .. }
        | NodeKind::Blockquote
        | NodeKind::List { .. }
        | NodeKind::ListItem => node.children.into_iter().flat_map(flatten_blocks).collect(),
        NodeKind::CodeBlock { lines, .. } => vec![Node::text(lines.join(" "))],
        NodeKind::ThematicBreak => Vec::new(),
        _ => vec![node],
    }
}
