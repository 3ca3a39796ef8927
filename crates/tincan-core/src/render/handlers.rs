//! Built-in node handlers
//!
//! Every handler is called twice per node, once entering and once exiting.
//! Block handlers only add spacing when a sibling follows them, so the
//! rendered content never ends with padding.

use super::mention;
use super::registry::{Visit, WalkStatus};
use super::state::RenderState;
use crate::cdn;
use crate::markdown::NodeKind;
use crate::rich::{Attribute, ImageAnchor, SegmentKind};

/// Handler for node kinds without a registered handler
///
/// Plain containers render their children, text is copied with its breaks,
/// and any other leaf is written in its source form.
pub fn fallback(state: &mut RenderState<'_>, visit: &Visit<'_>) -> WalkStatus {
    match &visit.node.kind {
        NodeKind::Document => WalkStatus::Continue,
        NodeKind::Paragraph => paragraph(state, visit),
        NodeKind::Text { .. } => text(state, visit),
        kind => match kind.source_form() {
            Some(source) => {
                if visit.entering {
                    state.write(&source);
                }
                WalkStatus::SkipChildren
            }
            None => WalkStatus::Continue,
        },
    }
}

pub fn document(_state: &mut RenderState<'_>, _visit: &Visit<'_>) -> WalkStatus {
    WalkStatus::Continue
}

pub fn paragraph(state: &mut RenderState<'_>, visit: &Visit<'_>) -> WalkStatus {
    if !visit.entering {
        state.separate(visit);
    }
    WalkStatus::Continue
}

pub fn text(state: &mut RenderState<'_>, visit: &Visit<'_>) -> WalkStatus {
    if !visit.entering {
        return WalkStatus::Continue;
    }
    if let NodeKind::Text {
        text,
        soft_break,
        hard_break,
    } = &visit.node.kind
    {
        state.write(text);
        if *hard_break {
            state.write("\n\n");
        } else if *soft_break {
            state.write("\n");
        }
    }
    WalkStatus::Continue
}

pub fn heading(state: &mut RenderState<'_>, visit: &Visit<'_>) -> WalkStatus {
    if visit.entering {
        state.enter_attribute(Attribute::BOLD);
    } else {
        state.exit_attribute(Attribute::BOLD);
        state.separate(visit);
    }
    WalkStatus::Continue
}

pub fn inline(state: &mut RenderState<'_>, visit: &Visit<'_>) -> WalkStatus {
    if let NodeKind::Inline(attribute) = visit.node.kind {
        if visit.entering {
            state.enter_attribute(attribute);
        } else {
            state.exit_attribute(attribute);
        }
    }
    WalkStatus::Continue
}

pub fn link(state: &mut RenderState<'_>, visit: &Visit<'_>) -> WalkStatus {
    if let NodeKind::Link { url } = &visit.node.kind {
        if visit.entering {
            state.open_link();
        } else {
            state.close_link(url);
        }
    }
    WalkStatus::Continue
}

pub fn autolink(state: &mut RenderState<'_>, visit: &Visit<'_>) -> WalkStatus {
    if let (true, NodeKind::Autolink { url }) = (visit.entering, &visit.node.kind) {
        let (start, end) = state.write(url);
        // Inside a link the enclosing destination wins
        if !state.in_link() {
            state.emit(start, end, SegmentKind::Link { url: url.clone() });
        }
    }
    WalkStatus::SkipChildren
}

pub fn blockquote(state: &mut RenderState<'_>, visit: &Visit<'_>) -> WalkStatus {
    if visit.entering {
        state.open_quote();
    } else {
        state.close_quote();
        state.separate(visit);
    }
    WalkStatus::Continue
}

pub fn code_block(state: &mut RenderState<'_>, visit: &Visit<'_>) -> WalkStatus {
    let NodeKind::CodeBlock { language, lines } = &visit.node.kind else {
        return WalkStatus::SkipChildren;
    };
    if visit.entering {
        state.start_block();
        let start = state.cursor();
        let (_, end) = state.write_verbatim(&lines.join("\n"));
        if start < end {
            state.emit(
                start,
                end,
                SegmentKind::CodeBlock {
                    language: language.clone(),
                },
            );
        }
    } else {
        state.separate(visit);
    }
    WalkStatus::SkipChildren
}

pub fn list(state: &mut RenderState<'_>, visit: &Visit<'_>) -> WalkStatus {
    let NodeKind::List { start } = visit.node.kind else {
        return WalkStatus::Continue;
    };
    if visit.entering {
        if state.list_depth() > 0 {
            state.ensure_break();
        } else {
            state.start_block();
        }
        state.open_list(start);
    } else {
        state.close_list();
        state.separate(visit);
    }
    WalkStatus::Continue
}

pub fn list_item(state: &mut RenderState<'_>, visit: &Visit<'_>) -> WalkStatus {
    if visit.entering {
        state.ensure_break();
        let marker = state.next_list_marker();
        state.write(&marker);
    }
    WalkStatus::Continue
}

pub fn thematic_break(state: &mut RenderState<'_>, visit: &Visit<'_>) -> WalkStatus {
    if visit.entering {
        state.start_block();
        state.write("───");
    } else {
        state.separate(visit);
    }
    WalkStatus::SkipChildren
}

pub fn mention(state: &mut RenderState<'_>, visit: &Visit<'_>) -> WalkStatus {
    if let (true, NodeKind::Mention(reference)) = (visit.entering, &visit.node.kind) {
        mention::render(state, *reference);
    }
    WalkStatus::SkipChildren
}

pub fn emoji(state: &mut RenderState<'_>, visit: &Visit<'_>) -> WalkStatus {
    if let (true, NodeKind::Emoji(emoji)) = (visit.entering, &visit.node.kind) {
        let size = state.emoji_size();
        let url = cdn::emoji_url(&state.config().cdn_base, emoji.id, emoji.animated, size);
        state.anchor(SegmentKind::Image(ImageAnchor {
            url,
            width: size,
            height: size,
            alt_text: format!(":{}:", emoji.name),
        }));
    }
    WalkStatus::SkipChildren
}
