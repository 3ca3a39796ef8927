//! Presence activity text

use super::state::RenderContext;
use super::Renderer;
use crate::cdn;
use crate::model::{Activity, ActivityKind};
use crate::rich::{Attribute, ImageAnchor, RichText, SegmentKind};

fn verb(kind: ActivityKind) -> Option<&'static str> {
    match kind {
        ActivityKind::Playing => Some("Playing "),
        ActivityKind::Streaming => Some("Streaming "),
        ActivityKind::Listening => Some("Listening to "),
        ActivityKind::Watching => Some("Watching "),
        ActivityKind::Competing => Some("Competing in "),
        ActivityKind::Custom => None,
    }
}

impl Renderer<'_> {
    /// Render an activity as status lines
    ///
    /// Custom statuses show their emoji and state text. Other kinds show a
    /// verb with the bold activity name, then details and state on their own
    /// lines.
    pub fn render_activity(&self, activity: &Activity) -> RichText {
        self.compose(RenderContext::default(), |state| {
            let Some(prefix) = verb(activity.kind) else {
                if let Some(emoji) = &activity.emoji {
                    match emoji.id {
                        Some(id) => {
                            let size = state.config().emoji_size;
                            let url = cdn::emoji_url(&state.config().cdn_base, id, emoji.animated, size);
                            state.anchor(SegmentKind::Image(ImageAnchor {
                                url,
                                width: size,
                                height: size,
                                alt_text: format!(":{}:", emoji.name),
                            }));
                        }
                        None => {
                            state.write(&emoji.name);
                        }
                    }
                    if activity.state.is_some() {
                        state.write(" ");
                    }
                }
                if let Some(text) = &activity.state {
                    state.write(text);
                }
                return;
            };

            state.write(prefix);
            let (start, end) = state.write_with(Attribute::BOLD, &activity.name);
            if let (ActivityKind::Streaming, Some(url)) = (activity.kind, &activity.url) {
                state.emit(start, end, SegmentKind::Link { url: url.clone() });
            }
            for line in [&activity.details, &activity.state].into_iter().flatten() {
                state.ensure_break();
                state.write(line);
            }
        })
    }
}
