//! Segment types attached to rendered content

use serde::{Deserialize, Serialize};

use super::attribute::Attribute;
use crate::model::{GuildId, MessageId};

/// RGBA color packed as 0xRRGGBBAA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgba(pub u32);

impl Rgba {
    /// Opaque color from a 0xRRGGBB value
    pub const fn from_rgb(rgb: u32) -> Self {
        Self(((rgb & 0x00ff_ffff) << 8) | 0xff)
    }

    pub const fn rgb(self) -> u32 {
        self.0 >> 8
    }

    pub const fn alpha(self) -> u8 {
        (self.0 & 0xff) as u8
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

/// Inline image anchor (custom emoji, embed images, image attachments)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAnchor {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt_text: String,
}

/// Round avatar anchor (embed author/footer icons, user mentions)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarAnchor {
    pub url: String,
    pub size: u32,
    pub alt_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionKind {
    User,
    Role,
    Channel,
}

/// Display data resolved from the chat store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionData {
    pub name: String,
    #[serde(default)]
    pub color: Option<Rgba>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Clickable mention; `resolved` is None when the store had no data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub kind: MentionKind,
    pub id: u64,
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    #[serde(default)]
    pub resolved: Option<MentionData>,
}

/// Capability carried by a segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SegmentKind {
    Attribute { attributes: Attribute },
    Link { url: String },
    QuoteBlock,
    CodeBlock { language: Option<String> },
    Color { color: Rgba },
    Image(ImageAnchor),
    Avatar(AvatarAnchor),
    Mention(Mention),
    MessageReference { message_id: MessageId },
}

impl SegmentKind {
    /// Anchor kinds attach to a point and never span text
    pub fn is_anchor(&self) -> bool {
        matches!(self, SegmentKind::Image(_) | SegmentKind::Avatar(_))
    }
}

/// A byte range of rendered content tagged with one capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    #[serde(flatten)]
    pub kind: SegmentKind,
}

impl Segment {
    pub fn new(start: usize, end: usize, kind: SegmentKind) -> Self {
        Self { start, end, kind }
    }

    /// Zero-width segment at `offset`
    pub fn anchor(offset: usize, kind: SegmentKind) -> Self {
        Self::new(offset, offset, kind)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}
