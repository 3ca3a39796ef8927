//! Markdown syntax tree consumed by the renderer

use crate::model::{ChannelId, EmojiId, RoleId, UserId};
use crate::rich::Attribute;

/// Reference to a channel, user or role inside message text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MentionRef {
    Channel(ChannelId),
    User(UserId),
    Role(RoleId),
}

impl MentionRef {
    /// The mention as it is written in message source
    pub fn source_form(&self) -> String {
        match self {
            MentionRef::Channel(id) => format!("<#{}>", id),
            MentionRef::User(id) => format!("<@{}>", id),
            MentionRef::Role(id) => format!("<@&{}>", id),
        }
    }
}

/// Custom guild emoji
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomEmoji {
    pub name: String,
    pub id: EmojiId,
    pub animated: bool,
}

impl CustomEmoji {
    pub fn source_form(&self) -> String {
        let prefix = if self.animated { "a" } else { "" };
        format!("<{}:{}:{}>", prefix, self.name, self.id)
    }
}

/// Node payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Paragraph,
    Heading {
        level: u8,
    },
    /// Text leaf, optionally followed by a line break
    Text {
        text: String,
        soft_break: bool,
        hard_break: bool,
    },
    /// Formatting span (emphasis, strong, underline, strike, spoiler, code)
    Inline(Attribute),
    Link {
        url: String,
    },
    /// Bare URL found in text
    Autolink {
        url: String,
    },
    Blockquote,
    CodeBlock {
        language: Option<String>,
        lines: Vec<String>,
    },
    List {
        /// First number of an ordered list, None for bullets
        start: Option<u64>,
    },
    ListItem,
    ThematicBreak,
    Mention(MentionRef),
    Emoji(CustomEmoji),
}

/// Discriminant of [`NodeKind`], used as the dispatch key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeTag {
    Document,
    Paragraph,
    Heading,
    Text,
    Inline,
    Link,
    Autolink,
    Blockquote,
    CodeBlock,
    List,
    ListItem,
    ThematicBreak,
    Mention,
    Emoji,
}

impl NodeKind {
    pub fn tag(&self) -> NodeTag {
        match self {
            NodeKind::Document => NodeTag::Document,
            NodeKind::Paragraph => NodeTag::Paragraph,
            NodeKind::Heading { .. } => NodeTag::Heading,
            NodeKind::Text { .. } => NodeTag::Text,
            NodeKind::Inline(_) => NodeTag::Inline,
            NodeKind::Link { .. } => NodeTag::Link,
            NodeKind::Autolink { .. } => NodeTag::Autolink,
            NodeKind::Blockquote => NodeTag::Blockquote,
            NodeKind::CodeBlock { .. } => NodeTag::CodeBlock,
            NodeKind::List { .. } => NodeTag::List,
            NodeKind::ListItem => NodeTag::ListItem,
            NodeKind::ThematicBreak => NodeTag::ThematicBreak,
            NodeKind::Mention(_) => NodeTag::Mention,
            NodeKind::Emoji(_) => NodeTag::Emoji,
        }
    }

    /// Literal source text of leaf nodes, None for containers
    pub fn source_form(&self) -> Option<String> {
        match self {
            NodeKind::Text { text, .. } => Some(text.clone()),
            NodeKind::Autolink { url } => Some(url.clone()),
            NodeKind::CodeBlock { lines, .. } => Some(lines.join("\n")),
            NodeKind::ThematicBreak => Some("---".to_string()),
            NodeKind::Mention(mention) => Some(mention.source_form()),
            NodeKind::Emoji(emoji) => Some(emoji.source_form()),
            _ => None,
        }
    }
}

/// A syntax tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_children(kind: NodeKind, children: Vec<Node>) -> Self {
        Self { kind, children }
    }

    pub fn document(children: Vec<Node>) -> Self {
        Self::with_children(NodeKind::Document, children)
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Self::with_children(NodeKind::Paragraph, children)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Text {
            text: text.into(),
            soft_break: false,
            hard_break: false,
        })
    }

    pub fn inline(attribute: Attribute, children: Vec<Node>) -> Self {
        Self::with_children(NodeKind::Inline(attribute), children)
    }

    pub fn tag(&self) -> NodeTag {
        self.kind.tag()
    }

    /// Number of emoji when the tree holds nothing but emoji and whitespace
    pub fn emoji_only_count(&self) -> Option<usize> {
        match &self.kind {
            NodeKind::Emoji(_) => Some(1),
            NodeKind::Text { text, .. } if text.trim().is_empty() => Some(0),
            NodeKind::Document | NodeKind::Paragraph => self
                .children
                .iter()
                .try_fold(0, |count, child| Some(count + child.emoji_only_count()?)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_forms() {
        assert_eq!(MentionRef::User(UserId(1)).source_form(), "<@1>");
        assert_eq!(MentionRef::Role(RoleId(2)).source_form(), "<@&2>");
        assert_eq!(MentionRef::Channel(ChannelId(3)).source_form(), "<#3>");

        let emoji = CustomEmoji {
            name: "blob".into(),
            id: EmojiId(4),
            animated: true,
        };
        assert_eq!(emoji.source_form(), "<a:blob:4>");
        assert_eq!(NodeKind::Blockquote.source_form(), None);
    }

    #[test]
    fn test_emoji_only_count() {
        let emoji = || {
            Node::new(NodeKind::Emoji(CustomEmoji {
                name: "e".into(),
                id: EmojiId(1),
                animated: false,
            }))
        };

        let only = Node::document(vec![Node::paragraph(vec![emoji(), Node::text(" "), emoji()])]);
        assert_eq!(only.emoji_only_count(), Some(2));

        let mixed = Node::document(vec![Node::paragraph(vec![emoji(), Node::text("hi")])]);
        assert_eq!(mixed.emoji_only_count(), None);

        let empty = Node::document(Vec::new());
        assert_eq!(empty.emoji_only_count(), Some(0));
    }
}
