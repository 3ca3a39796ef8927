//! Message, embed and attachment types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ChannelId, GuildId, MessageId};
use super::user::User;

/// A chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub channel_id: ChannelId,
    /// None for private channels
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    pub author: User,
    #[serde(default)]
    pub content: String,
    /// Users mentioned in the content, as delivered with the message
    #[serde(default)]
    pub mentions: Vec<User>,
    #[serde(default)]
    pub embeds: Vec<Embed>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// The message this one replies to
    #[serde(default)]
    pub reference: Option<MessageId>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    pub fn new(
        id: impl Into<MessageId>,
        channel_id: impl Into<ChannelId>,
        author: User,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            channel_id: channel_id.into(),
            guild_id: None,
            author,
            content: content.into(),
            mentions: Vec::new(),
            embeds: Vec::new(),
            attachments: Vec::new(),
            reference: None,
            timestamp: None,
        }
    }
}

/// Rich embed attached to a message (link previews, bot output)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Markdown, rendered like a message body
    #[serde(default)]
    pub description: Option<String>,
    /// RGB color of the side bar
    #[serde(default)]
    pub color: Option<u32>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author: Option<EmbedAuthor>,
    #[serde(default)]
    pub footer: Option<EmbedFooter>,
    #[serde(default)]
    pub thumbnail: Option<EmbedMedia>,
    #[serde(default)]
    pub image: Option<EmbedMedia>,
    #[serde(default)]
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
    #[serde(default)]
    pub icon_url: Option<String>,
}

/// Image or thumbnail of an embed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedMedia {
    pub url: String,
    /// Proxied copy, preferred when present
    #[serde(default)]
    pub proxy_url: Option<String>,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

impl EmbedMedia {
    pub fn source_url(&self) -> &str {
        self.proxy_url.as_deref().unwrap_or(&self.url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

/// File uploaded with a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub url: String,
    #[serde(default)]
    pub proxy_url: Option<String>,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_deserializes_with_defaults() {
        let json = r#"{
            "id": 10,
            "channel_id": 20,
            "author": { "id": 30, "username": "ferris" },
            "content": "hello"
        }"#;

        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.id, MessageId(10));
        assert_eq!(message.author.username, "ferris");
        assert!(message.guild_id.is_none());
        assert!(message.embeds.is_empty());
        assert!(message.reference.is_none());
    }

    #[test]
    fn test_media_prefers_proxy_url() {
        let mut media = EmbedMedia {
            url: "https://origin/a.png".into(),
            proxy_url: None,
            width: 0,
            height: 0,
        };
        assert_eq!(media.source_url(), "https://origin/a.png");

        media.proxy_url = Some("https://proxy/a.png".into());
        assert_eq!(media.source_url(), "https://proxy/a.png");
    }
}
