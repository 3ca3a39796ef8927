//! Chat-specific inline syntax found inside markdown text
//!
//! Mentions (`<@id>`, `<@!id>`, `<@&id>`, `<#id>`), custom emoji
//! (`<:name:id>`, `<a:name:id>`), bare URLs and `||` spoiler delimiters.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::elements::{CustomEmoji, MentionRef};
use crate::model::{ChannelId, EmojiId, RoleId, UserId};

static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"<(?P<sigil>@!?|@&|#)(?P<mention>\d+)>",
        r"|<(?P<animated>a?):(?P<emoji>\w+):(?P<emoji_id>\d+)>",
        r"|(?P<url>https?://[^\s<>\[\]()|]+)",
        r"|(?P<spoiler>\|\|)",
    ))
    .unwrap()
});

/// A piece of tokenized text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Text(&'a str),
    Mention(MentionRef),
    Emoji(CustomEmoji),
    Url(&'a str),
    Spoiler,
}

/// Split text into plain runs and chat extension tokens
///
/// Matches whose IDs do not fit in 64 bits stay plain text.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut last_end = 0;

    for caps in TOKEN_REGEX.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let Some(token) = token_from(&caps) else {
            continue;
        };

        if whole.start() > last_end {
            tokens.push(Token::Text(&text[last_end..whole.start()]));
        }
        tokens.push(token);
        last_end = whole.end();
    }

    if last_end < text.len() {
        tokens.push(Token::Text(&text[last_end..]));
    }

    tokens
}

fn token_from<'a>(caps: &Captures<'a>) -> Option<Token<'a>> {
    if let (Some(sigil), Some(id)) = (caps.name("sigil"), caps.name("mention")) {
        let id: u64 = id.as_str().parse().ok()?;
        let mention = match sigil.as_str() {
            "#" => MentionRef::Channel(ChannelId(id)),
            "@&" => MentionRef::Role(RoleId(id)),
            _ => MentionRef::User(UserId(id)),
        };
        return Some(Token::Mention(mention));
    }

    if let (Some(name), Some(id)) = (caps.name("emoji"), caps.name("emoji_id")) {
        let id: u64 = id.as_str().parse().ok()?;
        return Some(Token::Emoji(CustomEmoji {
            name: name.as_str().to_string(),
            id: EmojiId(id),
            animated: caps.name("animated").is_some_and(|m| !m.as_str().is_empty()),
        }));
    }

    if let Some(url) = caps.name("url") {
        return Some(Token::Url(url.as_str()));
    }

    caps.name("spoiler").map(|_| Token::Spoiler)
}
