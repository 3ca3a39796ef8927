//! CDN URLs for avatars and custom emoji

use url::Url;

use crate::model::{EmojiId, GuildId, UserId};

/// Number of built-in default avatars
const DEFAULT_AVATARS: u64 = 6;

fn build(base: &str, segments: &[&str], size: u32) -> String {
    let size = size.to_string();
    match Url::parse(base) {
        Ok(mut url) => {
            if let Ok(mut path) = url.path_segments_mut() {
                path.pop_if_empty().extend(segments);
            }
            url.query_pairs_mut().append_pair("size", &size);
            url.into()
        }
        Err(e) => {
            tracing::debug!(base, error = %e, "Invalid CDN base, formatting URL by hand");
            format!(
                "{}/{}?size={}",
                base.trim_end_matches('/'),
                segments.join("/"),
                size
            )
        }
    }
}

fn image_file(hash: &str) -> String {
    let ext = if hash.starts_with("a_") { "gif" } else { "png" };
    format!("{}.{}", hash, ext)
}

/// Avatar of a user, or their default avatar when they have none
pub fn avatar_url(base: &str, user: UserId, hash: Option<&str>, size: u32) -> String {
    match hash {
        Some(hash) => build(
            base,
            &["avatars", &user.to_string(), &image_file(hash)],
            size,
        ),
        None => {
            let index = (user.get() >> 22) % DEFAULT_AVATARS;
            build(base, &["embed", "avatars", &format!("{}.png", index)], size)
        }
    }
}

/// Guild-specific avatar of a member
pub fn member_avatar_url(base: &str, guild: GuildId, user: UserId, hash: &str, size: u32) -> String {
    build(
        base,
        &[
            "guilds",
            &guild.to_string(),
            "users",
            &user.to_string(),
            "avatars",
            &image_file(hash),
        ],
        size,
    )
}

pub fn emoji_url(base: &str, id: EmojiId, animated: bool, size: u32) -> String {
    let file = format!("{}.{}", id, if animated { "gif" } else { "png" });
    build(base, &["emojis", &file], size)
}
