//! Embed rendering
//!
//! An embed is a block opened by a colored separator line. Its parts follow
//! one per line; the description is markdown and is rendered by a nested
//! state sharing the output buffer.

use chrono::{DateTime, Utc};

use super::state::RenderState;
use crate::model::{Embed, EmbedMedia};
use crate::rich::{Attribute, AvatarAnchor, ImageAnchor, Rgba, SegmentKind};

/// Scale `width`x`height` down to fit the box, keeping the aspect ratio
///
/// Unknown dimensions take the whole box. Images are never scaled up.
pub fn fit(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (max_width, max_height);
    }
    let scale = (max_width as f64 / width as f64)
        .min(max_height as f64 / height as f64)
        .min(1.0);
    let scaled = |v: u32| ((v as f64 * scale).round() as u32).max(1);
    (scaled(width), scaled(height))
}

impl RenderState<'_> {
    pub fn render_embed(&mut self, embed: &Embed) {
        let config = self.config();

        self.start_block();
        let color = Rgba::from_rgb(embed.color.unwrap_or(config.default_embed_color));
        let (start, end) = self.write(&config.embed_separator);
        self.emit(start, end, SegmentKind::Color { color });

        if let Some(author) = &embed.author {
            self.ensure_break();
            if let Some(icon) = &author.icon_url {
                self.avatar(icon, &author.name);
                self.write(" ");
            }
            let (start, end) = self.write(&author.name);
            if let (Some(url), true) = (&author.url, start < end) {
                self.emit(start, end, SegmentKind::Link { url: url.clone() });
            }
        }

        if let Some(title) = &embed.title {
            self.ensure_break();
            let (start, end) = self.write_with(Attribute::BOLD, title);
            if let (Some(url), true) = (&embed.url, start < end) {
                self.emit(start, end, SegmentKind::Link { url: url.clone() });
            }
        }

        if let Some(thumbnail) = &embed.thumbnail {
            self.ensure_break();
            self.image(thumbnail, config.thumbnail_size, config.thumbnail_size);
        }

        if let Some(description) = embed.description.as_deref().filter(|d| !d.is_empty()) {
            self.ensure_break();
            self.render_nested(description);
        }

        for field in &embed.fields {
            self.ensure_break();
            self.write("  ");
            self.write_with(Attribute::BOLD, &field.name);
            self.write(": ");
            self.write(&field.value);
        }

        if embed.footer.is_some() || embed.timestamp.is_some() {
            self.ensure_break();
            self.render_footer(embed);
        }

        if let Some(image) = &embed.image {
            self.ensure_break();
            self.image(image, config.image_max_width, config.image_max_height);
        }
    }

    fn render_footer(&mut self, embed: &Embed) {
        if let Some(footer) = &embed.footer {
            if let Some(icon) = &footer.icon_url {
                self.avatar(icon, &footer.text);
                self.write(" ");
            }
            self.write(&footer.text);
        }
        if let Some(timestamp) = &embed.timestamp {
            if embed.footer.is_some() {
                self.write(" • ");
            }
            self.write(&format_timestamp(timestamp, &self.config().timestamp_format));
        }
    }

    fn avatar(&mut self, url: &str, alt_text: &str) {
        let size = self.config().avatar_size;
        self.anchor(SegmentKind::Avatar(AvatarAnchor {
            url: url.to_string(),
            size,
            alt_text: alt_text.to_string(),
        }));
    }

    fn image(&mut self, media: &EmbedMedia, max_width: u32, max_height: u32) {
        let (width, height) = fit(media.width, media.height, max_width, max_height);
        self.anchor(SegmentKind::Image(ImageAnchor {
            url: media.source_url().to_string(),
            width,
            height,
            alt_text: String::new(),
        }));
    }
}

fn format_timestamp(timestamp: &DateTime<Utc>, format: &str) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    // Invalid format strings surface as a fmt error instead of a panic
    if write!(out, "{}", timestamp.format(format)).is_err() {
        tracing::debug!(format, "Invalid timestamp format, using RFC 3339");
        return timestamp.to_rfc3339();
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::config::RenderConfig;
    use crate::model::{EmbedAuthor, EmbedField, EmbedFooter, Message, User};
    use crate::render::Renderer;
    use crate::rich::{RichText, Segment};

    fn render(config: &RenderConfig, embed: Embed) -> RichText {
        let mut message = Message::new(1, 2, User::new(3, "bot"), "");
        message.embeds.push(embed);
        Renderer::new(config).render_message(&message, None)
    }

    fn bold(start: usize, end: usize) -> Segment {
        Segment::new(
            start,
            end,
            SegmentKind::Attribute {
                attributes: Attribute::BOLD,
            },
        )
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit(800, 600, 400, 300), (400, 300));
        assert_eq!(fit(100, 50, 400, 300), (100, 50));
        assert_eq!(fit(1000, 100, 400, 300), (400, 40));
        assert_eq!(fit(0, 0, 80, 80), (80, 80));
    }

    #[test]
    fn test_separator_uses_default_color() {
        let config = RenderConfig::default();
        let rich = render(&config, Embed::default());
        assert_eq!(rich.content, "▌");
        assert_eq!(
            rich.segments,
            vec![Segment::new(
                0,
                "▌".len(),
                SegmentKind::Color {
                    color: Rgba::from_rgb(0x4f545c)
                }
            )]
        );
    }

    #[test]
    fn test_full_embed_layout() {
        let config = RenderConfig::default();
        let embed = Embed {
            title: Some("Title".into()),
            description: Some("*desc*".into()),
            color: Some(0xff0000),
            timestamp: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()),
            author: Some(EmbedAuthor {
                name: "Author".into(),
                url: None,
                icon_url: Some("https://img/a.png".into()),
            }),
            footer: Some(EmbedFooter {
                text: "Footer".into(),
                icon_url: None,
            }),
            fields: vec![EmbedField {
                name: "Key".into(),
                value: "**raw**".into(),
                inline: false,
            }],
            ..Embed::default()
        };

        let rich = render(&config, embed);
        assert_eq!(
            rich.content,
            "▌\n Author\nTitle\ndesc\n  Key: **raw**\nFooter • 2024-03-01 12:30"
        );

        let sep = "▌\n".len();
        let avatar = rich
            .segments
            .iter()
            .find(|s| matches!(s.kind, SegmentKind::Avatar(_)))
            .unwrap();
        assert_eq!((avatar.start, avatar.end), (sep, sep));

        let title = rich.content.find("Title").unwrap();
        assert!(rich.segments.contains(&bold(title, title + 5)));

        let desc = rich.content.find("desc").unwrap();
        assert!(rich.segments.contains(&Segment::new(
            desc,
            desc + 4,
            SegmentKind::Attribute {
                attributes: Attribute::ITALIC
            }
        )));

        let key = rich.content.find("Key").unwrap();
        assert!(rich.segments.contains(&bold(key, key + 3)));
        assert!(rich.offsets_valid());
    }

    #[test]
    fn test_empty_title_emits_no_link() {
        let config = RenderConfig::default();
        let embed = Embed {
            title: Some(String::new()),
            url: Some("https://x".into()),
            ..Embed::default()
        };
        let rich = render(&config, embed);
        assert!(rich
            .segments
            .iter()
            .all(|s| !matches!(s.kind, SegmentKind::Link { .. })));
        assert!(rich.segments.iter().all(|s| s.start < s.end || s.kind.is_anchor()));
    }

    #[test]
    fn test_images_are_fitted() {
        let config = RenderConfig::default();
        let embed = Embed {
            thumbnail: Some(EmbedMedia {
                url: "https://img/t.png".into(),
                proxy_url: Some("https://proxy/t.png".into()),
                width: 160,
                height: 80,
            }),
            image: Some(EmbedMedia {
                url: "https://img/i.png".into(),
                proxy_url: None,
                width: 800,
                height: 800,
            }),
            ..Embed::default()
        };

        let rich = render(&config, embed);
        let images: Vec<&ImageAnchor> = rich
            .segments
            .iter()
            .filter_map(|s| match &s.kind {
                SegmentKind::Image(image) => Some(image),
                _ => None,
            })
            .collect();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].url, "https://proxy/t.png");
        assert_eq!((images[0].width, images[0].height), (80, 40));
        assert_eq!((images[1].width, images[1].height), (300, 300));
    }

    #[test]
    fn test_description_past_depth_cap_is_plain() {
        let config = RenderConfig {
            max_depth: 1,
            ..RenderConfig::default()
        };
        let embed = Embed {
            description: Some("**plain**".into()),
            ..Embed::default()
        };
        let rich = render(&config, embed);
        assert_eq!(rich.content, "▌\n**plain**");
        assert_eq!(rich.segments.len(), 1);
    }

    #[test]
    fn test_invalid_timestamp_format_does_not_panic() {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(format_timestamp(&timestamp, "%Y"), "2024");
        assert_eq!(format_timestamp(&timestamp, "%Q"), timestamp.to_rfc3339());
    }
}
