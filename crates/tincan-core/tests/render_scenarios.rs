use tincan_core::model::{Embed, GuildId, Message, User, UserId};
use tincan_core::rich::{MentionKind, RichText};
use tincan_core::{
    Attribute, FetchRequest, MemoryStore, RenderConfig, RenderContext, Renderer, Segment,
    SegmentKind,
};

fn render(source: &str) -> RichText {
    let config = RenderConfig::default();
    Renderer::new(&config).render_source(source, RenderContext::default())
}

fn attribute(start: usize, end: usize, attributes: Attribute) -> Segment {
    Segment::new(start, end, SegmentKind::Attribute { attributes })
}

#[test]
fn overlapping_bold_and_italic_split_into_runs() {
    let rich = render("**bold and *italics***");
    assert_eq!(rich.content, "bold and italics");
    assert_eq!(
        rich.segments,
        vec![
            attribute(0, 9, Attribute::BOLD),
            attribute(9, 16, Attribute::BOLD | Attribute::ITALIC),
        ]
    );
}

#[test]
fn custom_emoji_becomes_anchor() {
    let rich = render("Look at this: <:blob:123> nice");
    assert_eq!(rich.content, "Look at this:  nice");
    assert_eq!(rich.segments.len(), 1);

    let anchor = &rich.segments[0];
    assert_eq!((anchor.start, anchor.end), (14, 14));
    match &anchor.kind {
        SegmentKind::Image(image) => {
            assert_eq!(image.alt_text, ":blob:");
            assert!(image.url.contains("/emojis/123.png"));
        }
        other => panic!("Expected image anchor, got {:?}", other),
    }
}

#[test]
fn blockquote_spans_quoted_lines() {
    let rich = render("> line one\n> line two");
    assert_eq!(rich.content, "> line one\n> line two");
    assert_eq!(
        rich.segments,
        vec![Segment::new(0, 21, SegmentKind::QuoteBlock)]
    );
}

#[test]
fn blockquote_with_two_paragraphs() {
    let rich = render("> one\n>\n> two\n\nafter");
    assert_eq!(rich.content, "> one\n> two\n\nafter");
    assert_eq!(
        rich.segments,
        vec![Segment::new(0, 11, SegmentKind::QuoteBlock)]
    );
}

#[test]
fn embed_title_is_bold_and_linked() {
    let config = RenderConfig::default();
    let mut message = Message::new(1, 2, User::new(3, "bot"), "");
    message.embeds.push(Embed {
        title: Some("Hello".into()),
        url: Some("https://x".into()),
        ..Embed::default()
    });

    let rich = Renderer::new(&config).render_message(&message, None);
    let start = rich.content.find("Hello").unwrap();
    let end = start + "Hello".len();
    assert!(rich
        .segments
        .contains(&attribute(start, end, Attribute::BOLD)));
    assert!(rich.segments.contains(&Segment::new(
        start,
        end,
        SegmentKind::Link {
            url: "https://x".into()
        }
    )));
}

#[test]
fn unknown_user_mention_falls_back_and_requests_once() {
    let config = RenderConfig::default();
    let (store, mut requests) = MemoryStore::with_requests();
    let mut message = Message::new(1, 2, User::new(3, "author"), "hi <@99>");
    message.guild_id = Some(GuildId(5));

    let rich = Renderer::new(&config).render_message(&message, Some(&store));
    assert_eq!(rich.content, "hi <@99>");

    let mentions: Vec<_> = rich
        .segments
        .iter()
        .filter_map(|s| match &s.kind {
            SegmentKind::Mention(mention) => Some((s.start, s.end, mention)),
            _ => None,
        })
        .collect();
    assert_eq!(mentions.len(), 1);
    let (start, end, mention) = mentions[0];
    assert_eq!((start, end), (3, 8));
    assert_eq!(mention.kind, MentionKind::User);
    assert_eq!(mention.id, 99);
    assert!(mention.resolved.is_none());

    assert_eq!(
        requests.try_recv().ok(),
        Some(FetchRequest::Member {
            guild: GuildId(5),
            user: UserId(99)
        })
    );
    assert!(requests.try_recv().is_err());
    assert_eq!(store.request_count(), 1);
}

#[test]
fn empty_source_renders_nothing() {
    let rich = render("");
    assert_eq!(rich.content, "");
    assert!(rich.segments.is_empty());
}

#[test]
fn rich_text_transport_format() {
    let rich = render("**hi**");
    let json = serde_json::to_value(&rich).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "content": "hi",
            "segments": [
                {"start": 0, "end": 2, "type": "attribute", "attributes": "BOLD"}
            ]
        })
    );
}

#[test]
fn message_with_embed_and_attachment_keeps_offsets_valid() {
    let config = RenderConfig::default();
    let store = MemoryStore::new();
    let mut message = Message::new(1, 2, User::new(3, "author"), "> quoted **bold**\n\ntext");
    message.embeds.push(Embed {
        title: Some("Title".into()),
        description: Some("**desc** <@4> ||spoiler||".into()),
        ..Embed::default()
    });

    let rich = Renderer::new(&config).render_message(&message, Some(&store));
    assert!(rich.offsets_valid());
    assert!(rich.content.starts_with("> quoted bold\n\ntext\n\n▌"));
    assert!(rich.content.ends_with("desc <@4> spoiler"));
}
