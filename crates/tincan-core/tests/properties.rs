use proptest::prelude::*;
use tincan_core::markdown::{Node, NodeKind};
use tincan_core::model::{Embed, GuildId, Message, User};
use tincan_core::{
    Attribute, MemoryStore, RenderConfig, RenderContext, Renderer, RichText, SegmentKind,
};

/// Markdown-ish source built from fragments that exercise every handler
fn source_strategy() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("**"),
        Just("*"),
        Just("__"),
        Just("~~"),
        Just("||"),
        Just("`"),
        Just("> "),
        Just("\n"),
        Just("\n\n"),
        Just("# "),
        Just("- "),
        Just("1. "),
        Just("```\n"),
        Just("word"),
        Just(" "),
        Just("ünï"),
        Just("<@1>"),
        Just("<@&2>"),
        Just("<#3>"),
        Just("<:blob:4>"),
        Just("https://example.com"),
        Just("[link](https://x)"),
    ];
    prop::collection::vec(fragment, 0..40).prop_map(|parts| parts.concat())
}

fn check_invariants(rich: &RichText) -> Result<(), TestCaseError> {
    prop_assert!(rich.offsets_valid(), "invalid offsets in {:?}", rich);

    for segment in &rich.segments {
        prop_assert!(rich.content.is_char_boundary(segment.start));
        prop_assert!(rich.content.is_char_boundary(segment.end));
        if segment.kind.is_anchor() {
            prop_assert_eq!(segment.start, segment.end);
        }
    }

    let mut runs: Vec<(usize, usize)> = rich
        .segments
        .iter()
        .filter(|s| matches!(s.kind, SegmentKind::Attribute { .. }))
        .map(|s| (s.start, s.end))
        .collect();
    runs.sort();
    for pair in runs.windows(2) {
        prop_assert!(
            pair[0].1 <= pair[1].0,
            "overlapping attribute runs {:?} in {:?}",
            pair,
            rich
        );
    }
    for (start, end) in &runs {
        prop_assert!(start < end, "empty attribute run in {:?}", rich);
    }
    Ok(())
}

fn attribute_strategy() -> impl Strategy<Value = Attribute> {
    prop_oneof![
        Just(Attribute::BOLD),
        Just(Attribute::ITALIC),
        Just(Attribute::UNDERLINE),
        Just(Attribute::STRIKETHROUGH),
        Just(Attribute::SPOILER),
        Just(Attribute::MONOSPACE),
    ]
}

/// Nested formatting nodes over text leaves, empty leaves included
fn inline_tree_strategy() -> impl Strategy<Value = Node> {
    let leaf = "[a-zé ]{0,5}".prop_map(|text| Node::text(text));
    leaf.prop_recursive(5, 48, 4, |inner| {
        (attribute_strategy(), prop::collection::vec(inner, 0..4))
            .prop_map(|(attribute, children)| Node::inline(attribute, children))
    })
}

/// Attributes active at every byte of the rendered text
fn expected_attributes(node: &Node, active: Attribute, out: &mut Vec<Attribute>) {
    match &node.kind {
        NodeKind::Text { text, .. } => out.extend(std::iter::repeat(active).take(text.len())),
        NodeKind::Inline(attribute) => {
            for child in &node.children {
                expected_attributes(child, active | *attribute, out);
            }
        }
        _ => {
            for child in &node.children {
                expected_attributes(child, active, out);
            }
        }
    }
}

proptest! {
    /// Property: attribute runs cover exactly the formatted bytes, each
    /// with the attributes active there
    #[test]
    fn prop_attribute_runs_partition_text(tree in prop::collection::vec(inline_tree_strategy(), 1..4)) {
        let document = Node::document(vec![Node::paragraph(tree)]);
        let mut expected = Vec::new();
        expected_attributes(&document, Attribute::empty(), &mut expected);

        let config = RenderConfig::default();
        let rich = Renderer::new(&config).render_node(&document, RenderContext::default());
        prop_assert_eq!(rich.content.len(), expected.len());

        let mut actual = vec![Attribute::empty(); rich.content.len()];
        for segment in &rich.segments {
            if let SegmentKind::Attribute { attributes } = &segment.kind {
                prop_assert!(segment.start < segment.end);
                for byte in &mut actual[segment.start..segment.end] {
                    prop_assert!(byte.is_empty(), "overlapping runs in {:?}", rich);
                    *byte = *attributes;
                }
            }
        }
        prop_assert_eq!(actual, expected);
    }

    /// Property: segments always address valid, non-overlapping ranges
    #[test]
    fn prop_source_render_invariants(source in source_strategy()) {
        let config = RenderConfig::default();
        let store = MemoryStore::new();
        let mut message = Message::new(1, 2, User::new(3, "a"), source.clone());
        message.guild_id = Some(GuildId(9));

        let rich = Renderer::new(&config)
            .render_source(&source, RenderContext::for_message(&message, &store));
        check_invariants(&rich)?;
    }

    /// Property: nested description rendering keeps the same invariants
    #[test]
    fn prop_embed_render_invariants(body in source_strategy(), description in source_strategy()) {
        let config = RenderConfig::default();
        let mut message = Message::new(1, 2, User::new(3, "a"), body);
        message.embeds.push(Embed {
            title: Some("title".into()),
            description: Some(description),
            ..Embed::default()
        });

        let rich = Renderer::new(&config).render_message(&message, None);
        check_invariants(&rich)?;
    }

    /// Property: rendering is deterministic and never requests an entity twice
    #[test]
    fn prop_requests_deduplicated(source in source_strategy()) {
        let config = RenderConfig::default();
        let (store, mut requests) = MemoryStore::with_requests();
        let mut message = Message::new(1, 2, User::new(3, "a"), source.clone());
        message.guild_id = Some(GuildId(9));

        let first = Renderer::new(&config)
            .render_source(&source, RenderContext::for_message(&message, &store));
        let mut seen = Vec::new();
        while let Ok(request) = requests.try_recv() {
            prop_assert!(!seen.contains(&request), "duplicate request {:?}", request);
            seen.push(request);
        }

        let second = Renderer::new(&config)
            .render_source(&source, RenderContext::for_message(&message, &store));
        prop_assert_eq!(first, second);
    }
}
