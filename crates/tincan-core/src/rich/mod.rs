//! Rich text: a plain display string plus byte-range segments
//!
//! This is the transport format between the renderer and whatever draws the
//! text. Segments are ordered by when the renderer closed them, not by
//! start offset.

mod attribute;
mod segment;

use serde::{Deserialize, Serialize};

pub use attribute::Attribute;
pub use segment::{
    AvatarAnchor, ImageAnchor, Mention, MentionData, MentionKind, Rgba, Segment, SegmentKind,
};

/// Rendered text with position-tagged segments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    pub content: String,
    pub segments: Vec<Segment>,
}

impl RichText {
    pub fn new(content: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            content: content.into(),
            segments,
        }
    }

    /// Plain text without segments
    pub fn plain(content: impl Into<String>) -> Self {
        Self::new(content, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.segments.is_empty()
    }

    /// Text covered by a segment; empty for anchors and invalid ranges
    pub fn text_of(&self, segment: &Segment) -> &str {
        self.content.get(segment.start..segment.end).unwrap_or("")
    }

    /// True when every segment range lies inside the content
    pub fn offsets_valid(&self) -> bool {
        self.segments
            .iter()
            .all(|s| s.start <= s.end && s.end <= self.content.len())
    }

    /// Attribute segments as `(start, end, attributes)`
    pub fn attributes(&self) -> impl Iterator<Item = (usize, usize, Attribute)> + '_ {
        self.segments.iter().filter_map(|s| match s.kind {
            SegmentKind::Attribute { attributes } => Some((s.start, s.end, attributes)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_of_tolerates_bad_ranges() {
        let rich = RichText::new(
            "héllo",
            vec![
                Segment::new(0, 1, SegmentKind::QuoteBlock),
                Segment::new(1, 2, SegmentKind::QuoteBlock),
                Segment::new(3, 99, SegmentKind::QuoteBlock),
            ],
        );
        assert_eq!(rich.text_of(&rich.segments[0]), "h");
        // Splits the two-byte 'é'
        assert_eq!(rich.text_of(&rich.segments[1]), "");
        assert_eq!(rich.text_of(&rich.segments[2]), "");
        assert!(!rich.offsets_valid());
    }

    #[test]
    fn test_default_is_empty() {
        let rich = RichText::default();
        assert!(rich.is_empty());
        assert!(rich.offsets_valid());
    }
}
