//! Inline attribute merging
//!
//! Formatting nodes open and close attributes as the walk enters and leaves
//! them. Instead of one segment per node, the text is cut into runs of
//! constant combined attributes and each run becomes exactly one segment,
//! so overlapping bold and italic produce flat, non-overlapping ranges.

use crate::rich::{Attribute, Segment, SegmentKind};

/// Open attribute region plus per-attribute nesting counts
#[derive(Debug, Clone)]
pub struct InlineState {
    start: usize,
    counts: [u32; Attribute::COUNT],
}

impl InlineState {
    pub fn new(offset: usize) -> Self {
        Self {
            start: offset,
            counts: [0; Attribute::COUNT],
        }
    }

    /// Attributes active at the current position
    pub fn active(&self) -> Attribute {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .fold(Attribute::empty(), |acc, (bit, _)| {
                acc | Attribute::from_bits_truncate(1 << bit)
            })
    }

    /// Enter a formatting node at `offset`
    ///
    /// Returns the finished run that precedes it, if any.
    pub fn enter(&mut self, attribute: Attribute, offset: usize) -> Option<Segment> {
        self.transition(offset, |counts| {
            for flag in attribute.iter() {
                if let Some(index) = flag.index() {
                    counts[index] += 1;
                }
            }
        })
    }

    /// Leave a formatting node at `offset`
    pub fn exit(&mut self, attribute: Attribute, offset: usize) -> Option<Segment> {
        self.transition(offset, |counts| {
            for flag in attribute.iter() {
                if let Some(index) = flag.index() {
                    counts[index] = counts[index].saturating_sub(1);
                }
            }
        })
    }

    /// Close whatever is still open and clear all attributes
    pub fn finish(&mut self, offset: usize) -> Option<Segment> {
        self.transition(offset, |counts| *counts = [0; Attribute::COUNT])
    }

    /// Close the open run at `offset` without changing attributes
    pub fn split(&mut self, offset: usize) -> Option<Segment> {
        let segment = self.region(offset);
        self.start = offset;
        segment
    }

    /// Restart the open run at `offset`, dropping the text in between
    pub fn reset(&mut self, offset: usize) {
        self.start = offset;
    }

    fn transition(
        &mut self,
        offset: usize,
        update: impl FnOnce(&mut [u32; Attribute::COUNT]),
    ) -> Option<Segment> {
        let before = self.active();
        update(&mut self.counts);
        if self.active() == before {
            return None;
        }
        let segment = self.region_with(before, offset);
        self.start = offset;
        segment
    }

    fn region(&self, offset: usize) -> Option<Segment> {
        self.region_with(self.active(), offset)
    }

    /// Zero-length runs and runs without attributes are never emitted
    fn region_with(&self, attributes: Attribute, offset: usize) -> Option<Segment> {
        if self.start >= offset || attributes.is_empty() {
            return None;
        }
        Some(Segment::new(
            self.start,
            offset,
            SegmentKind::Attribute { attributes },
        ))
    }
}
