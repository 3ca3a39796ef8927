//! Block spacing
//!
//! Blocks are separated by an exact number of newlines no matter how many
//! times spacing is requested in a row.

use super::buffer::Buffer;

/// Make sure the buffer ends with `n` newlines
///
/// Walks back over the last `n` positions and appends a newline for each one
/// that is not already a newline. Does nothing on an empty buffer.
pub fn pad_newlines(buf: &mut Buffer, n: usize) {
    if buf.is_empty() {
        return;
    }
    for offset in 1..=n {
        if buf.peek_last(offset) != b'\n' {
            buf.write("\n");
        }
    }
}

/// End the current line
pub fn ensure_break(buf: &mut Buffer) {
    pad_newlines(buf, 1);
}

/// Leave one blank line before the next block
pub fn start_block(buf: &mut Buffer) {
    pad_newlines(buf, 2);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(text: &str) -> Buffer {
        let mut buf = Buffer::new();
        buf.write(text);
        buf
    }

    #[test]
    fn test_empty_buffer_untouched() {
        let mut buf = Buffer::new();
        start_block(&mut buf);
        ensure_break(&mut buf);
        assert_eq!(buf.as_str(), "");
    }

    #[test]
    fn test_start_block_pads_to_blank_line() {
        let mut buf = buffer("text");
        start_block(&mut buf);
        assert_eq!(buf.as_str(), "text\n\n");

        let mut buf = buffer("text\n");
        start_block(&mut buf);
        assert_eq!(buf.as_str(), "text\n\n");

        let mut buf = buffer("a\nb");
        start_block(&mut buf);
        assert_eq!(buf.as_str(), "a\nb\n\n");
    }

    #[test]
    fn test_idempotent() {
        let mut buf = buffer("text");
        start_block(&mut buf);
        start_block(&mut buf);
        ensure_break(&mut buf);
        assert_eq!(buf.as_str(), "text\n\n");

        let mut buf = buffer("line");
        ensure_break(&mut buf);
        ensure_break(&mut buf);
        assert_eq!(buf.as_str(), "line\n");
    }

    #[test]
    fn test_ensure_break_after_blank_line() {
        let mut buf = buffer("text\n\n");
        ensure_break(&mut buf);
        assert_eq!(buf.as_str(), "text\n\n");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: padding twice leaves the same buffer as padding once
            #[test]
            fn prop_pad_newlines_idempotent(text in "[a-z \n]{0,30}", n in 0usize..4) {
                let mut once = buffer(&text);
                pad_newlines(&mut once, n);

                let mut twice = buffer(&text);
                pad_newlines(&mut twice, n);
                pad_newlines(&mut twice, n);

                prop_assert_eq!(once.as_str(), twice.as_str());
            }

            /// Property: a non-empty buffer ends with at least `n` newlines after padding
            #[test]
            fn prop_pad_newlines_reaches_target(text in "[a-z \n]{1,30}", n in 1usize..4) {
                let mut buf = buffer(&text);
                pad_newlines(&mut buf, n);
                prop_assert!(buf.as_str().ends_with(&"\n".repeat(n)));
            }
        }
    }
}
