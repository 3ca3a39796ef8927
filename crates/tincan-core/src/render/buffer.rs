//! Append-only output buffer
//!
//! Offsets handed out by the buffer are byte offsets into the final content.
//! A line prefix (used for quote blocks) is written lazily in front of the
//! first non-newline text of every line, so blank lines never carry it.

#[derive(Debug, Default)]
pub struct Buffer {
    text: String,
    line_prefix: String,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Append text, returning the byte range of what was written
    ///
    /// A pending line prefix is written before the returned range starts,
    /// so ranges never include quote markers.
    pub fn write(&mut self, s: &str) -> (usize, usize) {
        let mut start = None;
        for piece in s.split_inclusive('\n') {
            if piece != "\n" {
                self.flush_prefix();
            }
            start.get_or_insert(self.text.len());
            self.text.push_str(piece);
        }
        let end = self.text.len();
        (start.unwrap_or(end), end)
    }

    /// Append text as is, without a line prefix on any of its lines
    pub fn write_raw(&mut self, s: &str) -> (usize, usize) {
        let start = self.text.len();
        self.text.push_str(s);
        (start, self.text.len())
    }

    /// Whether the next non-newline write starts with the line prefix
    pub fn prefix_pending(&self) -> bool {
        !self.line_prefix.is_empty() && self.at_line_start()
    }

    /// Current end offset, after writing any pending line prefix
    ///
    /// Used where a range is about to be opened so that it starts after the
    /// quote marker of its line.
    pub fn cursor(&mut self) -> usize {
        self.flush_prefix();
        self.text.len()
    }

    /// Byte `offset` positions before the end (1 = last byte), 0 if out of range
    pub fn peek_last(&self, offset: usize) -> u8 {
        if offset == 0 || offset > self.text.len() {
            return 0;
        }
        self.text.as_bytes()[self.text.len() - offset]
    }

    /// Extend the line prefix, returning a token for [`Buffer::pop_prefix`]
    pub fn push_prefix(&mut self, prefix: &str) -> usize {
        let restore = self.line_prefix.len();
        self.line_prefix.push_str(prefix);
        restore
    }

    pub fn pop_prefix(&mut self, restore: usize) {
        self.line_prefix.truncate(restore);
    }

    fn at_line_start(&self) -> bool {
        self.text.is_empty() || self.text.ends_with('\n')
    }

    fn flush_prefix(&mut self) {
        if !self.line_prefix.is_empty() && self.at_line_start() {
            self.text.push_str(&self.line_prefix);
        }
    }
}
