//! Link tracking
//!
//! Link-like nodes record where their text starts when the walk enters them
//! and close a `Link` segment when it leaves them.

#[derive(Debug, Default)]
pub struct LinkStack {
    starts: Vec<usize>,
}

impl LinkStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, offset: usize) {
        self.starts.push(offset);
    }

    /// Start offset of the innermost open link, None if nothing is open
    pub fn pop(&mut self) -> Option<usize> {
        self.starts.pop()
    }

    pub fn depth(&self) -> usize {
        self.starts.len()
    }
}
