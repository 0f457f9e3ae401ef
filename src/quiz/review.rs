/// Position inside the answer history while reviewing a finished quiz.
/// The index never leaves `0..len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReviewCursor {
    index: usize,
    len: usize,
}

impl ReviewCursor {
    pub fn new(len: usize) -> Option<Self> {
        if len == 0 {
            return None;
        }
        Some(Self { index: 0, len })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn has_prev(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.len
    }

    pub fn next(&mut self) {
        if self.has_next() {
            self.index += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.has_prev() {
            self.index -= 1;
        }
    }
}
