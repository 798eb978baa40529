//! Single-line edit buffer: a character vector plus a cursor.
//!
//! All operations keep `cursor <= len`. Mutating operations return `true`
//! when the text actually changed, which the field uses to decide whether to
//! report a change.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    chars: Vec<char>,
    cursor: usize,
}

impl EditBuffer {
    /// Buffer holding `text` with the cursor at the end.
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, pos: usize) {
        self.cursor = pos.min(self.chars.len());
    }

    /// Replace the text; keeps the cursor where it was if still in range.
    pub fn set_text(&mut self, text: &str) {
        self.chars = text.chars().collect();
        self.cursor = self.cursor.min(self.chars.len());
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.chars.is_empty();
        self.chars.clear();
        self.cursor = 0;
        changed
    }

    /// Insert at the cursor, honouring an optional character limit.
    pub fn insert(&mut self, c: char, limit: Option<usize>) -> bool {
        if limit.is_some_and(|limit| self.chars.len() >= limit) {
            return false;
        }
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
        true
    }

    /// Insert as much of `text` as the limit allows.
    pub fn insert_str(&mut self, text: &str, limit: Option<usize>) -> bool {
        let room = limit.map_or(usize::MAX, |limit| limit.saturating_sub(self.chars.len()));
        let incoming: Vec<char> = text.chars().take(room).collect();
        if incoming.is_empty() {
            return false;
        }
        let n = incoming.len();
        self.chars.splice(self.cursor..self.cursor, incoming);
        self.cursor += n;
        true
    }

    pub fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.chars.remove(self.cursor);
        true
    }

    /// Delete the word before the cursor, including spaces between it and
    /// the cursor.
    pub fn delete_word_back(&mut self) -> bool {
        let start = self.word_start_before(self.cursor, |c| c == ' ');
        if start == self.cursor {
            return false;
        }
        self.chars.drain(start..self.cursor);
        self.cursor = start;
        true
    }

    /// Delete from the line start to the cursor.
    pub fn delete_to_start(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.chars.drain(..self.cursor);
        self.cursor = 0;
        true
    }

    /// Delete from the cursor to the line end.
    pub fn delete_to_end(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.chars.truncate(self.cursor);
        true
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.chars.len();
    }

    /// Jump to the start of the previous alphanumeric word.
    pub fn word_left(&mut self) {
        self.cursor = self.word_start_before(self.cursor, |c| !c.is_alphanumeric());
    }

    /// Jump past the current word and the separators after it.
    pub fn word_right(&mut self) {
        let len = self.chars.len();
        let mut i = self.cursor;
        while i < len && self.chars[i].is_alphanumeric() {
            i += 1;
        }
        while i < len && !self.chars[i].is_alphanumeric() {
            i += 1;
        }
        self.cursor = i;
    }

    fn word_start_before(&self, from: usize, is_separator: impl Fn(char) -> bool) -> usize {
        let mut i = from;
        while i > 0 && is_separator(self.chars[i - 1]) {
            i -= 1;
        }
        while i > 0 && !is_separator(self.chars[i - 1]) {
            i -= 1;
        }
        i
    }
}
