//! Single-line text field with a character-offset cursor.
//!
//! Backs the domain input. Newlines never enter the buffer: pasted text is
//! folded onto one line. Key mapping lives in the terminal layer.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    content: String,
    /// Cursor as a character offset (0 = before first char).
    cursor: usize,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Content with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.content.trim()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Replace content and move the cursor to the end.
    pub fn set_content(&mut self, text: &str) {
        self.content = single_line(text);
        self.cursor = self.content.chars().count();
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' || ch == '\r' {
            return;
        }
        let at = self.byte_offset();
        self.content.insert(at, ch);
        self.cursor += 1;
    }

    /// Insert at the cursor. Line breaks become spaces.
    pub fn insert_str(&mut self, s: &str) {
        let clean = single_line(s);
        let at = self.byte_offset();
        self.content.insert_str(at, &clean);
        self.cursor += clean.chars().count();
    }

    /// Backspace.
    pub fn delete_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        self.remove_at_cursor();
    }

    /// Delete.
    pub fn delete_forward(&mut self) {
        self.remove_at_cursor();
    }

    /// Ctrl+W / Ctrl+Backspace.
    pub fn delete_word_back(&mut self) {
        let chars: Vec<char> = self.content.chars().collect();
        let mut pos = self.cursor;
        while pos > 0 && chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        let start = self.char_to_byte(pos);
        let end = self.byte_offset();
        self.content.replace_range(start..end, "");
        self.cursor = pos;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.content.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.content.chars().count();
    }

    fn remove_at_cursor(&mut self) {
        let at = self.byte_offset();
        if let Some(ch) = self.content[at..].chars().next() {
            self.content.replace_range(at..at + ch.len_utf8(), "");
        }
    }

    fn byte_offset(&self) -> usize {
        self.char_to_byte(self.cursor)
    }

    fn char_to_byte(&self, char_pos: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }
}

fn single_line(s: &str) -> String {
    s.replace("\r\n", " ").replace(['\r', '\n'], " ")
}
