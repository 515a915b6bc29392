use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::util::unicode;

/// A single-line text input. The cursor is a byte offset that always sits
/// on a grapheme boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    text: String,
    cursor: usize,
}

impl TextField {
    /// Field holding `text` with the cursor at the end
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        TextField { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Display column of the cursor
    pub fn cursor_col(&self) -> usize {
        unicode::byte_offset_to_display_col(&self.text, self.cursor)
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Insert pasted text, flattening line breaks
    pub fn insert_str(&mut self, s: &str) {
        let clean = s.replace(['\r', '\n'], " ");
        self.text.insert_str(self.cursor, &clean);
        self.cursor += clean.len();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            self.text.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.text, self.cursor) {
            self.text.replace_range(self.cursor..next, "");
        }
    }

    /// Delete back to the start of the previous word
    pub fn delete_word_back(&mut self) {
        let start = unicode::word_boundary_left(&self.text, self.cursor);
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    pub fn left(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn right(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn word_left(&mut self) {
        self.cursor = unicode::word_boundary_left(&self.text, self.cursor);
    }

    pub fn word_right(&mut self) {
        self.cursor = unicode::word_boundary_right(&self.text, self.cursor);
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Apply an editing key. Returns false if the key is not an editing key,
    /// leaving it for the caller.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let word = key.modifiers.intersects(KeyModifiers::ALT | KeyModifiers::CONTROL);
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('a')) | (_, KeyCode::Home) => self.home(),
            (KeyModifiers::CONTROL, KeyCode::Char('e')) | (_, KeyCode::End) => self.end(),
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => self.clear(),
            (KeyModifiers::CONTROL, KeyCode::Char('w')) => self.delete_word_back(),
            (_, KeyCode::Left) if word => self.word_left(),
            (_, KeyCode::Right) if word => self.word_right(),
            (_, KeyCode::Left) => self.left(),
            (_, KeyCode::Right) => self.right(),
            (_, KeyCode::Backspace) if word => self.delete_word_back(),
            (_, KeyCode::Backspace) => self.backspace(),
            (_, KeyCode::Delete) => self.delete(),
            (m, KeyCode::Char(c)) if !m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                self.insert(c)
            }
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn typed(s: &str) -> TextField {
        let mut field = TextField::default();
        for c in s.chars() {
            assert!(field.handle_key(key(KeyCode::Char(c))));
        }
        field
    }

    #[test]
    fn typing_appends_at_cursor() {
        let mut field = typed("milk");
        field.home();
        field.insert_str("oat ");
        assert_eq!(field.text(), "oat milk");
        assert_eq!(field.cursor(), 4);
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let mut field = TextField::with_text("cafe\u{0301}");
        field.backspace();
        assert_eq!(field.text(), "caf");
        field.home();
        field.backspace();
        assert_eq!(field.text(), "caf");
    }

    #[test]
    fn delete_at_cursor() {
        let mut field = TextField::with_text("🥛x");
        field.home();
        field.delete();
        assert_eq!(field.text(), "x");
        field.end();
        field.delete();
        assert_eq!(field.text(), "x");
    }

    #[test]
    fn cursor_moves_by_grapheme_and_word() {
        let mut field = TextField::with_text("牛奶 milk");
        assert_eq!(field.cursor_col(), 9);
        field.handle_key(KeyEvent::new(KeyCode::Left, KeyModifiers::ALT));
        assert_eq!(field.cursor_col(), 5);
        field.handle_key(key(KeyCode::Left));
        field.handle_key(key(KeyCode::Left));
        assert_eq!(field.cursor_col(), 2);
        field.handle_key(key(KeyCode::Home));
        assert_eq!(field.cursor(), 0);
        field.handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::CONTROL));
        assert_eq!(field.cursor_col(), 5);
    }

    #[test]
    fn ctrl_w_and_ctrl_u() {
        let mut field = TextField::with_text("buy oat milk");
        field.handle_key(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL));
        assert_eq!(field.text(), "buy oat ");
        field.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert!(field.is_empty());
    }

    #[test]
    fn paste_flattens_newlines() {
        let mut field = TextField::default();
        field.insert_str("a\r\nb");
        assert_eq!(field.text(), "a  b");
    }

    #[test]
    fn non_editing_keys_are_left_alone() {
        let mut field = TextField::with_text("x");
        assert!(!field.handle_key(key(KeyCode::Enter)));
        assert!(!field.handle_key(key(KeyCode::Tab)));
        assert!(!field.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)));
        assert_eq!(field.text(), "x");
    }

    #[test]
    fn shifted_chars_insert() {
        let mut field = TextField::default();
        field.handle_key(KeyEvent::new(KeyCode::Char('M'), KeyModifiers::SHIFT));
        assert_eq!(field.text(), "M");
    }
}
