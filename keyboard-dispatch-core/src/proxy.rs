//! Text document proxy abstraction
//!
//! The engine never owns the document being edited. It talks to it through
//! [`TextDocumentProxy`], which only exposes the text around the cursor and a
//! handful of mutations. Word and sentence queries are derived from those
//! primitives by [`TextDocumentProxyExt`].

/// Characters that end a word, besides whitespace.
const WORD_DELIMITERS: &[char] = &[
    '.', ',', ';', ':', '!', '?', '(', ')', '[', ']', '{', '}', '<', '>', '"', '«', '»', '“', '”',
    '„', '‚', '‘', '’', '‹', '›', '…', '-', '–', '—', '/', '\\', '|', '*', '&', '@', '#', '%',
];

/// Characters that end a sentence, besides newlines.
const SENTENCE_DELIMITERS: &[char] = &['.', '!', '?', '…'];

/// Whether a character separates words.
///
/// The apostrophe is not a delimiter so contractions stay a single word.
pub fn is_word_delimiter(c: char) -> bool {
    c.is_whitespace() || WORD_DELIMITERS.contains(&c)
}

/// Whether a character ends a sentence.
pub fn is_sentence_delimiter(c: char) -> bool {
    c == '\n' || SENTENCE_DELIMITERS.contains(&c)
}

/// The text document being edited, as seen from the keyboard.
pub trait TextDocumentProxy {
    /// Text before the cursor, if the host exposes it
    fn context_before_input(&self) -> Option<String>;

    /// Text after the cursor, if the host exposes it
    fn context_after_input(&self) -> Option<String>;

    /// Insert text at the cursor
    fn insert_text(&mut self, text: &str);

    /// Delete `times` characters before the cursor
    fn delete_backward(&mut self, times: usize);

    /// Move the cursor by `offset` characters. Implementations clamp to the text bounds.
    fn adjust_text_position(&mut self, offset: isize);
}

/// Word and sentence queries derived from [`TextDocumentProxy`].
pub trait TextDocumentProxyExt: TextDocumentProxy {
    /// The part of the current word that lies before the cursor
    fn current_word_before_cursor(&self) -> String {
        let before = self.context_before_input().unwrap_or_default();
        let mut word: Vec<char> = before
            .chars()
            .rev()
            .take_while(|c| !is_word_delimiter(*c))
            .collect();
        word.reverse();
        word.into_iter().collect()
    }

    /// The part of the current word that lies after the cursor
    fn current_word_after_cursor(&self) -> String {
        let after = self.context_after_input().unwrap_or_default();
        after.chars().take_while(|c| !is_word_delimiter(*c)).collect()
    }

    /// The whole word the cursor is in, if any
    fn current_word(&self) -> Option<String> {
        let word = format!(
            "{}{}",
            self.current_word_before_cursor(),
            self.current_word_after_cursor()
        );
        (!word.is_empty()).then_some(word)
    }

    /// True when the next typed character starts a new word
    fn is_cursor_at_new_word(&self) -> bool {
        match self.context_before_input() {
            None => true,
            Some(before) => before.chars().last().is_none_or(is_word_delimiter),
        }
    }

    /// True when the next typed word starts a new sentence
    fn is_cursor_at_new_sentence(&self) -> bool {
        let before = self.context_before_input().unwrap_or_default();
        let trimmed = before.trim_end_matches([' ', '\t']);
        trimmed.chars().last().is_none_or(is_sentence_delimiter)
    }

    /// True when the cursor sits right after a word and no word characters follow it
    fn is_cursor_at_the_end_of_the_current_word(&self) -> bool {
        !self.current_word_before_cursor().is_empty() && self.current_word_after_cursor().is_empty()
    }

    /// Replace the word around the cursor with `text`, leaving the cursor after it
    fn replace_current_word(&mut self, text: &str) {
        let before = self.current_word_before_cursor().chars().count();
        let after = self.current_word_after_cursor().chars().count();
        if after > 0 {
            self.adjust_text_position(after as isize);
        }
        let total = before + after;
        if total > 0 {
            self.delete_backward(total);
        }
        self.insert_text(text);
    }

    /// Trim trailing spaces and close the sentence with a period
    fn end_sentence(&mut self) {
        let before = self.context_before_input().unwrap_or_default();
        let trailing = before.chars().rev().take_while(|c| *c == ' ').count();
        if trailing > 0 {
            self.delete_backward(trailing);
        }
        self.insert_text(". ");
    }
}

impl<T: TextDocumentProxy + ?Sized> TextDocumentProxyExt for T {}

/// In-memory proxy backed by a `String` and a character cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferProxy {
    text: String,
    /// Cursor position in characters, not bytes
    cursor: usize,
}

impl BufferProxy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a proxy with the cursor at the end of `text`
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    /// Create a proxy with the cursor at a character position (clamped)
    pub fn with_cursor(text: impl Into<String>, cursor: usize) -> Self {
        let text = text.into();
        let cursor = cursor.min(text.chars().count());
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}

impl TextDocumentProxy for BufferProxy {
    fn context_before_input(&self) -> Option<String> {
        Some(self.text[..self.byte_index(self.cursor)].to_string())
    }

    fn context_after_input(&self) -> Option<String> {
        Some(self.text[self.byte_index(self.cursor)..].to_string())
    }

    fn insert_text(&mut self, text: &str) {
        let at = self.byte_index(self.cursor);
        self.text.insert_str(at, text);
        self.cursor += text.chars().count();
    }

    fn delete_backward(&mut self, times: usize) {
        let times = times.min(self.cursor);
        if times == 0 {
            return;
        }
        let start = self.byte_index(self.cursor - times);
        let end = self.byte_index(self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor -= times;
    }

    fn adjust_text_position(&mut self, offset: isize) {
        let len = self.text.chars().count() as isize;
        self.cursor = (self.cursor as isize + offset).clamp(0, len) as usize;
    }
}
