//! Autocomplete consumption
//!
//! Suggestions are produced elsewhere (the host controller refreshes them on
//! request). This module only stores them and applies them to the text proxy,
//! keeping track of the single space an accepted suggestion may leave behind:
//!
//! - accepting a suggestion inserts the word plus one trailing space and
//!   records that space as *inserted*
//! - typing closing punctuation right after removes that space again and
//!   records it as *removed*
//! - spacing punctuation or a backspace afterwards puts it back

use serde::{Deserialize, Serialize};

use crate::context::KeyboardContext;
use crate::proxy::TextDocumentProxyExt;

/// A single autocomplete candidate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Suggestion {
    /// Text inserted when the suggestion is accepted
    pub text: String,
    /// Text displayed in the suggestion bar
    pub title: String,
    /// May be applied automatically at the end of a word
    #[serde(default)]
    pub is_autocorrect: bool,
    /// The typed word is not in the dictionary
    #[serde(default)]
    pub is_unknown: bool,
    #[serde(default)]
    pub subtitle: Option<String>,
}

impl Suggestion {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            title: text.clone(),
            text,
            ..Default::default()
        }
    }

    /// Flag this suggestion as the autocorrect candidate
    pub fn autocorrect(mut self) -> Self {
        self.is_autocorrect = true;
        self
    }

    pub fn unknown(mut self) -> Self {
        self.is_unknown = true;
        self
    }
}

/// Current suggestions and the inserted/removed space bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutocompleteContext {
    suggestions: Vec<Suggestion>,
    inserted_space: bool,
    removed_space: bool,
}

impl AutocompleteContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Replace the suggestions.
    ///
    /// Only the first autocorrect-flagged suggestion keeps its flag.
    pub fn set_suggestions(&mut self, suggestions: Vec<Suggestion>) {
        let mut seen_autocorrect = false;
        self.suggestions = suggestions
            .into_iter()
            .map(|mut suggestion| {
                if suggestion.is_autocorrect {
                    suggestion.is_autocorrect = !seen_autocorrect;
                    seen_autocorrect = true;
                }
                suggestion
            })
            .collect();
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
    }

    /// The suggestion flagged for automatic application, if any
    pub fn autocorrect_suggestion(&self) -> Option<&Suggestion> {
        self.suggestions.iter().find(|s| s.is_autocorrect)
    }

    /// Whether the last accepted suggestion left a trailing space behind
    pub fn has_inserted_space(&self) -> bool {
        self.inserted_space
    }

    /// Whether that space was later removed and can be restored
    pub fn has_removed_space(&self) -> bool {
        self.removed_space
    }
}

/// Replace the current word with a suggestion.
///
/// With `try_insert_space`, one trailing space is added unless the text after
/// the cursor already starts with one; the space is recorded as inserted.
pub fn insert_suggestion(
    autocomplete: &mut AutocompleteContext,
    keyboard: &mut KeyboardContext,
    suggestion: &Suggestion,
    try_insert_space: bool,
) {
    let proxy = keyboard.proxy_mut();
    proxy.replace_current_word(&suggestion.text);
    autocomplete.removed_space = false;
    autocomplete.inserted_space = false;
    if !try_insert_space {
        return;
    }
    let after = proxy.context_after_input().unwrap_or_default();
    if after.starts_with(' ') {
        proxy.adjust_text_position(1);
    } else {
        proxy.insert_text(" ");
    }
    autocomplete.inserted_space = true;
}

/// Insert an autocorrect suggestion in place of the current word, without a trailing space.
pub fn apply_autocorrect(
    autocomplete: &mut AutocompleteContext,
    keyboard: &mut KeyboardContext,
    suggestion: &Suggestion,
) {
    insert_suggestion(autocomplete, keyboard, suggestion, false);
}

/// Remove the space left by the last accepted suggestion.
///
/// Returns `true` if a space was actually deleted. The inserted-space flag is
/// cleared either way.
pub fn remove_inserted_space(
    autocomplete: &mut AutocompleteContext,
    keyboard: &mut KeyboardContext,
) -> bool {
    if !autocomplete.inserted_space {
        return false;
    }
    autocomplete.inserted_space = false;
    let proxy = keyboard.proxy_mut();
    let before = proxy.context_before_input().unwrap_or_default();
    if !before.ends_with(' ') {
        return false;
    }
    proxy.delete_backward(1);
    autocomplete.removed_space = true;
    true
}

/// Restore a space removed by [`remove_inserted_space`].
///
/// Returns `true` if a space was inserted. The removed-space flag is cleared either way.
pub fn reinsert_removed_space(
    autocomplete: &mut AutocompleteContext,
    keyboard: &mut KeyboardContext,
) -> bool {
    if !autocomplete.removed_space {
        return false;
    }
    autocomplete.removed_space = false;
    let proxy = keyboard.proxy_mut();
    let before = proxy.context_before_input().unwrap_or_default();
    if before.is_empty() || before.ends_with(' ') {
        return false;
    }
    proxy.insert_text(" ");
    true
}
