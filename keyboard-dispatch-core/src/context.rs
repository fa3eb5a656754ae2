//! The ambient keyboard environment shared by the handler and its policies

use serde::{Deserialize, Serialize};

use crate::action::{KeyboardAction, KeyboardType};
use crate::proxy::{BufferProxy, TextDocumentProxy, TextDocumentProxyExt};

/// What a long press on the space key does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceLongPressBehavior {
    /// Dragging after the long press moves the input cursor
    #[default]
    MoveInputCursor,
    /// The long press opens a locale menu; drags are ignored
    OpenLocaleContextMenu,
}

/// Automatic capitalization mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Autocapitalization {
    None,
    #[default]
    Sentences,
}

/// Language codes written right to left.
const RTL_LANGUAGES: &[&str] = &["ar", "ckb", "dv", "fa", "he", "ps", "sd", "ug", "ur", "yi"];

/// Primary and alternate quotation marks of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotationMarks {
    pub begin: &'static str,
    pub end: &'static str,
    pub alternate_begin: &'static str,
    pub alternate_end: &'static str,
}

impl QuotationMarks {
    const ENGLISH: Self = Self {
        begin: "“",
        end: "”",
        alternate_begin: "‘",
        alternate_end: "’",
    };

    /// Quotation marks for a locale identifier such as `de-CH` or `ckb_IQ`
    pub fn for_locale(locale: &str) -> Self {
        match language_code(locale) {
            "de" => Self {
                begin: "„",
                end: "“",
                alternate_begin: "‚",
                alternate_end: "‘",
            },
            "fr" => Self {
                begin: "«",
                end: "»",
                alternate_begin: "“",
                alternate_end: "”",
            },
            "ru" | "tt" | "uk" | "ba" => Self {
                begin: "«",
                end: "»",
                alternate_begin: "„",
                alternate_end: "“",
            },
            "ckb" | "ar" | "fa" => Self {
                begin: "«",
                end: "»",
                alternate_begin: "‹",
                alternate_end: "›",
            },
            _ => Self::ENGLISH,
        }
    }
}

/// The language part of a locale identifier
pub fn language_code(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}

/// Whether `text` contains an opening mark that has not been closed yet
fn has_open_quotation(text: &str, begin: &str, end: &str) -> bool {
    text.matches(begin).count() > text.matches(end).count()
}

/// Keyboard environment: locale, keyboard type, space-drag flag and the text proxy.
pub struct KeyboardContext {
    proxy: Box<dyn TextDocumentProxy>,
    /// Active locale identifier, e.g. `en-US` or `ckb`
    pub locale: String,
    /// Locales available for next-locale cycling
    pub locales: Vec<String>,
    pub keyboard_type: KeyboardType,
    pub space_long_press_behavior: SpaceLongPressBehavior,
    pub autocapitalization: Autocapitalization,
    /// Action that stands in for the dictation key, if any
    pub dictation_replacement: Option<KeyboardAction>,
    is_space_drag_gesture_active: bool,
}

impl std::fmt::Debug for KeyboardContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyboardContext")
            .field("locale", &self.locale)
            .field("keyboard_type", &self.keyboard_type)
            .field("space_long_press_behavior", &self.space_long_press_behavior)
            .field("is_space_drag_gesture_active", &self.is_space_drag_gesture_active)
            .finish_non_exhaustive()
    }
}

impl Default for KeyboardContext {
    fn default() -> Self {
        Self::new(BufferProxy::new())
    }
}

impl KeyboardContext {
    /// Create a context around a text proxy, with an `en` locale
    pub fn new(proxy: impl TextDocumentProxy + 'static) -> Self {
        Self {
            proxy: Box::new(proxy),
            locale: "en".to_string(),
            locales: vec!["en".to_string()],
            keyboard_type: KeyboardType::default(),
            space_long_press_behavior: SpaceLongPressBehavior::default(),
            autocapitalization: Autocapitalization::default(),
            dictation_replacement: None,
            is_space_drag_gesture_active: false,
        }
    }

    /// Set the active locale, adding it to the available locales if missing
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        let locale = locale.into();
        if !self.locales.contains(&locale) {
            self.locales.push(locale.clone());
        }
        self.locale = locale;
        self
    }

    pub fn with_space_long_press_behavior(mut self, behavior: SpaceLongPressBehavior) -> Self {
        self.space_long_press_behavior = behavior;
        self
    }

    pub fn with_autocapitalization(mut self, mode: Autocapitalization) -> Self {
        self.autocapitalization = mode;
        self
    }

    pub fn proxy(&self) -> &dyn TextDocumentProxy {
        self.proxy.as_ref()
    }

    pub fn proxy_mut(&mut self) -> &mut dyn TextDocumentProxy {
        self.proxy.as_mut()
    }

    /// Swap the text proxy, e.g. when the host focuses another text field
    pub fn set_proxy(&mut self, proxy: impl TextDocumentProxy + 'static) {
        self.proxy = Box::new(proxy);
    }

    pub fn is_space_drag_gesture_active(&self) -> bool {
        self.is_space_drag_gesture_active
    }

    pub fn set_space_drag_gesture_active(&mut self, active: bool) {
        self.is_space_drag_gesture_active = active;
    }

    pub fn is_cursor_at_new_word(&self) -> bool {
        self.proxy().is_cursor_at_new_word()
    }

    /// Whether the active locale is written right to left
    pub fn is_rtl_locale(&self) -> bool {
        RTL_LANGUAGES.contains(&language_code(&self.locale))
    }

    /// Cycle to the next available locale
    pub fn select_next_locale(&mut self) {
        if self.locales.is_empty() {
            return;
        }
        let next = match self.locales.iter().position(|l| *l == self.locale) {
            Some(index) => (index + 1) % self.locales.len(),
            None => 0,
        };
        self.locale = self.locales[next].clone();
    }

    /// Close the current sentence in the text proxy
    pub fn end_sentence(&mut self) {
        self.proxy.end_sentence();
    }

    /// Resolve the dictation key to its configured replacement
    pub fn resolve_dictation(&self, action: KeyboardAction) -> KeyboardAction {
        match (&action, &self.dictation_replacement) {
            (KeyboardAction::Dictation, Some(replacement)) => replacement.clone(),
            _ => action,
        }
    }

    /// Locale-aware smart quote for a typed straight quote.
    ///
    /// Returns `None` when the typed text should be kept as is.
    pub fn preferred_quotation_replacement(&self, text: &str) -> Option<String> {
        let marks = QuotationMarks::for_locale(&self.locale);
        let before = self.proxy().context_before_input().unwrap_or_default();
        let replacement = match text {
            "\"" => {
                if has_open_quotation(&before, marks.begin, marks.end) {
                    marks.end
                } else {
                    marks.begin
                }
            }
            "'" => {
                if has_open_quotation(&before, marks.alternate_begin, marks.alternate_end) {
                    marks.alternate_end
                } else if self.is_cursor_at_new_word() {
                    marks.alternate_begin
                } else {
                    return None;
                }
            }
            _ => return None,
        };
        (replacement != text).then(|| replacement.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_code() {
        assert_eq!(language_code("en-US"), "en");
        assert_eq!(language_code("ckb_IQ"), "ckb");
        assert_eq!(language_code("tt"), "tt");
    }

    #[test]
    fn test_rtl_detection() {
        assert!(KeyboardContext::default().with_locale("ckb").is_rtl_locale());
        assert!(KeyboardContext::default().with_locale("ar-SA").is_rtl_locale());
        assert!(!KeyboardContext::default().is_rtl_locale());
    }

    #[test]
    fn test_select_next_locale_cycles() {
        let mut context = KeyboardContext::default().with_locale("tt");
        assert_eq!(context.locales, vec!["en", "tt"]);

        context.select_next_locale();
        assert_eq!(context.locale, "en");
        context.select_next_locale();
        assert_eq!(context.locale, "tt");
    }

    #[test]
    fn test_quotation_opens_and_closes() {
        let context = KeyboardContext::new(BufferProxy::with_text("say "));
        assert_eq!(
            context.preferred_quotation_replacement("\""),
            Some("“".to_string())
        );

        let context = KeyboardContext::new(BufferProxy::with_text("say “hi"));
        assert_eq!(
            context.preferred_quotation_replacement("\""),
            Some("”".to_string())
        );
    }

    #[test]
    fn test_quotation_uses_locale_marks() {
        let context = KeyboardContext::new(BufferProxy::new()).with_locale("de");
        assert_eq!(
            context.preferred_quotation_replacement("\""),
            Some("„".to_string())
        );

        let context = KeyboardContext::new(BufferProxy::with_text("«salam")).with_locale("tt");
        assert_eq!(
            context.preferred_quotation_replacement("\""),
            Some("»".to_string())
        );
    }

    #[test]
    fn test_apostrophe_inside_word_is_kept() {
        let context = KeyboardContext::new(BufferProxy::with_text("don"));
        assert_eq!(context.preferred_quotation_replacement("'"), None);

        let context = KeyboardContext::new(BufferProxy::with_text("a "));
        assert_eq!(
            context.preferred_quotation_replacement("'"),
            Some("‘".to_string())
        );
    }

    #[test]
    fn test_other_text_is_not_replaced() {
        let context = KeyboardContext::default();
        assert_eq!(context.preferred_quotation_replacement("a"), None);
    }

    #[test]
    fn test_resolve_dictation() {
        let mut context = KeyboardContext::default();
        assert_eq!(
            context.resolve_dictation(KeyboardAction::Dictation),
            KeyboardAction::Dictation
        );

        context.dictation_replacement = Some(KeyboardAction::emoji("🎤"));
        assert_eq!(
            context.resolve_dictation(KeyboardAction::Dictation),
            KeyboardAction::emoji("🎤")
        );
        assert_eq!(
            context.resolve_dictation(KeyboardAction::Space),
            KeyboardAction::Space
        );
    }
}
