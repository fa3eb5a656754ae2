//! Keyboard actions and their standard gesture effects
//!
//! A [`KeyboardAction`] is the logical identity of a key, independent of how
//! it is rendered. The same action can produce different effects depending on
//! the [`Gesture`] applied to it, see [`KeyboardAction::standard_effect`].

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::effect::GestureEffect;
use crate::gesture::Gesture;
use crate::proxy::is_word_delimiter;

/// The casing state of an alphabetic keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardCase {
    /// Casing is decided by autocapitalization
    #[default]
    Auto,
    Lowercased,
    /// One-shot uppercase, returns to lowercase after the next input
    Uppercased,
    CapsLocked,
}

/// The kind of keyboard currently presented
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "case")]
pub enum KeyboardType {
    Alphabetic(KeyboardCase),
    Numeric,
    Symbolic,
    Emojis,
}

impl Default for KeyboardType {
    fn default() -> Self {
        KeyboardType::Alphabetic(KeyboardCase::Lowercased)
    }
}

impl KeyboardType {
    /// Whether this is an alphabetic keyboard with the given case
    pub fn is_alphabetic_with(&self, case: KeyboardCase) -> bool {
        matches!(self, KeyboardType::Alphabetic(c) if *c == case)
    }

    pub fn is_alphabetic(&self) -> bool {
        matches!(self, KeyboardType::Alphabetic(_))
    }
}

/// The flavour of the primary (return) key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryKind {
    Return,
    NewLine,
    Done,
    Go,
    Search,
    Send,
}

/// An emoji that can be typed and registered as recently used
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Emoji {
    pub value: String,
}

impl Emoji {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

bitflags! {
    /// Classification bits used by the dispatch policies.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ActionTraits: u8 {
        /// Produces text input (audio class "input")
        const INPUT = 1 << 0;
        /// Controls the keyboard rather than typing (audio class "system")
        const SYSTEM = 1 << 1;
        /// Ends a word, so a pending autocorrect suggestion may be applied
        const APPLIES_AUTOCORRECT = 1 << 2;
        /// Removes a space left behind by an accepted suggestion
        const REMOVES_AUTOCOMPLETE_SPACE = 1 << 3;
        /// Restores a space removed by a previous action
        const REINSERTS_AUTOCOMPLETE_SPACE = 1 << 4;
    }
}

/// Closing punctuation that should attach to the previous word.
const CLOSING_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', ')', ']', '}', '»', '”', '’', '…',
];

/// Punctuation that is normally followed by a space.
const SPACING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

/// The logical identity of a key.
///
/// Equality is structural: two `Character` actions with the same text are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "value")]
pub enum KeyboardAction {
    #[default]
    None,
    Character(String),
    Backspace,
    Space,
    /// Shift key, carrying the case the keyboard had when it was laid out
    Shift(KeyboardCase),
    Primary(PrimaryKind),
    Tab,
    KeyboardType(KeyboardType),
    NextKeyboard,
    NextLocale,
    Emoji(Emoji),
    /// Resolved through the keyboard context's dictation replacement
    Dictation,
    MoveCursorBackward,
    MoveCursorForward,
    DismissKeyboard,
    Custom(String),
}

impl KeyboardAction {
    /// Shorthand for a `Character` action
    pub fn character(text: impl Into<String>) -> Self {
        KeyboardAction::Character(text.into())
    }

    /// Shorthand for an `Emoji` action
    pub fn emoji(value: impl Into<String>) -> Self {
        KeyboardAction::Emoji(Emoji::new(value))
    }

    /// Get the action name for logging
    pub fn name(&self) -> &'static str {
        match self {
            KeyboardAction::None => "None",
            KeyboardAction::Character(_) => "Character",
            KeyboardAction::Backspace => "Backspace",
            KeyboardAction::Space => "Space",
            KeyboardAction::Shift(_) => "Shift",
            KeyboardAction::Primary(_) => "Primary",
            KeyboardAction::Tab => "Tab",
            KeyboardAction::KeyboardType(_) => "KeyboardType",
            KeyboardAction::NextKeyboard => "NextKeyboard",
            KeyboardAction::NextLocale => "NextLocale",
            KeyboardAction::Emoji(_) => "Emoji",
            KeyboardAction::Dictation => "Dictation",
            KeyboardAction::MoveCursorBackward => "MoveCursorBackward",
            KeyboardAction::MoveCursorForward => "MoveCursorForward",
            KeyboardAction::DismissKeyboard => "DismissKeyboard",
            KeyboardAction::Custom(_) => "Custom",
        }
    }

    /// The single character of a `Character` action, if it is exactly one.
    fn single_char(&self) -> Option<char> {
        let KeyboardAction::Character(text) = self else {
            return None;
        };
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    /// Classification bits for this action
    pub fn traits(&self) -> ActionTraits {
        let mut traits = ActionTraits::empty();
        match self {
            KeyboardAction::Character(_) | KeyboardAction::Emoji(_) | KeyboardAction::Tab => {
                traits |= ActionTraits::INPUT;
            }
            KeyboardAction::Space => {
                traits |= ActionTraits::INPUT | ActionTraits::APPLIES_AUTOCORRECT;
            }
            KeyboardAction::Primary(_) => {
                traits |= ActionTraits::SYSTEM | ActionTraits::APPLIES_AUTOCORRECT;
            }
            KeyboardAction::Backspace => {
                traits |= ActionTraits::SYSTEM | ActionTraits::REINSERTS_AUTOCOMPLETE_SPACE;
            }
            KeyboardAction::Shift(_)
            | KeyboardAction::KeyboardType(_)
            | KeyboardAction::NextKeyboard
            | KeyboardAction::NextLocale
            | KeyboardAction::Dictation
            | KeyboardAction::MoveCursorBackward
            | KeyboardAction::MoveCursorForward
            | KeyboardAction::DismissKeyboard => {
                traits |= ActionTraits::SYSTEM;
            }
            KeyboardAction::None | KeyboardAction::Custom(_) => {}
        }

        if let Some(c) = self.single_char() {
            if is_word_delimiter(c) {
                traits |= ActionTraits::APPLIES_AUTOCORRECT;
            }
            if CLOSING_PUNCTUATION.contains(&c) {
                traits |= ActionTraits::REMOVES_AUTOCOMPLETE_SPACE;
            }
            if SPACING_PUNCTUATION.contains(&c) {
                traits |= ActionTraits::REINSERTS_AUTOCOMPLETE_SPACE;
            }
        }
        traits
    }

    pub fn is_input_action(&self) -> bool {
        self.traits().contains(ActionTraits::INPUT)
    }

    pub fn is_system_action(&self) -> bool {
        self.traits().contains(ActionTraits::SYSTEM)
    }

    pub fn should_apply_autocorrect_suggestion(&self) -> bool {
        self.traits().contains(ActionTraits::APPLIES_AUTOCORRECT)
    }

    pub fn should_remove_autocomplete_inserted_space(&self) -> bool {
        self.traits()
            .contains(ActionTraits::REMOVES_AUTOCOMPLETE_SPACE)
    }

    pub fn should_reinsert_autocomplete_removed_space(&self) -> bool {
        self.traits()
            .contains(ActionTraits::REINSERTS_AUTOCOMPLETE_SPACE)
    }

    /// The effect this action produces for a gesture when nothing overrides it.
    pub fn standard_effect(&self, gesture: Gesture) -> Option<GestureEffect> {
        match gesture {
            Gesture::Press => self.standard_press_effect(),
            Gesture::Release => self.standard_release_effect(),
            Gesture::LongPress => self.standard_long_press_effect(),
            Gesture::DoubleTap => self.standard_double_tap_effect(),
            Gesture::RepeatPress => self.standard_repeat_effect(),
        }
    }

    fn standard_press_effect(&self) -> Option<GestureEffect> {
        match self {
            KeyboardAction::Backspace => Some(GestureEffect::DeleteBackward),
            KeyboardAction::Shift(current) => {
                let case = match current {
                    KeyboardCase::Lowercased => KeyboardCase::Uppercased,
                    KeyboardCase::Auto | KeyboardCase::Uppercased | KeyboardCase::CapsLocked => {
                        KeyboardCase::Lowercased
                    }
                };
                Some(GestureEffect::SetKeyboardType(KeyboardType::Alphabetic(
                    case,
                )))
            }
            KeyboardAction::KeyboardType(keyboard_type) => {
                Some(GestureEffect::SetKeyboardType(keyboard_type.clone()))
            }
            KeyboardAction::MoveCursorBackward => Some(GestureEffect::MoveCursor(-1)),
            KeyboardAction::MoveCursorForward => Some(GestureEffect::MoveCursor(1)),
            _ => None,
        }
    }

    fn standard_release_effect(&self) -> Option<GestureEffect> {
        match self {
            KeyboardAction::Character(text) => Some(GestureEffect::InsertText(text.clone())),
            KeyboardAction::Emoji(emoji) => Some(GestureEffect::InsertText(emoji.value.clone())),
            KeyboardAction::Space => Some(GestureEffect::InsertText(" ".to_string())),
            KeyboardAction::Tab => Some(GestureEffect::InsertText("\t".to_string())),
            KeyboardAction::Primary(_) => Some(GestureEffect::InsertText("\n".to_string())),
            KeyboardAction::NextLocale => Some(GestureEffect::SelectNextLocale),
            KeyboardAction::NextKeyboard => Some(GestureEffect::NextKeyboard),
            KeyboardAction::DismissKeyboard => Some(GestureEffect::DismissKeyboard),
            KeyboardAction::Dictation => Some(GestureEffect::StartDictation),
            KeyboardAction::Custom(name) => Some(GestureEffect::Custom(name.clone())),
            _ => None,
        }
    }

    fn standard_long_press_effect(&self) -> Option<GestureEffect> {
        match self {
            KeyboardAction::Backspace => Some(GestureEffect::DeleteBackward),
            _ => None,
        }
    }

    fn standard_double_tap_effect(&self) -> Option<GestureEffect> {
        match self {
            KeyboardAction::Shift(_) => Some(GestureEffect::SetKeyboardType(
                KeyboardType::Alphabetic(KeyboardCase::CapsLocked),
            )),
            _ => None,
        }
    }

    fn standard_repeat_effect(&self) -> Option<GestureEffect> {
        match self {
            KeyboardAction::Backspace => Some(GestureEffect::DeleteBackward),
            KeyboardAction::MoveCursorBackward => Some(GestureEffect::MoveCursor(-1)),
            KeyboardAction::MoveCursorForward => Some(GestureEffect::MoveCursor(1)),
            _ => None,
        }
    }
}

impl std::fmt::Display for KeyboardAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyboardAction::Character(text) => write!(f, "Character({text:?})"),
            KeyboardAction::Emoji(emoji) => write!(f, "Emoji({})", emoji.value),
            KeyboardAction::Custom(name) => write!(f, "Custom({name})"),
            other => f.write_str(other.name()),
        }
    }
}
