//! Keyboard behavior policy
//!
//! Decides the secondary consequences of an action: whether a double space
//! closes the sentence, and which keyboard type should follow the action.

use std::time::{Duration, Instant};

use crate::action::{KeyboardAction, KeyboardCase, KeyboardType};
use crate::context::{Autocapitalization, KeyboardContext};
use crate::gesture::Gesture;
use crate::proxy::TextDocumentProxyExt;

/// Default window between two space releases that end a sentence
pub const DEFAULT_END_SENTENCE_THRESHOLD: Duration = Duration::from_secs(3);

/// Policy queried by the handler after an action has been applied.
pub trait KeyboardBehavior {
    /// Whether the sentence should be ended after this gesture.
    ///
    /// Takes `&mut self` so implementations can track gesture timing.
    fn should_end_sentence(
        &mut self,
        context: &KeyboardContext,
        gesture: Gesture,
        action: &KeyboardAction,
    ) -> bool;

    /// Whether the keyboard type should change after this gesture
    fn should_switch_keyboard_type(
        &self,
        context: &KeyboardContext,
        gesture: Gesture,
        action: &KeyboardAction,
    ) -> bool;

    /// The keyboard type that should follow this gesture
    fn preferred_keyboard_type(
        &self,
        context: &KeyboardContext,
        gesture: Gesture,
        action: &KeyboardAction,
    ) -> KeyboardType;
}

/// Double-space sentence ending, autocapitalization and one-shot shift.
#[derive(Debug, Clone)]
pub struct StandardKeyboardBehavior {
    end_sentence_threshold: Duration,
    last_space_release: Option<Instant>,
}

impl Default for StandardKeyboardBehavior {
    fn default() -> Self {
        Self::new(DEFAULT_END_SENTENCE_THRESHOLD)
    }
}

impl StandardKeyboardBehavior {
    pub fn new(end_sentence_threshold: Duration) -> Self {
        Self {
            end_sentence_threshold,
            last_space_release: None,
        }
    }

    pub fn end_sentence_threshold(&self) -> Duration {
        self.end_sentence_threshold
    }

    /// The alphabetic case autocapitalization asks for at the cursor
    fn auto_case(context: &KeyboardContext) -> KeyboardCase {
        let at_new_sentence = context.proxy().is_cursor_at_new_sentence();
        match context.autocapitalization {
            Autocapitalization::Sentences if at_new_sentence => KeyboardCase::Uppercased,
            _ => KeyboardCase::Lowercased,
        }
    }
}

impl KeyboardBehavior for StandardKeyboardBehavior {
    fn should_end_sentence(
        &mut self,
        context: &KeyboardContext,
        gesture: Gesture,
        action: &KeyboardAction,
    ) -> bool {
        if gesture != Gesture::Release {
            return false;
        }
        if *action != KeyboardAction::Space {
            self.last_space_release = None;
            return false;
        }

        let now = Instant::now();
        let is_repeated_tap = self
            .last_space_release
            .is_some_and(|last| now.duration_since(last) < self.end_sentence_threshold);
        self.last_space_release = Some(now);
        if !is_repeated_tap {
            return false;
        }

        let proxy = context.proxy();
        let is_closable = proxy
            .context_before_input()
            .is_some_and(|before| before.ends_with("  "));
        let should_end = proxy.is_cursor_at_new_word() && !proxy.is_cursor_at_new_sentence() && is_closable;
        if should_end {
            // A third space starts a fresh double-tap window
            self.last_space_release = None;
        }
        should_end
    }

    fn should_switch_keyboard_type(
        &self,
        context: &KeyboardContext,
        gesture: Gesture,
        action: &KeyboardAction,
    ) -> bool {
        if gesture != Gesture::Release || matches!(action, KeyboardAction::Shift(_)) {
            return false;
        }
        self.preferred_keyboard_type(context, gesture, action) != context.keyboard_type
    }

    fn preferred_keyboard_type(
        &self,
        context: &KeyboardContext,
        _gesture: Gesture,
        action: &KeyboardAction,
    ) -> KeyboardType {
        let current = &context.keyboard_type;
        match current {
            KeyboardType::Alphabetic(KeyboardCase::CapsLocked) => current.clone(),
            KeyboardType::Alphabetic(_) => {
                if matches!(action, KeyboardAction::Shift(_)) {
                    current.clone()
                } else {
                    KeyboardType::Alphabetic(Self::auto_case(context))
                }
            }
            KeyboardType::Numeric | KeyboardType::Symbolic => match action {
                KeyboardAction::Space | KeyboardAction::Primary(_) => {
                    KeyboardType::Alphabetic(Self::auto_case(context))
                }
                _ => current.clone(),
            },
            KeyboardType::Emojis => current.clone(),
        }
    }
}
