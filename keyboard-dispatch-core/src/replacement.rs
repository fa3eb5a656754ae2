//! Replacement actions
//!
//! A replacement is a locale- or context-driven substitute for the action that
//! was actually gestured on. The handler dispatches the substitute as a
//! release in place of the original, and never asks for a replacement of a
//! replacement.

use crate::action::KeyboardAction;
use crate::context::KeyboardContext;
use crate::gesture::Gesture;

/// Provides an optional substitute action. Implementations are read-only.
pub trait ReplacementResolver {
    fn replacement_action(
        &self,
        context: &KeyboardContext,
        gesture: Gesture,
        action: &KeyboardAction,
    ) -> Option<KeyboardAction>;
}

/// Substitute one character for another under a locale prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleReplacement {
    /// Matched against the start of the locale identifier
    pub locale_prefix: String,
    pub from: String,
    pub to: String,
}

impl LocaleReplacement {
    pub fn new(
        locale_prefix: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            locale_prefix: locale_prefix.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    fn apply(&self, locale: &str, action: &KeyboardAction) -> Option<KeyboardAction> {
        match action {
            KeyboardAction::Character(text)
                if locale.starts_with(&self.locale_prefix) && *text == self.from =>
            {
                Some(KeyboardAction::Character(self.to.clone()))
            }
            _ => None,
        }
    }
}

/// Smart quotes first, then the locale rule table. Release gestures only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardReplacementResolver {
    rules: Vec<LocaleReplacement>,
}

impl Default for StandardReplacementResolver {
    fn default() -> Self {
        Self {
            // Central Kurdish uses the plain heh in place of the Arabic heh doachashmee
            rules: vec![LocaleReplacement::new("ckb", "ھ", "ه")],
        }
    }
}

impl StandardReplacementResolver {
    pub fn new(rules: Vec<LocaleReplacement>) -> Self {
        Self { rules }
    }

    /// Add a rule after the existing ones
    pub fn with_rule(mut self, rule: LocaleReplacement) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[LocaleReplacement] {
        &self.rules
    }
}

impl ReplacementResolver for StandardReplacementResolver {
    fn replacement_action(
        &self,
        context: &KeyboardContext,
        gesture: Gesture,
        action: &KeyboardAction,
    ) -> Option<KeyboardAction> {
        if gesture != Gesture::Release {
            return None;
        }
        if let KeyboardAction::Character(text) = action {
            if let Some(quote) = context.preferred_quotation_replacement(text) {
                return Some(KeyboardAction::Character(quote));
            }
        }
        self.rules
            .iter()
            .find_map(|rule| rule.apply(&context.locale, action))
    }
}
