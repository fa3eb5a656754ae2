//! Keyboard settings
//!
//! Every field has a serde default, so a settings file only needs to name what
//! it changes:
//!
//! ```
//! use keyboard_dispatch_core::settings::KeyboardSettings;
//!
//! let settings = KeyboardSettings::from_json(r#"{ "locale": "tt" }"#).unwrap();
//! assert_eq!(settings.locale, "tt");
//! assert_eq!(settings.end_sentence_threshold_ms, 3000);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::autocomplete::AutocompleteContext;
use crate::behavior::{StandardKeyboardBehavior, DEFAULT_END_SENTENCE_THRESHOLD};
use crate::context::{Autocapitalization, KeyboardContext, SpaceLongPressBehavior};
use crate::controller::{shared, ControllerHandle};
use crate::feedback::FeedbackConfiguration;
use crate::handler::ActionHandler;
use crate::proxy::TextDocumentProxy;
use crate::space_drag::SpaceDragSensitivity;

fn default_locale() -> String {
    "en".to_string()
}

fn default_locales() -> Vec<String> {
    vec![default_locale()]
}

fn default_end_sentence_threshold_ms() -> u64 {
    DEFAULT_END_SENTENCE_THRESHOLD.as_millis() as u64
}

/// User-facing keyboard configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct KeyboardSettings {
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,
    #[serde(default)]
    pub space_long_press_behavior: SpaceLongPressBehavior,
    #[serde(default)]
    pub space_drag_sensitivity: SpaceDragSensitivity,
    #[serde(default)]
    pub autocapitalization: Autocapitalization,
    /// Maximum time between two space taps that end a sentence
    #[serde(default = "default_end_sentence_threshold_ms")]
    pub end_sentence_threshold_ms: u64,
    /// Assert (debug builds) when the handler outlives its controller
    #[serde(default)]
    pub assert_on_missing_controller: bool,
    #[serde(default)]
    pub feedback: FeedbackConfiguration,
}

impl Default for KeyboardSettings {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            locales: default_locales(),
            space_long_press_behavior: SpaceLongPressBehavior::default(),
            space_drag_sensitivity: SpaceDragSensitivity::default(),
            autocapitalization: Autocapitalization::default(),
            end_sentence_threshold_ms: default_end_sentence_threshold_ms(),
            assert_on_missing_controller: false,
            feedback: FeedbackConfiguration::default(),
        }
    }
}

impl KeyboardSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn end_sentence_threshold(&self) -> Duration {
        Duration::from_millis(self.end_sentence_threshold_ms)
    }

    /// A keyboard context around `proxy` configured from these settings
    pub fn build_context(&self, proxy: impl TextDocumentProxy + 'static) -> KeyboardContext {
        let mut context = KeyboardContext::new(proxy)
            .with_space_long_press_behavior(self.space_long_press_behavior)
            .with_autocapitalization(self.autocapitalization);
        context.locales = self.locales.clone();
        context.with_locale(self.locale.clone())
    }

    /// Build a fully wired handler, consuming the settings.
    ///
    /// The feedback configuration moves into the handler's shared state.
    pub fn into_handler(
        self,
        proxy: impl TextDocumentProxy + 'static,
        controller: ControllerHandle,
    ) -> ActionHandler {
        let context = self.build_context(proxy);
        let behavior = StandardKeyboardBehavior::new(self.end_sentence_threshold());
        let controller = controller.strict(self.assert_on_missing_controller);
        ActionHandler::new(
            shared(context),
            shared(AutocompleteContext::new()),
            shared(self.feedback),
            controller,
        )
        .with_behavior(behavior)
        .with_space_drag_sensitivity(self.space_drag_sensitivity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{AudioConfiguration, HapticConfiguration};
    use crate::proxy::BufferProxy;

    #[test]
    fn test_empty_json_is_default() {
        let settings = KeyboardSettings::from_json("{}").unwrap();
        assert_eq!(settings.locale, "en");
        assert_eq!(settings.locales, vec!["en"]);
        assert_eq!(settings.space_drag_sensitivity, SpaceDragSensitivity::Medium);
        assert_eq!(settings.end_sentence_threshold(), Duration::from_secs(3));
        assert!(settings.feedback.is_audio_enabled());
        assert_eq!(settings.feedback.haptic(), &HapticConfiguration::minimal());
    }

    #[test]
    fn test_partial_json() {
        let settings = KeyboardSettings::from_json(
            r#"{
                "locale": "ckb",
                "space_long_press_behavior": "open_locale_context_menu",
                "space_drag_sensitivity": { "custom": 6 }
            }"#,
        )
        .unwrap();
        assert_eq!(settings.locale, "ckb");
        assert_eq!(
            settings.space_long_press_behavior,
            SpaceLongPressBehavior::OpenLocaleContextMenu
        );
        assert_eq!(settings.space_drag_sensitivity, SpaceDragSensitivity::Custom(6));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(KeyboardSettings::from_json("{ \"locale\": 3 }").is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_feedback() {
        let mut settings = KeyboardSettings::default();
        settings.feedback.set_audio(AudioConfiguration::disabled());
        let json = settings.to_json().unwrap();

        let loaded = KeyboardSettings::from_json(&json).unwrap();
        assert!(!loaded.feedback.is_audio_enabled());
        assert_eq!(loaded.feedback.audio(), &AudioConfiguration::disabled());
    }

    #[test]
    fn test_build_context_adds_locale() {
        let settings = KeyboardSettings {
            locale: "de".to_string(),
            ..KeyboardSettings::default()
        };
        let context = settings.build_context(BufferProxy::new());
        assert_eq!(context.locale, "de");
        assert_eq!(context.locales, vec!["en", "de"]);
    }

    #[test]
    fn test_into_handler_applies_sensitivity() {
        let settings = KeyboardSettings {
            space_drag_sensitivity: SpaceDragSensitivity::High,
            ..KeyboardSettings::default()
        };
        let handler = settings.into_handler(BufferProxy::new(), ControllerHandle::detached());
        assert_eq!(handler.space_drag().sensitivity(), SpaceDragSensitivity::High);
    }
}
