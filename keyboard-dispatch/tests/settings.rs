//! Settings loaded from JSON drive the engine

use keyboard_dispatch::prelude::*;
use keyboard_dispatch::testing::TestKeyboard;
use keyboard_dispatch::{assert_effect, assert_no_effect};
use serde_json::json;

fn settings(value: serde_json::Value) -> KeyboardSettings {
    KeyboardSettings::from_json(&value.to_string()).unwrap()
}

#[test]
fn test_settings_json_configures_handler() {
    let settings = settings(json!({
        "locale": "ckb",
        "autocapitalization": "none",
        "space_drag_sensitivity": "low",
        "feedback": {
            "audio": { "input": null, "delete": "delete", "system": null },
            "haptic": { "press": "heavy_impact" }
        }
    }));
    let mut keyboard = TestKeyboard::with_settings(settings, BufferProxy::with_text("abcdef"));

    let report = keyboard.press(&KeyboardAction::character("ھ"));
    assert_eq!(
        report.feedback(),
        vec![&Feedback::Haptic(HapticFeedback::HeavyImpact)]
    );

    let report = keyboard.release(&KeyboardAction::character("ھ"));
    assert_effect!(report, DispatchEffect::Replaced(_));
    assert_no_effect!(report, DispatchEffect::SwitchedKeyboardType(_));

    keyboard.long_press(&KeyboardAction::Space);
    keyboard.drag(DragPoint::new(0.0, 0.0), DragPoint::new(0.0, 0.0));
    assert_eq!(keyboard.drag(DragPoint::new(0.0, 0.0), DragPoint::new(24.0, 0.0)), Some(-2));
}

#[test]
fn test_short_end_sentence_threshold() {
    let settings = settings(json!({ "end_sentence_threshold_ms": 0 }));
    let mut keyboard = TestKeyboard::with_settings(settings, BufferProxy::with_text("done"));

    keyboard.tap(&KeyboardAction::Space);
    let report = keyboard.tap(&KeyboardAction::Space);

    assert_no_effect!(report, DispatchEffect::EndedSentence);
    assert_eq!(keyboard.text(), "done  ");
}

#[test]
fn test_settings_round_trip_through_json() {
    let mut original = KeyboardSettings {
        locales: vec!["en".to_string(), "de".to_string()],
        space_long_press_behavior: SpaceLongPressBehavior::OpenLocaleContextMenu,
        ..KeyboardSettings::default()
    };
    original.feedback.set_haptic_enabled(false);

    let json = original.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["space_long_press_behavior"], "open_locale_context_menu");

    let restored = KeyboardSettings::from_json(&json).unwrap();
    assert_eq!(restored.locales, original.locales);
    assert!(!restored.feedback.is_haptic_enabled());
    assert!(restored.feedback.is_audio_enabled());
}
