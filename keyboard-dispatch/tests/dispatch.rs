//! Dispatch pipeline ordering, replacement and autocomplete tests

use std::cell::Cell;
use std::rc::Rc;

use keyboard_dispatch::prelude::*;
use keyboard_dispatch::testing::{ControllerCall, RecordingController, TestKeyboard};
use keyboard_dispatch::{
    assert_effect, assert_effect_order, assert_no_effect, count_effects, find_effect,
};

/// Replaces every `a` with `b` and every `b` with `c`, for any gesture
struct ChainReplacement;

impl ReplacementResolver for ChainReplacement {
    fn replacement_action(
        &self,
        _context: &KeyboardContext,
        _gesture: Gesture,
        action: &KeyboardAction,
    ) -> Option<KeyboardAction> {
        match action {
            KeyboardAction::Character(c) if c == "a" => Some(KeyboardAction::character("b")),
            KeyboardAction::Character(c) if c == "b" => Some(KeyboardAction::character("c")),
            _ => None,
        }
    }
}

fn handler_with(controller: &Rc<RecordingController>, text: &str) -> ActionHandler {
    let keyboard = KeyboardContext::new(BufferProxy::with_text(text))
        .with_autocapitalization(Autocapitalization::None);
    ActionHandler::new(
        shared(keyboard),
        shared(AutocompleteContext::new()),
        shared(FeedbackConfiguration::default()),
        ControllerHandle::new(controller),
    )
}

fn text_of(handler: &ActionHandler) -> String {
    handler
        .keyboard_context()
        .borrow()
        .proxy()
        .context_before_input()
        .unwrap_or_default()
}

#[test]
fn test_replacement_is_never_chained() {
    let controller = Rc::new(RecordingController::new());
    let mut handler = handler_with(&controller, "").with_replacement_resolver(ChainReplacement);

    let report = handler.handle(Gesture::Release, &KeyboardAction::character("a"));

    assert_eq!(count_effects!(report, DispatchEffect::Replaced(_)), 1);
    assert_eq!(text_of(&handler), "b");
}

#[test]
fn test_replacement_runs_substitute_as_release() {
    let controller = Rc::new(RecordingController::new());
    let mut handler = handler_with(&controller, "").with_replacement_resolver(ChainReplacement);

    // The substitute is released even though the original was pressed
    let report = handler.handle(Gesture::Press, &KeyboardAction::character("a"));

    assert_effect_order!(report, [
        DispatchEffect::Replaced(_),
        DispatchEffect::Applied(GestureEffect::InsertText(t)) if t == "b",
        DispatchEffect::RequestedAutocomplete,
    ]);
    assert_no_effect!(report, DispatchEffect::Feedback(_));
}

#[test]
fn test_standard_replacement_only_on_release() {
    let settings = KeyboardSettings {
        locale: "ckb".to_string(),
        ..KeyboardSettings::default()
    };
    let mut keyboard = TestKeyboard::with_settings(settings, BufferProxy::new());
    let heh = KeyboardAction::character("ھ");

    for gesture in [
        Gesture::Press,
        Gesture::LongPress,
        Gesture::DoubleTap,
        Gesture::RepeatPress,
    ] {
        let report = keyboard.handle(gesture, &heh);
        assert_no_effect!(report, DispatchEffect::Replaced(_));
    }
    let report = keyboard.handle(Gesture::Release, &heh);
    assert_effect!(report, DispatchEffect::Replaced(_));
}

#[test]
fn test_smart_quotes_open_and_close() {
    let mut keyboard = TestKeyboard::new();
    keyboard.release(&KeyboardAction::character("\""));
    keyboard.type_text("hi");
    keyboard.release(&KeyboardAction::character("\""));

    assert_eq!(keyboard.text(), "“hi”");
}

#[test]
fn test_feedback_fires_on_press_not_release() {
    let mut keyboard = TestKeyboard::with_text("helo");
    keyboard.set_suggestions(vec![Suggestion::new("hello").autocorrect()]);

    let press = keyboard.press(&KeyboardAction::Space);
    assert_eq!(
        press.effects,
        vec![
            DispatchEffect::Feedback(Feedback::Audio(AudioFeedback::Input)),
            DispatchEffect::Feedback(Feedback::Haptic(HapticFeedback::LightImpact)),
        ]
    );

    let release = keyboard.release(&KeyboardAction::Space);
    assert_no_effect!(release, DispatchEffect::Feedback(_));
    assert_eq!(
        release.names(),
        vec!["AppliedAutocorrect", "Applied", "RequestedAutocomplete"]
    );
}

#[test]
fn test_autocorrect_leaves_suggestions_to_the_controller() {
    let mut keyboard = TestKeyboard::with_text("helo");
    keyboard.set_suggestions(vec![
        Suggestion::new("hello").autocorrect(),
        Suggestion::new("help"),
    ]);

    let report = keyboard.tap(&KeyboardAction::Space);

    assert_effect!(report, DispatchEffect::AppliedAutocorrect(text) if text == "hello");
    assert_eq!(keyboard.text(), "hello ");
    let autocomplete = keyboard.handler.autocomplete_context().borrow();
    let titles: Vec<&str> = autocomplete.suggestions().iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["hello", "help"]);
}

#[test]
fn test_backspace_acts_on_press() {
    let mut keyboard = TestKeyboard::with_text("abc");

    let press = keyboard.press(&KeyboardAction::Backspace);
    assert_effect_order!(press, [
        DispatchEffect::Feedback(Feedback::Audio(AudioFeedback::Delete)),
        DispatchEffect::Applied(GestureEffect::DeleteBackward),
        DispatchEffect::RequestedAutocomplete,
    ]);

    let release = keyboard.release(&KeyboardAction::Backspace);
    assert!(!release.has_effects());
    assert_eq!(keyboard.text(), "ab");
}

#[test]
fn test_autocorrect_requires_every_condition() {
    fn autocorrected(
        text: &str,
        cursor: usize,
        gesture: Gesture,
        action: KeyboardAction,
        flagged: bool,
    ) -> bool {
        let proxy = BufferProxy::with_cursor(text, cursor);
        let mut keyboard = TestKeyboard::with_settings(KeyboardSettings::default(), proxy);
        let suggestion = Suggestion::new("hello");
        let suggestion = if flagged { suggestion.autocorrect() } else { suggestion };
        keyboard.set_suggestions(vec![suggestion]);
        let report = keyboard.handle(gesture, &action);
        find_effect!(report, DispatchEffect::AppliedAutocorrect(_)).is_some()
    }

    assert!(autocorrected("helo", 4, Gesture::Release, KeyboardAction::Space, true));
    assert!(autocorrected("helo", 4, Gesture::Release, KeyboardAction::character(","), true));

    // Not a release
    assert!(!autocorrected("helo", 4, Gesture::Press, KeyboardAction::Space, true));
    // Action does not end a word
    assert!(!autocorrected("helo", 4, Gesture::Release, KeyboardAction::character("x"), true));
    // Cursor inside the word
    assert!(!autocorrected("helo", 2, Gesture::Release, KeyboardAction::Space, true));
    // Cursor at a new word
    assert!(!autocorrected("helo ", 5, Gesture::Release, KeyboardAction::Space, true));
    // No flagged suggestion
    assert!(!autocorrected("helo", 4, Gesture::Release, KeyboardAction::Space, false));
}

#[test]
fn test_accepted_suggestion_space_moves_behind_punctuation() {
    let mut keyboard = TestKeyboard::with_text("I said helo");

    let report = keyboard.select_suggestion(&Suggestion::new("hello"));
    assert_effect!(report, DispatchEffect::RequestedAutocomplete);
    assert_eq!(keyboard.text(), "I said hello ");

    let report = keyboard.release(&KeyboardAction::character("."));
    assert_effect_order!(report, [
        DispatchEffect::RemovedAutocompleteSpace,
        DispatchEffect::Applied(GestureEffect::InsertText(t)) if t == ".",
        DispatchEffect::ReinsertedAutocompleteSpace,
        DispatchEffect::RequestedAutocomplete,
    ]);
    assert_eq!(keyboard.text(), "I said hello. ");
}

#[test]
fn test_closing_bracket_holds_space_for_next_punctuation() {
    let mut keyboard = TestKeyboard::with_text("(helo");
    keyboard.select_suggestion(&Suggestion::new("hello"));

    let report = keyboard.release(&KeyboardAction::character(")"));
    assert_effect!(report, DispatchEffect::RemovedAutocompleteSpace);
    assert_no_effect!(report, DispatchEffect::ReinsertedAutocompleteSpace);
    assert_eq!(keyboard.text(), "(hello)");

    let report = keyboard.release(&KeyboardAction::character("."));
    assert_no_effect!(report, DispatchEffect::RemovedAutocompleteSpace);
    assert_effect!(report, DispatchEffect::ReinsertedAutocompleteSpace);
    assert_eq!(keyboard.text(), "(hello). ");
}

#[test]
fn test_backspace_restores_removed_space() {
    let mut keyboard = TestKeyboard::with_text("(helo");
    keyboard.select_suggestion(&Suggestion::new("hello"));
    keyboard.release(&KeyboardAction::character(")"));
    assert_eq!(keyboard.text(), "(hello)");

    let report = keyboard.press(&KeyboardAction::Backspace);
    assert_effect_order!(report, [
        DispatchEffect::Applied(GestureEffect::DeleteBackward),
        DispatchEffect::ReinsertedAutocompleteSpace,
    ]);
    assert_eq!(keyboard.text(), "(hello ");

    // The space comes back once only
    keyboard.press(&KeyboardAction::Backspace);
    assert_eq!(keyboard.text(), "(hello");
}

#[test]
fn test_post_effects_order() {
    let mut keyboard = TestKeyboard::with_text("So");
    keyboard.tap(&KeyboardAction::Space);

    let report = keyboard.release(&KeyboardAction::Space);
    assert_effect_order!(report, [
        DispatchEffect::Applied(_),
        DispatchEffect::EndedSentence,
        DispatchEffect::SwitchedKeyboardType(KeyboardType::Alphabetic(KeyboardCase::Uppercased)),
        DispatchEffect::RequestedAutocomplete,
    ]);
    assert_eq!(keyboard.text(), "So. ");
}

#[test]
fn test_one_shot_shift() {
    let mut keyboard = TestKeyboard::with_text("say ");

    keyboard.tap(&KeyboardAction::Shift(KeyboardCase::Lowercased));
    assert_eq!(
        keyboard.keyboard_type(),
        KeyboardType::Alphabetic(KeyboardCase::Uppercased)
    );

    let report = keyboard.tap(&KeyboardAction::character("H"));
    assert_effect!(
        report,
        DispatchEffect::SwitchedKeyboardType(KeyboardType::Alphabetic(KeyboardCase::Lowercased))
    );
    assert_eq!(keyboard.text(), "say H");
}

#[test]
fn test_emoji_release_registers_emoji() {
    let mut keyboard = TestKeyboard::new();

    let press = keyboard.press(&KeyboardAction::emoji("🎉"));
    assert_no_effect!(press, DispatchEffect::RegisteredEmoji(_));

    let release = keyboard.release(&KeyboardAction::emoji("🎉"));
    assert_effect_order!(release, [
        DispatchEffect::Applied(_),
        DispatchEffect::RequestedAutocomplete,
        DispatchEffect::RegisteredEmoji(emoji) if emoji.value == "🎉",
    ]);
    assert_eq!(*keyboard.emojis.borrow(), vec![Emoji::new("🎉")]);
    assert_eq!(keyboard.text(), "🎉");
}

#[test]
fn test_controller_actions() {
    let mut keyboard = TestKeyboard::new();
    keyboard.release(&KeyboardAction::NextKeyboard);
    keyboard.release(&KeyboardAction::DismissKeyboard);
    keyboard.release(&KeyboardAction::Custom("globe".into()));

    assert_eq!(
        keyboard.controller.take_calls(),
        vec![
            ControllerCall::SelectNextKeyboard,
            ControllerCall::PerformAutocomplete,
            ControllerCall::DismissKeyboard,
            ControllerCall::PerformAutocomplete,
            ControllerCall::Custom("globe".into()),
            ControllerCall::PerformAutocomplete,
        ]
    );
}

#[test]
fn test_dictation_without_replacement_reaches_controller() {
    let mut keyboard = TestKeyboard::new();
    keyboard.release(&KeyboardAction::Dictation);
    assert_eq!(keyboard.controller.count(&ControllerCall::StartDictation), 1);
}

#[test]
fn test_next_locale_cycles_context() {
    let settings = KeyboardSettings {
        locales: vec!["en".to_string(), "tt".to_string()],
        ..KeyboardSettings::default()
    };
    let mut keyboard = TestKeyboard::with_settings(settings, BufferProxy::new());

    keyboard.release(&KeyboardAction::NextLocale);
    assert_eq!(keyboard.handler.keyboard_context().borrow().locale, "tt");
}

#[test]
fn test_dead_controller_is_skipped() {
    let controller = Rc::new(RecordingController::new());
    let mut handler = handler_with(&controller, "");
    drop(controller);

    let report = handler.handle(Gesture::Release, &KeyboardAction::character("a"));
    assert_effect!(report, DispatchEffect::Applied(_));
    assert_no_effect!(report, DispatchEffect::RequestedAutocomplete);
    assert_eq!(text_of(&handler), "a");

    // Controller-backed effects still count as applied, the call is just dropped
    let report = handler.handle(Gesture::Release, &KeyboardAction::DismissKeyboard);
    assert_effect!(report, DispatchEffect::Applied(GestureEffect::DismissKeyboard));
}

#[test]
fn test_controller_may_borrow_shared_state() {
    struct SuggestingController {
        keyboard: Shared<KeyboardContext>,
        autocomplete: Shared<AutocompleteContext>,
    }

    impl KeyboardController for SuggestingController {
        fn perform_autocomplete(&self) {
            let word = self.keyboard.borrow().proxy().current_word_before_cursor();
            let suggestions = if word == "helo" {
                vec![Suggestion::new("hello").autocorrect()]
            } else {
                Vec::new()
            };
            self.autocomplete.borrow_mut().set_suggestions(suggestions);
        }
    }

    let keyboard = shared(KeyboardContext::new(BufferProxy::new()));
    let autocomplete = shared(AutocompleteContext::new());
    let controller = Rc::new(SuggestingController {
        keyboard: keyboard.clone(),
        autocomplete: autocomplete.clone(),
    });
    let mut handler = ActionHandler::new(
        keyboard.clone(),
        autocomplete.clone(),
        shared(FeedbackConfiguration::default()),
        ControllerHandle::new(&controller),
    );

    for c in ["h", "e", "l", "o"] {
        handler.handle(Gesture::Release, &KeyboardAction::character(c));
    }
    assert_eq!(autocomplete.borrow().suggestions().len(), 1);

    handler.handle(Gesture::Release, &KeyboardAction::Space);
    assert_eq!(
        keyboard.borrow().proxy().context_before_input().as_deref(),
        Some("hello ")
    );
}

#[test]
fn test_middleware_sees_top_level_gestures_only() {
    #[derive(Default)]
    struct Counting {
        before: Rc<Cell<usize>>,
        after: Rc<Cell<usize>>,
    }

    impl HandlerMiddleware for Counting {
        fn before(&mut self, _gesture: Gesture, _action: &KeyboardAction) {
            self.before.set(self.before.get() + 1);
        }

        fn after(&mut self, _gesture: Gesture, _action: &KeyboardAction, _report: &HandleReport) {
            self.after.set(self.after.get() + 1);
        }
    }

    let counting = Counting::default();
    let (before, after) = (counting.before.clone(), counting.after.clone());
    let controller = Rc::new(RecordingController::new());
    let mut handler = handler_with(&controller, "")
        .with_replacement_resolver(ChainReplacement)
        .with_middleware(counting);

    handler.handle(Gesture::Release, &KeyboardAction::character("a"));
    assert_eq!(before.get(), 1);
    assert_eq!(after.get(), 1);
}
