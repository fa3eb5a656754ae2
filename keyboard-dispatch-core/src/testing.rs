//! Test utilities for keyboard-dispatch
//!
//! This module provides helpers for testing handlers and policies:
//!
//! - [`RecordingController`]: a controller that records every call
//! - [`RecordingFeedback`]: a feedback trigger that records every descriptor
//! - [`TestKeyboard`]: a fully wired handler over an in-memory buffer
//! - Assertion macros over [`HandleReport`] effects
//!
//! # Example
//!
//! ```
//! use keyboard_dispatch_core::prelude::*;
//! use keyboard_dispatch_core::testing::TestKeyboard;
//! use keyboard_dispatch_core::assert_effect;
//!
//! let mut keyboard = TestKeyboard::new();
//! let report = keyboard.release(&KeyboardAction::character("a"));
//!
//! assert_effect!(report, DispatchEffect::Applied(GestureEffect::InsertText(t)) if t == "a");
//! assert_eq!(keyboard.text(), "a");
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::action::{Emoji, KeyboardAction, KeyboardType};
use crate::autocomplete::Suggestion;
use crate::controller::{ControllerHandle, KeyboardController};
use crate::effect::HandleReport;
use crate::feedback::{Feedback, FeedbackTrigger};
use crate::gesture::Gesture;
use crate::handler::ActionHandler;
use crate::proxy::BufferProxy;
use crate::settings::KeyboardSettings;
use crate::space_drag::DragPoint;

/// A call received by a [`RecordingController`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerCall {
    PerformAutocomplete,
    SelectNextKeyboard,
    DismissKeyboard,
    StartDictation,
    Custom(String),
}

/// Controller that records every call it receives.
#[derive(Debug, Default)]
pub struct RecordingController {
    calls: RefCell<Vec<ControllerCall>>,
}

impl RecordingController {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls so far, in order
    pub fn calls(&self) -> Vec<ControllerCall> {
        self.calls.borrow().clone()
    }

    /// Drain the recorded calls
    pub fn take_calls(&self) -> Vec<ControllerCall> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    /// How many times a call was received
    pub fn count(&self, call: &ControllerCall) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: ControllerCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl KeyboardController for RecordingController {
    fn perform_autocomplete(&self) {
        self.record(ControllerCall::PerformAutocomplete);
    }

    fn select_next_keyboard(&self) {
        self.record(ControllerCall::SelectNextKeyboard);
    }

    fn dismiss_keyboard(&self) {
        self.record(ControllerCall::DismissKeyboard);
    }

    fn start_dictation(&self) {
        self.record(ControllerCall::StartDictation);
    }

    fn perform_custom(&self, name: &str) {
        self.record(ControllerCall::Custom(name.to_string()));
    }
}

/// Feedback trigger that records descriptors. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingFeedback {
    triggered: Rc<RefCell<Vec<Feedback>>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// All feedback triggered so far, in order
    pub fn triggered(&self) -> Vec<Feedback> {
        self.triggered.borrow().clone()
    }

    pub fn clear(&self) {
        self.triggered.borrow_mut().clear();
    }
}

impl FeedbackTrigger for RecordingFeedback {
    fn trigger(&mut self, feedback: Feedback) {
        self.triggered.borrow_mut().push(feedback);
    }
}

/// A handler wired to recording collaborators over an in-memory buffer.
///
/// # Example
///
/// ```
/// use keyboard_dispatch_core::prelude::*;
/// use keyboard_dispatch_core::testing::{ControllerCall, TestKeyboard};
///
/// let mut keyboard = TestKeyboard::with_text("hi");
/// keyboard.type_text(" there");
///
/// assert_eq!(keyboard.text(), "hi there");
/// assert_eq!(keyboard.controller.count(&ControllerCall::PerformAutocomplete), 6);
/// ```
pub struct TestKeyboard {
    pub handler: ActionHandler,
    pub controller: Rc<RecordingController>,
    pub feedback: RecordingFeedback,
    /// Emojis passed to the registration hook
    pub emojis: Rc<RefCell<Vec<Emoji>>>,
}

impl Default for TestKeyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl TestKeyboard {
    /// An empty buffer with default settings
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// A buffer holding `text` with the cursor at its end
    pub fn with_text(text: &str) -> Self {
        Self::with_settings(KeyboardSettings::default(), BufferProxy::with_text(text))
    }

    pub fn with_settings(settings: KeyboardSettings, proxy: BufferProxy) -> Self {
        let controller = Rc::new(RecordingController::new());
        let feedback = RecordingFeedback::new();
        let emojis = Rc::new(RefCell::new(Vec::new()));
        let registered = emojis.clone();
        let handler = settings
            .into_handler(proxy, ControllerHandle::new(&controller))
            .with_feedback_trigger(feedback.clone())
            .on_emoji(move |emoji| registered.borrow_mut().push(emoji.clone()));
        Self {
            handler,
            controller,
            feedback,
            emojis,
        }
    }

    pub fn handle(&mut self, gesture: Gesture, action: &KeyboardAction) -> HandleReport {
        self.handler.handle(gesture, action)
    }

    pub fn press(&mut self, action: &KeyboardAction) -> HandleReport {
        self.handle(Gesture::Press, action)
    }

    pub fn release(&mut self, action: &KeyboardAction) -> HandleReport {
        self.handle(Gesture::Release, action)
    }

    pub fn long_press(&mut self, action: &KeyboardAction) -> HandleReport {
        self.handle(Gesture::LongPress, action)
    }

    /// Press then release, with both reports merged in order
    pub fn tap(&mut self, action: &KeyboardAction) -> HandleReport {
        let mut report = self.press(action);
        report.extend(self.release(action));
        report
    }

    /// Tap every character of `text`, using the space key for spaces
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            let action = if c == ' ' {
                KeyboardAction::Space
            } else {
                KeyboardAction::character(c.to_string())
            };
            self.tap(&action);
        }
    }

    pub fn drag(&mut self, from: DragPoint, to: DragPoint) -> Option<isize> {
        self.handler.handle_drag(&KeyboardAction::Space, from, to)
    }

    pub fn select_suggestion(&mut self, suggestion: &Suggestion) -> HandleReport {
        self.handler.handle_suggestion(suggestion)
    }

    pub fn set_suggestions(&self, suggestions: Vec<Suggestion>) {
        self.handler
            .autocomplete_context()
            .borrow_mut()
            .set_suggestions(suggestions);
    }

    /// The text before the cursor
    pub fn text_before(&self) -> String {
        self.handler
            .keyboard_context()
            .borrow()
            .proxy()
            .context_before_input()
            .unwrap_or_default()
    }

    /// The whole buffer
    pub fn text(&self) -> String {
        let keyboard = self.handler.keyboard_context().borrow();
        let proxy = keyboard.proxy();
        let text = format!(
            "{}{}",
            proxy.context_before_input().unwrap_or_default(),
            proxy.context_after_input().unwrap_or_default()
        );
        text
    }

    /// Cursor position in characters
    pub fn cursor(&self) -> usize {
        self.text_before().chars().count()
    }

    pub fn keyboard_type(&self) -> KeyboardType {
        self.handler.keyboard_context().borrow().keyboard_type.clone()
    }
}

/// Assert that an effect matching a pattern was performed.
///
/// # Example
///
/// ```ignore
/// use keyboard_dispatch::assert_effect;
///
/// let report = keyboard.release(&KeyboardAction::Space);
/// assert_effect!(report, DispatchEffect::RequestedAutocomplete);
/// assert_effect!(report, DispatchEffect::Applied(GestureEffect::InsertText(t)) if t == " ");
/// ```
#[macro_export]
macro_rules! assert_effect {
    ($report:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $report.effects.iter().any(|e| matches!(e, $pattern $(if $guard)?)),
            "Expected effect matching `{}`, but got: {:?}",
            stringify!($pattern),
            $report.effects
        );
    };
}

/// Assert that no effect matching a pattern was performed.
///
/// # Example
///
/// ```ignore
/// use keyboard_dispatch::assert_no_effect;
///
/// let report = keyboard.release(&KeyboardAction::Space);
/// assert_no_effect!(report, DispatchEffect::Replaced(_));
/// ```
#[macro_export]
macro_rules! assert_no_effect {
    ($report:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$report.effects.iter().any(|e| matches!(e, $pattern $(if $guard)?)),
            "Expected no effect matching `{}`, but it was performed: {:?}",
            stringify!($pattern),
            $report.effects
        );
    };
}

/// Find and return the first effect matching a pattern.
///
/// # Example
///
/// ```ignore
/// use keyboard_dispatch::find_effect;
///
/// if let Some(DispatchEffect::Replaced(action)) = find_effect!(report, DispatchEffect::Replaced(_)) {
///     assert_eq!(*action, KeyboardAction::character("ه"));
/// }
/// ```
#[macro_export]
macro_rules! find_effect {
    ($report:expr, $pattern:pat $(if $guard:expr)?) => {
        $report.effects.iter().find(|e| matches!(e, $pattern $(if $guard)?))
    };
}

/// Count how many effects match a pattern.
///
/// # Example
///
/// ```ignore
/// use keyboard_dispatch::count_effects;
///
/// assert_eq!(count_effects!(report, DispatchEffect::Feedback(_)), 2);
/// ```
#[macro_export]
macro_rules! count_effects {
    ($report:expr, $pattern:pat $(if $guard:expr)?) => {
        $report.effects.iter().filter(|e| matches!(e, $pattern $(if $guard)?)).count()
    };
}

/// Assert that effects matching the patterns were performed in this order.
///
/// Other effects may appear in between.
///
/// # Example
///
/// ```ignore
/// use keyboard_dispatch::assert_effect_order;
///
/// assert_effect_order!(report, [
///     DispatchEffect::AppliedAutocorrect(_),
///     DispatchEffect::Applied(_),
///     DispatchEffect::RequestedAutocomplete,
/// ]);
/// ```
#[macro_export]
macro_rules! assert_effect_order {
    ($report:expr, [$($pattern:pat $(if $guard:expr)?),+ $(,)?]) => {{
        let effects = &$report.effects;
        let mut position = 0usize;
        $(
            match effects[position..].iter().position(|e| matches!(e, $pattern $(if $guard)?)) {
                Some(found) => position += found + 1,
                None => panic!(
                    "Expected effect matching `{}` after position {}, but got: {:?}",
                    stringify!($pattern),
                    position,
                    effects
                ),
            }
        )+
        let _ = position;
    }};
}
