//! The action handler
//!
//! [`ActionHandler::handle`] runs one gesture through a fixed pipeline:
//!
//! 1. replacement (top level only, at most one level deep)
//! 2. feedback
//! 3. space-drag bookkeeping
//! 4. effect resolution, stopping when there is none
//! 5. pre-effects on release: autocomplete space removal, autocorrect
//! 6. the effect itself
//! 7. post-effects: space reinsertion, sentence ending, keyboard type,
//!    autocomplete refresh, emoji registration
//!
//! Every step is recorded in the returned [`HandleReport`].
//!
//! # Example
//!
//! ```
//! use keyboard_dispatch_core::prelude::*;
//!
//! let keyboard = shared(KeyboardContext::new(BufferProxy::new()));
//! let mut handler = ActionHandler::new(
//!     keyboard.clone(),
//!     shared(AutocompleteContext::new()),
//!     shared(FeedbackConfiguration::default()),
//!     ControllerHandle::detached(),
//! );
//!
//! handler.handle(Gesture::Release, &KeyboardAction::character("a"));
//! assert_eq!(
//!     keyboard.borrow().proxy().context_before_input().as_deref(),
//!     Some("a")
//! );
//! ```

use crate::action::{Emoji, KeyboardAction};
use crate::autocomplete::{self, AutocompleteContext, Suggestion};
use crate::behavior::{KeyboardBehavior, StandardKeyboardBehavior};
use crate::context::{KeyboardContext, SpaceLongPressBehavior};
use crate::controller::{ControllerHandle, Shared};
use crate::effect::{DispatchEffect, GestureEffect, HandleReport};
use crate::feedback::{
    Feedback, FeedbackConfiguration, FeedbackResolver, FeedbackTrigger, NoopFeedback,
    StandardFeedbackResolver,
};
use crate::gesture::Gesture;
use crate::middleware::{HandlerMiddleware, NoopMiddleware};
use crate::proxy::TextDocumentProxyExt;
use crate::replacement::{ReplacementResolver, StandardReplacementResolver};
use crate::space_drag::{DragPoint, SpaceDragSensitivity, SpaceDragTracker};

/// Hook invoked with every emoji the user releases
pub type EmojiCallback = Box<dyn FnMut(&Emoji)>;

/// Dispatches keyboard gestures to text, context and controller effects.
pub struct ActionHandler<M: HandlerMiddleware = NoopMiddleware> {
    keyboard: Shared<KeyboardContext>,
    autocomplete: Shared<AutocompleteContext>,
    feedback_config: Shared<FeedbackConfiguration>,
    controller: ControllerHandle,
    feedback_resolver: Box<dyn FeedbackResolver>,
    replacement_resolver: Box<dyn ReplacementResolver>,
    behavior: Box<dyn KeyboardBehavior>,
    feedback: Box<dyn FeedbackTrigger>,
    space_drag: SpaceDragTracker,
    space_drag_activation: Option<DragPoint>,
    emoji_callback: Option<EmojiCallback>,
    middleware: M,
}

impl<M: HandlerMiddleware> std::fmt::Debug for ActionHandler<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionHandler")
            .field("controller", &self.controller)
            .field("space_drag", &self.space_drag)
            .field("space_drag_activation", &self.space_drag_activation)
            .finish_non_exhaustive()
    }
}

impl ActionHandler<NoopMiddleware> {
    /// Create a handler with the standard resolvers and behavior.
    ///
    /// Feedback is resolved but dropped until a trigger is set with
    /// [`with_feedback_trigger`](Self::with_feedback_trigger).
    pub fn new(
        keyboard: Shared<KeyboardContext>,
        autocomplete: Shared<AutocompleteContext>,
        feedback_config: Shared<FeedbackConfiguration>,
        controller: ControllerHandle,
    ) -> Self {
        Self {
            keyboard,
            autocomplete,
            feedback_config,
            controller,
            feedback_resolver: Box::new(StandardFeedbackResolver),
            replacement_resolver: Box::new(StandardReplacementResolver::default()),
            behavior: Box::new(StandardKeyboardBehavior::default()),
            feedback: Box::new(NoopFeedback),
            space_drag: SpaceDragTracker::default(),
            space_drag_activation: None,
            emoji_callback: None,
            middleware: NoopMiddleware,
        }
    }
}

impl<M: HandlerMiddleware> ActionHandler<M> {
    /// Replace the middleware
    pub fn with_middleware<N: HandlerMiddleware>(self, middleware: N) -> ActionHandler<N> {
        ActionHandler {
            keyboard: self.keyboard,
            autocomplete: self.autocomplete,
            feedback_config: self.feedback_config,
            controller: self.controller,
            feedback_resolver: self.feedback_resolver,
            replacement_resolver: self.replacement_resolver,
            behavior: self.behavior,
            feedback: self.feedback,
            space_drag: self.space_drag,
            space_drag_activation: self.space_drag_activation,
            emoji_callback: self.emoji_callback,
            middleware,
        }
    }

    pub fn with_feedback_resolver(mut self, resolver: impl FeedbackResolver + 'static) -> Self {
        self.feedback_resolver = Box::new(resolver);
        self
    }

    pub fn with_replacement_resolver(
        mut self,
        resolver: impl ReplacementResolver + 'static,
    ) -> Self {
        self.replacement_resolver = Box::new(resolver);
        self
    }

    pub fn with_behavior(mut self, behavior: impl KeyboardBehavior + 'static) -> Self {
        self.behavior = Box::new(behavior);
        self
    }

    pub fn with_feedback_trigger(mut self, trigger: impl FeedbackTrigger + 'static) -> Self {
        self.feedback = Box::new(trigger);
        self
    }

    pub fn with_space_drag_sensitivity(mut self, sensitivity: SpaceDragSensitivity) -> Self {
        self.space_drag.set_sensitivity(sensitivity);
        self
    }

    /// Register the emoji registration hook
    pub fn on_emoji(mut self, callback: impl FnMut(&Emoji) + 'static) -> Self {
        self.emoji_callback = Some(Box::new(callback));
        self
    }

    /// Point the handler at another host controller
    pub fn set_controller(&mut self, controller: ControllerHandle) {
        self.controller = controller;
    }

    pub fn controller(&self) -> &ControllerHandle {
        &self.controller
    }

    pub fn keyboard_context(&self) -> &Shared<KeyboardContext> {
        &self.keyboard
    }

    pub fn autocomplete_context(&self) -> &Shared<AutocompleteContext> {
        &self.autocomplete
    }

    pub fn feedback_configuration(&self) -> &Shared<FeedbackConfiguration> {
        &self.feedback_config
    }

    pub fn space_drag(&self) -> &SpaceDragTracker {
        &self.space_drag
    }

    /// Get a reference to the middleware
    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    /// Get a mutable reference to the middleware
    pub fn middleware_mut(&mut self) -> &mut M {
        &mut self.middleware
    }

    /// Handle a gesture on an action
    pub fn handle(&mut self, gesture: Gesture, action: &KeyboardAction) -> HandleReport {
        self.middleware.before(gesture, action);
        let report = self.dispatch(gesture, action, false);
        self.middleware.after(gesture, action, &report);
        report
    }

    /// Handle a drag on an action.
    ///
    /// Only space drags after a long press move the cursor. The first call of
    /// a session locks its current point `to` as the activation point, so it
    /// never moves the cursor itself. The reported start point `_from` is not
    /// used. Returns the applied cursor delta.
    pub fn handle_drag(
        &mut self,
        action: &KeyboardAction,
        _from: DragPoint,
        to: DragPoint,
    ) -> Option<isize> {
        if *action != KeyboardAction::Space {
            return None;
        }
        {
            let keyboard = self.keyboard.borrow();
            if keyboard.space_long_press_behavior != SpaceLongPressBehavior::MoveInputCursor
                || !keyboard.is_space_drag_gesture_active()
            {
                return None;
            }
        }
        let activation = *self.space_drag_activation.get_or_insert(to);
        self.space_drag
            .handle_drag(activation, to, &mut self.keyboard.borrow_mut())
    }

    /// Accept a suggestion from the suggestion bar.
    ///
    /// The suggestion replaces the current word with a trailing space, then an
    /// empty character release runs the post-effects.
    pub fn handle_suggestion(&mut self, suggestion: &Suggestion) -> HandleReport {
        tracing::debug!(suggestion = %suggestion.text, "Accepting suggestion");
        autocomplete::insert_suggestion(
            &mut self.autocomplete.borrow_mut(),
            &mut self.keyboard.borrow_mut(),
            suggestion,
            true,
        );
        self.handle(Gesture::Release, &KeyboardAction::character(""))
    }

    /// Whether the gesture resolves to an effect right now
    pub fn can_handle(&self, gesture: Gesture, action: &KeyboardAction) -> bool {
        self.effective_effect(gesture, action).is_some()
    }

    /// Whether feedback fires for this gesture.
    ///
    /// Press fires early when the release would act. Release itself never
    /// fires, so feedback is not doubled.
    pub fn should_trigger_feedback(&self, gesture: Gesture, action: &KeyboardAction) -> bool {
        let release_acts = gesture == Gesture::Press
            && self.effective_effect(Gesture::Release, action).is_some();
        let gesture_acts =
            gesture != Gesture::Release && self.effective_effect(gesture, action).is_some();
        release_acts || gesture_acts
    }

    fn effective_effect(&self, gesture: Gesture, action: &KeyboardAction) -> Option<GestureEffect> {
        let drag_active = self.keyboard.borrow().is_space_drag_gesture_active();
        if gesture == Gesture::Release && *action == KeyboardAction::Space && drag_active {
            return None;
        }
        action.standard_effect(gesture)
    }

    fn dispatch(&mut self, gesture: Gesture, action: &KeyboardAction, replaced: bool) -> HandleReport {
        let action = self.keyboard.borrow().resolve_dictation(action.clone());
        tracing::debug!(gesture = %gesture, action = %action, replaced, "Dispatching gesture");
        let mut report = HandleReport::new();

        if !replaced {
            let substitute = {
                let keyboard = self.keyboard.borrow();
                self.replacement_resolver
                    .replacement_action(&keyboard, gesture, &action)
            };
            if let Some(substitute) = substitute {
                tracing::trace!(substitute = %substitute, "Replacing action");
                report.push(DispatchEffect::Replaced(substitute.clone()));
                report.extend(self.dispatch(Gesture::Release, &substitute, true));
                return report;
            }
        }

        if self.should_trigger_feedback(gesture, &action) {
            self.trigger_feedback(gesture, &action, &mut report);
        }

        let is_space = action == KeyboardAction::Space;
        let effect = self.effective_effect(gesture, &action);
        if is_space {
            self.update_space_drag(gesture);
        }

        let Some(effect) = effect else {
            tracing::trace!("No effect");
            return report;
        };

        if gesture == Gesture::Release {
            self.try_remove_autocomplete_space(&action, &mut report);
            self.try_apply_autocorrect(&action, &mut report);
        }

        self.apply(&effect);
        report.push(DispatchEffect::Applied(effect));

        self.try_reinsert_autocomplete_space(gesture, &action, &mut report);
        self.try_end_sentence(gesture, &action, &mut report);
        self.try_switch_keyboard_type(gesture, &action, &mut report);
        if self.controller.with(|c| c.perform_autocomplete()).is_some() {
            report.push(DispatchEffect::RequestedAutocomplete);
        }
        self.try_register_emoji(gesture, &action, &mut report);
        report
    }

    fn trigger_feedback(&mut self, gesture: Gesture, action: &KeyboardAction, report: &mut HandleReport) {
        let (audio, haptic) = {
            let config = self.feedback_config.borrow();
            (
                self.feedback_resolver.audio_feedback(&config, gesture, action),
                self.feedback_resolver.haptic_feedback(&config, gesture, action),
            )
        };
        let feedback = audio
            .map(Feedback::Audio)
            .into_iter()
            .chain(haptic.map(Feedback::Haptic));
        for feedback in feedback {
            tracing::trace!(?feedback, "Triggering feedback");
            self.feedback.trigger(feedback);
            report.push(DispatchEffect::Feedback(feedback));
        }
    }

    fn update_space_drag(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Press | Gesture::Release => {
                self.keyboard.borrow_mut().set_space_drag_gesture_active(false);
                self.space_drag.reset();
                self.space_drag_activation = None;
            }
            Gesture::LongPress => {
                let mut keyboard = self.keyboard.borrow_mut();
                keyboard.set_space_drag_gesture_active(true);
                if keyboard.space_long_press_behavior == SpaceLongPressBehavior::MoveInputCursor {
                    self.space_drag.arm();
                }
                self.space_drag_activation = None;
            }
            Gesture::DoubleTap | Gesture::RepeatPress => {}
        }
    }

    fn try_remove_autocomplete_space(&mut self, action: &KeyboardAction, report: &mut HandleReport) {
        if !action.should_remove_autocomplete_inserted_space() {
            return;
        }
        let removed = autocomplete::remove_inserted_space(
            &mut self.autocomplete.borrow_mut(),
            &mut self.keyboard.borrow_mut(),
        );
        if removed {
            report.push(DispatchEffect::RemovedAutocompleteSpace);
        }
    }

    fn try_apply_autocorrect(&mut self, action: &KeyboardAction, report: &mut HandleReport) {
        if !action.should_apply_autocorrect_suggestion() {
            return;
        }
        {
            let keyboard = self.keyboard.borrow();
            let proxy = keyboard.proxy();
            if proxy.is_cursor_at_new_word() || !proxy.is_cursor_at_the_end_of_the_current_word() {
                return;
            }
        }
        let suggestion = self.autocomplete.borrow().autocorrect_suggestion().cloned();
        let Some(suggestion) = suggestion else {
            return;
        };
        tracing::trace!(suggestion = %suggestion.text, "Applying autocorrect");
        autocomplete::apply_autocorrect(
            &mut self.autocomplete.borrow_mut(),
            &mut self.keyboard.borrow_mut(),
            &suggestion,
        );
        report.push(DispatchEffect::AppliedAutocorrect(suggestion.text));
    }

    fn apply(&mut self, effect: &GestureEffect) {
        tracing::trace!(?effect, "Applying effect");
        match effect {
            GestureEffect::InsertText(text) => {
                self.keyboard.borrow_mut().proxy_mut().insert_text(text);
            }
            GestureEffect::DeleteBackward => {
                self.keyboard.borrow_mut().proxy_mut().delete_backward(1);
            }
            GestureEffect::MoveCursor(offset) => {
                self.keyboard.borrow_mut().proxy_mut().adjust_text_position(*offset);
            }
            GestureEffect::SetKeyboardType(keyboard_type) => {
                self.keyboard.borrow_mut().keyboard_type = keyboard_type.clone();
            }
            GestureEffect::SelectNextLocale => {
                self.keyboard.borrow_mut().select_next_locale();
            }
            GestureEffect::NextKeyboard => {
                self.controller.with(|c| c.select_next_keyboard());
            }
            GestureEffect::DismissKeyboard => {
                self.controller.with(|c| c.dismiss_keyboard());
            }
            GestureEffect::StartDictation => {
                self.controller.with(|c| c.start_dictation());
            }
            GestureEffect::Custom(name) => {
                self.controller.with(|c| c.perform_custom(name));
            }
        }
    }

    fn try_reinsert_autocomplete_space(
        &mut self,
        gesture: Gesture,
        action: &KeyboardAction,
        report: &mut HandleReport,
    ) {
        // Backspace acts on press, everything else on release
        let acting_gesture = if action.standard_effect(Gesture::Release).is_some() {
            Gesture::Release
        } else {
            Gesture::Press
        };
        if gesture != acting_gesture || !action.should_reinsert_autocomplete_removed_space() {
            return;
        }
        let reinserted = autocomplete::reinsert_removed_space(
            &mut self.autocomplete.borrow_mut(),
            &mut self.keyboard.borrow_mut(),
        );
        if reinserted {
            report.push(DispatchEffect::ReinsertedAutocompleteSpace);
        }
    }

    fn try_end_sentence(&mut self, gesture: Gesture, action: &KeyboardAction, report: &mut HandleReport) {
        let should_end = {
            let keyboard = self.keyboard.borrow();
            self.behavior.should_end_sentence(&keyboard, gesture, action)
        };
        if should_end {
            self.keyboard.borrow_mut().end_sentence();
            report.push(DispatchEffect::EndedSentence);
        }
    }

    fn try_switch_keyboard_type(
        &mut self,
        gesture: Gesture,
        action: &KeyboardAction,
        report: &mut HandleReport,
    ) {
        let preferred = {
            let keyboard = self.keyboard.borrow();
            if !self.behavior.should_switch_keyboard_type(&keyboard, gesture, action) {
                return;
            }
            let preferred = self.behavior.preferred_keyboard_type(&keyboard, gesture, action);
            if preferred == keyboard.keyboard_type {
                return;
            }
            preferred
        };
        tracing::trace!(keyboard_type = ?preferred, "Switching keyboard type");
        self.keyboard.borrow_mut().keyboard_type = preferred.clone();
        report.push(DispatchEffect::SwitchedKeyboardType(preferred));
    }

    fn try_register_emoji(&mut self, gesture: Gesture, action: &KeyboardAction, report: &mut HandleReport) {
        if gesture != Gesture::Release {
            return;
        }
        let KeyboardAction::Emoji(emoji) = action else {
            return;
        };
        if let Some(callback) = self.emoji_callback.as_mut() {
            callback(emoji);
            report.push(DispatchEffect::RegisteredEmoji(emoji.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{KeyboardCase, KeyboardType};
    use crate::context::Autocapitalization;
    use crate::controller::shared;
    use crate::feedback::{AudioConfiguration, AudioFeedback, HapticConfiguration, HapticFeedback};
    use crate::proxy::{BufferProxy, TextDocumentProxy};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn handler_with_text(text: &str) -> ActionHandler {
        let keyboard = KeyboardContext::new(BufferProxy::with_text(text))
            .with_autocapitalization(Autocapitalization::None);
        ActionHandler::new(
            shared(keyboard),
            shared(AutocompleteContext::new()),
            shared(FeedbackConfiguration::new(
                AudioConfiguration::disabled(),
                HapticConfiguration::disabled(),
            )),
            ControllerHandle::detached(),
        )
    }

    fn text_before(handler: &ActionHandler) -> String {
        handler
            .keyboard_context()
            .borrow()
            .proxy()
            .context_before_input()
            .unwrap_or_default()
    }

    #[test]
    fn test_release_inserts_character() {
        let mut handler = handler_with_text("");
        let report = handler.handle(Gesture::Release, &KeyboardAction::character("a"));
        assert_eq!(report.applied(), Some(&GestureEffect::InsertText("a".into())));
        assert_eq!(text_before(&handler), "a");
    }

    #[test]
    fn test_press_on_character_has_no_effect() {
        let mut handler = handler_with_text("");
        let report = handler.handle(Gesture::Press, &KeyboardAction::character("a"));
        assert_eq!(report.applied(), None);
        assert_eq!(text_before(&handler), "");
    }

    #[test]
    fn test_feedback_policy() {
        let handler = handler_with_text("");
        let a = KeyboardAction::character("a");
        assert!(handler.should_trigger_feedback(Gesture::Press, &a));
        assert!(!handler.should_trigger_feedback(Gesture::Release, &a));
        assert!(handler.should_trigger_feedback(Gesture::Press, &KeyboardAction::Backspace));
        assert!(!handler.should_trigger_feedback(Gesture::Release, &KeyboardAction::Backspace));
        assert!(!handler.should_trigger_feedback(Gesture::Press, &KeyboardAction::None));
    }

    #[test]
    fn test_press_feedback_is_triggered() {
        let triggered = Rc::new(RefCell::new(Vec::new()));
        let sink = triggered.clone();
        struct Sink(Rc<RefCell<Vec<Feedback>>>);
        impl FeedbackTrigger for Sink {
            fn trigger(&mut self, feedback: Feedback) {
                self.0.borrow_mut().push(feedback);
            }
        }

        let mut handler = handler_with_text("").with_feedback_trigger(Sink(sink));
        handler.feedback_configuration().borrow_mut().set_haptic(HapticConfiguration::minimal());
        handler.feedback_configuration().borrow_mut().set_audio(AudioConfiguration::enabled());

        handler.handle(Gesture::Press, &KeyboardAction::Backspace);
        assert_eq!(
            *triggered.borrow(),
            vec![
                Feedback::Audio(AudioFeedback::Delete),
                Feedback::Haptic(HapticFeedback::LightImpact)
            ]
        );
    }

    #[test]
    fn test_shift_double_tap_caps_locks() {
        let mut handler = handler_with_text("");
        handler.handle(Gesture::DoubleTap, &KeyboardAction::Shift(KeyboardCase::Lowercased));
        assert_eq!(
            handler.keyboard_context().borrow().keyboard_type,
            KeyboardType::Alphabetic(KeyboardCase::CapsLocked)
        );
    }

    #[test]
    fn test_dictation_resolves_before_dispatch() {
        let mut handler = handler_with_text("");
        handler.keyboard_context().borrow_mut().dictation_replacement =
            Some(KeyboardAction::character("!"));
        handler.handle(Gesture::Release, &KeyboardAction::Dictation);
        assert_eq!(text_before(&handler), "!");
    }

    #[test]
    fn test_space_long_press_arms_tracker() {
        let mut handler = handler_with_text("hello");
        handler.handle(Gesture::LongPress, &KeyboardAction::Space);
        assert!(handler.keyboard_context().borrow().is_space_drag_gesture_active());
        assert_eq!(handler.space_drag().state(), crate::space_drag::SpaceDragState::Armed);

        handler.handle(Gesture::Release, &KeyboardAction::Space);
        assert!(!handler.keyboard_context().borrow().is_space_drag_gesture_active());
        assert_eq!(handler.space_drag().state(), crate::space_drag::SpaceDragState::Idle);
        assert_eq!(text_before(&handler), "hello");
    }

    #[test]
    fn test_locale_menu_behavior_ignores_drag() {
        let mut handler = handler_with_text("hello");
        handler.keyboard_context().borrow_mut().space_long_press_behavior =
            SpaceLongPressBehavior::OpenLocaleContextMenu;
        handler.handle(Gesture::LongPress, &KeyboardAction::Space);

        let moved = handler.handle_drag(
            &KeyboardAction::Space,
            DragPoint::new(40.0, 0.0),
            DragPoint::new(0.0, 0.0),
        );
        assert_eq!(moved, None);
        assert_eq!(text_before(&handler), "hello");
    }

    #[test]
    fn test_drag_on_other_action_is_ignored() {
        let mut handler = handler_with_text("hello");
        handler.handle(Gesture::LongPress, &KeyboardAction::Space);
        let moved = handler.handle_drag(
            &KeyboardAction::Backspace,
            DragPoint::new(40.0, 0.0),
            DragPoint::new(0.0, 0.0),
        );
        assert_eq!(moved, None);
    }

    #[test]
    fn test_can_handle() {
        let handler = handler_with_text("");
        assert!(handler.can_handle(Gesture::Release, &KeyboardAction::Space));
        assert!(!handler.can_handle(Gesture::LongPress, &KeyboardAction::Space));
        assert!(!handler.can_handle(Gesture::Release, &KeyboardAction::None));
    }
}
