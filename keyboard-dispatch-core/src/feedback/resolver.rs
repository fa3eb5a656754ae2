//! Resolve which feedback a gesture on an action should give

use super::{AudioFeedback, FeedbackConfiguration, HapticFeedback};
use crate::action::KeyboardAction;
use crate::gesture::Gesture;

/// Maps an action gesture to optional audio and haptic feedback.
///
/// Swap the implementation to customize feedback without touching the handler.
pub trait FeedbackResolver {
    fn audio_feedback(
        &self,
        config: &FeedbackConfiguration,
        gesture: Gesture,
        action: &KeyboardAction,
    ) -> Option<AudioFeedback>;

    fn haptic_feedback(
        &self,
        config: &FeedbackConfiguration,
        gesture: Gesture,
        action: &KeyboardAction,
    ) -> Option<HapticFeedback>;
}

/// Overrides first, then per-action-class (audio) or per-gesture (haptic) defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFeedbackResolver;

impl FeedbackResolver for StandardFeedbackResolver {
    fn audio_feedback(
        &self,
        config: &FeedbackConfiguration,
        gesture: Gesture,
        action: &KeyboardAction,
    ) -> Option<AudioFeedback> {
        let audio = config.audio();
        if let Some(custom) = audio.actions.iter().find(|custom| custom.action == *action) {
            return custom.feedback;
        }
        if *action == KeyboardAction::Space && gesture == Gesture::LongPress {
            return None;
        }
        if *action == KeyboardAction::Backspace {
            return audio.delete;
        }
        if action.is_input_action() {
            return audio.input;
        }
        if action.is_system_action() {
            return audio.system;
        }
        None
    }

    fn haptic_feedback(
        &self,
        config: &FeedbackConfiguration,
        gesture: Gesture,
        action: &KeyboardAction,
    ) -> Option<HapticFeedback> {
        let haptic = config.haptic();
        if let Some(custom) = haptic
            .actions
            .iter()
            .find(|custom| custom.action == *action && custom.gesture == gesture)
        {
            return custom.feedback;
        }
        if *action == KeyboardAction::Space && gesture == Gesture::LongPress {
            return haptic.long_press_on_space;
        }
        match gesture {
            Gesture::DoubleTap => haptic.double_tap,
            Gesture::LongPress => haptic.long_press,
            Gesture::Press => haptic.press,
            Gesture::Release => haptic.release,
            Gesture::RepeatPress => haptic.repeat,
        }
    }
}
