//! Audio and haptic feedback
//!
//! - [`config`]: the observable [`FeedbackConfiguration`] and its audio/haptic parts
//! - [`resolver`]: which feedback a gesture on an action should give
//! - [`FeedbackTrigger`]: the fire-and-forget sink that actually plays it

pub mod config;
pub mod resolver;

use serde::{Deserialize, Serialize};

pub use config::{
    ActionAudioFeedback, AudioConfiguration, FeedbackChange, FeedbackConfiguration,
    FeedbackObserver, GestureHapticFeedback, HapticConfiguration, SubscriptionId,
};
pub use resolver::{FeedbackResolver, StandardFeedbackResolver};

/// A system sound to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFeedback {
    Input,
    Delete,
    System,
    /// A platform sound identifier
    Custom(u32),
}

/// A haptic pattern to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticFeedback {
    Error,
    Success,
    Warning,
    LightImpact,
    MediumImpact,
    HeavyImpact,
    SelectionChanged,
}

/// A feedback descriptor handed to a [`FeedbackTrigger`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feedback {
    Audio(AudioFeedback),
    Haptic(HapticFeedback),
}

/// Plays feedback.
///
/// Triggering is fire-and-forget: implementations must not block and must not
/// panic. The handler never observes a result.
pub trait FeedbackTrigger {
    fn trigger(&mut self, feedback: Feedback);
}

/// A trigger that drops all feedback
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFeedback;

impl FeedbackTrigger for NoopFeedback {
    fn trigger(&mut self, _feedback: Feedback) {}
}

/// A trigger that only logs feedback (for hosts without audio/haptic hardware)
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFeedback;

impl FeedbackTrigger for TracingFeedback {
    fn trigger(&mut self, feedback: Feedback) {
        match feedback {
            Feedback::Audio(audio) => tracing::debug!(?audio, "Audio feedback"),
            Feedback::Haptic(haptic) => tracing::debug!(?haptic, "Haptic feedback"),
        }
    }
}
