//! Feedback configuration with enable/disable memory and change observers
//!
//! Disabling audio or haptic feedback swaps the live configuration for the
//! disabled preset. The last non-disabled value is kept as a shadow, so that
//! enabling again restores it exactly.
//!
//! # Example
//!
//! ```
//! use keyboard_dispatch_core::feedback::{AudioConfiguration, FeedbackConfiguration};
//!
//! let mut config = FeedbackConfiguration::default();
//! assert!(config.is_audio_enabled());
//!
//! config.toggle_audio_enabled();
//! assert_eq!(config.audio(), &AudioConfiguration::disabled());
//!
//! config.toggle_audio_enabled();
//! assert_eq!(config.audio(), &AudioConfiguration::enabled());
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{AudioFeedback, HapticFeedback};
use crate::action::KeyboardAction;
use crate::gesture::Gesture;

/// Audio override for one action. `None` silences the action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionAudioFeedback {
    pub action: KeyboardAction,
    pub feedback: Option<AudioFeedback>,
}

/// Haptic override for one action and gesture. `None` silences it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureHapticFeedback {
    pub action: KeyboardAction,
    pub gesture: Gesture,
    pub feedback: Option<HapticFeedback>,
}

/// Audio feedback per action class, plus explicit per-action overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioConfiguration {
    #[serde(default)]
    pub input: Option<AudioFeedback>,
    #[serde(default)]
    pub delete: Option<AudioFeedback>,
    #[serde(default)]
    pub system: Option<AudioFeedback>,
    #[serde(default)]
    pub actions: Vec<ActionAudioFeedback>,
}

impl AudioConfiguration {
    /// Standard sounds for input, delete and system keys
    pub fn enabled() -> Self {
        Self {
            input: Some(AudioFeedback::Input),
            delete: Some(AudioFeedback::Delete),
            system: Some(AudioFeedback::System),
            actions: Vec::new(),
        }
    }

    /// No sounds at all
    pub fn disabled() -> Self {
        Self {
            input: None,
            delete: None,
            system: None,
            actions: Vec::new(),
        }
    }

    /// Add an action override
    pub fn with_action(mut self, action: KeyboardAction, feedback: Option<AudioFeedback>) -> Self {
        self.actions.push(ActionAudioFeedback { action, feedback });
        self
    }
}

impl Default for AudioConfiguration {
    fn default() -> Self {
        Self::enabled()
    }
}

/// Haptic feedback per gesture, plus explicit per-action-and-gesture overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HapticConfiguration {
    #[serde(default)]
    pub press: Option<HapticFeedback>,
    #[serde(default)]
    pub release: Option<HapticFeedback>,
    #[serde(default)]
    pub double_tap: Option<HapticFeedback>,
    #[serde(default)]
    pub long_press: Option<HapticFeedback>,
    #[serde(default)]
    pub long_press_on_space: Option<HapticFeedback>,
    #[serde(default)]
    pub repeat: Option<HapticFeedback>,
    #[serde(default)]
    pub actions: Vec<GestureHapticFeedback>,
}

impl HapticConfiguration {
    /// Haptics for every gesture
    pub fn enabled() -> Self {
        Self {
            press: Some(HapticFeedback::LightImpact),
            release: None,
            double_tap: Some(HapticFeedback::LightImpact),
            long_press: Some(HapticFeedback::MediumImpact),
            long_press_on_space: Some(HapticFeedback::MediumImpact),
            repeat: Some(HapticFeedback::SelectionChanged),
            actions: Vec::new(),
        }
    }

    /// A light tap on press and a stronger one when space-drag starts
    pub fn minimal() -> Self {
        Self {
            press: Some(HapticFeedback::LightImpact),
            long_press_on_space: Some(HapticFeedback::MediumImpact),
            ..Self::disabled()
        }
    }

    /// No haptics at all
    pub fn disabled() -> Self {
        Self {
            press: None,
            release: None,
            double_tap: None,
            long_press: None,
            long_press_on_space: None,
            repeat: None,
            actions: Vec::new(),
        }
    }

    /// Add an action/gesture override
    pub fn with_action(
        mut self,
        action: KeyboardAction,
        gesture: Gesture,
        feedback: Option<HapticFeedback>,
    ) -> Self {
        self.actions.push(GestureHapticFeedback {
            action,
            gesture,
            feedback,
        });
        self
    }
}

impl Default for HapticConfiguration {
    fn default() -> Self {
        Self::minimal()
    }
}

/// Which part of the configuration changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackChange {
    Audio,
    Haptic,
}

/// Handle returned by [`FeedbackConfiguration::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Change callback, receives what changed and the new version
pub type FeedbackObserver = Box<dyn FnMut(FeedbackChange, u64)>;

/// Audio and haptic feedback configuration.
///
/// Every effective change bumps [`version`](Self::version) and notifies the
/// subscribed observers. Assigning an identical value is a no-op.
pub struct FeedbackConfiguration {
    audio: AudioConfiguration,
    haptic: HapticConfiguration,
    enabled_audio: AudioConfiguration,
    enabled_haptic: HapticConfiguration,
    version: u64,
    observers: Vec<(SubscriptionId, FeedbackObserver)>,
    next_subscription: u64,
}

impl std::fmt::Debug for FeedbackConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackConfiguration")
            .field("audio", &self.audio)
            .field("haptic", &self.haptic)
            .field("version", &self.version)
            .field("observers_count", &self.observers.len())
            .finish()
    }
}

impl Default for FeedbackConfiguration {
    fn default() -> Self {
        Self::new(AudioConfiguration::enabled(), HapticConfiguration::minimal())
    }
}

impl FeedbackConfiguration {
    /// Create a configuration. A disabled part remembers the enabled preset as its shadow.
    pub fn new(audio: AudioConfiguration, haptic: HapticConfiguration) -> Self {
        let enabled_audio = if audio == AudioConfiguration::disabled() {
            AudioConfiguration::enabled()
        } else {
            audio.clone()
        };
        let enabled_haptic = if haptic == HapticConfiguration::disabled() {
            HapticConfiguration::enabled()
        } else {
            haptic.clone()
        };
        Self {
            audio,
            haptic,
            enabled_audio,
            enabled_haptic,
            version: 0,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn audio(&self) -> &AudioConfiguration {
        &self.audio
    }

    pub fn haptic(&self) -> &HapticConfiguration {
        &self.haptic
    }

    /// Incremented on every effective change
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace the audio configuration
    pub fn set_audio(&mut self, audio: AudioConfiguration) {
        if self.audio == audio {
            return;
        }
        if audio != AudioConfiguration::disabled() {
            self.enabled_audio = audio.clone();
        }
        self.audio = audio;
        self.notify(FeedbackChange::Audio);
    }

    /// Replace the haptic configuration
    pub fn set_haptic(&mut self, haptic: HapticConfiguration) {
        if self.haptic == haptic {
            return;
        }
        if haptic != HapticConfiguration::disabled() {
            self.enabled_haptic = haptic.clone();
        }
        self.haptic = haptic;
        self.notify(FeedbackChange::Haptic);
    }

    pub fn is_audio_enabled(&self) -> bool {
        self.audio == self.enabled_audio
    }

    pub fn is_haptic_enabled(&self) -> bool {
        self.haptic == self.enabled_haptic
    }

    pub fn set_audio_enabled(&mut self, enabled: bool) {
        let audio = if enabled {
            self.enabled_audio.clone()
        } else {
            AudioConfiguration::disabled()
        };
        self.set_audio(audio);
    }

    pub fn set_haptic_enabled(&mut self, enabled: bool) {
        let haptic = if enabled {
            self.enabled_haptic.clone()
        } else {
            HapticConfiguration::disabled()
        };
        self.set_haptic(haptic);
    }

    /// Toggle audio feedback, returning the new enabled state
    pub fn toggle_audio_enabled(&mut self) -> bool {
        let enabled = !self.is_audio_enabled();
        self.set_audio_enabled(enabled);
        enabled
    }

    /// Toggle haptic feedback, returning the new enabled state
    pub fn toggle_haptic_enabled(&mut self) -> bool {
        let enabled = !self.is_haptic_enabled();
        self.set_haptic_enabled(enabled);
        enabled
    }

    /// Register a change observer
    pub fn subscribe(&mut self, observer: impl FnMut(FeedbackChange, u64) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(subscription, _)| *subscription != id);
        self.observers.len() != before
    }

    fn notify(&mut self, change: FeedbackChange) {
        self.version += 1;
        tracing::trace!(?change, version = self.version, "Feedback configuration changed");
        let version = self.version;
        for (_, observer) in &mut self.observers {
            observer(change, version);
        }
    }
}

#[derive(Serialize, Deserialize)]
struct FeedbackConfigurationRepr {
    #[serde(default)]
    audio: AudioConfiguration,
    #[serde(default)]
    haptic: HapticConfiguration,
}

impl Serialize for FeedbackConfiguration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Only the live values are persisted; shadows are rebuilt on load
        FeedbackConfigurationRepr {
            audio: self.audio.clone(),
            haptic: self.haptic.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FeedbackConfiguration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = FeedbackConfigurationRepr::deserialize(deserializer)?;
        Ok(Self::new(repr.audio, repr.haptic))
    }
}
