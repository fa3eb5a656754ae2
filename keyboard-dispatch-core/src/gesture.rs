//! Touch gestures that can be applied to a keyboard action

use serde::{Deserialize, Serialize};

/// A classified touch interaction on a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    /// The key was touched down
    Press,
    /// The key was lifted
    Release,
    /// The key was held past the long press threshold
    LongPress,
    /// The key was tapped twice in quick succession
    DoubleTap,
    /// The key is held and repeating
    RepeatPress,
}

impl Gesture {
    /// All gestures, in the order a UI layer would typically report them.
    pub const ALL: [Gesture; 5] = [
        Gesture::Press,
        Gesture::LongPress,
        Gesture::RepeatPress,
        Gesture::DoubleTap,
        Gesture::Release,
    ];

    /// Get the gesture name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Press => "press",
            Gesture::Release => "release",
            Gesture::LongPress => "long_press",
            Gesture::DoubleTap => "double_tap",
            Gesture::RepeatPress => "repeat_press",
        }
    }
}

impl std::fmt::Display for Gesture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
