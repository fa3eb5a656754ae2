//! Effects produced while dispatching a gesture
//!
//! Two levels of effect exist:
//!
//! - [`GestureEffect`]: the resolved standard effect of an action gesture,
//!   e.g. "insert `a`" or "delete backward". It is applied against the text
//!   proxy, the keyboard context or the host controller.
//! - [`DispatchEffect`]: one entry in the ordered record of everything the
//!   handler did for a single gesture, collected in a [`HandleReport`].
//!
//! The report mirrors a store's dispatch result: callers may inspect it to
//! update their UI, but nothing requires them to.
//!
//! # Example
//!
//! ```
//! use keyboard_dispatch_core::effect::{DispatchEffect, GestureEffect, HandleReport};
//!
//! let mut report = HandleReport::default();
//! report.push(DispatchEffect::Applied(GestureEffect::InsertText("a".into())));
//! report.push(DispatchEffect::RequestedAutocomplete);
//!
//! assert!(report.has_effects());
//! assert_eq!(report.applied(), Some(&GestureEffect::InsertText("a".into())));
//! ```

use crate::action::{Emoji, KeyboardAction, KeyboardType};
use crate::feedback::Feedback;

/// The standard effect of an action gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureEffect {
    InsertText(String),
    DeleteBackward,
    MoveCursor(isize),
    SetKeyboardType(KeyboardType),
    SelectNextLocale,
    NextKeyboard,
    DismissKeyboard,
    StartDictation,
    Custom(String),
}

/// A single step performed by the handler, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchEffect {
    /// The gestured action was replaced and the substitute was dispatched
    Replaced(KeyboardAction),
    /// Feedback was triggered
    Feedback(Feedback),
    /// A trailing space inserted by an accepted suggestion was removed
    RemovedAutocompleteSpace,
    /// An autocorrect suggestion replaced the current word
    AppliedAutocorrect(String),
    /// The effective action was applied
    Applied(GestureEffect),
    /// A previously removed autocomplete space was restored
    ReinsertedAutocompleteSpace,
    /// The current sentence was terminated
    EndedSentence,
    /// The keyboard switched to the preferred type
    SwitchedKeyboardType(KeyboardType),
    /// Autocomplete was requested from the host controller
    RequestedAutocomplete,
    /// The emoji registration hook was invoked
    RegisteredEmoji(Emoji),
}

impl DispatchEffect {
    /// Get the effect name for logging and ordering assertions
    pub fn name(&self) -> &'static str {
        match self {
            DispatchEffect::Replaced(_) => "Replaced",
            DispatchEffect::Feedback(_) => "Feedback",
            DispatchEffect::RemovedAutocompleteSpace => "RemovedAutocompleteSpace",
            DispatchEffect::AppliedAutocorrect(_) => "AppliedAutocorrect",
            DispatchEffect::Applied(_) => "Applied",
            DispatchEffect::ReinsertedAutocompleteSpace => "ReinsertedAutocompleteSpace",
            DispatchEffect::EndedSentence => "EndedSentence",
            DispatchEffect::SwitchedKeyboardType(_) => "SwitchedKeyboardType",
            DispatchEffect::RequestedAutocomplete => "RequestedAutocomplete",
            DispatchEffect::RegisteredEmoji(_) => "RegisteredEmoji",
        }
    }
}

/// Ordered record of the effects performed for one gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandleReport {
    /// Effects in the order they were performed.
    pub effects: Vec<DispatchEffect>,
}

impl HandleReport {
    /// Create an empty report
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an effect.
    #[inline]
    pub fn push(&mut self, effect: DispatchEffect) {
        self.effects.push(effect);
    }

    /// Append all effects from another report (used by replacement dispatch).
    #[inline]
    pub fn extend(&mut self, other: HandleReport) {
        self.effects.extend(other.effects);
    }

    /// Returns true if anything happened at all.
    #[inline]
    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }

    /// The applied gesture effect, if any.
    pub fn applied(&self) -> Option<&GestureEffect> {
        self.effects.iter().find_map(|effect| match effect {
            DispatchEffect::Applied(applied) => Some(applied),
            _ => None,
        })
    }

    /// All feedback triggered, in order.
    pub fn feedback(&self) -> Vec<&Feedback> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                DispatchEffect::Feedback(feedback) => Some(feedback),
                _ => None,
            })
            .collect()
    }

    /// Effect names in order, handy for asserting on sequencing.
    pub fn names(&self) -> Vec<&'static str> {
        self.effects.iter().map(DispatchEffect::name).collect()
    }
}
