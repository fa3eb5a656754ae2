//! Core types and engine for keyboard-dispatch
//!
//! This crate turns classified touch gestures on keyboard keys into edits of a
//! text document, keyboard state changes and host callbacks.
//!
//! # Core Concepts
//!
//! - **Gesture**: press, release, long press, double tap or repeat on a key
//! - **KeyboardAction**: the logical identity of a key
//! - **ActionHandler**: runs a gesture through replacement, feedback,
//!   space-drag, autocomplete and behavior steps in a fixed order
//! - **KeyboardContext**: locale, keyboard type and the text proxy
//! - **Policies**: feedback resolver, replacement resolver and keyboard
//!   behavior are traits, swapped in to customize the handler
//!
//! # Basic Example
//!
//! ```
//! use keyboard_dispatch_core::prelude::*;
//! use std::rc::Rc;
//!
//! struct Host;
//!
//! impl KeyboardController for Host {
//!     fn perform_autocomplete(&self) {}
//! }
//!
//! let host = Rc::new(Host);
//! let mut handler = KeyboardSettings::default()
//!     .into_handler(BufferProxy::new(), ControllerHandle::new(&host));
//!
//! let report = handler.handle(Gesture::Release, &KeyboardAction::character("a"));
//! assert_eq!(report.applied(), Some(&GestureEffect::InsertText("a".into())));
//! assert!(report.effects.contains(&DispatchEffect::RequestedAutocomplete));
//! ```
//!
//! # Shared State
//!
//! The handler and its host share the keyboard, autocomplete and feedback
//! state through [`Shared`] (`Rc<RefCell<_>>`). The handler only holds a weak
//! [`ControllerHandle`] to the host and never keeps a borrow alive while
//! calling back into it, so the host may freely borrow the shared state from
//! inside its callbacks.

pub mod action;
pub mod autocomplete;
pub mod behavior;
pub mod context;
pub mod controller;
pub mod effect;
pub mod feedback;
pub mod gesture;
pub mod handler;
pub mod middleware;
pub mod proxy;
pub mod replacement;
pub mod settings;
pub mod space_drag;
pub mod testing;

// Action and gesture exports
pub use action::{
    ActionTraits, Emoji, KeyboardAction, KeyboardCase, KeyboardType, PrimaryKind,
};
pub use gesture::Gesture;

// Context exports
pub use context::{
    Autocapitalization, KeyboardContext, QuotationMarks, SpaceLongPressBehavior,
};
pub use proxy::{BufferProxy, TextDocumentProxy, TextDocumentProxyExt};

// Engine exports
pub use controller::{shared, ControllerHandle, KeyboardController, Shared};
pub use effect::{DispatchEffect, GestureEffect, HandleReport};
pub use handler::{ActionHandler, EmojiCallback};
pub use middleware::{ComposedMiddleware, HandlerMiddleware, LoggingMiddleware, NoopMiddleware};

// Policy exports
pub use autocomplete::{AutocompleteContext, Suggestion};
pub use behavior::{KeyboardBehavior, StandardKeyboardBehavior};
pub use feedback::{
    AudioConfiguration, AudioFeedback, Feedback, FeedbackChange, FeedbackConfiguration,
    FeedbackResolver, FeedbackTrigger, HapticConfiguration, HapticFeedback, NoopFeedback,
    StandardFeedbackResolver, SubscriptionId, TracingFeedback,
};
pub use replacement::{LocaleReplacement, ReplacementResolver, StandardReplacementResolver};
pub use space_drag::{DragPoint, SpaceDragSensitivity, SpaceDragState, SpaceDragTracker};

// Config exports
pub use settings::KeyboardSettings;

// Testing exports
pub use testing::{ControllerCall, RecordingController, RecordingFeedback, TestKeyboard};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Emoji, KeyboardAction, KeyboardCase, KeyboardType, PrimaryKind};
    pub use crate::autocomplete::{AutocompleteContext, Suggestion};
    pub use crate::behavior::{KeyboardBehavior, StandardKeyboardBehavior};
    pub use crate::context::{Autocapitalization, KeyboardContext, SpaceLongPressBehavior};
    pub use crate::controller::{shared, ControllerHandle, KeyboardController, Shared};
    pub use crate::effect::{DispatchEffect, GestureEffect, HandleReport};
    pub use crate::feedback::{
        AudioConfiguration, AudioFeedback, Feedback, FeedbackConfiguration, FeedbackResolver,
        FeedbackTrigger, HapticConfiguration, HapticFeedback, StandardFeedbackResolver,
        TracingFeedback,
    };
    pub use crate::gesture::Gesture;
    pub use crate::handler::ActionHandler;
    pub use crate::middleware::{
        ComposedMiddleware, HandlerMiddleware, LoggingMiddleware, NoopMiddleware,
    };
    pub use crate::proxy::{BufferProxy, TextDocumentProxy, TextDocumentProxyExt};
    pub use crate::replacement::{ReplacementResolver, StandardReplacementResolver};
    pub use crate::settings::KeyboardSettings;
    pub use crate::space_drag::{DragPoint, SpaceDragSensitivity};
}
