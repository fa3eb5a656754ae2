//! keyboard-dispatch: gesture-driven keyboard action dispatch
//!
//! A key gesture goes in, and the text document, keyboard state and host
//! controller come out updated in a fixed, observable order. Autocorrect,
//! smart quotes, double-space sentence endings, one-shot shift and
//! space-drag cursor movement are built in; every policy can be swapped.
//!
//! # Example
//! ```
//! use keyboard_dispatch::prelude::*;
//! use keyboard_dispatch::testing::TestKeyboard;
//!
//! let mut keyboard = TestKeyboard::with_text("helo");
//! keyboard.set_suggestions(vec![Suggestion::new("hello").autocorrect()]);
//! keyboard.tap(&KeyboardAction::Space);
//!
//! assert_eq!(keyboard.text(), "hello ");
//! ```

// Re-export everything from core
pub use keyboard_dispatch_core::*;

/// Prelude for convenient imports
pub mod prelude {
    // Actions and gestures
    pub use keyboard_dispatch_core::{
        Emoji, Gesture, KeyboardAction, KeyboardCase, KeyboardType, PrimaryKind,
    };

    // Context and text
    pub use keyboard_dispatch_core::{
        Autocapitalization, BufferProxy, KeyboardContext, SpaceLongPressBehavior,
        TextDocumentProxy, TextDocumentProxyExt,
    };

    // Engine
    pub use keyboard_dispatch_core::{
        shared, ActionHandler, ControllerHandle, DispatchEffect, GestureEffect, HandleReport,
        KeyboardController, Shared,
    };

    // Middleware
    pub use keyboard_dispatch_core::{
        ComposedMiddleware, HandlerMiddleware, LoggingMiddleware, NoopMiddleware,
    };

    // Policies
    pub use keyboard_dispatch_core::{
        AutocompleteContext, KeyboardBehavior, ReplacementResolver, StandardKeyboardBehavior,
        StandardReplacementResolver, Suggestion,
    };

    // Feedback
    pub use keyboard_dispatch_core::{
        AudioConfiguration, AudioFeedback, Feedback, FeedbackConfiguration, FeedbackResolver,
        FeedbackTrigger, HapticConfiguration, HapticFeedback, StandardFeedbackResolver,
        TracingFeedback,
    };

    // Space drag and settings
    pub use keyboard_dispatch_core::{DragPoint, KeyboardSettings, SpaceDragSensitivity};
}
