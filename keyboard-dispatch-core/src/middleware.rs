//! Handler middleware
//!
//! Middleware observes every top-level `handle` call, before the pipeline
//! runs and after it has produced its [`HandleReport`].

use crate::action::KeyboardAction;
use crate::effect::HandleReport;
use crate::gesture::Gesture;

/// Middleware trait for intercepting handled gestures
///
/// Implement this trait to add logging, recording, or other
/// cross-cutting concerns to an `ActionHandler`.
pub trait HandlerMiddleware {
    /// Called before the gesture is handled
    fn before(&mut self, gesture: Gesture, action: &KeyboardAction);

    /// Called after the gesture is handled
    fn after(&mut self, gesture: Gesture, action: &KeyboardAction, report: &HandleReport);
}

/// A no-op middleware that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl HandlerMiddleware for NoopMiddleware {
    fn before(&mut self, _gesture: Gesture, _action: &KeyboardAction) {}
    fn after(&mut self, _gesture: Gesture, _action: &KeyboardAction, _report: &HandleReport) {}
}

/// Middleware that logs handled gestures (for debugging)
#[derive(Debug, Clone, Default)]
pub struct LoggingMiddleware {
    /// Whether to log before handling
    pub log_before: bool,
    /// Whether to log after handling
    pub log_after: bool,
}

impl LoggingMiddleware {
    /// Log after handling only
    pub fn new() -> Self {
        Self {
            log_before: false,
            log_after: true,
        }
    }

    /// Log both before and after
    pub fn verbose() -> Self {
        Self {
            log_before: true,
            log_after: true,
        }
    }
}

impl HandlerMiddleware for LoggingMiddleware {
    fn before(&mut self, gesture: Gesture, action: &KeyboardAction) {
        if self.log_before {
            tracing::debug!(gesture = %gesture, action = %action, "Handling gesture");
        }
    }

    fn after(&mut self, gesture: Gesture, action: &KeyboardAction, report: &HandleReport) {
        if self.log_after {
            tracing::debug!(
                gesture = %gesture,
                action = %action,
                effects = ?report.names(),
                "Gesture handled"
            );
        }
    }
}

/// Compose multiple middleware into a single middleware
#[derive(Default)]
pub struct ComposedMiddleware {
    middlewares: Vec<Box<dyn HandlerMiddleware>>,
}

impl std::fmt::Debug for ComposedMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposedMiddleware")
            .field("middlewares_count", &self.middlewares.len())
            .finish()
    }
}

impl ComposedMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a middleware to the composition
    pub fn add<M: HandlerMiddleware + 'static>(&mut self, middleware: M) {
        self.middlewares.push(Box::new(middleware));
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

impl HandlerMiddleware for ComposedMiddleware {
    fn before(&mut self, gesture: Gesture, action: &KeyboardAction) {
        for middleware in &mut self.middlewares {
            middleware.before(gesture, action);
        }
    }

    fn after(&mut self, gesture: Gesture, action: &KeyboardAction, report: &HandleReport) {
        // Reverse order so the first middleware wraps the rest
        for middleware in self.middlewares.iter_mut().rev() {
            middleware.after(gesture, action, report);
        }
    }
}
