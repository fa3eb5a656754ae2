//! Host controller and shared state
//!
//! The host owns the handler, so the handler may only keep a weak handle to
//! the host. Every call through [`ControllerHandle`] upgrades first and is
//! skipped when the host is gone.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Single-threaded shared state
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap a value as [`Shared`] state
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// The keyboard host, as seen by the handler.
///
/// Methods take `&self`; hosts keep their own interior mutability. Calls may
/// borrow any [`Shared`] context, the handler holds no borrow while calling.
pub trait KeyboardController {
    /// Refresh autocomplete suggestions for the current text
    fn perform_autocomplete(&self);

    /// Switch to the next system keyboard
    fn select_next_keyboard(&self) {}

    fn dismiss_keyboard(&self) {}

    fn start_dictation(&self) {}

    /// Run a host-defined custom action
    fn perform_custom(&self, name: &str) {
        let _ = name;
    }
}

/// Non-owning handle to the host controller
#[derive(Clone, Default)]
pub struct ControllerHandle {
    controller: Option<Weak<dyn KeyboardController>>,
    strict: bool,
}

impl std::fmt::Debug for ControllerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerHandle")
            .field("alive", &self.is_alive())
            .field("strict", &self.strict)
            .finish()
    }
}

impl ControllerHandle {
    pub fn new<C: KeyboardController + 'static>(controller: &Rc<C>) -> Self {
        let weak: Weak<C> = Rc::downgrade(controller);
        let weak: Weak<dyn KeyboardController> = weak;
        Self {
            controller: Some(weak),
            strict: false,
        }
    }

    /// A handle with no controller behind it
    pub fn detached() -> Self {
        Self::default()
    }

    /// Assert in debug builds when a call finds the controller gone
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn is_alive(&self) -> bool {
        self.controller
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Run `f` against the live controller. Returns `None` if it is gone.
    pub fn with<R>(&self, f: impl FnOnce(&dyn KeyboardController) -> R) -> Option<R> {
        match self.controller.as_ref().and_then(Weak::upgrade) {
            Some(controller) => Some(f(controller.as_ref())),
            None => {
                tracing::warn!("Keyboard controller is gone, skipping call");
                debug_assert!(!self.strict, "keyboard controller used after teardown");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct CountingController {
        autocompletes: Cell<usize>,
    }

    impl KeyboardController for CountingController {
        fn perform_autocomplete(&self) {
            self.autocompletes.set(self.autocompletes.get() + 1);
        }
    }

    #[test]
    fn test_live_handle_calls_controller() {
        let controller = Rc::new(CountingController::default());
        let handle = ControllerHandle::new(&controller);

        assert!(handle.is_alive());
        assert_eq!(handle.with(|c| c.perform_autocomplete()), Some(()));
        assert_eq!(controller.autocompletes.get(), 1);
    }

    #[test]
    fn test_dead_handle_is_noop() {
        let controller = Rc::new(CountingController::default());
        let handle = ControllerHandle::new(&controller);
        drop(controller);

        assert!(!handle.is_alive());
        assert_eq!(handle.with(|c| c.perform_autocomplete()), None);
    }

    #[test]
    fn test_detached_handle_is_noop() {
        let handle = ControllerHandle::detached();
        assert!(!handle.is_alive());
        assert_eq!(handle.with(|_| 1), None);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "keyboard controller used after teardown")]
    fn test_strict_dead_handle_asserts() {
        let controller = Rc::new(CountingController::default());
        let handle = ControllerHandle::new(&controller).strict(true);
        drop(controller);
        handle.with(|c| c.perform_autocomplete());
    }

    #[test]
    fn test_handle_does_not_keep_controller_alive() {
        let controller = Rc::new(CountingController::default());
        let _handle = ControllerHandle::new(&controller);
        assert_eq!(Rc::strong_count(&controller), 1);
    }
}
