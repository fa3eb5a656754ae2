//! Space-drag cursor movement
//!
//! After a long press on space, horizontal drags move the input cursor
//! instead of inserting spaces. The tracker turns a drag distance into a
//! column offset and only applies the change since the last reported offset.

use serde::{Deserialize, Serialize};

use crate::context::KeyboardContext;

/// A location reported by the UI layer, in points
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DragPoint {
    pub x: f64,
    pub y: f64,
}

impl DragPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// How far the finger must travel to move the cursor one column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceDragSensitivity {
    Low,
    #[default]
    Medium,
    High,
    /// Points per column
    Custom(u16),
}

impl SpaceDragSensitivity {
    /// Points per text column
    pub fn points(&self) -> u16 {
        match self {
            SpaceDragSensitivity::Low => 12,
            SpaceDragSensitivity::Medium => 8,
            SpaceDragSensitivity::High => 4,
            SpaceDragSensitivity::Custom(points) => (*points).max(1),
        }
    }
}

/// Lifecycle of a space-drag session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpaceDragState {
    #[default]
    Idle,
    /// Long press registered, no cursor movement yet
    Armed,
    /// The cursor has been moved at least once
    Dragging,
}

/// Converts drags on the space key into cursor movement.
#[derive(Debug, Clone, Default)]
pub struct SpaceDragTracker {
    sensitivity: SpaceDragSensitivity,
    state: SpaceDragState,
    start: Option<DragPoint>,
    current_offset: isize,
}

impl SpaceDragTracker {
    pub fn new(sensitivity: SpaceDragSensitivity) -> Self {
        Self {
            sensitivity,
            ..Self::default()
        }
    }

    pub fn sensitivity(&self) -> SpaceDragSensitivity {
        self.sensitivity
    }

    pub fn set_sensitivity(&mut self, sensitivity: SpaceDragSensitivity) {
        self.sensitivity = sensitivity;
    }

    pub fn state(&self) -> SpaceDragState {
        self.state
    }

    /// The column offset reported for the current drag
    pub fn current_offset(&self) -> isize {
        self.current_offset
    }

    /// True when the current session has moved the cursor
    pub fn is_dragging(&self) -> bool {
        self.current_offset != 0
    }

    /// Start a session (long press on space)
    pub fn arm(&mut self) {
        self.state = SpaceDragState::Armed;
        self.start = None;
        self.current_offset = 0;
    }

    /// End the session (press or release on space)
    pub fn reset(&mut self) {
        self.state = SpaceDragState::Idle;
        self.start = None;
        self.current_offset = 0;
    }

    /// Apply a drag from `start` to `current`.
    ///
    /// A different `start` than the previous call begins a fresh drag. Returns
    /// the cursor delta that was actually applied, if any.
    pub fn handle_drag(
        &mut self,
        start: DragPoint,
        current: DragPoint,
        context: &mut KeyboardContext,
    ) -> Option<isize> {
        if self.state == SpaceDragState::Idle {
            return None;
        }
        if self.start != Some(start) {
            self.start = Some(start);
            self.current_offset = 0;
        }

        let points = f64::from(self.sensitivity.points());
        let mut offset = ((current.x - start.x) / points).trunc() as isize;
        if context.is_rtl_locale() {
            offset = -offset;
        }
        if offset == self.current_offset {
            return None;
        }

        let change = offset - self.current_offset;
        self.current_offset = offset;
        self.state = SpaceDragState::Dragging;

        let proxy = context.proxy_mut();
        let before = proxy
            .context_before_input()
            .map(|text| text.chars().count())
            .unwrap_or(0) as isize;
        let after = proxy
            .context_after_input()
            .map(|text| text.chars().count())
            .unwrap_or(0) as isize;
        let applied = change.clamp(-before, after);
        tracing::trace!(offset, change, applied, "Space drag");
        if applied == 0 {
            return None;
        }
        proxy.adjust_text_position(applied);
        Some(applied)
    }
}
