//! Drag gesture state machine for slider shapes.
//!
//! Both draggable shapes (handle and pointer) feed the same machine, so either
//! one drives the same value. Ticks only preview; the value is committed once,
//! when the gesture ends.

use crate::core::slider::{CLASS_DRAGGER, CLASS_HANDLE, CLASS_POINTER, SliderLayout};

/// Shape that started a drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragTarget {
    /// The circular handle.
    Handle,
    /// The triangular pointer under the track.
    Pointer,
}

impl DragTarget {
    /// Identify a draggable shape from its `class` attribute.
    #[must_use]
    pub fn from_class_list(classes: &str) -> Option<Self> {
        let mut draggable = false;
        let mut target = None;
        for class in classes.split_whitespace() {
            match class {
                CLASS_DRAGGER => draggable = true,
                CLASS_HANDLE => target = Some(Self::Handle),
                CLASS_POINTER => target = Some(Self::Pointer),
                _ => {}
            }
        }
        target.filter(|_| draggable)
    }
}

/// Gesture phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A pointer is dragging one of the shapes.
    Dragging {
        /// Shape that received the pointer down.
        target: DragTarget,
        /// Browser pointer id that owns the gesture.
        pointer_id: i32,
    },
}

/// Result of feeding one pointer event into the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragOutcome {
    /// A gesture started on the given shape.
    Started(DragTarget),
    /// Visual-only update to the given value.
    Preview(u32),
    /// Gesture finished on the given value; persist it.
    Commit(u32),
    /// Gesture abandoned without a value.
    Cancelled,
    /// Event did not belong to the current gesture.
    Ignored,
}

/// Tracks one drag gesture at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DragMachine {
    state: DragState,
}

impl DragMachine {
    /// Idle machine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    /// Whether `pointer_id` owns the gesture in progress. Lets callers skip measuring
    /// the pointer for moves that cannot change anything.
    #[must_use]
    pub fn tracks(&self, pointer_id: i32) -> bool {
        self.owns(pointer_id)
    }

    /// Pointer pressed on `target`. A second pointer during a drag is ignored.
    pub fn begin(&mut self, target: DragTarget, pointer_id: i32) -> DragOutcome {
        match self.state {
            DragState::Idle => {
                self.state = DragState::Dragging { target, pointer_id };
                DragOutcome::Started(target)
            }
            DragState::Dragging { .. } => DragOutcome::Ignored,
        }
    }

    /// Pointer moved to group-local `x`.
    pub fn tick(&mut self, layout: &SliderLayout, pointer_id: i32, x: f64) -> DragOutcome {
        if self.owns(pointer_id) {
            DragOutcome::Preview(layout.value_at(x))
        } else {
            DragOutcome::Ignored
        }
    }

    /// Pointer released at group-local `x`.
    pub fn end(&mut self, layout: &SliderLayout, pointer_id: i32, x: f64) -> DragOutcome {
        if self.owns(pointer_id) {
            self.state = DragState::Idle;
            DragOutcome::Commit(layout.value_at(x))
        } else {
            DragOutcome::Ignored
        }
    }

    /// The browser cancelled the pointer or the capture was lost; nothing is committed.
    pub fn cancel(&mut self, pointer_id: i32) -> DragOutcome {
        if self.owns(pointer_id) {
            self.state = DragState::Idle;
            DragOutcome::Cancelled
        } else {
            DragOutcome::Ignored
        }
    }

    fn owns(&self, pointer_id: i32) -> bool {
        matches!(self.state, DragState::Dragging { pointer_id: owner, .. } if owner == pointer_id)
    }
}
