//! Drag-to-move state for floating panels
//!
//! A panel is dragged by its handle. Pressing on the handle captures the
//! pointer's offset from the panel's top-left corner; while captured, every
//! pointer move places the panel at the pointer minus that offset. Presses
//! on controls inside the handle (buttons, inputs) never start a drag.

use serde::{Deserialize, Serialize};

/// A screen position in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
}

impl Point {
    /// Create a point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// What the pointer went down on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The drag handle itself (title bar, panel background)
    Handle,
    /// An interactive control inside the handle
    Control,
}

/// Position and capture state of one draggable panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    position: Point,
    grab_offset: Option<Point>,
}

impl DragState {
    /// A panel resting at `position`
    pub fn new(position: Point) -> Self {
        Self {
            position,
            grab_offset: None,
        }
    }

    /// Current top-left corner
    pub fn position(&self) -> Point {
        self.position
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.grab_offset.is_some()
    }

    /// Pointer pressed; returns true if a drag started
    pub fn pointer_down(&mut self, pointer: Point, target: PointerTarget) -> bool {
        match target {
            PointerTarget::Control => false,
            PointerTarget::Handle => {
                self.grab_offset = Some(pointer - self.position);
                true
            }
        }
    }

    /// Pointer moved; returns the new position while dragging
    pub fn pointer_move(&mut self, pointer: Point) -> Option<Point> {
        let offset = self.grab_offset?;
        self.position = pointer - offset;
        Some(self.position)
    }

    /// Pointer released
    pub fn pointer_up(&mut self) {
        self.grab_offset = None;
    }
}
