//! Editor message types.
//!
//! Pointer events from the host are translated into [`Command`]s, and every
//! command is applied to the editor as one atomic update.

use crate::model::ScreenPoint;

/// Mouse button that triggered a press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` value.
    pub fn from_dom(button: i16) -> Option<Self> {
        match button {
            0 => Some(Self::Left),
            1 => Some(Self::Middle),
            2 => Some(Self::Right),
            _ => None,
        }
    }
}

/// Raw pointer input on the canvas, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press { button: MouseButton, pos: ScreenPoint },
    Move { pos: ScreenPoint },
    Release { button: MouseButton, pos: ScreenPoint },
    /// Wheel over the canvas; negative `delta_y` scrolls away from the user.
    Wheel { pos: ScreenPoint, delta_y: f64 },
    DoubleClick { pos: ScreenPoint },
}

/// Commands that change editor state.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Viewport
    /// Middle button pressed, start dragging the view
    PanStart(ScreenPoint),
    /// Pointer moved while dragging
    PanMove(ScreenPoint),
    /// Middle button released
    PanEnd,
    /// Zoom one step around the pointer
    ZoomAt { pointer: ScreenPoint, delta_y: f64 },

    // Drawing
    /// Start a polygon or add a vertex at a screen position
    PlacePoint(ScreenPoint),
    /// Close and commit the polygon in progress
    CommitPolygon,
    /// Discard the polygon in progress
    CancelDrawing,

    // Annotations
    /// Select an annotation by index, or clear the selection
    SelectAnnotation(Option<usize>),
    /// Set the current class and relabel the selected annotation
    SetClass(String),
    /// Delete the selected annotation
    DeleteSelected,
}
